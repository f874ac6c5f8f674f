use std::collections::HashSet;
use std::hash::Hash;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::error::CdpError;
use chromiumoxide::cdp::browser_protocol::network::{
    EventLoadingFailed, EventLoadingFinished, EventRequestWillBeSent, EventResponseReceived,
    ResourceType,
};
use futures::StreamExt;
use tempfile::TempDir;
use tokio::task::JoinHandle;
use tracing::debug;
use url::Url;

use super::{PageRenderer, RawPage, RenderSession};
use crate::config::FetchConfig;
use crate::fetcher::FetchError;

/// Headless Chromium, one browser process per session.
#[derive(Debug, Clone)]
pub struct ChromiumRenderer {
    config: FetchConfig,
}

impl ChromiumRenderer {
    pub fn new(config: &FetchConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }
}

pub struct ChromiumSession {
    browser: Option<Browser>,
    handler: Option<JoinHandle<()>>,
    // Dropped last so the browser never outlives its profile.
    profile: Option<TempDir>,
    network_idle: Duration,
    max_inflight: usize,
}

#[async_trait]
impl PageRenderer for ChromiumRenderer {
    type Session = ChromiumSession;

    async fn open_session(&self) -> Result<ChromiumSession, FetchError> {
        let profile = tempfile::tempdir().map_err(|e| FetchError::Browser(e.to_string()))?;

        let browser_config = BrowserConfig::builder()
            .user_data_dir(profile.path())
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-gpu")
            .arg(format!("--user-agent={}", self.config.user_agent))
            .build()
            .map_err(|e| FetchError::Browser(format!("Browser config error: {e}")))?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| FetchError::Browser(format!("Browser launch failed: {e}")))?;

        let handler = tokio::spawn(async move { while handler.next().await.is_some() {} });
        debug!(profile = %profile.path().display(), "browser launched");

        Ok(ChromiumSession {
            browser: Some(browser),
            handler: Some(handler),
            profile: Some(profile),
            network_idle: Duration::from_millis(u64::from(self.config.network_idle_ms)),
            max_inflight: self.config.max_inflight_requests as usize,
        })
    }
}

#[async_trait]
impl RenderSession for ChromiumSession {
    async fn render(&mut self, url: &Url) -> Result<RawPage, FetchError> {
        let browser = self
            .browser
            .as_ref()
            .ok_or_else(|| FetchError::Browser("session already closed".to_string()))?;

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| FetchError::Browser(format!("Failed to open page: {e}")))?;

        let mut requests = page
            .event_listener::<EventRequestWillBeSent>()
            .await
            .map_err(listen_error)?;
        let mut finished = page
            .event_listener::<EventLoadingFinished>()
            .await
            .map_err(listen_error)?;
        let mut failed = page
            .event_listener::<EventLoadingFailed>()
            .await
            .map_err(listen_error)?;
        let mut responses = page
            .event_listener::<EventResponseReceived>()
            .await
            .map_err(listen_error)?;

        let start = Instant::now();
        page.goto(url.as_str())
            .await
            .map_err(|e| FetchError::Navigation(e.to_string()))?;

        let mut settle = NetworkSettle::new(self.max_inflight, self.network_idle, Instant::now());
        let mut document: Option<(u16, String)> = None;
        loop {
            let settle_at = settle.settle_at().map(tokio::time::Instant::from_std);
            let wake = settle_at.unwrap_or_else(tokio::time::Instant::now);
            tokio::select! {
                Some(event) = requests.next() => {
                    settle.request_started(event.request_id.clone(), Instant::now());
                }
                Some(event) = finished.next() => {
                    settle.request_done(&event.request_id, Instant::now());
                }
                Some(event) = failed.next() => {
                    settle.request_done(&event.request_id, Instant::now());
                }
                Some(event) = responses.next() => {
                    if document.is_none() && event.r#type == ResourceType::Document {
                        let status = u16::try_from(event.response.status).unwrap_or_default();
                        document = Some((status, event.response.mime_type.clone()));
                    }
                }
                _ = tokio::time::sleep_until(wake), if settle_at.is_some() => break,
                else => break,
            }
        }
        let load_time = start.elapsed();

        let html = page
            .content()
            .await
            .map_err(|e| FetchError::Browser(format!("Failed to get content: {e}")))?;
        let final_url = page
            .url()
            .await
            .ok()
            .flatten()
            .and_then(|raw| Url::parse(&raw).ok())
            .unwrap_or_else(|| url.clone());

        if let Err(e) = page.close().await {
            debug!(error = %e, "page close error");
        }

        let (status, content_type) = match document {
            Some((status, mime)) => (Some(status), Some(mime)),
            None => (None, None),
        };
        Ok(RawPage {
            html,
            final_url,
            status,
            content_type,
            load_time,
        })
    }

    async fn close(&mut self) -> Result<(), FetchError> {
        let mut result = Ok(());
        if let Some(mut browser) = self.browser.take() {
            if let Err(e) = browser.close().await {
                result = Err(FetchError::Browser(format!("Browser close error: {e}")));
            }
            // Reap the process even when close failed.
            if let Err(e) = browser.wait().await {
                result = Err(FetchError::Browser(format!("Browser wait error: {e}")));
            }
        }
        if let Some(handler) = self.handler.take() {
            handler.abort();
        }
        self.profile.take();
        result
    }
}

fn listen_error(e: CdpError) -> FetchError {
    FetchError::Browser(format!("Failed to listen for network events: {e}"))
}

/// In-flight request bookkeeping for the network-settle wait.
///
/// The page is settled once no more than `max_inflight` requests have been
/// open for an unbroken `idle` window. Traffic that keeps the count at or
/// under the limit does not restart the window.
#[derive(Debug)]
struct NetworkSettle<Id> {
    in_flight: HashSet<Id>,
    quiet_since: Option<Instant>,
    max_inflight: usize,
    idle: Duration,
}

impl<Id: Hash + Eq> NetworkSettle<Id> {
    fn new(max_inflight: usize, idle: Duration, now: Instant) -> Self {
        Self {
            in_flight: HashSet::new(),
            quiet_since: Some(now),
            max_inflight,
            idle,
        }
    }

    fn request_started(&mut self, id: Id, now: Instant) {
        self.in_flight.insert(id);
        self.refresh(now);
    }

    fn request_done(&mut self, id: &Id, now: Instant) {
        self.in_flight.remove(id);
        self.refresh(now);
    }

    fn refresh(&mut self, now: Instant) {
        if self.in_flight.len() <= self.max_inflight {
            self.quiet_since.get_or_insert(now);
        } else {
            self.quiet_since = None;
        }
    }

    /// When the page counts as settled, or `None` while too busy.
    fn settle_at(&self) -> Option<Instant> {
        self.quiet_since.map(|since| since + self.idle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IDLE: Duration = Duration::from_millis(500);

    #[test]
    fn test_steady_polling_under_limit_still_settles() {
        let start = Instant::now();
        let mut settle = NetworkSettle::new(2, IDLE, start);

        // A poll opens and closes every 300ms, never more than one request open.
        for tick in 0..10u32 {
            let at = start + Duration::from_millis(u64::from(tick) * 300);
            settle.request_started(tick, at);
            settle.request_done(&tick, at + Duration::from_millis(50));
        }

        assert_eq!(settle.settle_at(), Some(start + IDLE));
    }

    #[test]
    fn test_busy_network_restarts_quiet_window() {
        let start = Instant::now();
        let mut settle = NetworkSettle::new(1, IDLE, start);

        settle.request_started("a", start);
        settle.request_started("b", start + Duration::from_millis(100));
        assert_eq!(settle.settle_at(), None);

        let quiet = start + Duration::from_millis(400);
        settle.request_done(&"a", quiet);
        assert_eq!(settle.settle_at(), Some(quiet + IDLE));

        // A request closing that was never seen leaves the window alone.
        settle.request_done(&"unknown", quiet + Duration::from_millis(200));
        assert_eq!(settle.settle_at(), Some(quiet + IDLE));
    }

    #[test]
    fn test_zero_limit_waits_for_every_request() {
        let start = Instant::now();
        let mut settle = NetworkSettle::new(0, IDLE, start);

        settle.request_started(1, start);
        assert_eq!(settle.settle_at(), None);
        let done = start + Duration::from_millis(900);
        settle.request_done(&1, done);
        assert_eq!(settle.settle_at(), Some(done + IDLE));
    }
}
