use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use url::Url;

use super::{PageRenderer, RawPage, RenderSession};
use crate::config::FetchConfig;
use crate::fetcher::FetchError;

/// Static fetch without script execution. Useful where no browser is
/// installed; pages that build their DOM client side will look empty.
#[derive(Debug, Clone)]
pub struct HttpRenderer {
    user_agent: String,
    timeout: Duration,
}

impl HttpRenderer {
    pub fn new(config: &FetchConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            timeout: Duration::from_secs(u64::from(config.navigation_timeout_secs)),
        }
    }
}

impl Default for HttpRenderer {
    fn default() -> Self {
        Self::new(&FetchConfig::default())
    }
}

pub struct HttpSession {
    client: Option<Client>,
}

#[async_trait]
impl PageRenderer for HttpRenderer {
    type Session = HttpSession;

    async fn open_session(&self) -> Result<HttpSession, FetchError> {
        // A new client per session keeps cookies and connections isolated.
        let client = Client::builder()
            .user_agent(&self.user_agent)
            .timeout(self.timeout)
            .build()
            .map_err(|e| FetchError::Browser(e.to_string()))?;
        Ok(HttpSession {
            client: Some(client),
        })
    }
}

#[async_trait]
impl RenderSession for HttpSession {
    async fn render(&mut self, url: &Url) -> Result<RawPage, FetchError> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| FetchError::Browser("session already closed".to_string()))?;

        let start = Instant::now();
        let response = client.get(url.clone()).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Navigation(format!("request to {url} timed out"))
            } else {
                FetchError::Navigation(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        let final_url = response.url().clone();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        let html = response
            .text()
            .await
            .map_err(|e| FetchError::Navigation(e.to_string()))?;

        Ok(RawPage {
            html,
            final_url,
            status: Some(status),
            content_type,
            load_time: start.elapsed(),
        })
    }

    async fn close(&mut self) -> Result<(), FetchError> {
        self.client.take();
        Ok(())
    }
}
