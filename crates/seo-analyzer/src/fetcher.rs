use std::time::Duration;

use serde::{Deserialize, Serialize};
use specta::Type;
use thiserror::Error;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::config::FetchConfig;
use crate::renderer::{PageRenderer, RawPage, RenderSession};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum FetchError {
    #[error("Navigation failed: {0}")]
    Navigation(String),
    #[error("Navigation timed out after {0}s")]
    Timeout(u64),
    #[error("Unsupported content type: {0}")]
    UnsupportedContent(String),
    #[error("Browser error: {0}")]
    Browser(String),
}

/// Fully rendered page handed to signal extraction.
#[derive(Debug, Clone, Serialize, Deserialize, Type, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RenderedPage {
    pub html: String,
    pub final_url: String,
    pub load_time_seconds: f64,
}

pub struct PageFetcher<R> {
    renderer: R,
    timeout: Duration,
}

impl<R: PageRenderer> PageFetcher<R> {
    pub fn new(renderer: R, config: &FetchConfig) -> Self {
        Self {
            renderer,
            timeout: Duration::from_secs(u64::from(config.navigation_timeout_secs)),
        }
    }

    pub fn with_timeout(renderer: R, timeout: Duration) -> Self {
        Self { renderer, timeout }
    }

    /// Opens a fresh session, renders `url` under the navigation timeout and
    /// closes the session again whatever the outcome.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn fetch(&self, url: &Url) -> Result<RenderedPage, FetchError> {
        let mut session = self.renderer.open_session().await?;

        let rendered = tokio::time::timeout(self.timeout, session.render(url)).await;

        if let Err(e) = session.close().await {
            warn!(error = %e, "failed to close render session");
        }

        let raw = match rendered {
            Ok(result) => result?,
            Err(_) => return Err(FetchError::Timeout(self.timeout.as_secs())),
        };
        let page = into_rendered_page(raw)?;
        debug!(
            final_url = %page.final_url,
            load_time = page.load_time_seconds,
            bytes = page.html.len(),
            "page rendered"
        );
        Ok(page)
    }
}

fn into_rendered_page(raw: RawPage) -> Result<RenderedPage, FetchError> {
    if let Some(content_type) = raw.content_type.as_deref() {
        if !is_html(content_type) {
            return Err(FetchError::UnsupportedContent(content_type.to_string()));
        }
    }

    if let Some(status) = raw.status {
        if !(200..300).contains(&status) && raw.html.trim().is_empty() {
            return Err(FetchError::Navigation(format!(
                "{} responded with status {status}",
                raw.final_url
            )));
        }
    }

    Ok(RenderedPage {
        html: raw.html,
        final_url: raw.final_url.to_string(),
        load_time_seconds: raw.load_time.as_secs_f64(),
    })
}

fn is_html(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime == "text/html" || mime == "application/xhtml+xml"
}
