//! Page rendering backends.
//!
//! A [`PageRenderer`] hands out one isolated [`RenderSession`] per analysis.
//! Sessions are never shared, and [`crate::PageFetcher`] closes every session
//! it opens.

use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use crate::fetcher::FetchError;

#[cfg(feature = "chromium")]
mod chromium;
mod http;

#[cfg(feature = "chromium")]
pub use chromium::ChromiumRenderer;
pub use http::HttpRenderer;

/// What a session saw after navigating and waiting for the page to settle.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPage {
    pub html: String,
    pub final_url: Url,
    /// Status of the main document response, when the backend knows it.
    pub status: Option<u16>,
    pub content_type: Option<String>,
    /// Navigation start to settle.
    pub load_time: Duration,
}

#[async_trait]
pub trait PageRenderer: Send + Sync {
    type Session: RenderSession;

    async fn open_session(&self) -> Result<Self::Session, FetchError>;
}

#[async_trait]
pub trait RenderSession: Send {
    async fn render(&mut self, url: &Url) -> Result<RawPage, FetchError>;

    /// Releases everything the session holds. Called exactly once.
    async fn close(&mut self) -> Result<(), FetchError>;
}
