use html_parser::PageParser;
use seo_plugins::PluginRegistry;
use serde::{Deserialize, Serialize};
use specta::Type;
use thiserror::Error;
use tracing::{info, instrument, warn};
use url::Url;

use crate::aggregator::{ReportAggregator, UxSignals};
use crate::config::AnalyzerConfig;
use crate::content::ContentScorer;
use crate::fetcher::{FetchError, PageFetcher};
use crate::renderer::PageRenderer;
use crate::report::{AnalysisReport, ScoreHistorySnapshot};
use crate::store::ReportStore;

#[derive(Debug, Clone, Serialize, Deserialize, Type)]
pub struct AnalysisRequest {
    pub url: String,
}

impl AnalysisRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Type, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisOutcome {
    pub report: AnalysisReport,
    pub snapshot: ScoreHistorySnapshot,
    /// True when a recent stored report was returned instead of a new analysis.
    pub reused: bool,
}

#[derive(Debug, Error)]
pub enum AnalysisFailedError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("Internal analysis error: {0}")]
    Internal(String),
}

/// `{status, message}` pair for HTTP translation.
#[derive(Debug, Clone, Serialize, Deserialize, Type, PartialEq)]
pub struct ErrorResponse {
    pub status: u16,
    pub message: String,
}

impl AnalysisFailedError {
    pub fn to_response(&self) -> ErrorResponse {
        let (status, message) = match self {
            Self::InvalidUrl(reason) => (400, format!("Invalid URL: {reason}")),
            Self::Fetch(FetchError::UnsupportedContent(content_type)) => {
                (500, format!("Unsupported content: {content_type}"))
            }
            Self::Fetch(cause @ (FetchError::Navigation(_) | FetchError::Timeout(_))) => {
                (500, format!("Couldn't reach the site: {cause}"))
            }
            Self::Fetch(cause @ FetchError::Browser(_)) => {
                (500, format!("Internal analysis error: {cause}"))
            }
            Self::Internal(reason) => (500, format!("Internal analysis error: {reason}")),
        };
        ErrorResponse { status, message }
    }
}

/// Parses an absolute `http`/`https` URL.
pub fn validate_url(raw: &str) -> Result<Url, AnalysisFailedError> {
    let url = Url::parse(raw.trim()).map_err(|e| AnalysisFailedError::InvalidUrl(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(AnalysisFailedError::InvalidUrl(format!(
                "unsupported scheme {scheme}"
            )))
        }
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(AnalysisFailedError::InvalidUrl("missing host".to_string()));
    }
    Ok(url)
}

/// The whole pipeline for one URL: fetch, extract, check, score, aggregate
/// and hand off to the store.
pub struct Analyzer<R, S> {
    fetcher: PageFetcher<R>,
    registry: PluginRegistry,
    scorer: ContentScorer,
    aggregator: ReportAggregator,
    store: S,
    config: AnalyzerConfig,
}

impl<R: PageRenderer, S: ReportStore> Analyzer<R, S> {
    pub fn new(renderer: R, store: S, config: AnalyzerConfig) -> Self {
        Self::with_registry(renderer, store, config, PluginRegistry::default_with_config())
    }

    pub fn with_registry(
        renderer: R,
        store: S,
        config: AnalyzerConfig,
        registry: PluginRegistry,
    ) -> Self {
        Self {
            fetcher: PageFetcher::new(renderer, &config.fetch),
            scorer: ContentScorer::new(config.scoring.thin_content_words),
            aggregator: ReportAggregator::new(config.scoring.clone(), registry.get_available_rules()),
            registry,
            store,
            config,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    #[instrument(skip(self, request), fields(url = %request.url))]
    pub async fn analyze(
        &self,
        request: &AnalysisRequest,
    ) -> Result<AnalysisOutcome, AnalysisFailedError> {
        let url = validate_url(&request.url)?;

        match self
            .store
            .find_recent_report(url.as_str(), self.config.recency_window_hours)
            .await
        {
            Ok(Some(report)) => {
                info!(overall_score = report.overall_score, "returning recent report");
                let snapshot = ScoreHistorySnapshot::from(&report);
                return Ok(AnalysisOutcome {
                    report,
                    snapshot,
                    reused: true,
                });
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "recency lookup failed, analyzing anyway"),
        }

        info!("starting analysis");
        let page = self.fetcher.fetch(&url).await?;

        let final_url = Url::parse(&page.final_url).unwrap_or_else(|_| url.clone());
        let signals = PageParser::from_url(final_url.clone()).extract(&page.html);

        let (checks, content) = tokio::join!(
            async { self.registry.evaluate(&signals, &final_url) },
            async { self.scorer.score(&signals) },
        );

        let report = self.aggregator.aggregate(
            url.as_str(),
            checks,
            &content,
            page.load_time_seconds,
            UxSignals::from(&signals),
        );
        let snapshot = ScoreHistorySnapshot::from(&report);

        self.store
            .save_report(&report, &snapshot)
            .await
            .map_err(|e| AnalysisFailedError::Internal(e.to_string()))?;

        info!(
            overall_score = report.overall_score,
            technical_score = report.technical_score,
            content_score = report.content_score,
            performance_score = report.performance_score,
            ux_score = report.ux_score,
            issues = report.issues.len(),
            "analysis complete"
        );

        Ok(AnalysisOutcome {
            report,
            snapshot,
            reused: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::tests::{Script, ScriptedRenderer};
    use crate::store::StoreError;
    use async_trait::async_trait;
    use std::sync::atomic::Ordering;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Store double that records saved reports.
    #[derive(Default)]
    struct RecordingStore {
        saved: Mutex<Vec<(AnalysisReport, ScoreHistorySnapshot)>>,
        fail_lookup: bool,
        fail_save: bool,
    }

    impl RecordingStore {
        fn saved_count(&self) -> usize {
            self.saved.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ReportStore for RecordingStore {
        async fn find_recent_report(
            &self,
            url: &str,
            _max_age_hours: u32,
        ) -> Result<Option<AnalysisReport>, StoreError> {
            if self.fail_lookup {
                return Err(StoreError::Unavailable("connection refused".to_string()));
            }
            Ok(self
                .saved
                .lock()
                .unwrap()
                .iter()
                .rev()
                .find(|(report, _)| report.url == url)
                .map(|(report, _)| report.clone()))
        }

        async fn save_report(
            &self,
            report: &AnalysisReport,
            snapshot: &ScoreHistorySnapshot,
        ) -> Result<(), StoreError> {
            if self.fail_save {
                return Err(StoreError::Save("disk full".to_string()));
            }
            self.saved.lock().unwrap().push((report.clone(), *snapshot));
            Ok(())
        }
    }

    const PAGE: &str = r#"<!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8">
                <meta name="viewport" content="width=device-width, initial-scale=1">
            </head>
            <body>
                <h1>Widgets</h1>
                <p>Widgets are small. They help. Everyone likes widgets.</p>
                <a href="/more">More</a>
            </body>
        </html>"#;

    #[tokio::test]
    async fn test_analyze_and_persist() {
        let renderer = ScriptedRenderer::page(PAGE, "https://example.com/", Duration::from_millis(1200));
        let analyzer = Analyzer::new(renderer.clone(), RecordingStore::default(), AnalyzerConfig::default());

        let outcome = analyzer
            .analyze(&AnalysisRequest::new("https://example.com"))
            .await
            .unwrap();

        let report = &outcome.report;
        assert!(!outcome.reused);
        assert_eq!(report.url, "https://example.com/");
        assert_eq!(report.performance_score, 96);
        assert_eq!(report.ux_score, 82);
        assert_eq!(report.technical_checks.len(), 14);
        // Title and description are missing; canonical, sitemap and Open Graph only warn.
        assert_eq!(report.failed_checks, 2);
        assert_eq!(report.passed_checks, 9);
        assert_eq!(report.warning_checks, 3);
        assert_eq!(report.technical_score, 82);
        assert!(report.issues.iter().any(|issue| issue.title == "Title Tag Issue"));
        assert!(report.issues.iter().any(|issue| issue.title == "Meta Description Issue"));
        assert_eq!(outcome.snapshot, ScoreHistorySnapshot::from(report));
        assert_eq!(analyzer.store().saved_count(), 1);
        assert_eq!(renderer.open_sessions(), 0);
    }

    #[tokio::test]
    async fn test_recent_report_is_reused() {
        let renderer = ScriptedRenderer::page(PAGE, "https://example.com/", Duration::ZERO);
        let analyzer = Analyzer::new(renderer.clone(), RecordingStore::default(), AnalyzerConfig::default());
        let request = AnalysisRequest::new("https://example.com/");

        let first = analyzer.analyze(&request).await.unwrap();
        let second = analyzer.analyze(&request).await.unwrap();

        assert!(second.reused);
        assert_eq!(first.report, second.report);
        assert_eq!(renderer.opened.load(Ordering::SeqCst), 1);
        assert_eq!(analyzer.store().saved_count(), 1);
    }

    #[tokio::test]
    async fn test_lookup_failure_is_ignored() {
        let renderer = ScriptedRenderer::page(PAGE, "https://example.com/", Duration::ZERO);
        let store = RecordingStore {
            fail_lookup: true,
            ..Default::default()
        };
        let analyzer = Analyzer::new(renderer, store, AnalyzerConfig::default());

        let outcome = analyzer.analyze(&AnalysisRequest::new("https://example.com")).await.unwrap();
        assert!(!outcome.reused);
        assert_eq!(analyzer.store().saved_count(), 1);
    }

    #[tokio::test]
    async fn test_save_failure_is_internal() {
        let renderer = ScriptedRenderer::page(PAGE, "https://example.com/", Duration::ZERO);
        let store = RecordingStore {
            fail_save: true,
            ..Default::default()
        };
        let analyzer = Analyzer::new(renderer, store, AnalyzerConfig::default());

        let error = analyzer
            .analyze(&AnalysisRequest::new("https://example.com"))
            .await
            .unwrap_err();
        assert!(matches!(error, AnalysisFailedError::Internal(_)));
        let response = error.to_response();
        assert_eq!(response.status, 500);
        assert!(response.message.starts_with("Internal analysis error"));
    }

    #[tokio::test]
    async fn test_timeout_persists_nothing_and_releases_browser() {
        let renderer = ScriptedRenderer::new(Script::Hang);
        let mut config = AnalyzerConfig::default();
        config.fetch.navigation_timeout_secs = 1;
        let analyzer = Analyzer::new(renderer.clone(), RecordingStore::default(), config);

        let error = analyzer
            .analyze(&AnalysisRequest::new("https://example.com"))
            .await
            .unwrap_err();

        assert!(matches!(error, AnalysisFailedError::Fetch(FetchError::Timeout(1))));
        let response = error.to_response();
        assert_eq!(response.status, 500);
        assert!(response.message.starts_with("Couldn't reach the site"));
        assert_eq!(analyzer.store().saved_count(), 0);
        assert_eq!(renderer.opened.load(Ordering::SeqCst), 1);
        assert_eq!(renderer.open_sessions(), 0);
    }

    #[tokio::test]
    async fn test_invalid_url_never_fetches() {
        let renderer = ScriptedRenderer::page(PAGE, "https://example.com/", Duration::ZERO);
        let analyzer = Analyzer::new(renderer.clone(), RecordingStore::default(), AnalyzerConfig::default());

        for raw in ["not a url", "ftp://example.com/file", "/relative/path", "mailto:a@example.com"] {
            let error = analyzer.analyze(&AnalysisRequest::new(raw)).await.unwrap_err();
            assert!(matches!(error, AnalysisFailedError::InvalidUrl(_)), "{raw}");
            assert_eq!(error.to_response().status, 400);
        }
        assert_eq!(renderer.opened.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_error_responses() {
        let unsupported = AnalysisFailedError::Fetch(FetchError::UnsupportedContent("image/png".to_string()));
        assert_eq!(
            unsupported.to_response(),
            ErrorResponse {
                status: 500,
                message: "Unsupported content: image/png".to_string()
            }
        );

        let navigation = AnalysisFailedError::Fetch(FetchError::Navigation("dns error".to_string()));
        assert_eq!(
            navigation.to_response().message,
            "Couldn't reach the site: Navigation failed: dns error"
        );

        let browser = AnalysisFailedError::Fetch(FetchError::Browser("launch failed".to_string()));
        assert!(browser.to_response().message.starts_with("Internal analysis error"));
    }
}
