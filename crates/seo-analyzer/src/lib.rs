pub mod aggregator;
pub mod analyzer;
pub mod config;
pub mod content;
pub mod fetcher;
pub mod renderer;
pub mod report;
pub mod store;

pub use aggregator::{ReportAggregator, UxSignals};
pub use analyzer::{
    validate_url, AnalysisFailedError, AnalysisOutcome, AnalysisRequest, Analyzer, ErrorResponse,
};
pub use config::{AnalyzerConfig, ConfigError, FetchConfig, ScoringConfig};
pub use content::{ContentMetrics, ContentScorer, ReadabilityLevel};
pub use fetcher::{FetchError, PageFetcher, RenderedPage};
#[cfg(feature = "chromium")]
pub use renderer::ChromiumRenderer;
pub use renderer::{HttpRenderer, PageRenderer, RawPage, RenderSession};
pub use report::{AnalysisReport, ContentAnalysis, Issue, Recommendation, ScoreHistorySnapshot};
pub use store::{ReportStore, StoreError};
