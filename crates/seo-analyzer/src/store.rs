use async_trait::async_trait;
use thiserror::Error;

use crate::report::{AnalysisReport, ScoreHistorySnapshot};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum StoreError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
    #[error("Failed to save report: {0}")]
    Save(String),
}

/// Persistence collaborator. Implementations assign ids and timestamps;
/// the analyzer never does.
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Most recent report for `url` no older than `max_age_hours`.
    async fn find_recent_report(
        &self,
        url: &str,
        max_age_hours: u32,
    ) -> Result<Option<AnalysisReport>, StoreError>;

    async fn save_report(
        &self,
        report: &AnalysisReport,
        snapshot: &ScoreHistorySnapshot,
    ) -> Result<(), StoreError>;
}
