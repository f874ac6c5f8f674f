use chrono::{DateTime, Utc};
use seo_analyzer::{AnalysisReport, ScoreHistorySnapshot};
use serde::{Deserialize, Serialize};
use specta::Type;

/// A website that has been analyzed at least once, keyed by URL.
#[derive(Debug, Clone, Serialize, Deserialize, Type, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Site {
    pub id: u32,
    pub name: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

/// One analysis run. Rows are only ever appended.
#[derive(Debug, Clone, Serialize, Deserialize, Type, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoredReport {
    pub id: u32,
    pub site_id: u32,
    pub report: AnalysisReport,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Type, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScoreHistoryEntry {
    pub id: u32,
    pub site_id: u32,
    pub report_id: u32,
    pub snapshot: ScoreHistorySnapshot,
    pub created_at: DateTime<Utc>,
}
