use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use seo_analyzer::{AnalysisReport, ReportStore, ScoreHistorySnapshot, StoreError};
use tokio::sync::Mutex;
use tracing::debug;
use url::Url;

pub mod entities;
pub use entities::{ScoreHistoryEntry, Site, StoredReport};

#[derive(Debug, Default)]
struct StorageState {
    sites: Vec<Site>,
    reports: Vec<StoredReport>,
    history: Vec<ScoreHistoryEntry>,
}

/// In-memory, append-only report storage.
///
/// Assigns ids and timestamps on save and answers recency lookups. Cloning
/// shares the underlying state.
#[derive(Debug, Clone, Default)]
pub struct SeoStorage {
    state: Arc<Mutex<StorageState>>,
}

impl SeoStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn upsert_site(&self, url: &str) -> u32 {
        let mut state = self.state.lock().await;
        upsert_site(&mut state, url, Utc::now())
    }

    pub async fn get_sites(&self) -> Vec<Site> {
        self.state.lock().await.sites.clone()
    }

    /// All reports for `url`, oldest first.
    pub async fn get_reports(&self, url: &str) -> Vec<StoredReport> {
        let state = self.state.lock().await;
        let Some(site) = state.sites.iter().find(|site| site.url == url) else {
            return Vec::new();
        };
        state
            .reports
            .iter()
            .filter(|report| report.site_id == site.id)
            .cloned()
            .collect()
    }

    pub async fn get_score_history(&self, url: &str) -> Vec<ScoreHistoryEntry> {
        let state = self.state.lock().await;
        let Some(site) = state.sites.iter().find(|site| site.url == url) else {
            return Vec::new();
        };
        state
            .history
            .iter()
            .filter(|entry| entry.site_id == site.id)
            .cloned()
            .collect()
    }

    /// Stores a report with an explicit timestamp, e.g. when importing
    /// history. Returns the new report id.
    pub async fn save_report_at(
        &self,
        report: &AnalysisReport,
        snapshot: &ScoreHistorySnapshot,
        created_at: DateTime<Utc>,
    ) -> u32 {
        let mut state = self.state.lock().await;
        let site_id = upsert_site(&mut state, &report.url, created_at);

        let report_id = state.reports.len() as u32 + 1;
        state.reports.push(StoredReport {
            id: report_id,
            site_id,
            report: report.clone(),
            created_at,
        });

        let history_id = state.history.len() as u32 + 1;
        state.history.push(ScoreHistoryEntry {
            id: history_id,
            site_id,
            report_id,
            snapshot: *snapshot,
            created_at,
        });

        debug!(url = %report.url, report_id, site_id, "report stored");
        report_id
    }
}

fn upsert_site(state: &mut StorageState, url: &str, created_at: DateTime<Utc>) -> u32 {
    if let Some(site) = state.sites.iter().find(|site| site.url == url) {
        return site.id;
    }
    let id = state.sites.len() as u32 + 1;
    state.sites.push(Site {
        id,
        name: site_name(url),
        url: url.to_string(),
        created_at,
    });
    id
}

fn site_name(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|url| url.host_str().map(|host| host.trim_start_matches("www.").to_string()))
        .unwrap_or_else(|| url.to_string())
}

#[async_trait]
impl ReportStore for SeoStorage {
    async fn find_recent_report(
        &self,
        url: &str,
        max_age_hours: u32,
    ) -> Result<Option<AnalysisReport>, StoreError> {
        let cutoff = Utc::now() - Duration::hours(i64::from(max_age_hours));
        let state = self.state.lock().await;
        let Some(site) = state.sites.iter().find(|site| site.url == url) else {
            return Ok(None);
        };
        Ok(state
            .reports
            .iter()
            .rev()
            .find(|stored| stored.site_id == site.id && stored.created_at >= cutoff)
            .map(|stored| stored.report.clone()))
    }

    async fn save_report(
        &self,
        report: &AnalysisReport,
        snapshot: &ScoreHistorySnapshot,
    ) -> Result<(), StoreError> {
        self.save_report_at(report, snapshot, Utc::now()).await;
        Ok(())
    }
}
