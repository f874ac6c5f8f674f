use seo_plugins::{Impact, RuleCategory, TechnicalCheck};
use serde::{Deserialize, Serialize};
use specta::Type;

use crate::content::{ContentMetrics, ReadabilityLevel};

/// A detected problem, derived from a failed or warning check or from a
/// threshold breach.
#[derive(Debug, Clone, Serialize, Deserialize, Type, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub id: String,
    pub title: String,
    pub description: String,
    pub priority: Impact,
    pub impact: String,
    pub category: RuleCategory,
}

/// A suggested fix. `priority` is a rank, 1 first.
#[derive(Debug, Clone, Serialize, Deserialize, Type, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub id: String,
    pub title: String,
    pub description: String,
    pub estimated_score_increase: u32,
    pub priority: u8,
    pub category: RuleCategory,
}

/// Content metrics as shown in the report, percentages rounded.
#[derive(Debug, Clone, Serialize, Deserialize, Type, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContentAnalysis {
    pub word_count: u32,
    pub sentence_count: u32,
    pub paragraph_count: u32,
    pub readability_score: u32,
    pub readability_level: ReadabilityLevel,
    pub heading_hierarchy_valid: bool,
    pub heading_violations: Vec<String>,
    pub image_optimization: u32,
    pub internal_link_ratio: u32,
    pub quality_score: u32,
}

impl From<&ContentMetrics> for ContentAnalysis {
    fn from(metrics: &ContentMetrics) -> Self {
        Self {
            word_count: metrics.word_count,
            sentence_count: metrics.sentence_count,
            paragraph_count: metrics.paragraph_count,
            readability_score: round_percent(metrics.readability_score),
            readability_level: metrics.readability_level,
            heading_hierarchy_valid: metrics.heading_hierarchy_valid,
            heading_violations: metrics.heading_violations.clone(),
            image_optimization: round_percent(metrics.image_optimization),
            internal_link_ratio: round_percent(metrics.internal_link_ratio),
            quality_score: round_percent(metrics.quality_score),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Type, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub url: String,
    pub overall_score: u32,
    pub technical_score: u32,
    pub content_score: u32,
    pub performance_score: u32,
    pub ux_score: u32,
    pub passed_checks: u32,
    pub failed_checks: u32,
    pub warning_checks: u32,
    /// Display form of the load time, e.g. `"1.2s"`.
    pub page_speed: String,
    pub load_time_seconds: f64,
    pub issues: Vec<Issue>,
    pub recommendations: Vec<Recommendation>,
    pub technical_checks: Vec<TechnicalCheck>,
    pub content_analysis: ContentAnalysis,
}

/// The score subset kept for trend charts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ScoreHistorySnapshot {
    pub overall_score: u32,
    pub technical_score: u32,
    pub content_score: u32,
    pub performance_score: u32,
    pub ux_score: u32,
}

impl From<&AnalysisReport> for ScoreHistorySnapshot {
    fn from(report: &AnalysisReport) -> Self {
        Self {
            overall_score: report.overall_score,
            technical_score: report.technical_score,
            content_score: report.content_score,
            performance_score: report.performance_score,
            ux_score: report.ux_score,
        }
    }
}

pub(crate) fn round_percent(value: f64) -> u32 {
    value.round().clamp(0.0, 100.0) as u32
}
