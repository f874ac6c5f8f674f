use std::path::Path;

use serde::{Deserialize, Serialize};
use specta::Type;
use thiserror::Error;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Top level settings for one [`crate::Analyzer`].
#[derive(Debug, Clone, Serialize, Deserialize, Type, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalyzerConfig {
    pub fetch: FetchConfig,
    pub scoring: ScoringConfig,
    /// Reports younger than this are returned instead of re-analyzing.
    pub recency_window_hours: u32,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            fetch: FetchConfig::default(),
            scoring: ScoringConfig::default(),
            recency_window_hours: 1,
        }
    }
}

impl AnalyzerConfig {
    /// Loads a possibly partial JSON config; missing fields keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.scoring.validate()?;
        Ok(config)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Type, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct FetchConfig {
    /// Hard ceiling for navigation plus settle.
    pub navigation_timeout_secs: u32,
    /// Quiet window the network must hold before the page counts as settled.
    pub network_idle_ms: u32,
    pub max_inflight_requests: u32,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            navigation_timeout_secs: 30,
            network_idle_ms: 500,
            max_inflight_requests: 2,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Tunable constants of the category score formulas.
#[derive(Debug, Clone, Serialize, Deserialize, Type, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ScoringConfig {
    pub content_base: f64,
    pub content_words_divisor: f64,
    pub content_min: f64,
    pub content_max: f64,
    pub performance_baseline_secs: f64,
    pub performance_penalty_per_sec: f64,
    pub performance_min: f64,
    pub ux_base: f64,
    pub ux_points_per_internal_link: f64,
    pub ux_min: f64,
    pub slow_load_threshold_secs: f64,
    pub thin_content_words: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            content_base: 60.0,
            content_words_divisor: 20.0,
            content_min: 50.0,
            content_max: 100.0,
            performance_baseline_secs: 1.0,
            performance_penalty_per_sec: 20.0,
            performance_min: 50.0,
            ux_base: 80.0,
            ux_points_per_internal_link: 2.0,
            ux_min: 70.0,
            slow_load_threshold_secs: 2.0,
            thin_content_words: 300,
        }
    }
}

impl ScoringConfig {
    /// Rejects score floors that sit above their ceilings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let bounds = [
            ("contentMin", self.content_min, "contentMax", self.content_max),
            ("performanceMin", self.performance_min, "100", 100.0),
            ("uxMin", self.ux_min, "100", 100.0),
        ];
        for (low_name, low, high_name, high) in bounds {
            if low > high {
                return Err(ConfigError::Invalid(format!(
                    "{low_name} ({low}) must not exceed {high_name} ({high})"
                )));
            }
        }
        Ok(())
    }
}
