use std::collections::HashMap;

use seo_plugins::{CheckStatus, Impact, RuleCategory, RuleDisplay, TechnicalCheck};
use tracing::debug;

use crate::config::ScoringConfig;
use crate::content::ContentMetrics;
use crate::report::{round_percent, AnalysisReport, ContentAnalysis, Issue, Recommendation};

pub const SLOW_LOAD_ISSUE_ID: &str = "slow-page-load";
pub const SLOW_LOAD_RECOMMENDATION_ID: &str = "optimize-performance";
pub const THIN_CONTENT_RECOMMENDATION_ID: &str = "expand-content";

/// Signals the UX score is computed from.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct UxSignals {
    pub internal_links: u32,
}

impl From<&html_parser::SignalBundle> for UxSignals {
    fn from(signals: &html_parser::SignalBundle) -> Self {
        Self {
            internal_links: signals.links.internal,
        }
    }
}

/// Turns check results, content metrics and load time into a report.
///
/// Rule texts for issues and recommendations come from the catalog given at
/// construction; checks without a catalog entry fall back to generic text.
#[derive(Debug, Clone)]
pub struct ReportAggregator {
    scoring: ScoringConfig,
    rules: HashMap<String, RuleDisplay>,
}

impl ReportAggregator {
    pub fn new(scoring: ScoringConfig, rules: Vec<RuleDisplay>) -> Self {
        Self {
            scoring,
            rules: rules.into_iter().map(|rule| (rule.id.clone(), rule)).collect(),
        }
    }

    pub fn aggregate(
        &self,
        url: &str,
        checks: Vec<TechnicalCheck>,
        content: &ContentMetrics,
        load_time_seconds: f64,
        ux: UxSignals,
    ) -> AnalysisReport {
        let count = |status: CheckStatus| checks.iter().filter(|check| check.status == status).count() as u32;
        let passed_checks = count(CheckStatus::Passed);
        let failed_checks = count(CheckStatus::Failed);
        let warning_checks = count(CheckStatus::Warning);

        let technical = round_percent(technical_score(passed_checks, failed_checks));
        let content_score = round_percent(content_score(content.word_count, &self.scoring));
        let performance = round_percent(performance_score(load_time_seconds, &self.scoring));
        let ux_score = round_percent(ux_score(ux.internal_links, &self.scoring));
        let overall = overall_score([technical, content_score, performance, ux_score]);

        let issues = self.issues(&checks, load_time_seconds);
        let recommendations = self.recommendations(&checks, content, load_time_seconds);

        debug!(
            url,
            passed_checks,
            failed_checks,
            warning_checks,
            issues = issues.len(),
            recommendations = recommendations.len(),
            "report aggregated"
        );

        AnalysisReport {
            url: url.to_string(),
            overall_score: overall,
            technical_score: technical,
            content_score,
            performance_score: performance,
            ux_score,
            passed_checks,
            failed_checks,
            warning_checks,
            page_speed: format!("{load_time_seconds:.1}s"),
            load_time_seconds,
            issues,
            recommendations,
            technical_checks: checks,
            content_analysis: ContentAnalysis::from(content),
        }
    }

    fn issues(&self, checks: &[TechnicalCheck], load_time_seconds: f64) -> Vec<Issue> {
        let mut issues: Vec<Issue> = checks
            .iter()
            .filter_map(|check| {
                let (id, title, priority) = match check.status {
                    CheckStatus::Failed => (
                        format!("issue-{}", check.id),
                        format!("{} Issue", check.name),
                        check.impact,
                    ),
                    CheckStatus::Warning => (
                        format!("warning-{}", check.id),
                        format!("{} Warning", check.name),
                        Impact::Low,
                    ),
                    CheckStatus::Passed => return None,
                };
                let description = match self.rules.get(&check.id) {
                    Some(rule) => format!("{} ({})", rule.issue, check.value),
                    None => format!("{}: {}", check.name, check.value),
                };
                Some(Issue {
                    id,
                    title,
                    description,
                    priority,
                    impact: format!("{} impact on {} score", priority, category_name(check.category)),
                    category: check.category,
                })
            })
            .collect();

        if load_time_seconds > self.scoring.slow_load_threshold_secs {
            let priority = if load_time_seconds > 2.0 * self.scoring.slow_load_threshold_secs {
                Impact::High
            } else {
                Impact::Medium
            };
            issues.push(Issue {
                id: SLOW_LOAD_ISSUE_ID.to_string(),
                title: "Slow Page Load Speed".to_string(),
                description: format!(
                    "The page took {load_time_seconds:.1}s to load, above the {}s target.",
                    self.scoring.slow_load_threshold_secs
                ),
                priority,
                impact: format!("{priority} impact on performance score"),
                category: RuleCategory::Performance,
            });
        }

        issues
    }

    fn recommendations(
        &self,
        checks: &[TechnicalCheck],
        content: &ContentMetrics,
        load_time_seconds: f64,
    ) -> Vec<Recommendation> {
        let mut recommendations: Vec<Recommendation> = checks
            .iter()
            .filter(|check| check.status == CheckStatus::Failed)
            .map(|check| {
                let (title, description) = match self.rules.get(&check.id) {
                    Some(rule) => (rule.fix_title.clone(), rule.fix_description.clone()),
                    None => (format!("Fix {}", check.name), format!("Resolve the failing {} check.", check.name)),
                };
                Recommendation {
                    id: format!("fix-{}", check.id),
                    title,
                    description,
                    estimated_score_increase: score_increase(check.impact),
                    priority: priority_rank(check.impact),
                    category: check.category,
                }
            })
            .collect();

        if content.word_count < self.scoring.thin_content_words {
            recommendations.push(Recommendation {
                id: THIN_CONTENT_RECOMMENDATION_ID.to_string(),
                title: "Expand Page Content".to_string(),
                description: format!(
                    "The page has {} words. Aim for at least {} words of useful, original content.",
                    content.word_count, self.scoring.thin_content_words
                ),
                estimated_score_increase: 8,
                priority: 2,
                category: RuleCategory::Content,
            });
        }

        if load_time_seconds > self.scoring.slow_load_threshold_secs {
            recommendations.push(Recommendation {
                id: SLOW_LOAD_RECOMMENDATION_ID.to_string(),
                title: "Optimize Page Performance".to_string(),
                description: "Compress images, defer non-critical scripts and enable caching to cut load time."
                    .to_string(),
                estimated_score_increase: 12,
                priority: 2,
                category: RuleCategory::Performance,
            });
        }

        // Stable, so equal ranks keep check order.
        recommendations.sort_by_key(|recommendation| recommendation.priority);
        recommendations
    }
}

/// `passed / (passed + failed)`; warnings count toward neither side.
pub fn technical_score(passed: u32, failed: u32) -> f64 {
    let considered = passed + failed;
    if considered == 0 {
        return 100.0;
    }
    f64::from(passed) / f64::from(considered) * 100.0
}

pub fn content_score(word_count: u32, scoring: &ScoringConfig) -> f64 {
    let divisor = if scoring.content_words_divisor > 0.0 {
        scoring.content_words_divisor
    } else {
        1.0
    };
    let score = scoring.content_base + f64::from(word_count) / divisor;
    bounded(score, scoring.content_min, scoring.content_max)
}

pub fn performance_score(load_time_seconds: f64, scoring: &ScoringConfig) -> f64 {
    let over = (load_time_seconds - scoring.performance_baseline_secs).max(0.0);
    bounded(100.0 - over * scoring.performance_penalty_per_sec, scoring.performance_min, 100.0)
}

pub fn ux_score(internal_links: u32, scoring: &ScoringConfig) -> f64 {
    bounded(
        scoring.ux_base + f64::from(internal_links) * scoring.ux_points_per_internal_link,
        scoring.ux_min,
        100.0,
    )
}

/// Like `f64::clamp` but never panics: swapped bounds are reordered.
fn bounded(value: f64, min: f64, max: f64) -> f64 {
    let (low, high) = if min <= max { (min, max) } else { (max, min) };
    value.max(low).min(high)
}

pub fn overall_score(categories: [u32; 4]) -> u32 {
    let sum: u32 = categories.iter().sum();
    (f64::from(sum) / 4.0).round() as u32
}

fn score_increase(impact: Impact) -> u32 {
    match impact {
        Impact::High => 15,
        Impact::Medium => 10,
        Impact::Low => 5,
    }
}

fn priority_rank(impact: Impact) -> u8 {
    match impact {
        Impact::High => 1,
        Impact::Medium => 2,
        Impact::Low => 3,
    }
}

fn category_name(category: RuleCategory) -> &'static str {
    match category {
        RuleCategory::Technical => "technical",
        RuleCategory::Content => "content",
        RuleCategory::Performance => "performance",
        RuleCategory::Ux => "UX",
    }
}
