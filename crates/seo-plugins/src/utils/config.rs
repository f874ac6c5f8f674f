// Core rule types
use std::collections::HashMap;
use std::fmt;

use html_parser::SignalBundle;
use serde::{Deserialize, Serialize};
use specta::Type;
use url::Url;

/// Outcome of a single rule.
#[derive(Debug, Serialize, Deserialize, Type, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Passed,
    Failed,
    Warning,
}

/// How much a failing rule hurts the page.
#[derive(Debug, Serialize, Deserialize, Type, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    High,
    Medium,
    Low,
}

impl Impact {
    pub fn as_str(&self) -> &'static str {
        match self {
            Impact::High => "high",
            Impact::Medium => "medium",
            Impact::Low => "low",
        }
    }
}

impl fmt::Display for Impact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Serialize, Deserialize, Type, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RuleCategory {
    Technical,
    Content,
    Performance,
    Ux,
}

/// What a rule's check function reports back.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckOutcome {
    pub status: CheckStatus,
    /// Short display value, e.g. `"42 characters"` or `"Missing"`.
    pub value: String,
}

impl CheckOutcome {
    pub fn passed(value: impl Into<String>) -> Self {
        Self {
            status: CheckStatus::Passed,
            value: value.into(),
        }
    }

    pub fn failed(value: impl Into<String>) -> Self {
        Self {
            status: CheckStatus::Failed,
            value: value.into(),
        }
    }

    pub fn warning(value: impl Into<String>) -> Self {
        Self {
            status: CheckStatus::Warning,
            value: value.into(),
        }
    }
}

/// One evaluated rule, as shown in the report.
#[derive(Debug, Serialize, Deserialize, Type, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TechnicalCheck {
    pub id: String,
    pub name: String,
    pub status: CheckStatus,
    pub value: String,
    pub impact: Impact,
    pub category: RuleCategory,
}

// Rule definition
#[derive(Clone)]
pub struct Rule {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub impact: Impact,
    pub category: RuleCategory,
    /// Issue text shown when the rule does not pass.
    pub issue: &'static str,
    /// Recommendation title and body for a failed rule.
    pub fix_title: &'static str,
    pub fix_description: &'static str,
    pub check: fn(&SignalBundle, &Url) -> CheckOutcome,
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("id", &self.id)
            .field("impact", &self.impact)
            .finish()
    }
}

/// Static description of a rule, without its check function.
#[derive(Debug, Serialize, Deserialize, Type, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RuleDisplay {
    pub id: String,
    pub name: String,
    pub description: String,
    pub plugin_name: String,
    pub impact: Impact,
    pub category: RuleCategory,
    pub issue: String,
    pub fix_title: String,
    pub fix_description: String,
}

impl RuleDisplay {
    pub fn from_rule(rule: &Rule, plugin_name: &str) -> Self {
        Self {
            id: rule.id.to_string(),
            name: rule.name.to_string(),
            description: rule.description.to_string(),
            plugin_name: plugin_name.to_string(),
            impact: rule.impact,
            category: rule.category,
            issue: rule.issue.to_string(),
            fix_title: rule.fix_title.to_string(),
            fix_description: rule.fix_description.to_string(),
        }
    }
}

// Configuration for which rules to run
#[derive(Debug, Serialize, Deserialize, Type, Clone)]
pub struct RuleConfig {
    enabled_rules: HashMap<String, bool>,
    rule_impacts: HashMap<String, Impact>,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleConfig {
    pub fn new() -> Self {
        Self {
            enabled_rules: HashMap::new(),
            rule_impacts: HashMap::new(),
        }
    }

    pub fn enable_rule(&mut self, rule_id: &str) {
        self.enabled_rules.insert(rule_id.to_string(), true);
    }

    pub fn disable_rule(&mut self, rule_id: &str) {
        self.enabled_rules.insert(rule_id.to_string(), false);
    }

    pub fn set_impact(&mut self, rule_id: &str, impact: Impact) {
        self.rule_impacts.insert(rule_id.to_string(), impact);
    }

    pub fn is_rule_enabled(&self, rule_id: &str) -> bool {
        *self.enabled_rules.get(rule_id).unwrap_or(&false)
    }

    pub fn get_impact(&self, rule_id: &str, default: Impact) -> Impact {
        self.rule_impacts.get(rule_id).copied().unwrap_or(default)
    }
}
