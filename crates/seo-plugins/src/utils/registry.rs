use std::collections::HashSet;
use std::fmt;

use html_parser::SignalBundle;
use tracing::debug;
use url::Url;

use crate::plugins::headings::HeadingsPlugin;
use crate::plugins::image::ImagePlugin;
use crate::plugins::meta_description::MetaDescriptionPlugin;
use crate::plugins::mobile::MobilePlugin;
use crate::plugins::security::SecurityPlugin;
use crate::plugins::seo_basic::SeoBasicPlugin;
use crate::plugins::title::TitlePlugin;

use super::config::{RuleConfig, RuleDisplay, TechnicalCheck};
use super::page_plugin::SeoPlugin;

/// Ordered set of plugins plus the rule configuration they run under.
///
/// Evaluation order is registration order, then rule order within a plugin,
/// so the same signals always produce the same list of checks.
pub struct PluginRegistry {
    plugins: Vec<Box<dyn SeoPlugin>>,
    rule_ids: HashSet<&'static str>,
    config: RuleConfig,
}

impl fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PluginRegistry({} plugins)", self.plugins.len())
    }
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self {
            plugins: Vec::new(),
            rule_ids: HashSet::new(),
            config: RuleConfig::new(),
        }
    }

    pub fn set_config(&mut self, config: RuleConfig) {
        self.config = config;
    }

    pub fn get_config(&self) -> &RuleConfig {
        &self.config
    }

    pub fn register<P: SeoPlugin + 'static>(&mut self, plugin: P) -> Result<(), String> {
        let rules = plugin.available_rules();
        if let Some(duplicate) = rules.iter().find(|rule| self.rule_ids.contains(rule.id)) {
            return Err(format!(
                "rule {} from plugin {} is already registered",
                duplicate.id,
                plugin.name()
            ));
        }
        self.rule_ids.extend(rules.iter().map(|rule| rule.id));
        self.plugins.push(Box::new(plugin));
        Ok(())
    }

    pub fn get_available_rules(&self) -> Vec<RuleDisplay> {
        self.plugins
            .iter()
            .flat_map(|plugin| {
                plugin
                    .available_rules()
                    .iter()
                    .map(|rule| RuleDisplay::from_rule(rule, plugin.name()))
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    pub fn get_rule(&self, rule_id: &str) -> Option<RuleDisplay> {
        self.get_available_rules()
            .into_iter()
            .find(|rule| rule.id == rule_id)
    }

    /// Number of rules that run under the current configuration.
    pub fn enabled_rule_count(&self) -> usize {
        self.get_available_rules()
            .iter()
            .filter(|rule| self.config.is_rule_enabled(&rule.id))
            .count()
    }

    pub fn evaluate(&self, signals: &SignalBundle, url: &Url) -> Vec<TechnicalCheck> {
        let checks: Vec<TechnicalCheck> = self
            .plugins
            .iter()
            .flat_map(|plugin| plugin.analyze(signals, url, &self.config))
            .collect();

        for check in &checks {
            debug!(rule = %check.id, status = ?check.status, value = %check.value, "evaluated check");
        }
        checks
    }

    pub fn default_with_config() -> Self {
        let mut config = RuleConfig::new();
        let mut registry = Self::default();
        let rules = registry.get_available_rules();

        for rule in rules {
            config.enable_rule(&rule.id);
        }
        registry.set_config(config);
        registry
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        let mut registry = Self::new();
        let _ = registry.register(SecurityPlugin::new());
        let _ = registry.register(TitlePlugin::new());
        let _ = registry.register(MetaDescriptionPlugin::new());
        let _ = registry.register(SeoBasicPlugin::new());
        let _ = registry.register(HeadingsPlugin::new());
        let _ = registry.register(ImagePlugin::new());
        let _ = registry.register(MobilePlugin::new());
        registry
    }
}
