use html_parser::SignalBundle;
use url::Url;

use super::config::{Rule, RuleConfig, TechnicalCheck};

// Main plugin trait
pub trait SeoPlugin: Send + Sync + 'static {
    fn name(&self) -> &str;
    fn description(&self) -> &str;

    // Rules this plugin can check, in display order
    fn available_rules(&self) -> Vec<Rule>;

    // Run enabled rules against the extracted signals
    fn analyze(&self, signals: &SignalBundle, url: &Url, config: &RuleConfig) -> Vec<TechnicalCheck> {
        self.available_rules()
            .iter()
            .filter(|rule| config.is_rule_enabled(rule.id))
            .map(|rule| {
                let outcome = (rule.check)(signals, url);
                TechnicalCheck {
                    id: rule.id.to_string(),
                    name: rule.name.to_string(),
                    status: outcome.status,
                    value: outcome.value,
                    impact: config.get_impact(rule.id, rule.impact),
                    category: rule.category,
                }
            })
            .collect()
    }
}
