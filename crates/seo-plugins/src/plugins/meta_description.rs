use crate::utils::{
    config::{CheckOutcome, Impact, Rule, RuleCategory},
    page_plugin::SeoPlugin,
};

pub const DESCRIPTION_MIN_LENGTH: u32 = 120;
pub const DESCRIPTION_MAX_LENGTH: u32 = 160;

pub struct MetaDescriptionPlugin {}

impl Default for MetaDescriptionPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl MetaDescriptionPlugin {
    pub fn new() -> Self {
        Self {}
    }
}

impl SeoPlugin for MetaDescriptionPlugin {
    fn name(&self) -> &str {
        "Meta Description"
    }
    fn description(&self) -> &str {
        "Checks that the meta description is present and sized for search result snippets"
    }

    fn available_rules(&self) -> Vec<Rule> {
        vec![Rule {
            id: "meta-description",
            name: "Meta Description",
            description: "Checks that the page has a meta description between 120 and 160 characters",
            impact: Impact::High,
            category: RuleCategory::Technical,
            issue: "The meta description is missing or outside the recommended 120-160 characters.",
            fix_title: "Write a Compelling Meta Description",
            fix_description: "Summarize the page in 120-160 characters and include a clear reason to click.",
            check: |signals, _url| {
                let meta = &signals.meta;
                if !meta.has_description() {
                    return CheckOutcome::failed("Missing");
                }
                let value = format!("{} characters", meta.description_length);
                if (DESCRIPTION_MIN_LENGTH..=DESCRIPTION_MAX_LENGTH).contains(&meta.description_length) {
                    CheckOutcome::passed(value)
                } else {
                    CheckOutcome::warning(value)
                }
            },
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::config::{CheckStatus, RuleConfig, TechnicalCheck};
    use html_parser::PageParser;
    use url::Url;

    fn analyze(html: &str) -> TechnicalCheck {
        let plugin = MetaDescriptionPlugin::new();
        let mut config = RuleConfig::new();
        for rule in plugin.available_rules() {
            config.enable_rule(rule.id);
        }
        let url = Url::parse("https://example.com").unwrap();
        let signals = PageParser::from_url(url.clone()).extract(html);
        plugin.analyze(&signals, &url, &config).remove(0)
    }

    fn page_with_description(description: &str) -> String {
        format!(r#"<html><head><meta name="description" content="{description}"></head></html>"#)
    }

    #[test]
    fn test_description_lengths() {
        let result = analyze(&page_with_description(&"a".repeat(140)));
        assert_eq!(result.status, CheckStatus::Passed);
        assert_eq!(result.value, "140 characters");

        let result = analyze(&page_with_description(&"a".repeat(120)));
        assert_eq!(result.status, CheckStatus::Passed);

        let result = analyze(&page_with_description("Too short"));
        assert_eq!(result.status, CheckStatus::Warning);

        let result = analyze(&page_with_description(&"a".repeat(161)));
        assert_eq!(result.status, CheckStatus::Warning);
    }

    #[test]
    fn test_missing_description_fails() {
        let result = analyze("<html><head><title>No description</title></head></html>");
        assert_eq!(result.status, CheckStatus::Failed);
        assert_eq!(result.impact, Impact::High);

        let result = analyze(&page_with_description(""));
        assert_eq!(result.status, CheckStatus::Failed);
    }
}
