use crate::utils::{
    config::{CheckOutcome, Impact, Rule, RuleCategory},
    page_plugin::SeoPlugin,
};

// Security Plugin
pub struct SecurityPlugin {}

impl Default for SecurityPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl SecurityPlugin {
    pub fn new() -> Self {
        Self {}
    }
}

impl SeoPlugin for SecurityPlugin {
    fn name(&self) -> &str {
        "Security"
    }
    fn description(&self) -> &str {
        "Pages served over HTTPS are preferred by search engines and trusted by browsers."
    }

    fn available_rules(&self) -> Vec<Rule> {
        vec![Rule {
            id: "https",
            name: "HTTPS Security",
            description: "Checks that the final page URL uses HTTPS",
            impact: Impact::High,
            category: RuleCategory::Technical,
            issue: "The page is not served over a secure connection.",
            fix_title: "Enable HTTPS",
            fix_description: "Install a TLS certificate and redirect all HTTP traffic to HTTPS.",
            check: |signals, _url| {
                if signals.security.is_https {
                    CheckOutcome::passed("Secure")
                } else {
                    CheckOutcome::failed("Not secure")
                }
            },
        }]
    }
}
