use crate::utils::{
    config::{CheckOutcome, Impact, Rule, RuleCategory},
    page_plugin::SeoPlugin,
};

pub const TITLE_MIN_LENGTH: u32 = 50;
pub const TITLE_MAX_LENGTH: u32 = 60;

// Title Plugin
pub struct TitlePlugin {}

impl Default for TitlePlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl TitlePlugin {
    pub fn new() -> Self {
        Self {}
    }
}

impl SeoPlugin for TitlePlugin {
    fn name(&self) -> &str {
        "Title"
    }
    fn description(&self) -> &str {
        "The title tag of a web page is meant to be an accurate and concise description of
 a page's content. It is critical to both user experience and SEO."
    }

    fn available_rules(&self) -> Vec<Rule> {
        vec![Rule {
            id: "title",
            name: "Title Tag",
            description: "Checks that the page has a title between 50 and 60 characters",
            impact: Impact::High,
            category: RuleCategory::Technical,
            issue: "The title tag is missing or outside the recommended 50-60 characters.",
            fix_title: "Optimize Title Tag",
            fix_description: "Write a unique, descriptive title of 50-60 characters that leads with the primary keyword.",
            check: |signals, _url| {
                let meta = &signals.meta;
                if !meta.has_title() {
                    return CheckOutcome::failed("Missing");
                }
                let value = format!("{} characters", meta.title_length);
                if (TITLE_MIN_LENGTH..=TITLE_MAX_LENGTH).contains(&meta.title_length) {
                    CheckOutcome::passed(value)
                } else {
                    CheckOutcome::warning(value)
                }
            },
        }]
    }
}
