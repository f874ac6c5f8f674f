use crate::utils::{
    config::{CheckOutcome, Impact, Rule, RuleCategory},
    page_plugin::SeoPlugin,
};

// Image Plugin
pub struct ImagePlugin {}

impl Default for ImagePlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl ImagePlugin {
    pub fn new() -> Self {
        Self {}
    }
}

impl SeoPlugin for ImagePlugin {
    fn name(&self) -> &str {
        "Image"
    }
    fn description(&self) -> &str {
        "Checks that images carry alternative text"
    }

    fn available_rules(&self) -> Vec<Rule> {
        vec![Rule {
            id: "image-alt",
            name: "Image Alt Text",
            description: "Checks that images have non-empty alt attributes",
            impact: Impact::Medium,
            category: RuleCategory::Content,
            issue: "Some images are missing alt text.",
            fix_title: "Add Alt Text to Images",
            fix_description: "Describe each meaningful image in its alt attribute so screen readers and crawlers understand it.",
            check: |signals, _url| {
                let images = &signals.images;
                if images.missing_alt == 0 {
                    return CheckOutcome::passed(format!("{}/{} images have alt text", images.total, images.total));
                }
                let value = format!("{}/{} images missing alt text", images.missing_alt, images.total);
                // Half or more missing is a failure, anything less a warning.
                if images.missing_alt * 2 >= images.total {
                    CheckOutcome::failed(value)
                } else {
                    CheckOutcome::warning(value)
                }
            },
        }]
    }
}
