use crate::utils::{
    config::{CheckOutcome, Impact, Rule, RuleCategory},
    page_plugin::SeoPlugin,
};

pub struct MobilePlugin {}

impl Default for MobilePlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl MobilePlugin {
    pub fn new() -> Self {
        Self {}
    }
}

/// True when the viewport content stops users from zooming.
fn blocks_zoom(viewport: &str) -> bool {
    viewport
        .split([',', ';'])
        .filter_map(|directive| directive.split_once('='))
        .any(|(key, value)| {
            let value = value.trim().to_ascii_lowercase();
            match key.trim().to_ascii_lowercase().as_str() {
                "user-scalable" => value == "no" || value == "0",
                "maximum-scale" => value.parse::<f64>().is_ok_and(|scale| scale <= 1.0),
                _ => false,
            }
        })
}

impl SeoPlugin for MobilePlugin {
    fn name(&self) -> &str {
        "Mobile & Navigation"
    }
    fn description(&self) -> &str {
        "Mobile rendering and internal navigation"
    }

    fn available_rules(&self) -> Vec<Rule> {
        vec![
            Rule {
                id: "mobile-viewport",
                name: "Mobile Viewport",
                description: "Checks for a responsive viewport meta tag",
                impact: Impact::Medium,
                category: RuleCategory::Ux,
                issue: "The page has no responsive viewport, or it prevents zooming.",
                fix_title: "Add a Responsive Viewport",
                fix_description: "Add <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\"> and allow zooming.",
                check: |signals, _url| {
                    let Some(viewport) = signals.meta.viewport.as_deref() else {
                        return CheckOutcome::failed("Missing");
                    };
                    if !viewport.to_ascii_lowercase().replace(' ', "").contains("width=device-width") {
                        CheckOutcome::failed(format!("Not responsive: {viewport}"))
                    } else if blocks_zoom(viewport) {
                        CheckOutcome::warning(format!("Zoom disabled: {viewport}"))
                    } else {
                        CheckOutcome::passed(viewport)
                    }
                },
            },
            Rule {
                id: "internal-links",
                name: "Internal Links",
                description: "Checks that the page links to other pages on the same site",
                impact: Impact::Low,
                category: RuleCategory::Ux,
                issue: "The page has no internal links.",
                fix_title: "Add Internal Links",
                fix_description: "Link to related pages on your site to help visitors and crawlers navigate.",
                check: |signals, _url| match signals.links.internal {
                    0 => CheckOutcome::warning("0 internal links"),
                    count => CheckOutcome::passed(format!("{count} internal links")),
                },
            },
        ]
    }
}
