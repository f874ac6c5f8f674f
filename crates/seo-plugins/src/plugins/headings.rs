use crate::utils::{
    config::{CheckOutcome, Impact, Rule, RuleCategory},
    page_plugin::SeoPlugin,
};

pub struct HeadingsPlugin {}

impl Default for HeadingsPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadingsPlugin {
    pub fn new() -> Self {
        Self {}
    }
}

impl SeoPlugin for HeadingsPlugin {
    fn name(&self) -> &str {
        "Headings"
    }
    fn description(&self) -> &str {
        "Headings outline the page for readers and crawlers. A page should have a single H1
 and nest the rest without skipping levels."
    }

    fn available_rules(&self) -> Vec<Rule> {
        vec![
            Rule {
                id: "h1",
                name: "H1 Heading",
                description: "Checks that the page has exactly one H1 heading",
                impact: Impact::Medium,
                category: RuleCategory::Content,
                issue: "The page should have exactly one H1 heading.",
                fix_title: "Add a Single H1 Heading",
                fix_description: "Give the page one H1 that states its main topic and demote any extra H1s.",
                check: |signals, _url| match signals.headings.h1 {
                    0 => CheckOutcome::failed("Missing"),
                    1 => CheckOutcome::passed("1 H1 heading"),
                    count => CheckOutcome::warning(format!("{count} H1 headings")),
                },
            },
            Rule {
                id: "heading-hierarchy",
                name: "Heading Structure",
                description: "Checks that heading levels start at H1 and never skip a level",
                impact: Impact::Low,
                category: RuleCategory::Content,
                issue: "Heading levels are out of order.",
                fix_title: "Fix Heading Hierarchy",
                fix_description: "Nest headings in order (H1, then H2, then H3) without skipping levels.",
                check: |signals, _url| {
                    let violations = signals.headings.violations();
                    if violations.is_empty() {
                        CheckOutcome::passed("Valid")
                    } else {
                        CheckOutcome::warning(violations.join("; "))
                    }
                },
            },
        ]
    }
}
