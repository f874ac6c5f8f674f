use html_parser::link_parser::same_site;

use crate::utils::{
    config::{CheckOutcome, Impact, Rule, RuleCategory},
    page_plugin::SeoPlugin,
};

// Seo Basic Plugin
pub struct SeoBasicPlugin {}

impl Default for SeoBasicPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl SeoBasicPlugin {
    pub fn new() -> Self {
        Self {}
    }
}

impl SeoPlugin for SeoBasicPlugin {
    fn name(&self) -> &str {
        "SEO Basic"
    }
    fn description(&self) -> &str {
        "Indexing, canonicalization, encoding and social sharing basics"
    }

    fn available_rules(&self) -> Vec<Rule> {
        vec![
            Rule {
                id: "indexable",
                name: "Search Indexing",
                description: "Checks that the robots meta tag does not block indexing",
                impact: Impact::High,
                category: RuleCategory::Technical,
                issue: "A robots meta tag tells search engines not to index this page.",
                fix_title: "Allow Search Engine Indexing",
                fix_description: "Remove noindex from the robots meta tag unless the page should stay out of search results.",
                check: |signals, _url| {
                    if signals.meta.is_noindex() {
                        CheckOutcome::failed("Blocked by robots meta tag")
                    } else {
                        CheckOutcome::passed("Indexable")
                    }
                },
            },
            Rule {
                id: "canonical",
                name: "Canonical URL",
                description: "Checks that the page declares a canonical URL on the same site",
                impact: Impact::Low,
                category: RuleCategory::Technical,
                issue: "The page has no canonical URL, or it points to another site.",
                fix_title: "Add a Canonical URL",
                fix_description: "Add a link rel=\"canonical\" tag pointing to the preferred URL of this page.",
                check: |signals, url| {
                    let Some(canonical) = signals.meta.canonical.as_deref() else {
                        return CheckOutcome::warning("Missing");
                    };
                    match url.join(canonical) {
                        Ok(target) if same_site(&target, url) => CheckOutcome::passed(target.to_string()),
                        Ok(target) => CheckOutcome::warning(format!("Points off-site: {target}")),
                        Err(_) => CheckOutcome::warning(format!("Invalid: {canonical}")),
                    }
                },
            },
            Rule {
                id: "charset",
                name: "Character Encoding",
                description: "Checks that the page declares its character encoding",
                impact: Impact::Low,
                category: RuleCategory::Technical,
                issue: "The page does not declare a character encoding.",
                fix_title: "Declare Character Encoding",
                fix_description: "Add <meta charset=\"utf-8\"> as the first element in the head.",
                check: |signals, _url| match signals.meta.charset.as_deref() {
                    Some(charset) if !charset.is_empty() => CheckOutcome::passed(charset),
                    _ => CheckOutcome::warning("Missing"),
                },
            },
            Rule {
                id: "sitemap",
                name: "Sitemap Link",
                description: "Checks that the page links to a sitemap",
                impact: Impact::Low,
                category: RuleCategory::Technical,
                issue: "No sitemap link was found on the page.",
                fix_title: "Link Your Sitemap",
                fix_description: "Publish an XML sitemap and reference it with a link rel=\"sitemap\" tag.",
                check: |signals, _url| match signals.meta.sitemap.as_deref() {
                    Some(sitemap) if !sitemap.is_empty() => CheckOutcome::passed(sitemap),
                    _ => CheckOutcome::warning("Missing"),
                },
            },
            Rule {
                id: "html-lang",
                name: "Language Attribute",
                description: "Checks that the html element declares a language",
                impact: Impact::Low,
                category: RuleCategory::Ux,
                issue: "The html element has no lang attribute.",
                fix_title: "Declare the Page Language",
                fix_description: "Set the lang attribute on the html element, e.g. <html lang=\"en\">.",
                check: |signals, _url| match signals.meta.lang.as_deref() {
                    Some(lang) => CheckOutcome::passed(lang),
                    None => CheckOutcome::failed("Missing"),
                },
            },
            Rule {
                id: "open-graph",
                name: "Open Graph Tags",
                description: "Checks for og:title and og:description tags",
                impact: Impact::Low,
                category: RuleCategory::Ux,
                issue: "Open Graph title or description is missing, so shared links render poorly.",
                fix_title: "Add Open Graph Tags",
                fix_description: "Add og:title and og:description meta tags for social sharing previews.",
                check: |signals, _url| {
                    let og = &signals.meta.og_tags;
                    let missing: Vec<&str> = ["title", "description"]
                        .into_iter()
                        .filter(|key| og.get(*key).is_none_or(|value| value.is_empty()))
                        .collect();
                    if missing.is_empty() {
                        CheckOutcome::passed("Present")
                    } else {
                        let names: Vec<String> = missing.iter().map(|key| format!("og:{key}")).collect();
                        CheckOutcome::warning(format!("Missing {}", names.join(", ")))
                    }
                },
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::config::{CheckStatus, RuleConfig, TechnicalCheck};
    use html_parser::PageParser;
    use url::Url;

    fn analyze(html: &str, url: &str) -> Vec<TechnicalCheck> {
        let plugin = SeoBasicPlugin::new();
        let mut config = RuleConfig::new();
        for rule in plugin.available_rules() {
            config.enable_rule(rule.id);
        }
        let url = Url::parse(url).unwrap();
        let signals = PageParser::from_url(url.clone()).extract(html);
        plugin.analyze(&signals, &url, &config)
    }

    fn find<'a>(results: &'a [TechnicalCheck], id: &str) -> &'a TechnicalCheck {
        results.iter().find(|result| result.id == id).unwrap()
    }

    #[test]
    fn test_seo_basic_success() {
        let html = r#"<html lang="en"><head>
            <meta charset="utf-8">
            <link rel="canonical" href="/about">
            <link rel="sitemap" href="/sitemap.xml">
            <meta property="og:title" content="About">
            <meta property="og:description" content="About us">
        </head></html>"#;
        let results = analyze(html, "https://www.example.com/about");
        assert_eq!(results.len(), 6);
        for result in &results {
            assert_eq!(
                result.status,
                CheckStatus::Passed,
                "Rule {} should have passed",
                result.id
            );
        }
        assert_eq!(find(&results, "canonical").value, "https://www.example.com/about");
        assert_eq!(find(&results, "charset").value, "utf-8");
    }

    #[test]
    fn test_seo_basic_failure() {
        let results = analyze("<html><head></head></html>", "https://example.com");
        assert_eq!(find(&results, "indexable").status, CheckStatus::Passed);
        assert_eq!(find(&results, "canonical").status, CheckStatus::Warning);
        assert_eq!(find(&results, "charset").status, CheckStatus::Warning);
        assert_eq!(find(&results, "sitemap").status, CheckStatus::Warning);
        assert_eq!(find(&results, "html-lang").status, CheckStatus::Failed);
        let og = find(&results, "open-graph");
        assert_eq!(og.status, CheckStatus::Warning);
        assert_eq!(og.value, "Missing og:title, og:description");
    }

    #[test]
    fn test_noindex_fails() {
        let html = r#"<html><head><meta name="robots" content="NOINDEX, follow"></head></html>"#;
        let results = analyze(html, "https://example.com");
        assert_eq!(find(&results, "indexable").status, CheckStatus::Failed);
    }

    #[test]
    fn test_off_site_canonical_warns() {
        let html = r#"<html><head><link rel="canonical" href="https://other.org/page"></head></html>"#;
        let results = analyze(html, "https://example.com/page");
        let canonical = find(&results, "canonical");
        assert_eq!(canonical.status, CheckStatus::Warning);
        assert!(canonical.value.contains("other.org"));
    }
}
