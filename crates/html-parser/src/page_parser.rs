use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

use crate::link_parser::{parse_base_url, parse_link, LinkParseError, LinkType};
use crate::signals::{
    HeadingSignals, ImageSignals, LinkSignals, MetaSignals, SecuritySignals, SignalBundle,
    TextSignals, SIGNAL_BUNDLE_VERSION,
};
use crate::text::{text_statistics, visible_text};

const PARAGRAPH_SELECTOR: &str = "p, blockquote, pre";

/// Turns rendered HTML into a [`SignalBundle`].
///
/// Extraction is total: broken markup, missing `<head>`/`<body>` or an empty
/// document all produce zero-valued signals.
pub struct PageParser {
    base_url: Url,
}

impl PageParser {
    pub fn new(final_url: &str) -> Result<Self, LinkParseError> {
        Ok(Self {
            base_url: parse_base_url(final_url)?,
        })
    }

    pub fn from_url(final_url: Url) -> Self {
        Self {
            base_url: final_url,
        }
    }

    pub fn extract(&self, html: &str) -> SignalBundle {
        let document = Html::parse_document(html);

        let bundle = SignalBundle {
            version: SIGNAL_BUNDLE_VERSION,
            final_url: self.base_url.to_string(),
            meta: self.extract_meta_tags(&document),
            headings: self.extract_headings(&document),
            images: self.extract_images(&document),
            links: self.extract_links(&document),
            text: self.extract_text(&document),
            security: SecuritySignals {
                is_https: self.base_url.scheme() == "https",
            },
        };

        debug!(
            url = %self.base_url,
            words = bundle.text.word_count,
            headings = bundle.headings.total(),
            images = bundle.images.total,
            links = bundle.links.total,
            "extracted page signals"
        );

        bundle
    }

    pub fn extract_meta_tags(&self, document: &Html) -> MetaSignals {
        let mut meta_tags = MetaSignals::default();

        if let Some(title) = select_all(document, "title").into_iter().next() {
            let title = normalize_text(&title.text().collect::<String>());
            meta_tags.title_length = title.chars().count() as u32;
            meta_tags.title = Some(title);
        }

        meta_tags.lang = select_all(document, "html")
            .into_iter()
            .next()
            .and_then(|html| html.value().attr("lang"))
            .map(str::trim)
            .filter(|lang| !lang.is_empty())
            .map(str::to_string);

        for link in select_all(document, "link[rel]") {
            let Some(href) = link.value().attr("href").map(str::trim) else {
                continue;
            };
            let rel = link.value().attr("rel").unwrap_or_default().to_ascii_lowercase();
            let rels: Vec<&str> = rel.split_whitespace().collect();
            if rels.contains(&"canonical") && meta_tags.canonical.is_none() {
                meta_tags.canonical = Some(href.to_string());
            }
            if rels.contains(&"sitemap") && meta_tags.sitemap.is_none() {
                meta_tags.sitemap = Some(href.to_string());
            }
            if rels.contains(&"icon") && meta_tags.favicon.is_none() {
                meta_tags.favicon = Some(href.to_string());
            }
        }

        for meta in select_all(document, "meta") {
            let element = meta.value();
            if let Some(charset) = element.attr("charset") {
                meta_tags.charset = Some(charset.trim().to_string());
            }
            if let Some(http_equiv) = element.attr("http-equiv") {
                if http_equiv.eq_ignore_ascii_case("content-type") && meta_tags.charset.is_none() {
                    meta_tags.charset = element
                        .attr("content")
                        .and_then(charset_from_content_type);
                }
            }

            let content = element.attr("content").map(normalize_text);
            if let Some(name) = element.attr("name") {
                match name.to_ascii_lowercase().as_str() {
                    "description" if meta_tags.description.is_none() => {
                        if let Some(description) = content.clone() {
                            meta_tags.description_length = description.chars().count() as u32;
                            meta_tags.description = Some(description);
                        }
                    }
                    "robots" => meta_tags.robots = content.clone(),
                    "viewport" => meta_tags.viewport = content.clone(),
                    _ => {}
                }
            }
            if let Some(property) = element.attr("property") {
                if let (Some(key), Some(value)) = (property.strip_prefix("og:"), content) {
                    meta_tags.og_tags.insert(key.to_string(), value);
                }
            }
        }

        meta_tags
    }

    pub fn extract_headings(&self, document: &Html) -> HeadingSignals {
        let sequence = select_all(document, "h1, h2, h3, h4, h5, h6")
            .into_iter()
            .filter_map(|heading| heading_level(heading.value().name()))
            .collect();
        HeadingSignals::from_sequence(sequence)
    }

    pub fn extract_images(&self, document: &Html) -> ImageSignals {
        let mut images = ImageSignals::default();
        for img in select_all(document, "img") {
            images.total += 1;
            match img.value().attr("alt") {
                None => images.alt_absent += 1,
                Some(alt) if alt.trim().is_empty() => images.alt_empty += 1,
                Some(_) => {}
            }
        }
        images.missing_alt = images.alt_absent + images.alt_empty;
        images
    }

    pub fn extract_links(&self, document: &Html) -> LinkSignals {
        let (mut internal, mut external, mut other) = (0u32, 0u32, 0u32);

        for anchor in select_all(document, "a[href]") {
            let href = anchor.value().attr("href").unwrap_or_default();
            match parse_link(href, &self.base_url).map(|link| link.link_type) {
                Ok(LinkType::Internal) => internal += 1,
                Ok(LinkType::External) => external += 1,
                Ok(_) => other += 1,
                Err(e) => {
                    debug!(href, error = %e, "skipping unparseable link");
                    other += 1;
                }
            }
        }

        LinkSignals::new(internal, external, other)
    }

    pub fn extract_text(&self, document: &Html) -> TextSignals {
        let text = select_all(document, "body")
            .into_iter()
            .next()
            .map(visible_text)
            .unwrap_or_else(|| visible_text(document.root_element()));

        let paragraph_count = select_all(document, PARAGRAPH_SELECTOR)
            .into_iter()
            .filter(|block| !visible_text(*block).trim().is_empty())
            .count() as u32;

        text_statistics(&text, paragraph_count)
    }
}

/// Convenience wrapper over [`PageParser::extract`].
pub fn extract_signals(html: &str, final_url: &Url) -> SignalBundle {
    PageParser::from_url(final_url.clone()).extract(html)
}

fn select_all<'a>(document: &'a Html, selector: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(selector) {
        Ok(selector) => document.select(&selector).collect(),
        Err(_) => Vec::new(),
    }
}

fn normalize_text(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn heading_level(name: &str) -> Option<u8> {
    match name {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}

fn charset_from_content_type(content: &str) -> Option<String> {
    content
        .split(';')
        .filter_map(|part| part.trim().split_once('='))
        .find(|(key, _)| key.trim().eq_ignore_ascii_case("charset"))
        .map(|(_, value)| value.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> PageParser {
        PageParser::new("https://example.com/blog/post").unwrap()
    }

    #[test]
    fn test_extract_meta_tags() {
        let html = r#"
                <html lang="en">
                    <head>
                        <meta charset="utf-8">
                        <title>  Test
                            Page </title>
                        <meta name="description" content="This is a test description">
                        <meta name="robots" content="index, follow">
                        <meta name="viewport" content="width=device-width, initial-scale=1">
                        <meta property="og:title" content="Test OG Title">
                        <link rel="canonical" href="https://example.com/blog/post">
                        <link rel="sitemap" href="https://example.com/sitemap.xml">
                        <link rel="shortcut icon" href="/favicon.ico">
                    </head>
                </html>
            "#;
        let signals = parser().extract(html);
        let meta = signals.meta;

        assert_eq!(meta.title, Some("Test Page".to_string()));
        assert_eq!(meta.title_length, 9);
        assert_eq!(
            meta.description,
            Some("This is a test description".to_string())
        );
        assert_eq!(meta.description_length, 26);
        assert_eq!(meta.robots, Some("index, follow".to_string()));
        assert_eq!(meta.charset, Some("utf-8".to_string()));
        assert_eq!(meta.lang, Some("en".to_string()));
        assert_eq!(
            meta.viewport,
            Some("width=device-width, initial-scale=1".to_string())
        );
        assert_eq!(meta.og_tags.get("title"), Some(&"Test OG Title".to_string()));
        assert_eq!(
            meta.canonical,
            Some("https://example.com/blog/post".to_string())
        );
        assert_eq!(
            meta.sitemap,
            Some("https://example.com/sitemap.xml".to_string())
        );
        assert_eq!(meta.favicon, Some("/favicon.ico".to_string()));
    }

    #[test]
    fn test_charset_from_http_equiv() {
        let html = r#"<html><head><meta http-equiv="Content-Type" content="text/html; charset=ISO-8859-1"></head></html>"#;
        let signals = parser().extract(html);
        assert_eq!(signals.meta.charset, Some("ISO-8859-1".to_string()));
    }

    #[test]
    fn test_extract_headings() {
        let html = r#"
                <html>
                    <body>
                        <h1>Main Heading</h1>
                        <h3>Skipped</h3>
                        <h2>Subheading</h2>
                        <h2>Another Subheading</h2>
                    </body>
                </html>
            "#;
        let headings = parser().extract(html).headings;

        assert_eq!(headings.h1, 1);
        assert_eq!(headings.h2, 2);
        assert_eq!(headings.h3, 1);
        assert_eq!(headings.ordered_sequence, vec![1, 3, 2, 2]);
    }

    #[test]
    fn test_extract_images() {
        let html = r#"
            <html><body>
                <img src="a.jpg" alt="A photo">
                <img src="b.jpg" alt="">
                <img src="c.jpg" alt="   ">
                <img src="d.jpg">
            </body></html>
        "#;
        let images = parser().extract(html).images;
        assert_eq!(images.total, 4);
        assert_eq!(images.alt_absent, 1);
        assert_eq!(images.alt_empty, 2);
        assert_eq!(images.missing_alt, 3);
        assert_eq!(images.with_alt(), 1);
    }

    #[test]
    fn test_extract_links() {
        let html = r##"
                <html>
                    <body>
                        <a href="/page1">Page 1</a>
                        <a href="page2">Page 2</a>
                        <a href="https://shop.example.com/">Shop</a>
                        <a href="https://external.com">External</a>
                        <a href="mailto:hi@example.com">Mail</a>
                        <a href="#top">Top</a>
                        <a>No href</a>
                    </body>
                </html>
            "##;
        let links = parser().extract(html).links;

        assert_eq!(links.internal, 3);
        assert_eq!(links.external, 1);
        assert_eq!(links.total, 4);
        assert_eq!(links.other, 2);
        assert_eq!(links.internal_ratio, 0.75);
    }

    #[test]
    fn test_extract_text() {
        let html = r#"
            <html>
                <head><title>Ignored title words</title></head>
                <body>
                    <p>First paragraph. It has two sentences.</p>
                    <p>   </p>
                    <blockquote>Quoted text!</blockquote>
                    <script>console.log("not counted");</script>
                </body>
            </html>
        "#;
        let text = parser().extract(html).text;
        assert_eq!(text.word_count, 8);
        assert_eq!(text.sentence_count, 3);
        assert_eq!(text.paragraph_count, 2);
    }

    #[test]
    fn test_security_from_final_url() {
        let https = parser().extract("<html></html>");
        assert!(https.security.is_https);

        let http = PageParser::new("http://example.com").unwrap().extract("<html></html>");
        assert!(!http.security.is_https);
    }

    #[test]
    fn test_malformed_html_degrades_to_empty_signals() {
        for html in ["", "<<<>>>", "<html><body><p>unclosed <b>tags", "not html at all"] {
            let signals = parser().extract(html);
            assert_eq!(signals.version, SIGNAL_BUNDLE_VERSION);
            assert_eq!(signals.images.total, 0);
            assert_eq!(signals.links.total, 0);
            assert_eq!(signals.links.internal_ratio, 0.0);
            assert_eq!(signals.headings.total(), 0);
            assert!(signals.meta.title.is_none());
        }
    }

    #[test]
    fn test_bundle_serializes_camel_case() {
        let signals = parser().extract("<html><body><h1>Hi</h1></body></html>");
        let json = serde_json::to_value(&signals).unwrap();
        assert_eq!(json["finalUrl"], "https://example.com/blog/post");
        assert_eq!(json["headings"]["orderedSequence"][0], 1);
        assert_eq!(json["security"]["isHttps"], true);
    }
}
