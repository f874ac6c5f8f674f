use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use specta::Type;

/// Bumped whenever a field is added to or removed from [`SignalBundle`].
pub const SIGNAL_BUNDLE_VERSION: u32 = 1;

/// Everything the scorers know about a rendered page.
///
/// Produced once per analysis by [`crate::page_parser::PageParser`] and only
/// ever read afterwards. Missing markup shows up as `None`, `0` or an empty
/// collection, never as an error.
#[derive(Debug, Clone, Serialize, Deserialize, Type, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SignalBundle {
    pub version: u32,
    pub final_url: String,
    pub meta: MetaSignals,
    pub headings: HeadingSignals,
    pub images: ImageSignals,
    pub links: LinkSignals,
    pub text: TextSignals,
    pub security: SecuritySignals,
}

impl SignalBundle {
    pub fn word_count(&self) -> u32 {
        self.text.word_count
    }

    pub fn sentence_count(&self) -> u32 {
        self.text.sentence_count
    }

    pub fn paragraph_count(&self) -> u32 {
        self.text.paragraph_count
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Type, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MetaSignals {
    pub title: Option<String>,
    pub title_length: u32,
    pub description: Option<String>,
    pub description_length: u32,
    pub viewport: Option<String>,
    pub robots: Option<String>,
    pub canonical: Option<String>,
    pub charset: Option<String>,
    pub lang: Option<String>,
    pub sitemap: Option<String>,
    pub favicon: Option<String>,
    pub og_tags: HashMap<String, String>,
}

impl MetaSignals {
    pub fn has_title(&self) -> bool {
        self.title_length > 0
    }

    pub fn has_description(&self) -> bool {
        self.description_length > 0
    }

    pub fn is_noindex(&self) -> bool {
        self.robots
            .as_deref()
            .map(|robots| robots.to_ascii_lowercase().contains("noindex"))
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Type, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HeadingSignals {
    pub h1: u32,
    pub h2: u32,
    pub h3: u32,
    pub h4: u32,
    pub h5: u32,
    pub h6: u32,
    /// Heading levels (1..=6) in document order.
    pub ordered_sequence: Vec<u8>,
}

impl HeadingSignals {
    pub fn from_sequence(sequence: Vec<u8>) -> Self {
        let mut headings = Self::default();
        for level in &sequence {
            match level {
                1 => headings.h1 += 1,
                2 => headings.h2 += 1,
                3 => headings.h3 += 1,
                4 => headings.h4 += 1,
                5 => headings.h5 += 1,
                6 => headings.h6 += 1,
                _ => {}
            }
        }
        headings.ordered_sequence = sequence
            .into_iter()
            .filter(|level| (1..=6).contains(level))
            .collect();
        headings
    }

    pub fn count(&self, level: u8) -> u32 {
        match level {
            1 => self.h1,
            2 => self.h2,
            3 => self.h3,
            4 => self.h4,
            5 => self.h5,
            6 => self.h6,
            _ => 0,
        }
    }

    pub fn total(&self) -> u32 {
        self.h1 + self.h2 + self.h3 + self.h4 + self.h5 + self.h6
    }

    /// Human readable hierarchy problems, in document order.
    ///
    /// A page is expected to open with exactly one H1 and never jump down
    /// more than one level at a time. Going back up any number of levels is
    /// fine.
    pub fn violations(&self) -> Vec<String> {
        let mut violations = Vec::new();

        if self.h1 == 0 {
            violations.push("No H1 heading found".to_string());
        } else if self.h1 > 1 {
            violations.push(format!("Multiple H1 headings found ({})", self.h1));
        }

        if let Some(&first) = self.ordered_sequence.first() {
            if first != 1 {
                violations.push(format!("First heading is H{first}, expected H1"));
            }
        }

        for pair in self.ordered_sequence.windows(2) {
            let (previous, current) = (pair[0], pair[1]);
            if current > previous + 1 {
                let skipped = (previous + 1..current)
                    .map(|level| format!("H{level}"))
                    .collect::<Vec<_>>()
                    .join(", ");
                violations.push(format!(
                    "H{current} follows H{previous} directly, skipping {skipped}"
                ));
            }
        }

        violations
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Type, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImageSignals {
    pub total: u32,
    /// Images without an effective alt text: absent plus empty.
    pub missing_alt: u32,
    pub alt_absent: u32,
    pub alt_empty: u32,
}

impl ImageSignals {
    pub fn with_alt(&self) -> u32 {
        self.total.saturating_sub(self.missing_alt)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Type, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LinkSignals {
    pub internal: u32,
    pub external: u32,
    /// `internal + external`; anchors that do not navigate to a page are
    /// counted in `other` instead.
    pub total: u32,
    pub other: u32,
    pub internal_ratio: f64,
}

impl LinkSignals {
    pub fn new(internal: u32, external: u32, other: u32) -> Self {
        let total = internal + external;
        Self {
            internal,
            external,
            total,
            other,
            internal_ratio: internal_link_ratio(internal, total),
        }
    }
}

/// `internal / total`, or `0.0` for a page without links.
pub fn internal_link_ratio(internal: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    f64::from(internal) / f64::from(total)
}

#[derive(Debug, Clone, Serialize, Deserialize, Type, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TextSignals {
    pub word_count: u32,
    pub sentence_count: u32,
    pub paragraph_count: u32,
    pub syllable_count: u32,
    pub character_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Type, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SecuritySignals {
    pub is_https: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_ratio_without_links() {
        assert_eq!(internal_link_ratio(0, 0), 0.0);
        let links = LinkSignals::new(0, 0, 3);
        assert_eq!(links.total, 0);
        assert_eq!(links.internal_ratio, 0.0);
    }

    #[test]
    fn test_link_ratio() {
        let links = LinkSignals::new(3, 1, 0);
        assert_eq!(links.total, 4);
        assert_eq!(links.internal_ratio, 0.75);
    }

    #[test]
    fn test_heading_counts_from_sequence() {
        let headings = HeadingSignals::from_sequence(vec![1, 2, 2, 3, 7]);
        assert_eq!(headings.h1, 1);
        assert_eq!(headings.h2, 2);
        assert_eq!(headings.h3, 1);
        assert_eq!(headings.total(), 4);
        assert_eq!(headings.ordered_sequence, vec![1, 2, 2, 3]);
    }

    #[test]
    fn test_valid_hierarchy() {
        let headings = HeadingSignals::from_sequence(vec![1, 2, 3, 2, 3, 4, 2]);
        assert!(headings.violations().is_empty());
    }

    #[test]
    fn test_skipped_level() {
        let headings = HeadingSignals::from_sequence(vec![1, 3]);
        assert_eq!(
            headings.violations(),
            vec!["H3 follows H1 directly, skipping H2".to_string()]
        );
    }

    #[test]
    fn test_missing_and_multiple_h1() {
        let missing = HeadingSignals::from_sequence(vec![2, 3]);
        let violations = missing.violations();
        assert!(violations.contains(&"No H1 heading found".to_string()));
        assert!(violations.contains(&"First heading is H2, expected H1".to_string()));

        let multiple = HeadingSignals::from_sequence(vec![1, 2, 1]);
        assert_eq!(
            multiple.violations(),
            vec!["Multiple H1 headings found (2)".to_string()]
        );
    }

    #[test]
    fn test_noindex_is_case_insensitive() {
        let meta = MetaSignals {
            robots: Some("NOINDEX, follow".to_string()),
            ..Default::default()
        };
        assert!(meta.is_noindex());
        assert!(!MetaSignals::default().is_noindex());
    }
}
