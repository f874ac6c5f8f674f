use html_parser::SignalBundle;
use serde::{Deserialize, Serialize};
use specta::Type;

/// Word count at which the length component of the quality score saturates.
pub const TARGET_WORD_COUNT: u32 = 300;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
pub enum ReadabilityLevel {
    #[serde(rename = "Very Easy")]
    VeryEasy,
    #[serde(rename = "Easy")]
    Easy,
    #[serde(rename = "Fairly Easy")]
    FairlyEasy,
    #[serde(rename = "Standard")]
    Standard,
    #[serde(rename = "Fairly Difficult")]
    FairlyDifficult,
    #[serde(rename = "Difficult")]
    Difficult,
    #[serde(rename = "Very Difficult")]
    VeryDifficult,
}

impl ReadabilityLevel {
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 90.0 => Self::VeryEasy,
            s if s >= 80.0 => Self::Easy,
            s if s >= 70.0 => Self::FairlyEasy,
            s if s >= 60.0 => Self::Standard,
            s if s >= 50.0 => Self::FairlyDifficult,
            s if s >= 30.0 => Self::Difficult,
            _ => Self::VeryDifficult,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VeryEasy => "Very Easy",
            Self::Easy => "Easy",
            Self::FairlyEasy => "Fairly Easy",
            Self::Standard => "Standard",
            Self::FairlyDifficult => "Fairly Difficult",
            Self::Difficult => "Difficult",
            Self::VeryDifficult => "Very Difficult",
        }
    }
}

/// Content quality sub-metrics. Percentages keep full precision here and are
/// rounded only in [`crate::ContentAnalysis`].
#[derive(Debug, Clone, PartialEq)]
pub struct ContentMetrics {
    pub word_count: u32,
    pub sentence_count: u32,
    pub paragraph_count: u32,
    pub readability_score: f64,
    pub readability_level: ReadabilityLevel,
    pub heading_hierarchy_valid: bool,
    pub heading_violations: Vec<String>,
    pub image_optimization: f64,
    pub internal_link_ratio: f64,
    pub quality_score: f64,
}

#[derive(Debug, Clone)]
pub struct ContentScorer {
    target_words: u32,
}

impl Default for ContentScorer {
    fn default() -> Self {
        Self::new(TARGET_WORD_COUNT)
    }
}

impl ContentScorer {
    pub fn new(target_words: u32) -> Self {
        Self {
            target_words: target_words.max(1),
        }
    }

    pub fn score(&self, signals: &SignalBundle) -> ContentMetrics {
        let text = &signals.text;
        let readability_score =
            flesch_reading_ease(text.word_count, text.sentence_count, text.syllable_count);
        let heading_violations = signals.headings.violations();
        let image_optimization = image_optimization(signals.images.total, signals.images.missing_alt);

        let length = (f64::from(text.word_count) / f64::from(self.target_words)).min(1.0) * 100.0;
        let structure = if heading_violations.is_empty() {
            100.0
        } else {
            (100.0 - 25.0 * heading_violations.len() as f64).max(0.0)
        };
        let quality_score = 0.3 * length
            + 0.25 * readability_score
            + 0.25 * structure
            + 0.2 * image_optimization;

        ContentMetrics {
            word_count: text.word_count,
            sentence_count: text.sentence_count,
            paragraph_count: text.paragraph_count,
            readability_score,
            readability_level: ReadabilityLevel::from_score(readability_score),
            heading_hierarchy_valid: heading_violations.is_empty(),
            heading_violations,
            image_optimization,
            internal_link_ratio: signals.links.internal_ratio * 100.0,
            quality_score,
        }
    }
}

/// Share of images with effective alt text, 100 when there are no images.
pub fn image_optimization(total: u32, missing_alt: u32) -> f64 {
    if total == 0 {
        return 100.0;
    }
    let with_alt = total.saturating_sub(missing_alt);
    f64::from(with_alt) / f64::from(total) * 100.0
}

/// Flesch reading ease clamped to 0..=100. Empty text scores 0.
pub fn flesch_reading_ease(words: u32, sentences: u32, syllables: u32) -> f64 {
    if words == 0 {
        return 0.0;
    }
    let words = f64::from(words);
    let sentences = f64::from(sentences.max(1));
    let syllables = f64::from(syllables);
    let score = 206.835 - 1.015 * (words / sentences) - 84.6 * (syllables / words);
    score.clamp(0.0, 100.0)
}
