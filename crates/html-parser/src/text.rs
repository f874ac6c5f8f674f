use scraper::node::Node;
use scraper::ElementRef;

use crate::signals::TextSignals;

/// Elements whose text never reaches the reader.
const HIDDEN_ELEMENTS: &[&str] = &[
    "script", "style", "noscript", "template", "svg", "iframe", "object", "head",
];

/// Concatenates the text nodes below `root`, skipping scripts, styles and
/// other non-rendered subtrees. Text nodes are separated by a single space
/// so inline markup never glues two words together.
pub fn visible_text(root: ElementRef<'_>) -> String {
    let mut out = String::new();
    collect_visible_text(root, &mut out);
    out
}

fn collect_visible_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                out.push_str(text);
                out.push(' ');
            }
            Node::Element(el) if !HIDDEN_ELEMENTS.contains(&el.name()) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    collect_visible_text(child_element, out);
                }
            }
            _ => {}
        }
    }
}

/// Word, sentence, syllable and character counts for a block of text.
///
/// Words are whitespace-delimited tokens with at least one alphanumeric
/// character. A sentence ends at a token whose last letter-ish character is
/// `.`, `!` or `?`; text without any terminal punctuation still counts as one
/// sentence.
pub fn text_statistics(text: &str, paragraph_count: u32) -> TextSignals {
    let mut word_count = 0u32;
    let mut sentence_count = 0u32;
    let mut syllable_count = 0u32;
    let mut character_count = 0u32;

    for token in text.split_whitespace() {
        if !token.chars().any(char::is_alphanumeric) {
            continue;
        }
        word_count += 1;

        let word: String = token.chars().filter(|c| c.is_alphanumeric()).collect();
        character_count += word.chars().count() as u32;
        syllable_count += count_syllables(&word);

        if ends_sentence(token) {
            sentence_count += 1;
        }
    }

    if word_count > 0 && sentence_count == 0 {
        sentence_count = 1;
    }

    TextSignals {
        word_count,
        sentence_count,
        paragraph_count,
        syllable_count,
        character_count,
    }
}

fn ends_sentence(token: &str) -> bool {
    token
        .trim_end_matches(|c: char| matches!(c, '"' | '\'' | ')' | ']' | '”' | '’' | '»'))
        .ends_with(['.', '!', '?'])
}

/// Vowel-group heuristic, good enough for readability bands.
pub fn count_syllables(word: &str) -> u32 {
    let word = word.to_lowercase();
    if word.is_empty() {
        return 0;
    }
    if word.chars().all(|c| c.is_ascii_digit()) {
        return 1;
    }

    let mut count = 0u32;
    let mut previous_vowel = false;
    for c in word.chars() {
        let vowel = matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y');
        if vowel && !previous_vowel {
            count += 1;
        }
        previous_vowel = vowel;
    }

    if word.ends_with('e') && !word.ends_with("le") && count > 1 {
        count -= 1;
    }

    count.max(1)
}
