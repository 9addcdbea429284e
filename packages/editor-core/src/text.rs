//! Text normalization utilities for provision content.
//!
//! Provision text is an HTML-constrained fragment. Rules that look at the
//! beginning or the end of a text work on a normalized form: markup stripped,
//! a few entities decoded, NFC-composed and whitespace collapsed.

use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

/// Regex pattern for any markup tag.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));

/// Regex pattern for a well-formed tag: captures closing slash, name and self-closing slash.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static HTML_TAG_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<(/?)([a-zA-Z][a-zA-Z0-9]*)(?:\s+[^<>]*?)?\s*(/?)>"#).expect("valid regex")
});

/// Regex pattern for runs of whitespace.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static WHITESPACE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Elements that never carry a closing tag.
const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "wbr"];

/// Entities the editor surface commonly emits.
const ENTITIES: &[(&str, &str)] = &[
    ("&nbsp;", " "),
    ("&#8220;", "\u{201C}"),
    ("&#8221;", "\u{201D}"),
    ("&quot;", "\""),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&amp;", "&"),
];

/// Check whether the text carries any markup.
pub fn contains_tags(text: &str) -> bool {
    TAG_PATTERN.is_match(text)
}

/// Remove markup and decode the common entities.
pub fn strip_tags(text: &str) -> String {
    let mut result = TAG_PATTERN.replace_all(text, "").to_string();
    for (entity, replacement) in ENTITIES {
        result = result.replace(entity, replacement);
    }
    result
}

/// Normalize text for indicator matching.
///
/// Strips markup, composes to NFC, collapses whitespace runs into a single
/// space and trims both ends.
pub fn normalize(text: &str) -> String {
    let stripped: String = strip_tags(text).nfc().collect();
    WHITESPACE_PATTERN
        .replace_all(&stripped, " ")
        .trim()
        .to_string()
}

/// Number of characters of the stripped, trimmed text.
pub fn visible_len(text: &str) -> usize {
    strip_tags(text).trim().chars().count()
}

/// Last visible character of the text.
pub fn last_char(text: &str) -> Option<char> {
    normalize(text).chars().last()
}

/// Check whether the visible text ends with a punctuation mark.
pub fn ends_with_punctuation(text: &str) -> bool {
    matches!(
        last_char(text),
        Some('.' | ',' | ';' | ':' | '!' | '?')
    )
}

/// Check whether the visible text starts with an upper-case letter.
pub fn starts_with_uppercase(text: &str) -> bool {
    normalize(text)
        .chars()
        .next()
        .is_some_and(char::is_uppercase)
}

/// Check whether the visible text starts with an ellipsis marker (three or more dots).
pub fn starts_with_ellipsis(text: &str) -> bool {
    normalize(text).starts_with("...")
}

/// Check whether the visible text is only dots (an omissis line).
pub fn is_dots_only(text: &str) -> bool {
    let normalized = normalize(text);
    !normalized.is_empty() && normalized.chars().all(|c| c == '.' || c == '\u{2026}')
}

/// Check that markup in the text is well formed.
///
/// Every opening tag must be closed in nesting order, void elements and
/// self-closing tags are accepted, and a `<` that does not start a tag
/// makes the fragment invalid.
pub fn is_valid_html(text: &str) -> bool {
    let mut stack: Vec<String> = Vec::new();
    let mut cursor = 0;

    for captures in HTML_TAG_PATTERN.captures_iter(text) {
        let Some(whole) = captures.get(0) else {
            continue;
        };

        if text[cursor..whole.start()].contains('<') {
            return false;
        }
        cursor = whole.end();

        let closing = captures.get(1).is_some_and(|m| !m.as_str().is_empty());
        let self_closing = captures.get(3).is_some_and(|m| !m.as_str().is_empty());
        let name = captures
            .get(2)
            .map(|m| m.as_str().to_lowercase())
            .unwrap_or_default();

        if closing {
            if stack.pop().as_deref() != Some(name.as_str()) {
                return false;
            }
        } else if !self_closing && !VOID_ELEMENTS.contains(&name.as_str()) {
            stack.push(name);
        }
    }

    !text[cursor..].contains('<') && stack.is_empty()
}
