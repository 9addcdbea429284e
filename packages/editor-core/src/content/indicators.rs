//! Recognition of punctuation indicators and fixed legal phrases.
//!
//! All matching works on [`text::normalize`]d text, so markup, entities and
//! irregular spacing do not affect the outcome.

use regex::Regex;
use std::sync::LazyLock;

use crate::config::{DEFAULT_AMENDMENT_TEXT, OMISSIS_TEXT};
use crate::model::ProvisionKind;
use crate::text;

/// Phrases with which an article introduces amendment blocks.
pub const INTRODUCES_AMENDMENT_PHRASES: [&str; 4] = [
    "o seguinte acréscimo:",
    "os seguintes acréscimos:",
    "passa a vigorar com a seguinte alteração:",
    "passa a vigorar com as seguintes alterações:",
];

/// Regex for a directly quoted sentence closing the text: `: “... .”`
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static CITATION_AT_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#".*:\s{1,2}["”“].*[.]["”“]$"#).expect("valid regex"));

/// Regex for the amendment block closing token `.” (NR)`.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static AMENDMENT_CLOSING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\.["”]\s*\(NR\)\s*$"#).expect("valid regex"));

/// Regex for a text ending in any quote.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static ENDS_WITH_QUOTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"["”“]$"#).expect("valid regex"));

/// Regex for a closing quote followed later by the (NR) marker.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static CLOSING_QUOTE_WITH_NR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"”.*\(NR\)").expect("valid regex"));

/// Regex for a placeholder made of dots, an optional quote and (NR).
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static PLACEHOLDER_WITH_NR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^\.*\s*["”“]?\s*\(NR\)\s*$"#).expect("valid regex"));

/// Regex for any text ending with (NR).
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static ENDS_WITH_NR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"["”]?\s*\(NR\)?\s*$"#).expect("valid regex"));

/// Check whether the text ends with the kind's expansion indicator.
pub fn has_expansion_indicator(kind: ProvisionKind, content: &str) -> bool {
    kind.indicators()
        .is_some_and(|indicators| text::normalize(content).ends_with(indicators.expansion))
}

/// Check whether the text ends with one of the kind's sequence indicators,
/// continuation variants included.
pub fn has_continuation_indicator(kind: ProvisionKind, content: &str) -> bool {
    let normalized = text::normalize(content);
    kind.indicators().is_some_and(|indicators| {
        indicators
            .sequence
            .iter()
            .any(|token| normalized.ends_with(token))
    })
}

/// Check whether the text ends with the kind's final-of-sequence indicator.
pub fn has_final_indicator(kind: ProvisionKind, content: &str) -> bool {
    kind.indicators().is_some_and(|indicators| {
        text::normalize(content).ends_with(indicators.final_of_sequence)
    })
}

/// Check whether the last visible character is the kind's plain sequence indicator.
pub fn ends_with_sequence_indicator(kind: ProvisionKind, content: &str) -> bool {
    let Some(indicators) = kind.indicators() else {
        return true;
    };
    let plain = indicators.sequence[0];
    text::last_char(content).is_some_and(|last| plain.starts_with(last))
}

/// Check whether the text closes with a directly quoted sentence.
pub fn ends_with_citation(content: &str) -> bool {
    !content.is_empty() && CITATION_AT_END.is_match(&text::normalize(content))
}

/// Check whether the text ends with one of the phrases introducing amendments.
pub fn introduces_amendment(content: &str) -> bool {
    let normalized = text::normalize(content);
    INTRODUCES_AMENDMENT_PHRASES
        .iter()
        .any(|phrase| normalized.ends_with(phrase))
}

/// Check whether the text ends with the amendment closing token `.” (NR)`.
pub fn has_amendment_closing(content: &str) -> bool {
    AMENDMENT_CLOSING.is_match(&text::normalize(content))
}

/// Check whether the text ends with a quote.
pub fn ends_with_quote(content: &str) -> bool {
    ENDS_WITH_QUOTE.is_match(&text::normalize(content))
}

/// Check whether the text carries a closing quote followed by (NR).
pub fn has_closing_quote_with_nr(content: &str) -> bool {
    CLOSING_QUOTE_WITH_NR.is_match(&text::normalize(content))
}

/// Normalize text typed into an amendment block.
///
/// A placeholder of dots with (NR) becomes the default amendment text, a
/// dangling opening quote before (NR) is turned into a closing one, and a
/// line of dots becomes the canonical omissis text.
pub fn normalize_if_omissis(content: &str) -> String {
    if PLACEHOLDER_WITH_NR.is_match(content) {
        return DEFAULT_AMENDMENT_TEXT.to_string();
    }

    if ENDS_WITH_NR.is_match(content) {
        return close_dangling_quote(content);
    }

    let all_dots = !content.is_empty() && content.chars().all(|c| c == '.');
    if content == OMISSIS_TEXT || content == DEFAULT_AMENDMENT_TEXT || !all_dots {
        return content.to_string();
    }

    OMISSIS_TEXT.to_string()
}

/// Replace the first opening quote that has no quote after it with `”`.
fn close_dangling_quote(content: &str) -> String {
    let dangling = content.char_indices().find(|&(index, c)| {
        (c == '"' || c == '“')
            && !content[index + c.len_utf8()..]
                .chars()
                .any(|later| later == '"' || later == '”')
    });

    match dangling {
        Some((index, c)) => {
            let mut result = String::with_capacity(content.len());
            result.push_str(&content[..index]);
            result.push('”');
            result.push_str(&content[index + c.len_utf8()..]);
            result
        }
        None => content.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ProvisionKind::*;

    #[test]
    fn test_expansion_and_continuation() {
        assert!(has_expansion_indicator(Item, "os seguintes:"));
        assert!(!has_expansion_indicator(Chapter, "Título:"));
        assert!(has_continuation_indicator(SubItem, "texto; e"));
        assert!(has_continuation_indicator(SubItem, "texto;   <b>ou</b>"));
        assert!(has_continuation_indicator(Item, "texto; ou"));
        assert!(has_continuation_indicator(Article, "Texto."));
        assert!(!has_continuation_indicator(Item, "texto"));
    }

    #[test]
    fn test_sequence_indicator_uses_last_character() {
        assert!(ends_with_sequence_indicator(Item, "texto;"));
        assert!(!ends_with_sequence_indicator(Item, "texto; e"));
        assert!(ends_with_sequence_indicator(Article, "Texto.<br/>"));
        assert!(!ends_with_sequence_indicator(Article, "institui o programa"));
    }

    #[test]
    fn test_citation_at_end() {
        assert!(ends_with_citation("O art. 1º passa a ter a redação: “Texto citado.”"));
        assert!(!ends_with_citation("Texto sem citação."));
        assert!(!ends_with_citation(""));
    }

    #[test]
    fn test_introduces_amendment_with_flexible_spacing() {
        assert!(introduces_amendment(
            "A Lei nº 8.112 passa a   vigorar com a seguinte\nalteração:"
        ));
        assert!(introduces_amendment("acrescido o seguinte acréscimo: "));
        assert!(!introduces_amendment("passa a vigorar com alteração:"));
    }

    #[test]
    fn test_amendment_closing() {
        assert!(has_amendment_closing("texto.\"(NR)"));
        assert!(has_amendment_closing("texto.” (NR)"));
        assert!(has_amendment_closing("texto.&#8221; (NR)"));
        assert!(!has_amendment_closing("texto.”"));
        assert!(!has_amendment_closing("texto” (NR)"));
    }

    #[test]
    fn test_normalize_if_omissis() {
        assert_eq!(normalize_if_omissis("....."), OMISSIS_TEXT);
        assert_eq!(normalize_if_omissis("....\" (NR)"), DEFAULT_AMENDMENT_TEXT);
        assert_eq!(normalize_if_omissis("texto.“ (NR)"), "texto.” (NR)");
        assert_eq!(normalize_if_omissis("texto qualquer"), "texto qualquer");
        assert_eq!(normalize_if_omissis(OMISSIS_TEXT), OMISSIS_TEXT);
    }
}
