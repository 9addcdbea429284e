//! Configuration constants and validation functions for the editing core.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::{EditorError, Result};

/// Maximum number of batches kept in the undo (and redo) history.
///
/// The oldest entry is evicted when a new one would exceed the cap.
pub const HISTORY_CAPACITY: usize = 50;

/// Length (in characters, markup stripped) above which a provision text
/// triggers the conciseness advisory.
pub const CONCISE_TEXT_LIMIT: usize = 300;

/// Maximum outline document size in bytes (1 MB).
///
/// Guards the ingestion boundary against oversized input.
pub const MAX_DOCUMENT_SIZE: usize = 1_000_000;

/// Maximum nesting depth accepted when building a tree from an outline.
///
/// The deepest legal hierarchy (book → title → chapter → section →
/// subsection → article → caput → item → sub-item → sub-sub-item) plus
/// amendment nesting stays far below this.
pub const MAX_OUTLINE_DEPTH: usize = 32;

/// Highest number an author may give a provision.
///
/// Labels grow with the number (Roman numerals repeat `M`), so authored
/// numbers are capped well beyond any real law.
pub const MAX_PROVISION_NUMBER: u32 = 9_999;

/// Text wrap width for CLI output.
pub const TEXT_WRAP_WIDTH: usize = 100;

/// Text of an omitted-text block (omissis).
pub const OMISSIS_TEXT: &str =
    ".............................................................";

/// Placeholder text of a freshly created amendment block head.
pub const DEFAULT_AMENDMENT_TEXT: &str =
    ".............................................................\u{201D} (NR)";

/// Literal closing token required on the terminal node of an amendment block.
pub const AMENDMENT_CLOSING: &str = ".\u{201D} (NR)";

/// LexML URN pattern: urn:lex:br:<authority>:<type>:<YYYY-MM-DD>;<number>.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static NORM_URN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^urn:lex:br(?:;[a-z.]+)?:[a-z.;]+:[a-z.]+:(\d{4}-\d{2}-\d{2});[0-9a-z.\-]+$")
        .expect("valid regex")
});

/// Validate the LexML URN that identifies an amended norm.
///
/// # Arguments
/// * `urn` - The URN to validate
///
/// # Returns
/// * `Ok(())` if the URN has the expected shape and carries a real date
/// * `Err(EditorError::InvalidNormUrn)` otherwise
///
/// # Examples
/// ```
/// use lexedit_core::config::validate_norm_urn;
///
/// assert!(validate_norm_urn("urn:lex:br:federal:lei:1990-12-11;8112").is_ok());
/// assert!(validate_norm_urn("lei 8.112").is_err());
/// assert!(validate_norm_urn("urn:lex:br:federal:lei:1990-13-11;8112").is_err());
/// ```
pub fn validate_norm_urn(urn: &str) -> Result<()> {
    let Some(captures) = NORM_URN_PATTERN.captures(urn) else {
        return Err(EditorError::InvalidNormUrn(urn.to_string()));
    };

    let date = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
    chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| EditorError::InvalidNormUrn(urn.to_string()))?;

    Ok(())
}

/// Validate an authored provision number against [`MAX_PROVISION_NUMBER`].
pub fn validate_provision_number(number: u32) -> Result<()> {
    if number > MAX_PROVISION_NUMBER {
        return Err(EditorError::NumberOutOfRange {
            number,
            max: MAX_PROVISION_NUMBER,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_norm_urn_valid() {
        assert!(validate_norm_urn("urn:lex:br:federal:lei:1990-12-11;8112").is_ok());
        assert!(validate_norm_urn("urn:lex:br:federal:decreto.lei:1940-12-07;2848").is_ok());
        assert!(validate_norm_urn("urn:lex:br;sao.paulo:estadual:lei:2001-01-05;10.705").is_ok());
    }

    #[test]
    fn test_validate_norm_urn_invalid() {
        assert!(validate_norm_urn("").is_err());
        assert!(validate_norm_urn("Lei nº 8.112").is_err());
        assert!(validate_norm_urn("urn:lex:br:federal:lei:1990-02-30;8112").is_err());
    }

    #[test]
    fn test_validate_provision_number() {
        assert!(validate_provision_number(0).is_ok());
        assert!(validate_provision_number(MAX_PROVISION_NUMBER).is_ok());
        assert!(matches!(
            validate_provision_number(u32::MAX),
            Err(EditorError::NumberOutOfRange { number: u32::MAX, .. })
        ));
    }

    #[test]
    fn test_constants_are_reasonable() {
        assert_eq!(HISTORY_CAPACITY, 50);
        assert!(CONCISE_TEXT_LIMIT >= 100);
        assert!(MAX_OUTLINE_DEPTH >= 12);
        assert!(DEFAULT_AMENDMENT_TEXT.ends_with("(NR)"));
        assert!(OMISSIS_TEXT.chars().all(|c| c == '.'));
    }
}
