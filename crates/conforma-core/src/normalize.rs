//! Title normalisation for document matching.
//!
//! Controlled-document titles arrive as filenames: separators, dates,
//! version tokens, and review-state qualifiers all vary between uploads of
//! the same logical document. Every matcher compares normalised titles so
//! that `Quality_objectives.xlsx` and `Quality Objectives v2 (draft)` land
//! on the same string.
//!
//! Two levels of normalisation exist on purpose:
//!
//! - [`canonical_title`] only unifies casing and separators. Version tokens
//!   survive, so two uploads of the same title with different versions are
//!   *not* byte-equal — the duplicate detector relies on that to tell an
//!   exact re-upload (confidence 1.0) from a version bump (0.9).
//! - [`normalize_title`] additionally strips dates, versions, revision
//!   markers, and draft/final/approved/pending qualifiers. This is what the
//!   title and keyword matchers compare.

use once_cell::sync::Lazy;
use regex::Regex;

static EXTENSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.(docx?|xlsx?|pdf|pptx?|txt|md|csv)$").unwrap());

/// `12-Jan-2024`, `2024-05-01`, `01/05/2024` and separator variants.
/// Separators have already been flattened to spaces, so the patterns accept
/// spaces and slashes interchangeably.
static DATE_TOKENS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"\b\d{1,2}[\s/]+(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*[\s/]+\d{4}\b").unwrap(),
        Regex::new(r"\b\d{4}[\s/]+\d{1,2}[\s/]+\d{1,2}\b").unwrap(),
        Regex::new(r"\b\d{1,2}[\s/]+\d{1,2}[\s/]+\d{4}\b").unwrap(),
    ]
});

/// `v2`, `v2 3` (was `v2.3`), `version 1`, `rev 4`, `revision 12`.
/// The trailing number groups absorb dotted minors that separator
/// flattening split into standalone numbers.
static VERSION_TOKENS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"\bv\s?\d+(\s\d+)*\b").unwrap(),
        Regex::new(r"\bversion\s*\d+(\s\d+)*\b").unwrap(),
        Regex::new(r"\brev(ision)?\s*\d+\b").unwrap(),
    ]
});

static QUALIFIERS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(draft|final|approved|pending)\b").unwrap());

static YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(19|20)\d{2}\b").unwrap());

static VERSION_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:v\s?|version\s*|rev(?:ision)?\s*)(\d+)").unwrap());

/// Lowercase, drop a known file extension, flatten `_`/`-`/`.` to spaces,
/// collapse whitespace. Version and date tokens are kept.
pub fn canonical_title(title: &str) -> String {
    let lower = title.trim().to_lowercase();
    let stripped = EXTENSION.replace(&lower, "");
    collapse(&stripped.replace(['_', '-', '.'], " "))
}

/// Full matcher-grade normalisation: [`canonical_title`] plus date, version,
/// revision, and qualifier stripping.
///
/// Idempotent: `normalize_title(normalize_title(t)) == normalize_title(t)`.
pub fn normalize_title(title: &str) -> String {
    let mut text = canonical_title(title);
    for pattern in DATE_TOKENS.iter() {
        text = pattern.replace_all(&text, " ").into_owned();
    }
    for pattern in VERSION_TOKENS.iter() {
        text = pattern.replace_all(&text, " ").into_owned();
    }
    text = QUALIFIERS.replace_all(&text, " ").into_owned();
    collapse(&text)
}

/// Version-stripped base title for duplicate detection: full normalisation
/// plus standalone-year removal, so `Risk Register 2023` and
/// `risk-register-2024.xlsx` share a base.
pub fn strip_version_markers(title: &str) -> String {
    let text = normalize_title(title);
    collapse(&YEAR.replace_all(&text, " "))
}

/// Extract the major version number from `v2`, `V2.1`, `version 3`, `rev 4`
/// tokens. Used to rank the latest member of a duplicate group.
pub fn extract_version(title: &str) -> Option<u32> {
    let text = canonical_title(title);
    VERSION_NUMBER
        .captures(&text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_flattens_separators() {
        assert_eq!(canonical_title("Quality_objectives.xlsx"), "quality objectives");
        assert_eq!(canonical_title("Risk-Register"), "risk register");
    }

    #[test]
    fn canonical_keeps_version_tokens() {
        assert_eq!(
            canonical_title("Information Security Policy v1.docx"),
            "information security policy v1"
        );
        assert_eq!(
            canonical_title("Information_Security_Policy_V2.docx"),
            "information security policy v2"
        );
    }

    #[test]
    fn strips_version_tokens() {
        assert_eq!(normalize_title("ISMS Scope v2.docx"), "isms scope");
        assert_eq!(normalize_title("ISMS Scope v2.3"), "isms scope");
        assert_eq!(normalize_title("Audit Plan version 4"), "audit plan");
        assert_eq!(normalize_title("Audit Plan Rev 12"), "audit plan");
    }

    #[test]
    fn strips_dates() {
        assert_eq!(normalize_title("Minutes 12-Jan-2024"), "minutes");
        assert_eq!(normalize_title("Minutes 2024-01-12"), "minutes");
        assert_eq!(normalize_title("Minutes 12/01/2024"), "minutes");
    }

    #[test]
    fn strips_qualifiers() {
        assert_eq!(normalize_title("Quality Policy DRAFT"), "quality policy");
        assert_eq!(normalize_title("Quality Policy (approved)"), "quality policy ( )");
    }

    #[test]
    fn idempotent() {
        for title in [
            "Information_Security_Policy_V2.docx",
            "Minutes 12-Jan-2024 final",
            "Risk Register rev 3 2024",
            "",
            "   ",
            "plain title",
        ] {
            let once = normalize_title(title);
            assert_eq!(normalize_title(&once), once, "not idempotent for {title:?}");
        }
    }

    #[test]
    fn strip_version_markers_removes_years() {
        assert_eq!(strip_version_markers("risk-register-2024.xlsx"), "risk register");
        assert_eq!(strip_version_markers("Risk Register 2023 draft"), "risk register");
    }

    #[test]
    fn version_stripped_titles_converge() {
        assert_eq!(
            strip_version_markers("Information Security Policy v1.docx"),
            strip_version_markers("Information_Security_Policy_V2.docx"),
        );
    }

    #[test]
    fn extracts_version_numbers() {
        assert_eq!(extract_version("Policy v2.docx"), Some(2));
        assert_eq!(extract_version("Policy V10"), Some(10));
        assert_eq!(extract_version("Policy version 3"), Some(3));
        assert_eq!(extract_version("Policy rev 7"), Some(7));
        assert_eq!(extract_version("Policy"), None);
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(normalize_title(""), "");
        assert_eq!(canonical_title("  "), "");
    }
}
