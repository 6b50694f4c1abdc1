//! Edit-distance similarity and the abbreviation dictionary.

use crate::weights::ABBREVIATION_CONFIDENCE;

/// Compliance shorthand seen in real document titles: full phrase on the
/// left, accepted abbreviations on the right. Lookup is bidirectional.
const ABBREVIATIONS: &[(&str, &[&str])] = &[
    ("statement of applicability", &["soa"]),
    ("standard operating procedure", &["sop"]),
    ("quality management system", &["qms"]),
    ("information security management system", &["isms"]),
    ("business continuity plan", &["bcp"]),
    ("disaster recovery plan", &["drp"]),
    ("data protection impact assessment", &["dpia"]),
    ("key performance indicator", &["kpi"]),
    ("corrective and preventive action", &["capa"]),
    ("management review", &["mr"]),
];

/// Levenshtein-based similarity in `[0, 1]`.
///
/// `(max_len - distance) / max_len`, 1.0 when both strings are empty.
/// Symmetric, and 1.0 exactly when the strings are equal.
pub fn similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    let distance = strsim::levenshtein(a, b);
    (max_len - distance) as f64 / max_len as f64
}

/// Check the abbreviation dictionary against two normalised titles.
///
/// Hits when one side contains a known abbreviation as a standalone word
/// and the other side contains its full phrase. Returns the fixed
/// abbreviation confidence on a hit.
pub fn abbreviation_match(a: &str, b: &str) -> Option<f64> {
    for (full, abbrs) in ABBREVIATIONS {
        for abbr in *abbrs {
            if (contains_word(a, abbr) && b.contains(full))
                || (contains_word(b, abbr) && a.contains(full))
            {
                return Some(ABBREVIATION_CONFIDENCE);
            }
        }
    }
    None
}

/// Whole-word containment — `soa` must not fire inside `soap`.
fn contains_word(text: &str, word: &str) -> bool {
    text.split_whitespace().any(|w| w == word)
}
