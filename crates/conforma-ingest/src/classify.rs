//! Section-to-clause classification for imported documents.
//!
//! The ingestion-time counterpart of the document matchers, run over
//! section text instead of titles. Output is proposal-only: mappings are
//! persisted as `ClauseMapping` rows once a reviewer (or the auto-classify
//! flag) confirms them.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use conforma_core::weights::{
    DIRECT_CLAUSE_SECTION_CONFIDENCE, KEYWORD_FACTOR, KEYWORD_THRESHOLD, SECTION_CANDIDATE_LIMIT,
    SECTION_MATCH_THRESHOLD,
};
use conforma_core::{ClauseMapping, Standard};
use conforma_match::{keyword_overlap, title_match};
use conforma_store::ClauseCatalog;

use crate::parse::ParsedDocument;
use crate::sections::DocumentSection;

static LEADING_CLAUSE_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+(?:\.\d+){0,2})").unwrap());

/// Propose clause mappings per section, keyed by section title.
///
/// A leading clause number on the section title that exists in the
/// standard's catalog is an explicit structural signal and maps alone at
/// fixed high confidence. Otherwise the section is fuzzy-searched against
/// every clause title and keyword set; candidates above the match
/// threshold are kept, best first, capped per section. Untitled sections
/// (preamble) are skipped.
pub fn classify_sections(
    parsed: &ParsedDocument,
    standard: Standard,
    catalog: &dyn ClauseCatalog,
) -> BTreeMap<String, Vec<ClauseMapping>> {
    let mut proposals = BTreeMap::new();

    for section in &parsed.sections {
        if section.title.is_empty() {
            continue;
        }
        let mappings = classify_section(section, standard, catalog);
        if !mappings.is_empty() {
            debug!(
                section = %section.title,
                mappings = mappings.len(),
                "proposed clause mappings"
            );
            proposals.insert(section.title.clone(), mappings);
        }
    }
    proposals
}

fn classify_section(
    section: &DocumentSection,
    standard: Standard,
    catalog: &dyn ClauseCatalog,
) -> Vec<ClauseMapping> {
    if let Some(captures) = LEADING_CLAUSE_NUMBER.captures(&section.title) {
        let number = &captures[1];
        if catalog.get(standard, number).is_some() {
            return vec![ClauseMapping {
                standard,
                clause_number: number.to_string(),
                confidence: DIRECT_CLAUSE_SECTION_CONFIDENCE,
                matched_keywords: vec![],
            }];
        }
    }

    let text = format!("{} {}", section.title, section.content);
    let mut candidates: Vec<ClauseMapping> = Vec::new();
    for clause in catalog.clauses_for(standard) {
        let title_confidence = title_match(&section.title, &clause.title).unwrap_or(0.0);

        let (matched_keywords, ratio) = keyword_overlap(&text, &clause.keywords);
        let keyword_confidence = if ratio > KEYWORD_THRESHOLD {
            ratio * KEYWORD_FACTOR
        } else {
            0.0
        };

        let confidence = title_confidence.max(keyword_confidence);
        if confidence > SECTION_MATCH_THRESHOLD {
            candidates.push(ClauseMapping {
                standard,
                clause_number: clause.clause_number,
                confidence,
                matched_keywords,
            });
        }
    }

    candidates.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.clause_number.cmp(&b.clause_number))
    });
    candidates.truncate(SECTION_CANDIDATE_LIMIT);
    candidates
}
