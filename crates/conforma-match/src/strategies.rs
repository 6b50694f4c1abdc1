//! The three direct match strategies, in priority order.
//!
//! The precedence contract (clause > title > keyword) is deliberate:
//! explicit structural tags beat fuzzy text. Each strategy implements
//! [`MatchStrategy`] so the ordering stays visible in one place
//! ([`crate::DocumentMatcher`]) and each rule is testable on its own.

use conforma_core::weights::{
    CONTAINMENT_THRESHOLD, EXACT_CLAUSE_BOOST, KEYWORD_FACTOR, KEYWORD_THRESHOLD,
    PARTIAL_CLAUSE_FACTOR, PARTIAL_CLAUSE_THRESHOLD, TITLE_SIMILARITY_THRESHOLD,
};
use conforma_core::{
    DocumentRecord, MatchResult, MatchType, StandardRequirement, abbreviation_match,
    normalize_title, similarity,
};

/// A single rule in the direct-match cascade.
///
/// Returns `Some` only for a positive match; `None` hands over to the next
/// strategy in priority order.
pub trait MatchStrategy {
    fn name(&self) -> &'static str;
    fn attempt(&self, doc: &DocumentRecord, req: &StandardRequirement) -> Option<MatchResult>;
}

/// Matches a document's clause-number tags against the requirement's clause
/// numbers. Highest priority: clause numbers are explicit, low-ambiguity
/// signals.
pub struct ClauseStrategy;

impl MatchStrategy for ClauseStrategy {
    fn name(&self) -> &'static str {
        "clause"
    }

    fn attempt(&self, doc: &DocumentRecord, req: &StandardRequirement) -> Option<MatchResult> {
        if req.clause_numbers.is_empty() {
            return None;
        }
        let doc_clauses = doc.clause_numbers_for(req.standard);
        if doc_clauses.is_empty() {
            return None;
        }

        let total = req.clause_numbers.len() as f64;
        let exact = req
            .clause_numbers
            .iter()
            .filter(|c| doc_clauses.contains(c.as_str()))
            .count();
        if exact > 0 {
            let confidence = (exact as f64 / total * EXACT_CLAUSE_BOOST).min(1.0);
            return Some(MatchResult::hit(MatchType::Clause, confidence, &req.id));
        }

        // Prefix overlap, e.g. a document tagged 6.2.1 against a
        // requirement asking for 6.2.
        let partial = req
            .clause_numbers
            .iter()
            .filter(|rc| {
                doc_clauses
                    .iter()
                    .any(|dc| dc.starts_with(rc.as_str()) || rc.starts_with(dc))
            })
            .count();
        let confidence = partial as f64 / total * PARTIAL_CLAUSE_FACTOR;
        if confidence > PARTIAL_CLAUSE_THRESHOLD {
            Some(MatchResult::hit(MatchType::Clause, confidence, &req.id))
        } else {
            None
        }
    }
}

/// Fuzzy title comparison: abbreviation dictionary, exact normalised
/// equality, containment, then edit-distance similarity.
pub struct TitleStrategy;

impl MatchStrategy for TitleStrategy {
    fn name(&self) -> &'static str {
        "title"
    }

    fn attempt(&self, doc: &DocumentRecord, req: &StandardRequirement) -> Option<MatchResult> {
        title_match(&doc.title, &req.title)
            .map(|confidence| MatchResult::hit(MatchType::Title, confidence, &req.id))
    }
}

/// Keyword-set overlap against the normalised document title.
pub struct KeywordStrategy;

impl MatchStrategy for KeywordStrategy {
    fn name(&self) -> &'static str {
        "keyword"
    }

    fn attempt(&self, doc: &DocumentRecord, req: &StandardRequirement) -> Option<MatchResult> {
        let (_, ratio) = keyword_overlap(&doc.title, &req.keywords);
        if ratio > KEYWORD_THRESHOLD {
            Some(MatchResult::hit(
                MatchType::Keyword,
                ratio * KEYWORD_FACTOR,
                &req.id,
            ))
        } else {
            None
        }
    }
}

/// Title matching rules shared by the title strategy, the relationship
/// matcher, and the section classifier. Returns the confidence of the first
/// rule that fires.
pub fn title_match(a: &str, b: &str) -> Option<f64> {
    let a = normalize_title(a);
    let b = normalize_title(b);

    if let Some(confidence) = abbreviation_match(&a, &b) {
        return Some(confidence);
    }
    if !a.is_empty() && a == b {
        return Some(1.0);
    }
    if !a.is_empty() && !b.is_empty() && (a.contains(&b) || b.contains(&a)) {
        let (shorter, longer) = if a.chars().count() <= b.chars().count() {
            (&a, &b)
        } else {
            (&b, &a)
        };
        let confidence = shorter.chars().count() as f64 / longer.chars().count() as f64;
        if confidence > CONTAINMENT_THRESHOLD {
            return Some(confidence);
        }
    }
    // Containment below its threshold still falls through to edit
    // distance, which for a pure prefix/suffix scores the same length
    // ratio. A contained title can therefore match in the (0.5, 0.6]
    // band through the similarity rule.
    let score = similarity(&a, &b);
    (score > TITLE_SIMILARITY_THRESHOLD).then_some(score)
}

/// Substring search for each keyword over the normalised text. Returns the
/// matched keywords and the hit ratio.
pub fn keyword_overlap(text: &str, keywords: &[String]) -> (Vec<String>, f64) {
    if keywords.is_empty() {
        return (vec![], 0.0);
    }
    let haystack = normalize_title(text);
    let matched: Vec<String> = keywords
        .iter()
        .filter(|k| haystack.contains(k.as_str()))
        .cloned()
        .collect();
    let ratio = matched.len() as f64 / keywords.len() as f64;
    (matched, ratio)
}
