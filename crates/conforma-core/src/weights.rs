//! Confidence weights and thresholds used across the matching cascade.
//!
//! These values define the ranking contract between matchers: changing one
//! shifts which documents fulfil which requirements and which duplicates get
//! auto-merged. They live in one table instead of inline in each matcher so
//! the cascade's ordering (clause > title > keyword, direct > fulfills >
//! hierarchy > reference) stays auditable.

/// Boost applied to the exact clause-intersection ratio.
pub const EXACT_CLAUSE_BOOST: f64 = 1.2;

/// Scale applied to the partial (prefix) clause-intersection ratio.
pub const PARTIAL_CLAUSE_FACTOR: f64 = 0.8;

/// Minimum partial clause confidence that still counts as a match.
pub const PARTIAL_CLAUSE_THRESHOLD: f64 = 0.3;

/// Fixed confidence for an abbreviation-dictionary title hit.
pub const ABBREVIATION_CONFIDENCE: f64 = 0.85;

/// Minimum length ratio for a containment title match.
pub const CONTAINMENT_THRESHOLD: f64 = 0.6;

/// Minimum edit-distance similarity for a fuzzy title match.
pub const TITLE_SIMILARITY_THRESHOLD: f64 = 0.5;

/// Scale applied to the keyword hit ratio.
pub const KEYWORD_FACTOR: f64 = 0.8;

/// Minimum keyword hit ratio that still counts as a match.
pub const KEYWORD_THRESHOLD: f64 = 0.3;

/// Fixed confidence when a manual-type document covers a requirement's
/// keywords in its title.
pub const MANUAL_FULFILLMENT_CONFIDENCE: f64 = 0.9;

/// Minimum share of requirement keywords a manual's title must cover.
pub const MANUAL_KEYWORD_SHARE: f64 = 0.3;

/// Fixed confidence for a declared `can_be_fulfilled_by` hit.
pub const DECLARED_FULFILLMENT_CONFIDENCE: f64 = 0.85;

/// Discount when the match was found on a document's manual parent.
pub const PARENT_DISCOUNT: f64 = 0.8;

/// Discount when the match was found on a child document.
pub const CHILD_DISCOUNT: f64 = 0.9;

/// Discount when the match was found across a reference edge.
pub const REFERENCE_DISCOUNT: f64 = 0.7;

/// Minimum confidence for a requirement to count as fulfilled.
pub const FULFILLMENT_THRESHOLD: f64 = 0.5;

/// Minimum pair confidence for two documents to share a duplicate group.
pub const DUPLICATE_GROUP_THRESHOLD: f64 = 0.7;

/// Minimum clause-mapping Jaccard similarity for the duplicate rule.
pub const JACCARD_THRESHOLD: f64 = 0.8;

/// Fixed confidence when version-stripped base titles are equal.
pub const VERSION_STRIPPED_CONFIDENCE: f64 = 0.9;

/// Minimum edit-distance similarity of version-stripped titles.
pub const STRIPPED_SIMILARITY_THRESHOLD: f64 = 0.8;

/// Confidence for a section whose title carries a known clause number.
pub const DIRECT_CLAUSE_SECTION_CONFIDENCE: f64 = 0.95;

/// Minimum fuzzy confidence for a section-to-clause candidate.
pub const SECTION_MATCH_THRESHOLD: f64 = 0.5;

/// Fuzzy candidates kept per section.
pub const SECTION_CANDIDATE_LIMIT: usize = 3;
