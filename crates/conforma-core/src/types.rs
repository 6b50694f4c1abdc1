//! Domain types shared across the matching engine, stores, and ingestion.

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A supported compliance standard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Standard {
    #[serde(rename = "iso_9001_2015")]
    Iso9001_2015,
    #[serde(rename = "iso_27001_2022")]
    Iso27001_2022,
}

impl Standard {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Iso9001_2015 => "iso_9001_2015",
            Self::Iso27001_2022 => "iso_27001_2022",
        }
    }
}

impl fmt::Display for Standard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of a controlled document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Draft,
    UnderReview,
    Approved,
    Archived,
}

/// Controlled document classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    Manual,
    Policy,
    Procedure,
    WorkInstruction,
    Record,
    Register,
    Plan,
    Report,
    Other,
}

impl DocumentType {
    /// Manuals can fulfil requirements on behalf of their children.
    pub fn is_manual(&self) -> bool {
        matches!(self, Self::Manual)
    }
}

/// Typed cross-reference edge between two documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceType {
    Implements,
    Supports,
    CrossReference,
}

/// Outgoing reference edge from one document to another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    pub target_id: String,
    pub reference_type: ReferenceType,
}

/// A document-to-clause link produced by the matcher.
///
/// Created by classification, never directly by the user. At most one
/// mapping per (document, standard, clause_number) — see
/// [`DocumentRecord::upsert_clause_mapping`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClauseMapping {
    pub standard: Standard,
    pub clause_number: String,
    /// Match confidence in `[0, 1]`.
    pub confidence: f64,
    pub matched_keywords: Vec<String>,
}

impl ClauseMapping {
    /// Stable identifier of the mapped clause, e.g. `iso_9001_2015:6.2`.
    pub fn clause_id(&self) -> String {
        format!("{}:{}", self.standard, self.clause_number)
    }
}

/// A controlled document as held by the document store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub id: String,
    pub organization_id: String,
    pub title: String,
    /// Normalised plain-text content as extracted at import time.
    pub content: String,
    #[serde(default)]
    pub clause_mappings: Vec<ClauseMapping>,
    /// Single owning document (e.g. the manual this procedure belongs to).
    /// The parent relation must stay acyclic; assignment goes through the
    /// store layer's cycle check.
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub references: Vec<Reference>,
    pub status: DocumentStatus,
    #[serde(default)]
    pub document_type: Option<DocumentType>,
    pub version: u32,
    pub owner: String,
    pub updated_at: DateTime<Utc>,
}

impl DocumentRecord {
    /// Clause numbers this document is mapped to for one standard.
    pub fn clause_numbers_for(&self, standard: Standard) -> HashSet<&str> {
        self.clause_mappings
            .iter()
            .filter(|m| m.standard == standard)
            .map(|m| m.clause_number.as_str())
            .collect()
    }

    /// Insert a clause mapping, replacing any existing mapping for the same
    /// (standard, clause_number) pair. Returns `true` if the mapping was new.
    pub fn upsert_clause_mapping(&mut self, mapping: ClauseMapping) -> bool {
        match self
            .clause_mappings
            .iter_mut()
            .find(|m| m.standard == mapping.standard && m.clause_number == mapping.clause_number)
        {
            Some(existing) => {
                *existing = mapping;
                false
            }
            None => {
                self.clause_mappings.push(mapping);
                true
            }
        }
    }

    /// Whether the document already maps the given clause.
    pub fn has_clause_mapping(&self, standard: Standard, clause_number: &str) -> bool {
        self.clause_mappings
            .iter()
            .any(|m| m.standard == standard && m.clause_number == clause_number)
    }
}

/// Whether a required document is mandatory for certification or merely
/// recommended practice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Importance {
    Mandatory,
    Recommended,
}

/// A "required document" entry from a standard's catalog.
///
/// Immutable reference data, seeded once per standard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardRequirement {
    pub id: String,
    pub title: String,
    pub standard: Standard,
    pub category: String,
    pub keywords: Vec<String>,
    pub clause_numbers: Vec<String>,
    #[serde(default)]
    pub document_type: Option<DocumentType>,
    pub importance: Importance,
    /// Titles of other requirements whose documents also satisfy this one.
    #[serde(default)]
    pub can_be_fulfilled_by: Vec<String>,
    /// Titles of other requirements this requirement's document satisfies.
    #[serde(default)]
    pub fulfills: Vec<String>,
}

/// A single clause of a standard, e.g. `5.2 Policy` under `5 Leadership`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IsoClause {
    pub standard: Standard,
    pub clause_number: String,
    pub title: String,
    #[serde(default)]
    pub parent_number: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// How a match was established, in descending order of signal strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    Clause,
    Title,
    Keyword,
    Direct,
    Fulfills,
    CanBeFulfilledBy,
    Parent,
    Reference,
    None,
}

impl MatchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Clause => "clause",
            Self::Title => "title",
            Self::Keyword => "keyword",
            Self::Direct => "direct",
            Self::Fulfills => "fulfills",
            Self::CanBeFulfilledBy => "can_be_fulfilled_by",
            Self::Parent => "parent",
            Self::Reference => "reference",
            Self::None => "none",
        }
    }
}

/// Outcome of matching one document against one requirement.
///
/// Ephemeral — computed on demand, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    pub is_match: bool,
    pub confidence: f64,
    pub match_type: MatchType,
    /// Id of the matched entity (document or requirement), when known.
    pub matched_id: Option<String>,
}

impl MatchResult {
    /// The negative result: no match, zero confidence.
    pub fn none() -> Self {
        Self {
            is_match: false,
            confidence: 0.0,
            match_type: MatchType::None,
            matched_id: None,
        }
    }

    /// A positive result. Confidence is clamped to `[0, 1]`.
    pub fn hit(match_type: MatchType, confidence: f64, matched_id: impl Into<String>) -> Self {
        Self {
            is_match: true,
            confidence: confidence.clamp(0.0, 1.0),
            match_type,
            matched_id: Some(matched_id.into()),
        }
    }
}

/// A requirement no organisation document fulfils.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissingRequirement {
    pub requirement_id: String,
    pub title: String,
    pub category: String,
    pub clause_refs: Vec<String>,
    pub importance: Importance,
}

/// Suggested handling for a duplicate group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendedAction {
    KeepLatest,
    MergeContent,
    ManualReview,
}

impl RecommendedAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::KeepLatest => "keep_latest",
            Self::MergeContent => "merge_content",
            Self::ManualReview => "manual_review",
        }
    }
}

/// One member of a duplicate group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateMember {
    pub document_id: String,
    pub title: String,
    pub version: u32,
    pub status: DocumentStatus,
    pub owner: String,
    pub is_latest_version: bool,
}

/// A set of likely-duplicate documents, ranked with a recommended action.
///
/// Ephemeral — recomputed on demand and consumed immediately by merge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateGroup {
    /// Version-stripped base title shared by the members.
    pub base_title: String,
    pub members: Vec<DuplicateMember>,
    pub confidence: f64,
    pub recommended_action: RecommendedAction,
}
