//! Traits the matching engine consumes.
//!
//! The engine never reaches for ambient state: every analysis takes its
//! stores as explicit parameters, so the web layer (or a test) decides what
//! backs them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use conforma_core::{DocumentRecord, IsoClause, Standard, StandardRequirement};

use crate::StoreError;

/// One mutation in an atomic batch — see [`DocumentStore::apply`].
#[derive(Debug, Clone)]
pub enum StoreOp {
    /// Replace the stored document with this record.
    UpdateDocument(DocumentRecord),
    /// Move comments, reviews, and tasks from one document to another.
    ReassignArtifacts { from: String, to: String },
    /// Remove the document and its artifacts.
    DeleteDocument(String),
}

/// CRUD plus graph lookups over an organisation's documents.
pub trait DocumentStore {
    fn find_by_id(&self, id: &str) -> Result<Option<DocumentRecord>, StoreError>;
    fn find_all_by_organization(&self, organization_id: &str)
    -> Result<Vec<DocumentRecord>, StoreError>;
    fn create(&self, document: DocumentRecord) -> Result<(), StoreError>;
    fn update(&self, document: DocumentRecord) -> Result<(), StoreError>;
    fn delete(&self, id: &str) -> Result<(), StoreError>;

    /// Documents whose `parent_id` is the given document.
    fn children_of(&self, id: &str) -> Result<Vec<DocumentRecord>, StoreError>;

    /// Documents holding a reference edge pointing at the given document.
    fn referencing(&self, id: &str) -> Result<Vec<DocumentRecord>, StoreError>;

    /// Apply a batch of mutations atomically: either every op commits or the
    /// store is left untouched. Merge is built on this — a partial merge
    /// (artifacts moved but loser still present) must be impossible.
    fn apply(&self, ops: &[StoreOp]) -> Result<(), StoreError>;
}

/// Read-only catalog of a standard's required documents.
pub trait RequirementCatalog {
    fn requirements_for(&self, standard: Standard) -> Vec<StandardRequirement>;
    fn all(&self) -> Vec<StandardRequirement>;
}

/// Read-only catalog of a standard's clauses, keyed by clause number.
pub trait ClauseCatalog {
    fn clauses_for(&self, standard: Standard) -> Vec<IsoClause>;
    fn get(&self, standard: Standard, clause_number: &str) -> Option<IsoClause>;
}

/// Append-only audit trail entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub action: String,
    pub entity_type: String,
    pub entity_id: String,
    pub user_id: String,
    pub details: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}

/// Append-only audit trail.
pub trait AuditSink {
    fn record(&self, entry: AuditEntry) -> Result<(), StoreError>;
}
