//! Merging a duplicate group into a single surviving document.
//!
//! All validation happens before the first mutation, and the mutations
//! themselves go through [`DocumentStore::apply`] as one batch, so a failed
//! merge leaves the store exactly as it was.

use chrono::Utc;
use thiserror::Error;
use tracing::info;

use conforma_core::DocumentRecord;
use conforma_store::{AuditEntry, AuditSink, DocumentStore, StoreError, StoreOp};

#[derive(Debug, Error)]
pub enum MergeError {
    /// The request is self-contradictory or names documents that cannot be
    /// merged together. Raised before anything is written.
    #[error("merge conflict: {0}")]
    Conflict(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Merge `document_ids` into `keep_document_id`.
///
/// Clause mappings the keeper lacks are copied over from the losers; the
/// losers' comments, reviews, and tasks are reassigned to the keeper; the
/// losers are deleted. The whole mutation is one atomic batch, followed by
/// an audit entry. Returns the keeper as stored after the merge.
///
/// Audit contract: the entry is written after the batch commits, since the
/// sink is a separate collaborator outside the store's transactional
/// boundary. If the sink then fails, the merge itself is already durable:
/// the caller gets the sink's error, not a rolled-back store.
pub fn merge_duplicates(
    store: &dyn DocumentStore,
    audit: &dyn AuditSink,
    document_ids: &[String],
    keep_document_id: &str,
    user_id: &str,
) -> Result<DocumentRecord, MergeError> {
    if document_ids.len() < 2 {
        return Err(MergeError::Conflict(
            "a merge needs at least two documents".into(),
        ));
    }
    for (index, id) in document_ids.iter().enumerate() {
        if document_ids[..index].contains(id) {
            return Err(MergeError::Conflict(format!("duplicate document id {id}")));
        }
    }
    if !document_ids.iter().any(|id| id == keep_document_id) {
        return Err(MergeError::Conflict(format!(
            "keeper {keep_document_id} is not among the documents to merge"
        )));
    }

    // Resolve every document up front so a missing id fails the merge
    // before any mutation.
    let mut keeper = store
        .find_by_id(keep_document_id)?
        .ok_or_else(|| MergeError::Conflict(format!("document {keep_document_id} not found")))?;
    let mut losers: Vec<DocumentRecord> = Vec::new();
    for id in document_ids {
        if id == keep_document_id {
            continue;
        }
        let doc = store
            .find_by_id(id)?
            .ok_or_else(|| MergeError::Conflict(format!("document {id} not found")))?;
        losers.push(doc);
    }

    if let Some(foreign) = losers
        .iter()
        .find(|d| d.organization_id != keeper.organization_id)
    {
        return Err(MergeError::Conflict(format!(
            "document {} belongs to a different organization",
            foreign.id
        )));
    }

    // Union of clause mappings; the keeper's own mapping wins on overlap.
    for loser in &losers {
        for mapping in &loser.clause_mappings {
            if !keeper.has_clause_mapping(mapping.standard, &mapping.clause_number) {
                keeper.clause_mappings.push(mapping.clone());
            }
        }
    }
    keeper.updated_at = Utc::now();

    let mut ops = vec![StoreOp::UpdateDocument(keeper.clone())];
    for loser in &losers {
        ops.push(StoreOp::ReassignArtifacts {
            from: loser.id.clone(),
            to: keeper.id.clone(),
        });
        ops.push(StoreOp::DeleteDocument(loser.id.clone()));
    }
    store.apply(&ops)?;

    let merged_ids: Vec<&str> = losers.iter().map(|d| d.id.as_str()).collect();
    audit.record(AuditEntry {
        action: "merge_duplicates".into(),
        entity_type: "document".into(),
        entity_id: keeper.id.clone(),
        user_id: user_id.to_string(),
        details: serde_json::json!({
            "kept": keeper.id,
            "merged": merged_ids,
        }),
        timestamp: Utc::now(),
    })?;
    info!(
        kept = %keeper.id,
        merged = losers.len(),
        "merged duplicate documents"
    );

    Ok(keeper)
}
