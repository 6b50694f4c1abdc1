//! Cycle-checked parent assignment.

use std::collections::HashSet;

use crate::{DocumentStore, StoreError};

/// Set (or clear) a document's parent, rejecting assignments that would
/// create a cycle in the parent/child graph.
///
/// The check runs before any write: walk the proposed parent's ancestor
/// chain and refuse if the document itself appears. A rejected call leaves
/// both documents unchanged.
pub fn assign_parent(
    store: &dyn DocumentStore,
    document_id: &str,
    parent_id: Option<&str>,
) -> Result<(), StoreError> {
    let mut document = store
        .find_by_id(document_id)?
        .ok_or_else(|| StoreError::NotFound(document_id.to_string()))?;

    if let Some(parent_id) = parent_id {
        if parent_id == document_id {
            return Err(StoreError::CircularReference {
                document: document_id.to_string(),
                parent: parent_id.to_string(),
            });
        }

        // Guards against walking a pre-existing cycle forever.
        let mut seen = HashSet::new();
        let mut cursor = Some(parent_id.to_string());
        while let Some(ancestor_id) = cursor {
            if ancestor_id == document_id {
                return Err(StoreError::CircularReference {
                    document: document_id.to_string(),
                    parent: parent_id.to_string(),
                });
            }
            if !seen.insert(ancestor_id.clone()) {
                break;
            }
            let ancestor = store
                .find_by_id(&ancestor_id)?
                .ok_or_else(|| StoreError::NotFound(ancestor_id.clone()))?;
            cursor = ancestor.parent_id;
        }
    }

    document.parent_id = parent_id.map(str::to_string);
    store.update(document)
}
