//! In-memory reference implementation of the store traits.
//!
//! Backs the CLI and the test suites. A single mutex over the whole state
//! doubles as the merge serialisation boundary: two merges touching the
//! same documents cannot interleave.

use std::collections::HashMap;
use std::sync::Mutex;

use tracing::debug;

use conforma_core::{DocumentRecord, IsoClause, Standard, StandardRequirement};

use crate::{
    AuditEntry, AuditSink, ClauseCatalog, DocumentStore, RequirementCatalog, StoreError, StoreOp,
};

/// Kind of per-document artifact that follows a document through a merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Comment,
    Review,
    Task,
}

/// A comment, review, or task attached to a document.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub kind: ArtifactKind,
    pub note: String,
}

#[derive(Default, Clone)]
struct State {
    documents: HashMap<String, DocumentRecord>,
    artifacts: HashMap<String, Vec<Artifact>>,
}

/// Mutex-guarded in-memory document store with an audit log.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
    audit: Mutex<Vec<AuditEntry>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach an artifact to a document (test and demo seeding).
    pub fn add_artifact(&self, document_id: &str, artifact: Artifact) -> Result<(), StoreError> {
        let mut state = self.lock();
        if !state.documents.contains_key(document_id) {
            return Err(StoreError::NotFound(document_id.to_string()));
        }
        state
            .artifacts
            .entry(document_id.to_string())
            .or_default()
            .push(artifact);
        Ok(())
    }

    /// Artifacts currently attached to a document.
    pub fn artifacts_for(&self, document_id: &str) -> Vec<Artifact> {
        self.lock()
            .artifacts
            .get(document_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Snapshot of the audit log.
    pub fn audit_entries(&self) -> Vec<AuditEntry> {
        self.audit.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn apply_one(state: &mut State, op: &StoreOp) -> Result<(), StoreError> {
        match op {
            StoreOp::UpdateDocument(document) => {
                if !state.documents.contains_key(&document.id) {
                    return Err(StoreError::NotFound(document.id.clone()));
                }
                state.documents.insert(document.id.clone(), document.clone());
            }
            StoreOp::ReassignArtifacts { from, to } => {
                if !state.documents.contains_key(from) {
                    return Err(StoreError::NotFound(from.clone()));
                }
                if !state.documents.contains_key(to) {
                    return Err(StoreError::NotFound(to.clone()));
                }
                if let Some(moved) = state.artifacts.remove(from) {
                    state.artifacts.entry(to.clone()).or_default().extend(moved);
                }
            }
            StoreOp::DeleteDocument(id) => {
                if state.documents.remove(id).is_none() {
                    return Err(StoreError::NotFound(id.clone()));
                }
                state.artifacts.remove(id);
            }
        }
        Ok(())
    }
}

impl DocumentStore for InMemoryStore {
    fn find_by_id(&self, id: &str) -> Result<Option<DocumentRecord>, StoreError> {
        Ok(self.lock().documents.get(id).cloned())
    }

    fn find_all_by_organization(
        &self,
        organization_id: &str,
    ) -> Result<Vec<DocumentRecord>, StoreError> {
        let mut documents: Vec<DocumentRecord> = self
            .lock()
            .documents
            .values()
            .filter(|d| d.organization_id == organization_id)
            .cloned()
            .collect();
        documents.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(documents)
    }

    fn create(&self, document: DocumentRecord) -> Result<(), StoreError> {
        let mut state = self.lock();
        if state.documents.contains_key(&document.id) {
            return Err(StoreError::AlreadyExists(document.id));
        }
        state.documents.insert(document.id.clone(), document);
        Ok(())
    }

    fn update(&self, document: DocumentRecord) -> Result<(), StoreError> {
        let mut state = self.lock();
        if !state.documents.contains_key(&document.id) {
            return Err(StoreError::NotFound(document.id));
        }
        state.documents.insert(document.id.clone(), document);
        Ok(())
    }

    fn delete(&self, id: &str) -> Result<(), StoreError> {
        let mut state = self.lock();
        if state.documents.remove(id).is_none() {
            return Err(StoreError::NotFound(id.to_string()));
        }
        state.artifacts.remove(id);
        Ok(())
    }

    fn children_of(&self, id: &str) -> Result<Vec<DocumentRecord>, StoreError> {
        let mut children: Vec<DocumentRecord> = self
            .lock()
            .documents
            .values()
            .filter(|d| d.parent_id.as_deref() == Some(id))
            .cloned()
            .collect();
        children.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(children)
    }

    fn referencing(&self, id: &str) -> Result<Vec<DocumentRecord>, StoreError> {
        let mut referencing: Vec<DocumentRecord> = self
            .lock()
            .documents
            .values()
            .filter(|d| d.references.iter().any(|r| r.target_id == id))
            .cloned()
            .collect();
        referencing.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(referencing)
    }

    fn apply(&self, ops: &[StoreOp]) -> Result<(), StoreError> {
        let mut state = self.lock();
        // Stage against a copy, swap only if every op succeeds.
        let mut staged = state.clone();
        for op in ops {
            Self::apply_one(&mut staged, op)?;
        }
        *state = staged;
        debug!(ops = ops.len(), "applied batch");
        Ok(())
    }
}

impl AuditSink for InMemoryStore {
    fn record(&self, entry: AuditEntry) -> Result<(), StoreError> {
        self.audit
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(entry);
        Ok(())
    }
}

/// In-memory requirement and clause catalog, usually built from
/// [`crate::seed`].
pub struct InMemoryCatalog {
    requirements: Vec<StandardRequirement>,
    clauses: Vec<IsoClause>,
}

impl InMemoryCatalog {
    pub fn new(requirements: Vec<StandardRequirement>, clauses: Vec<IsoClause>) -> Self {
        Self {
            requirements,
            clauses,
        }
    }

    /// Catalog seeded with the built-in ISO 9001:2015 and ISO 27001:2022
    /// reference data.
    pub fn seeded() -> Self {
        Self::new(crate::seed::requirements(), crate::seed::clauses())
    }
}

impl RequirementCatalog for InMemoryCatalog {
    fn requirements_for(&self, standard: Standard) -> Vec<StandardRequirement> {
        self.requirements
            .iter()
            .filter(|r| r.standard == standard)
            .cloned()
            .collect()
    }

    fn all(&self) -> Vec<StandardRequirement> {
        self.requirements.clone()
    }
}

impl ClauseCatalog for InMemoryCatalog {
    fn clauses_for(&self, standard: Standard) -> Vec<IsoClause> {
        self.clauses
            .iter()
            .filter(|c| c.standard == standard)
            .cloned()
            .collect()
    }

    fn get(&self, standard: Standard, clause_number: &str) -> Option<IsoClause> {
        self.clauses
            .iter()
            .find(|c| c.standard == standard && c.clause_number == clause_number)
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assign_parent;
    use chrono::Utc;
    use conforma_core::DocumentStatus;

    fn doc(id: &str) -> DocumentRecord {
        DocumentRecord {
            id: id.to_string(),
            organization_id: "org-1".into(),
            title: format!("Document {id}"),
            content: String::new(),
            clause_mappings: vec![],
            parent_id: None,
            references: vec![],
            status: DocumentStatus::Draft,
            document_type: None,
            version: 1,
            owner: "qa".into(),
            updated_at: Utc::now(),
        }
    }

    fn store_with(ids: &[&str]) -> InMemoryStore {
        let store = InMemoryStore::new();
        for id in ids {
            store.create(doc(id)).unwrap();
        }
        store
    }

    #[test]
    fn create_then_find() {
        let store = store_with(&["a"]);
        assert!(store.find_by_id("a").unwrap().is_some());
        assert!(store.find_by_id("b").unwrap().is_none());
    }

    #[test]
    fn create_duplicate_id_rejected() {
        let store = store_with(&["a"]);
        assert!(matches!(
            store.create(doc("a")),
            Err(StoreError::AlreadyExists(_))
        ));
    }

    #[test]
    fn find_all_filters_by_organization() {
        let store = store_with(&["a", "b"]);
        let mut other = doc("c");
        other.organization_id = "org-2".into();
        store.create(other).unwrap();

        let docs = store.find_all_by_organization("org-1").unwrap();
        assert_eq!(docs.len(), 2);
    }

    #[test]
    fn children_and_referencing_lookups() {
        let store = store_with(&["manual", "proc"]);
        assign_parent(&store, "proc", Some("manual")).unwrap();

        let mut referrer = doc("ref");
        referrer.references.push(conforma_core::Reference {
            target_id: "manual".into(),
            reference_type: conforma_core::ReferenceType::CrossReference,
        });
        store.create(referrer).unwrap();

        let children = store.children_of("manual").unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].id, "proc");

        let referencing = store.referencing("manual").unwrap();
        assert_eq!(referencing.len(), 1);
        assert_eq!(referencing[0].id, "ref");
    }

    #[test]
    fn apply_commits_whole_batch() {
        let store = store_with(&["keep", "lose"]);
        store
            .add_artifact(
                "lose",
                Artifact {
                    kind: ArtifactKind::Comment,
                    note: "please review".into(),
                },
            )
            .unwrap();

        store
            .apply(&[
                StoreOp::ReassignArtifacts {
                    from: "lose".into(),
                    to: "keep".into(),
                },
                StoreOp::DeleteDocument("lose".into()),
            ])
            .unwrap();

        assert!(store.find_by_id("lose").unwrap().is_none());
        assert_eq!(store.artifacts_for("keep").len(), 1);
    }

    #[test]
    fn apply_failure_leaves_store_untouched() {
        let store = store_with(&["keep", "lose"]);
        store
            .add_artifact(
                "lose",
                Artifact {
                    kind: ArtifactKind::Task,
                    note: "update header".into(),
                },
            )
            .unwrap();

        // Second op targets a missing document: nothing may commit.
        let result = store.apply(&[
            StoreOp::ReassignArtifacts {
                from: "lose".into(),
                to: "keep".into(),
            },
            StoreOp::DeleteDocument("ghost".into()),
        ]);

        assert!(matches!(result, Err(StoreError::NotFound(_))));
        assert!(store.find_by_id("lose").unwrap().is_some());
        assert_eq!(store.artifacts_for("lose").len(), 1);
        assert!(store.artifacts_for("keep").is_empty());
    }

    #[test]
    fn parent_cycle_rejected_and_unchanged() {
        let store = store_with(&["a", "b"]);
        assign_parent(&store, "a", Some("b")).unwrap();

        let result = assign_parent(&store, "b", Some("a"));
        assert!(matches!(
            result,
            Err(StoreError::CircularReference { .. })
        ));
        // The rejected call must not have written anything.
        assert_eq!(store.find_by_id("b").unwrap().unwrap().parent_id, None);
        assert_eq!(
            store.find_by_id("a").unwrap().unwrap().parent_id.as_deref(),
            Some("b")
        );
    }

    #[test]
    fn deep_cycle_rejected() {
        let store = store_with(&["a", "b", "c"]);
        assign_parent(&store, "b", Some("a")).unwrap();
        assign_parent(&store, "c", Some("b")).unwrap();
        assert!(matches!(
            assign_parent(&store, "a", Some("c")),
            Err(StoreError::CircularReference { .. })
        ));
    }

    #[test]
    fn self_parent_rejected() {
        let store = store_with(&["a"]);
        assert!(matches!(
            assign_parent(&store, "a", Some("a")),
            Err(StoreError::CircularReference { .. })
        ));
    }

    #[test]
    fn clearing_parent_allowed() {
        let store = store_with(&["a", "b"]);
        assign_parent(&store, "a", Some("b")).unwrap();
        assign_parent(&store, "a", None).unwrap();
        assert_eq!(store.find_by_id("a").unwrap().unwrap().parent_id, None);
    }

    #[test]
    fn audit_entries_append() {
        let store = InMemoryStore::new();
        store
            .record(AuditEntry {
                action: "merge_duplicates".into(),
                entity_type: "document".into(),
                entity_id: "keep".into(),
                user_id: "u1".into(),
                details: serde_json::json!({"merged": ["lose"]}),
                timestamp: Utc::now(),
            })
            .unwrap();
        assert_eq!(store.audit_entries().len(), 1);
    }

    #[test]
    fn seeded_catalog_covers_both_standards() {
        let catalog = InMemoryCatalog::seeded();
        assert!(!catalog.requirements_for(Standard::Iso9001_2015).is_empty());
        assert!(!catalog.requirements_for(Standard::Iso27001_2022).is_empty());
        assert!(catalog.get(Standard::Iso9001_2015, "5.2").is_some());
        assert!(catalog.get(Standard::Iso9001_2015, "99.9").is_none());
    }
}
