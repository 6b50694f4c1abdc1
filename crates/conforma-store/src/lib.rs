//! Persistence boundary: traits the matching engine consumes, a
//! cycle-checked parent assignment, an in-memory reference store, and the
//! seeded ISO catalogs.

mod error;
mod memory;
mod parent;
pub mod seed;
mod traits;

pub use error::StoreError;
pub use memory::{Artifact, ArtifactKind, InMemoryCatalog, InMemoryStore};
pub use parent::assign_parent;
pub use traits::{AuditEntry, AuditSink, ClauseCatalog, DocumentStore, RequirementCatalog, StoreOp};
