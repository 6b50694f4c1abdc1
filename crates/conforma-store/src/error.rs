use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document not found: {0}")]
    NotFound(String),

    #[error("document already exists: {0}")]
    AlreadyExists(String),

    #[error("assigning parent {parent} to {document} would create a cycle")]
    CircularReference { document: String, parent: String },

    #[error("{0}")]
    Other(String),
}
