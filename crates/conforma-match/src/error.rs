use thiserror::Error;

use conforma_store::StoreError;

/// Failure while running a matching analysis. Scoring itself is
/// deterministic and infallible; everything that can go wrong comes from
/// the store underneath.
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
