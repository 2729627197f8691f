//! Domain error types.

use order_store::StoreError;
use thiserror::Error;

use crate::order::ValidationError;

/// Errors from ledger maintenance and order queries.
#[derive(Debug, Error)]
pub enum DomainError {
    /// An error occurred in the order store.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Input was rejected.
    #[error("{0}")]
    Validation(#[from] ValidationError),
}
