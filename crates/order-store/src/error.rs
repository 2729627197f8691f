use thiserror::Error;

use crate::CustomerId;

/// Errors that can occur when interacting with the order store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No inventory snapshot exists.
    #[error("No inventory data available")]
    NoInventory,

    /// The current snapshot holds less fuel than requested.
    #[error("Insufficient stock: requested {requested} gallons, {available} available")]
    InsufficientStock { requested: i64, available: i64 },

    /// The referenced customer account does not exist.
    #[error("Customer not found: {0}")]
    CustomerNotFound(CustomerId),

    /// A record was rejected before reaching the store.
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// The store could not complete the operation.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Result type for order store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
