//! Shared identifier types for the fuel order service.

pub mod types;

pub use types::{CustomerId, InventoryId, OrderId};
