//! Transactional storage for customer orders and the fuel inventory ledger.
//!
//! The [`OrderStore`] trait exposes read operations plus [`OrderStore::begin`],
//! which opens an [`OrderTransaction`]: the atomic scope in which an order is
//! inserted and the inventory drawn down. Two implementations are provided:
//! [`PostgresOrderStore`] (sqlx) and [`InMemoryOrderStore`] (tests, local runs).

pub mod error;
pub mod memory;
pub mod postgres;
pub mod record;
pub mod store;

pub use common::{CustomerId, InventoryId, OrderId};
pub use error::{Result, StoreError};
pub use memory::InMemoryOrderStore;
pub use postgres::PostgresOrderStore;
pub use record::{
    InventorySnapshot, MAX_TOTAL_PRICE, MAX_UNIT_PRICE, NewInventorySnapshot, NewOrder,
    OrderRecord, OrderSummary,
};
pub use store::{OrderStore, OrderTransaction};
