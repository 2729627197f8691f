use async_trait::async_trait;

use crate::{
    InventorySnapshot, NewInventorySnapshot, NewOrder, OrderId, OrderRecord, OrderSummary, Result,
};

/// Core trait for order store implementations.
///
/// Reads run outside any transaction. Writes that must land together go
/// through an [`OrderTransaction`] obtained from [`OrderStore::begin`].
/// All implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Opens an atomic scope.
    async fn begin(&self) -> Result<Box<dyn OrderTransaction>>;

    /// Returns the current inventory snapshot.
    ///
    /// The current snapshot is the one with the latest `last_updated`;
    /// ties go to the greatest `inventory_id`. Returns None if the ledger
    /// is empty.
    async fn current_inventory(&self) -> Result<Option<InventorySnapshot>>;

    /// Appends a new inventory snapshot, which becomes current.
    async fn insert_inventory(&self, snapshot: NewInventorySnapshot) -> Result<InventorySnapshot>;

    /// Lists every committed order joined with its customer's name,
    /// ordered by order id.
    async fn list_orders(&self) -> Result<Vec<OrderSummary>>;

    /// Loads a single committed order with its customer's name.
    async fn get_order(&self, order_id: OrderId) -> Result<Option<OrderSummary>>;
}

/// An open atomic scope against the store.
///
/// Dropping a transaction without calling [`commit`](OrderTransaction::commit)
/// discards every change made through it.
#[async_trait]
pub trait OrderTransaction: Send {
    /// Inserts an order row and returns it with its assigned id and
    /// creation timestamp.
    async fn insert_order(&mut self, order: NewOrder) -> Result<OrderRecord>;

    /// Subtracts `gallons` from the current snapshot and refreshes its
    /// `last_updated`.
    ///
    /// The read of the current row and the write happen as one step, so
    /// concurrent draw-downs never lose updates. Fails with
    /// `InsufficientStock` (leaving the row untouched) when the snapshot
    /// holds less than `gallons`, and with `NoInventory` when the ledger
    /// is empty.
    async fn draw_down_inventory(&mut self, gallons: i64) -> Result<InventorySnapshot>;

    /// Makes every change in this scope visible.
    async fn commit(self: Box<Self>) -> Result<()>;

    /// Discards every change in this scope.
    async fn rollback(self: Box<Self>) -> Result<()>;
}
