use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::{
    CustomerId, InventoryId, InventorySnapshot, NewInventorySnapshot, NewOrder, OrderId,
    OrderRecord, OrderSummary, Result, StoreError,
    store::{OrderStore, OrderTransaction},
};

#[derive(Debug, Clone)]
struct CustomerRow {
    firstname: String,
    lastname: String,
}

#[derive(Debug, Default)]
struct MemoryState {
    customers: HashMap<CustomerId, CustomerRow>,
    orders: Vec<OrderRecord>,
    inventory: Vec<InventorySnapshot>,
    next_order_id: i64,
    next_inventory_id: i64,
    last_tick: Option<DateTime<Utc>>,
}

/// Returns a timestamp strictly later than `last`.
fn next_tick(last: Option<DateTime<Utc>>) -> DateTime<Utc> {
    let now = Utc::now();
    match last {
        Some(last) if now <= last => last + Duration::microseconds(1),
        _ => now,
    }
}

impl MemoryState {
    /// Returns a timestamp strictly later than any previously issued one.
    fn tick(&mut self) -> DateTime<Utc> {
        let ts = next_tick(self.last_tick);
        self.last_tick = Some(ts);
        ts
    }

    fn current_index(&self) -> Option<usize> {
        self.inventory
            .iter()
            .enumerate()
            .max_by_key(|(_, s)| (s.last_updated, s.inventory_id))
            .map(|(i, _)| i)
    }

    fn summarize(&self, order: &OrderRecord) -> OrderSummary {
        let customer = self.customers.get(&order.customer_id);
        OrderSummary {
            order: order.clone(),
            customer_first_name: customer.map(|c| c.firstname.clone()),
            customer_last_name: customer.map(|c| c.lastname.clone()),
        }
    }
}

#[derive(Debug, Default)]
struct Faults {
    fail_on_begin: AtomicBool,
    fail_on_insert: AtomicBool,
    fail_on_draw_down: AtomicBool,
    fail_on_commit: AtomicBool,
}

/// In-memory order store for testing and local runs.
///
/// A transaction holds the store lock for its whole lifetime and stages its
/// writes beside the committed state, so transactions are fully serialized
/// and a dropped transaction leaves no trace.
#[derive(Clone, Default)]
pub struct InMemoryOrderStore {
    state: Arc<Mutex<MemoryState>>,
    faults: Arc<Faults>,
}

impl InMemoryOrderStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a customer account.
    pub async fn add_customer(
        &self,
        id: CustomerId,
        firstname: impl Into<String>,
        lastname: impl Into<String>,
    ) {
        self.state.lock().await.customers.insert(
            id,
            CustomerRow {
                firstname: firstname.into(),
                lastname: lastname.into(),
            },
        );
    }

    /// Removes a customer account, leaving its orders in place.
    pub async fn remove_customer(&self, id: CustomerId) {
        self.state.lock().await.customers.remove(&id);
    }

    /// Returns the number of committed orders.
    pub async fn order_count(&self) -> usize {
        self.state.lock().await.orders.len()
    }

    /// Returns the number of inventory snapshots in the ledger.
    pub async fn snapshot_count(&self) -> usize {
        self.state.lock().await.inventory.len()
    }

    /// Clears all customers, orders and inventory.
    pub async fn clear(&self) {
        *self.state.lock().await = MemoryState::default();
    }

    /// Configures the store to fail when a transaction is opened.
    pub fn set_fail_on_begin(&self, fail: bool) {
        self.faults.fail_on_begin.store(fail, Ordering::SeqCst);
    }

    /// Configures the store to fail on order inserts.
    pub fn set_fail_on_insert(&self, fail: bool) {
        self.faults.fail_on_insert.store(fail, Ordering::SeqCst);
    }

    /// Configures the store to fail on inventory draw-downs.
    pub fn set_fail_on_draw_down(&self, fail: bool) {
        self.faults.fail_on_draw_down.store(fail, Ordering::SeqCst);
    }

    /// Configures the store to fail on commit.
    pub fn set_fail_on_commit(&self, fail: bool) {
        self.faults.fail_on_commit.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn begin(&self) -> Result<Box<dyn OrderTransaction>> {
        if self.faults.fail_on_begin.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(
                "cannot open transaction".to_string(),
            ));
        }

        let guard = self.state.clone().lock_owned().await;
        Ok(Box::new(MemoryTransaction {
            guard,
            staged: Staged::default(),
            faults: self.faults.clone(),
        }))
    }

    async fn current_inventory(&self) -> Result<Option<InventorySnapshot>> {
        let state = self.state.lock().await;
        Ok(state.current_index().map(|i| state.inventory[i].clone()))
    }

    async fn insert_inventory(&self, snapshot: NewInventorySnapshot) -> Result<InventorySnapshot> {
        snapshot.validate()?;

        let mut state = self.state.lock().await;
        state.next_inventory_id += 1;
        let row = InventorySnapshot {
            inventory_id: InventoryId::new(state.next_inventory_id),
            total_quantity: snapshot.total_quantity,
            price: snapshot.price,
            last_updated: state.tick(),
        };
        state.inventory.push(row.clone());
        Ok(row)
    }

    async fn list_orders(&self) -> Result<Vec<OrderSummary>> {
        let state = self.state.lock().await;
        let mut orders: Vec<_> = state.orders.iter().map(|o| state.summarize(o)).collect();
        orders.sort_by_key(|s| s.order.id);
        Ok(orders)
    }

    async fn get_order(&self, order_id: OrderId) -> Result<Option<OrderSummary>> {
        let state = self.state.lock().await;
        Ok(state
            .orders
            .iter()
            .find(|o| o.id == order_id)
            .map(|o| state.summarize(o)))
    }
}

/// Writes of an open transaction, applied to the state on commit.
#[derive(Debug, Default)]
struct Staged {
    orders: Vec<OrderRecord>,
    /// Index into `MemoryState::inventory` and the row's new value.
    inventory: Option<(usize, InventorySnapshot)>,
    last_tick: Option<DateTime<Utc>>,
}

/// Transaction over the in-memory store.
struct MemoryTransaction {
    guard: OwnedMutexGuard<MemoryState>,
    staged: Staged,
    faults: Arc<Faults>,
}

impl MemoryTransaction {
    fn tick(&mut self) -> DateTime<Utc> {
        let ts = next_tick(self.staged.last_tick.or(self.guard.last_tick));
        self.staged.last_tick = Some(ts);
        ts
    }

    /// The current snapshot as this transaction sees it.
    fn current_row(&self) -> Option<(usize, InventorySnapshot)> {
        // A drawn-down row carries the newest timestamp, so it stays current.
        if let Some(staged) = &self.staged.inventory {
            return Some(staged.clone());
        }
        self.guard
            .current_index()
            .map(|i| (i, self.guard.inventory[i].clone()))
    }
}

#[async_trait]
impl OrderTransaction for MemoryTransaction {
    async fn insert_order(&mut self, order: NewOrder) -> Result<OrderRecord> {
        order.validate()?;

        if self.faults.fail_on_insert.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("order insert failed".to_string()));
        }
        if !self.guard.customers.contains_key(&order.customer_id) {
            return Err(StoreError::CustomerNotFound(order.customer_id));
        }

        let id = self.guard.next_order_id + self.staged.orders.len() as i64 + 1;
        let record = OrderRecord {
            id: OrderId::new(id),
            customer_id: order.customer_id,
            num_gallons_order: order.num_gallons_order,
            date: order.date,
            date_created: self.tick(),
            total_price: order.total_price,
            status: order.status,
        };
        self.staged.orders.push(record.clone());
        Ok(record)
    }

    async fn draw_down_inventory(&mut self, gallons: i64) -> Result<InventorySnapshot> {
        if self.faults.fail_on_draw_down.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(
                "inventory update failed".to_string(),
            ));
        }

        let (index, mut row) = self.current_row().ok_or(StoreError::NoInventory)?;
        if row.total_quantity < gallons {
            return Err(StoreError::InsufficientStock {
                requested: gallons,
                available: row.total_quantity,
            });
        }

        row.total_quantity -= gallons;
        row.last_updated = self.tick();
        self.staged.inventory = Some((index, row.clone()));
        Ok(row)
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        if self.faults.fail_on_commit.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("commit failed".to_string()));
        }

        let MemoryTransaction {
            mut guard, staged, ..
        } = *self;
        guard.next_order_id += staged.orders.len() as i64;
        guard.orders.extend(staged.orders);
        if let Some((index, row)) = staged.inventory {
            guard.inventory[index] = row;
        }
        if staged.last_tick.is_some() {
            guard.last_tick = staged.last_tick;
        }
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        Ok(())
    }
}
