//! The fuel inventory ledger.

use order_store::{
    InventorySnapshot, MAX_UNIT_PRICE, NewInventorySnapshot, OrderStore, OrderTransaction,
    StoreError,
};
use rust_decimal::Decimal;

use crate::error::DomainError;
use crate::order::{Gallons, ValidationError};

/// Reads and updates the inventory ledger.
///
/// Restocks append a snapshot; order draw-downs mutate the current one
/// inside the caller's transaction.
pub struct InventoryLedger<S: OrderStore> {
    store: S,
}

impl<S: OrderStore> InventoryLedger<S> {
    /// Creates a ledger over the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns the current snapshot, or None if the ledger is empty.
    #[tracing::instrument(skip(self))]
    pub async fn current(&self) -> Result<Option<InventorySnapshot>, DomainError> {
        Ok(self.store.current_inventory().await?)
    }

    /// Appends a snapshot with the given stock level and unit price.
    /// It becomes the current snapshot.
    #[tracing::instrument(skip(self))]
    pub async fn restock(
        &self,
        total_quantity: i64,
        price: Decimal,
    ) -> Result<InventorySnapshot, DomainError> {
        if total_quantity < 0 {
            return Err(ValidationError::NegativeStock(total_quantity).into());
        }
        if price.is_sign_negative() && !price.is_zero() {
            return Err(ValidationError::NegativePrice(price.to_string()).into());
        }
        if price > MAX_UNIT_PRICE {
            return Err(ValidationError::PriceTooLarge(price.to_string()).into());
        }

        let snapshot = self
            .store
            .insert_inventory(NewInventorySnapshot {
                total_quantity,
                price,
            })
            .await?;

        metrics::gauge!("inventory_gallons_available").set(snapshot.total_quantity as f64);
        tracing::info!(
            inventory_id = %snapshot.inventory_id,
            total_quantity = snapshot.total_quantity,
            price = %snapshot.price,
            "inventory restocked"
        );
        Ok(snapshot)
    }

    /// Draws `gallons` from the current snapshot inside `tx`.
    ///
    /// Refuses (with `InsufficientStock`) to take the stock below zero.
    /// Nothing is visible to other readers until `tx` commits.
    pub async fn draw_down(
        &self,
        tx: &mut dyn OrderTransaction,
        gallons: Gallons,
    ) -> Result<InventorySnapshot, StoreError> {
        let snapshot = tx.draw_down_inventory(gallons.get()).await?;

        tracing::debug!(
            inventory_id = %snapshot.inventory_id,
            remaining = snapshot.total_quantity,
            "inventory drawn down"
        );
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use order_store::InMemoryOrderStore;

    use super::*;

    #[tokio::test]
    async fn restock_becomes_current() {
        let store = InMemoryOrderStore::new();
        let ledger = InventoryLedger::new(store.clone());

        assert!(ledger.current().await.unwrap().is_none());

        ledger.restock(1000, Decimal::new(250, 2)).await.unwrap();
        let latest = ledger.restock(1200, Decimal::new(275, 2)).await.unwrap();

        let current = ledger.current().await.unwrap().unwrap();
        assert_eq!(current, latest);
        assert_eq!(store.snapshot_count().await, 2);
    }

    #[tokio::test]
    async fn restock_rejects_negative_values() {
        let ledger = InventoryLedger::new(InMemoryOrderStore::new());

        assert!(matches!(
            ledger.restock(-1, Decimal::ONE).await,
            Err(DomainError::Validation(ValidationError::NegativeStock(-1)))
        ));
        assert!(matches!(
            ledger.restock(10, Decimal::new(-1, 2)).await,
            Err(DomainError::Validation(ValidationError::NegativePrice(_)))
        ));
    }

    #[tokio::test]
    async fn restock_rejects_price_beyond_ledger_column() {
        let store = InMemoryOrderStore::new();
        let ledger = InventoryLedger::new(store.clone());
        let huge = Decimal::from_scientific("1e27").unwrap();

        assert!(matches!(
            ledger.restock(1000, huge).await,
            Err(DomainError::Validation(ValidationError::PriceTooLarge(_)))
        ));
        assert_eq!(store.snapshot_count().await, 0);

        ledger.restock(1000, MAX_UNIT_PRICE).await.unwrap();
        assert_eq!(store.snapshot_count().await, 1);
    }

    #[tokio::test]
    async fn draw_down_is_scoped_to_transaction() {
        let store = InMemoryOrderStore::new();
        let ledger = InventoryLedger::new(store.clone());
        ledger.restock(100, Decimal::new(250, 2)).await.unwrap();

        let mut tx = store.begin().await.unwrap();
        let drawn = ledger
            .draw_down(tx.as_mut(), Gallons::new(30).unwrap())
            .await
            .unwrap();
        assert_eq!(drawn.total_quantity, 70);
        tx.rollback().await.unwrap();

        let current = ledger.current().await.unwrap().unwrap();
        assert_eq!(current.total_quantity, 100);
    }
}
