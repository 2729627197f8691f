//! Price derivation from the current inventory snapshot.

use common::InventoryId;
use order_store::{MAX_TOTAL_PRICE, OrderStore, StoreError};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::order::{Gallons, Money};

/// Errors raised while pricing an order.
#[derive(Debug, Error)]
pub enum PricingError {
    /// The ledger holds no snapshot to take a price from.
    #[error("No inventory data available")]
    NoInventoryData,

    /// The total is beyond what an order can carry.
    #[error("Order total out of range: {gallons} at {unit_price} per gallon")]
    Overflow { unit_price: Decimal, gallons: Gallons },

    /// The price could not be read.
    #[error("Failed to read inventory price: {0}")]
    Store(#[from] StoreError),
}

/// A computed price for a requested quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quote {
    /// Snapshot the unit price was read from.
    pub inventory_id: InventoryId,
    pub unit_price: Decimal,
    pub gallons: Gallons,
    pub total: Money,
}

/// Derives order prices from the current inventory snapshot.
///
/// Read-only; quantities are validated by the caller.
pub struct PriceCalculator<S: OrderStore> {
    store: S,
}

impl<S: OrderStore> PriceCalculator<S> {
    /// Creates a calculator reading from the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Prices `gallons` at the current unit price.
    #[tracing::instrument(skip(self))]
    pub async fn quote(&self, gallons: Gallons) -> Result<Quote, PricingError> {
        let snapshot = self
            .store
            .current_inventory()
            .await?
            .ok_or(PricingError::NoInventoryData)?;

        let total = Money::for_gallons(snapshot.price, gallons)
            .filter(|total| total.amount() <= MAX_TOTAL_PRICE)
            .ok_or(PricingError::Overflow {
                unit_price: snapshot.price,
                gallons,
            })?;

        Ok(Quote {
            inventory_id: snapshot.inventory_id,
            unit_price: snapshot.price,
            gallons,
            total,
        })
    }
}

#[cfg(test)]
mod tests {
    use order_store::{InMemoryOrderStore, NewInventorySnapshot};

    use super::*;

    async fn stocked(price: Decimal) -> InMemoryOrderStore {
        let store = InMemoryOrderStore::new();
        store
            .insert_inventory(NewInventorySnapshot {
                total_quantity: 1000,
                price,
            })
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn quote_multiplies_unit_price() {
        let calculator = PriceCalculator::new(stocked(Decimal::new(250, 2)).await);

        let quote = calculator.quote(Gallons::new(40).unwrap()).await.unwrap();
        assert_eq!(quote.total, Money::from_cents(10000));
        assert_eq!(quote.unit_price, Decimal::new(250, 2));
        assert_eq!(quote.inventory_id, InventoryId::new(1));
    }

    #[tokio::test]
    async fn quote_uses_latest_snapshot() {
        let store = stocked(Decimal::new(250, 2)).await;
        store
            .insert_inventory(NewInventorySnapshot {
                total_quantity: 800,
                price: Decimal::new(3199, 3),
            })
            .await
            .unwrap();
        let calculator = PriceCalculator::new(store);

        let quote = calculator.quote(Gallons::new(10).unwrap()).await.unwrap();
        assert_eq!(quote.total, Money::from_cents(3199));
        assert_eq!(quote.inventory_id, InventoryId::new(2));
    }

    #[tokio::test]
    async fn quote_without_inventory_fails() {
        let calculator = PriceCalculator::new(InMemoryOrderStore::new());

        let result = calculator.quote(Gallons::new(1).unwrap()).await;
        assert!(matches!(result, Err(PricingError::NoInventoryData)));
    }

    #[tokio::test]
    async fn quote_beyond_order_limit_overflows() {
        let calculator = PriceCalculator::new(stocked(Decimal::new(5, 0)).await);

        let result = calculator.quote(Gallons::new(i64::MAX).unwrap()).await;
        assert!(matches!(result, Err(PricingError::Overflow { .. })));

        // 999999.9999 * 20000 is past NUMERIC(12, 2)
        let calculator = PriceCalculator::new(stocked(order_store::MAX_UNIT_PRICE).await);
        let result = calculator.quote(Gallons::new(20_000).unwrap()).await;
        assert!(matches!(result, Err(PricingError::Overflow { .. })));
    }

    #[tokio::test]
    async fn quote_has_no_side_effects() {
        let store = stocked(Decimal::new(250, 2)).await;
        let calculator = PriceCalculator::new(store.clone());

        calculator.quote(Gallons::new(40).unwrap()).await.unwrap();

        let current = store.current_inventory().await.unwrap().unwrap();
        assert_eq!(current.total_quantity, 1000);
        assert_eq!(store.order_count().await, 0);
    }
}
