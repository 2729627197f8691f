//! Persists validated orders inside an open transaction.

use order_store::{NewOrder, OrderRecord, OrderTransaction, StoreError};

use super::{Money, PlaceOrder};

/// Writes order rows.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderRecorder;

impl OrderRecorder {
    /// Inserts `order` priced at `total_price` and returns the stored row.
    ///
    /// The row only becomes visible when `tx` commits.
    pub async fn record(
        &self,
        tx: &mut dyn OrderTransaction,
        order: &PlaceOrder,
        total_price: Money,
    ) -> Result<OrderRecord, StoreError> {
        if total_price.is_negative() {
            return Err(StoreError::InvalidRecord(format!(
                "total price {total_price} is negative"
            )));
        }

        let record = tx
            .insert_order(NewOrder {
                customer_id: order.customer_id,
                num_gallons_order: order.gallons.get(),
                date: order.date,
                total_price: total_price.amount(),
                status: order.status.as_str().to_string(),
            })
            .await?;

        tracing::debug!(order_id = %record.id, "order row inserted");
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use common::CustomerId;
    use order_store::{InMemoryOrderStore, OrderStore};

    use super::*;
    use crate::order::{Gallons, OrderStatus};

    fn place_order() -> PlaceOrder {
        PlaceOrder {
            customer_id: CustomerId::new(7),
            gallons: Gallons::new(12).unwrap(),
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            status: OrderStatus::Confirmed,
        }
    }

    #[tokio::test]
    async fn record_writes_canonical_status() {
        let store = InMemoryOrderStore::new();
        store.add_customer(CustomerId::new(7), "Ada", "Lovelace").await;

        let mut tx = store.begin().await.unwrap();
        let record = OrderRecorder
            .record(tx.as_mut(), &place_order(), Money::from_cents(3000))
            .await
            .unwrap();
        tx.commit().await.unwrap();

        assert_eq!(record.status, "Confirmed");
        assert_eq!(record.num_gallons_order, 12);
        assert_eq!(record.total_price, Money::from_cents(3000).amount());
        assert_eq!(store.order_count().await, 1);
    }

    #[tokio::test]
    async fn record_rejects_negative_price() {
        let store = InMemoryOrderStore::new();
        store.add_customer(CustomerId::new(7), "Ada", "Lovelace").await;

        let mut tx = store.begin().await.unwrap();
        let result = OrderRecorder
            .record(tx.as_mut(), &place_order(), Money::from_cents(-1))
            .await;

        assert!(matches!(result, Err(StoreError::InvalidRecord(_))));
    }

    #[tokio::test]
    async fn record_propagates_store_failure() {
        let store = InMemoryOrderStore::new();

        let mut tx = store.begin().await.unwrap();
        let result = OrderRecorder
            .record(tx.as_mut(), &place_order(), Money::from_cents(100))
            .await;

        assert!(matches!(result, Err(StoreError::CustomerNotFound(_))));
    }
}
