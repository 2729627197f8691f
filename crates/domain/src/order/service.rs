//! Order service: atomic order placement and order queries.

use chrono::{NaiveDate, Utc};
use common::OrderId;
use order_store::{OrderRecord, OrderStore, OrderSummary, OrderTransaction, StoreError};

use crate::error::DomainError;
use crate::inventory::InventoryLedger;
use crate::pricing::PriceCalculator;

use super::{Money, OrderRecorder, PlaceOrderError, PlaceOrderRequest, PlacementStep};

/// Outcome of a successful placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedOrder {
    pub order_id: OrderId,
    pub total_price: Money,
    pub order: OrderRecord,
    /// Stock left in the current snapshot, when the order drew from it.
    pub remaining_stock: Option<i64>,
}

/// Service for placing and querying orders.
///
/// Placement prices the order from the current inventory snapshot, then
/// records it and (for pending orders) draws the fuel down inside a single
/// transaction. Either both writes commit or neither does.
pub struct OrderService<S: OrderStore> {
    store: S,
    pricing: PriceCalculator<S>,
    ledger: InventoryLedger<S>,
    recorder: OrderRecorder,
}

impl<S: OrderStore + Clone> OrderService<S> {
    /// Creates a new order service over the given store.
    pub fn new(store: S) -> Self {
        Self {
            pricing: PriceCalculator::new(store.clone()),
            ledger: InventoryLedger::new(store.clone()),
            recorder: OrderRecorder,
            store,
        }
    }

    /// Returns the inventory ledger the service draws from.
    pub fn ledger(&self) -> &InventoryLedger<S> {
        &self.ledger
    }

    /// Places an order, defaulting an empty date to today (UTC).
    #[tracing::instrument(skip(self, request), fields(customer_id = %request.customer_id))]
    pub async fn place_order(
        &self,
        request: PlaceOrderRequest,
    ) -> Result<PlacedOrder, PlaceOrderError> {
        let started = std::time::Instant::now();
        let result = self.place_order_on(request, Utc::now().date_naive()).await;
        metrics::histogram!("order_placement_duration_seconds")
            .record(started.elapsed().as_secs_f64());

        match &result {
            Ok(placed) => {
                metrics::counter!("orders_placed_total").increment(1);
                tracing::info!(
                    order_id = %placed.order_id,
                    total_price = %placed.total_price,
                    status = %placed.order.status,
                    "order saved"
                );
            }
            Err(err) => {
                metrics::counter!("orders_failed_total", "kind" => err.kind()).increment(1);
                tracing::warn!(kind = err.kind(), error = %err, "order rejected");
            }
        }
        result
    }

    /// Places an order using `today` as the default date.
    pub async fn place_order_on(
        &self,
        request: PlaceOrderRequest,
        today: NaiveDate,
    ) -> Result<PlacedOrder, PlaceOrderError> {
        let order = request.validate(today)?;
        let quote = self.pricing.quote(order.gallons).await?;

        let mut tx = self
            .store
            .begin()
            .await
            .map_err(|e| PlaceOrderError::persistence(PlacementStep::Begin, e))?;

        let recorded = self.recorder.record(tx.as_mut(), &order, quote.total).await;
        let record = match recorded {
            Ok(record) => record,
            Err(e) => return Err(abort(tx, PlacementStep::RecordOrder, e).await),
        };

        let remaining_stock = if order.status.draws_inventory() {
            let drawn = self.ledger.draw_down(tx.as_mut(), order.gallons).await;
            match drawn {
                Ok(snapshot) => Some(snapshot.total_quantity),
                Err(e) => return Err(abort(tx, PlacementStep::DrawDownInventory, e).await),
            }
        } else {
            None
        };

        tx.commit()
            .await
            .map_err(|e| PlaceOrderError::persistence(PlacementStep::Commit, e))?;

        if let Some(remaining) = remaining_stock {
            metrics::counter!("inventory_gallons_drawn_total").increment(order.gallons.get() as u64);
            metrics::gauge!("inventory_gallons_available").set(remaining as f64);
        }

        Ok(PlacedOrder {
            order_id: record.id,
            total_price: quote.total,
            order: record,
            remaining_stock,
        })
    }

    /// Lists every committed order with its customer's name.
    #[tracing::instrument(skip(self))]
    pub async fn list_orders(&self) -> Result<Vec<OrderSummary>, DomainError> {
        Ok(self.store.list_orders().await?)
    }

    /// Loads an order by ID.
    ///
    /// Returns None if the order doesn't exist.
    #[tracing::instrument(skip(self))]
    pub async fn get_order(&self, order_id: OrderId) -> Result<Option<OrderSummary>, DomainError> {
        Ok(self.store.get_order(order_id).await?)
    }
}

/// Rolls `tx` back and converts the failure that caused it.
async fn abort(
    tx: Box<dyn OrderTransaction>,
    step: PlacementStep,
    cause: StoreError,
) -> PlaceOrderError {
    // A failed rollback still discards the work: the connection is dropped.
    if let Err(e) = tx.rollback().await {
        tracing::error!(error = %e, %step, "rollback failed");
    }
    PlaceOrderError::persistence(step, cause)
}
