//! Customer fuel orders: validation, recording and placement.

mod recorder;
mod request;
mod service;
mod status;
mod value_objects;

pub use recorder::OrderRecorder;
pub use request::{PlaceOrder, PlaceOrderRequest};
pub use service::{OrderService, PlacedOrder};
pub use status::OrderStatus;
pub use value_objects::{Gallons, Money};

use order_store::StoreError;
use thiserror::Error;

use crate::pricing::PricingError;

/// Rejections of raw order input. Raised before the store is touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Customer ID is required.
    #[error("Customer ID is required")]
    CustomerIdRequired,

    /// Customer ID is not an integer.
    #[error("Invalid customer ID: {0}")]
    InvalidCustomerId(String),

    /// Gallons are not an integer.
    #[error("Invalid number of gallons: {0}")]
    InvalidQuantity(String),

    /// Gallons are zero or negative.
    #[error("Number of gallons must be greater than zero, got {0}")]
    NonPositiveQuantity(i64),

    /// Date is not `YYYY-MM-DD`.
    #[error("Invalid order date: {0}")]
    InvalidDate(String),

    /// Status is not one of the known statuses.
    #[error("Invalid order status: {0}")]
    InvalidStatus(String),

    /// A unit price below zero.
    #[error("Invalid price: {0} (must not be negative)")]
    NegativePrice(String),

    /// A unit price beyond what the ledger can hold.
    #[error("Invalid price: {0} (must not exceed {max})", max = order_store::MAX_UNIT_PRICE)]
    PriceTooLarge(String),

    /// A stock level below zero.
    #[error("Invalid stock level: {0} (must not be negative)")]
    NegativeStock(i64),
}

/// The step of order placement at which the store failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementStep {
    Begin,
    RecordOrder,
    DrawDownInventory,
    Commit,
}

impl PlacementStep {
    /// Short description shown to callers.
    pub fn as_str(&self) -> &'static str {
        match self {
            PlacementStep::Begin => "Failed to start transaction",
            PlacementStep::RecordOrder => "Failed to save order",
            PlacementStep::DrawDownInventory => "Failed to update inventory",
            PlacementStep::Commit => "Failed to save order and update inventory",
        }
    }
}

impl std::fmt::Display for PlacementStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors returned by order placement.
///
/// Every variant raised after the transaction was opened means the
/// transaction was rolled back: nothing from the attempt is persisted.
#[derive(Debug, Error)]
pub enum PlaceOrderError {
    /// The request was malformed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The order could not be priced.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// The current snapshot cannot cover a pending order.
    #[error("Insufficient stock: requested {requested} gallons, {available} available")]
    InsufficientStock { requested: i64, available: i64 },

    /// The store failed while recording the order.
    #[error("{step}: {source}")]
    Persistence {
        step: PlacementStep,
        #[source]
        source: StoreError,
    },
}

impl PlaceOrderError {
    /// Machine-readable category of the failure.
    pub fn kind(&self) -> &'static str {
        match self {
            PlaceOrderError::Validation(_) => "invalid_input",
            PlaceOrderError::Pricing(_) => "pricing_failure",
            PlaceOrderError::InsufficientStock { .. } => "insufficient_stock",
            PlaceOrderError::Persistence { .. } => "persistence_failure",
        }
    }

    /// Short human-readable summary; `Display` carries the detail.
    pub fn summary(&self) -> &'static str {
        match self {
            PlaceOrderError::Validation(ValidationError::CustomerIdRequired) => {
                "Customer ID is required"
            }
            PlaceOrderError::Validation(_) => "Invalid input",
            PlaceOrderError::Pricing(_) => "Failed to calculate price",
            PlaceOrderError::InsufficientStock { .. } => "Insufficient stock",
            PlaceOrderError::Persistence { step, .. } => step.as_str(),
        }
    }

    pub(crate) fn persistence(step: PlacementStep, source: StoreError) -> Self {
        match source {
            StoreError::InsufficientStock {
                requested,
                available,
            } => PlaceOrderError::InsufficientStock {
                requested,
                available,
            },
            source => PlaceOrderError::Persistence { step, source },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_are_distinct() {
        let validation = PlaceOrderError::from(ValidationError::CustomerIdRequired);
        let pricing = PlaceOrderError::from(PricingError::NoInventoryData);
        let stock = PlaceOrderError::InsufficientStock {
            requested: 5,
            available: 1,
        };
        let persistence =
            PlaceOrderError::persistence(PlacementStep::Commit, StoreError::NoInventory);

        assert_eq!(validation.kind(), "invalid_input");
        assert_eq!(pricing.kind(), "pricing_failure");
        assert_eq!(stock.kind(), "insufficient_stock");
        assert_eq!(persistence.kind(), "persistence_failure");
    }

    #[test]
    fn missing_customer_message() {
        let err = PlaceOrderError::from(ValidationError::CustomerIdRequired);
        assert_eq!(err.summary(), "Customer ID is required");
        assert_eq!(err.to_string(), "Customer ID is required");
    }

    #[test]
    fn store_shortage_becomes_insufficient_stock() {
        let err = PlaceOrderError::persistence(
            PlacementStep::DrawDownInventory,
            StoreError::InsufficientStock {
                requested: 50,
                available: 10,
            },
        );
        assert!(matches!(
            err,
            PlaceOrderError::InsufficientStock {
                requested: 50,
                available: 10
            }
        ));
    }

    #[test]
    fn persistence_detail_names_step_and_cause() {
        let err = PlaceOrderError::persistence(
            PlacementStep::DrawDownInventory,
            StoreError::Unavailable("inventory update failed".to_string()),
        );
        assert_eq!(err.summary(), "Failed to update inventory");
        assert_eq!(
            err.to_string(),
            "Failed to update inventory: Store unavailable: inventory update failed"
        );
    }
}
