//! Inbound order requests and their validated form.

use chrono::NaiveDate;
use common::CustomerId;
use serde::{Deserialize, Serialize};

use super::{Gallons, OrderStatus, ValidationError};

/// Raw order payload as delivered by the request source.
///
/// Every field arrives as text; missing fields deserialize as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaceOrderRequest {
    pub customer_id: String,
    pub num_gallons_order: String,
    pub date: String,
    pub status: String,
}

impl PlaceOrderRequest {
    /// Creates a request from raw fields.
    pub fn new(
        customer_id: impl Into<String>,
        num_gallons_order: impl Into<String>,
        date: impl Into<String>,
        status: impl Into<String>,
    ) -> Self {
        Self {
            customer_id: customer_id.into(),
            num_gallons_order: num_gallons_order.into(),
            date: date.into(),
            status: status.into(),
        }
    }

    /// Validates the request, filling in defaults.
    ///
    /// An empty date becomes `today`; an empty status becomes `Pending`.
    pub fn validate(&self, today: NaiveDate) -> Result<PlaceOrder, ValidationError> {
        let customer_id = self.customer_id.trim();
        if customer_id.is_empty() {
            return Err(ValidationError::CustomerIdRequired);
        }
        let customer_id: CustomerId = customer_id
            .parse()
            .map_err(|_| ValidationError::InvalidCustomerId(customer_id.to_string()))?;

        let gallons = Gallons::parse(&self.num_gallons_order)?;

        let date = match self.date.trim() {
            "" => today,
            raw => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|_| ValidationError::InvalidDate(raw.to_string()))?,
        };

        let status = OrderStatus::parse(&self.status)?;

        Ok(PlaceOrder {
            customer_id,
            gallons,
            date,
            status,
        })
    }
}

/// A validated order placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceOrder {
    pub customer_id: CustomerId,
    pub gallons: Gallons,
    pub date: NaiveDate,
    pub status: OrderStatus,
}
