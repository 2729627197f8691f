//! Row types persisted by the order store.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{CustomerId, InventoryId, OrderId};

/// Largest unit price `inventory_available.price` (`NUMERIC(10, 4)`) holds.
pub const MAX_UNIT_PRICE: Decimal = Decimal::from_parts(0x540B_E3FF, 0x2, 0, false, 4); // 999_999.9999

/// Largest total `customer_order.total_price` (`NUMERIC(12, 2)`) holds.
pub const MAX_TOTAL_PRICE: Decimal = Decimal::from_parts(0xD4A5_0FFF, 0xE8, 0, false, 2); // 9_999_999_999.99

/// A `customer_order` row as written by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub id: OrderId,
    pub customer_id: CustomerId,
    pub num_gallons_order: i64,
    pub date: NaiveDate,
    /// Assigned by the store at insert time.
    pub date_created: DateTime<Utc>,
    pub total_price: Decimal,
    pub status: String,
}

/// Values for a new `customer_order` row. Identity and creation time are
/// assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub customer_id: CustomerId,
    pub num_gallons_order: i64,
    pub date: NaiveDate,
    pub total_price: Decimal,
    pub status: String,
}

impl NewOrder {
    /// Checks the row-level constraints the schema also enforces.
    pub fn validate(&self) -> crate::Result<()> {
        if self.num_gallons_order <= 0 {
            return Err(crate::StoreError::InvalidRecord(format!(
                "num_gallons_order must be positive, got {}",
                self.num_gallons_order
            )));
        }
        if self.total_price.is_sign_negative() {
            return Err(crate::StoreError::InvalidRecord(format!(
                "total_price must not be negative, got {}",
                self.total_price
            )));
        }
        if self.total_price > MAX_TOTAL_PRICE {
            return Err(crate::StoreError::InvalidRecord(format!(
                "total_price must not exceed {MAX_TOTAL_PRICE}, got {}",
                self.total_price
            )));
        }
        if self.status.trim().is_empty() {
            return Err(crate::StoreError::InvalidRecord(
                "status must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// An order joined with the display name of its customer.
///
/// The join is a left join: names are `None` when the account row is gone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    #[serde(flatten)]
    pub order: OrderRecord,
    pub customer_first_name: Option<String>,
    pub customer_last_name: Option<String>,
}

/// An `inventory_available` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySnapshot {
    pub inventory_id: InventoryId,
    pub total_quantity: i64,
    pub price: Decimal,
    pub last_updated: DateTime<Utc>,
}

/// Values for a new inventory snapshot (a restock).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInventorySnapshot {
    pub total_quantity: i64,
    pub price: Decimal,
}

impl NewInventorySnapshot {
    pub fn validate(&self) -> crate::Result<()> {
        if self.total_quantity < 0 {
            return Err(crate::StoreError::InvalidRecord(format!(
                "total_quantity must not be negative, got {}",
                self.total_quantity
            )));
        }
        if self.price.is_sign_negative() {
            return Err(crate::StoreError::InvalidRecord(format!(
                "price must not be negative, got {}",
                self.price
            )));
        }
        if self.price > MAX_UNIT_PRICE {
            return Err(crate::StoreError::InvalidRecord(format!(
                "price must not exceed {MAX_UNIT_PRICE}, got {}",
                self.price
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_order() -> NewOrder {
        NewOrder {
            customer_id: CustomerId::new(1),
            num_gallons_order: 10,
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            total_price: Decimal::new(2500, 2),
            status: "Pending".to_string(),
        }
    }

    #[test]
    fn valid_order_passes() {
        assert!(new_order().validate().is_ok());
    }

    #[test]
    fn negative_price_rejected() {
        let order = NewOrder {
            total_price: Decimal::new(-1, 2),
            ..new_order()
        };
        assert!(matches!(
            order.validate(),
            Err(crate::StoreError::InvalidRecord(_))
        ));
    }

    #[test]
    fn column_limits() {
        assert_eq!(MAX_UNIT_PRICE.to_string(), "999999.9999");
        assert_eq!(MAX_TOTAL_PRICE.to_string(), "9999999999.99");
    }

    #[test]
    fn total_beyond_column_rejected() {
        let order = NewOrder {
            total_price: MAX_TOTAL_PRICE + Decimal::new(1, 2),
            ..new_order()
        };
        assert!(matches!(
            order.validate(),
            Err(crate::StoreError::InvalidRecord(_))
        ));
    }

    #[test]
    fn snapshot_price_beyond_column_rejected() {
        let snapshot = NewInventorySnapshot {
            total_quantity: 1000,
            price: Decimal::new(10_000_000_000, 4),
        };
        assert!(snapshot.validate().is_err());

        let at_limit = NewInventorySnapshot {
            price: MAX_UNIT_PRICE,
            ..snapshot
        };
        assert!(at_limit.validate().is_ok());
    }

    #[test]
    fn zero_gallons_rejected() {
        let order = NewOrder {
            num_gallons_order: 0,
            ..new_order()
        };
        assert!(order.validate().is_err());
    }

    #[test]
    fn blank_status_rejected() {
        let order = NewOrder {
            status: "  ".to_string(),
            ..new_order()
        };
        assert!(order.validate().is_err());
    }

    #[test]
    fn snapshot_rejects_negative_quantity() {
        let snapshot = NewInventorySnapshot {
            total_quantity: -5,
            price: Decimal::ONE,
        };
        assert!(snapshot.validate().is_err());
    }

    #[test]
    fn summary_serializes_flat() {
        let summary = OrderSummary {
            order: OrderRecord {
                id: OrderId::new(3),
                customer_id: CustomerId::new(1),
                num_gallons_order: 10,
                date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                date_created: Utc::now(),
                total_price: Decimal::new(2500, 2),
                status: "Pending".to_string(),
            },
            customer_first_name: Some("Ada".to_string()),
            customer_last_name: None,
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["customer_first_name"], "Ada");
        assert!(json["customer_last_name"].is_null());
    }
}
