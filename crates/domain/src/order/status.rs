//! Order status.

use serde::{Deserialize, Serialize};

use super::ValidationError;

/// The status an order is recorded with.
///
/// Only `Pending` draws the ordered fuel from inventory when the order is
/// placed. Transitions after creation are handled elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    /// Accepted and awaiting delivery; stock is reserved at placement.
    #[default]
    Pending,

    /// Confirmed against stock that was already accounted for.
    Confirmed,

    /// Fuel has been delivered.
    Delivered,

    /// Order was cancelled.
    Cancelled,
}

impl OrderStatus {
    /// Parses raw request text. Empty text yields the default (`Pending`);
    /// matching is case-insensitive.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(Self::default());
        }

        [
            OrderStatus::Pending,
            OrderStatus::Confirmed,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
        ]
        .into_iter()
        .find(|s| s.as_str().eq_ignore_ascii_case(raw))
        .ok_or_else(|| ValidationError::InvalidStatus(raw.to_string()))
    }

    /// Returns true if placing an order with this status draws down inventory.
    pub fn draws_inventory(&self) -> bool {
        matches!(self, OrderStatus::Pending)
    }

    /// Returns the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Confirmed => "Confirmed",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_status_is_pending() {
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
        assert_eq!(OrderStatus::parse("").unwrap(), OrderStatus::Pending);
        assert_eq!(OrderStatus::parse("   ").unwrap(), OrderStatus::Pending);
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(OrderStatus::parse("confirmed").unwrap(), OrderStatus::Confirmed);
        assert_eq!(OrderStatus::parse("PENDING").unwrap(), OrderStatus::Pending);
        assert_eq!(OrderStatus::parse("Delivered").unwrap(), OrderStatus::Delivered);
    }

    #[test]
    fn test_unknown_status_rejected() {
        assert!(matches!(
            OrderStatus::parse("Shipped"),
            Err(ValidationError::InvalidStatus(s)) if s == "Shipped"
        ));
    }

    #[test]
    fn test_only_pending_draws_inventory() {
        assert!(OrderStatus::Pending.draws_inventory());
        assert!(!OrderStatus::Confirmed.draws_inventory());
        assert!(!OrderStatus::Delivered.draws_inventory());
        assert!(!OrderStatus::Cancelled.draws_inventory());
    }

    #[test]
    fn test_status_display() {
        assert_eq!(OrderStatus::Cancelled.to_string(), "Cancelled");
    }
}
