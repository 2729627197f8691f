use serde::{Deserialize, Serialize};

/// Declares an integer identifier newtype backed by a store-assigned `i64`.
///
/// Wrapping the raw key keeps order, customer and inventory identities
/// from being mixed up at call sites.
macro_rules! int_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Creates an identifier from a raw key.
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Returns the raw key.
            pub const fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

int_id!(
    /// Identifier of a row in `customer_order`.
    OrderId
);

int_id!(
    /// Identifier of a customer account (`Accounts.id`).
    CustomerId
);

int_id!(
    /// Identifier of an inventory snapshot row.
    InventoryId
);

impl std::str::FromStr for CustomerId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i64>().map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_id_preserves_value() {
        let id = OrderId::new(42);
        assert_eq!(id.as_i64(), 42);
        assert_eq!(i64::from(id), 42);
    }

    #[test]
    fn ids_serialize_as_plain_integers() {
        let json = serde_json::to_string(&CustomerId::new(7)).unwrap();
        assert_eq!(json, "7");
        let back: CustomerId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, CustomerId::new(7));
    }

    #[test]
    fn customer_id_parses_trimmed_text() {
        assert_eq!(" 12 ".parse::<CustomerId>().unwrap(), CustomerId::new(12));
        assert!("abc".parse::<CustomerId>().is_err());
    }

    #[test]
    fn display_shows_raw_key() {
        assert_eq!(InventoryId::new(3).to_string(), "3");
    }
}
