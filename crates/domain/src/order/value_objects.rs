//! Value objects for the order domain.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::ValidationError;

/// A positive quantity of fuel in gallons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Gallons(i64);

impl Gallons {
    /// Creates a quantity, rejecting zero and negative values.
    pub fn new(gallons: i64) -> Result<Self, ValidationError> {
        if gallons <= 0 {
            return Err(ValidationError::NonPositiveQuantity(gallons));
        }
        Ok(Self(gallons))
    }

    /// Parses raw request text.
    ///
    /// Text that is not an integer and integers that are not positive are
    /// reported as different errors.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let gallons: i64 = raw
            .trim()
            .parse()
            .map_err(|e: std::num::ParseIntError| ValidationError::InvalidQuantity(e.to_string()))?;
        Self::new(gallons)
    }

    /// Returns the number of gallons.
    pub fn get(&self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for Gallons {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Gallons> for i64 {
    fn from(g: Gallons) -> Self {
        g.0
    }
}

impl std::fmt::Display for Gallons {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} gal", self.0)
    }
}

/// A monetary amount held to whole cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Creates a Money amount, rounding to cents (midpoint away from zero).
    pub fn from_decimal(amount: Decimal) -> Self {
        Self(amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
    }

    /// Creates a Money amount from cents.
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// Returns zero money.
    pub fn zero() -> Self {
        Self(Decimal::new(0, 2))
    }

    /// Returns the amount as a decimal with two fractional digits.
    pub fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is negative.
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Prices `gallons` at `unit_price` per gallon.
    ///
    /// Returns None when the product does not fit in a `Decimal`.
    pub fn for_gallons(unit_price: Decimal, gallons: Gallons) -> Option<Self> {
        unit_price
            .checked_mul(Decimal::from(gallons.get()))
            .map(Self::from_decimal)
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_negative() {
            write!(f, "-${:.2}", self.0.abs())
        } else {
            write!(f, "${:.2}", self.0)
        }
    }
}

impl From<Money> for Decimal {
    fn from(m: Money) -> Self {
        m.0
    }
}
