//! Domain layer for the fuel order service.
//!
//! This crate provides:
//! - [`PriceCalculator`]: prices a quantity from the current inventory snapshot
//! - [`InventoryLedger`]: reads, restocks and draws down the inventory
//! - [`OrderRecorder`]: writes order rows inside a transaction
//! - [`OrderService`]: places orders atomically and lists them

pub mod error;
pub mod inventory;
pub mod order;
pub mod pricing;

pub use error::DomainError;
pub use inventory::InventoryLedger;
pub use order::{
    Gallons, Money, OrderRecorder, OrderService, OrderStatus, PlaceOrder, PlaceOrderError,
    PlaceOrderRequest, PlacedOrder, PlacementStep, ValidationError,
};
pub use pricing::{PriceCalculator, PricingError, Quote};
