//! Shared types for the POS back office
//!
//! Domain entities, status enums and the request/response payloads exchanged
//! between the server and its clients. Everything here is plain data — no
//! storage concerns leak into this crate.

pub mod request;
pub mod response;
pub mod types;

// Re-exports
pub use serde::{Deserialize, Serialize};
pub use types::{
    Customer, Dish, DishIngredient, DiningTable, Ingredient, KitchenStatus, Order, OrderItem,
    OrderStatus, OrderType, Platform, PlatformAvailability, TableStatus,
};
