//! Request payloads
//!
//! Field-level constraints live here as `validator` derives; business rules
//! (platform gating, status transitions) are enforced server-side at the
//! mutation boundary.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::types::{KitchenStatus, OrderStatus, OrderType, Platform, PlatformAvailability, TableStatus};

// =============================================================================
// Orders
// =============================================================================

/// One cart line of an order being placed
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    #[validate(length(min = 1))]
    pub dish_id: String,
    #[validate(range(min = 1))]
    pub quantity: i64,
    pub notes: Option<String>,
}

/// Order metadata supplied by the client at placement time
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    pub table_number: Option<String>,
    #[validate(range(min = 1))]
    #[serde(default = "default_guests")]
    pub guests: i64,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub status: Option<OrderStatus>,
    pub customer_id: Option<String>,
    /// Client-side total for cross-checking; a mismatch beyond 1 minor unit
    /// marks the order `validation_failed` instead of rejecting it.
    pub expected_total_minor: Option<i64>,
}

fn default_guests() -> i64 {
    1
}

/// `POST /api/orders` body
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    #[validate(nested)]
    pub order: OrderDraft,
    #[validate(length(min = 1), nested)]
    pub items: Vec<CartLine>,
}

/// `PATCH /api/orders/:id/kitchen-status` body
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KitchenStatusUpdate {
    pub kitchen_status: KitchenStatus,
}

/// `PATCH /api/orders/:id/status` body
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatusUpdate {
    pub status: OrderStatus,
}

// =============================================================================
// Dishes
// =============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DishCreate {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(range(min = 0))]
    pub price_minor: i64,
    #[validate(length(min = 1))]
    pub category: String,
    #[serde(default = "default_true")]
    pub veg: bool,
    pub image: Option<String>,
    #[serde(default = "default_true")]
    pub available: bool,
    #[serde(default)]
    pub availability: PlatformAvailability,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DishUpdate {
    #[validate(length(min = 1))]
    pub name: Option<String>,
    #[validate(range(min = 0))]
    pub price_minor: Option<i64>,
    pub category: Option<String>,
    pub veg: Option<bool>,
    pub image: Option<String>,
    pub available: Option<bool>,
    pub availability: Option<PlatformAvailability>,
}

/// `POST /api/dishes/bulk-availability` body
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BulkAvailabilityRequest {
    #[validate(length(min = 1))]
    pub dish_ids: Vec<String>,
    pub platform: Platform,
    pub enabled: bool,
}

// =============================================================================
// Customers
// =============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CustomerCreate {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub phone: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
}

// =============================================================================
// Tables
// =============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TableCreate {
    #[validate(length(min = 1))]
    pub number: String,
    #[validate(length(min = 1))]
    pub section: String,
    #[validate(range(min = 1))]
    #[serde(default = "default_capacity")]
    pub capacity: i64,
    pub status: Option<TableStatus>,
}

fn default_capacity() -> i64 {
    4
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableUpdate {
    pub number: Option<String>,
    pub section: Option<String>,
    pub capacity: Option<i64>,
    pub status: Option<TableStatus>,
}

// =============================================================================
// Ingredients
// =============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct IngredientCreate {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub unit: String,
    #[serde(default)]
    pub current_stock: f64,
    #[serde(default)]
    pub min_level: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientUpdate {
    pub name: Option<String>,
    pub unit: Option<String>,
    pub current_stock: Option<f64>,
    pub min_level: Option<f64>,
}

/// `POST /api/dishes/:id/ingredients` body — links an ingredient to a dish
/// with the per-unit quantity consumed.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DishIngredientCreate {
    #[validate(length(min = 1))]
    pub ingredient_id: String,
    #[validate(range(exclusive_min = 0.0))]
    pub quantity: f64,
}
