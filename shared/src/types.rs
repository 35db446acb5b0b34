//! Domain entities and status enums
//!
//! All monetary amounts are minor-unit integers (`i64`, e.g. paise/cents) —
//! the single canonical money representation across the stack. Status values
//! round-trip through the database as their wire strings, so `as_str` /
//! `FromStr` must stay in lockstep with the serde renames.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Status enums
// =============================================================================

/// Order type: eat-in vs. takeaway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderType {
    DineIn,
    Takeaway,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::DineIn => "dine-in",
            OrderType::Takeaway => "takeaway",
        }
    }
}

impl FromStr for OrderType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dine-in" => Ok(OrderType::DineIn),
            "takeaway" => Ok(OrderType::Takeaway),
            other => Err(format!("unknown order type: {other}")),
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Front-of-house order status
///
/// `Served` and `Cancelled` are terminal — once an order reaches either, no
/// further status writes are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    Served,
    Cancelled,
    Waitlist,
    ValidationFailed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Served => "served",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Waitlist => "waitlist",
            OrderStatus::ValidationFailed => "validation_failed",
        }
    }

    /// Terminal statuses accept no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Served | OrderStatus::Cancelled)
    }

    /// Statuses shown in the active-orders view
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            OrderStatus::Pending | OrderStatus::Confirmed | OrderStatus::Preparing
        )
    }

    /// Whether a transition from `self` to `next` is legal.
    ///
    /// Out of a terminal status nothing is allowed; everything else may move
    /// freely (the front-of-house flow is operator-driven, not linear).
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        !self.is_terminal() && *self != next
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "confirmed" => Ok(OrderStatus::Confirmed),
            "preparing" => Ok(OrderStatus::Preparing),
            "served" => Ok(OrderStatus::Served),
            "cancelled" => Ok(OrderStatus::Cancelled),
            "waitlist" => Ok(OrderStatus::Waitlist),
            "validation_failed" => Ok(OrderStatus::ValidationFailed),
            other => Err(format!("unknown order status: {other}")),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kitchen ticket status — a forward-only sequence.
///
/// `pending → sent → preparing → ready`; `Ready` is terminal (a completed
/// ticket is never reopened from the kitchen panel).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KitchenStatus {
    Pending,
    Sent,
    Preparing,
    Ready,
}

impl KitchenStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            KitchenStatus::Pending => "pending",
            KitchenStatus::Sent => "sent",
            KitchenStatus::Preparing => "preparing",
            KitchenStatus::Ready => "ready",
        }
    }

    /// Successor in the kitchen sequence, `None` once the ticket is ready
    pub fn next(&self) -> Option<KitchenStatus> {
        match self {
            KitchenStatus::Pending => Some(KitchenStatus::Sent),
            KitchenStatus::Sent => Some(KitchenStatus::Preparing),
            KitchenStatus::Preparing => Some(KitchenStatus::Ready),
            KitchenStatus::Ready => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, KitchenStatus::Ready)
    }

    /// Tickets in these states appear on the KOT panel
    pub fn is_kitchen_active(&self) -> bool {
        !self.is_terminal()
    }
}

impl FromStr for KitchenStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(KitchenStatus::Pending),
            "sent" => Ok(KitchenStatus::Sent),
            "preparing" => Ok(KitchenStatus::Preparing),
            "ready" => Ok(KitchenStatus::Ready),
            other => Err(format!("unknown kitchen status: {other}")),
        }
    }
}

impl fmt::Display for KitchenStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dining table occupancy status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableStatus {
    Available,
    Occupied,
    Reserved,
    Cleaning,
}

impl TableStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TableStatus::Available => "available",
            TableStatus::Occupied => "occupied",
            TableStatus::Reserved => "reserved",
            TableStatus::Cleaning => "cleaning",
        }
    }
}

impl FromStr for TableStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(TableStatus::Available),
            "occupied" => Ok(TableStatus::Occupied),
            "reserved" => Ok(TableStatus::Reserved),
            "cleaning" => Ok(TableStatus::Cleaning),
            other => Err(format!("unknown table status: {other}")),
        }
    }
}

impl fmt::Display for TableStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Platform availability
// =============================================================================

/// Sales channel for a dish.
///
/// A closed enum rather than a string-keyed map: an invalid platform is a
/// type error, not a silent no-op write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Restaurant,
    Zomato,
    Swiggy,
    Other,
}

impl Platform {
    pub const ALL: [Platform; 4] = [
        Platform::Restaurant,
        Platform::Zomato,
        Platform::Swiggy,
        Platform::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Restaurant => "restaurant",
            Platform::Zomato => "zomato",
            Platform::Swiggy => "swiggy",
            Platform::Other => "other",
        }
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "restaurant" => Ok(Platform::Restaurant),
            "zomato" => Ok(Platform::Zomato),
            "swiggy" => Ok(Platform::Swiggy),
            "other" => Ok(Platform::Other),
            other => Err(format!("unknown platform: {other}")),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-platform visibility flags for a dish — fixed shape, all four channels
/// always present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformAvailability {
    pub restaurant: bool,
    pub zomato: bool,
    pub swiggy: bool,
    pub other: bool,
}

impl PlatformAvailability {
    pub fn get(&self, platform: Platform) -> bool {
        match platform {
            Platform::Restaurant => self.restaurant,
            Platform::Zomato => self.zomato,
            Platform::Swiggy => self.swiggy,
            Platform::Other => self.other,
        }
    }

    pub fn set(&mut self, platform: Platform, enabled: bool) {
        match platform {
            Platform::Restaurant => self.restaurant = enabled,
            Platform::Zomato => self.zomato = enabled,
            Platform::Swiggy => self.swiggy = enabled,
            Platform::Other => self.other = enabled,
        }
    }
}

impl Default for PlatformAvailability {
    /// New dishes start visible in-house only
    fn default() -> Self {
        Self {
            restaurant: true,
            zomato: false,
            swiggy: false,
            other: false,
        }
    }
}

// =============================================================================
// Entities
// =============================================================================

/// Menu item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dish {
    pub id: String,
    pub name: String,
    pub price_minor: i64,
    pub category: String,
    pub veg: bool,
    pub image: Option<String>,
    pub available: bool,
    pub availability: PlatformAvailability,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One customer order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub table_number: Option<String>,
    pub guests: i64,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub status: OrderStatus,
    pub kitchen_status: Option<KitchenStatus>,
    pub total_minor: i64,
    pub customer_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// One line of an order — `price_minor` is a snapshot of the dish price at
/// order time and is never re-linked to the live dish.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: String,
    pub order_id: String,
    pub dish_id: String,
    pub quantity: i64,
    pub price_minor: i64,
    pub notes: Option<String>,
}

/// Stock-tracked raw material
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    pub id: String,
    pub name: String,
    pub unit: String,
    pub current_stock: f64,
    pub min_level: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Dish → Ingredient join with the per-unit quantity consumed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DishIngredient {
    pub id: String,
    pub dish_id: String,
    pub ingredient_id: String,
    pub quantity: f64,
    pub created_at: DateTime<Utc>,
}

/// Customer record with running lifetime value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub last_visit: Option<DateTime<Utc>>,
    pub lifetime_value_minor: i64,
    pub total_orders: i64,
}

/// Dining table — (number, section) is unique per owner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiningTable {
    pub id: String,
    pub number: String,
    pub section: String,
    pub capacity: i64,
    pub status: TableStatus,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kitchen_status_forward_sequence() {
        assert_eq!(KitchenStatus::Pending.next(), Some(KitchenStatus::Sent));
        assert_eq!(KitchenStatus::Sent.next(), Some(KitchenStatus::Preparing));
        assert_eq!(KitchenStatus::Preparing.next(), Some(KitchenStatus::Ready));
    }

    #[test]
    fn kitchen_status_ready_is_terminal() {
        assert_eq!(KitchenStatus::Ready.next(), None);
        assert!(KitchenStatus::Ready.is_terminal());
        assert!(!KitchenStatus::Ready.is_kitchen_active());
    }

    #[test]
    fn order_status_terminal_blocks_transitions() {
        assert!(!OrderStatus::Served.can_transition_to(OrderStatus::Pending));
        assert!(!OrderStatus::Cancelled.can_transition_to(OrderStatus::Served));
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Cancelled));
        assert!(OrderStatus::Confirmed.can_transition_to(OrderStatus::Served));
    }

    #[test]
    fn status_strings_round_trip() {
        for s in [
            OrderStatus::Pending,
            OrderStatus::Confirmed,
            OrderStatus::Preparing,
            OrderStatus::Served,
            OrderStatus::Cancelled,
            OrderStatus::Waitlist,
            OrderStatus::ValidationFailed,
        ] {
            assert_eq!(s.as_str().parse::<OrderStatus>().unwrap(), s);
        }
        for k in [
            KitchenStatus::Pending,
            KitchenStatus::Sent,
            KitchenStatus::Preparing,
            KitchenStatus::Ready,
        ] {
            assert_eq!(k.as_str().parse::<KitchenStatus>().unwrap(), k);
        }
        for p in Platform::ALL {
            assert_eq!(p.as_str().parse::<Platform>().unwrap(), p);
        }
    }

    #[test]
    fn serde_wire_names_match_db_strings() {
        let json = serde_json::to_string(&OrderStatus::ValidationFailed).unwrap();
        assert_eq!(json, "\"validation_failed\"");
        let json = serde_json::to_string(&OrderType::DineIn).unwrap();
        assert_eq!(json, "\"dine-in\"");
    }

    #[test]
    fn availability_get_set() {
        let mut avail = PlatformAvailability::default();
        assert!(avail.restaurant);
        assert!(!avail.get(Platform::Zomato));
        avail.set(Platform::Zomato, true);
        assert!(avail.zomato);
    }
}
