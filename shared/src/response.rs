//! Response payloads and client polling contract

use serde::{Deserialize, Serialize};

use crate::types::{Dish, Order, OrderItem};

/// KOT view refresh interval (ms) — fixed client contract, not configurable
pub const KOT_POLL_INTERVAL_MS: u64 = 3000;
/// Active-orders view refresh interval (ms)
pub const ACTIVE_ORDERS_POLL_INTERVAL_MS: u64 = 5000;

/// One order-item joined with its dish for the kitchen panel.
///
/// `dish` is `None` when the dish was deleted after the order was placed —
/// the snapshot price on the item keeps the ticket renderable regardless.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KotItem {
    #[serde(flatten)]
    pub item: OrderItem,
    pub dish: Option<Dish>,
}

/// One kitchen order ticket: the order plus its joined items
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KotOrder {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<KotItem>,
}

/// Outcome of a bulk availability operation.
///
/// `errors` counts per-dish rejections (missing dish, ownership mismatch,
/// platform gating); `chunks_committed` exposes how far the operation got
/// when a storage failure aborts it mid-way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkUpdateReport {
    pub updated: usize,
    pub errors: usize,
    pub chunks_committed: usize,
}

/// Top-selling dish for the analytics summary
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopDish {
    pub dish_id: String,
    pub name: String,
    pub image: Option<String>,
    pub orders: i64,
}

/// `GET /api/analytics` — today's headline numbers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub daily_sales_minor: i64,
    pub order_count: i64,
    pub avg_ticket_minor: i64,
    pub top_dishes: Vec<TopDish>,
}
