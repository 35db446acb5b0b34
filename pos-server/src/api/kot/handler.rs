//! Kitchen Order Ticket handlers
//!
//! The KOT view is the kitchen's work queue: orders whose ticket is still
//! live (`pending`, `sent`, `preparing`), oldest first, each joined with its
//! items and their dishes.

use axum::{Json, extract::State};

use shared::response::{KotItem, KotOrder};

use crate::api::owner::OwnerId;
use crate::core::ServerState;
use crate::db::repository::{dish, order};
use crate::utils::AppResult;

/// GET /api/kot
pub async fn list(
    State(state): State<ServerState>,
    OwnerId(owner): OwnerId,
) -> AppResult<Json<Vec<KotOrder>>> {
    let active = order::find_kitchen_active(&state.pool, &owner).await?;

    let mut tickets = Vec::with_capacity(active.len());
    for order_row in active {
        let items = order::items_for(&state.pool, &order_row.id).await?;
        let mut kot_items = Vec::with_capacity(items.len());
        for item in items {
            // dish may have been deleted since the order was placed
            let dish = dish::find_by_id(&state.pool, &owner, &item.dish_id).await?;
            kot_items.push(KotItem { item, dish });
        }
        tickets.push(KotOrder {
            order: order_row,
            items: kot_items,
        });
    }

    Ok(Json(tickets))
}
