//! Order API handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use shared::request::{KitchenStatusUpdate, OrderStatusUpdate, PlaceOrderRequest};
use shared::{Order, OrderItem};

use crate::api::owner::OwnerId;
use crate::core::ServerState;
use crate::db::repository::order;
use crate::orders;
use crate::utils::{AppError, AppResult};

/// GET /api/orders
pub async fn list(
    State(state): State<ServerState>,
    OwnerId(owner): OwnerId,
) -> AppResult<Json<Vec<Order>>> {
    let found = order::find_all(&state.pool, &owner).await?;
    Ok(Json(found))
}

/// POST /api/orders
pub async fn place(
    State(state): State<ServerState>,
    OwnerId(owner): OwnerId,
    Json(payload): Json<PlaceOrderRequest>,
) -> AppResult<(StatusCode, Json<Order>)> {
    let placed = orders::place_order(&state.pool, &owner, payload).await?;
    Ok((StatusCode::CREATED, Json(placed)))
}

/// GET /api/orders/active
pub async fn active(
    State(state): State<ServerState>,
    OwnerId(owner): OwnerId,
) -> AppResult<Json<Vec<Order>>> {
    let found = order::find_active(&state.pool, &owner).await?;
    Ok(Json(found))
}

/// GET /api/orders/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    OwnerId(owner): OwnerId,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let found = order::find_by_id(&state.pool, &owner, &id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {id} not found")))?;
    Ok(Json(found))
}

/// GET /api/orders/:id/items
pub async fn items(
    State(state): State<ServerState>,
    OwnerId(owner): OwnerId,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<OrderItem>>> {
    order::find_by_id(&state.pool, &owner, &id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {id} not found")))?;
    let found = order::items_for(&state.pool, &id).await?;
    Ok(Json(found))
}

/// PATCH /api/orders/:id/kitchen-status
pub async fn kitchen_status(
    State(state): State<ServerState>,
    OwnerId(owner): OwnerId,
    Path(id): Path<String>,
    Json(payload): Json<KitchenStatusUpdate>,
) -> AppResult<Json<Order>> {
    let updated =
        orders::update_kitchen_status(&state.pool, &owner, &id, payload.kitchen_status).await?;
    Ok(Json(updated))
}

/// PATCH /api/orders/:id/status
pub async fn status(
    State(state): State<ServerState>,
    OwnerId(owner): OwnerId,
    Path(id): Path<String>,
    Json(payload): Json<OrderStatusUpdate>,
) -> AppResult<Json<Order>> {
    let updated = orders::update_order_status(&state.pool, &owner, &id, payload.status).await?;
    Ok(Json(updated))
}
