//! Dining table API handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use validator::Validate;

use shared::DiningTable;
use shared::request::{TableCreate, TableUpdate};

use crate::api::owner::OwnerId;
use crate::core::ServerState;
use crate::db::repository::table;
use crate::utils::{AppError, AppResult};

/// GET /api/tables
pub async fn list(
    State(state): State<ServerState>,
    OwnerId(owner): OwnerId,
) -> AppResult<Json<Vec<DiningTable>>> {
    let found = table::find_all(&state.pool, &owner).await?;
    Ok(Json(found))
}

/// GET /api/tables/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    OwnerId(owner): OwnerId,
    Path(id): Path<String>,
) -> AppResult<Json<DiningTable>> {
    let found = table::find_by_id(&state.pool, &owner, &id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Table {id} not found")))?;
    Ok(Json(found))
}

/// POST /api/tables — duplicate (number, section) is a 409
pub async fn create(
    State(state): State<ServerState>,
    OwnerId(owner): OwnerId,
    Json(payload): Json<TableCreate>,
) -> AppResult<(StatusCode, Json<DiningTable>)> {
    payload.validate()?;
    let created = table::create(&state.pool, &owner, payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PATCH /api/tables/:id
pub async fn update(
    State(state): State<ServerState>,
    OwnerId(owner): OwnerId,
    Path(id): Path<String>,
    Json(payload): Json<TableUpdate>,
) -> AppResult<Json<DiningTable>> {
    let mut conn = state.pool.acquire().await?;
    let updated = table::update(&mut conn, &owner, &id, payload).await?;
    Ok(Json(updated))
}

/// DELETE /api/tables/:id
pub async fn delete(
    State(state): State<ServerState>,
    OwnerId(owner): OwnerId,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let removed = table::delete(&state.pool, &owner, &id).await?;
    if !removed {
        return Err(AppError::not_found(format!("Table {id} not found")));
    }
    Ok(Json(true))
}
