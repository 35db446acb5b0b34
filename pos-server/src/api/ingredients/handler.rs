//! Ingredient API handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use validator::Validate;

use shared::Ingredient;
use shared::request::{IngredientCreate, IngredientUpdate};

use crate::api::owner::OwnerId;
use crate::core::ServerState;
use crate::db::repository::ingredient;
use crate::utils::{AppError, AppResult};

/// GET /api/ingredients
pub async fn list(
    State(state): State<ServerState>,
    OwnerId(owner): OwnerId,
) -> AppResult<Json<Vec<Ingredient>>> {
    let found = ingredient::find_all(&state.pool, &owner).await?;
    Ok(Json(found))
}

/// GET /api/ingredients/low-stock
pub async fn low_stock(
    State(state): State<ServerState>,
    OwnerId(owner): OwnerId,
) -> AppResult<Json<Vec<Ingredient>>> {
    let found = ingredient::find_low_stock(&state.pool, &owner).await?;
    Ok(Json(found))
}

/// GET /api/ingredients/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    OwnerId(owner): OwnerId,
    Path(id): Path<String>,
) -> AppResult<Json<Ingredient>> {
    let found = ingredient::find_by_id(&state.pool, &owner, &id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Ingredient {id} not found")))?;
    Ok(Json(found))
}

/// POST /api/ingredients
pub async fn create(
    State(state): State<ServerState>,
    OwnerId(owner): OwnerId,
    Json(payload): Json<IngredientCreate>,
) -> AppResult<(StatusCode, Json<Ingredient>)> {
    payload.validate()?;
    let created = ingredient::create(&state.pool, &owner, payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PATCH /api/ingredients/:id
pub async fn update(
    State(state): State<ServerState>,
    OwnerId(owner): OwnerId,
    Path(id): Path<String>,
    Json(payload): Json<IngredientUpdate>,
) -> AppResult<Json<Ingredient>> {
    let mut conn = state.pool.acquire().await?;
    let updated = ingredient::update(&mut conn, &owner, &id, payload).await?;
    Ok(Json(updated))
}

/// DELETE /api/ingredients/:id
pub async fn delete(
    State(state): State<ServerState>,
    OwnerId(owner): OwnerId,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let removed = ingredient::delete(&state.pool, &owner, &id).await?;
    if !removed {
        return Err(AppError::not_found(format!("Ingredient {id} not found")));
    }
    Ok(Json(true))
}
