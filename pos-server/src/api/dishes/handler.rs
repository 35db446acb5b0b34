//! Dish API handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use validator::Validate;

use shared::request::{BulkAvailabilityRequest, DishCreate, DishIngredientCreate, DishUpdate};
use shared::response::BulkUpdateReport;
use shared::{Dish, DishIngredient};

use crate::api::owner::OwnerId;
use crate::core::ServerState;
use crate::db::repository::{dish, ingredient};
use crate::menu::availability::validate_shape;
use crate::utils::{AppError, AppResult};

/// GET /api/dishes
pub async fn list(
    State(state): State<ServerState>,
    OwnerId(owner): OwnerId,
) -> AppResult<Json<Vec<Dish>>> {
    let dishes = dish::find_all(&state.pool, &owner).await?;
    Ok(Json(dishes))
}

/// GET /api/dishes/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    OwnerId(owner): OwnerId,
    Path(id): Path<String>,
) -> AppResult<Json<Dish>> {
    let found = dish::find_by_id(&state.pool, &owner, &id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Dish {id} not found")))?;
    Ok(Json(found))
}

/// POST /api/dishes
pub async fn create(
    State(state): State<ServerState>,
    OwnerId(owner): OwnerId,
    Json(payload): Json<DishCreate>,
) -> AppResult<(StatusCode, Json<Dish>)> {
    payload.validate()?;
    validate_shape(payload.availability)?;
    let created = dish::create(&state.pool, &owner, payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PATCH /api/dishes/:id
pub async fn update(
    State(state): State<ServerState>,
    OwnerId(owner): OwnerId,
    Path(id): Path<String>,
    Json(payload): Json<DishUpdate>,
) -> AppResult<Json<Dish>> {
    payload.validate()?;
    if let Some(availability) = payload.availability {
        validate_shape(availability)?;
    }
    let mut conn = state.pool.acquire().await?;
    let updated = dish::update(&mut conn, &owner, &id, payload).await?;
    Ok(Json(updated))
}

/// DELETE /api/dishes/:id
pub async fn delete(
    State(state): State<ServerState>,
    OwnerId(owner): OwnerId,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let removed = dish::delete(&state.pool, &owner, &id).await?;
    if !removed {
        return Err(AppError::not_found(format!("Dish {id} not found")));
    }
    Ok(Json(true))
}

/// POST /api/dishes/bulk-availability
pub async fn bulk_availability(
    State(state): State<ServerState>,
    OwnerId(owner): OwnerId,
    Json(payload): Json<BulkAvailabilityRequest>,
) -> AppResult<Json<BulkUpdateReport>> {
    payload.validate()?;
    let report = state
        .bulk
        .set_platform(&owner, payload.dish_ids, payload.platform, payload.enabled)
        .await?;
    Ok(Json(report))
}

/// POST /api/dishes/bulk-availability/undo
pub async fn bulk_undo(
    State(state): State<ServerState>,
    OwnerId(owner): OwnerId,
) -> AppResult<Json<BulkUpdateReport>> {
    let report = state.bulk.undo_last(&owner).await?;
    Ok(Json(report))
}

/// GET /api/dishes/bulk-availability/progress
pub async fn bulk_progress(State(state): State<ServerState>) -> Json<serde_json::Value> {
    let percent = *state.bulk.progress().borrow();
    Json(serde_json::json!({ "percent": percent }))
}

/// GET /api/dishes/:id/ingredients
pub async fn list_ingredients(
    State(state): State<ServerState>,
    OwnerId(owner): OwnerId,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<DishIngredient>>> {
    dish::find_by_id(&state.pool, &owner, &id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Dish {id} not found")))?;
    let links = ingredient::links_for_dish(&state.pool, &id).await?;
    Ok(Json(links))
}

/// POST /api/dishes/:id/ingredients
pub async fn link_ingredient(
    State(state): State<ServerState>,
    OwnerId(owner): OwnerId,
    Path(id): Path<String>,
    Json(payload): Json<DishIngredientCreate>,
) -> AppResult<(StatusCode, Json<DishIngredient>)> {
    payload.validate()?;
    dish::find_by_id(&state.pool, &owner, &id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Dish {id} not found")))?;
    ingredient::find_by_id(&state.pool, &owner, &payload.ingredient_id)
        .await?
        .ok_or_else(|| {
            AppError::not_found(format!("Ingredient {} not found", payload.ingredient_id))
        })?;
    let link = ingredient::link(&state.pool, &id, payload).await?;
    Ok((StatusCode::CREATED, Json(link)))
}

/// DELETE /api/dishes/:id/ingredients/:link_id
pub async fn unlink_ingredient(
    State(state): State<ServerState>,
    OwnerId(owner): OwnerId,
    Path((id, link_id)): Path<(String, String)>,
) -> AppResult<Json<bool>> {
    dish::find_by_id(&state.pool, &owner, &id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Dish {id} not found")))?;
    let removed = ingredient::unlink(&state.pool, &id, &link_id).await?;
    if !removed {
        return Err(AppError::not_found(format!("Link {link_id} not found")));
    }
    Ok(Json(true))
}
