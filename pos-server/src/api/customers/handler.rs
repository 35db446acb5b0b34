//! Customer API handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use validator::Validate;

use shared::Customer;
use shared::request::{CustomerCreate, CustomerUpdate};

use crate::api::owner::OwnerId;
use crate::core::ServerState;
use crate::db::repository::customer;
use crate::utils::{AppError, AppResult};

/// GET /api/customers
pub async fn list(
    State(state): State<ServerState>,
    OwnerId(owner): OwnerId,
) -> AppResult<Json<Vec<Customer>>> {
    let found = customer::find_all(&state.pool, &owner).await?;
    Ok(Json(found))
}

/// GET /api/customers/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    OwnerId(owner): OwnerId,
    Path(id): Path<String>,
) -> AppResult<Json<Customer>> {
    let found = customer::find_by_id(&state.pool, &owner, &id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Customer {id} not found")))?;
    Ok(Json(found))
}

/// POST /api/customers
pub async fn create(
    State(state): State<ServerState>,
    OwnerId(owner): OwnerId,
    Json(payload): Json<CustomerCreate>,
) -> AppResult<(StatusCode, Json<Customer>)> {
    payload.validate()?;
    let created = customer::create(&state.pool, &owner, payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PATCH /api/customers/:id
pub async fn update(
    State(state): State<ServerState>,
    OwnerId(owner): OwnerId,
    Path(id): Path<String>,
    Json(payload): Json<CustomerUpdate>,
) -> AppResult<Json<Customer>> {
    let mut conn = state.pool.acquire().await?;
    let updated = customer::update(&mut conn, &owner, &id, payload).await?;
    Ok(Json(updated))
}

/// DELETE /api/customers/:id
pub async fn delete(
    State(state): State<ServerState>,
    OwnerId(owner): OwnerId,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let removed = customer::delete(&state.pool, &owner, &id).await?;
    if !removed {
        return Err(AppError::not_found(format!("Customer {id} not found")));
    }
    Ok(Json(true))
}
