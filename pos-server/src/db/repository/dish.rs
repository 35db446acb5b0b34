//! Dish repository

use chrono::Utc;
use sqlx::{SqliteConnection, SqliteExecutor};
use uuid::Uuid;

use shared::request::{DishCreate, DishUpdate};
use shared::{Dish, PlatformAvailability};

use super::{RepoError, RepoResult};
use crate::db::models::DishRow;

pub async fn find_all(db: impl SqliteExecutor<'_>, owner: &str) -> RepoResult<Vec<Dish>> {
    let rows: Vec<DishRow> =
        sqlx::query_as("SELECT * FROM dishes WHERE owner_id = ? ORDER BY category, name")
            .bind(owner)
            .fetch_all(db)
            .await?;
    Ok(rows.into_iter().map(Dish::from).collect())
}

pub async fn find_by_id(
    db: impl SqliteExecutor<'_>,
    owner: &str,
    id: &str,
) -> RepoResult<Option<Dish>> {
    Ok(find_row(db, owner, id).await?.map(Dish::from))
}

/// Raw row lookup, used where the caller needs the availability flags
/// together with the tenant check
pub async fn find_row(
    db: impl SqliteExecutor<'_>,
    owner: &str,
    id: &str,
) -> RepoResult<Option<DishRow>> {
    let row: Option<DishRow> = sqlx::query_as("SELECT * FROM dishes WHERE owner_id = ? AND id = ?")
        .bind(owner)
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(row)
}

pub async fn create(
    db: impl SqliteExecutor<'_>,
    owner: &str,
    data: DishCreate,
) -> RepoResult<Dish> {
    let now = Utc::now();
    let row: DishRow = sqlx::query_as(
        "INSERT INTO dishes (id, owner_id, name, price_minor, category, veg, image, available, \
         on_restaurant, on_zomato, on_swiggy, on_other, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING *",
    )
    .bind(Uuid::new_v4().to_string())
    .bind(owner)
    .bind(&data.name)
    .bind(data.price_minor)
    .bind(&data.category)
    .bind(data.veg)
    .bind(&data.image)
    .bind(data.available)
    .bind(data.availability.restaurant)
    .bind(data.availability.zomato)
    .bind(data.availability.swiggy)
    .bind(data.availability.other)
    .bind(now)
    .bind(now)
    .fetch_one(db)
    .await?;
    Ok(row.into())
}

pub async fn update(
    conn: &mut SqliteConnection,
    owner: &str,
    id: &str,
    data: DishUpdate,
) -> RepoResult<Dish> {
    let existing = find_row(&mut *conn, owner, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Dish {id} not found")))?;

    let availability = data.availability.unwrap_or_else(|| existing.availability());
    let row: DishRow = sqlx::query_as(
        "UPDATE dishes SET name = ?, price_minor = ?, category = ?, veg = ?, image = ?, \
         available = ?, on_restaurant = ?, on_zomato = ?, on_swiggy = ?, on_other = ?, \
         updated_at = ? WHERE owner_id = ? AND id = ? RETURNING *",
    )
    .bind(data.name.unwrap_or(existing.name))
    .bind(data.price_minor.unwrap_or(existing.price_minor))
    .bind(data.category.unwrap_or(existing.category))
    .bind(data.veg.unwrap_or(existing.veg))
    .bind(data.image.or(existing.image))
    .bind(data.available.unwrap_or(existing.available))
    .bind(availability.restaurant)
    .bind(availability.zomato)
    .bind(availability.swiggy)
    .bind(availability.other)
    .bind(Utc::now())
    .bind(owner)
    .bind(id)
    .fetch_one(&mut *conn)
    .await?;
    Ok(row.into())
}

pub async fn set_availability(
    db: impl SqliteExecutor<'_>,
    owner: &str,
    id: &str,
    availability: PlatformAvailability,
) -> RepoResult<u64> {
    let result = sqlx::query(
        "UPDATE dishes SET on_restaurant = ?, on_zomato = ?, on_swiggy = ?, on_other = ?, \
         updated_at = ? WHERE owner_id = ? AND id = ?",
    )
    .bind(availability.restaurant)
    .bind(availability.zomato)
    .bind(availability.swiggy)
    .bind(availability.other)
    .bind(Utc::now())
    .bind(owner)
    .bind(id)
    .execute(db)
    .await?;
    Ok(result.rows_affected())
}

pub async fn delete(db: impl SqliteExecutor<'_>, owner: &str, id: &str) -> RepoResult<bool> {
    let result = sqlx::query("DELETE FROM dishes WHERE owner_id = ? AND id = ?")
        .bind(owner)
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}
