//! Ingredient repository, including the dish → ingredient links

use chrono::Utc;
use sqlx::{SqliteConnection, SqliteExecutor};
use uuid::Uuid;

use shared::request::{DishIngredientCreate, IngredientCreate, IngredientUpdate};
use shared::{DishIngredient, Ingredient};

use super::{RepoError, RepoResult, map_unique};
use crate::db::models::{DishIngredientRow, IngredientRow};

pub async fn find_all(db: impl SqliteExecutor<'_>, owner: &str) -> RepoResult<Vec<Ingredient>> {
    let rows: Vec<IngredientRow> =
        sqlx::query_as("SELECT * FROM ingredients WHERE owner_id = ? ORDER BY name")
            .bind(owner)
            .fetch_all(db)
            .await?;
    Ok(rows.into_iter().map(Ingredient::from).collect())
}

pub async fn find_by_id(
    db: impl SqliteExecutor<'_>,
    owner: &str,
    id: &str,
) -> RepoResult<Option<Ingredient>> {
    let row: Option<IngredientRow> =
        sqlx::query_as("SELECT * FROM ingredients WHERE owner_id = ? AND id = ?")
            .bind(owner)
            .bind(id)
            .fetch_optional(db)
            .await?;
    Ok(row.map(Ingredient::from))
}

/// Ingredients at or below their reorder level
pub async fn find_low_stock(
    db: impl SqliteExecutor<'_>,
    owner: &str,
) -> RepoResult<Vec<Ingredient>> {
    let rows: Vec<IngredientRow> = sqlx::query_as(
        "SELECT * FROM ingredients WHERE owner_id = ? AND current_stock <= min_level \
         ORDER BY name",
    )
    .bind(owner)
    .fetch_all(db)
    .await?;
    Ok(rows.into_iter().map(Ingredient::from).collect())
}

pub async fn create(
    db: impl SqliteExecutor<'_>,
    owner: &str,
    data: IngredientCreate,
) -> RepoResult<Ingredient> {
    let now = Utc::now();
    let row: IngredientRow = sqlx::query_as(
        "INSERT INTO ingredients (id, owner_id, name, unit, current_stock, min_level, \
         created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?) RETURNING *",
    )
    .bind(Uuid::new_v4().to_string())
    .bind(owner)
    .bind(&data.name)
    .bind(&data.unit)
    .bind(data.current_stock)
    .bind(data.min_level)
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
    data: IngredientUpdate,
) -> RepoResult<Ingredient> {
    let existing = find_by_id(&mut *conn, owner, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Ingredient {id} not found")))?;

    let row: IngredientRow = sqlx::query_as(
        "UPDATE ingredients SET name = ?, unit = ?, current_stock = ?, min_level = ?, \
         updated_at = ? WHERE owner_id = ? AND id = ? RETURNING *",
    )
    .bind(data.name.unwrap_or(existing.name))
    .bind(data.unit.unwrap_or(existing.unit))
    .bind(data.current_stock.unwrap_or(existing.current_stock))
    .bind(data.min_level.unwrap_or(existing.min_level))
    .bind(Utc::now())
    .bind(owner)
    .bind(id)
    .fetch_one(&mut *conn)
    .await?;
    Ok(row.into())
}

pub async fn delete(db: impl SqliteExecutor<'_>, owner: &str, id: &str) -> RepoResult<bool> {
    let result = sqlx::query("DELETE FROM ingredients WHERE owner_id = ? AND id = ?")
        .bind(owner)
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Apply a stock delta and return the updated row, `None` if the ingredient
/// does not exist for this tenant. Stock may go negative; callers log it.
pub async fn adjust_stock(
    db: impl SqliteExecutor<'_>,
    owner: &str,
    id: &str,
    delta: f64,
) -> RepoResult<Option<Ingredient>> {
    let row: Option<IngredientRow> = sqlx::query_as(
        "UPDATE ingredients SET current_stock = current_stock + ?, updated_at = ? \
         WHERE owner_id = ? AND id = ? RETURNING *",
    )
    .bind(delta)
    .bind(Utc::now())
    .bind(owner)
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(row.map(Ingredient::from))
}

// ========== Dish → Ingredient links ==========

pub async fn links_for_dish(
    db: impl SqliteExecutor<'_>,
    dish_id: &str,
) -> RepoResult<Vec<DishIngredient>> {
    let rows: Vec<DishIngredientRow> =
        sqlx::query_as("SELECT * FROM dish_ingredients WHERE dish_id = ? ORDER BY created_at")
            .bind(dish_id)
            .fetch_all(db)
            .await?;
    Ok(rows.into_iter().map(DishIngredient::from).collect())
}

pub async fn link(
    db: impl SqliteExecutor<'_>,
    dish_id: &str,
    data: DishIngredientCreate,
) -> RepoResult<DishIngredient> {
    let row: DishIngredientRow = sqlx::query_as(
        "INSERT INTO dish_ingredients (id, dish_id, ingredient_id, quantity, created_at) \
         VALUES (?, ?, ?, ?, ?) RETURNING *",
    )
    .bind(Uuid::new_v4().to_string())
    .bind(dish_id)
    .bind(&data.ingredient_id)
    .bind(data.quantity)
    .bind(Utc::now())
    .fetch_one(db)
    .await
    .map_err(|e| {
        map_unique(
            e,
            format!("Ingredient {} already linked to this dish", data.ingredient_id),
        )
    })?;
    Ok(row.into())
}

pub async fn unlink(
    db: impl SqliteExecutor<'_>,
    dish_id: &str,
    link_id: &str,
) -> RepoResult<bool> {
    let result = sqlx::query("DELETE FROM dish_ingredients WHERE dish_id = ? AND id = ?")
        .bind(dish_id)
        .bind(link_id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}
