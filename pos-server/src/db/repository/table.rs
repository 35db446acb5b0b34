//! Dining table repository
//!
//! `(number, section)` is unique per tenant, enforced by a database
//! constraint rather than a read-then-write check.

use chrono::Utc;
use sqlx::{SqliteConnection, SqliteExecutor};
use uuid::Uuid;

use shared::request::{TableCreate, TableUpdate};
use shared::{DiningTable, TableStatus};

use super::{RepoError, RepoResult, map_unique};
use crate::db::models::TableRow;

pub async fn find_all(db: impl SqliteExecutor<'_>, owner: &str) -> RepoResult<Vec<DiningTable>> {
    let rows: Vec<TableRow> =
        sqlx::query_as("SELECT * FROM tables WHERE owner_id = ? ORDER BY section, number")
            .bind(owner)
            .fetch_all(db)
            .await?;
    rows.into_iter().map(DiningTable::try_from).collect()
}

pub async fn find_by_id(
    db: impl SqliteExecutor<'_>,
    owner: &str,
    id: &str,
) -> RepoResult<Option<DiningTable>> {
    let row: Option<TableRow> =
        sqlx::query_as("SELECT * FROM tables WHERE owner_id = ? AND id = ?")
            .bind(owner)
            .bind(id)
            .fetch_optional(db)
            .await?;
    row.map(DiningTable::try_from).transpose()
}

pub async fn create(
    db: impl SqliteExecutor<'_>,
    owner: &str,
    data: TableCreate,
) -> RepoResult<DiningTable> {
    let status = data.status.unwrap_or(TableStatus::Available);
    let row: TableRow = sqlx::query_as(
        "INSERT INTO tables (id, owner_id, number, section, capacity, status, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING *",
    )
    .bind(Uuid::new_v4().to_string())
    .bind(owner)
    .bind(&data.number)
    .bind(&data.section)
    .bind(data.capacity)
    .bind(status.as_str())
    .bind(Utc::now())
    .fetch_one(db)
    .await
    .map_err(|e| {
        map_unique(
            e,
            format!(
                "Table {} already exists in section {}",
                data.number, data.section
            ),
        )
    })?;
    row.try_into()
}

pub async fn update(
    conn: &mut SqliteConnection,
    owner: &str,
    id: &str,
    data: TableUpdate,
) -> RepoResult<DiningTable> {
    let existing = find_by_id(&mut *conn, owner, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Table {id} not found")))?;

    let number = data.number.unwrap_or(existing.number);
    let section = data.section.unwrap_or(existing.section);
    let row: TableRow = sqlx::query_as(
        "UPDATE tables SET number = ?, section = ?, capacity = ?, status = ? \
         WHERE owner_id = ? AND id = ? RETURNING *",
    )
    .bind(&number)
    .bind(&section)
    .bind(data.capacity.unwrap_or(existing.capacity))
    .bind(data.status.unwrap_or(existing.status).as_str())
    .bind(owner)
    .bind(id)
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| {
        map_unique(
            e,
            format!("Table {number} already exists in section {section}"),
        )
    })?;
    row.try_into()
}

pub async fn delete(db: impl SqliteExecutor<'_>, owner: &str, id: &str) -> RepoResult<bool> {
    let result = sqlx::query("DELETE FROM tables WHERE owner_id = ? AND id = ?")
        .bind(owner)
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}
