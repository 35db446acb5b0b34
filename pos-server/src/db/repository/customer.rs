//! Customer repository
//!
//! Lifetime value is maintained here: incremented when an order is placed,
//! decremented (clamped at zero) when one is cancelled.

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqliteExecutor};
use uuid::Uuid;

use shared::Customer;
use shared::request::{CustomerCreate, CustomerUpdate};

use super::{RepoError, RepoResult};
use crate::db::models::CustomerRow;

pub async fn find_all(db: impl SqliteExecutor<'_>, owner: &str) -> RepoResult<Vec<Customer>> {
    let rows: Vec<CustomerRow> =
        sqlx::query_as("SELECT * FROM customers WHERE owner_id = ? ORDER BY name")
            .bind(owner)
            .fetch_all(db)
            .await?;
    Ok(rows.into_iter().map(Customer::from).collect())
}

pub async fn find_by_id(
    db: impl SqliteExecutor<'_>,
    owner: &str,
    id: &str,
) -> RepoResult<Option<Customer>> {
    let row: Option<CustomerRow> =
        sqlx::query_as("SELECT * FROM customers WHERE owner_id = ? AND id = ?")
            .bind(owner)
            .bind(id)
            .fetch_optional(db)
            .await?;
    Ok(row.map(Customer::from))
}

pub async fn create(
    db: impl SqliteExecutor<'_>,
    owner: &str,
    data: CustomerCreate,
) -> RepoResult<Customer> {
    let row: CustomerRow = sqlx::query_as(
        "INSERT INTO customers (id, owner_id, name, phone, last_visit, lifetime_value_minor, \
         total_orders) VALUES (?, ?, ?, ?, NULL, 0, 0) RETURNING *",
    )
    .bind(Uuid::new_v4().to_string())
    .bind(owner)
    .bind(&data.name)
    .bind(&data.phone)
    .fetch_one(db)
    .await?;
    Ok(row.into())
}

pub async fn update(
    conn: &mut SqliteConnection,
    owner: &str,
    id: &str,
    data: CustomerUpdate,
) -> RepoResult<Customer> {
    let existing = find_by_id(&mut *conn, owner, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Customer {id} not found")))?;

    let row: CustomerRow = sqlx::query_as(
        "UPDATE customers SET name = ?, phone = ? WHERE owner_id = ? AND id = ? RETURNING *",
    )
    .bind(data.name.unwrap_or(existing.name))
    .bind(data.phone.unwrap_or(existing.phone))
    .bind(owner)
    .bind(id)
    .fetch_one(&mut *conn)
    .await?;
    Ok(row.into())
}

pub async fn delete(db: impl SqliteExecutor<'_>, owner: &str, id: &str) -> RepoResult<bool> {
    let result = sqlx::query("DELETE FROM customers WHERE owner_id = ? AND id = ?")
        .bind(owner)
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Credit an order to the customer: lifetime value and order count go up,
/// last visit moves forward. Returns `None` if the customer does not exist.
pub async fn record_order(
    db: impl SqliteExecutor<'_>,
    owner: &str,
    id: &str,
    total_minor: i64,
    at: DateTime<Utc>,
) -> RepoResult<Option<Customer>> {
    let row: Option<CustomerRow> = sqlx::query_as(
        "UPDATE customers SET lifetime_value_minor = lifetime_value_minor + ?, \
         total_orders = total_orders + 1, last_visit = ? \
         WHERE owner_id = ? AND id = ? RETURNING *",
    )
    .bind(total_minor)
    .bind(at)
    .bind(owner)
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(row.map(Customer::from))
}

/// Reverse an order credit on cancellation. Both counters clamp at zero so a
/// double cancellation can never drive them negative.
pub async fn record_cancellation(
    db: impl SqliteExecutor<'_>,
    owner: &str,
    id: &str,
    total_minor: i64,
) -> RepoResult<Option<Customer>> {
    let row: Option<CustomerRow> = sqlx::query_as(
        "UPDATE customers SET lifetime_value_minor = MAX(0, lifetime_value_minor - ?), \
         total_orders = MAX(0, total_orders - 1) \
         WHERE owner_id = ? AND id = ? RETURNING *",
    )
    .bind(total_minor)
    .bind(owner)
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(row.map(Customer::from))
}
