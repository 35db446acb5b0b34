//! Order repository

use sqlx::{SqliteConnection, SqliteExecutor};

use shared::{KitchenStatus, Order, OrderItem, OrderStatus};

use super::RepoResult;
use crate::db::models::{OrderItemRow, OrderRow};

pub async fn insert(conn: &mut SqliteConnection, owner: &str, order: &Order) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO orders (id, owner_id, table_number, guests, order_type, status, \
         kitchen_status, total_minor, customer_id, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&order.id)
    .bind(owner)
    .bind(&order.table_number)
    .bind(order.guests)
    .bind(order.order_type.as_str())
    .bind(order.status.as_str())
    .bind(order.kitchen_status.map(|k| k.as_str()))
    .bind(order.total_minor)
    .bind(&order.customer_id)
    .bind(order.created_at)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn insert_item(conn: &mut SqliteConnection, item: &OrderItem) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO order_items (id, order_id, dish_id, quantity, price_minor, notes) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&item.id)
    .bind(&item.order_id)
    .bind(&item.dish_id)
    .bind(item.quantity)
    .bind(item.price_minor)
    .bind(&item.notes)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn find_all(db: impl SqliteExecutor<'_>, owner: &str) -> RepoResult<Vec<Order>> {
    let rows: Vec<OrderRow> =
        sqlx::query_as("SELECT * FROM orders WHERE owner_id = ? ORDER BY created_at DESC")
            .bind(owner)
            .fetch_all(db)
            .await?;
    rows.into_iter().map(Order::try_from).collect()
}

pub async fn find_by_id(
    db: impl SqliteExecutor<'_>,
    owner: &str,
    id: &str,
) -> RepoResult<Option<Order>> {
    let row: Option<OrderRow> =
        sqlx::query_as("SELECT * FROM orders WHERE owner_id = ? AND id = ?")
            .bind(owner)
            .bind(id)
            .fetch_optional(db)
            .await?;
    row.map(Order::try_from).transpose()
}

/// Orders still moving through the front-of-house flow, newest first
pub async fn find_active(db: impl SqliteExecutor<'_>, owner: &str) -> RepoResult<Vec<Order>> {
    let rows: Vec<OrderRow> = sqlx::query_as(
        "SELECT * FROM orders WHERE owner_id = ? \
         AND status IN ('pending', 'confirmed', 'preparing') ORDER BY created_at DESC",
    )
    .bind(owner)
    .fetch_all(db)
    .await?;
    rows.into_iter().map(Order::try_from).collect()
}

/// Orders with a live kitchen ticket, oldest first — the kitchen works FIFO
pub async fn find_kitchen_active(
    db: impl SqliteExecutor<'_>,
    owner: &str,
) -> RepoResult<Vec<Order>> {
    let rows: Vec<OrderRow> = sqlx::query_as(
        "SELECT * FROM orders WHERE owner_id = ? \
         AND kitchen_status IN ('pending', 'sent', 'preparing') ORDER BY created_at ASC",
    )
    .bind(owner)
    .fetch_all(db)
    .await?;
    rows.into_iter().map(Order::try_from).collect()
}

pub async fn items_for(db: impl SqliteExecutor<'_>, order_id: &str) -> RepoResult<Vec<OrderItem>> {
    let rows: Vec<OrderItemRow> =
        sqlx::query_as("SELECT * FROM order_items WHERE order_id = ? ORDER BY id")
            .bind(order_id)
            .fetch_all(db)
            .await?;
    Ok(rows.into_iter().map(OrderItem::from).collect())
}

pub async fn set_kitchen_status(
    db: impl SqliteExecutor<'_>,
    owner: &str,
    id: &str,
    status: KitchenStatus,
) -> RepoResult<u64> {
    let result = sqlx::query("UPDATE orders SET kitchen_status = ? WHERE owner_id = ? AND id = ?")
        .bind(status.as_str())
        .bind(owner)
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected())
}

pub async fn set_status(
    db: impl SqliteExecutor<'_>,
    owner: &str,
    id: &str,
    status: OrderStatus,
) -> RepoResult<u64> {
    let result = sqlx::query("UPDATE orders SET status = ? WHERE owner_id = ? AND id = ?")
        .bind(status.as_str())
        .bind(owner)
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected())
}
