//! Order status transitions
//!
//! The kitchen sequence is strictly forward and single-step; the
//! front-of-house status is operator-driven but terminal states are final.
//! Cancellation reverses the customer credit in the same transaction.

use sqlx::SqlitePool;
use tracing::debug;

use shared::{KitchenStatus, Order, OrderStatus};

use crate::db::repository::{customer, order};
use crate::utils::{AppError, AppResult};

/// Advance the kitchen ticket to `requested`, which must be the immediate
/// successor of the current status. `Ready` tickets never move again.
pub async fn update_kitchen_status(
    pool: &SqlitePool,
    owner: &str,
    order_id: &str,
    requested: KitchenStatus,
) -> AppResult<Order> {
    let mut tx = pool.begin().await?;

    let mut current = order::find_by_id(&mut *tx, owner, order_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {order_id} not found")))?;

    let kitchen = current.kitchen_status.ok_or_else(|| {
        AppError::BusinessRule(format!("Order {order_id} has no kitchen ticket"))
    })?;
    if kitchen.next() != Some(requested) {
        return Err(AppError::BusinessRule(format!(
            "Illegal kitchen transition: {kitchen} -> {requested}"
        )));
    }

    order::set_kitchen_status(&mut *tx, owner, order_id, requested).await?;
    tx.commit().await?;

    current.kitchen_status = Some(requested);
    Ok(current)
}

/// Move the front-of-house status. Transitions out of `served` or
/// `cancelled` are rejected; moving to `cancelled` debits the customer's
/// lifetime value (clamped at zero).
pub async fn update_order_status(
    pool: &SqlitePool,
    owner: &str,
    order_id: &str,
    requested: OrderStatus,
) -> AppResult<Order> {
    let mut tx = pool.begin().await?;

    let mut current = order::find_by_id(&mut *tx, owner, order_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {order_id} not found")))?;

    if !current.status.can_transition_to(requested) {
        return Err(AppError::BusinessRule(format!(
            "Illegal status transition: {} -> {requested}",
            current.status
        )));
    }

    order::set_status(&mut *tx, owner, order_id, requested).await?;

    // A validation-failed order was never credited, so there is nothing to
    // reverse when it gets cancelled.
    if requested == OrderStatus::Cancelled
        && current.status != OrderStatus::ValidationFailed
        && let Some(customer_id) = &current.customer_id
    {
        let debited =
            customer::record_cancellation(&mut *tx, owner, customer_id, current.total_minor)
                .await?;
        if debited.is_none() {
            debug!(customer = %customer_id, "Customer gone, cancellation not debited");
        }
    }

    tx.commit().await?;

    current.status = requested;
    Ok(current)
}
