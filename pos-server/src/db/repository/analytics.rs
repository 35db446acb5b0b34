//! Aggregate queries for the analytics summary

use chrono::{DateTime, Utc};
use sqlx::SqliteExecutor;

use shared::response::{AnalyticsSummary, TopDish};

use super::RepoResult;

const TOP_DISH_LIMIT: i64 = 5;

/// Headline numbers since `since`. Cancelled and validation-failed orders do
/// not count towards sales.
pub async fn summary(
    db: impl SqliteExecutor<'_> + Copy,
    owner: &str,
    since: DateTime<Utc>,
) -> RepoResult<AnalyticsSummary> {
    let (sales, count): (Option<i64>, i64) = sqlx::query_as(
        "SELECT SUM(total_minor), COUNT(*) FROM orders \
         WHERE owner_id = ? AND created_at >= ? \
         AND status NOT IN ('cancelled', 'validation_failed')",
    )
    .bind(owner)
    .bind(since)
    .fetch_one(db)
    .await?;

    let daily_sales_minor = sales.unwrap_or(0);
    let avg_ticket_minor = if count > 0 { daily_sales_minor / count } else { 0 };

    let rows: Vec<(String, Option<String>, Option<String>, i64)> = sqlx::query_as(
        "SELECT oi.dish_id, d.name, d.image, COUNT(DISTINCT o.id) AS orders \
         FROM order_items oi \
         JOIN orders o ON o.id = oi.order_id \
         LEFT JOIN dishes d ON d.id = oi.dish_id \
         WHERE o.owner_id = ? AND o.created_at >= ? \
         AND o.status NOT IN ('cancelled', 'validation_failed') \
         GROUP BY oi.dish_id ORDER BY orders DESC LIMIT ?",
    )
    .bind(owner)
    .bind(since)
    .bind(TOP_DISH_LIMIT)
    .fetch_all(db)
    .await?;

    let top_dishes = rows
        .into_iter()
        .map(|(dish_id, name, image, orders)| TopDish {
            // deleted dishes keep their id as the display name
            name: name.unwrap_or_else(|| dish_id.clone()),
            dish_id,
            image,
            orders,
        })
        .collect();

    Ok(AnalyticsSummary {
        daily_sales_minor,
        order_count: count,
        avg_ticket_minor,
        top_dishes,
    })
}
