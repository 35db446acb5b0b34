//! Order placement
//!
//! A placed order is one SQLite transaction: order row, item snapshots,
//! ingredient stock deduction and the customer credit all commit together or
//! not at all. An unresolvable dish id aborts the whole order.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, warn};
use uuid::Uuid;
use validator::Validate;

use shared::request::PlaceOrderRequest;
use shared::{Dish, KitchenStatus, Order, OrderItem, OrderStatus};

use crate::db::repository::{customer, dish, ingredient, order};
use crate::utils::{AppError, AppResult};

/// Allowed drift between the client-side total and the server-side total.
/// Anything beyond it marks the order `validation_failed` instead of
/// rejecting it, so the mismatch is visible to staff.
pub const TOTAL_TOLERANCE_MINOR: i64 = 1;

pub async fn place_order(
    pool: &SqlitePool,
    owner: &str,
    req: PlaceOrderRequest,
) -> AppResult<Order> {
    req.validate()?;

    let mut tx = pool.begin().await?;

    // Resolve every line against the live menu; totals come from the server
    // prices, never from the client.
    let mut resolved: Vec<(Dish, i64, Option<String>)> = Vec::with_capacity(req.items.len());
    let mut total_minor = 0i64;
    for line in &req.items {
        let dish = dish::find_by_id(&mut *tx, owner, &line.dish_id)
            .await?
            .ok_or_else(|| AppError::Validation(format!("Unknown dish: {}", line.dish_id)))?;
        total_minor += dish.price_minor * line.quantity;
        resolved.push((dish, line.quantity, line.notes.clone()));
    }

    let mut status = req.order.status.unwrap_or(OrderStatus::Pending);
    if let Some(expected) = req.order.expected_total_minor
        && (expected - total_minor).abs() > TOTAL_TOLERANCE_MINOR
    {
        warn!(
            expected, computed = total_minor,
            "Order total mismatch, marking validation_failed"
        );
        status = OrderStatus::ValidationFailed;
    }

    // Only orders actually headed for fulfilment open a kitchen ticket
    let kitchen_status = status.is_active().then_some(KitchenStatus::Pending);

    let now = Utc::now();
    let placed = Order {
        id: Uuid::new_v4().to_string(),
        table_number: req.order.table_number.clone(),
        guests: req.order.guests,
        order_type: req.order.order_type,
        status,
        kitchen_status,
        total_minor,
        customer_id: req.order.customer_id.clone(),
        created_at: now,
    };
    order::insert(&mut tx, owner, &placed).await?;

    for (dish, quantity, notes) in resolved {
        let item = OrderItem {
            id: Uuid::new_v4().to_string(),
            order_id: placed.id.clone(),
            dish_id: dish.id.clone(),
            quantity,
            price_minor: dish.price_minor,
            notes,
        };
        order::insert_item(&mut tx, &item).await?;

        if status == OrderStatus::ValidationFailed {
            continue;
        }
        for link in ingredient::links_for_dish(&mut *tx, &dish.id).await? {
            let delta = -(link.quantity * quantity as f64);
            match ingredient::adjust_stock(&mut *tx, owner, &link.ingredient_id, delta).await? {
                Some(updated) if updated.current_stock < 0.0 => warn!(
                    ingredient = %updated.name, stock = updated.current_stock,
                    "Ingredient stock went negative"
                ),
                Some(updated) if updated.current_stock <= updated.min_level => warn!(
                    ingredient = %updated.name, stock = updated.current_stock,
                    min_level = updated.min_level,
                    "Ingredient below reorder level"
                ),
                Some(_) => {}
                None => debug!(
                    ingredient = %link.ingredient_id,
                    "Linked ingredient no longer exists, skipping deduction"
                ),
            }
        }
    }

    if status != OrderStatus::ValidationFailed
        && let Some(customer_id) = &placed.customer_id
    {
        let credited =
            customer::record_order(&mut *tx, owner, customer_id, total_minor, now).await?;
        if credited.is_none() {
            debug!(customer = %customer_id, "Customer not found, order placed without credit");
        }
    }

    tx.commit().await?;
    Ok(placed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::{customer, dish, ingredient, order};
    use crate::db::test_support::memory_pool;
    use shared::request::{
        CartLine, CustomerCreate, DishCreate, DishIngredientCreate, IngredientCreate, OrderDraft,
    };
    use shared::{OrderType, PlatformAvailability};

    fn dish_create(name: &str, price_minor: i64) -> DishCreate {
        DishCreate {
            name: name.into(),
            price_minor,
            category: "mains".into(),
            veg: true,
            image: None,
            available: true,
            availability: PlatformAvailability::default(),
        }
    }

    fn request(items: Vec<CartLine>) -> PlaceOrderRequest {
        PlaceOrderRequest {
            order: OrderDraft {
                table_number: Some("T1".into()),
                guests: 2,
                order_type: OrderType::DineIn,
                status: None,
                customer_id: None,
                expected_total_minor: None,
            },
            items,
        }
    }

    fn line(dish_id: &str, quantity: i64) -> CartLine {
        CartLine {
            dish_id: dish_id.into(),
            quantity,
            notes: None,
        }
    }

    #[tokio::test]
    async fn totals_come_from_server_prices() {
        let pool = memory_pool().await;
        let paneer = dish::create(&pool, "o1", dish_create("Paneer", 25000)).await.unwrap();
        let naan = dish::create(&pool, "o1", dish_create("Naan", 4000)).await.unwrap();

        let placed = place_order(
            &pool,
            "o1",
            request(vec![line(&paneer.id, 2), line(&naan.id, 3)]),
        )
        .await
        .unwrap();

        assert_eq!(placed.total_minor, 2 * 25000 + 3 * 4000);
        assert_eq!(placed.status, OrderStatus::Pending);
        assert_eq!(placed.kitchen_status, Some(KitchenStatus::Pending));

        let items = order::items_for(&pool, &placed.id).await.unwrap();
        assert_eq!(items.len(), 2);
        let snap = items.iter().find(|i| i.dish_id == paneer.id).unwrap();
        assert_eq!(snap.price_minor, 25000);
    }

    #[tokio::test]
    async fn price_snapshot_survives_menu_edits() {
        let pool = memory_pool().await;
        let d = dish::create(&pool, "o1", dish_create("Dal", 12000)).await.unwrap();
        let placed = place_order(&pool, "o1", request(vec![line(&d.id, 1)])).await.unwrap();

        let mut conn = pool.acquire().await.unwrap();
        dish::update(
            &mut conn,
            "o1",
            &d.id,
            shared::request::DishUpdate {
                price_minor: Some(15000),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        // release the pool's single connection before querying through it again
        drop(conn);

        let items = order::items_for(&pool, &placed.id).await.unwrap();
        assert_eq!(items[0].price_minor, 12000);
        let reloaded = order::find_by_id(&pool, "o1", &placed.id).await.unwrap().unwrap();
        assert_eq!(reloaded.total_minor, 12000);
    }

    #[tokio::test]
    async fn unknown_dish_rolls_back_everything() {
        let pool = memory_pool().await;
        let d = dish::create(&pool, "o1", dish_create("Dal", 12000)).await.unwrap();
        let ing = ingredient::create(
            &pool,
            "o1",
            IngredientCreate {
                name: "Lentils".into(),
                unit: "kg".into(),
                current_stock: 10.0,
                min_level: 1.0,
            },
        )
        .await
        .unwrap();
        ingredient::link(
            &pool,
            &d.id,
            DishIngredientCreate {
                ingredient_id: ing.id.clone(),
                quantity: 0.5,
            },
        )
        .await
        .unwrap();

        let err = place_order(&pool, "o1", request(vec![line(&d.id, 2), line("ghost", 1)]))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        // nothing committed: no order rows, stock untouched
        assert!(order::find_all(&pool, "o1").await.unwrap().is_empty());
        let after = ingredient::find_by_id(&pool, "o1", &ing.id).await.unwrap().unwrap();
        assert_eq!(after.current_stock, 10.0);
    }

    #[tokio::test]
    async fn stock_deducts_quantity_times_line_qty() {
        let pool = memory_pool().await;
        let d = dish::create(&pool, "o1", dish_create("Biryani", 30000)).await.unwrap();
        let rice = ingredient::create(
            &pool,
            "o1",
            IngredientCreate {
                name: "Rice".into(),
                unit: "kg".into(),
                current_stock: 20.0,
                min_level: 2.0,
            },
        )
        .await
        .unwrap();
        ingredient::link(
            &pool,
            &d.id,
            DishIngredientCreate {
                ingredient_id: rice.id.clone(),
                quantity: 2.0,
            },
        )
        .await
        .unwrap();

        place_order(&pool, "o1", request(vec![line(&d.id, 3)])).await.unwrap();

        let after = ingredient::find_by_id(&pool, "o1", &rice.id).await.unwrap().unwrap();
        assert_eq!(after.current_stock, 20.0 - 6.0);
    }

    #[tokio::test]
    async fn total_mismatch_marks_validation_failed() {
        let pool = memory_pool().await;
        let d = dish::create(&pool, "o1", dish_create("Dal", 12000)).await.unwrap();
        let cust = customer::create(
            &pool,
            "o1",
            CustomerCreate {
                name: "Asha".into(),
                phone: "99".into(),
            },
        )
        .await
        .unwrap();

        let mut req = request(vec![line(&d.id, 1)]);
        req.order.customer_id = Some(cust.id.clone());
        req.order.expected_total_minor = Some(9000);

        let placed = place_order(&pool, "o1", req).await.unwrap();
        assert_eq!(placed.status, OrderStatus::ValidationFailed);
        assert_eq!(placed.kitchen_status, None);

        // no credit for an order that failed validation
        let after = customer::find_by_id(&pool, "o1", &cust.id).await.unwrap().unwrap();
        assert_eq!(after.lifetime_value_minor, 0);
        assert_eq!(after.total_orders, 0);
    }

    #[tokio::test]
    async fn one_minor_unit_drift_is_tolerated() {
        let pool = memory_pool().await;
        let d = dish::create(&pool, "o1", dish_create("Dal", 12000)).await.unwrap();

        let mut req = request(vec![line(&d.id, 1)]);
        req.order.expected_total_minor = Some(12001);

        let placed = place_order(&pool, "o1", req).await.unwrap();
        assert_eq!(placed.status, OrderStatus::Pending);
    }

    #[tokio::test]
    async fn customer_lifetime_value_increments() {
        let pool = memory_pool().await;
        let d = dish::create(&pool, "o1", dish_create("Dal", 12000)).await.unwrap();
        let cust = customer::create(
            &pool,
            "o1",
            CustomerCreate {
                name: "Asha".into(),
                phone: "99".into(),
            },
        )
        .await
        .unwrap();

        let mut req = request(vec![line(&d.id, 2)]);
        req.order.customer_id = Some(cust.id.clone());
        place_order(&pool, "o1", req).await.unwrap();

        let after = customer::find_by_id(&pool, "o1", &cust.id).await.unwrap().unwrap();
        assert_eq!(after.lifetime_value_minor, 24000);
        assert_eq!(after.total_orders, 1);
        assert!(after.last_visit.is_some());
    }

    #[tokio::test]
    async fn tenants_cannot_order_each_others_dishes() {
        let pool = memory_pool().await;
        let d = dish::create(&pool, "owner-a", dish_create("Dal", 12000)).await.unwrap();

        let err = place_order(&pool, "owner-b", request(vec![line(&d.id, 1)]))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
