//! End-to-end API tests over the assembled router

use axum::{Router, body::Body};
use http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use pos_server::{Config, ServerState, app};

async fn test_app() -> (tempfile::TempDir, Router) {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::with_overrides(dir.path().to_string_lossy(), 0);
    let state = ServerState::initialize(&config).await;
    (dir, app(state))
}

async fn send(
    router: &Router,
    method: &str,
    uri: &str,
    owner: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(o) = owner {
        builder = builder.header("x-owner-id", o);
    }
    let request = match body {
        Some(v) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(v.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create_dish(router: &Router, owner: &str, name: &str, price_minor: i64) -> String {
    let (status, body) = send(
        router,
        "POST",
        "/api/dishes",
        Some(owner),
        Some(json!({ "name": name, "priceMinor": price_minor, "category": "mains" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_is_open_but_everything_else_needs_a_tenant() {
    let (_dir, router) = test_app().await;

    let (status, body) = send(&router, "GET", "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = send(&router, "GET", "/api/dishes", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "E3001");
}

#[tokio::test]
async fn order_flows_from_placement_to_a_ready_kitchen_ticket() {
    let (_dir, router) = test_app().await;
    let dish_id = create_dish(&router, "o1", "Paneer Tikka", 25000).await;

    let (status, order) = send(
        &router,
        "POST",
        "/api/orders",
        Some("o1"),
        Some(json!({
            "order": { "tableNumber": "T1", "guests": 2, "type": "dine-in" },
            "items": [ { "dishId": dish_id, "quantity": 2 } ],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(order["totalMinor"], 50000);
    assert_eq!(order["status"], "pending");
    assert_eq!(order["kitchenStatus"], "pending");
    let order_id = order["id"].as_str().unwrap();

    // the ticket shows up on the KOT panel with its dish joined in
    let (status, kot) = send(&router, "GET", "/api/kot", Some("o1"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(kot.as_array().unwrap().len(), 1);
    assert_eq!(kot[0]["items"][0]["dish"]["name"], "Paneer Tikka");
    assert_eq!(kot[0]["items"][0]["priceMinor"], 25000);

    for next in ["sent", "preparing", "ready"] {
        let (status, updated) = send(
            &router,
            "PATCH",
            &format!("/api/orders/{order_id}/kitchen-status"),
            Some("o1"),
            Some(json!({ "kitchenStatus": next })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["kitchenStatus"], next);
    }

    // ready tickets leave the queue and never come back
    let (_, kot) = send(&router, "GET", "/api/kot", Some("o1"), None).await;
    assert!(kot.as_array().unwrap().is_empty());

    let (status, body) = send(
        &router,
        "PATCH",
        &format!("/api/orders/{order_id}/kitchen-status"),
        Some("o1"),
        Some(json!({ "kitchenStatus": "pending" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "E0005");
}

#[tokio::test]
async fn kitchen_steps_cannot_be_skipped_over_http() {
    let (_dir, router) = test_app().await;
    let dish_id = create_dish(&router, "o1", "Dal", 12000).await;

    let (_, order) = send(
        &router,
        "POST",
        "/api/orders",
        Some("o1"),
        Some(json!({
            "order": { "type": "takeaway" },
            "items": [ { "dishId": dish_id, "quantity": 1 } ],
        })),
    )
    .await;
    let order_id = order["id"].as_str().unwrap();

    let (status, _) = send(
        &router,
        "PATCH",
        &format!("/api/orders/{order_id}/kitchen-status"),
        Some("o1"),
        Some(json!({ "kitchenStatus": "ready" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn unknown_dish_rejects_the_whole_order() {
    let (_dir, router) = test_app().await;
    let dish_id = create_dish(&router, "o1", "Dal", 12000).await;

    let (status, body) = send(
        &router,
        "POST",
        "/api/orders",
        Some("o1"),
        Some(json!({
            "order": { "type": "dine-in" },
            "items": [
                { "dishId": dish_id, "quantity": 1 },
                { "dishId": "ghost", "quantity": 1 },
            ],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "E0002");

    let (_, orders) = send(&router, "GET", "/api/orders", Some("o1"), None).await;
    assert!(orders.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn duplicate_table_number_in_section_is_a_conflict() {
    let (_dir, router) = test_app().await;

    let payload = json!({ "number": "5", "section": "patio" });
    let (status, _) =
        send(&router, "POST", "/api/tables", Some("o1"), Some(payload.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&router, "POST", "/api/tables", Some("o1"), Some(payload)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "E0004");

    // same number is fine in another section, or for another tenant
    let (status, _) = send(
        &router,
        "POST",
        "/api/tables",
        Some("o1"),
        Some(json!({ "number": "5", "section": "indoor" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = send(
        &router,
        "POST",
        "/api/tables",
        Some("o2"),
        Some(json!({ "number": "5", "section": "patio" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn bulk_availability_applies_and_undoes() {
    let (_dir, router) = test_app().await;
    let mut ids = Vec::new();
    for i in 0..3 {
        ids.push(create_dish(&router, "o1", &format!("Dish {i}"), 10000).await);
    }

    let (status, report) = send(
        &router,
        "POST",
        "/api/dishes/bulk-availability",
        Some("o1"),
        Some(json!({ "dishIds": ids, "platform": "zomato", "enabled": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["updated"], 3);
    assert_eq!(report["errors"], 0);
    assert_eq!(report["chunksCommitted"], 1);

    let (_, dish) = send(
        &router,
        "GET",
        &format!("/api/dishes/{}", ids[0]),
        Some("o1"),
        None,
    )
    .await;
    assert_eq!(dish["availability"]["zomato"], true);

    let (status, report) = send(
        &router,
        "POST",
        "/api/dishes/bulk-availability/undo",
        Some("o1"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["updated"], 3);

    let (_, dish) = send(
        &router,
        "GET",
        &format!("/api/dishes/{}", ids[0]),
        Some("o1"),
        None,
    )
    .await;
    assert_eq!(dish["availability"]["zomato"], false);

    // the undo slot is single-use
    let (status, _) = send(
        &router,
        "POST",
        "/api/dishes/bulk-availability/undo",
        Some("o1"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn tenants_see_only_their_own_data() {
    let (_dir, router) = test_app().await;
    let dish_id = create_dish(&router, "owner-a", "Dal", 12000).await;

    let (_, dishes) = send(&router, "GET", "/api/dishes", Some("owner-b"), None).await;
    assert!(dishes.as_array().unwrap().is_empty());

    let (status, _) = send(
        &router,
        "GET",
        &format!("/api/dishes/{dish_id}"),
        Some("owner-b"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn analytics_summarizes_todays_orders() {
    let (_dir, router) = test_app().await;
    let dish_id = create_dish(&router, "o1", "Biryani", 30000).await;

    for _ in 0..2 {
        send(
            &router,
            "POST",
            "/api/orders",
            Some("o1"),
            Some(json!({
                "order": { "type": "takeaway" },
                "items": [ { "dishId": dish_id, "quantity": 1 } ],
            })),
        )
        .await;
    }

    let (status, summary) = send(&router, "GET", "/api/analytics", Some("o1"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["dailySalesMinor"], 60000);
    assert_eq!(summary["orderCount"], 2);
    assert_eq!(summary["avgTicketMinor"], 30000);
    assert_eq!(summary["topDishes"][0]["orders"], 2);
}
