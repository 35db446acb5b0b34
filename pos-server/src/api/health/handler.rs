//! Health check handler — the one route without tenant scoping

use axum::Json;
use serde_json::{Value, json};

/// GET /api/health
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
