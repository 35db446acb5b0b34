//! Order API module

mod handler;

use axum::{
    Router,
    routing::{get, patch},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::place))
        .route("/active", get(handler::active))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/items", get(handler::items))
        .route("/{id}/kitchen-status", patch(handler::kitchen_status))
        .route("/{id}/status", patch(handler::status))
}
