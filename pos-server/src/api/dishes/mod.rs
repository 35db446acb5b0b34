//! Dish API module

mod handler;

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/dishes", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/bulk-availability", post(handler::bulk_availability))
        .route("/bulk-availability/undo", post(handler::bulk_undo))
        .route("/bulk-availability/progress", get(handler::bulk_progress))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .patch(handler::update)
                .delete(handler::delete),
        )
        .route(
            "/{id}/ingredients",
            get(handler::list_ingredients).post(handler::link_ingredient),
        )
        .route("/{id}/ingredients/{link_id}", delete(handler::unlink_ingredient))
}
