//! API route modules
//!
//! Every resource module exposes a `router()` nesting its routes under
//! `/api/...`; [`router`] merges them into the full surface. All routes
//! except the health check require the `x-owner-id` tenant header, enforced
//! by the [`owner::OwnerId`] extractor.

pub mod owner;

pub mod analytics;
pub mod customers;
pub mod dishes;
pub mod health;
pub mod ingredients;
pub mod kot;
pub mod orders;
pub mod tables;

use axum::Router;

use crate::core::ServerState;

pub use crate::utils::{AppError, AppResult};
pub use owner::OwnerId;

/// Assemble the full API surface
pub fn router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(dishes::router())
        .merge(orders::router())
        .merge(kot::router())
        .merge(customers::router())
        .merge(tables::router())
        .merge(ingredients::router())
        .merge(analytics::router())
}
