//! Router assembly.

use crate::handlers::{health, property, property_set};
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Resource routes mounted under the API prefix.
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/property", post(property::create).get(property::list))
        .route(
            "/property/:id",
            get(property::read)
                .put(property::update)
                .delete(property::delete),
        )
        .route("/property/:id/basic", get(property::read_basic))
        .route(
            "/set",
            post(property_set::create).get(property_set::list),
        )
        .route(
            "/set/:id",
            get(property_set::read)
                .put(property_set::update)
                .delete(property_set::delete),
        )
        .with_state(state)
}

/// Full application router: healthcheck outside the API prefix, request
/// tracing on top.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/healthcheck", get(health::check))
        .nest("/api", api_routes(state))
        .layer(TraceLayer::new_for_http())
}
