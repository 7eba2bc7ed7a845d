//! Entity routes built from the resolved model.
//! Uses parameterized paths; handlers look the binding up by path segment.

use crate::handlers::entity::{create, delete as delete_handler, form_values, list, read, schema, update};
use crate::state::AppState;
use axum::{extract::DefaultBodyLimit, routing::get, Router};
use tower_http::limit::RequestBodyLimitLayer;

pub fn entity_routes(state: AppState, body_limit_bytes: usize) -> Router {
    Router::new()
        .route("/_schema/:path_segment", get(schema))
        .route("/:path_segment", get(list).post(create))
        .route(
            "/:path_segment/:id",
            get(read).put(update).post(update).delete(delete_handler),
        )
        .route("/:path_segment/:id/form", get(form_values))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(body_limit_bytes))
        .with_state(state)
}
