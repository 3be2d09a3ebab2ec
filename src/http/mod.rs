use axum::Router;

use crate::appstate::AppState;

pub mod get;
pub mod post;

/// Assemble the application router over the given state.
///
/// Shared between the binary entrypoint and the integration tests so both
/// exercise the same route table.
pub fn router(state: AppState) -> Router {
    Router::new()
        // GET endpoints
        .route("/", axum::routing::get(get::index))
        .route("/state", axum::routing::get(get::get_state))
        .route("/speed", axum::routing::get(get::get_speed))
        // POST endpoints
        .route("/update", axum::routing::post(post::post_update))
        // Give the handlers access to the application state
        .with_state(state)
}
