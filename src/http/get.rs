use axum::Json;
use axum::response::Html;
use tracing::debug;

use crate::appstate::AppState;
use crate::messages::frontend_messages::{CabinState, SpeedReading};

/// The control panel document, compiled into the binary
const PANEL_HTML: &str = include_str!("panel.html");

/// Serve the control panel page
#[axum::debug_handler]
pub async fn index() -> Html<&'static str> {
    Html(PANEL_HTML)
}

/// Allow GET requests to fetch the current shared record over http
#[axum::debug_handler]
pub async fn get_state(state: axum::extract::State<AppState>) -> Json<CabinState> {
    let current = state.store.read();
    debug!("GET state returning: {:?}", current);
    Json(current)
}

/// Return one synthetic speed reading, independent of the shared record
#[axum::debug_handler]
pub async fn get_speed() -> Json<SpeedReading> {
    Json(SpeedReading::simulate())
}
