use axum::Json;
use axum::body::Bytes;
use axum::http::StatusCode;
use serde_json::{Value, json};
use tracing::info;

use crate::appstate::AppState;
use crate::messages::frontend_messages::{CabinState, StateUpdate};

/// POST request handler to update the shared speed / cabin-noise record.
///
/// The body must be a JSON object; anything else is answered with
/// `400 {"error": "missing json"}` and no mutation. Present fields that fail
/// float coercion are dropped per field, so a partially bad update still
/// applies its good fields. The response is the post-write record, letting
/// the caller spot a field that was left unchanged.
#[axum::debug_handler]
pub async fn post_update(
    state: axum::extract::State<AppState>,
    body: Bytes,
) -> Result<Json<CabinState>, (StatusCode, Json<Value>)> {
    let payload: Value = serde_json::from_slice(&body).map_err(|_| missing_json())?;
    if !payload.is_object() {
        return Err(missing_json());
    }
    let update: StateUpdate = serde_json::from_value(payload).map_err(|_| missing_json())?;

    let new_state = state.store.apply(&update);
    info!("POST updated shared state to: {:?}", new_state);
    Ok(Json(new_state))
}

fn missing_json() -> (StatusCode, Json<Value>) {
    (StatusCode::BAD_REQUEST, Json(json!({"error": "missing json"})))
}
