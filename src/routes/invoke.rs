use axum::body::Bytes;
use axum::extract::State;
use axum::Json;

use crate::dispatch::{Dispatcher, Envelope};
use crate::state::SharedState;

/// `POST /api/v1/invoke` with `{"op": ..., "args": ...}`. Always answers
/// `200` with an envelope, including for bodies that are not JSON.
pub async fn invoke(State(state): State<SharedState>, body: Bytes) -> Json<Envelope> {
    let raw = match serde_json::from_slice(&body) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::warn!("Rejected non-JSON request body: {e}");
            return Json(Envelope::failure(format!("Malformed request: {e}")));
        }
    };

    let dispatcher = Dispatcher::new(state.pool.clone());
    Json(dispatcher.invoke(raw).await)
}
