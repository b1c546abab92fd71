pub mod invoke;

use axum::routing::post;
use axum::Router;

use crate::state::SharedState;

pub fn api_routes() -> Router<SharedState> {
    Router::new().route("/api/v1/invoke", post(invoke::invoke))
}
