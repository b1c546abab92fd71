//! Presentation: in-memory ticket board, author name cache, form checks and
//! role capabilities, plus the server-rendered ticket table.

pub mod authors;
pub mod board;
pub mod forms;
pub mod tickets;

use axum::routing::get;
use axum::Router;

use crate::state::SharedState;

pub fn view_routes() -> Router<SharedState> {
    Router::new().route("/htmx/tickets", get(tickets::table_partial))
}
