use axum::{Router, routing::get};

use crate::state::AppState;

pub mod me;

pub fn routes() -> Router<AppState> {
    Router::new().route("/me", get(me::me))
}
