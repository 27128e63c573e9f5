//! Authentication handlers

mod handler;
pub mod response;

pub use handler::*;
pub use response::*;

use axum::{routing::post, Router};

use crate::state::AppState;

/// Authentication routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/login", post(handler::login))
}
