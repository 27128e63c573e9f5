//! HTTP Request Handlers
//!
//! This module contains all HTTP request handlers organized by domain.

pub mod auth;
pub mod health;

use axum::{middleware, Router};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    constants::API_BASE_PATH,
    error::AppError,
    middleware::{logging_middleware, panic_response, translate_errors},
    state::AppState,
};

/// Create all API routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .nest("/auth", auth::routes())
}

/// Build the application router with the error translation wrapper outermost
/// around the handlers
pub fn create_router(state: AppState) -> Router {
    let translator = state.translator();

    Router::new()
        .nest(API_BASE_PATH, routes())
        .fallback(not_found)
        .layer(CatchPanicLayer::custom(move |payload| {
            panic_response(&translator, payload)
        }))
        .layer(middleware::from_fn_with_state(state.clone(), translate_errors))
        .layer(middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

async fn not_found() -> AppError {
    AppError::NotFound("Route not found".to_string())
}
