//! Authentication handler implementations

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use tracing::debug;

use crate::{
    error::AppResult,
    models::LoginSubmission,
    state::AppState,
};

use super::response::LoginResponse;

/// Validate a login submission and hand it to the authenticator
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginSubmission>, JsonRejection>,
) -> AppResult<Json<LoginResponse>> {
    let Json(submission) = payload?;

    let request = state
        .validator()
        .validate(&submission)
        .inspect_err(|violations| debug!(violations = violations.len(), "Login submission rejected"))?;

    let outcome = state.authenticator().authenticate(&request).await?;

    Ok(Json(LoginResponse {
        user_id: outcome.user_id,
        session_token: outcome.session_token,
        token_type: "Bearer".to_string(),
        expires_at: outcome.expires_at,
    }))
}
