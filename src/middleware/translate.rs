//! Outermost error translation
//!
//! `translate_errors` owns the classifier chain for every response leaving the
//! router: faults parked by `AppError` are translated, and bare framework error
//! statuses get the canonical body too. `panic_response` does the same for
//! panics caught by `CatchPanicLayer`.

use std::any::Any;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{
    state::AppState,
    translator::{ExceptionTranslator, Fault, PendingFault, Translated},
};

/// Error translation middleware
pub async fn translate_errors(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;

    if let Some(pending) = response.extensions_mut().remove::<PendingFault>() {
        if let Some(fault) = pending.take() {
            return state.translator().translate(&fault).into_response();
        }
    }

    let status = response.status();
    let is_error = status.is_client_error() || status.is_server_error();
    if is_error && response.extensions().get::<Translated>().is_none() {
        return state
            .translator()
            .translate(&Fault::Status(status))
            .into_response();
    }

    response
}

/// Response for a panic caught below the translation middleware
pub fn panic_response(
    translator: &Arc<ExceptionTranslator>,
    payload: Box<dyn Any + Send + 'static>,
) -> Response {
    translator
        .translate(&Fault::from_panic(payload))
        .into_response()
}
