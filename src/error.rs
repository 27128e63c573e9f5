//! Custom error types and handling
//!
//! `AppError` is the error type every handler and collaborator returns. It never
//! renders itself: `IntoResponse` parks the error on the response and the
//! translation middleware turns it into the client-facing shape.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::translator::Fault;
use crate::validation::ViolationList;

/// Application-wide error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Validation errors
    #[error("Validation failed: {0}")]
    Validation(ViolationList),

    /// Body rejected by the JSON extractor, with the status it chose
    #[error("Malformed request body: {message}")]
    MalformedBody { status: StatusCode, message: String },

    // Authentication errors
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    // Resource errors
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// Business rejection with its own client-facing code and message
    #[error("{message}")]
    Rejected {
        status: StatusCode,
        code: &'static str,
        message: String,
    },

    // Database errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn rejected(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            code,
            message: message.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        Fault::App(self).into_response()
    }
}

impl From<ViolationList> for AppError {
    fn from(violations: ViolationList) -> Self {
        AppError::Validation(violations)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::MalformedBody {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;
