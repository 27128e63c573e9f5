//! Login Gate - request-intake boundary for an authentication service
//!
//! Two concerns live here and nowhere else:
//!
//! - **Validation**: raw login submissions are checked against an explicit rule
//!   table and normalized before anything downstream sees them.
//! - **Translation**: every failure escaping the request pipeline is classified
//!   into one client-safe error shape, with full detail kept for the logs.
//!
//! Credential verification and session issuance are delegated to an
//! [`services::Authenticator`].
//!
//! # Architecture
//!
//! - **Handlers**: HTTP request handlers (thin layer)
//! - **Validation**: login rule table and validator
//! - **Translator**: classifier chain and diagnostics
//! - **Services**: the authentication collaborator

pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod state;
pub mod translator;
pub mod validation;

#[cfg(test)]
mod test_utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, AppResult};
pub use handlers::create_router;
pub use state::AppState;
pub use validation::validate_login;
