//! Business logic services

pub mod auth_service;

pub use auth_service::{AuthOutcome, Authenticator, SqlAuthenticator};

#[cfg(test)]
pub use auth_service::MockAuthenticator;
