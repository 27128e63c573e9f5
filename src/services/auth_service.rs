//! Authentication collaborator
//!
//! Credential verification and session issuance live in the database. This
//! service only hands a validated [`LoginRequest`] to the login procedure and
//! reports what came back.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    db,
    error::{AppError, AppResult},
    models::LoginRequest,
};

/// Result of a successful login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct AuthOutcome {
    pub user_id: Uuid,
    pub session_token: String,
    pub expires_at: DateTime<Utc>,
}

/// Verifies credentials and issues sessions
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Authenticate a validated login; unknown accounts and bad passwords are
    /// both `InvalidCredentials`
    async fn authenticate(&self, request: &LoginRequest) -> AppResult<AuthOutcome>;

    /// Check the backing store is reachable
    async fn health_check(&self) -> AppResult<()>;
}

/// Calls a database-side login procedure
pub struct SqlAuthenticator {
    pool: PgPool,
    query: String,
}

impl SqlAuthenticator {
    /// `procedure` must already be a validated SQL identifier
    pub fn new(pool: PgPool, procedure: &str) -> Self {
        Self {
            pool,
            query: format!(
                "SELECT user_id, session_token, expires_at FROM {procedure}($1, $2, $3, $4, $5, $6)"
            ),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }
}

#[async_trait]
impl Authenticator for SqlAuthenticator {
    async fn authenticate(&self, request: &LoginRequest) -> AppResult<AuthOutcome> {
        let outcome = sqlx::query_as::<_, AuthOutcome>(&self.query)
            .bind(request.email())
            .bind(request.username())
            .bind(request.password())
            .bind(request.device_name())
            .bind(request.ip_address())
            .bind(request.user_agent())
            .fetch_optional(&self.pool)
            .await?;

        match outcome {
            Some(outcome) => {
                tracing::info!(user_id = %outcome.user_id, "Login accepted");
                Ok(outcome)
            }
            None => {
                tracing::debug!(device = %request.device_name(), "Login rejected by procedure");
                Err(AppError::InvalidCredentials)
            }
        }
    }

    async fn health_check(&self) -> AppResult<()> {
        db::test_connection(&self.pool).await?;
        Ok(())
    }
}
