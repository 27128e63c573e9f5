//! Shared test fixtures

use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;
use std::sync::{Arc, Mutex};

use axum::{body::to_bytes, response::Response};
use sqlx::error::{DatabaseError, ErrorKind};

use crate::{
    config::{Config, DatabaseConfig, DiagnosticsConfig, IntakeConfig, ServerConfig},
    constants::{DEFAULT_AUTH_PROCEDURE, DEFAULT_DIAGNOSTICS_CHANNEL_CAPACITY},
    services::Authenticator,
    state::AppState,
    translator::{DiagnosticRecord, DiagnosticSink, ExceptionTranslator},
};

/// Keeps every record for inspection
#[derive(Default)]
pub struct CollectingSink {
    records: Mutex<Vec<DiagnosticRecord>>,
}

impl CollectingSink {
    pub fn records(&self) -> Vec<DiagnosticRecord> {
        self.records.lock().unwrap().clone()
    }
}

impl DiagnosticSink for CollectingSink {
    fn emit(&self, record: DiagnosticRecord) {
        self.records.lock().unwrap().push(record);
    }
}

pub fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            rust_log: "debug".to_string(),
        },
        database: DatabaseConfig {
            url: "postgres://localhost/login_gate_test".to_string(),
            max_connections: 1,
            auth_procedure: DEFAULT_AUTH_PROCEDURE.to_string(),
        },
        intake: IntakeConfig::default(),
        diagnostics: DiagnosticsConfig {
            channel_capacity: DEFAULT_DIAGNOSTICS_CHANNEL_CAPACITY,
        },
    }
}

/// App state around `authenticator`, with diagnostics collected in memory
pub fn test_state<A>(authenticator: A) -> (AppState, Arc<CollectingSink>)
where
    A: Authenticator + 'static,
{
    let sink = Arc::new(CollectingSink::default());
    let translator = Arc::new(ExceptionTranslator::new(sink.clone()));
    let state = AppState::new(Arc::new(authenticator), translator, &test_config());
    (state, sink)
}

pub async fn read_json(response: Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Stand-in for a driver error carrying a SQLSTATE
#[derive(Debug)]
pub struct FakeDatabaseError {
    code: Option<&'static str>,
    kind: FakeKind,
    constraint: Option<String>,
}

#[derive(Debug, Clone, Copy)]
enum FakeKind {
    Unique,
    ForeignKey,
    NotNull,
    Check,
    Other,
}

impl fmt::Display for FakeDatabaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "database error {}", self.code.unwrap_or("(no code)"))
    }
}

impl StdError for FakeDatabaseError {}

impl DatabaseError for FakeDatabaseError {
    fn message(&self) -> &str {
        "fake database error"
    }

    fn code(&self) -> Option<Cow<'_, str>> {
        self.code.map(Cow::Borrowed)
    }

    fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
        self
    }

    fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
        self
    }

    fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
        self
    }

    fn constraint(&self) -> Option<&str> {
        self.constraint.as_deref()
    }

    fn kind(&self) -> ErrorKind {
        match self.kind {
            FakeKind::Unique => ErrorKind::UniqueViolation,
            FakeKind::ForeignKey => ErrorKind::ForeignKeyViolation,
            FakeKind::NotNull => ErrorKind::NotNullViolation,
            FakeKind::Check => ErrorKind::CheckViolation,
            FakeKind::Other => ErrorKind::Other,
        }
    }
}

pub fn database_error(code: Option<&'static str>, kind: ErrorKind) -> sqlx::Error {
    let kind = match kind {
        ErrorKind::UniqueViolation => FakeKind::Unique,
        ErrorKind::ForeignKeyViolation => FakeKind::ForeignKey,
        ErrorKind::NotNullViolation => FakeKind::NotNull,
        ErrorKind::CheckViolation => FakeKind::Check,
        _ => FakeKind::Other,
    };

    sqlx::Error::Database(Box::new(FakeDatabaseError {
        code,
        kind,
        constraint: None,
    }))
}

/// PostgreSQL unique violation on `constraint`
pub fn unique_violation(constraint: &str) -> sqlx::Error {
    sqlx::Error::Database(Box::new(FakeDatabaseError {
        code: Some("23505"),
        kind: FakeKind::Unique,
        constraint: Some(constraint.to_string()),
    }))
}
