//! Persistence-layer error classification
//!
//! Recognises `sqlx` errors, either carried directly by `AppError::Database` or
//! buried in an `anyhow` cause chain, and maps the codes it knows. Anything else
//! falls through to the next classifier.

use axum::http::StatusCode;
use sqlx::error::{DatabaseError, ErrorKind};

use crate::constants::error_codes;
use crate::error::AppError;

use super::{Classifier, Fault, StatusCategory, TranslatedError};

/// Translation for one recognised persistence code
struct Mapping {
    category: StatusCategory,
    status: StatusCode,
    code: &'static str,
    message: &'static str,
}

impl Mapping {
    const fn client(status: StatusCode, code: &'static str, message: &'static str) -> Self {
        Self {
            category: StatusCategory::ClientFault,
            status,
            code,
            message,
        }
    }

    const fn server(status: StatusCode, code: &'static str, message: &'static str) -> Self {
        Self {
            category: StatusCategory::ServerFault,
            status,
            code,
            message,
        }
    }

    fn translate(&self) -> TranslatedError {
        match self.category {
            StatusCategory::ClientFault => TranslatedError::client(self.status, self.code, self.message),
            StatusCategory::ServerFault => TranslatedError::server(self.status, self.code, self.message),
        }
    }
}

const ALREADY_EXISTS: Mapping = Mapping::client(
    StatusCode::CONFLICT,
    error_codes::ALREADY_EXISTS,
    "A record with this value already exists",
);

const INVALID_REFERENCE: Mapping = Mapping::client(
    StatusCode::CONFLICT,
    error_codes::INVALID_REFERENCE,
    "A referenced record does not exist",
);

const MISSING_VALUE: Mapping = Mapping::client(
    StatusCode::BAD_REQUEST,
    error_codes::MISSING_VALUE,
    "A required value is missing",
);

const CONSTRAINT_VIOLATION: Mapping = Mapping::client(
    StatusCode::BAD_REQUEST,
    error_codes::CONSTRAINT_VIOLATION,
    "A value does not satisfy a data constraint",
);

const VALUE_TOO_LONG: Mapping = Mapping::client(
    StatusCode::BAD_REQUEST,
    error_codes::VALUE_TOO_LONG,
    "A value is too long",
);

const NOT_FOUND: Mapping = Mapping::client(
    StatusCode::NOT_FOUND,
    error_codes::NOT_FOUND,
    "Resource not found",
);

const RETRYABLE_CONFLICT: Mapping = Mapping::server(
    StatusCode::SERVICE_UNAVAILABLE,
    error_codes::RETRYABLE_CONFLICT,
    "The request conflicted with a concurrent update, please retry",
);

const UNAVAILABLE: Mapping = Mapping::server(
    StatusCode::SERVICE_UNAVAILABLE,
    error_codes::SERVICE_UNAVAILABLE,
    "Service temporarily unavailable",
);

/// Known PostgreSQL SQLSTATE codes
const SQLSTATE_MAPPINGS: &[(&str, Mapping)] = &[
    ("23505", ALREADY_EXISTS),
    ("23503", INVALID_REFERENCE),
    ("23502", MISSING_VALUE),
    ("23514", CONSTRAINT_VIOLATION),
    ("22001", VALUE_TOO_LONG),
    ("40001", RETRYABLE_CONFLICT),
    ("40P01", RETRYABLE_CONFLICT),
    ("53300", UNAVAILABLE),
    ("57P01", UNAVAILABLE),
    ("57P02", UNAVAILABLE),
    ("57P03", UNAVAILABLE),
];

/// SQLSTATE class 08: connection exceptions
const CONNECTION_EXCEPTION_CLASS: &str = "08";

/// First classifier in the chain
pub struct PersistenceClassifier;

impl Classifier for PersistenceClassifier {
    fn name(&self) -> &'static str {
        "persistence"
    }

    fn classify(&self, fault: &Fault) -> Option<TranslatedError> {
        persistence_error(fault)
            .and_then(classify_sqlx)
            .map(|mapping| mapping.translate())
    }
}

fn persistence_error(fault: &Fault) -> Option<&sqlx::Error> {
    match fault {
        Fault::App(AppError::Database(err)) => Some(err),
        Fault::App(AppError::Internal(err)) => {
            err.chain().find_map(|cause| cause.downcast_ref::<sqlx::Error>())
        }
        _ => None,
    }
}

fn classify_sqlx(err: &sqlx::Error) -> Option<&'static Mapping> {
    match err {
        sqlx::Error::RowNotFound => Some(&NOT_FOUND),
        sqlx::Error::Database(db_err) => classify_database(db_err.as_ref()),
        sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => Some(&UNAVAILABLE),
        _ => None,
    }
}

fn classify_database(db_err: &dyn DatabaseError) -> Option<&'static Mapping> {
    if let Some(code) = db_err.code() {
        if let Some(mapping) = by_sqlstate(&code) {
            return Some(mapping);
        }
    }

    match db_err.kind() {
        ErrorKind::UniqueViolation => Some(&ALREADY_EXISTS),
        ErrorKind::ForeignKeyViolation => Some(&INVALID_REFERENCE),
        ErrorKind::NotNullViolation => Some(&MISSING_VALUE),
        ErrorKind::CheckViolation => Some(&CONSTRAINT_VIOLATION),
        _ => None,
    }
}

fn by_sqlstate(code: &str) -> Option<&'static Mapping> {
    if code.starts_with(CONNECTION_EXCEPTION_CLASS) {
        return Some(&UNAVAILABLE);
    }

    SQLSTATE_MAPPINGS
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, mapping)| mapping)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{database_error, unique_violation};

    fn classify(err: sqlx::Error) -> Option<TranslatedError> {
        PersistenceClassifier.classify(&Fault::App(AppError::Database(err)))
    }

    #[test]
    fn test_unique_violation() {
        let translated = classify(unique_violation("users_email_key")).unwrap();
        assert_eq!(translated.status_category, StatusCategory::ClientFault);
        assert_eq!(translated.code, error_codes::ALREADY_EXISTS);
        assert!(translated.message.contains("already exists"));
    }

    #[test]
    fn test_row_not_found() {
        let translated = classify(sqlx::Error::RowNotFound).unwrap();
        assert_eq!(translated.status, StatusCode::NOT_FOUND);
        assert!(translated.is_client_fault());
    }

    #[test]
    fn test_connection_failures_are_unavailable() {
        for err in [
            sqlx::Error::PoolTimedOut,
            sqlx::Error::PoolClosed,
            sqlx::Error::Io(std::io::Error::from(std::io::ErrorKind::ConnectionRefused)),
            database_error(Some("08006"), ErrorKind::Other),
            database_error(Some("08001"), ErrorKind::Other),
            database_error(Some("53300"), ErrorKind::Other),
            database_error(Some("57P01"), ErrorKind::Other),
            database_error(Some("57P02"), ErrorKind::Other),
            database_error(Some("57P03"), ErrorKind::Other),
        ] {
            let translated = classify(err).unwrap();
            assert_eq!(translated.status_category, StatusCategory::ServerFault);
            assert_eq!(translated.code, error_codes::SERVICE_UNAVAILABLE);
            assert_eq!(translated.status, StatusCode::SERVICE_UNAVAILABLE);
        }
    }

    #[test]
    fn test_constraint_codes() {
        let cases = [
            ("23503", error_codes::INVALID_REFERENCE),
            ("23502", error_codes::MISSING_VALUE),
            ("23514", error_codes::CONSTRAINT_VIOLATION),
            ("22001", error_codes::VALUE_TOO_LONG),
        ];

        for (sqlstate, expected) in cases {
            let translated = classify(database_error(Some(sqlstate), ErrorKind::Other)).unwrap();
            assert_eq!(translated.code, expected, "sqlstate {sqlstate}");
            assert!(translated.is_client_fault());
        }
    }

    #[test]
    fn test_serialization_failure_is_retryable() {
        for sqlstate in ["40001", "40P01"] {
            let translated = classify(database_error(Some(sqlstate), ErrorKind::Other)).unwrap();
            assert_eq!(translated.code, error_codes::RETRYABLE_CONFLICT, "sqlstate {sqlstate}");
            assert_eq!(translated.status_category, StatusCategory::ServerFault);
            assert_eq!(translated.status, StatusCode::SERVICE_UNAVAILABLE);
        }
    }

    #[test]
    fn test_kind_used_without_code() {
        let translated = classify(database_error(None, ErrorKind::UniqueViolation)).unwrap();
        assert_eq!(translated.code, error_codes::ALREADY_EXISTS);
    }

    #[test]
    fn test_unknown_code_falls_through() {
        assert!(classify(database_error(Some("XX000"), ErrorKind::Other)).is_none());
        assert!(classify(sqlx::Error::ColumnNotFound("id".to_string())).is_none());
    }

    #[test]
    fn test_finds_sqlx_error_in_anyhow_chain() {
        let err = anyhow::Error::new(unique_violation("users_username_key"))
            .context("creating login audit row");
        let translated = PersistenceClassifier
            .classify(&Fault::App(AppError::Internal(err)))
            .unwrap();

        assert_eq!(translated.code, error_codes::ALREADY_EXISTS);
    }

    #[test]
    fn test_ignores_non_persistence_faults() {
        assert!(PersistenceClassifier.classify(&Fault::Panic("boom".to_string())).is_none());
        assert!(
            PersistenceClassifier
                .classify(&Fault::App(AppError::InvalidCredentials))
                .is_none()
        );
    }
}
