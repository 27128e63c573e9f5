//! Catch-all classification
//!
//! Expected application failures keep their own message as client faults.
//! Everything else becomes the opaque server fault.

use axum::http::StatusCode;

use crate::constants::error_codes;
use crate::error::AppError;

use super::{Classifier, Fault, TranslatedError};

/// Last classifier in the chain; claims every fault
pub struct GenericClassifier;

impl Classifier for GenericClassifier {
    fn name(&self) -> &'static str {
        "generic"
    }

    fn classify(&self, fault: &Fault) -> Option<TranslatedError> {
        Some(match fault {
            Fault::App(err) => classify_app(err),
            Fault::Status(status) => classify_status(*status),
            Fault::Panic(_) => TranslatedError::opaque(),
        })
    }
}

fn classify_app(err: &AppError) -> TranslatedError {
    match err {
        AppError::Validation(violations) => TranslatedError::client(
            StatusCode::UNPROCESSABLE_ENTITY,
            error_codes::VALIDATION_ERROR,
            "Request validation failed",
        )
        .with_details(serde_json::json!({ "violations": violations })),
        AppError::MalformedBody { status, message } => {
            let code = match *status {
                StatusCode::UNSUPPORTED_MEDIA_TYPE => error_codes::UNSUPPORTED_MEDIA_TYPE,
                StatusCode::PAYLOAD_TOO_LARGE => error_codes::PAYLOAD_TOO_LARGE,
                _ => error_codes::MALFORMED_BODY,
            };
            TranslatedError::client(*status, code, message.clone())
        }
        AppError::InvalidCredentials => TranslatedError::client(
            StatusCode::UNAUTHORIZED,
            error_codes::INVALID_CREDENTIALS,
            err.to_string(),
        ),
        AppError::Unauthorized => TranslatedError::client(
            StatusCode::UNAUTHORIZED,
            error_codes::UNAUTHORIZED,
            err.to_string(),
        ),
        AppError::Forbidden(_) => {
            TranslatedError::client(StatusCode::FORBIDDEN, error_codes::FORBIDDEN, err.to_string())
        }
        AppError::NotFound(_) => {
            TranslatedError::client(StatusCode::NOT_FOUND, error_codes::NOT_FOUND, err.to_string())
        }
        AppError::Conflict(_) => {
            TranslatedError::client(StatusCode::CONFLICT, error_codes::CONFLICT, err.to_string())
        }
        AppError::Rejected {
            status,
            code,
            message,
        } => TranslatedError::client(*status, *code, message.clone()),
        // Persistence errors the persistence classifier did not recognise
        AppError::Database(_) | AppError::Internal(_) => TranslatedError::opaque(),
    }
}

fn classify_status(status: StatusCode) -> TranslatedError {
    if !status.is_client_error() {
        return TranslatedError::opaque();
    }

    let code = match status {
        StatusCode::NOT_FOUND => error_codes::NOT_FOUND,
        StatusCode::METHOD_NOT_ALLOWED => error_codes::METHOD_NOT_ALLOWED,
        StatusCode::PAYLOAD_TOO_LARGE => error_codes::PAYLOAD_TOO_LARGE,
        StatusCode::UNSUPPORTED_MEDIA_TYPE => error_codes::UNSUPPORTED_MEDIA_TYPE,
        StatusCode::UNAUTHORIZED => error_codes::UNAUTHORIZED,
        StatusCode::FORBIDDEN => error_codes::FORBIDDEN,
        StatusCode::CONFLICT => error_codes::CONFLICT,
        _ => error_codes::BAD_REQUEST,
    };

    TranslatedError::client(
        status,
        code,
        status.canonical_reason().unwrap_or("Bad request"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::unique_violation;
    use crate::translator::StatusCategory;

    fn classify(err: AppError) -> TranslatedError {
        GenericClassifier.classify(&Fault::App(err)).unwrap()
    }

    #[test]
    fn test_expected_failures_keep_their_message() {
        let translated = classify(AppError::NotFound("user".to_string()));
        assert_eq!(translated.status_category, StatusCategory::ClientFault);
        assert_eq!(translated.message, "Not found: user");

        let translated = classify(AppError::InvalidCredentials);
        assert_eq!(translated.status, StatusCode::UNAUTHORIZED);
        assert_eq!(translated.code, error_codes::INVALID_CREDENTIALS);
    }

    #[test]
    fn test_malformed_body_keeps_extractor_status() {
        let cases = [
            (StatusCode::BAD_REQUEST, error_codes::MALFORMED_BODY),
            (StatusCode::UNPROCESSABLE_ENTITY, error_codes::MALFORMED_BODY),
            (StatusCode::UNSUPPORTED_MEDIA_TYPE, error_codes::UNSUPPORTED_MEDIA_TYPE),
            (StatusCode::PAYLOAD_TOO_LARGE, error_codes::PAYLOAD_TOO_LARGE),
        ];

        for (status, code) in cases {
            let translated = classify(AppError::MalformedBody {
                status,
                message: "rejected".to_string(),
            });
            assert_eq!(translated.status, status);
            assert_eq!(translated.code, code);
            assert_eq!(translated.message, "rejected");
        }
    }

    #[test]
    fn test_explicit_rejection() {
        let translated = classify(AppError::rejected(
            StatusCode::FORBIDDEN,
            "ACCOUNT_LOCKED",
            "Account is locked",
        ));

        assert_eq!(translated.status, StatusCode::FORBIDDEN);
        assert_eq!(translated.code, "ACCOUNT_LOCKED");
        assert_eq!(translated.message, "Account is locked");
    }

    #[test]
    fn test_rejection_cannot_claim_server_status() {
        let translated = classify(AppError::rejected(
            StatusCode::INTERNAL_SERVER_ERROR,
            "ODD",
            "odd",
        ));
        assert_eq!(translated.status, StatusCode::BAD_REQUEST);
        assert!(translated.is_client_fault());
    }

    #[test]
    fn test_unrecognised_errors_are_opaque() {
        for err in [
            AppError::Internal(anyhow::anyhow!("stack trace here")),
            AppError::Database(sqlx::Error::ColumnNotFound("password_hash".to_string())),
        ] {
            let translated = classify(err);
            assert_eq!(translated.status_category, StatusCategory::ServerFault);
            assert_eq!(translated.message, "An internal error occurred");
        }
    }

    #[test]
    fn test_known_persistence_error_degrades_only_without_persistence_classifier() {
        // On its own the generic classifier cannot see the duplicate
        let translated = classify(AppError::Database(unique_violation("users_email_key")));
        assert_eq!(translated.status_category, StatusCategory::ServerFault);
    }

    #[test]
    fn test_bare_statuses() {
        let translated = GenericClassifier
            .classify(&Fault::Status(StatusCode::METHOD_NOT_ALLOWED))
            .unwrap();
        assert_eq!(translated.code, error_codes::METHOD_NOT_ALLOWED);
        assert_eq!(translated.message, "Method Not Allowed");

        let translated = GenericClassifier
            .classify(&Fault::Status(StatusCode::BAD_GATEWAY))
            .unwrap();
        assert_eq!(translated.code, error_codes::INTERNAL_ERROR);
    }

    #[test]
    fn test_panics_are_opaque() {
        let translated = GenericClassifier
            .classify(&Fault::Panic("index out of bounds".to_string()))
            .unwrap();
        assert_eq!(translated, TranslatedError::opaque());
    }
}
