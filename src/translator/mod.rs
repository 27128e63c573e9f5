//! Exception translation
//!
//! Every failure that leaves the request pipeline is run through an ordered chain
//! of classifiers and rendered as a [`TranslatedError`]. The chain always starts
//! with the persistence classifier so a known database failure is never flattened
//! into the opaque server fault. Translation is total: if no classifier claims a
//! fault, or a classifier panics, the opaque server fault is used.

pub mod diagnostics;
pub mod fault;
pub mod generic;
pub mod persistence;

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::constants::error_codes;

pub use diagnostics::{ChannelSink, DiagnosticDrain, DiagnosticRecord, DiagnosticSink};
pub use fault::{Fault, PendingFault};
pub use generic::GenericClassifier;
pub use persistence::PersistenceClassifier;

/// Which side of the connection can fix the failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusCategory {
    ClientFault,
    ServerFault,
}

/// Client-safe error shape
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranslatedError {
    #[serde(rename = "category")]
    pub status_category: StatusCategory,
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    #[serde(skip)]
    pub status: StatusCode,
}

impl TranslatedError {
    /// A client fault; non-4xx statuses are coerced to 400
    pub fn client(status: StatusCode, code: impl Into<String>, message: impl Into<String>) -> Self {
        let status = if status.is_client_error() {
            status
        } else {
            StatusCode::BAD_REQUEST
        };

        Self {
            status_category: StatusCategory::ClientFault,
            code: code.into(),
            message: message.into(),
            details: None,
            status,
        }
    }

    /// A server fault; non-5xx statuses are coerced to 500
    pub fn server(status: StatusCode, code: impl Into<String>, message: impl Into<String>) -> Self {
        let status = if status.is_server_error() {
            status
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        Self {
            status_category: StatusCategory::ServerFault,
            code: code.into(),
            message: message.into(),
            details: None,
            status,
        }
    }

    /// The single shape used for anything unrecognised
    pub fn opaque() -> Self {
        Self::server(
            StatusCode::INTERNAL_SERVER_ERROR,
            error_codes::INTERNAL_ERROR,
            "An internal error occurred",
        )
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn is_client_fault(&self) -> bool {
        self.status_category == StatusCategory::ClientFault
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse<'a> {
    pub error: &'a TranslatedError,
}

/// Marks a response whose body is already a translated error
#[derive(Debug, Clone)]
pub struct Translated {
    pub category: StatusCategory,
    pub code: String,
}

impl IntoResponse for TranslatedError {
    fn into_response(self) -> Response {
        let mut response = (self.status, Json(ErrorResponse { error: &self })).into_response();
        response.extensions_mut().insert(Translated {
            category: self.status_category,
            code: self.code,
        });
        response
    }
}

/// One step of the translation chain
pub trait Classifier: Send + Sync {
    /// Short name recorded in diagnostics
    fn name(&self) -> &'static str;

    /// Translate the fault, or return `None` to let the next classifier try
    fn classify(&self, fault: &Fault) -> Option<TranslatedError>;
}

/// Ordered classifier chain plus the diagnostic sink it reports to
pub struct ExceptionTranslator {
    classifiers: Vec<Box<dyn Classifier>>,
    sink: Arc<dyn DiagnosticSink>,
}

impl ExceptionTranslator {
    /// The standard chain: persistence first, then generic
    pub fn new(sink: Arc<dyn DiagnosticSink>) -> Self {
        Self::with_classifiers(
            vec![Box::new(PersistenceClassifier), Box::new(GenericClassifier)],
            sink,
        )
    }

    pub fn with_classifiers(classifiers: Vec<Box<dyn Classifier>>, sink: Arc<dyn DiagnosticSink>) -> Self {
        Self { classifiers, sink }
    }

    pub fn classifier_names(&self) -> Vec<&'static str> {
        self.classifiers.iter().map(|c| c.name()).collect()
    }

    /// Produce exactly one client-safe error for `fault`
    pub fn translate(&self, fault: &Fault) -> TranslatedError {
        let incident_id = Uuid::new_v4();
        let (classifier, mut translated) = self.classify(fault);

        // Server faults expose only the incident id for correlation with logs
        if translated.status_category == StatusCategory::ServerFault {
            translated.details = Some(serde_json::json!({ "incidentId": incident_id }));
        }

        let record = DiagnosticRecord {
            incident_id,
            original_error_summary: fault.summary(),
            classification: translated.status_category,
            code: translated.code.clone(),
            classifier,
            timestamp: Utc::now(),
        };

        if catch_unwind(AssertUnwindSafe(|| self.sink.emit(record))).is_err() {
            tracing::error!(incident_id = %incident_id, "Diagnostic sink panicked");
        }

        translated
    }

    fn classify(&self, fault: &Fault) -> (&'static str, TranslatedError) {
        for classifier in &self.classifiers {
            match catch_unwind(AssertUnwindSafe(|| classifier.classify(fault))) {
                Ok(Some(translated)) => return (classifier.name(), translated),
                Ok(None) => continue,
                Err(_) => {
                    tracing::error!(classifier = classifier.name(), "Classifier panicked");
                    return ("fallback", TranslatedError::opaque());
                }
            }
        }
        ("fallback", TranslatedError::opaque())
    }
}
