//! Anything that can escape the request pipeline

use std::any::Any;
use std::error::Error as StdError;
use std::sync::{Arc, Mutex};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::error::AppError;

/// An untranslated failure
#[derive(Debug)]
pub enum Fault {
    /// An error returned by a handler, extractor or collaborator
    App(AppError),
    /// A panic, with its payload rendered as text when possible
    Panic(String),
    /// An error status produced by the framework with no error attached
    Status(StatusCode),
}

impl Fault {
    /// Build a fault from a caught panic payload
    pub fn from_panic(payload: Box<dyn Any + Send + 'static>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&'static str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        Fault::Panic(message)
    }

    /// Full internal description, including the cause chain
    pub fn summary(&self) -> String {
        match self {
            Fault::App(err) => error_chain(err),
            Fault::Panic(message) => format!("panic: {message}"),
            Fault::Status(status) => format!("bare {status} response"),
        }
    }
}

impl From<AppError> for Fault {
    fn from(err: AppError) -> Self {
        Fault::App(err)
    }
}

/// The response is a placeholder until the translation middleware picks the fault up.
impl IntoResponse for Fault {
    fn into_response(self) -> Response {
        let mut response = StatusCode::INTERNAL_SERVER_ERROR.into_response();
        response
            .extensions_mut()
            .insert(PendingFault(Arc::new(Mutex::new(Some(self)))));
        response
    }
}

/// Response extension carrying a fault to the translation middleware
#[derive(Clone)]
pub struct PendingFault(Arc<Mutex<Option<Fault>>>);

impl PendingFault {
    pub fn take(&self) -> Option<Fault> {
        match self.0.lock() {
            Ok(mut slot) => slot.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        }
    }
}

fn error_chain(err: &dyn StdError) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        // thiserror's transparent-ish wrappers repeat the inner message
        if !out.ends_with(&cause_text) {
            out.push_str(": ");
            out.push_str(&cause_text);
        }
        source = cause.source();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_payloads() {
        let fault = Fault::from_panic(Box::new("boom"));
        assert!(matches!(fault, Fault::Panic(ref m) if m == "boom"));

        let fault = Fault::from_panic(Box::new(String::from("kaboom")));
        assert!(matches!(fault, Fault::Panic(ref m) if m == "kaboom"));

        let fault = Fault::from_panic(Box::new(42_u32));
        assert!(matches!(fault, Fault::Panic(ref m) if m == "non-string panic payload"));
    }

    #[test]
    fn test_summary_includes_cause_chain() {
        let inner = anyhow::anyhow!("disk on fire").context("writing session");
        let fault = Fault::App(AppError::Internal(inner));

        let summary = fault.summary();
        assert!(summary.contains("writing session"));
        assert!(summary.contains("disk on fire"));
    }

    #[test]
    fn test_pending_fault_taken_once() {
        let mut response = Fault::Status(StatusCode::BAD_GATEWAY).into_response();
        let pending = response.extensions_mut().remove::<PendingFault>().unwrap();

        assert!(pending.take().is_some());
        assert!(pending.take().is_none());
    }
}
