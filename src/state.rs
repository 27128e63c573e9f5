//! Application state management
//!
//! This module contains the shared application state that is passed
//! to all request handlers via Axum's State extractor.

use std::sync::Arc;

use crate::{
    config::Config,
    services::Authenticator,
    translator::ExceptionTranslator,
    validation::{IntakePolicy, LoginValidator},
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

/// Inner state (wrapped in Arc for cheap cloning)
struct AppStateInner {
    /// External credential verification and session issuance
    authenticator: Arc<dyn Authenticator>,

    /// Login intake rules
    validator: LoginValidator,

    /// Error classification chain, also used by the panic catcher
    translator: Arc<ExceptionTranslator>,
}

impl AppState {
    /// Create a new application state
    pub fn new(
        authenticator: Arc<dyn Authenticator>,
        translator: Arc<ExceptionTranslator>,
        config: &Config,
    ) -> Self {
        let validator = LoginValidator::new(&IntakePolicy::from(&config.intake));

        Self {
            inner: Arc::new(AppStateInner {
                authenticator,
                validator,
                translator,
            }),
        }
    }

    /// Get a reference to the authenticator
    pub fn authenticator(&self) -> &dyn Authenticator {
        self.inner.authenticator.as_ref()
    }

    /// Get a reference to the login validator
    pub fn validator(&self) -> &LoginValidator {
        &self.inner.validator
    }

    /// Get a shared handle to the exception translator
    pub fn translator(&self) -> Arc<ExceptionTranslator> {
        self.inner.translator.clone()
    }
}
