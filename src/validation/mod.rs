//! Login intake validation
//!
//! Turns an untrusted [`LoginSubmission`] into a [`LoginRequest`] or reports every
//! rule it breaks. Per-field rules run first; the email/username selector rule runs
//! afterwards against the whole submission.
//!
//! When both `email` and `username` are supplied the submission is rejected with
//! `IdentityConflict` and neither selector's own rules are evaluated.

pub mod rules;
pub mod violation;

use std::sync::LazyLock;

use crate::config::IntakeConfig;
use crate::models::{LoginIdentity, LoginRequest, LoginSubmission};

pub use rules::{Check, FieldRules, LoginRules};
pub use violation::{Field, PasswordRequirement, Violation, ViolationKind, ViolationList};

static DEFAULT_VALIDATOR: LazyLock<LoginValidator> =
    LazyLock::new(|| LoginValidator::new(&IntakePolicy::default()));

/// Tunable inputs to the login rules
#[derive(Debug, Clone)]
pub struct IntakePolicy {
    /// Lowercased email domains that may not log in
    pub blocked_email_domains: Vec<String>,
}

impl Default for IntakePolicy {
    fn default() -> Self {
        Self::from(&IntakeConfig::default())
    }
}

impl From<&IntakeConfig> for IntakePolicy {
    fn from(config: &IntakeConfig) -> Self {
        Self {
            blocked_email_domains: config
                .blocked_email_domains
                .iter()
                .map(|d| d.to_ascii_lowercase())
                .collect(),
        }
    }
}

/// Validate a submission against the default policy
pub fn validate_login(submission: &LoginSubmission) -> Result<LoginRequest, ViolationList> {
    DEFAULT_VALIDATOR.validate(submission)
}

/// Login validator bound to a rule table
pub struct LoginValidator {
    rules: LoginRules,
}

impl LoginValidator {
    pub fn new(policy: &IntakePolicy) -> Self {
        Self {
            rules: LoginRules::new(policy),
        }
    }

    /// Run every rule and either build the normalized request or return all violations
    pub fn validate(&self, submission: &LoginSubmission) -> Result<LoginRequest, ViolationList> {
        let mut violations = ViolationList::new();

        let password = self
            .rules
            .password
            .apply(submission.password.as_deref(), &mut violations);
        let device_name = self
            .rules
            .device_name
            .apply(submission.device_name.as_deref(), &mut violations);
        let ip_address = self
            .rules
            .ip_address
            .apply(submission.ip_address.as_deref(), &mut violations);
        let user_agent = self
            .rules
            .user_agent
            .apply(submission.user_agent.as_deref(), &mut violations);

        let identity = self.resolve_identity(submission, &mut violations);

        match (password, identity, device_name, ip_address, user_agent) {
            (Some(password), Some(identity), Some(device_name), Some(ip_address), Some(user_agent))
                if violations.is_empty() =>
            {
                Ok(LoginRequest {
                    password,
                    identity,
                    device_name,
                    ip_address,
                    user_agent,
                })
            }
            _ => Err(violations),
        }
    }

    fn resolve_identity(
        &self,
        submission: &LoginSubmission,
        violations: &mut ViolationList,
    ) -> Option<LoginIdentity> {
        let email = present(submission.email.as_deref());
        let username = present(submission.username.as_deref());

        match (email, username) {
            (None, None) => {
                violations.push(Violation::new(
                    Field::Identity,
                    ViolationKind::IdentityMissing,
                    "Either email or username is required",
                ));
                None
            }
            (Some(_), Some(_)) => {
                violations.push(Violation::new(
                    Field::Identity,
                    ViolationKind::IdentityConflict,
                    "Provide either email or username, not both",
                ));
                None
            }
            (Some(email), None) => self
                .rules
                .email
                .apply(Some(email), violations)
                .map(LoginIdentity::Email),
            (None, Some(username)) => self
                .rules
                .username
                .apply(Some(username), violations)
                .map(LoginIdentity::Username),
        }
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
