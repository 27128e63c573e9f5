//! Login rule table
//!
//! Each field owns an ordered list of checks. A check pairs a predicate with the
//! violation it produces; every check on a field runs, so a single pass reports
//! every problem with that field. Normalization runs only on values that passed,
//! and the normalized value must pass the same checks.

use std::sync::Arc;

use validator::ValidateEmail;

use crate::constants::{
    MAX_DEVICE_NAME_LENGTH, MAX_IP_ADDRESS_LENGTH, MAX_USERNAME_LENGTH, MAX_USER_AGENT_LENGTH,
    MIN_PASSWORD_LENGTH, MIN_USERNAME_LENGTH,
};

use super::violation::{Field, PasswordRequirement, Violation, ViolationKind, ViolationList};
use super::IntakePolicy;

type Predicate = Box<dyn Fn(&str) -> bool + Send + Sync>;

/// A predicate and the violation reported when it does not hold
pub struct Check {
    kind: ViolationKind,
    requirement: Option<PasswordRequirement>,
    message: String,
    predicate: Predicate,
}

impl Check {
    pub fn new<P>(kind: ViolationKind, message: impl Into<String>, predicate: P) -> Self
    where
        P: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Self {
            kind,
            requirement: None,
            message: message.into(),
            predicate: Box::new(predicate),
        }
    }

    pub fn requirement(mut self, requirement: PasswordRequirement) -> Self {
        self.requirement = Some(requirement);
        self
    }

    pub fn holds(&self, value: &str) -> bool {
        (self.predicate)(value)
    }

    fn violation(&self, field: Field) -> Violation {
        let violation = Violation::new(field, self.kind, self.message.clone());
        match self.requirement {
            Some(requirement) => violation.with_requirement(requirement),
            None => violation,
        }
    }
}

/// Ordered checks for one field
pub struct FieldRules {
    field: Field,
    required: bool,
    checks: Vec<Check>,
    normalizer: Option<fn(&str) -> String>,
}

impl FieldRules {
    pub fn new(field: Field) -> Self {
        Self {
            field,
            required: false,
            checks: Vec::new(),
            normalizer: None,
        }
    }

    /// Report `FieldRequired` when the value is absent or empty
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn check(mut self, check: Check) -> Self {
        self.checks.push(check);
        self
    }

    pub fn normalize_with(mut self, normalizer: fn(&str) -> String) -> Self {
        self.normalizer = Some(normalizer);
        self
    }

    /// Run every check against `value`, recording failures in `violations`.
    ///
    /// Returns the normalized value when the field is present and clean.
    pub fn apply(&self, value: Option<&str>, violations: &mut ViolationList) -> Option<String> {
        let Some(value) = value.filter(|v| !v.is_empty()) else {
            if self.required {
                violations.push(Violation::new(
                    self.field,
                    ViolationKind::FieldRequired,
                    format!("{} is required", self.field),
                ));
            }
            return None;
        };

        let before = violations.len();
        for check in &self.checks {
            if !check.holds(value) {
                violations.push(check.violation(self.field));
            }
        }

        if violations.len() > before {
            return None;
        }

        let Some(normalize) = self.normalizer else {
            return Some(value.to_string());
        };

        // Case mapping can grow a value (`ß` -> `SS`), so the stored form is checked too
        let normalized = normalize(value);
        for check in &self.checks {
            if !check.holds(&normalized) {
                violations.push(check.violation(self.field));
            }
        }

        (violations.len() == before).then_some(normalized)
    }
}

/// Rule table for a login submission
pub struct LoginRules {
    pub password: FieldRules,
    pub email: FieldRules,
    pub username: FieldRules,
    pub device_name: FieldRules,
    pub ip_address: FieldRules,
    pub user_agent: FieldRules,
}

impl LoginRules {
    pub fn new(policy: &IntakePolicy) -> Self {
        Self {
            password: password_rules(),
            email: email_rules(policy),
            username: username_rules(),
            device_name: device_rules(Field::DeviceName, MAX_DEVICE_NAME_LENGTH),
            ip_address: device_rules(Field::IpAddress, MAX_IP_ADDRESS_LENGTH),
            user_agent: device_rules(Field::UserAgent, MAX_USER_AGENT_LENGTH),
        }
    }
}

fn password_rules() -> FieldRules {
    FieldRules::new(Field::Password)
        .required()
        .check(
            Check::new(
                ViolationKind::PasswordTooWeak,
                format!("Password must be at least {MIN_PASSWORD_LENGTH} characters"),
                min_chars(MIN_PASSWORD_LENGTH),
            )
            .requirement(PasswordRequirement::MinLength),
        )
        .check(
            Check::new(
                ViolationKind::PasswordTooWeak,
                "Password must contain at least one lowercase letter",
                |v| v.chars().any(|c| c.is_ascii_lowercase()),
            )
            .requirement(PasswordRequirement::Lowercase),
        )
        .check(
            Check::new(
                ViolationKind::PasswordTooWeak,
                "Password must contain at least one uppercase letter",
                |v| v.chars().any(|c| c.is_ascii_uppercase()),
            )
            .requirement(PasswordRequirement::Uppercase),
        )
        .check(
            Check::new(
                ViolationKind::PasswordTooWeak,
                "Password must contain at least one number",
                |v| v.chars().any(|c| c.is_ascii_digit()),
            )
            .requirement(PasswordRequirement::Digit),
        )
}

fn email_rules(policy: &IntakePolicy) -> FieldRules {
    let blocked: Arc<[String]> = policy.blocked_email_domains.iter().cloned().collect();

    FieldRules::new(Field::Email)
        .check(Check::new(
            ViolationKind::EmailInvalid,
            "Invalid email address",
            |v| v.validate_email(),
        ))
        .check(Check::new(
            ViolationKind::EmailDomainBlocked,
            "Email domain is not allowed",
            move |v| !domain_is_blocked(v, &blocked),
        ))
}

fn username_rules() -> FieldRules {
    FieldRules::new(Field::Username).check(Check::new(
        ViolationKind::UsernameLength,
        format!("Username must be {MIN_USERNAME_LENGTH}-{MAX_USERNAME_LENGTH} characters"),
        |v| (MIN_USERNAME_LENGTH..=MAX_USERNAME_LENGTH).contains(&v.chars().count()),
    ))
}

fn device_rules(field: Field, max: usize) -> FieldRules {
    FieldRules::new(field)
        .required()
        .check(Check::new(
            ViolationKind::FieldTooLong,
            format!("{field} must be at most {max} characters"),
            max_chars(max),
        ))
        .normalize_with(uppercase)
}

fn min_chars(min: usize) -> impl Fn(&str) -> bool + Send + Sync + 'static {
    move |v| v.chars().count() >= min
}

fn max_chars(max: usize) -> impl Fn(&str) -> bool + Send + Sync + 'static {
    move |v| v.chars().count() <= max
}

/// Exact, case-insensitive match on the part after the last `@`
fn domain_is_blocked(email: &str, blocked: &[String]) -> bool {
    match email.rsplit_once('@') {
        Some((_, domain)) => {
            let domain = domain.to_ascii_lowercase();
            blocked.iter().any(|b| *b == domain)
        }
        None => false,
    }
}

pub fn uppercase(value: &str) -> String {
    value.to_uppercase()
}
