//! Field-level validation failures

use std::fmt;

use serde::Serialize;

/// Login fields a violation can point at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Password,
    Email,
    Username,
    DeviceName,
    IpAddress,
    UserAgent,
    /// The email/username selector pair as a whole
    Identity,
}

impl Field {
    /// Wire name of the field
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Password => "password",
            Self::Email => "email",
            Self::Username => "username",
            Self::DeviceName => "deviceName",
            Self::IpAddress => "ipAddress",
            Self::UserAgent => "userAgent",
            Self::Identity => "identity",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Machine-readable rule identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationKind {
    FieldRequired,
    FieldTooLong,
    PasswordTooWeak,
    IdentityMissing,
    IdentityConflict,
    EmailInvalid,
    EmailDomainBlocked,
    UsernameLength,
}

/// Password strength sub-conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PasswordRequirement {
    MinLength,
    Lowercase,
    Uppercase,
    Digit,
}

/// A single field-level validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub field: Field,
    pub rule: ViolationKind,
    pub message: String,
    /// Set only for `PasswordTooWeak`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requirement: Option<PasswordRequirement>,
}

impl Violation {
    pub fn new(field: Field, rule: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            field,
            rule,
            message: message.into(),
            requirement: None,
        }
    }

    pub fn with_requirement(mut self, requirement: PasswordRequirement) -> Self {
        self.requirement = Some(requirement);
        self
    }
}

/// Ordered collection of violations for one submission
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ViolationList(Vec<Violation>);

impl ViolationList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, violation: Violation) {
        self.0.push(violation);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.0.iter()
    }

    /// Whether any violation of `rule` was recorded
    pub fn contains(&self, rule: ViolationKind) -> bool {
        self.0.iter().any(|v| v.rule == rule)
    }

    /// Unmet password sub-conditions, in order
    pub fn password_requirements(&self) -> Vec<PasswordRequirement> {
        self.0.iter().filter_map(|v| v.requirement).collect()
    }
}

impl fmt::Display for ViolationList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, violation) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", violation.field, violation.message)?;
        }
        Ok(())
    }
}

impl IntoIterator for ViolationList {
    type Item = Violation;
    type IntoIter = std::vec::IntoIter<Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ViolationList {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
