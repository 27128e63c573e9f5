//! Login payload models

use std::fmt;

use serde::{Deserialize, Serialize};

/// Raw login payload as submitted by the client
///
/// Every field is optional on the wire; nothing here has been checked yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoginSubmission {
    pub password: Option<String>,
    pub email: Option<String>,
    pub username: Option<String>,
    pub device_name: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// Validated and normalized login payload
///
/// Only `validation::validate_login` constructs this type. Exactly one of
/// `email` and `username` is set, and the device metadata is uppercased.
#[derive(Clone, PartialEq, Eq)]
pub struct LoginRequest {
    pub(crate) password: String,
    pub(crate) identity: LoginIdentity,
    pub(crate) device_name: String,
    pub(crate) ip_address: String,
    pub(crate) user_agent: String,
}

/// The account selector a login was made with
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginIdentity {
    Email(String),
    Username(String),
}

impl LoginRequest {
    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn identity(&self) -> &LoginIdentity {
        &self.identity
    }

    pub fn email(&self) -> Option<&str> {
        match &self.identity {
            LoginIdentity::Email(email) => Some(email),
            LoginIdentity::Username(_) => None,
        }
    }

    pub fn username(&self) -> Option<&str> {
        match &self.identity {
            LoginIdentity::Username(username) => Some(username),
            LoginIdentity::Email(_) => None,
        }
    }

    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    pub fn ip_address(&self) -> &str {
        &self.ip_address
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

// Keeps the password out of logs
impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("password", &"[REDACTED]")
            .field("identity", &self.identity)
            .field("device_name", &self.device_name)
            .field("ip_address", &self.ip_address)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl From<LoginRequest> for LoginSubmission {
    fn from(request: LoginRequest) -> Self {
        let (email, username) = match request.identity {
            LoginIdentity::Email(email) => (Some(email), None),
            LoginIdentity::Username(username) => (None, Some(username)),
        };

        Self {
            password: Some(request.password),
            email,
            username,
            device_name: Some(request.device_name),
            ip_address: Some(request.ip_address),
            user_agent: Some(request.user_agent),
        }
    }
}
