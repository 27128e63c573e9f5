//! Application-wide constants
//!
//! This module contains all constant values used throughout the application.
//! Constants are grouped by their purpose for better organization.

// =============================================================================
// SERVER DEFAULTS
// =============================================================================

/// Default server host address
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_SERVER_PORT: u16 = 8080;

// =============================================================================
// DATABASE DEFAULTS
// =============================================================================

/// Default maximum database connections in the pool
pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 20;

/// Seconds to wait for a pooled connection before giving up
pub const DATABASE_ACQUIRE_TIMEOUT_SECS: u64 = 5;

/// Default database-side login procedure
pub const DEFAULT_AUTH_PROCEDURE: &str = "auth.authenticate_login";

// =============================================================================
// LOGIN INTAKE RULES
// =============================================================================

/// Minimum password length
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Username minimum length
pub const MIN_USERNAME_LENGTH: usize = 3;

/// Username maximum length
pub const MAX_USERNAME_LENGTH: usize = 30;

/// Maximum device name length
pub const MAX_DEVICE_NAME_LENGTH: usize = 150;

/// Maximum IP address length (fits the textual IPv6 form)
pub const MAX_IP_ADDRESS_LENGTH: usize = 39;

/// Maximum user agent length
pub const MAX_USER_AGENT_LENGTH: usize = 255;

/// Email domains rejected at login unless overridden
pub const DEFAULT_BLOCKED_EMAIL_DOMAINS: &[&str] = &["example.com"];

// =============================================================================
// DIAGNOSTICS
// =============================================================================

/// Default capacity of the diagnostic record channel
pub const DEFAULT_DIAGNOSTICS_CHANNEL_CAPACITY: usize = 1024;

// =============================================================================
// ERROR CODES
// =============================================================================

/// Stable error codes surfaced to clients
pub mod error_codes {
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const MALFORMED_BODY: &str = "MALFORMED_BODY";
    pub const INVALID_CREDENTIALS: &str = "INVALID_CREDENTIALS";
    pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
    pub const FORBIDDEN: &str = "FORBIDDEN";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const CONFLICT: &str = "CONFLICT";
    pub const ALREADY_EXISTS: &str = "ALREADY_EXISTS";
    pub const INVALID_REFERENCE: &str = "INVALID_REFERENCE";
    pub const MISSING_VALUE: &str = "MISSING_VALUE";
    pub const CONSTRAINT_VIOLATION: &str = "CONSTRAINT_VIOLATION";
    pub const VALUE_TOO_LONG: &str = "VALUE_TOO_LONG";
    pub const METHOD_NOT_ALLOWED: &str = "METHOD_NOT_ALLOWED";
    pub const PAYLOAD_TOO_LARGE: &str = "PAYLOAD_TOO_LARGE";
    pub const UNSUPPORTED_MEDIA_TYPE: &str = "UNSUPPORTED_MEDIA_TYPE";
    pub const BAD_REQUEST: &str = "BAD_REQUEST";
    pub const RETRYABLE_CONFLICT: &str = "RETRYABLE_CONFLICT";
    pub const SERVICE_UNAVAILABLE: &str = "SERVICE_UNAVAILABLE";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
}

// =============================================================================
// API VERSIONING
// =============================================================================

/// API base path
pub const API_BASE_PATH: &str = "/api/v1";
