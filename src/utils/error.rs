//! Error Handling Utilities
//!
//! Error types for the authentication service and their HTTP mappings.

use std::collections::BTreeMap;
use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Aggregated field-level validation violations
///
/// Maps field names to human-readable messages. A single failed request may
/// report several violations at once, so the whole map is surfaced to the
/// caller as the error body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Violations(pub BTreeMap<String, String>);

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a violations map holding a single entry
    pub fn single(field: &str, message: &str) -> Self {
        let mut violations = Self::new();
        violations.add(field, message);
        violations
    }

    pub fn add(&mut self, field: &str, message: &str) {
        self.0.insert(field.to_string(), message.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .0
            .iter()
            .map(|(field, message)| format!("{}: {}", field, message))
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{}", joined)
    }
}

/// Main error type for authentication operations
#[derive(Error, Debug)]
pub enum AuthError {
    /// Aggregated field violations: malformed input, duplicate email,
    /// confirmation mismatches
    #[error("validation failed: {0}")]
    ValidationFailed(Violations),

    /// Bad credentials or disabled account. Deliberately a single generic
    /// message so the caller cannot tell which factor failed.
    #[error(
        "Unable to authenticate with provided email and password. \
         Please check your inputs or if you have confirmed your account"
    )]
    AuthenticationFailed,

    /// Malformed, missing, expired, revoked or signature-invalid tokens
    #[error("invalid token: {0}")]
    Token(String),

    /// Database-related errors
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Password hashing errors
    #[error("password hashing error: {0}")]
    Hashing(#[from] bcrypt::BcryptError),

    /// Email delivery errors outside the registration violation path
    #[error("email delivery error: {0}")]
    Email(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),
}

/// Result type alias for operations that can return AuthError
pub type AuthResult<T> = Result<T, AuthError>;

/// Error body shape: a mapping from field name to message
#[derive(Serialize, Debug)]
struct ErrorBody(BTreeMap<String, String>);

impl ErrorBody {
    fn single(field: &str, message: String) -> Self {
        let mut map = BTreeMap::new();
        map.insert(field.to_string(), message);
        Self(map)
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AuthError::ValidationFailed(violations) => {
                (StatusCode::BAD_REQUEST, ErrorBody(violations.0))
            }
            AuthError::AuthenticationFailed => {
                let message = AuthError::AuthenticationFailed.to_string();
                (
                    StatusCode::UNAUTHORIZED,
                    ErrorBody::single("authentication", message),
                )
            }
            AuthError::Token(message) => (
                StatusCode::UNAUTHORIZED,
                ErrorBody::single("token", message),
            ),
            AuthError::Database(_)
            | AuthError::Hashing(_)
            | AuthError::Email(_)
            | AuthError::Configuration(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody::single("server", "An internal server error occurred".to_string()),
            ),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_violations_single() {
        let violations = Violations::single("email", "already registered");
        assert_eq!(violations.get("email"), Some("already registered"));
        assert!(!violations.is_empty());
    }

    #[test]
    fn test_violations_accumulate() {
        let mut violations = Violations::new();
        violations.add("email", "invalid format");
        violations.add("password", "too short");

        assert_eq!(violations.0.len(), 2);
        assert_eq!(
            violations.to_string(),
            "email: invalid format, password: too short"
        );
    }

    #[test]
    fn test_violations_serialize_as_field_map() {
        let violations = Violations::single("url", "Invalid confirmation link");
        let json = serde_json::to_value(&violations).unwrap();
        assert_eq!(json["url"], "Invalid confirmation link");
    }

    #[test]
    fn test_authentication_error_is_generic() {
        let message = AuthError::AuthenticationFailed.to_string();
        assert!(!message.contains("password was wrong"));
        assert!(!message.contains("disabled"));
        assert!(message.contains("email and password"));
    }
}
