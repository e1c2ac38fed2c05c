//! Request Models
//!
//! Payloads for the authentication endpoints with explicit validation rules.
//! Validation is invoked at the service boundary; failures become a
//! field-to-message violation map.

use serde::Deserialize;
use validator::Validate;

use crate::utils::validation::{email_validator, name_validator};

/// Request payload for account registration
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Email address for the new account (must be unique)
    #[validate(custom(function = "email_validator"))]
    pub email: String,

    /// Plaintext password, hashed before it is stored
    #[validate(length(min = 1, max = 128, message = "Password is required"))]
    pub password: String,

    #[validate(custom(function = "name_validator"))]
    pub first_name: String,

    #[validate(custom(function = "name_validator"))]
    pub last_name: String,
}

/// Request payload for credential login
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(custom(function = "email_validator"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Query parameters of the confirmation link
#[derive(Debug, Clone, Deserialize)]
pub struct ConfirmRegisterParams {
    pub email: String,
    pub code: String,
}
