//! User Model
//!
//! Core user data structures for the authentication subsystem.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role assigned to a user account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "user_role", rename_all = "UPPERCASE")]
pub enum Role {
    User,
    Admin,
}

/// User representation for external API responses
///
/// Never carries the password hash or the confirmation code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user
    pub id: Uuid,

    /// User's email address (unique, normalized)
    pub email: String,

    pub first_name: String,

    pub last_name: String,

    /// Role assigned at registration (always `USER` for self-registration)
    pub role: Role,

    /// Whether the account has been confirmed. Login requires `true`.
    pub enabled: bool,

    /// Timestamp when the account was created
    pub created_at: DateTime<Utc>,
}

/// Internal user row including credential material
///
/// Used for database operations that need the password hash or the
/// confirmation code. Never exposed in API responses.
#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct UserRecord {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub enabled: bool,
    /// Single-use activation code, cleared in effect once the account is
    /// enabled (the enabled guard short-circuits any re-check)
    pub confirmation_code: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<UserRecord> for User {
    /// Strip credential material before a record leaves the service layer
    fn from(record: UserRecord) -> Self {
        User {
            id: record.id,
            email: record.email,
            first_name: record.first_name,
            last_name: record.last_name,
            role: record.role,
            enabled: record.enabled,
            created_at: record.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_record_conversion_drops_credentials() {
        let record = UserRecord {
            id: Uuid::new_v4(),
            email: "reader@example.com".to_string(),
            password_hash: "$2b$12$hash".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            role: Role::User,
            enabled: false,
            confirmation_code: Some("deadbeef".to_string()),
            created_at: Utc::now(),
        };

        let user: User = record.clone().into();

        assert_eq!(user.id, record.id);
        assert_eq!(user.email, "reader@example.com");
        assert_eq!(user.role, Role::User);
        assert!(!user.enabled);
    }

    #[test]
    fn test_role_serializes_uppercase() {
        let json = serde_json::to_string(&Role::User).unwrap();
        assert_eq!(json, "\"USER\"");
    }
}
