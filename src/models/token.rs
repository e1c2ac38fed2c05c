//! Token Models
//!
//! Stored token records, JWT claim structures and the token pair returned by
//! login and refresh.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of an issued token
///
/// Access tokens are short-lived and authorize API calls; refresh tokens are
/// longer-lived and only good for obtaining a new access token. Both are
/// signed under the same scheme and differ in expiry policy and tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "token_kind", rename_all = "UPPERCASE")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// A persisted token with its revocation state
///
/// Rows are flagged, never deleted: a token that has been superseded or
/// logged out keeps its row with both flags set, preserving the audit trail.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StoredToken {
    /// Unique identifier for the token record
    pub id: Uuid,

    /// Owning user. The user owns its tokens, not the other way around.
    pub user_id: Uuid,

    /// The opaque signed token string as handed to the client
    pub token: String,

    pub kind: TokenKind,

    /// Set when the token is superseded or logged out
    pub expired: bool,

    /// Set when the token is superseded or logged out
    pub revoked: bool,

    pub created_at: DateTime<Utc>,
}

impl StoredToken {
    /// A token is usable only while neither flag is set
    pub fn is_valid(&self) -> bool {
        !self.expired && !self.revoked
    }
}

/// Token pair returned on successful login or refresh
///
/// Serialized with the `accessToken` / `refreshToken` keys the API contract
/// requires.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    /// Short-lived access token for API authentication
    pub access_token: String,

    /// Longer-lived refresh token for obtaining new access tokens
    pub refresh_token: String,
}

impl TokenPair {
    pub fn new(access_token: String, refresh_token: String) -> Self {
        Self {
            access_token,
            refresh_token,
        }
    }
}

/// JWT claims carried by both access and refresh tokens
///
/// The `type` tag distinguishes the two kinds so an access token can never
/// pass for a refresh token or vice versa.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject: user ID
    pub sub: String,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// JWT ID, unique per issued token
    pub jti: String,

    #[serde(rename = "type")]
    pub kind: TokenKind,
}

impl TokenClaims {
    /// Create claims for a freshly minted token
    pub fn new(
        user_id: Uuid,
        kind: TokenKind,
        expires_at: DateTime<Utc>,
        issued_at: DateTime<Utc>,
    ) -> Self {
        Self {
            sub: user_id.to_string(),
            exp: expires_at.timestamp(),
            iat: issued_at.timestamp(),
            jti: Uuid::new_v4().to_string(),
            kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_stored_token_validity_flags() {
        let mut token = StoredToken {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            token: "signed.jwt.string".to_string(),
            kind: TokenKind::Access,
            expired: false,
            revoked: false,
            created_at: Utc::now(),
        };

        assert!(token.is_valid());

        token.revoked = true;
        assert!(!token.is_valid());

        token.revoked = false;
        token.expired = true;
        assert!(!token.is_valid());
    }

    #[test]
    fn test_token_pair_wire_shape() {
        let pair = TokenPair::new("access".to_string(), "refresh".to_string());
        let json = serde_json::to_value(&pair).unwrap();

        assert_eq!(json["accessToken"], "access");
        assert_eq!(json["refreshToken"], "refresh");
    }

    #[test]
    fn test_token_claims_creation() {
        let user_id = Uuid::new_v4();
        let now = Utc::now();
        let expires_at = now + Duration::hours(1);

        let claims = TokenClaims::new(user_id, TokenKind::Access, expires_at, now);

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.exp, expires_at.timestamp());
        assert_eq!(claims.iat, now.timestamp());
        assert_eq!(claims.kind, TokenKind::Access);
        assert!(!claims.jti.is_empty());
    }

    #[test]
    fn test_claims_kind_tag_round_trip() {
        let claims = TokenClaims::new(
            Uuid::new_v4(),
            TokenKind::Refresh,
            Utc::now() + Duration::days(30),
            Utc::now(),
        );

        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["type"], "refresh");

        let parsed: TokenClaims = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.kind, TokenKind::Refresh);
    }
}
