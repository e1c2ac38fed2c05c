//! JWT Codec
//!
//! Mints and validates the signed, time-bound tokens used for API access and
//! re-authentication. Access and refresh tokens share one signing scheme and
//! differ in expiry policy and the `type` tag embedded in the claims. The
//! codec is pure: whether a token has been revoked is the token store's
//! concern, not the codec's.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::models::{TokenClaims, TokenKind};
use crate::utils::error::{AuthError, AuthResult};

/// Signs and parses access and refresh tokens
#[derive(Clone)]
pub struct JwtCodec {
    /// Shared HMAC signing secret
    secret: String,
    /// Access token expiration duration (default: 1 hour)
    access_token_expires_in: Duration,
    /// Refresh token expiration duration (default: 30 days)
    refresh_token_expires_in: Duration,
}

impl JwtCodec {
    /// Create a codec with the default expiry policies
    pub fn new(secret: String) -> Self {
        Self {
            secret,
            access_token_expires_in: Duration::hours(1),
            refresh_token_expires_in: Duration::days(30),
        }
    }

    /// Create a codec with custom token expiration times
    pub fn with_expiration(
        secret: String,
        access_expires_in: Duration,
        refresh_expires_in: Duration,
    ) -> Self {
        Self {
            secret,
            access_token_expires_in: access_expires_in,
            refresh_token_expires_in: refresh_expires_in,
        }
    }

    /// Mint a signed token of the given kind for a user
    pub fn issue(&self, user_id: Uuid, kind: TokenKind) -> AuthResult<String> {
        let now = Utc::now();
        let expires_at = match kind {
            TokenKind::Access => now + self.access_token_expires_in,
            TokenKind::Refresh => now + self.refresh_token_expires_in,
        };

        let claims = TokenClaims::new(user_id, kind, expires_at, now);
        let header = Header::new(Algorithm::HS256);
        let encoding_key = EncodingKey::from_secret(self.secret.as_ref());

        encode(&header, &claims, &encoding_key)
            .map_err(|e| AuthError::Configuration(format!("failed to sign token: {}", e)))
    }

    /// Extract the subject identity embedded in a token
    ///
    /// Fails with a token error if the token is malformed, has a bad
    /// signature, is past its expiry, or carries a non-UUID subject.
    pub fn extract_subject(&self, token: &str) -> AuthResult<Uuid> {
        let claims = self.decode_claims(token)?;
        Uuid::parse_str(&claims.sub)
            .map_err(|_| AuthError::Token("Unable to extract subject from token".into()))
    }

    /// Check signature, expiry, kind tag and subject match in one pass
    pub fn is_valid(&self, token: &str, kind: TokenKind, user_id: Uuid) -> bool {
        match self.decode_claims(token) {
            Ok(claims) => claims.kind == kind && claims.sub == user_id.to_string(),
            Err(_) => false,
        }
    }

    /// Decode and verify a token, returning its claims
    fn decode_claims(&self, token: &str) -> AuthResult<TokenClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.validate_aud = false;

        let decoding_key = DecodingKey::from_secret(self.secret.as_ref());

        decode::<TokenClaims>(token, &decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| AuthError::Token(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_codec() -> JwtCodec {
        JwtCodec::new("test_signing_secret".to_string())
    }

    #[test]
    fn test_issue_and_extract_subject() {
        let codec = test_codec();
        let user_id = Uuid::new_v4();

        let token = codec.issue(user_id, TokenKind::Access).unwrap();
        let subject = codec.extract_subject(&token).unwrap();

        assert_eq!(subject, user_id);
    }

    #[test]
    fn test_is_valid_checks_subject() {
        let codec = test_codec();
        let user_id = Uuid::new_v4();
        let token = codec.issue(user_id, TokenKind::Access).unwrap();

        assert!(codec.is_valid(&token, TokenKind::Access, user_id));
        assert!(!codec.is_valid(&token, TokenKind::Access, Uuid::new_v4()));
    }

    #[test]
    fn test_is_valid_rejects_wrong_kind() {
        let codec = test_codec();
        let user_id = Uuid::new_v4();

        let access = codec.issue(user_id, TokenKind::Access).unwrap();
        let refresh = codec.issue(user_id, TokenKind::Refresh).unwrap();

        // An access token must never pass for a refresh token
        assert!(!codec.is_valid(&access, TokenKind::Refresh, user_id));
        assert!(!codec.is_valid(&refresh, TokenKind::Access, user_id));
        assert!(codec.is_valid(&refresh, TokenKind::Refresh, user_id));
    }

    #[test]
    fn test_foreign_signature_rejected() {
        let codec = test_codec();
        let other = JwtCodec::new("different_secret".to_string());
        let user_id = Uuid::new_v4();

        let token = other.issue(user_id, TokenKind::Access).unwrap();

        assert!(codec.extract_subject(&token).is_err());
        assert!(!codec.is_valid(&token, TokenKind::Access, user_id));
    }

    #[test]
    fn test_expired_token_rejected() {
        let user_id = Uuid::new_v4();
        let codec = JwtCodec::with_expiration(
            "test_signing_secret".to_string(),
            Duration::seconds(-120),
            Duration::seconds(-120),
        );

        let token = codec.issue(user_id, TokenKind::Access).unwrap();

        assert!(!codec.is_valid(&token, TokenKind::Access, user_id));
        match codec.extract_subject(&token) {
            Err(AuthError::Token(_)) => {}
            other => panic!("expected token error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_malformed_token_rejected() {
        let codec = test_codec();

        match codec.extract_subject("not.a.jwt") {
            Err(AuthError::Token(_)) => {}
            other => panic!("expected token error, got {:?}", other.map(|_| ())),
        }
    }
}
