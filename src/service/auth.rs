//! Authentication Service
//!
//! The orchestrator for the authentication lifecycle: registration with
//! email confirmation, credential login, token refresh, logout and account
//! confirmation. Each operation runs its writes inside one transaction so
//! the revoke-then-insert transition on the token store is observed
//! atomically.

use std::sync::Arc;

use log::{debug, info};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;
use validator::Validate;

use crate::models::{LoginRequest, RegisterRequest, TokenKind, TokenPair};
use crate::service::email::ConfirmationMailer;
use crate::service::jwt::JwtCodec;
use crate::service::token_store;
use crate::utils::error::{AuthError, AuthResult, Violations};
use crate::utils::security::{
    constant_time_compare, generate_confirmation_code, hash_password, verify_password,
};
use crate::utils::validation::{normalize_email, violations_from};

/// Strip the bearer scheme marker from an authorization header
fn bearer_token(header: Option<&str>) -> Option<&str> {
    header.and_then(|h| h.strip_prefix("Bearer "))
}

/// Core authentication orchestrator
///
/// Sole mutator of `users.enabled`; all token-flag mutation goes through the
/// token store within transactions this service owns.
#[derive(Clone)]
pub struct AuthService {
    pool: PgPool,
    codec: JwtCodec,
    mailer: Arc<dyn ConfirmationMailer>,
}

impl AuthService {
    pub fn new(pool: PgPool, codec: JwtCodec, mailer: Arc<dyn ConfirmationMailer>) -> Self {
        Self {
            pool,
            codec,
            mailer,
        }
    }

    /// Register a new, disabled account and send its confirmation email
    ///
    /// The email send sits on the critical path: if delivery fails, the
    /// whole registration aborts and no user row is left behind, since a
    /// disabled user with no code in their inbox could never confirm.
    pub async fn register(&self, request: RegisterRequest) -> AuthResult<()> {
        request
            .validate()
            .map_err(|e| AuthError::ValidationFailed(violations_from(e)))?;

        let email = normalize_email(&request.email);
        let mut tx = self.pool.begin().await?;

        if find_user_by_email(&mut tx, &email).await?.is_some() {
            return Err(AuthError::ValidationFailed(Violations::single(
                "email",
                "A user with the same email already exists",
            )));
        }

        let confirmation_code = generate_confirmation_code();

        let delivered = self
            .mailer
            .send_confirmation(
                &email,
                &request.first_name,
                &request.last_name,
                &confirmation_code,
            )
            .await
            .unwrap_or(false);
        if !delivered {
            return Err(AuthError::ValidationFailed(Violations::single(
                "email",
                "Unable to send confirmation email. Please check your input",
            )));
        }

        let password_hash = hash_password(&request.password)?;
        insert_user(
            &mut tx,
            &email,
            &password_hash,
            &request.first_name,
            &request.last_name,
            &confirmation_code,
        )
        .await?;

        tx.commit().await?;
        info!("Registered new account for {}", email);
        Ok(())
    }

    /// Authenticate with email and password, issuing a fresh token pair
    ///
    /// Every previously valid token of the user is revoked in the same
    /// transaction that persists the new pair, enforcing the
    /// single-active-session policy.
    pub async fn login(&self, request: LoginRequest) -> AuthResult<TokenPair> {
        request
            .validate()
            .map_err(|e| AuthError::ValidationFailed(violations_from(e)))?;

        let email = normalize_email(&request.email);
        let mut tx = self.pool.begin().await?;

        let user = authenticate(&mut tx, &email, &request.password).await?;

        let access_token = self.codec.issue(user.id, TokenKind::Access)?;
        let refresh_token = self.codec.issue(user.id, TokenKind::Refresh)?;

        token_store::revoke_all_valid(&mut tx, user.id, None).await?;
        token_store::insert(&mut tx, user.id, &access_token, TokenKind::Access).await?;
        token_store::insert(&mut tx, user.id, &refresh_token, TokenKind::Refresh).await?;

        tx.commit().await?;
        debug!("Issued new token pair for {}", email);
        Ok(TokenPair::new(access_token, refresh_token))
    }

    /// Exchange a valid refresh token for a new access token
    ///
    /// The presented refresh token is not rotated: it is returned unchanged
    /// next to the new access token, and only prior access tokens are
    /// revoked so it stays usable until logout or the next login.
    pub async fn refresh_token(&self, authorization: Option<&str>) -> AuthResult<TokenPair> {
        let refresh_token = bearer_token(authorization)
            .ok_or_else(|| AuthError::Token("Invalid header format for token refresh".into()))?;

        let subject = self.codec.extract_subject(refresh_token)?;

        let mut tx = self.pool.begin().await?;

        let user = find_user_by_id_for_update(&mut tx, subject)
            .await?
            .ok_or_else(|| AuthError::Token("Unable to resolve token subject".into()))?;

        let stored = token_store::find_by_token(&mut tx, refresh_token).await?;
        let usable = matches!(stored, Some(ref t) if t.is_valid());
        if !usable || !self.codec.is_valid(refresh_token, TokenKind::Refresh, user.id) {
            return Err(AuthError::Token(
                "Unable to refresh using provided token".into(),
            ));
        }

        let access_token = self.codec.issue(user.id, TokenKind::Access)?;
        token_store::revoke_all_valid(&mut tx, user.id, Some(TokenKind::Access)).await?;
        token_store::insert(&mut tx, user.id, &access_token, TokenKind::Access).await?;

        tx.commit().await?;
        debug!("Refreshed access token for user {}", user.id);
        Ok(TokenPair::new(access_token, refresh_token.to_string()))
    }

    /// Invalidate the presented token
    ///
    /// Never fails the caller: a missing or malformed header and an unknown
    /// token are silent no-ops, and repeating a logout is safe.
    pub async fn logout(&self, authorization: Option<&str>) -> AuthResult<()> {
        let Some(token) = bearer_token(authorization) else {
            return Ok(());
        };

        let mut tx = self.pool.begin().await?;
        let found = token_store::revoke(&mut tx, token).await?;
        tx.commit().await?;

        if found {
            debug!("Logged out stored token");
        }
        Ok(())
    }

    /// Check database connectivity for health monitoring
    pub async fn health_check(&self) -> AuthResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Enable an account using its one-time confirmation code
    ///
    /// The code is never rotated; once the account is enabled the guard
    /// below rejects any further confirmation attempt.
    pub async fn confirm_register(&self, email: &str, code: &str) -> AuthResult<()> {
        let email = normalize_email(email);
        let mut tx = self.pool.begin().await?;

        let user = find_user_by_email_for_update(&mut tx, &email)
            .await?
            .ok_or_else(|| {
                AuthError::ValidationFailed(Violations::single("url", "Invalid confirmation link"))
            })?;

        let code_matches = user
            .confirmation_code
            .as_deref()
            .map(|stored| constant_time_compare(stored, code))
            .unwrap_or(false);

        if !code_matches || user.enabled {
            return Err(AuthError::ValidationFailed(Violations::single(
                "url",
                "The code is invalid or already confirmed",
            )));
        }

        enable_user(&mut tx, user.id).await?;
        tx.commit().await?;
        info!("Account confirmed for {}", email);
        Ok(())
    }
}

/// Verify credentials, collapsing every failure mode into one generic error
///
/// Unknown email, wrong password and a disabled account are
/// indistinguishable to the caller so the response leaks nothing about
/// which factor failed. Locks the user row for the rest of the transaction
/// so two rotations racing on the same account serialize instead of each
/// committing a valid token.
async fn authenticate(
    conn: &mut PgConnection,
    email: &str,
    password: &str,
) -> AuthResult<crate::models::user::UserRecord> {
    let user = find_user_by_email_for_update(conn, email)
        .await?
        .ok_or(AuthError::AuthenticationFailed)?;

    let password_ok = verify_password(password, &user.password_hash)?;
    if !password_ok || !user.enabled {
        return Err(AuthError::AuthenticationFailed);
    }

    Ok(user)
}

const USER_COLUMNS: &str = "id, email, password_hash, first_name, last_name, \
                            role, enabled, confirmation_code, created_at";

async fn find_user_by_email(
    conn: &mut PgConnection,
    email: &str,
) -> Result<Option<crate::models::user::UserRecord>, sqlx::Error> {
    sqlx::query_as::<_, crate::models::user::UserRecord>(&format!(
        "SELECT {} FROM users WHERE email = $1",
        USER_COLUMNS
    ))
    .bind(email)
    .fetch_optional(&mut *conn)
    .await
}

// The FOR UPDATE variants hold a row lock until the transaction commits.
// Every operation that rotates or mutates an account goes through one of
// them, so revoke-then-insert is observed as a single transition even when
// two requests for the same user interleave.

async fn find_user_by_email_for_update(
    conn: &mut PgConnection,
    email: &str,
) -> Result<Option<crate::models::user::UserRecord>, sqlx::Error> {
    sqlx::query_as::<_, crate::models::user::UserRecord>(&format!(
        "SELECT {} FROM users WHERE email = $1 FOR UPDATE",
        USER_COLUMNS
    ))
    .bind(email)
    .fetch_optional(&mut *conn)
    .await
}

async fn find_user_by_id_for_update(
    conn: &mut PgConnection,
    id: Uuid,
) -> Result<Option<crate::models::user::UserRecord>, sqlx::Error> {
    sqlx::query_as::<_, crate::models::user::UserRecord>(&format!(
        "SELECT {} FROM users WHERE id = $1 FOR UPDATE",
        USER_COLUMNS
    ))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await
}

async fn insert_user(
    conn: &mut PgConnection,
    email: &str,
    password_hash: &str,
    first_name: &str,
    last_name: &str,
    confirmation_code: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO users (email, password_hash, first_name, last_name, confirmation_code) \
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(email)
    .bind(password_hash)
    .bind(first_name)
    .bind(last_name)
    .bind(confirmation_code)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

async fn enable_user(conn: &mut PgConnection, id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET enabled = TRUE WHERE id = $1")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    Ok(())
}
