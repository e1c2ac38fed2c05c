//! Token Store
//!
//! Persistence for issued tokens and the sole mutator of their revocation
//! flags. All functions take a connection rather than a pool so the
//! orchestrator can compose revoke-and-insert into one transaction: a
//! concurrent reader must never observe a state where neither, or both, of
//! the old and new access tokens are valid.

use sqlx::PgConnection;
use uuid::Uuid;

use crate::models::{StoredToken, TokenKind};

/// Persist a freshly issued token as valid
pub async fn insert(
    conn: &mut PgConnection,
    user_id: Uuid,
    token: &str,
    kind: TokenKind,
) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO tokens (user_id, token, kind) VALUES ($1, $2, $3)")
        .bind(user_id)
        .bind(token)
        .bind(kind)
        .execute(&mut *conn)
        .await?;

    Ok(())
}

/// Look up a stored token by its exact string
pub async fn find_by_token(
    conn: &mut PgConnection,
    token: &str,
) -> Result<Option<StoredToken>, sqlx::Error> {
    sqlx::query_as::<_, StoredToken>(
        "SELECT id, user_id, token, kind, expired, revoked, created_at \
         FROM tokens WHERE token = $1",
    )
    .bind(token)
    .fetch_optional(&mut *conn)
    .await
}

/// Fetch a user's currently valid tokens, optionally restricted to one kind
pub async fn find_valid_by_user(
    conn: &mut PgConnection,
    user_id: Uuid,
    kind: Option<TokenKind>,
) -> Result<Vec<StoredToken>, sqlx::Error> {
    match kind {
        Some(kind) => {
            sqlx::query_as::<_, StoredToken>(
                "SELECT id, user_id, token, kind, expired, revoked, created_at \
                 FROM tokens \
                 WHERE user_id = $1 AND kind = $2 AND NOT expired AND NOT revoked",
            )
            .bind(user_id)
            .bind(kind)
            .fetch_all(&mut *conn)
            .await
        }
        None => {
            sqlx::query_as::<_, StoredToken>(
                "SELECT id, user_id, token, kind, expired, revoked, created_at \
                 FROM tokens \
                 WHERE user_id = $1 AND NOT expired AND NOT revoked",
            )
            .bind(user_id)
            .fetch_all(&mut *conn)
            .await
        }
    }
}

/// Revoke every currently valid token of a user in one batch update
///
/// With a kind filter, only tokens of that kind are touched; refresh uses
/// this to supersede access tokens while leaving the presented refresh token
/// valid. Returns the number of tokens revoked.
pub async fn revoke_all_valid(
    conn: &mut PgConnection,
    user_id: Uuid,
    kind: Option<TokenKind>,
) -> Result<u64, sqlx::Error> {
    let result = match kind {
        Some(kind) => {
            sqlx::query(
                "UPDATE tokens SET expired = TRUE, revoked = TRUE \
                 WHERE user_id = $1 AND kind = $2 AND NOT expired AND NOT revoked",
            )
            .bind(user_id)
            .bind(kind)
            .execute(&mut *conn)
            .await?
        }
        None => {
            sqlx::query(
                "UPDATE tokens SET expired = TRUE, revoked = TRUE \
                 WHERE user_id = $1 AND NOT expired AND NOT revoked",
            )
            .bind(user_id)
            .execute(&mut *conn)
            .await?
        }
    };

    Ok(result.rows_affected())
}

/// Flag one stored token as expired and revoked (logout)
///
/// Returns whether a matching row existed. Flagging an already-revoked token
/// is a harmless no-op, which makes logout idempotent.
pub async fn revoke(conn: &mut PgConnection, token: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE tokens SET expired = TRUE, revoked = TRUE WHERE token = $1")
        .bind(token)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::PgPool;

    async fn seed_user(pool: &PgPool) -> Uuid {
        let id = Uuid::new_v4();
        sqlx::query(
            "INSERT INTO users (id, email, password_hash, first_name, last_name, enabled) \
             VALUES ($1, $2, 'hash', 'Test', 'User', TRUE)",
        )
        .bind(id)
        .bind(format!("{}@example.com", id))
        .execute(pool)
        .await
        .unwrap();
        id
    }

    #[sqlx::test]
    async fn test_insert_and_find(pool: PgPool) {
        let user_id = seed_user(&pool).await;
        let mut conn = pool.acquire().await.unwrap();

        insert(&mut conn, user_id, "token-a", TokenKind::Access)
            .await
            .unwrap();

        let stored = find_by_token(&mut conn, "token-a").await.unwrap().unwrap();
        assert_eq!(stored.user_id, user_id);
        assert_eq!(stored.kind, TokenKind::Access);
        assert!(stored.is_valid());

        assert!(find_by_token(&mut conn, "missing")
            .await
            .unwrap()
            .is_none());
    }

    #[sqlx::test]
    async fn test_revoke_flags_both_bits(pool: PgPool) {
        let user_id = seed_user(&pool).await;
        let mut conn = pool.acquire().await.unwrap();

        insert(&mut conn, user_id, "token-a", TokenKind::Access)
            .await
            .unwrap();

        assert!(revoke(&mut conn, "token-a").await.unwrap());

        let stored = find_by_token(&mut conn, "token-a").await.unwrap().unwrap();
        assert!(stored.expired);
        assert!(stored.revoked);

        // Idempotent on repeat, no-op on unknown strings
        assert!(revoke(&mut conn, "token-a").await.unwrap());
        assert!(!revoke(&mut conn, "missing").await.unwrap());
    }

    #[sqlx::test]
    async fn test_revoke_all_valid_batches_per_user(pool: PgPool) {
        let user_a = seed_user(&pool).await;
        let user_b = seed_user(&pool).await;
        let mut conn = pool.acquire().await.unwrap();

        insert(&mut conn, user_a, "a-access-1", TokenKind::Access)
            .await
            .unwrap();
        insert(&mut conn, user_a, "a-access-2", TokenKind::Access)
            .await
            .unwrap();
        insert(&mut conn, user_a, "a-refresh", TokenKind::Refresh)
            .await
            .unwrap();
        insert(&mut conn, user_b, "b-access", TokenKind::Access)
            .await
            .unwrap();

        let revoked = revoke_all_valid(&mut conn, user_a, None).await.unwrap();
        assert_eq!(revoked, 3);

        assert!(find_valid_by_user(&mut conn, user_a, None)
            .await
            .unwrap()
            .is_empty());

        // Other users are untouched
        let b_tokens = find_valid_by_user(&mut conn, user_b, None).await.unwrap();
        assert_eq!(b_tokens.len(), 1);
        assert_eq!(b_tokens[0].token, "b-access");
    }

    #[sqlx::test]
    async fn test_revoke_all_valid_with_kind_filter(pool: PgPool) {
        let user_id = seed_user(&pool).await;
        let mut conn = pool.acquire().await.unwrap();

        insert(&mut conn, user_id, "access", TokenKind::Access)
            .await
            .unwrap();
        insert(&mut conn, user_id, "refresh", TokenKind::Refresh)
            .await
            .unwrap();

        let revoked = revoke_all_valid(&mut conn, user_id, Some(TokenKind::Access))
            .await
            .unwrap();
        assert_eq!(revoked, 1);

        // The refresh token survives an access-only sweep
        let valid = find_valid_by_user(&mut conn, user_id, None).await.unwrap();
        assert_eq!(valid.len(), 1);
        assert_eq!(valid[0].kind, TokenKind::Refresh);
    }

    #[sqlx::test]
    async fn test_already_revoked_tokens_skip_the_sweep(pool: PgPool) {
        let user_id = seed_user(&pool).await;
        let mut conn = pool.acquire().await.unwrap();

        insert(&mut conn, user_id, "old", TokenKind::Access)
            .await
            .unwrap();
        revoke(&mut conn, "old").await.unwrap();
        insert(&mut conn, user_id, "new", TokenKind::Access)
            .await
            .unwrap();

        let revoked = revoke_all_valid(&mut conn, user_id, None).await.unwrap();
        assert_eq!(revoked, 1);
    }
}
