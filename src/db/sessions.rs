//! Session store operations.
//!
//! Only the keyed hash of a session token is stored. Expiry is compared
//! as text, which works because every timestamp is written in the same
//! fixed-width RFC 3339 form.

use sqlx::SqlitePool;
use uuid::Uuid;

use super::{now_timestamp, Session, SessionUser, StoreError};

const SESSION_COLUMNS: &str = "id, user_id, user_name, user_email, user_role, expires_at, created_at";

pub async fn create(
    pool: &SqlitePool,
    token_hash: &str,
    user: &SessionUser,
    expires_at: &str,
) -> Result<Session, StoreError> {
    let session = Session {
        id: Uuid::new_v4().to_string(),
        user_id: user.id.clone(),
        user_name: user.name.clone(),
        user_email: user.email.clone(),
        user_role: user.role,
        expires_at: expires_at.to_string(),
        created_at: now_timestamp(),
    };

    sqlx::query(
        r#"
        INSERT INTO sessions (id, token_hash, user_id, user_name, user_email, user_role, expires_at, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&session.id)
    .bind(token_hash)
    .bind(&session.user_id)
    .bind(&session.user_name)
    .bind(&session.user_email)
    .bind(session.user_role)
    .bind(&session.expires_at)
    .bind(&session.created_at)
    .execute(pool)
    .await?;

    Ok(session)
}

/// Look up a session that has not expired as of `now`.
pub async fn find_active(
    pool: &SqlitePool,
    token_hash: &str,
    now: &str,
) -> Result<Option<Session>, StoreError> {
    let session = sqlx::query_as::<_, Session>(&format!(
        "SELECT {} FROM sessions WHERE token_hash = ? AND expires_at > ?",
        SESSION_COLUMNS
    ))
    .bind(token_hash)
    .bind(now)
    .fetch_optional(pool)
    .await?;
    Ok(session)
}

/// Remove a session. Deleting an unknown token is not an error.
pub async fn delete_by_token_hash(pool: &SqlitePool, token_hash: &str) -> Result<u64, StoreError> {
    let result = sqlx::query("DELETE FROM sessions WHERE token_hash = ?")
        .bind(token_hash)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

pub async fn purge_expired(pool: &SqlitePool, now: &str) -> Result<u64, StoreError> {
    let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
        .bind(now)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
