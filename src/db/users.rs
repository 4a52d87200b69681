//! User store operations.

use sqlx::SqlitePool;
use uuid::Uuid;

use super::{now_timestamp, NewUser, StoreError, User, UserPatch, UserResponse};

/// Insert a user. A duplicate email is rejected by the unique index and
/// surfaces as `StoreError::Conflict`; there is no racy pre-check.
pub async fn create(pool: &SqlitePool, new: &NewUser) -> Result<User, StoreError> {
    let now = now_timestamp();
    let user = User {
        id: Uuid::new_v4().to_string(),
        name: new.name.clone(),
        email: new.email.clone(),
        password_hash: new.password_hash.clone(),
        role: new.role,
        created_at: now.clone(),
        updated_at: now,
    };

    sqlx::query(
        "INSERT INTO users (id, name, email, password_hash, role, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&user.id)
    .bind(&user.name)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(user.role)
    .bind(&user.created_at)
    .bind(&user.updated_at)
    .execute(pool)
    .await?;

    Ok(user)
}

pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>, StoreError> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
        .bind(email)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

/// Public view of one account; the password hash never leaves the store.
pub async fn get(pool: &SqlitePool, id: &str) -> Result<UserResponse, StoreError> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .map(UserResponse::from)
        .ok_or(StoreError::NotFound)
}

/// Apply a partial update and bump `updated_at`.
pub async fn update(pool: &SqlitePool, id: &str, patch: &UserPatch) -> Result<u64, StoreError> {
    let result = sqlx::query(
        r#"
        UPDATE users
        SET name = COALESCE(?, name), role = COALESCE(?, role), updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(patch.name.as_deref().map(str::trim))
    .bind(patch.role)
    .bind(now_timestamp())
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(StoreError::NotFound);
    }
    Ok(result.rows_affected())
}

pub async fn list(pool: &SqlitePool) -> Result<Vec<User>, StoreError> {
    let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at")
        .fetch_all(pool)
        .await?;
    Ok(users)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{test_pool, Role};

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Test User".to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            role: Role::User,
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let pool = test_pool().await;
        let created = create(&pool, &new_user("a@example.com")).await.unwrap();

        let found = find_by_email(&pool, "a@example.com").await.unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert_eq!(found.role, Role::User);
        assert!(find_by_email(&pool, "b@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_conflict() {
        let pool = test_pool().await;
        create(&pool, &new_user("dup@example.com")).await.unwrap();

        let err = create(&pool, &new_user("dup@example.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)), "got {:?}", err);

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = ?")
            .bind("dup@example.com")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_concurrent_duplicate_signups_leave_one_record() {
        let pool = test_pool().await;
        let first = new_user("race@example.com");
        let second = new_user("race@example.com");

        let (a, b) = tokio::join!(create(&pool, &first), create(&pool, &second));
        assert!(a.is_ok() != b.is_ok());

        assert_eq!(list(&pool).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_keeps_unsupplied_fields() {
        let pool = test_pool().await;
        let created = create(&pool, &new_user("u@example.com")).await.unwrap();

        let patch = UserPatch {
            role: Some(Role::Admin),
            ..Default::default()
        };
        update(&pool, &created.id, &patch).await.unwrap();

        let stored = get(&pool, &created.id).await.unwrap();
        assert_eq!(stored.role, Role::Admin);
        assert_eq!(stored.name, "Test User");
        assert_eq!(stored.created_at, created.created_at);
        assert!(serde_json::to_value(&stored).unwrap().get("password_hash").is_none());
    }

    #[tokio::test]
    async fn test_get_missing_user() {
        let pool = test_pool().await;
        assert!(matches!(get(&pool, "nope").await, Err(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn test_update_missing_user() {
        let pool = test_pool().await;
        let err = update(&pool, "nope", &UserPatch::default()).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }
}
