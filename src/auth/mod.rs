//! Accounts and server-side sessions.
//!
//! A browser is Anonymous until signup or login issues a session token
//! (stored only as a keyed hash); logout deletes the session again.

mod password;
pub mod session;

pub use password::{hash_password, verify_password, MIN_PASSWORD_LEN};
pub use session::{AdminUser, CurrentUser, MaybeUser, SESSION_COOKIE};

use chrono::{Duration, Utc};
use serde::Deserialize;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::info;

use crate::api::validation::validate_email;
use crate::config::AuthConfig;
use crate::db::{self, format_timestamp, now_timestamp, NewUser, Role, SessionUser, StoreError};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),

    #[error("User with this email already exists")]
    Conflict,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Password hashing failed: {0}")]
    Hash(String),

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(_) => AuthError::Conflict,
            other => AuthError::Store(other),
        }
    }
}

impl From<argon2::password_hash::Error> for AuthError {
    fn from(err: argon2::password_hash::Error) -> Self {
        AuthError::Hash(err.to_string())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(rename = "confirmPassword")]
    pub confirm_password: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// A freshly opened session. `token` is the raw cookie value and is never stored.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub user: SessionUser,
    pub expires_at: String,
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn validate_signup(req: &SignupRequest) -> Result<(), AuthError> {
    if req.name.trim().is_empty()
        || req.email.trim().is_empty()
        || req.password.is_empty()
        || req.confirm_password.is_empty()
    {
        return Err(AuthError::Validation("All fields are required".to_string()));
    }
    validate_email(req.email.trim()).map_err(AuthError::Validation)?;
    if req.password != req.confirm_password {
        return Err(AuthError::Validation("Passwords do not match".to_string()));
    }
    if req.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::Validation(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

async fn open_session(
    pool: &SqlitePool,
    config: &AuthConfig,
    user: SessionUser,
) -> Result<IssuedSession, AuthError> {
    let token = session::generate_token();
    let token_hash = session::hash_token(&config.session_secret, &token);
    let expires_at = format_timestamp(Utc::now() + Duration::hours(config.session_ttl_hours));

    db::sessions::create(pool, &token_hash, &user, &expires_at).await?;

    Ok(IssuedSession {
        token,
        user,
        expires_at,
    })
}

/// Register a new account with role `user` and sign it in.
pub async fn signup(
    pool: &SqlitePool,
    config: &AuthConfig,
    req: &SignupRequest,
) -> Result<IssuedSession, AuthError> {
    validate_signup(req)?;

    let new_user = NewUser {
        name: req.name.trim().to_string(),
        email: normalize_email(&req.email),
        password_hash: hash_password(&req.password)?,
        role: Role::User,
    };
    // The unique index on email decides duplicates
    let user = db::users::create(pool, &new_user).await?;
    info!(user_id = %user.id, "User signed up");

    open_session(pool, config, SessionUser::from(&user)).await
}

/// Check credentials and open a session. Unknown email and wrong password
/// are indistinguishable to the caller.
pub async fn login(
    pool: &SqlitePool,
    config: &AuthConfig,
    req: &LoginRequest,
) -> Result<IssuedSession, AuthError> {
    if req.email.trim().is_empty() || req.password.is_empty() {
        return Err(AuthError::Validation(
            "Email and password are required".to_string(),
        ));
    }

    let user = db::users::find_by_email(pool, &normalize_email(&req.email))
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    if !verify_password(&req.password, &user.password_hash) {
        return Err(AuthError::InvalidCredentials);
    }

    info!(user_id = %user.id, "User logged in");
    open_session(pool, config, SessionUser::from(&user)).await
}

/// Destroy the session behind `token`. No or unknown token is fine.
pub async fn logout(
    pool: &SqlitePool,
    config: &AuthConfig,
    token: Option<&str>,
) -> Result<(), AuthError> {
    if let Some(token) = token {
        let token_hash = session::hash_token(&config.session_secret, token);
        db::sessions::delete_by_token_hash(pool, &token_hash).await?;
    }
    Ok(())
}

/// Resolve a cookie token to its unexpired session snapshot.
pub async fn current(
    pool: &SqlitePool,
    config: &AuthConfig,
    token: &str,
) -> Result<Option<SessionUser>, AuthError> {
    let token_hash = session::hash_token(&config.session_secret, token);
    let session = db::sessions::find_active(pool, &token_hash, &now_timestamp()).await?;
    Ok(session.map(|s| s.user()))
}

/// Create the configured admin account if no user has that email yet.
/// Returns whether an account was created.
pub async fn ensure_admin_user(pool: &SqlitePool, config: &AuthConfig) -> Result<bool, AuthError> {
    let (Some(email), Some(password)) = (&config.admin_email, &config.admin_password) else {
        return Ok(false);
    };
    let email = normalize_email(email);
    if email.is_empty() || password.is_empty() {
        return Ok(false);
    }

    if db::users::find_by_email(pool, &email).await?.is_some() {
        return Ok(false);
    }

    let new_user = NewUser {
        name: "Administrator".to_string(),
        email: email.clone(),
        password_hash: hash_password(password)?,
        role: Role::Admin,
    };
    match db::users::create(pool, &new_user).await {
        Ok(_) => {
            info!("Created admin user {}", email);
            Ok(true)
        }
        // Another instance created it first
        Err(StoreError::Conflict(_)) => Ok(false),
        Err(e) => Err(e.into()),
    }
}

pub async fn purge_expired_sessions(pool: &SqlitePool) -> Result<u64, AuthError> {
    let purged = db::sessions::purge_expired(pool, &now_timestamp()).await?;
    if purged > 0 {
        info!("Purged {} expired sessions", purged);
    }
    Ok(purged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    fn auth_config() -> AuthConfig {
        AuthConfig {
            session_secret: "test-secret".to_string(),
            ..Default::default()
        }
    }

    fn signup_request(email: &str) -> SignupRequest {
        SignupRequest {
            name: "Test User".to_string(),
            email: email.to_string(),
            password: "password123".to_string(),
            confirm_password: "password123".to_string(),
        }
    }

    #[tokio::test]
    async fn test_signup_then_login() {
        let pool = test_pool().await;
        let config = auth_config();

        let issued = signup(&pool, &config, &signup_request("Test@Example.com"))
            .await
            .unwrap();
        assert_eq!(issued.user.email, "test@example.com");
        assert_eq!(issued.user.role, Role::User);

        let resolved = current(&pool, &config, &issued.token).await.unwrap();
        assert_eq!(resolved, Some(issued.user.clone()));

        let login_req = LoginRequest {
            email: " test@example.com".to_string(),
            password: "password123".to_string(),
        };
        let again = login(&pool, &config, &login_req).await.unwrap();
        assert_eq!(again.user.id, issued.user.id);
        assert_ne!(again.token, issued.token);
    }

    #[tokio::test]
    async fn test_signup_validation() {
        let pool = test_pool().await;
        let config = auth_config();

        let mut missing = signup_request("a@example.com");
        missing.name = "  ".to_string();
        let bad_email = signup_request("not-an-email");
        let mut mismatch = signup_request("a@example.com");
        mismatch.confirm_password = "password124".to_string();
        let mut short = signup_request("a@example.com");
        short.password = "abc".to_string();
        short.confirm_password = "abc".to_string();

        for req in [missing, bad_email, mismatch, short] {
            let err = signup(&pool, &config, &req).await.unwrap_err();
            assert!(matches!(err, AuthError::Validation(_)), "got {:?}", err);
        }
        assert!(db::users::list(&pool).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_signup_is_conflict() {
        let pool = test_pool().await;
        let config = auth_config();

        signup(&pool, &config, &signup_request("dup@example.com"))
            .await
            .unwrap();
        let err = signup(&pool, &config, &signup_request("DUP@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Conflict));
        assert_eq!(db::users::list(&pool).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_login_failures_share_a_message() {
        let pool = test_pool().await;
        let config = auth_config();
        signup(&pool, &config, &signup_request("user@example.com"))
            .await
            .unwrap();

        let wrong_password = LoginRequest {
            email: "user@example.com".to_string(),
            password: "nope-nope".to_string(),
        };
        let unknown_email = LoginRequest {
            email: "ghost@example.com".to_string(),
            password: "password123".to_string(),
        };

        let a = login(&pool, &config, &wrong_password).await.unwrap_err();
        let b = login(&pool, &config, &unknown_email).await.unwrap_err();
        assert!(matches!(a, AuthError::InvalidCredentials));
        assert_eq!(a.to_string(), b.to_string());
    }

    #[tokio::test]
    async fn test_logout_destroys_session() {
        let pool = test_pool().await;
        let config = auth_config();
        let issued = signup(&pool, &config, &signup_request("bye@example.com"))
            .await
            .unwrap();

        logout(&pool, &config, Some(&issued.token)).await.unwrap();
        assert!(current(&pool, &config, &issued.token).await.unwrap().is_none());

        // Logging out again, or without a session, is not an error
        logout(&pool, &config, Some(&issued.token)).await.unwrap();
        logout(&pool, &config, None).await.unwrap();
    }

    #[tokio::test]
    async fn test_session_bound_to_secret() {
        let pool = test_pool().await;
        let config = auth_config();
        let issued = signup(&pool, &config, &signup_request("key@example.com"))
            .await
            .unwrap();

        let rotated = AuthConfig {
            session_secret: "other-secret".to_string(),
            ..Default::default()
        };
        assert!(current(&pool, &rotated, &issued.token).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_expired_sessions_do_not_resolve_and_are_purged() {
        let pool = test_pool().await;
        let config = AuthConfig {
            session_ttl_hours: -1,
            ..auth_config()
        };
        let issued = signup(&pool, &config, &signup_request("old@example.com"))
            .await
            .unwrap();

        assert!(current(&pool, &config, &issued.token).await.unwrap().is_none());
        assert_eq!(purge_expired_sessions(&pool).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_ensure_admin_user() {
        let pool = test_pool().await;
        let config = AuthConfig {
            admin_email: Some("Admin@Example.com".to_string()),
            admin_password: Some("admin-pass".to_string()),
            ..auth_config()
        };

        assert!(ensure_admin_user(&pool, &config).await.unwrap());
        assert!(!ensure_admin_user(&pool, &config).await.unwrap());

        let admin = db::users::find_by_email(&pool, "admin@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(admin.role, Role::Admin);

        let issued = login(
            &pool,
            &config,
            &LoginRequest {
                email: "admin@example.com".to_string(),
                password: "admin-pass".to_string(),
            },
        )
        .await
        .unwrap();
        assert!(issued.user.is_admin());
    }

    #[tokio::test]
    async fn test_ensure_admin_user_without_config() {
        let pool = test_pool().await;
        assert!(!ensure_admin_user(&pool, &auth_config()).await.unwrap());
        assert!(db::users::list(&pool).await.unwrap().is_empty());
    }
}
