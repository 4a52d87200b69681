//! Session tokens, the session cookie and request extractors.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::Sha256;
use std::convert::Infallible;
use std::sync::Arc;

use crate::api::error::ApiError;
use crate::db::SessionUser;
use crate::AppState;

pub const SESSION_COOKIE: &str = "exploreo_session";

type HmacSha256 = Hmac<Sha256>;

/// Generate a random session token
pub fn generate_token() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 32] = rng.random();
    hex::encode(bytes)
}

/// Keyed hash of a token for storage. A leaked sessions table can't be
/// replayed without the secret.
pub fn hash_token(secret: &str, token: &str) -> String {
    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => unreachable!("HMAC accepts keys of any length"),
    };
    mac.update(token.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// HttpOnly, SameSite=Lax cookie carrying the raw session token
pub fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

pub fn removal_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, "")).path("/").build()
}

pub fn token_from_jar(jar: &CookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}

/// Resolve the request's session cookie to its user snapshot.
async fn resolve(parts: &Parts, state: &AppState) -> Result<Option<SessionUser>, ApiError> {
    let jar = CookieJar::from_headers(&parts.headers);
    let Some(token) = token_from_jar(&jar) else {
        return Ok(None);
    };
    super::current(&state.db, &state.config.auth, &token)
        .await
        .map_err(ApiError::from)
}

/// The signed-in user, if any. Store failures are logged and treated as
/// anonymous so public pages keep rendering.
pub struct MaybeUser(pub Option<SessionUser>);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for MaybeUser {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        match resolve(parts, state).await {
            Ok(user) => Ok(MaybeUser(user)),
            Err(e) => {
                tracing::warn!("Session lookup failed, continuing as anonymous: {}", e.message());
                Ok(MaybeUser(None))
            }
        }
    }
}

/// Requires a signed-in user; rejects with 401.
pub struct CurrentUser(pub SessionUser);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        resolve(parts, state)
            .await?
            .map(CurrentUser)
            .ok_or_else(|| ApiError::unauthorized("Authentication required"))
    }
}

/// Requires an admin session; rejects with 401 or 403.
pub struct AdminUser(pub SessionUser);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        if !user.is_admin() {
            return Err(ApiError::forbidden("Admin access required"));
        }
        Ok(AdminUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_token() {
        let a = generate_token();
        let b = generate_token();
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[test]
    fn test_hash_token_is_keyed() {
        let token = "abc123";
        let one = hash_token("secret-one", token);
        assert_eq!(one, hash_token("secret-one", token));
        assert_ne!(one, hash_token("secret-two", token));
        assert_ne!(one, token);
        assert_eq!(one.len(), 64);
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("tok".to_string(), false);
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.value(), "tok");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.path(), Some("/"));
    }

    #[test]
    fn test_token_from_jar_ignores_empty_value() {
        let jar = CookieJar::new().add(removal_cookie());
        assert!(token_from_jar(&jar).is_none());

        let jar = CookieJar::new().add(session_cookie("tok".to_string(), false));
        assert_eq!(token_from_jar(&jar).as_deref(), Some("tok"));
    }
}
