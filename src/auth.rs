use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::Utc;

use crate::{
    db::DbPool,
    error::AppError,
    models::{
        session::{Session, SESSION_TTL_DAYS},
        user::User,
    },
    services::provider::ProviderProfile,
    state::AppState,
};

pub const SESSION_COOKIE: &str = "session_token";

/// The authenticated caller, resolved from the session cookie or a
/// `Bearer` token on every request.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = session_token(&jar, &parts.headers)
            .ok_or(AppError::Unauthorized("not authenticated"))?;
        let user = resolve_session(&state.db, &token).await?;
        Ok(Self(user))
    }
}

/// Cookie takes precedence over the Authorization header.
pub fn session_token(jar: &CookieJar, headers: &HeaderMap) -> Option<String> {
    jar.get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .or_else(|| bearer_token(headers))
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    value.strip_prefix("Bearer ").map(str::to_string)
}

/// Resolve a session token to its user. Pure lookup, no side effects and no
/// sliding expiry; every auth failure surfaces uniformly as 401.
pub async fn resolve_session(db: &DbPool, token: &str) -> Result<User, AppError> {
    let session: Option<Session> =
        sqlx::query_as("SELECT * FROM sessions WHERE session_token = ?")
            .bind(token)
            .fetch_optional(db)
            .await?;

    let session = session.ok_or(AppError::Unauthorized("session expired or invalid"))?;
    if session.is_expired(Utc::now()) {
        return Err(AppError::Unauthorized("session expired or invalid"));
    }

    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = ?")
        .bind(&session.user_id)
        .fetch_optional(db)
        .await?;

    // Session rows can outlive their user; treated as a plain auth failure.
    user.ok_or(AppError::Unauthorized("user not found"))
}

pub async fn store_session(db: &DbPool, session: &Session) -> Result<(), AppError> {
    sqlx::query(
        "INSERT INTO sessions (id, user_id, session_token, expires_at, created_at)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&session.id)
    .bind(&session.user_id)
    .bind(&session.session_token)
    .bind(session.expires_at)
    .bind(session.created_at)
    .execute(db)
    .await?;
    Ok(())
}

pub async fn destroy_session(db: &DbPool, token: &str) -> Result<(), AppError> {
    sqlx::query("DELETE FROM sessions WHERE session_token = ?")
        .bind(token)
        .execute(db)
        .await?;
    Ok(())
}

pub async fn find_user_by_email(db: &DbPool, email: &str) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as("SELECT * FROM users WHERE email = ?")
        .bind(email)
        .fetch_optional(db)
        .await?;
    Ok(user)
}

/// Look up a user by the provider-reported email, creating one on first
/// login. Profile fields are first-write-wins: a repeat login never updates
/// name or avatar.
pub async fn find_or_create_user(db: &DbPool, profile: &ProviderProfile) -> Result<User, AppError> {
    if let Some(existing) = find_user_by_email(db, &profile.email).await? {
        return Ok(existing);
    }

    let user = User::new(
        &profile.email,
        &profile.name,
        profile.picture.clone(),
        &profile.id,
    );
    sqlx::query(
        "INSERT INTO users (id, email, name, avatar, provider_id, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&user.id)
    .bind(&user.email)
    .bind(&user.name)
    .bind(&user.avatar)
    .bind(&user.provider_id)
    .bind(user.created_at)
    .bind(user.updated_at)
    .execute(db)
    .await?;
    Ok(user)
}

pub fn apply_session_cookie(jar: CookieJar, token: &str) -> CookieJar {
    let cookie = Cookie::build((SESSION_COOKIE, token.to_string()))
        .http_only(true)
        .secure(true)
        .same_site(SameSite::None)
        .path("/")
        .max_age(time::Duration::days(SESSION_TTL_DAYS))
        .build();
    jar.add(cookie)
}

pub fn clear_session_cookie(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build((SESSION_COOKIE, "")).path("/").build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_token_requires_the_scheme_prefix() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        assert_eq!(bearer_token(&headers).as_deref(), Some("abc"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Token abc"));
        assert_eq!(bearer_token(&headers), None);
    }

    #[test]
    fn cookie_takes_precedence_over_bearer_header() {
        let jar = CookieJar::new().add(Cookie::new(SESSION_COOKIE, "from-cookie"));
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer from-header"),
        );
        assert_eq!(
            session_token(&jar, &headers).as_deref(),
            Some("from-cookie")
        );

        let empty = CookieJar::new();
        assert_eq!(
            session_token(&empty, &headers).as_deref(),
            Some("from-header")
        );
    }
}
