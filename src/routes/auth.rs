use axum::{
    extract::State,
    http::HeaderMap,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde_json::{json, Value};
use tracing::info;

use crate::{
    auth::{self, CurrentUser},
    error::AppError,
    models::{session::Session, user::UserResponse},
    state::AppState,
};

pub const SESSION_ID_HEADER: &str = "X-Session-ID";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/session", post(create_session))
        .route("/me", get(me))
        .route("/logout", post(logout))
}

/// Exchange the provider's session id for an internal session and set the
/// session cookie.
async fn create_session(
    State(state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
) -> Result<(CookieJar, Json<UserResponse>), AppError> {
    let session_id = headers
        .get(SESSION_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::BadRequest("session ID required".to_string()))?;

    let profile = state.provider.exchange(session_id).await?;
    let user = auth::find_or_create_user(&state.db, &profile).await?;

    // The session token is whatever the provider issued; stored verbatim.
    let session = Session::new(&user.id, &profile.session_token);
    auth::store_session(&state.db, &session).await?;
    info!("session created for {}", user.email);

    let jar = auth::apply_session_cookie(jar, &profile.session_token);
    Ok((jar, Json(UserResponse::from(&user))))
}

async fn me(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(UserResponse::from(&user))
}

async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<Value>), AppError> {
    if let Some(cookie) = jar.get(auth::SESSION_COOKIE) {
        auth::destroy_session(&state.db, cookie.value()).await?;
    }
    Ok((
        auth::clear_session_cookie(jar),
        Json(json!({ "message": "Logged out successfully" })),
    ))
}
