//! Handlers for the `/auth` resource (login, logout, whoami).

use axum::extract::State;
use axum::{Extension, Json};
use axum_extra::extract::cookie::CookieJar;
use bugboard_core::error::CoreError;
use bugboard_db::models::user::{User, UserFilter};
use serde::Deserialize;

use crate::auth::cookies::{cleared_cookies, session_cookies};
use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::MaybeUser;
use crate::middleware::session::SessionReplaced;
use crate::response::DataResponse;
use crate::state::AppState;

/// Same message for unknown email and wrong password.
const LOGIN_FAILED: &str = "Login attempt failed";

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /api/v1/auth/login
///
/// Verify the credentials and install a fresh token pair as cookies.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(input): Json<LoginRequest>,
) -> AppResult<(Extension<SessionReplaced>, CookieJar, Json<DataResponse<User>>)> {
    let user = state
        .store
        .find_users(&UserFilter {
            email: Some(input.email.trim().to_lowercase()),
            ..Default::default()
        })
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| CoreError::Validation(LOGIN_FAILED.into()))?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::info!(user_id = user.id, "Login rejected");
        return Err(CoreError::Validation(LOGIN_FAILED.into()).into());
    }

    let pair = state
        .authenticator
        .issue(user.id)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let jar = session_cookies(&pair, state.config.jwt.cookie_secure)
        .into_iter()
        .fold(jar, |jar, cookie| jar.add(cookie));

    tracing::info!(user_id = user.id, "User logged in");
    Ok((Extension(SessionReplaced), jar, Json(DataResponse::new(user))))
}

/// POST /api/v1/auth/logout
///
/// Clear both session cookies. Returns `false` when nobody was signed in.
pub async fn logout(
    State(state): State<AppState>,
    MaybeUser(user_id): MaybeUser,
    jar: CookieJar,
) -> (Extension<SessionReplaced>, CookieJar, Json<DataResponse<bool>>) {
    let Some(user_id) = user_id else {
        return (Extension(SessionReplaced), jar, Json(DataResponse::new(false)));
    };

    let jar = cleared_cookies(state.config.jwt.cookie_secure)
        .into_iter()
        .fold(jar, |jar, cookie| jar.add(cookie));

    tracing::info!(user_id, "User logged out");
    (Extension(SessionReplaced), jar, Json(DataResponse::new(true)))
}

/// GET /api/v1/auth/me
///
/// The signed-in user, or `null`.
pub async fn whoami(
    State(state): State<AppState>,
    MaybeUser(user_id): MaybeUser,
) -> AppResult<Json<DataResponse<Option<User>>>> {
    let user = match user_id {
        Some(id) => state.store.get_user(id).await?,
        None => None,
    };
    Ok(Json(DataResponse::new(user)))
}
