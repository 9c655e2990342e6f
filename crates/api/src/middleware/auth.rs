//! Extractors over the [`Session`] resolved by the session middleware.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use bugboard_core::error::CoreError;
use bugboard_core::types::DbId;

use crate::error::AppError;
use crate::middleware::session::Session;
use crate::state::AppState;

fn session_user(parts: &Parts) -> Option<DbId> {
    parts
        .extensions
        .get::<Session>()
        .and_then(|session| session.user_id)
}

/// The signed-in user. Anonymous requests are rejected with 403.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: DbId,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user_id = session_user(parts).ok_or_else(|| {
            AppError::Core(CoreError::Forbidden("You must be signed in".into()))
        })?;
        Ok(AuthUser { user_id })
    }
}

/// The signed-in user, or `None` for anonymous requests.
#[derive(Debug, Clone, Copy)]
pub struct MaybeUser(pub Option<DbId>);

impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(session_user(parts)))
    }
}
