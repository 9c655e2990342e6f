//! Cookie-based session resolution.

use axum::extract::{Request, State};
use axum::http::header::SET_COOKIE;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use axum_extra::extract::cookie::CookieJar;
use bugboard_core::types::DbId;

use crate::auth::cookies::{session_cookies, ACCESS_COOKIE, REFRESH_COOKIE};
use crate::state::AppState;

/// Identity of the caller, attached to every request's extensions.
#[derive(Debug, Clone, Copy, Default)]
pub struct Session {
    pub user_id: Option<DbId>,
}

/// Response extension set by handlers that end the session or install a new
/// one (logout, login). Rotated cookies for the previous user are then not
/// re-issued on the way out.
#[derive(Debug, Clone, Copy)]
pub struct SessionReplaced;

/// Authenticate the request from its cookies.
///
/// Never rejects: a request without a usable token pair simply carries an
/// anonymous [`Session`]. When the refresh token was used, the new pair is
/// appended to the response as two `Set-Cookie` headers.
pub async fn resolve_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let jar = CookieJar::from_headers(request.headers());
    let access = jar.get(ACCESS_COOKIE).map(|c| c.value().to_owned());
    let refresh = jar.get(REFRESH_COOKIE).map(|c| c.value().to_owned());

    let auth = state
        .authenticator
        .authenticate(access.as_deref(), refresh.as_deref())
        .await;

    request.extensions_mut().insert(Session {
        user_id: auth.user_id,
    });

    let mut response = next.run(request).await;

    if let Some(pair) = auth.rotated {
        if response.extensions().get::<SessionReplaced>().is_some() {
            return response;
        }
        for cookie in session_cookies(&pair, state.config.jwt.cookie_secure) {
            match HeaderValue::from_str(&cookie.to_string()) {
                Ok(value) => {
                    response.headers_mut().append(SET_COOKIE, value);
                }
                Err(e) => tracing::error!(error = %e, "Unencodable session cookie"),
            }
        }
    }

    response
}
