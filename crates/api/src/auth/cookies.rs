//! Cookies carrying the session token pair.

use axum_extra::extract::cookie::{Cookie, SameSite};
use cookie::time::Duration;

use crate::auth::authenticator::TokenPair;
use crate::auth::jwt::{ACCESS_TOKEN_TTL_SECS, REFRESH_TOKEN_TTL_SECS};

pub const ACCESS_COOKIE: &str = "accessToken";
pub const REFRESH_COOKIE: &str = "refreshToken";

fn session_cookie(name: &'static str, value: String, max_age_secs: i64, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value))
        .http_only(true)
        .path("/")
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(Duration::seconds(max_age_secs))
        .build()
}

/// The two cookies that install `pair` in the browser.
pub fn session_cookies(pair: &TokenPair, secure: bool) -> [Cookie<'static>; 2] {
    [
        session_cookie(ACCESS_COOKIE, pair.access_token.clone(), ACCESS_TOKEN_TTL_SECS, secure),
        session_cookie(REFRESH_COOKIE, pair.refresh_token.clone(), REFRESH_TOKEN_TTL_SECS, secure),
    ]
}

/// Expired, empty versions of both cookies.
pub fn cleared_cookies(secure: bool) -> [Cookie<'static>; 2] {
    [ACCESS_COOKIE, REFRESH_COOKIE].map(|name| {
        let mut cookie = session_cookie(name, String::new(), 0, secure);
        cookie.make_removal();
        cookie
    })
}
