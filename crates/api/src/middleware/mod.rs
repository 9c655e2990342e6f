//! Session middleware and the extractors built on it.
//!
//! - [`session::resolve_session`] -- authenticates every request from its
//!   cookies and rotates them when needed.
//! - [`auth::AuthUser`] -- requires a signed-in user.
//! - [`auth::MaybeUser`] -- the signed-in user, if any.

pub mod auth;
pub mod session;
