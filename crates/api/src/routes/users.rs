use axum::routing::get;
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// GET  /        -> list_users
/// POST /        -> add_user (public)
/// GET  /{id}    -> get_user
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(users::list_users).post(users::add_user))
        .route("/{id}", get(users::get_user))
}
