use axum::routing::get;
use axum::Router;

use crate::handlers::comments;
use crate::state::AppState;

/// Routes mounted at `/comments`.
///
/// Comments are created and listed under their report; this only looks one
/// up by id.
///
/// ```text
/// GET  /{id}    -> get_comment
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}", get(comments::get_comment))
}
