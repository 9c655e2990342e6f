//! Route definitions for the `/reports` resource.
//!
//! All endpoints require authentication.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::{comments, reports};
use crate::state::AppState;

/// Routes mounted at `/reports`.
///
/// ```text
/// GET  /                  -> list_reports
/// POST /                  -> add_report
/// GET  /{id}              -> get_report
/// GET  /{id}/comments     -> list_comments
/// POST /{id}/comments     -> add_comment
/// PUT  /{id}/status       -> update_status
/// PUT  /{id}/assignee     -> assign
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(reports::list_reports).post(reports::add_report))
        .route("/{id}", get(reports::get_report))
        .route(
            "/{id}/comments",
            get(comments::list_comments).post(comments::add_comment),
        )
        .route("/{id}/status", put(reports::update_status))
        .route("/{id}/assignee", put(reports::assign))
}
