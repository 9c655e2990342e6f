//! Route definitions for the `/notifications` resource.
//!
//! All endpoints require authentication.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::notifications;
use crate::state::AppState;

/// Routes mounted at `/notifications`.
///
/// ```text
/// GET  /        -> list_notifications
/// GET  /count   -> notification_count
/// POST /reset   -> reset_notification_count
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(notifications::list_notifications))
        .route("/count", get(notifications::notification_count))
        .route("/reset", post(notifications::reset_notification_count))
}
