use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// WebSocket feeds mounted at `/ws`.
///
/// ```text
/// GET /reports                -> reports_feed
/// GET /reports/{id}/comments  -> comments_feed
/// GET /notifications          -> notifications_feed
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/reports", get(ws::reports_feed))
        .route("/reports/{id}/comments", get(ws::comments_feed))
        .route("/notifications", get(ws::notifications_feed))
}
