//! Handlers for the `/notifications` resource.
//!
//! All endpoints require authentication via [`AuthUser`]. The feed is shared
//! by every user; only the unread counter is personal.

use axum::extract::State;
use axum::Json;
use bugboard_core::types::{DbId, Timestamp};
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// One feed entry.
#[derive(Debug, Serialize)]
pub struct NotificationItem {
    pub text: String,
    pub report: Option<DbId>,
    pub notifier: DbId,
    pub created_at: Timestamp,
}

/// Response body of `GET /notifications`.
#[derive(Debug, Serialize)]
pub struct NotificationFeed {
    /// The caller's unread counter.
    pub count: i32,
    pub list: Vec<NotificationItem>,
}

/// GET /api/v1/notifications
///
/// The caller's unread count plus the whole feed, newest first.
pub async fn list_notifications(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<NotificationFeed>>> {
    let count = state.dispatcher.unread_count(auth.user_id).await?;
    let list = state
        .dispatcher
        .list_notifications()
        .await?
        .into_iter()
        .map(|n| NotificationItem {
            text: n.text,
            report: n.report_id,
            notifier: n.notifier_id,
            created_at: n.created_at,
        })
        .collect();

    Ok(Json(DataResponse::new(NotificationFeed { count, list })))
}

/// GET /api/v1/notifications/count
pub async fn notification_count(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<i32>>> {
    let count = state.dispatcher.unread_count(auth.user_id).await?;
    Ok(Json(DataResponse::new(count)))
}

/// POST /api/v1/notifications/reset
///
/// Zero the caller's unread counter.
pub async fn reset_notification_count(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<bool>>> {
    state.dispatcher.mark_read(auth.user_id).await?;
    tracing::debug!(user_id = auth.user_id, "Notification count reset");
    Ok(Json(DataResponse::new(true)))
}
