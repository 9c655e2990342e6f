//! Handlers for comments: nested under `/reports/{id}/comments`, plus lookup by id.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use bugboard_core::error::CoreError;
use bugboard_core::notification_text::NotificationKind;
use bugboard_core::report_log::{build_event, ReportAction};
use bugboard_core::types::DbId;
use bugboard_db::models::comment::{Comment, CommentFilter, CreateComment};
use bugboard_db::models::report::UpdateReport;
use bugboard_events::NotificationRequest;
use serde::Deserialize;
use validator::Validate;

use crate::error::AppResult;
use crate::handlers::{load_report, load_user};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /reports/{id}/comments`.
#[derive(Debug, Deserialize, Validate)]
pub struct AddCommentRequest {
    #[validate(length(min = 1, message = "Comment cannot be empty"))]
    pub content: String,
}

/// POST /api/v1/reports/{id}/comments
pub async fn add_comment(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(report_id): Path<DbId>,
    Json(input): Json<AddCommentRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Comment>>)> {
    input.validate()?;
    let store = state.store.as_ref();
    let report = load_report(store, report_id).await?;
    let actor = load_user(store, auth.user_id).await?;

    let event = build_event(&actor.display_name(), &ReportAction::NewComment);
    let events = state.event_log.append(report.id, event).await?;

    let comment = store
        .create_comment(&CreateComment {
            report_id: report.id,
            author_id: actor.id,
            content: input.content,
        })
        .await?;
    store
        .update_report(
            report.id,
            &UpdateReport {
                events: Some(events),
                ..Default::default()
            },
        )
        .await?;

    state
        .dispatcher
        .notify(
            actor.id,
            NotificationRequest {
                kind: NotificationKind::NewComment,
                project_id: report.project_id,
                report_id: Some(report.id),
            },
        )
        .await?;

    tracing::info!(comment_id = comment.id, report_id = report.id, user_id = actor.id, "Comment added");
    Ok((StatusCode::CREATED, Json(DataResponse::new(comment))))
}

/// GET /api/v1/reports/{id}/comments
///
/// Newest first.
pub async fn list_comments(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(report_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Comment>>>> {
    let report = load_report(state.store.as_ref(), report_id).await?;
    let comments = state
        .store
        .find_comments(&CommentFilter {
            report_id: Some(report.id),
        })
        .await?;
    Ok(Json(DataResponse::new(comments)))
}

/// GET /api/v1/comments/{id}
pub async fn get_comment(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Comment>>> {
    let comment = state
        .store
        .get_comment(id)
        .await?
        .ok_or(CoreError::NotFound { entity: "comment", id })?;
    Ok(Json(DataResponse::new(comment)))
}
