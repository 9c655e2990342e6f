//! Handlers for the `/reports` resource.
//!
//! Every mutation follows the same sequence: resolve the report, build the
//! timeline event, append it to the report's log, persist the report, then
//! dispatch the notification.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use bugboard_core::error::CoreError;
use bugboard_core::notification_text::NotificationKind;
use bugboard_core::report::{ReportStatus, Severity};
use bugboard_core::report_log::{build_event, ReportAction, ReportEvent};
use bugboard_core::types::DbId;
use bugboard_db::models::report::{CreateReport, Report, ReportFilter, UpdateReport};
use bugboard_events::{EventLog, NotificationRequest};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::AppResult;
use crate::handlers::{load_project, load_report, load_user};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /reports`.
#[derive(Debug, Deserialize, Validate)]
pub struct AddReportRequest {
    pub project_id: DbId,
    #[validate(length(min = 1, message = "Bug summary is required"))]
    pub bug: String,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub reproduce_steps: Vec<String>,
}

/// Query parameters for `GET /reports`.
#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    pub project_id: Option<DbId>,
    pub reporter_id: Option<DbId>,
    pub assignee_id: Option<DbId>,
}

/// Request body for `PUT /reports/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: ReportStatus,
}

/// Request body for `PUT /reports/{id}/assignee`.
#[derive(Debug, Deserialize)]
pub struct AssignRequest {
    pub user_id: DbId,
}

/// A report together with its decoded timeline.
#[derive(Debug, Serialize)]
pub struct ReportDetail {
    #[serde(flatten)]
    pub report: Report,
    pub events: Vec<ReportEvent>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/reports
pub async fn add_report(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<AddReportRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Report>>)> {
    input.validate()?;
    let store = state.store.as_ref();

    let project = load_project(store, input.project_id).await?;
    let actor = load_user(store, auth.user_id).await?;

    let event = build_event(&actor.display_name(), &ReportAction::InitReport);
    let events = EventLog::new_log(event)?;

    let report = store
        .create_report(&CreateReport {
            project_id: project.id,
            reporter_id: actor.id,
            bug: input.bug.trim().to_string(),
            details: input.details,
            status: ReportStatus::Open.to_string(),
            severity: input.severity.to_string(),
            reproduce_steps: input.reproduce_steps,
            events,
        })
        .await?;
    store.increment_report_count(actor.id).await?;

    state
        .dispatcher
        .notify(
            actor.id,
            NotificationRequest {
                kind: NotificationKind::NewReport,
                project_id: project.id,
                report_id: Some(report.id),
            },
        )
        .await?;

    tracing::info!(report_id = report.id, project_id = project.id, user_id = actor.id, "Report filed");
    Ok((StatusCode::CREATED, Json(DataResponse::new(report))))
}

/// GET /api/v1/reports
///
/// Most recently updated first.
pub async fn list_reports(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ReportQuery>,
) -> AppResult<Json<DataResponse<Vec<Report>>>> {
    let reports = state
        .store
        .find_reports(&ReportFilter {
            project_id: params.project_id,
            reporter_id: params.reporter_id,
            assignee_id: params.assignee_id,
        })
        .await?;
    Ok(Json(DataResponse::new(reports)))
}

/// GET /api/v1/reports/{id}
pub async fn get_report(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ReportDetail>>> {
    let report = load_report(state.store.as_ref(), id).await?;
    let events = bugboard_events::event_log::decode(&report)?;
    Ok(Json(DataResponse::new(ReportDetail { report, events })))
}

/// PUT /api/v1/reports/{id}/status
pub async fn update_status(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateStatusRequest>,
) -> AppResult<Json<DataResponse<Report>>> {
    let store = state.store.as_ref();
    let report = load_report(store, id).await?;
    let actor = load_user(store, auth.user_id).await?;

    let event = build_event(&actor.display_name(), &ReportAction::StatusAction(input.status));
    let events = state.event_log.append(report.id, event).await?;

    store
        .update_report(
            report.id,
            &UpdateReport {
                status: Some(input.status.to_string()),
                events: Some(events),
                ..Default::default()
            },
        )
        .await?;

    if input.status == ReportStatus::Closed && report.status != ReportStatus::Closed.as_str() {
        store.increment_fixed_count(actor.id).await?;
    }

    state
        .dispatcher
        .notify(
            actor.id,
            NotificationRequest {
                kind: NotificationKind::StatusUpdate(input.status),
                project_id: report.project_id,
                report_id: Some(report.id),
            },
        )
        .await?;

    tracing::info!(report_id = report.id, user_id = actor.id, status = %input.status, "Report status changed");
    let updated = load_report(store, report.id).await?;
    Ok(Json(DataResponse::new(updated)))
}

/// PUT /api/v1/reports/{id}/assignee
///
/// Only the project manager may assign; on projects without a manager the
/// reporter may.
pub async fn assign(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<AssignRequest>,
) -> AppResult<Json<DataResponse<Report>>> {
    let store = state.store.as_ref();
    let report = load_report(store, id).await?;
    let project = load_project(store, report.project_id).await?;

    let allowed = match project.manager_id {
        Some(manager_id) => manager_id == auth.user_id,
        None => report.reporter_id == auth.user_id,
    };
    if !allowed {
        tracing::info!(report_id = report.id, user_id = auth.user_id, "Assignment refused");
        return Err(CoreError::Forbidden("You are not allowed to assign this issue".into()).into());
    }

    let actor = load_user(store, auth.user_id).await?;
    let assignee = load_user(store, input.user_id).await?;
    let assignee_name = assignee.display_name();

    let event = build_event(
        &actor.display_name(),
        &ReportAction::NewAssignment(assignee_name.clone()),
    );
    let events = state.event_log.append(report.id, event).await?;

    store
        .update_report(
            report.id,
            &UpdateReport {
                assignee_id: Some(assignee.id),
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
                kind: NotificationKind::NewAssignment(assignee_name),
                project_id: project.id,
                report_id: Some(report.id),
            },
        )
        .await?;

    tracing::info!(report_id = report.id, assignee_id = assignee.id, user_id = actor.id, "Report assigned");
    let updated = load_report(store, report.id).await?;
    Ok(Json(DataResponse::new(updated)))
}
