//! Handlers for the `/projects` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use bugboard_core::error::CoreError;
use bugboard_core::types::DbId;
use bugboard_db::models::project::{CreateProject, Project, ProjectFilter, DEFAULT_DEPARTMENT};
use bugboard_db::models::user::UserFilter;
use bugboard_db::StoreError;
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::load_project;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

const PROJECT_EXISTS: &str = "Project already exists";

/// Request body for `POST /projects`.
#[derive(Debug, Deserialize, Validate)]
pub struct AddProjectRequest {
    #[validate(length(min = 1, message = "Project name is required"))]
    pub name: String,
    pub department: Option<String>,
    pub manager_id: Option<DbId>,
    /// Defaults to every registered user.
    pub member_ids: Option<Vec<DbId>>,
}

/// POST /api/v1/projects
pub async fn add_project(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<AddProjectRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Project>>)> {
    input.validate()?;
    let name = input.name.trim().to_string();

    let existing = state
        .store
        .find_projects(&ProjectFilter {
            name: Some(name.clone()),
        })
        .await?;
    if !existing.is_empty() {
        return Err(CoreError::Validation(PROJECT_EXISTS.into()).into());
    }

    if let Some(manager_id) = input.manager_id {
        if state.store.get_user(manager_id).await?.is_none() {
            return Err(CoreError::Validation(format!("Manager {manager_id} does not exist")).into());
        }
    }

    let member_ids = match input.member_ids {
        Some(ids) => {
            let found = state
                .store
                .find_users(&UserFilter {
                    ids: Some(ids.clone()),
                    ..Default::default()
                })
                .await?;
            if let Some(missing) = ids.iter().find(|id| !found.iter().any(|u| u.id == **id)) {
                return Err(CoreError::Validation(format!("Member {missing} does not exist")).into());
            }
            ids
        }
        None => state
            .store
            .find_users(&UserFilter::default())
            .await?
            .into_iter()
            .map(|u| u.id)
            .collect(),
    };

    let department = input
        .department
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| DEFAULT_DEPARTMENT.to_string());

    let project = state
        .store
        .create_project(&CreateProject {
            name,
            department,
            manager_id: input.manager_id,
            member_ids,
        })
        .await
        .map_err(|e| match e {
            StoreError::UniqueViolation(_) => AppError::Core(CoreError::Validation(PROJECT_EXISTS.into())),
            other => other.into(),
        })?;

    tracing::info!(project_id = project.id, user_id = auth.user_id, "Project created");
    Ok((StatusCode::CREATED, Json(DataResponse::new(project))))
}

/// GET /api/v1/projects
pub async fn list_projects(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Project>>>> {
    let projects = state.store.find_projects(&ProjectFilter::default()).await?;
    Ok(Json(DataResponse::new(projects)))
}

/// GET /api/v1/projects/{id}
pub async fn get_project(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Project>>> {
    let project = load_project(state.store.as_ref(), id).await?;
    Ok(Json(DataResponse::new(project)))
}
