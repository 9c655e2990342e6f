//! Request handlers, one module per resource.

pub mod auth;
pub mod comments;
pub mod notifications;
pub mod profile;
pub mod projects;
pub mod reports;
pub mod users;

use bugboard_core::error::CoreError;
use bugboard_core::types::DbId;
use bugboard_db::models::project::Project;
use bugboard_db::models::report::Report;
use bugboard_db::models::user::User;
use bugboard_db::Store;

use crate::error::AppResult;

pub(crate) async fn load_user(store: &dyn Store, id: DbId) -> AppResult<User> {
    Ok(store
        .get_user(id)
        .await?
        .ok_or(CoreError::NotFound { entity: "user", id })?)
}

pub(crate) async fn load_project(store: &dyn Store, id: DbId) -> AppResult<Project> {
    Ok(store
        .get_project(id)
        .await?
        .ok_or(CoreError::NotFound { entity: "project", id })?)
}

pub(crate) async fn load_report(store: &dyn Store, id: DbId) -> AppResult<Report> {
    Ok(store
        .get_report(id)
        .await?
        .ok_or(CoreError::NotFound { entity: "report", id })?)
}
