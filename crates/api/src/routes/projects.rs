use axum::routing::get;
use axum::Router;

use crate::handlers::projects;
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET  /        -> list_projects
/// POST /        -> add_project
/// GET  /{id}    -> get_project
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(projects::list_projects).post(projects::add_project))
        .route("/{id}", get(projects::get_project))
}
