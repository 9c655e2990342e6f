pub mod auth;
pub mod comments;
pub mod health;
pub mod notifications;
pub mod profile;
pub mod projects;
pub mod reports;
pub mod users;
pub mod ws;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                        login (public)
/// /auth/logout                       logout
/// /auth/me                           whoami (null when anonymous)
///
/// /users                             list, register (register is public)
/// /users/{id}                        get
///
/// /projects                          list, create
/// /projects/{id}                     get
///
/// /reports                           list (?project_id, reporter_id, assignee_id), create
/// /reports/{id}                      get with event log
/// /reports/{id}/comments             list, add
/// /reports/{id}/status               update status (PUT)
/// /reports/{id}/assignee             assign (PUT)
///
/// /comments/{id}                     get
///
/// /notifications                     feed + unread count
/// /notifications/count               unread count
/// /notifications/reset               zero unread count (POST)
///
/// /profile/password                  change password (PUT)
///
/// /ws/reports                        live: new reports
/// /ws/reports/{id}/comments          live: new comments on one report
/// /ws/notifications                  live: every notification
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/projects", projects::router())
        .nest("/reports", reports::router())
        .nest("/comments", comments::router())
        .nest("/notifications", notifications::router())
        .nest("/profile", profile::router())
        .nest("/ws", ws::router())
}
