use axum::routing::put;
use axum::Router;

use crate::handlers::profile;
use crate::state::AppState;

/// Routes mounted at `/profile`.
///
/// ```text
/// PUT /password   -> update_password
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/password", put(profile::update_password))
}
