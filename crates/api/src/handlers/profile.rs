//! Handlers for the signed-in user's own profile.

use axum::extract::State;
use axum::Json;
use bugboard_core::error::CoreError;
use bugboard_db::models::user::UpdateUser;
use serde::Deserialize;

use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{AppError, AppResult};
use crate::handlers::load_user;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `PUT /profile/password`.
#[derive(Debug, Deserialize)]
pub struct UpdatePasswordRequest {
    pub old_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

/// PUT /api/v1/profile/password
pub async fn update_password(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpdatePasswordRequest>,
) -> AppResult<Json<DataResponse<bool>>> {
    if input.new_password != input.confirm_password {
        return Err(CoreError::Validation("Passwords do not match".into()).into());
    }
    validate_password_strength(&input.new_password).map_err(CoreError::Validation)?;

    let user = load_user(state.store.as_ref(), auth.user_id).await?;
    let old_matches = verify_password(&input.old_password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !old_matches {
        return Err(CoreError::Forbidden("Old password is incorrect".into()).into());
    }

    let password_hash = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    state
        .store
        .update_user(
            user.id,
            &UpdateUser {
                password_hash: Some(password_hash),
                ..Default::default()
            },
        )
        .await?;

    tracing::info!(user_id = user.id, "Password changed");
    Ok(Json(DataResponse::new(true)))
}
