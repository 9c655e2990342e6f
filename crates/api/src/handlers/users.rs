//! Handlers for the `/users` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use bugboard_core::error::CoreError;
use bugboard_core::types::DbId;
use bugboard_db::models::user::{CreateUser, User, UserFilter};
use bugboard_db::StoreError;
use serde::Deserialize;
use validator::Validate;

use crate::auth::password::{hash_password, validate_password_strength};
use crate::error::{AppError, AppResult};
use crate::handlers::load_user;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

const EMAIL_TAKEN: &str = "This email address is already associated with an account.";

/// Request body for `POST /users`.
#[derive(Debug, Deserialize, Validate)]
pub struct AddUserRequest {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    #[validate(email(message = "Email address is invalid"))]
    pub email: String,
    pub password: String,
}

/// POST /api/v1/users
///
/// Register a new account. Public.
pub async fn add_user(
    State(state): State<AppState>,
    Json(input): Json<AddUserRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<User>>)> {
    input.validate()?;
    validate_password_strength(&input.password).map_err(CoreError::Validation)?;

    let email = input.email.trim().to_lowercase();
    let existing = state
        .store
        .find_users(&UserFilter {
            email: Some(email.clone()),
            ..Default::default()
        })
        .await?;
    if !existing.is_empty() {
        return Err(CoreError::Validation(EMAIL_TAKEN.into()).into());
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = state
        .store
        .create_user(&CreateUser {
            first_name: input.first_name.trim().to_string(),
            last_name: input.last_name.trim().to_string(),
            email,
            password_hash,
        })
        .await
        .map_err(|e| match e {
            StoreError::UniqueViolation(_) => AppError::Core(CoreError::Validation(EMAIL_TAKEN.into())),
            other => other.into(),
        })?;

    tracing::info!(user_id = user.id, "User registered");
    Ok((StatusCode::CREATED, Json(DataResponse::new(user))))
}

/// GET /api/v1/users
pub async fn list_users(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<User>>>> {
    let users = state.store.find_users(&UserFilter::default()).await?;
    Ok(Json(DataResponse::new(users)))
}

/// GET /api/v1/users/{id}
pub async fn get_user(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<User>>> {
    let user = load_user(state.store.as_ref(), id).await?;
    Ok(Json(DataResponse::new(user)))
}
