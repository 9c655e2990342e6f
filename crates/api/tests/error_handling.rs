//! Tests for `AppError` → HTTP response mapping.
//!
//! These call `IntoResponse` directly on `AppError` values; no server needed.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use bugboard_api::error::AppError;
use bugboard_core::error::CoreError;
use bugboard_db::StoreError;
use bugboard_events::EventsError;
use http_body_util::BodyExt;
use validator::Validate;

/// Convert an `AppError` into its status code and parsed JSON body.
async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn not_found_error_returns_404() {
    let err = AppError::Core(CoreError::NotFound {
        entity: "report",
        id: 42,
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "report with id 42 not found");
}

#[tokio::test]
async fn validation_error_returns_400() {
    let err = AppError::Core(CoreError::Validation("Login attempt failed".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "Login attempt failed");
}

#[tokio::test]
async fn forbidden_error_returns_403() {
    let err = AppError::Core(CoreError::Forbidden("You must be signed in".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["code"], "FORBIDDEN");
    assert_eq!(json["error"], "You must be signed in");
}

#[tokio::test]
async fn unique_violation_returns_409() {
    let err = AppError::Database(StoreError::UniqueViolation("uq_users_email".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "CONFLICT");
    assert!(json["error"].as_str().unwrap().contains("uq_users_email"));
}

#[tokio::test]
async fn internal_error_returns_500_and_sanitizes_message() {
    let err = AppError::InternalError("secret database credentials leaked".into());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");
}

#[tokio::test]
async fn corrupt_event_log_is_sanitized() {
    let err = AppError::Core(CoreError::Internal(
        "Corrupt event log on report 3: expected value".into(),
    ));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "An internal error occurred");
}

#[tokio::test]
async fn events_errors_keep_their_layer() {
    let not_found: AppError = EventsError::Core(CoreError::NotFound {
        entity: "project",
        id: 9,
    })
    .into();
    let (status, _) = error_to_response(not_found).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let store: AppError =
        EventsError::Store(StoreError::UniqueViolation("uq_projects_name".into())).into();
    let (status, _) = error_to_response(store).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[derive(Validate)]
struct SignUp {
    #[validate(email(message = "Email is invalid"))]
    email: String,
    #[validate(length(min = 1, message = "First name is required"))]
    first_name: String,
}

#[tokio::test]
async fn validator_messages_are_joined_in_order() {
    let input = SignUp {
        email: "nope".into(),
        first_name: String::new(),
    };
    let err: AppError = input.validate().unwrap_err().into();

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Email is invalid; First name is required");
}
