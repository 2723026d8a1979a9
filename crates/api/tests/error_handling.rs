//! Tests for the `AppError` to HTTP response mapping.
//!
//! Exercises `IntoResponse` directly, without a running router, so each
//! error variant's status code and JSON body can be asserted in isolation.

use assert_matches::assert_matches;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;

use bridgelane_api::error::AppError;
use bridgelane_core::error::CoreError;

/// Render an error and return (status, parsed JSON body).
async fn render(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn not_found_maps_to_404_with_entity_and_id() {
    let err = AppError::Core(CoreError::NotFound {
        entity: "Proposal",
        id: 42,
    });
    let (status, json) = render(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Proposal with id 42 not found");
}

#[tokio::test]
async fn validation_maps_to_400() {
    let err = AppError::Core(CoreError::Validation(
        "amount must be a positive number".into(),
    ));
    let (status, json) = render(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "amount must be a positive number");
}

#[tokio::test]
async fn invalid_state_maps_to_409_naming_the_status() {
    let err = AppError::Core(CoreError::InvalidState {
        action: "accept",
        entity: "proposal",
        status: "finalized".into(),
    });
    let (status, json) = render(err).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "INVALID_STATE");
    assert_eq!(json["error"], "Cannot accept proposal with status finalized");
}

#[tokio::test]
async fn unauthorized_and_forbidden_map_to_401_and_403() {
    let (status, json) = render(AppError::Core(CoreError::Unauthorized(
        "Invalid or expired token".into(),
    )))
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["code"], "UNAUTHORIZED");

    let (status, json) = render(AppError::Core(CoreError::Forbidden(
        "supervisors only".into(),
    )))
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["code"], "FORBIDDEN");
}

#[tokio::test]
async fn internal_errors_are_sanitized() {
    let (status, json) =
        render(AppError::InternalError("connection pool exhausted".into())).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    // The underlying detail must not leak to the client.
    assert_eq!(json["error"], "An internal error occurred");
}

#[tokio::test]
async fn row_not_found_maps_to_404() {
    let (status, json) = render(AppError::Database(sqlx::Error::RowNotFound)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
}

#[tokio::test]
async fn core_errors_convert_via_from() {
    let err: AppError = CoreError::Validation("bad input".into()).into();
    assert_matches!(err, AppError::Core(CoreError::Validation(_)));
}
