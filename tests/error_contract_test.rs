// External error contract tests: status codes, error codes, and response
// bodies as clients observe them.

use axum::body::to_bytes;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::Value;

use gatehouse_backend::services::token::TokenError;
use gatehouse_backend::utils::auth_errors::AuthError;

async fn response_parts(error: AuthError) -> (StatusCode, Value) {
    let response = error.into_response();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");
    let body: Value = serde_json::from_slice(&bytes).expect("Body should be JSON");
    (status, body)
}

#[tokio::test]
async fn test_expired_and_malformed_tokens_produce_identical_responses() {
    let (expired_status, expired_body) =
        response_parts(AuthError::from(TokenError::Expired)).await;
    let (malformed_status, malformed_body) =
        response_parts(AuthError::from(TokenError::Malformed)).await;

    assert_eq!(expired_status, StatusCode::UNAUTHORIZED);
    assert_eq!(expired_status, malformed_status);
    assert_eq!(expired_body, malformed_body);
    assert_eq!(expired_body["error"]["code"], "INVALID_TOKEN");
}

#[tokio::test]
async fn test_pending_approval_is_403_with_marker() {
    let (status, body) = response_parts(AuthError::PendingApproval).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "PENDING_APPROVAL");
    assert_eq!(body["error"]["is_approved"], false);
}

#[tokio::test]
async fn test_role_mismatch_has_no_approval_marker() {
    let (status, body) = response_parts(AuthError::Forbidden).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "FORBIDDEN");
    assert!(body["error"].get("is_approved").is_none());
}

#[tokio::test]
async fn test_missing_identity_is_401_never_403() {
    let (missing_status, _) = response_parts(AuthError::MissingToken).await;
    let (unauth_status, _) = response_parts(AuthError::Unauthenticated).await;

    assert_eq!(missing_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unauth_status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_database_detail_never_reaches_the_body() {
    let secret_detail = "password authentication failed for host 10.1.2.3";
    let (status, body) = response_parts(AuthError::Database(secret_detail.to_string())).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let serialized = body.to_string();
    assert!(!serialized.contains("10.1.2.3"));
    assert!(!serialized.contains("password authentication"));
    assert_eq!(body["message"], "Internal server error");
}

#[tokio::test]
async fn test_duplicate_email_is_conflict() {
    let (status, body) = response_parts(AuthError::DuplicateEmail).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "DUPLICATE_EMAIL");
}
