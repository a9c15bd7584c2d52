// Authentication and authorization error taxonomy
// Every request-boundary failure is mapped to a structured 4xx/5xx response
// here; internal detail stays in the logs.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Serialize;
use thiserror::Error;

use crate::services::token::TokenError;
use crate::utils::password::PasswordError;

/// Authentication/authorization errors surfaced at the HTTP boundary
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Unknown email and wrong password collapse into this single variant so
    /// the two cases are externally indistinguishable.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account is pending administrator approval")]
    PendingApproval,

    #[error("Missing or invalid authorization header")]
    MissingToken,

    #[error("Invalid or expired token")]
    InvalidToken,

    /// Kept separate from `InvalidToken` for diagnostics; the response body
    /// and status are identical to the invalid case.
    #[error("Invalid or expired token")]
    ExpiredToken,

    #[error("Authentication required")]
    Unauthenticated,

    #[error("Insufficient role for this resource")]
    Forbidden,

    #[error("An account with this email already exists")]
    DuplicateEmail,

    #[error("Resource not found")]
    NotFound,

    #[error("Database error")]
    Database(String),

    #[error("Internal server error")]
    Internal,
}

/// Standard authentication response structure
#[derive(Debug, Serialize)]
pub struct AuthErrorResponse {
    pub success: bool,
    pub error: ErrorDetail,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_approved: Option<bool>,
}

impl AuthError {
    /// Convert to HTTP status code (401 vs 403 semantics preserved)
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Validation(_) => StatusCode::BAD_REQUEST,
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::PendingApproval => StatusCode::FORBIDDEN,
            AuthError::MissingToken => StatusCode::UNAUTHORIZED,
            AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
            AuthError::ExpiredToken => StatusCode::UNAUTHORIZED,
            AuthError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden => StatusCode::FORBIDDEN,
            AuthError::DuplicateEmail => StatusCode::CONFLICT,
            AuthError::NotFound => StatusCode::NOT_FOUND,
            AuthError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Convert to error code string
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::Validation(_) => "VALIDATION_ERROR",
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::PendingApproval => "PENDING_APPROVAL",
            AuthError::MissingToken => "MISSING_TOKEN",
            // Expired and malformed tokens intentionally share one external
            // code; the distinction lives in the logs.
            AuthError::InvalidToken => "INVALID_TOKEN",
            AuthError::ExpiredToken => "INVALID_TOKEN",
            AuthError::Unauthenticated => "UNAUTHENTICATED",
            AuthError::Forbidden => "FORBIDDEN",
            AuthError::DuplicateEmail => "DUPLICATE_EMAIL",
            AuthError::NotFound => "NOT_FOUND",
            AuthError::Database(_) => "SERVER_ERROR",
            AuthError::Internal => "SERVER_ERROR",
        }
    }

    /// Message safe to return to clients. Store/infra detail never leaks.
    pub fn public_message(&self) -> String {
        match self {
            AuthError::Database(_) | AuthError::Internal => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }

    /// Pending-approval responses carry an explicit `is_approved` marker so
    /// clients can distinguish them from role mismatches.
    fn approval_marker(&self) -> Option<bool> {
        match self {
            AuthError::PendingApproval => Some(false),
            _ => None,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> axum::response::Response {
        if let AuthError::Database(detail) = &self {
            tracing::error!(detail = %detail, "database error surfaced at request boundary");
        }

        let status = self.status_code();
        let message = self.public_message();
        let response = AuthErrorResponse {
            success: false,
            error: ErrorDetail {
                code: self.error_code().to_string(),
                description: message.clone(),
                is_approved: self.approval_marker(),
            },
            message,
        };

        (status, Json(response)).into_response()
    }
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => AuthError::ExpiredToken,
            TokenError::Malformed => AuthError::InvalidToken,
            TokenError::Encoding(detail) => {
                tracing::error!(detail = %detail, "token encoding failure");
                AuthError::Internal
            },
            TokenError::Clock(detail) => {
                tracing::error!(detail = %detail, "system clock failure");
                AuthError::Internal
            },
        }
    }
}

impl From<PasswordError> for AuthError {
    fn from(err: PasswordError) -> Self {
        tracing::error!(error = %err, "password hashing failure");
        AuthError::Internal
    }
}

/// Helper function to log authentication failures
pub fn log_auth_failure(email: &str, error: &AuthError) {
    tracing::warn!(
        email = email,
        error_code = error.error_code(),
        "Authentication failure"
    );
}
