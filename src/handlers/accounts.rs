// Administrative account management: listing and approval transitions.
// Every route here sits behind the token verifier plus the admin role gate.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    app::AppState,
    handlers::auth::{AccountInfo, AuthResponse},
    middleware::auth::AuthenticatedAccount,
};

#[derive(Debug, Serialize)]
pub struct AccountListResponse {
    pub accounts: Vec<AccountInfo>,
    pub total: usize,
}

/// GET /accounts - List all accounts
pub async fn list_accounts(
    State(state): State<AppState>,
    admin: AuthenticatedAccount,
) -> Response {
    let accounts = match state.account_service.list().await {
        Ok(accounts) => accounts,
        Err(e) => return e.into_response(),
    };

    tracing::debug!(
        admin_id = %admin.account_id,
        count = accounts.len(),
        "account list requested"
    );

    let infos: Vec<AccountInfo> = accounts.iter().map(AccountInfo::from).collect();
    let total = infos.len();

    let response = AuthResponse {
        success: true,
        data: Some(AccountListResponse {
            accounts: infos,
            total,
        }),
        message: "OK".to_string(),
    };

    (StatusCode::OK, Json(response)).into_response()
}

/// PUT /accounts/{id}/approve - Approve a pending account
pub async fn approve_account(
    State(state): State<AppState>,
    admin: AuthenticatedAccount,
    Path(account_id): Path<Uuid>,
) -> Response {
    let account = match state.account_service.approve(account_id).await {
        Ok(account) => account,
        Err(e) => return e.into_response(),
    };

    tracing::info!(
        admin_id = %admin.account_id,
        account_id = %account.id,
        "account approved"
    );

    let response = AuthResponse {
        success: true,
        data: Some(AccountInfo::from(&account)),
        message: "Account approved".to_string(),
    };

    (StatusCode::OK, Json(response)).into_response()
}

/// PUT /accounts/{id}/reject - Reject an account and deactivate it
pub async fn reject_account(
    State(state): State<AppState>,
    admin: AuthenticatedAccount,
    Path(account_id): Path<Uuid>,
) -> Response {
    let account = match state.account_service.reject(account_id).await {
        Ok(account) => account,
        Err(e) => return e.into_response(),
    };

    tracing::info!(
        admin_id = %admin.account_id,
        account_id = %account.id,
        "account rejected"
    );

    let response = AuthResponse {
        success: true,
        data: Some(AccountInfo::from(&account)),
        message: "Account rejected".to_string(),
    };

    (StatusCode::OK, Json(response)).into_response()
}
