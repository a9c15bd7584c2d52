// Authentication handlers: register, login, current-account lookup.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

use crate::{
    app::AppState,
    middleware::auth::AuthenticatedAccount,
    models::account::{Account, Role},
    utils::{auth_errors::AuthError, trim_and_validate_field},
};

// =============================================================================
// REQUEST/RESPONSE TYPES
// =============================================================================

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email format"))]
    #[validate(length(max = 320, message = "Email must be less than 320 characters"))]
    pub email: String,

    #[validate(custom = "validate_password")]
    pub password: String,

    pub password_confirmation: String,

    #[validate(length(
        min = 1,
        max = 255,
        message = "Full name must be between 1 and 255 characters"
    ))]
    pub full_name: String,

    /// Requested role; defaults to "standard". "admin" cannot be
    /// self-assigned through this endpoint.
    pub role: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Public view of an account. The password hash never leaves the store.
#[derive(Debug, Serialize)]
pub struct AccountInfo {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub is_approved: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&Account> for AccountInfo {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            email: account.email.clone(),
            full_name: account.full_name.clone(),
            role: account.role,
            is_approved: account.is_approved,
            created_at: account.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub account: AccountInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    pub token_type: String,
    pub pending_approval: bool,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub account: AccountInfo,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: String,
}

/// Custom password validation - min 8 chars, must have uppercase, lowercase,
/// number, special char
fn validate_password(password: &str) -> Result<(), validator::ValidationError> {
    let has_uppercase = password.chars().any(|c| c.is_uppercase());
    let has_lowercase = password.chars().any(|c| c.is_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_special = password.chars().any(|c| !c.is_alphanumeric());

    if password.len() < 8 {
        return Err(validator::ValidationError::new("password_too_short"));
    }

    if !has_uppercase || !has_lowercase || !has_digit || !has_special {
        return Err(validator::ValidationError::new("password_complexity"));
    }

    Ok(())
}

/// Parse the requested role. Administrative accounts are provisioned out of
/// band, never through public registration.
fn parse_registration_role(role: Option<&str>) -> Result<Role, AuthError> {
    match role {
        None => Ok(Role::Standard),
        Some(s) => match Role::from_str(s) {
            Ok(Role::Admin) => Err(AuthError::Validation(
                "Role 'admin' cannot be self-assigned".to_string(),
            )),
            Ok(role) => Ok(role),
            Err(_) => Err(AuthError::Validation(format!("Unknown role: {}", s))),
        },
    }
}

// =============================================================================
// AUTHENTICATION HANDLERS
// =============================================================================

/// POST /auth/register - Create an account; non-gated roles get a token back
pub async fn register(
    State(state): State<AppState>,
    Json(register_req): Json<RegisterRequest>,
) -> Response {
    if let Err(errors) = register_req.validate() {
        return AuthError::Validation(errors.to_string()).into_response();
    }

    if register_req.password != register_req.password_confirmation {
        return AuthError::Validation("Passwords do not match".to_string()).into_response();
    }

    let full_name = match trim_and_validate_field(&register_req.full_name, true) {
        Ok(name) => name,
        Err(e) => return AuthError::Validation(e).into_response(),
    };

    let role = match parse_registration_role(register_req.role.as_deref()) {
        Ok(role) => role,
        Err(e) => return e.into_response(),
    };

    let registered = match state
        .account_service
        .register(&register_req.email, &register_req.password, full_name, role)
        .await
    {
        Ok(registered) => registered,
        Err(e) => return e.into_response(),
    };

    let pending_approval = registered.account.is_pending_approval();
    let message = if pending_approval {
        "Account created; awaiting administrator approval".to_string()
    } else {
        "Account created".to_string()
    };

    let response = AuthResponse {
        success: true,
        data: Some(RegisterResponse {
            account: AccountInfo::from(&registered.account),
            token: registered.token,
            token_type: "Bearer".to_string(),
            pending_approval,
        }),
        message,
    };

    (StatusCode::CREATED, Json(response)).into_response()
}

/// POST /auth/login - Verify credentials and issue a session token
pub async fn login(
    State(state): State<AppState>,
    Json(login_req): Json<LoginRequest>,
) -> Response {
    // Cheap shape check before touching the store; detailed failures all
    // collapse into InvalidCredentials anyway.
    let email = login_req.email.trim();
    if email.is_empty() || !email.contains('@') {
        return AuthError::InvalidCredentials.into_response();
    }

    let logged_in = match state.account_service.login(email, &login_req.password).await {
        Ok(logged_in) => logged_in,
        Err(e) => return e.into_response(),
    };

    let response = AuthResponse {
        success: true,
        data: Some(LoginResponse {
            token: logged_in.token,
            token_type: "Bearer".to_string(),
            expires_in: logged_in.expires_in,
            account: AccountInfo::from(&logged_in.account),
        }),
        message: "Login successful".to_string(),
    };

    (StatusCode::OK, Json(response)).into_response()
}

/// GET /auth/me - Return the authenticated account
pub async fn get_current_account(
    State(state): State<AppState>,
    identity: AuthenticatedAccount,
) -> Response {
    let account = match state.account_service.find(identity.account_id).await {
        Ok(account) => account,
        // The account vanished after the token was issued; the token no
        // longer identifies anyone.
        Err(AuthError::NotFound) => return AuthError::InvalidToken.into_response(),
        Err(e) => return e.into_response(),
    };

    let response = AuthResponse {
        success: true,
        data: Some(AccountInfo::from(&account)),
        message: "OK".to_string(),
    };

    (StatusCode::OK, Json(response)).into_response()
}
