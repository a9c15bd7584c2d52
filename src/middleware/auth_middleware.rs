// Token verifier middleware for protected routes
// Validates the bearer token and injects AuthenticatedAccount into request
// extensions. Idempotent; no side effects beyond the context attachment.

use axum::{
    body::Body,
    extract::{FromRequestParts, State},
    http::{header, request::Parts, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::{
    app::AppState, middleware::auth::AuthenticatedAccount, services::token::TokenError,
    utils::auth_errors::AuthError,
};

/// Middleware that verifies the session token and attaches identity
pub async fn auth_middleware(
    State(app_state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) if header.starts_with("Bearer ") => &header[7..],
        _ => {
            return AuthError::MissingToken.into_response();
        },
    };

    match app_state.token_service.verify_session_token(token) {
        Ok(claims) => {
            let account_id = match Uuid::parse_str(&claims.sub) {
                Ok(id) => id,
                Err(_) => {
                    tracing::warn!("token subject is not a valid account id");
                    return AuthError::InvalidToken.into_response();
                },
            };

            let identity = AuthenticatedAccount {
                account_id,
                role: claims.role,
                token_id: claims.jti,
                exp: claims.exp,
            };

            request.extensions_mut().insert(identity);
            next.run(request).await
        },
        Err(e) => {
            // Expired and malformed diverge only here, in the logs; the
            // response is the same 401 for both.
            match &e {
                TokenError::Expired => tracing::debug!("rejected expired session token"),
                other => tracing::warn!("token verification failed: {}", other),
            }
            AuthError::from(e).into_response()
        },
    }
}

/// Extractor for AuthenticatedAccount from request extensions.
/// Rejects with 401 when used on a route the verifier did not run on.
impl<S> FromRequestParts<S> for AuthenticatedAccount
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedAccount>()
            .cloned()
            .ok_or_else(|| AuthError::Unauthenticated.into_response())
    }
}
