// HTTP handlers for Gatehouse

pub mod accounts;
pub mod auth;

use axum::{
    http::StatusCode,
    middleware,
    response::{IntoResponse, Json, Response},
    routing::{get, post, put},
    extract::State,
    Router,
};
use serde_json::json;

use crate::{
    app::AppState,
    db::check_diesel_health,
    middleware::{auth_middleware, require_admin},
};

/// Public and protected authentication routes, mounted under /api/v1/auth
pub fn auth_routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/me", get(auth::get_current_account))
        .layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .merge(protected)
}

/// Administrative account routes, mounted under /api/v1/accounts.
/// Layer order matters: the verifier must attach identity before the
/// role gate inspects it, so it goes on last (outermost).
pub fn account_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(accounts::list_accounts))
        .route("/{id}/approve", put(accounts::approve_account))
        .route("/{id}/reject", put(accounts::reject_account))
        .layer(middleware::from_fn(require_admin))
        .layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// GET /api/v1/health - Liveness plus a database round-trip
pub async fn health_check(State(state): State<AppState>) -> Response {
    let database_healthy = match check_diesel_health(&state.diesel_pool).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("database health check failed: {}", e);
            false
        },
    };

    let status = if database_healthy { "healthy" } else { "degraded" };
    let status_code = if database_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let body = json!({
        "status": status,
        "service": "gatehouse-backend",
        "version": env!("CARGO_PKG_VERSION"),
        "components": {
            "database": if database_healthy { "up" } else { "down" },
        },
    });

    (status_code, Json(body)).into_response()
}
