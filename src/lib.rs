// Gatehouse: role-based authentication and authorization service.
//
// Credential store, stateless session tokens, a composable role gate, and an
// administrator approval workflow for partner accounts.

pub mod app;
pub mod app_config;
pub mod db;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod schema;
pub mod services;
pub mod utils;

use axum::http::{header, HeaderValue, Method};
use axum::{routing::get, Router};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use app::AppState;

/// Build the CORS layer from configuration. A single "*" entry opens the
/// surface up for development; anything else is an explicit origin list.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let methods = [Method::GET, Method::POST, Method::PUT, Method::OPTIONS];
    let headers = [header::AUTHORIZATION, header::CONTENT_TYPE];

    if allowed_origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(headers)
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(methods)
            .allow_headers(headers)
    }
}

/// Assemble the full application router
pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .nest("/auth", handlers::auth_routes(state.clone()))
        .nest("/accounts", handlers::account_routes(state.clone()))
        .route("/health", get(handlers::health_check));

    Router::new()
        .nest("/api/v1", api)
        .layer(cors_layer(&app_config::config().cors_allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
