// Gatehouse server entry point

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use gatehouse_backend::{
    app_config,
    build_router,
    db::{self, DieselDatabaseConfig},
    services::TokenService,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Force the full configuration to load now; a bad environment should
    // abort here, not on the first request.
    let config = app_config::config();
    info!(
        environment = %config.environment,
        "starting gatehouse-backend v{}",
        env!("CARGO_PKG_VERSION")
    );
    info!(
        "database: {}",
        db::mask_connection_string(&config.database_url)
    );

    let pool = db::create_diesel_pool(DieselDatabaseConfig::default())
        .await
        .map_err(|e| anyhow::anyhow!("failed to create database pool: {}", e))?;

    db::run_migrations()
        .await
        .map_err(|e| anyhow::anyhow!("migration failure: {}", e))?;

    let state = AppState::new(pool, TokenService::from_env());
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_address)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_address))?;

    info!("listening on {}", config.bind_address);

    axum::serve(listener, router)
        .await
        .context("server terminated")?;

    Ok(())
}
