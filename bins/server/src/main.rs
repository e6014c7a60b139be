//! Tally API Server
//!
//! Main entry point for the Tally backend service.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tally_api::{AppState, create_router};
use tally_db::connect;
use tally_shared::{AppConfig, JwtConfig, JwtService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tally=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let db = connect();

    let jwt_service = JwtService::new(JwtConfig::from(&config.jwt));
    info!(
        access_token_expiry_secs = config.jwt.access_token_expiry_secs,
        admin_emails = config.admin.emails.len(),
        share_token_ttl_hours = config.sharing.token_ttl_hours,
        "Services configured"
    );

    let state = AppState {
        db,
        jwt_service: Arc::new(jwt_service),
        admin: Arc::new(config.admin.clone()),
        sharing: config.sharing.clone(),
    };

    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            error!(error = %e, "Failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
