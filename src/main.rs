mod accounts;
mod config;
mod entities;
mod http;
mod models;
mod registry;
mod state;
#[cfg(test)]
mod testing;
mod voting;

use std::sync::Arc;
use std::time::Duration;

use crate::config::ApiConfig;
use crate::state::{AppState, SessionStore};
use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use chrono::Utc;
use migration::MigratorTrait;
use sea_orm::ConnectOptions;
use sea_orm::Database;
use tokio::net::TcpListener;
use tower::Layer;
use tower_http::normalize_path::NormalizePathLayer;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let config = ApiConfig::load().context("Failed to load configuration")?;
    let database = connect_database(&config).await?;
    run_migrations(&database).await?;
    bootstrap_superuser(&config, &database).await?;

    let sessions = Arc::new(SessionStore::new(&config.sessions));
    let app_state = AppState::new(database, sessions, config.chamber.clone());

    let listener = TcpListener::bind(config.server.address())
        .await
        .context("Failed to bind HTTP listener")?;
    let local_addr = listener
        .local_addr()
        .context("Failed to obtain listener address")?;
    info!("Camara API listening on {local_addr}");

    // Applied outside the router so trailing slashes are trimmed before routing
    let app = NormalizePathLayer::trim_trailing_slash().layer(http::router(app_state));
    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server exited with error")?;

    Ok(())
}

fn init_tracing() {
    let default_filter = "info";
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.to_string());
    assert!(!filter.is_empty(), "Tracing filter must not be empty");
    assert!(filter.len() < 256, "Tracing filter length exceeds bounds");

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .compact()
        .init();
}

async fn connect_database(config: &ApiConfig) -> Result<sea_orm::DatabaseConnection> {
    let mut options = ConnectOptions::new(config.database.url.clone());
    options
        .max_connections(config.database.max_connections)
        .sqlx_logging(true)
        .sqlx_logging_level(tracing::log::LevelFilter::Debug)
        .acquire_timeout(Duration::from_secs(10));

    if let Some(min) = config.database.min_connections {
        options.min_connections(min);
    }

    assert!(
        config.database.max_connections >= config.database.min_connections.unwrap_or(1),
        "Max connections must be >= min connections"
    );

    Database::connect(options)
        .await
        .context("Failed to connect to PostgreSQL")
}

async fn run_migrations(database: &sea_orm::DatabaseConnection) -> Result<()> {
    migration::Migrator::up(database, None)
        .await
        .context("Database migrations failed")
}

async fn bootstrap_superuser(
    config: &ApiConfig,
    database: &sea_orm::DatabaseConnection,
) -> Result<()> {
    let Some(bootstrap) = config.bootstrap.as_ref() else {
        warn!("No bootstrap section configured; superuser must already exist");
        return Ok(());
    };

    registry::ensure_superuser(
        database,
        &bootstrap.superuser_username,
        &bootstrap.superuser_password,
        Utc::now(),
    )
    .await
    .context("Failed to bootstrap superuser")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {err}");
        return;
    }
    info!("Shutdown signal received");
}
