// ABOUTME: FitFlow server binary entry point
// ABOUTME: Loads configuration, runs migrations, and serves the HTTP API

//! FitFlow server binary

#![allow(clippy::doc_markdown)]

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;

use fitflow_server::auth::AuthManager;
use fitflow_server::config::environment::ServerConfig;
use fitflow_server::database::Database;
use fitflow_server::logging;
use fitflow_server::routes::{self, ServerResources};

#[derive(Parser)]
#[command(
    name = "fitflow-server",
    about = "FitFlow fitness tracking API server",
    version
)]
struct Args {
    /// Override the HTTP port from the environment
    #[arg(long)]
    port: Option<u16>,

    /// Override the bind address from the environment
    #[arg(long)]
    host: Option<String>,

    /// Override the database URL from the environment
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logging::init_from_env().context("Failed to initialize logging")?;

    let mut config = ServerConfig::from_env().context("Failed to load configuration")?;
    if let Some(port) = args.port {
        config.http_port = port;
    }
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(database_url) = args.database_url {
        config.database_url = database_url;
    }

    info!("{}", config.summary());

    let database = Database::new(&config.database_url)
        .await
        .context("Failed to open database")?;
    let auth_manager = AuthManager::new(&config.auth.jwt_secret, config.auth.jwt_expiry_hours);

    let resources = Arc::new(ServerResources::new(database, auth_manager, config.clone()));
    let app = routes::router(resources);

    let addr = format!("{}:{}", config.host, config.http_port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("FitFlow server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {error}");
        return;
    }
    info!("Shutdown signal received");
}
