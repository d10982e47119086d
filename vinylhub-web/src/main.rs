//! vinylhub-web - Vinyl record collection catalog server
//!
//! Serves the VinylHub browser UI and JSON API from a single binary:
//! Spotify OAuth login, album search proxied to the Spotify Web API,
//! and per-session record collections stored in SQLite.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vinylhub_web::config::{self, Args};
use vinylhub_web::{build_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse();

    // Load TOML config before tracing so [logging] can set the default filter
    let toml_config = config::load_toml_config(args.config.as_deref())?;

    // Initialize tracing; RUST_LOG overrides the configured level
    let default_filter = if toml_config.logging.level.is_empty() {
        "vinylhub_web=debug,tower_http=debug".to_string()
    } else {
        format!(
            "vinylhub_web={},tower_http={}",
            toml_config.logging.level, toml_config.logging.level
        )
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting VinylHub web server v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    // Resolve the data folder and open the database
    let data_folder = config::resolve_data_folder(args.data_folder.as_deref(), &toml_config);
    vinylhub_common::config::ensure_data_folder(&data_folder)
        .context("Failed to initialize data folder")?;

    let db_path = vinylhub_common::config::database_path(&data_folder);
    info!("Database: {}", db_path.display());

    let db = vinylhub_common::db::init_database(&db_path)
        .await
        .context("Failed to initialize database")?;
    info!("Database connection established");

    // Resolve Spotify credentials (database > environment > TOML)
    let credentials = config::resolve_spotify_credentials(&db, &toml_config).await?;

    // Create application state and router
    let state = AppState::new(db, credentials);
    let app = build_router(state);

    // Start server
    let port = config::resolve_port(args.port, &toml_config);
    let addr = SocketAddr::from(([127, 0, 0, 1], port));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("Listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
