//! vinylhub-web library interface
//!
//! Exposes the application state and router so integration tests can
//! drive the full HTTP surface without binding a socket.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod session;
pub mod spotify;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::config::SpotifyCredentials;
use crate::spotify::{SpotifyAuth, SpotifyClient};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Spotify Web API client
    pub spotify: Arc<SpotifyClient>,
    /// Spotify OAuth client
    pub auth: Arc<SpotifyAuth>,
    /// Resolved Spotify application credentials
    pub credentials: SpotifyCredentials,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(db: SqlitePool, credentials: SpotifyCredentials) -> Self {
        Self {
            db,
            spotify: Arc::new(SpotifyClient::new()),
            auth: Arc::new(SpotifyAuth::new()),
            credentials,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // UI routes (HTML pages and static assets)
        .merge(api::ui_routes())
        // API routes
        .merge(api::auth_routes())
        .merge(api::search_routes())
        .merge(api::collection_routes())
        .merge(api::health_routes())
        .fallback(api::ui::not_found)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
