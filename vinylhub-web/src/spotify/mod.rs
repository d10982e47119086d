//! Spotify Web API integration
//!
//! Two clients, one per Spotify host: [`auth::SpotifyAuth`] drives the
//! OAuth authorization-code flow against `accounts.spotify.com`, and
//! [`client::SpotifyClient`] proxies catalog lookups against
//! `api.spotify.com` with the caller's bearer token.

pub mod auth;
pub mod client;

pub use auth::SpotifyAuth;
pub use client::SpotifyClient;

use thiserror::Error;

/// Spotify request error
#[derive(Debug, Error)]
pub enum SpotifyError {
    /// Transport failure before any response arrived
    #[error("Spotify request failed: {0}")]
    Network(String),

    /// Spotify responded with a non-success status
    #[error("Spotify API returned error {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body did not match the expected shape
    #[error("Failed to parse Spotify response: {0}")]
    Parse(String),
}
