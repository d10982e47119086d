//! Spotify OAuth authorization-code flow
//!
//! Builds the user-facing authorize redirect and exchanges the callback
//! code for an access token at `accounts.spotify.com`. The token is handed
//! to the browser, which presents it as a bearer token on every API call;
//! no token is stored server-side.

use std::time::Duration;

use reqwest::{header, Client, Url};
use serde::Deserialize;
use tracing::debug;

use crate::config::SpotifyCredentials;

use super::SpotifyError;

/// Spotify accounts service base URL
const SPOTIFY_ACCOUNTS_URL: &str = "https://accounts.spotify.com";

/// Default timeout for token requests
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// User-Agent header
const USER_AGENT: &str = "VinylHub/0.1.0 (vinyl collection catalog)";

/// OAuth scope requested at login
const OAUTH_SCOPE: &str = "user-read-private";

/// Spotify OAuth client
pub struct SpotifyAuth {
    /// HTTP client for token requests
    http_client: Client,
}

impl SpotifyAuth {
    /// Create new OAuth client
    pub fn new() -> Self {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static(USER_AGENT),
        );

        Self {
            http_client: Client::builder()
                .timeout(DEFAULT_TIMEOUT)
                .default_headers(headers)
                .build()
                .expect("Failed to create HTTP client"),
        }
    }

    /// Build the user-facing authorize URL for the login redirect
    pub fn authorize_url(&self, credentials: &SpotifyCredentials) -> Result<String, SpotifyError> {
        let url = Url::parse_with_params(
            &format!("{}/authorize", SPOTIFY_ACCOUNTS_URL),
            &[
                ("client_id", credentials.client_id.as_str()),
                ("response_type", "code"),
                ("redirect_uri", credentials.redirect_uri.as_str()),
                ("scope", OAUTH_SCOPE),
            ],
        )
        .map_err(|e| SpotifyError::Parse(format!("Failed to build authorize URL: {}", e)))?;

        Ok(url.to_string())
    }

    /// Exchange an authorization code for an access token
    pub async fn exchange_code(
        &self,
        credentials: &SpotifyCredentials,
        code: &str,
    ) -> Result<String, SpotifyError> {
        debug!("Exchanging authorization code for access token");

        let url = format!("{}/api/token", SPOTIFY_ACCOUNTS_URL);

        let response = self
            .http_client
            .post(&url)
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", credentials.redirect_uri.as_str()),
                ("client_id", credentials.client_id.as_str()),
                ("client_secret", credentials.client_secret.as_str()),
            ])
            .send()
            .await
            .map_err(|e| SpotifyError::Network(format!("Spotify token request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(SpotifyError::Status { status, body });
        }

        let tokens: TokenResponse = response.json().await.map_err(|e| {
            SpotifyError::Parse(format!("Failed to parse Spotify token response: {}", e))
        })?;

        Ok(tokens.access_token)
    }
}

// ============================================================================
// Spotify accounts response types
// ============================================================================

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

// ============================================================================
// Tests
// ============================================================================
