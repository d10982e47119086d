//! Spotify OAuth login flow
//!
//! GET /login sends the browser to the Spotify consent page; Spotify
//! sends it back to GET /auth/callback with a one-time code which is
//! exchanged for an access token. The token is handed to the frontend
//! callback page as a query parameter and kept client-side only.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::ApiResult;
use crate::AppState;

/// Query parameters Spotify appends to the callback redirect
#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// GET /login
///
/// Redirects the browser to the Spotify authorization page.
pub async fn login(State(state): State<AppState>) -> ApiResult<Redirect> {
    let url = state.auth.authorize_url(&state.credentials)?;
    info!("Redirecting to Spotify authorization");
    Ok(Redirect::temporary(&url))
}

/// GET /auth/callback
///
/// Exchanges the authorization code for an access token and forwards the
/// browser to the frontend callback page. Failures render as plain HTML
/// since the caller is a browser mid-redirect, not an API client.
pub async fn callback(
    State(state): State<AppState>,
    Query(params): Query<CallbackParams>,
) -> Response {
    let code = match params.code {
        Some(code) if !code.is_empty() => code,
        _ => {
            warn!(
                "Spotify callback without authorization code (error: {:?})",
                params.error
            );
            return (
                StatusCode::BAD_REQUEST,
                Html("<h1>Authorization failed</h1>"),
            )
                .into_response();
        }
    };

    match state.auth.exchange_code(&state.credentials, &code).await {
        Ok(access_token) => {
            info!("Spotify authorization complete");
            Redirect::temporary(&format!("/callback?access_token={}", access_token))
                .into_response()
        }
        Err(e) => {
            warn!("Spotify token exchange failed: {}", e);
            (StatusCode::BAD_GATEWAY, Html("<h1>Failed to get token</h1>")).into_response()
        }
    }
}

/// Build OAuth routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(login))
        .route("/auth/callback", get(callback))
}
