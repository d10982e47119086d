//! Album search against the Spotify catalog
//!
//! Both endpoints require the caller's Spotify access token as a bearer
//! header; the server forwards it upstream and never stores it. Results
//! are annotated with whether the caller's collection already holds each
//! album. `/search` doubles as the browser search page, dispatched on
//! the `Accept` header.

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::debug;
use vinylhub_common::{AlbumDetail, SearchResult};

use crate::db::{collection, settings};
use crate::error::{ApiError, ApiResult};
use crate::session::{bearer_token, session_key};
use crate::AppState;

/// Query parameters for album search
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub query: Option<String>,
}

/// GET /search
///
/// Browser navigations (Accept: text/html) get the search page; every
/// other caller gets the JSON search API.
pub async fn search_entry(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
    headers: HeaderMap,
) -> Response {
    if super::ui::wants_html(&headers) {
        return super::ui::search_page().await.into_response();
    }

    search_albums(&state, &headers, params).await.into_response()
}

/// JSON search handler behind [`search_entry`]
async fn search_albums(
    state: &AppState,
    headers: &HeaderMap,
    params: SearchParams,
) -> ApiResult<Json<Vec<SearchResult>>> {
    let token = bearer_token(headers).ok_or_else(not_authenticated)?;

    let query = match params.query.as_deref() {
        Some(query) if !query.trim().is_empty() => query,
        _ => return Err(ApiError::BadRequest("Missing query parameter".to_string())),
    };

    let limit = settings::get_search_result_limit(&state.db).await?;
    let market = settings::get_search_market(&state.db).await?;

    let mut results = state
        .spotify
        .search_albums(token, query, limit, &market)
        .await?;

    // Annotate membership against the caller's stored collection
    let key = session_key(token);
    let owned = collection::album_ids(&state.db, &key).await?;
    for result in &mut results {
        result.in_collection = owned.contains(&result.id);
    }

    debug!(query = %query, count = results.len(), "Album search complete");

    Ok(Json(results))
}

/// GET /album/:id
///
/// Full album detail from the catalog, annotated with membership.
pub async fn album_detail(
    State(state): State<AppState>,
    Path(album_id): Path<String>,
    headers: HeaderMap,
) -> ApiResult<Json<AlbumDetail>> {
    let token = bearer_token(&headers).ok_or_else(not_authenticated)?;

    let mut detail = state.spotify.album_detail(token, &album_id).await?;

    let key = session_key(token);
    detail.in_collection = collection::contains_album(&state.db, &key, &detail.id).await?;

    Ok(Json(detail))
}

fn not_authenticated() -> ApiError {
    ApiError::Unauthorized("Not authenticated: missing or invalid access token".to_string())
}

/// Build search routes
pub fn search_routes() -> Router<AppState> {
    Router::new()
        .route("/search", get(search_entry))
        .route("/album/:id", get(album_detail))
}
