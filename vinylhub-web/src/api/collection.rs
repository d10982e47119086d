//! Per-user collection endpoints
//!
//! Collections are keyed by a hash of the caller's bearer token, so each
//! login session sees its own shelf. All routes require a bearer token;
//! the list route doubles as the browser collection page, dispatched on
//! the `Accept` header.

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
    routing::{delete, get, patch},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;
use vinylhub_common::{Album, ConditionGrade};

use crate::db::collection;
use crate::error::{ApiError, ApiResult};
use crate::session::{bearer_token, session_key};
use crate::AppState;

/// POST /collection request body
///
/// Album shape with a free-form condition string, validated here so an
/// unknown grade maps to the flat 400 error instead of a serde reject.
#[derive(Debug, Deserialize)]
pub struct AlbumPayload {
    pub id: String,
    pub name: String,
    pub artist: String,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub cover_url: Option<String>,
    #[serde(default)]
    pub spotify_url: String,
    #[serde(default)]
    pub condition: Option<String>,
}

/// PATCH /collection/:id/condition request body
#[derive(Debug, Deserialize)]
pub struct ConditionPayload {
    pub condition: String,
}

/// GET /collection
///
/// Browser navigations get the collection page; API callers get the
/// caller's albums as a JSON array in insertion order.
pub async fn collection_entry(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if super::ui::wants_html(&headers) {
        return super::ui::collection_page().await.into_response();
    }

    list_collection(&state, &headers).await.into_response()
}

/// JSON list handler behind [`collection_entry`]
async fn list_collection(state: &AppState, headers: &HeaderMap) -> ApiResult<Json<Vec<Album>>> {
    let key = require_session(headers)?;
    let albums = collection::list_albums(&state.db, &key).await?;
    Ok(Json(albums))
}

/// POST /collection
///
/// Adds an album to the caller's collection. Duplicates are a 400.
pub async fn add_to_collection(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<AlbumPayload>,
) -> ApiResult<Json<Value>> {
    let key = require_session(&headers)?;

    let condition = payload
        .condition
        .as_deref()
        .map(|s| s.parse::<ConditionGrade>())
        .transpose()
        .map_err(|_| ApiError::BadRequest("Unknown condition grade".to_string()))?;

    let album = Album {
        id: payload.id,
        name: payload.name,
        artist: payload.artist,
        release_date: payload.release_date,
        cover_url: payload.cover_url,
        spotify_url: payload.spotify_url,
        condition,
    };

    let added = collection::add_album(&state.db, &key, &album).await?;
    if !added {
        return Err(ApiError::BadRequest(
            "Album already exists in collection".to_string(),
        ));
    }

    let total = collection::count_albums(&state.db, &key).await?;
    info!(album = %album.name, total = total, "Album added to collection");

    Ok(Json(json!({
        "message": "Album added to collection",
        "total": total,
    })))
}

/// DELETE /collection/:id
///
/// The path segment is the zero-based position in insertion order, not
/// an album ID.
pub async fn remove_from_collection(
    State(state): State<AppState>,
    Path(index): Path<i64>,
    headers: HeaderMap,
) -> ApiResult<Json<Value>> {
    let key = require_session(&headers)?;

    match collection::remove_by_index(&state.db, &key, index).await? {
        Some(album) => {
            info!(album = %album.name, "Album removed from collection");
            Ok(Json(json!({"message": "Removed", "removed": album})))
        }
        None => Err(ApiError::NotFound("Index out of range".to_string())),
    }
}

/// PATCH /collection/:id/condition
///
/// Sets the condition grade on an album the caller already holds.
pub async fn update_condition(
    State(state): State<AppState>,
    Path(album_id): Path<String>,
    headers: HeaderMap,
    Json(payload): Json<ConditionPayload>,
) -> ApiResult<Json<Value>> {
    let key = require_session(&headers)?;

    let grade = payload
        .condition
        .parse::<ConditionGrade>()
        .map_err(|_| ApiError::BadRequest("Unknown condition grade".to_string()))?;

    match collection::set_condition(&state.db, &key, &album_id, grade).await? {
        Some(album) => {
            info!(album = %album.name, condition = %grade, "Condition updated");
            Ok(Json(json!({"message": "Condition updated", "album": album})))
        }
        None => Err(ApiError::NotFound(
            "Album not found in collection".to_string(),
        )),
    }
}

/// Session key from the bearer token, or the collection 401
fn require_session(headers: &HeaderMap) -> Result<String, ApiError> {
    bearer_token(headers)
        .map(session_key)
        .ok_or_else(|| ApiError::Unauthorized("Unauthorized".to_string()))
}

/// Build collection routes
///
/// Both parameterized routes share the `:id` segment name; the router
/// requires one name per position even though the DELETE route reads it
/// as a positional index.
pub fn collection_routes() -> Router<AppState> {
    Router::new()
        .route("/collection", get(collection_entry).post(add_to_collection))
        .route("/collection/:id", delete(remove_from_collection))
        .route("/collection/:id/condition", patch(update_condition))
}
