//! Spotify catalog client
//!
//! Proxies album search and album detail lookups to the Spotify Web API
//! using the caller's bearer token. Responses are mapped into the domain
//! shapes (`SearchResult`, `AlbumDetail`); `in_collection` is left `false`
//! here and annotated by the handlers against the caller's collection.
//!
//! # API Reference
//! - Endpoint: https://api.spotify.com/v1
//! - Documentation: https://developer.spotify.com/documentation/web-api

use std::time::Duration;

use reqwest::{header, Client};
use serde::Deserialize;
use tracing::debug;

use vinylhub_common::{AlbumDetail, SearchResult, TrackInfo};

use super::SpotifyError;

/// Spotify Web API base URL
const SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";

/// Default timeout for Spotify API requests
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// User-Agent header
const USER_AGENT: &str = "VinylHub/0.1.0 (vinyl collection catalog)";

/// Spotify catalog client
///
/// Holds a pooled `reqwest` client; cheap to clone per request via the
/// application state.
pub struct SpotifyClient {
    /// HTTP client for API requests
    http_client: Client,
}

impl SpotifyClient {
    /// Create new Spotify catalog client
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

    /// Search the catalog for albums
    ///
    /// The query is title-cased before it is sent, matching what the UI
    /// has always submitted. `limit` and `market` come from the settings
    /// table. Non-success responses surface as [`SpotifyError::Status`]
    /// carrying the upstream status and body.
    pub async fn search_albums(
        &self,
        access_token: &str,
        query: &str,
        limit: i64,
        market: &str,
    ) -> Result<Vec<SearchResult>, SpotifyError> {
        debug!(query = %query, "Searching Spotify albums");

        let url = format!("{}/search", SPOTIFY_API_URL);
        let limit = limit.to_string();

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(access_token)
            .query(&[
                ("q", title_case(query).as_str()),
                ("type", "album"),
                ("limit", limit.as_str()),
                ("market", market),
            ])
            .send()
            .await
            .map_err(|e| SpotifyError::Network(format!("Spotify search request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(SpotifyError::Status { status, body });
        }

        let search: SearchResponse = response.json().await.map_err(|e| {
            SpotifyError::Parse(format!("Failed to parse Spotify search response: {}", e))
        })?;

        let results: Vec<SearchResult> = search
            .albums
            .map(|page| page.items.into_iter().map(map_album_item).collect())
            .unwrap_or_default();

        debug!(count = results.len(), "Spotify search complete");

        Ok(results)
    }

    /// Fetch full album detail by catalog ID
    pub async fn album_detail(
        &self,
        access_token: &str,
        album_id: &str,
    ) -> Result<AlbumDetail, SpotifyError> {
        debug!(album_id = %album_id, "Fetching Spotify album detail");

        let url = format!("{}/albums/{}", SPOTIFY_API_URL, album_id);

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| SpotifyError::Network(format!("Spotify album request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(SpotifyError::Status { status, body });
        }

        let detail: AlbumDetailResponse = response.json().await.map_err(|e| {
            SpotifyError::Parse(format!("Failed to parse Spotify album response: {}", e))
        })?;

        Ok(map_album_detail(detail))
    }
}

/// Title-case a search query: first letter of each whitespace-separated
/// word uppercased, the rest lowercased
fn title_case(input: &str) -> String {
    input
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(|c| c.to_lowercase()))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Map one search item into the domain shape
///
/// First-credited artist and largest (first) cover image, like the UI
/// always rendered.
fn map_album_item(item: AlbumItem) -> SearchResult {
    SearchResult {
        id: item.id,
        name: item.name,
        artist: item
            .artists
            .into_iter()
            .next()
            .map(|a| a.name)
            .unwrap_or_default(),
        release_date: item.release_date,
        cover_url: item.images.into_iter().next().map(|i| i.url),
        spotify_url: item.external_urls.spotify,
        in_collection: false,
    }
}

/// Map the album endpoint response into the domain detail shape
fn map_album_detail(detail: AlbumDetailResponse) -> AlbumDetail {
    AlbumDetail {
        id: detail.id,
        name: detail.name,
        artist: detail
            .artists
            .into_iter()
            .next()
            .map(|a| a.name)
            .unwrap_or_default(),
        release_date: detail.release_date,
        cover_url: detail.images.into_iter().next().map(|i| i.url),
        spotify_url: detail.external_urls.spotify,
        label: detail.label,
        popularity: detail.popularity,
        genres: detail.genres,
        tracks: detail
            .tracks
            .items
            .into_iter()
            .map(|t| TrackInfo {
                name: t.name,
                duration_ms: t.duration_ms,
            })
            .collect(),
        in_collection: false,
    }
}

// ============================================================================
// Spotify API response types
// ============================================================================

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    albums: Option<AlbumPage>,
}

#[derive(Debug, Deserialize)]
struct AlbumPage {
    #[serde(default)]
    items: Vec<AlbumItem>,
}

#[derive(Debug, Deserialize)]
struct AlbumItem {
    id: String,
    name: String,
    #[serde(default)]
    artists: Vec<ArtistItem>,
    #[serde(default)]
    release_date: String,
    #[serde(default)]
    images: Vec<ImageItem>,
    #[serde(default)]
    external_urls: ExternalUrls,
}

#[derive(Debug, Deserialize)]
struct ArtistItem {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ImageItem {
    url: String,
}

#[derive(Debug, Default, Deserialize)]
struct ExternalUrls {
    #[serde(default)]
    spotify: String,
}

#[derive(Debug, Deserialize)]
struct AlbumDetailResponse {
    id: String,
    name: String,
    #[serde(default)]
    artists: Vec<ArtistItem>,
    #[serde(default)]
    release_date: String,
    #[serde(default)]
    images: Vec<ImageItem>,
    #[serde(default)]
    external_urls: ExternalUrls,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    popularity: u32,
    #[serde(default)]
    genres: Vec<String>,
    #[serde(default)]
    tracks: TrackPage,
}

#[derive(Debug, Default, Deserialize)]
struct TrackPage {
    #[serde(default)]
    items: Vec<TrackItem>,
}

#[derive(Debug, Deserialize)]
struct TrackItem {
    name: String,
    #[serde(default)]
    duration_ms: u64,
}

// ============================================================================
// Tests
// ============================================================================
