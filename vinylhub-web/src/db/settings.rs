//! Settings database operations
//!
//! Get accessors for the settings table following the key-value pattern.
//! Search tuning values fall back to their seeded defaults when missing;
//! credential values are `None` when unset so multi-tier resolution can
//! move on to the next source.

use sqlx::{Pool, Sqlite};
use vinylhub_common::{Error, Result};

/// Get the search result page size
///
/// **Default:** 20
pub async fn get_search_result_limit(db: &Pool<Sqlite>) -> Result<i64> {
    get_setting(db, "search_result_limit")
        .await
        .map(|opt| opt.unwrap_or(20))
}

/// Get the catalog market for searches (ISO 3166-1 alpha-2 code)
///
/// **Default:** "AF"
pub async fn get_search_market(db: &Pool<Sqlite>) -> Result<String> {
    get_setting(db, "search_market")
        .await
        .map(|opt| opt.unwrap_or_else(|| "AF".to_string()))
}

/// Get Spotify client ID from database
///
/// **Returns:** Some(id) if set, None otherwise
pub async fn get_spotify_client_id(db: &Pool<Sqlite>) -> Result<Option<String>> {
    get_setting::<String>(db, "spotify_client_id").await
}

/// Get Spotify client secret from database
pub async fn get_spotify_client_secret(db: &Pool<Sqlite>) -> Result<Option<String>> {
    get_setting::<String>(db, "spotify_client_secret").await
}

/// Get Spotify redirect URI from database
pub async fn get_spotify_redirect_uri(db: &Pool<Sqlite>) -> Result<Option<String>> {
    get_setting::<String>(db, "spotify_redirect_uri").await
}

/// Generic setting getter (internal)
///
/// A NULL value reads the same as a missing key; init resets NULLs to
/// defaults at startup, but a concurrent writer can reintroduce one.
async fn get_setting<T>(db: &Pool<Sqlite>, key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let row: Option<(Option<String>,)> = sqlx::query_as("SELECT value FROM settings WHERE key = ?")
        .bind(key)
        .fetch_optional(db)
        .await
        .map_err(Error::Database)?;

    match row {
        Some((Some(value),)) => {
            let parsed = value
                .parse::<T>()
                .map_err(|e| Error::Config(format!("Parse setting failed: {}", e)))?;
            Ok(Some(parsed))
        }
        _ => Ok(None),
    }
}

// ============================================================================
// Tests
// ============================================================================
