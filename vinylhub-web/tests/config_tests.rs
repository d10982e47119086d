//! Tests for Spotify credential resolution
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.
//! Tests that manipulate VINYLHUB_SPOTIFY_* are marked with #[serial]
//! to ensure they run sequentially, not in parallel.

use serial_test::serial;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use vinylhub_web::config::{resolve_spotify_credentials, SpotifySection, TomlConfig};

async fn setup_test_db() -> SqlitePool {
    let pool = SqlitePoolOptions::new().connect(":memory:").await.unwrap();
    vinylhub_common::db::create_settings_table(&pool)
        .await
        .unwrap();
    pool
}

async fn set_setting(pool: &SqlitePool, key: &str, value: &str) {
    sqlx::query(
        "INSERT OR REPLACE INTO settings (key, value, updated_at) VALUES (?, ?, CURRENT_TIMESTAMP)",
    )
    .bind(key)
    .bind(value)
    .execute(pool)
    .await
    .unwrap();
}

fn clear_spotify_env() {
    std::env::remove_var("VINYLHUB_SPOTIFY_CLIENT_ID");
    std::env::remove_var("VINYLHUB_SPOTIFY_CLIENT_SECRET");
    std::env::remove_var("VINYLHUB_SPOTIFY_REDIRECT_URI");
}

fn toml_with_spotify(id: &str, secret: &str, uri: &str) -> TomlConfig {
    TomlConfig {
        spotify: SpotifySection {
            client_id: Some(id.to_string()),
            client_secret: Some(secret.to_string()),
            redirect_uri: Some(uri.to_string()),
        },
        ..Default::default()
    }
}

// ============================================================================
// Resolution Priority Tests
// ============================================================================

#[tokio::test]
#[serial]
async fn test_database_overrides_env_and_toml() {
    let pool = setup_test_db().await;

    set_setting(&pool, "spotify_client_id", "db-id").await;
    set_setting(&pool, "spotify_client_secret", "db-secret").await;
    set_setting(&pool, "spotify_redirect_uri", "db-uri").await;
    std::env::set_var("VINYLHUB_SPOTIFY_CLIENT_ID", "env-id");

    let toml_config = toml_with_spotify("toml-id", "toml-secret", "toml-uri");

    let credentials = resolve_spotify_credentials(&pool, &toml_config)
        .await
        .unwrap();
    assert_eq!(credentials.client_id, "db-id");
    assert_eq!(credentials.client_secret, "db-secret");
    assert_eq!(credentials.redirect_uri, "db-uri");

    clear_spotify_env();
}

#[tokio::test]
#[serial]
async fn test_env_fallback_when_database_empty() {
    let pool = setup_test_db().await;

    std::env::set_var("VINYLHUB_SPOTIFY_CLIENT_ID", "env-id");
    std::env::set_var("VINYLHUB_SPOTIFY_CLIENT_SECRET", "env-secret");
    std::env::set_var("VINYLHUB_SPOTIFY_REDIRECT_URI", "env-uri");

    let toml_config = toml_with_spotify("toml-id", "toml-secret", "toml-uri");

    let credentials = resolve_spotify_credentials(&pool, &toml_config)
        .await
        .unwrap();
    assert_eq!(credentials.client_id, "env-id");
    assert_eq!(credentials.client_secret, "env-secret");
    assert_eq!(credentials.redirect_uri, "env-uri");

    clear_spotify_env();
}

#[tokio::test]
#[serial]
async fn test_toml_fallback_when_db_and_env_empty() {
    clear_spotify_env();
    let pool = setup_test_db().await;

    let toml_config = toml_with_spotify("toml-id", "toml-secret", "toml-uri");

    let credentials = resolve_spotify_credentials(&pool, &toml_config)
        .await
        .unwrap();
    assert_eq!(credentials.client_id, "toml-id");
    assert_eq!(credentials.client_secret, "toml-secret");
    assert_eq!(credentials.redirect_uri, "toml-uri");
}

#[tokio::test]
#[serial]
async fn test_mixed_sources_resolve_per_credential() {
    clear_spotify_env();
    let pool = setup_test_db().await;

    // ID from database, secret from ENV, redirect URI from TOML
    set_setting(&pool, "spotify_client_id", "db-id").await;
    std::env::set_var("VINYLHUB_SPOTIFY_CLIENT_SECRET", "env-secret");

    let toml_config = TomlConfig {
        spotify: SpotifySection {
            redirect_uri: Some("toml-uri".to_string()),
            ..Default::default()
        },
        ..Default::default()
    };

    let credentials = resolve_spotify_credentials(&pool, &toml_config)
        .await
        .unwrap();
    assert_eq!(credentials.client_id, "db-id");
    assert_eq!(credentials.client_secret, "env-secret");
    assert_eq!(credentials.redirect_uri, "toml-uri");

    clear_spotify_env();
}

#[tokio::test]
#[serial]
async fn test_whitespace_database_value_falls_through() {
    clear_spotify_env();
    let pool = setup_test_db().await;

    // Whitespace-only database value is invalid and must not shadow TOML
    set_setting(&pool, "spotify_client_id", "   ").await;

    let toml_config = toml_with_spotify("toml-id", "toml-secret", "toml-uri");

    let credentials = resolve_spotify_credentials(&pool, &toml_config)
        .await
        .unwrap();
    assert_eq!(credentials.client_id, "toml-id");
}

#[tokio::test]
#[serial]
async fn test_error_when_not_configured() {
    clear_spotify_env();
    let pool = setup_test_db().await;

    let result = resolve_spotify_credentials(&pool, &TomlConfig::default()).await;
    assert!(result.is_err());

    let error_msg = result.unwrap_err().to_string();
    assert!(error_msg.contains("Spotify client ID not configured"));
    assert!(error_msg.contains("VINYLHUB_SPOTIFY_CLIENT_ID"));
    assert!(error_msg.contains("vinylhub.toml"));
    assert!(error_msg.contains("developer.spotify.com"));
}
