//! Database initialization
//!
//! Creates the SQLite database on first run and brings the schema up to
//! date on every start. All DDL is idempotent, so init can run unconditionally.

use crate::Result;
use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};
use std::path::Path;
use tracing::{info, warn};

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Use sqlite options to create database if it doesn't exist
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // Enable foreign keys
    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(&pool)
        .await?;

    // WAL mode lets the UI keep reading while a write is in flight
    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await?;

    // Set busy timeout
    sqlx::query("PRAGMA busy_timeout = 5000")
        .execute(&pool)
        .await?;

    // Run migrations (idempotent - safe to call multiple times)
    create_collection_albums_table(&pool).await?;
    create_settings_table(&pool).await?;

    // Initialize default settings
    init_default_settings(&pool).await?;

    Ok(pool)
}

/// Create the collection_albums table
///
/// One row per album held in a session's collection. `session_key` is the
/// SHA-256 hash of the bearer token, so raw tokens never touch disk.
/// `condition` holds the grading code (`"NM"`, `"VG+"`, ...) or NULL when
/// the owner has not graded the record yet.
pub async fn create_collection_albums_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS collection_albums (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            session_key TEXT NOT NULL,
            album_id TEXT NOT NULL,
            name TEXT NOT NULL,
            artist TEXT NOT NULL,
            release_date TEXT NOT NULL,
            cover_url TEXT,
            spotify_url TEXT NOT NULL,
            condition TEXT,
            added_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            UNIQUE (session_key, album_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Create index for per-session collection listing
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_collection_albums_session ON collection_albums(session_key)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Create the settings table
///
/// Stores application configuration key-value pairs.
pub async fn create_settings_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Initialize or update default settings
///
/// This function ensures all required settings exist with default values.
/// It also handles NULL values by resetting them to defaults.
async fn init_default_settings(pool: &SqlitePool) -> Result<()> {
    // Catalog search settings
    ensure_setting(pool, "search_result_limit", "20").await?;
    ensure_setting(pool, "search_market", "AF").await?;

    info!("Default settings initialized");
    Ok(())
}

/// Ensure a setting exists with the specified default value
///
/// If the setting doesn't exist, it will be created with the default.
/// If the setting exists but has a NULL value, it will be reset to the default.
async fn ensure_setting(pool: &SqlitePool, key: &str, default_value: &str) -> Result<()> {
    // Check if setting exists
    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM settings WHERE key = ?)"
    )
    .bind(key)
    .fetch_one(pool)
    .await?;

    if !exists {
        // Setting doesn't exist - create it
        // Use INSERT OR IGNORE to handle concurrent initialization race conditions
        sqlx::query(
            "INSERT OR IGNORE INTO settings (key, value) VALUES (?, ?)"
        )
        .bind(key)
        .bind(default_value)
        .execute(pool)
        .await?;

        info!("Initialized setting '{}' with default value: {}", key, default_value);
        return Ok(());
    }

    // Check if value is NULL
    let value: Option<String> = sqlx::query_scalar(
        "SELECT value FROM settings WHERE key = ?"
    )
    .bind(key)
    .fetch_one(pool)
    .await?;

    if value.is_none() {
        // Value is NULL - reset to default
        sqlx::query(
            "UPDATE settings SET value = ? WHERE key = ?"
        )
        .bind(default_value)
        .bind(key)
        .execute(pool)
        .await?;

        warn!("Setting '{}' was NULL, reset to default: {}", key, default_value);
    }

    Ok(())
}
