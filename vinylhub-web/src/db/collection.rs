//! Collection database operations
//!
//! One collection per session key, ordered by insertion (`ORDER BY id`).
//! The positional index used by removal is the zero-based offset within
//! that order, so the stored collection keeps the list semantics the API
//! exposes.

use std::collections::HashSet;

use sqlx::{Row, SqlitePool};
use vinylhub_common::{Album, ConditionGrade, Result};

/// List a session's albums in insertion order
pub async fn list_albums(pool: &SqlitePool, session_key: &str) -> Result<Vec<Album>> {
    let rows = sqlx::query(
        r#"
        SELECT album_id, name, artist, release_date, cover_url, spotify_url, condition
        FROM collection_albums
        WHERE session_key = ?
        ORDER BY id
        "#,
    )
    .bind(session_key)
    .fetch_all(pool)
    .await?;

    rows.iter().map(map_album_row).collect()
}

/// Add an album to a session's collection
///
/// Returns `false` when the session already holds the album (unique on
/// session + album ID).
pub async fn add_album(pool: &SqlitePool, session_key: &str, album: &Album) -> Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT INTO collection_albums
            (session_key, album_id, name, artist, release_date, cover_url, spotify_url, condition)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(session_key, album_id) DO NOTHING
        "#,
    )
    .bind(session_key)
    .bind(&album.id)
    .bind(&album.name)
    .bind(&album.artist)
    .bind(&album.release_date)
    .bind(&album.cover_url)
    .bind(&album.spotify_url)
    .bind(album.condition.map(|c| c.code()))
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Number of albums a session holds
pub async fn count_albums(pool: &SqlitePool, session_key: &str) -> Result<i64> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM collection_albums WHERE session_key = ?")
            .bind(session_key)
            .fetch_one(pool)
            .await?;

    Ok(count)
}

/// Set of album IDs a session holds, for membership annotation
pub async fn album_ids(pool: &SqlitePool, session_key: &str) -> Result<HashSet<String>> {
    let ids: Vec<(String,)> =
        sqlx::query_as("SELECT album_id FROM collection_albums WHERE session_key = ?")
            .bind(session_key)
            .fetch_all(pool)
            .await?;

    Ok(ids.into_iter().map(|(id,)| id).collect())
}

/// Whether a session already holds the album
pub async fn contains_album(pool: &SqlitePool, session_key: &str, album_id: &str) -> Result<bool> {
    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM collection_albums WHERE session_key = ? AND album_id = ?)",
    )
    .bind(session_key)
    .bind(album_id)
    .fetch_one(pool)
    .await?;

    Ok(exists)
}

/// Remove the album at a zero-based position in insertion order
///
/// Returns the removed album, or `None` when the index is out of range.
pub async fn remove_by_index(
    pool: &SqlitePool,
    session_key: &str,
    index: i64,
) -> Result<Option<Album>> {
    if index < 0 {
        return Ok(None);
    }

    let mut tx = pool.begin().await?;

    let row = sqlx::query(
        r#"
        SELECT id, album_id, name, artist, release_date, cover_url, spotify_url, condition
        FROM collection_albums
        WHERE session_key = ?
        ORDER BY id
        LIMIT 1 OFFSET ?
        "#,
    )
    .bind(session_key)
    .bind(index)
    .fetch_optional(&mut *tx)
    .await?;

    let row = match row {
        Some(row) => row,
        None => return Ok(None),
    };

    let row_id: i64 = row.get("id");
    let album = map_album_row(&row)?;

    let result = sqlx::query("DELETE FROM collection_albums WHERE id = ?")
        .bind(row_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    // A concurrent removal can take the row between the SELECT and the
    // DELETE; report a removal only when this DELETE took it.
    if result.rows_affected() == 0 {
        return Ok(None);
    }

    Ok(Some(album))
}

/// Set the condition grade on a session's album
///
/// Returns the updated album, or `None` when the session does not hold it.
pub async fn set_condition(
    pool: &SqlitePool,
    session_key: &str,
    album_id: &str,
    condition: ConditionGrade,
) -> Result<Option<Album>> {
    let result = sqlx::query(
        "UPDATE collection_albums SET condition = ? WHERE session_key = ? AND album_id = ?",
    )
    .bind(condition.code())
    .bind(session_key)
    .bind(album_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    let row = sqlx::query(
        r#"
        SELECT album_id, name, artist, release_date, cover_url, spotify_url, condition
        FROM collection_albums
        WHERE session_key = ? AND album_id = ?
        "#,
    )
    .bind(session_key)
    .bind(album_id)
    .fetch_one(pool)
    .await?;

    map_album_row(&row).map(Some)
}

/// Map a collection row into the domain shape
fn map_album_row(row: &sqlx::sqlite::SqliteRow) -> Result<Album> {
    let condition: Option<String> = row.get("condition");

    Ok(Album {
        id: row.get("album_id"),
        name: row.get("name"),
        artist: row.get("artist"),
        release_date: row.get("release_date"),
        cover_url: row.get("cover_url"),
        spotify_url: row.get("spotify_url"),
        condition: condition.map(|c| c.parse::<ConditionGrade>()).transpose()?,
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup_test_db() -> SqlitePool {
        let pool = SqlitePool::connect(":memory:").await.unwrap();
        vinylhub_common::db::create_collection_albums_table(&pool)
            .await
            .unwrap();
        pool
    }

    fn sample_album(id: &str, name: &str) -> Album {
        Album {
            id: id.to_string(),
            name: name.to_string(),
            artist: "John Coltrane".to_string(),
            release_date: "1958-01-15".to_string(),
            cover_url: Some(format!("https://i.scdn.co/image/{}", id)),
            spotify_url: format!("https://open.spotify.com/album/{}", id),
            condition: None,
        }
    }

    #[tokio::test]
    async fn test_add_and_list_keeps_insertion_order() {
        let pool = setup_test_db().await;

        assert!(add_album(&pool, "k1", &sample_album("a1", "Blue Train")).await.unwrap());
        assert!(add_album(&pool, "k1", &sample_album("a2", "Giant Steps")).await.unwrap());
        assert!(add_album(&pool, "k1", &sample_album("a3", "A Love Supreme")).await.unwrap());

        let albums = list_albums(&pool, "k1").await.unwrap();
        let names: Vec<&str> = albums.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Blue Train", "Giant Steps", "A Love Supreme"]);
        assert_eq!(count_albums(&pool, "k1").await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_duplicate_add_returns_false() {
        let pool = setup_test_db().await;

        assert!(add_album(&pool, "k1", &sample_album("a1", "Blue Train")).await.unwrap());
        assert!(!add_album(&pool, "k1", &sample_album("a1", "Blue Train")).await.unwrap());

        // Same album under another session is a separate collection
        assert!(add_album(&pool, "k2", &sample_album("a1", "Blue Train")).await.unwrap());
        assert_eq!(count_albums(&pool, "k1").await.unwrap(), 1);
        assert_eq!(count_albums(&pool, "k2").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_remove_by_index_returns_removed_album() {
        let pool = setup_test_db().await;

        add_album(&pool, "k1", &sample_album("a1", "Blue Train")).await.unwrap();
        add_album(&pool, "k1", &sample_album("a2", "Giant Steps")).await.unwrap();
        add_album(&pool, "k1", &sample_album("a3", "A Love Supreme")).await.unwrap();

        let removed = remove_by_index(&pool, "k1", 1).await.unwrap().unwrap();
        assert_eq!(removed.name, "Giant Steps");

        let names: Vec<String> = list_albums(&pool, "k1")
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.name)
            .collect();
        assert_eq!(names, vec!["Blue Train", "A Love Supreme"]);
    }

    #[tokio::test]
    async fn test_remove_out_of_range_returns_none() {
        let pool = setup_test_db().await;
        add_album(&pool, "k1", &sample_album("a1", "Blue Train")).await.unwrap();

        assert!(remove_by_index(&pool, "k1", 1).await.unwrap().is_none());
        assert!(remove_by_index(&pool, "k1", -1).await.unwrap().is_none());
        assert!(remove_by_index(&pool, "other", 0).await.unwrap().is_none());
        assert_eq!(count_albums(&pool, "k1").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_remove_reports_only_actual_deletes() {
        let pool = setup_test_db().await;
        add_album(&pool, "k1", &sample_album("a1", "Blue Train")).await.unwrap();
        add_album(&pool, "k1", &sample_album("a2", "Giant Steps")).await.unwrap();

        // Every Some corresponds to exactly one row leaving the table
        assert!(remove_by_index(&pool, "k1", 0).await.unwrap().is_some());
        assert_eq!(count_albums(&pool, "k1").await.unwrap(), 1);
        assert!(remove_by_index(&pool, "k1", 0).await.unwrap().is_some());
        assert_eq!(count_albums(&pool, "k1").await.unwrap(), 0);

        // Nothing left to take: no removal may be reported
        assert!(remove_by_index(&pool, "k1", 0).await.unwrap().is_none());
        assert_eq!(count_albums(&pool, "k1").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_set_condition_updates_and_round_trips() {
        let pool = setup_test_db().await;
        add_album(&pool, "k1", &sample_album("a1", "Blue Train")).await.unwrap();

        let updated = set_condition(&pool, "k1", "a1", ConditionGrade::VeryGoodPlus)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.condition, Some(ConditionGrade::VeryGoodPlus));

        let albums = list_albums(&pool, "k1").await.unwrap();
        assert_eq!(albums[0].condition, Some(ConditionGrade::VeryGoodPlus));
    }

    #[tokio::test]
    async fn test_set_condition_missing_album_returns_none() {
        let pool = setup_test_db().await;
        add_album(&pool, "k1", &sample_album("a1", "Blue Train")).await.unwrap();

        let missing = set_condition(&pool, "k1", "nope", ConditionGrade::Mint)
            .await
            .unwrap();
        assert!(missing.is_none());

        // Same album under a different session key is not visible
        let missing = set_condition(&pool, "k2", "a1", ConditionGrade::Mint)
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_album_ids_and_contains() {
        let pool = setup_test_db().await;
        add_album(&pool, "k1", &sample_album("a1", "Blue Train")).await.unwrap();
        add_album(&pool, "k1", &sample_album("a2", "Giant Steps")).await.unwrap();

        let ids = album_ids(&pool, "k1").await.unwrap();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains("a1"));

        assert!(contains_album(&pool, "k1", "a2").await.unwrap());
        assert!(!contains_album(&pool, "k1", "a9").await.unwrap());
    }
}
