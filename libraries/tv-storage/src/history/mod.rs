//! Watch history storage
//!
//! At most one row per (user, video); re-recording a video replaces its
//! row.

use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use tv_core::types::{FilterKey, HistoryEntry};

use crate::error::Result;

/// Most recent history entries of a user, newest first
pub async fn get_recent(pool: &SqlitePool, user_id: &str, limit: usize) -> Result<Vec<HistoryEntry>> {
    let rows = sqlx::query(
        "SELECT video_id, title, playlist_id, playlist_name, filter_key, timestamp
         FROM history
         WHERE user_id = ?
         ORDER BY timestamp DESC, id DESC
         LIMIT ?",
    )
    .bind(user_id)
    .bind(i64::try_from(limit).unwrap_or(i64::MAX))
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(|row| -> Result<HistoryEntry> {
            let filter: String = row.try_get("filter_key")?;
            let millis: i64 = row.try_get("timestamp")?;

            Ok(HistoryEntry {
                video_id: row.try_get("video_id")?,
                title: row.try_get("title")?,
                playlist_id: row.try_get("playlist_id")?,
                playlist_name: row.try_get("playlist_name")?,
                filter: FilterKey::from_str(&filter).unwrap_or_default(),
                timestamp: DateTime::from_timestamp_millis(millis).unwrap_or_else(Utc::now),
            })
        })
        .collect()
}

/// Insert or replace the entry for `entry.video_id`
pub async fn upsert(pool: &SqlitePool, user_id: &str, entry: &HistoryEntry) -> Result<()> {
    crate::users::ensure(pool, user_id).await?;

    sqlx::query(
        "INSERT INTO history (user_id, video_id, title, playlist_id, playlist_name, filter_key, timestamp)
         VALUES (?, ?, ?, ?, ?, ?, ?)
         ON CONFLICT(user_id, video_id) DO UPDATE SET
            title = excluded.title,
            playlist_id = excluded.playlist_id,
            playlist_name = excluded.playlist_name,
            filter_key = excluded.filter_key,
            timestamp = excluded.timestamp",
    )
    .bind(user_id)
    .bind(&entry.video_id)
    .bind(&entry.title)
    .bind(&entry.playlist_id)
    .bind(&entry.playlist_name)
    .bind(entry.filter.as_str())
    .bind(entry.timestamp.timestamp_millis())
    .execute(pool)
    .await?;

    Ok(())
}

/// Remove the entry for a video; removing a missing entry is not an error
pub async fn delete(pool: &SqlitePool, user_id: &str, video_id: &str) -> Result<()> {
    sqlx::query("DELETE FROM history WHERE user_id = ? AND video_id = ?")
        .bind(user_id)
        .bind(video_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Number of stored entries for a user
pub async fn count(pool: &SqlitePool, user_id: &str) -> Result<usize> {
    let count: i64 = sqlx::query("SELECT COUNT(*) AS count FROM history WHERE user_id = ?")
        .bind(user_id)
        .fetch_one(pool)
        .await?
        .try_get("count")?;
    Ok(usize::try_from(count).unwrap_or(0))
}
