//! Per-user row: playlist tabs and video progress
//!
//! Every other table hangs off this row, so writers call [`ensure`] first.

use sqlx::{Row, SqlitePool};
use std::collections::HashMap;
use tv_core::types::{PlaylistTab, ProgressMap};

use crate::error::Result;
use crate::json::{decode_or_default, encode};

/// Create the user row if it does not exist
pub async fn ensure(pool: &SqlitePool, user_id: &str) -> Result<()> {
    sqlx::query("INSERT OR IGNORE INTO users (user_id) VALUES (?)")
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Playlist tabs for a user (empty if none stored)
pub async fn get_tabs(pool: &SqlitePool, user_id: &str) -> Result<Vec<PlaylistTab>> {
    let raw: Option<String> = sqlx::query("SELECT playlist_tabs FROM users WHERE user_id = ?")
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .map(|row| row.try_get("playlist_tabs"))
        .transpose()?;

    Ok(decode_or_default(raw.as_deref(), "playlist_tabs", user_id))
}

/// Replace a user's playlist tabs
pub async fn set_tabs(pool: &SqlitePool, user_id: &str, tabs: &[PlaylistTab]) -> Result<()> {
    ensure(pool, user_id).await?;

    sqlx::query(
        "UPDATE users SET playlist_tabs = ?, updated_at = strftime('%s', 'now') WHERE user_id = ?",
    )
    .bind(encode(tabs)?)
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Stored progress for a user
pub async fn get_progress(pool: &SqlitePool, user_id: &str) -> Result<ProgressMap> {
    let raw: Option<String> = sqlx::query("SELECT video_progress FROM users WHERE user_id = ?")
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .map(|row| row.try_get("video_progress"))
        .transpose()?;

    Ok(decode_progress(raw.as_deref(), user_id))
}

/// Merge `delta` into a user's stored progress
///
/// Videos not named in `delta` keep their stored value.
pub async fn merge_progress(pool: &SqlitePool, user_id: &str, delta: &ProgressMap) -> Result<()> {
    if delta.is_empty() {
        return Ok(());
    }

    let mut tx = pool.begin().await?;

    sqlx::query("INSERT OR IGNORE INTO users (user_id) VALUES (?)")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    let raw: String = sqlx::query("SELECT video_progress FROM users WHERE user_id = ?")
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?
        .try_get("video_progress")?;

    let mut progress = decode_progress(Some(&raw), user_id);
    progress.extend(delta.iter().map(|(id, secs)| (id.clone(), *secs)));

    sqlx::query(
        "UPDATE users SET video_progress = ?, updated_at = strftime('%s', 'now') WHERE user_id = ?",
    )
    .bind(encode(&progress)?)
    .bind(user_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(())
}

/// Progress map tolerant of fractional or non-numeric values
///
/// Fractional seconds are floored; entries that are not non-negative
/// numbers are dropped.
fn decode_progress(raw: Option<&str>, user_id: &str) -> ProgressMap {
    let values: HashMap<String, serde_json::Value> =
        decode_or_default(raw, "video_progress", user_id);

    values
        .into_iter()
        .filter_map(|(id, value)| {
            let secs = value.as_f64().filter(|s| s.is_finite() && *s >= 0.0)?;
            Some((id, secs.floor() as u64))
        })
        .collect()
}
