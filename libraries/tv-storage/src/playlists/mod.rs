//! Playlist storage
//!
//! One row per playlist. Videos and groups are JSON columns; `position`
//! keeps the user's playlist order.

use sqlx::{Row, SqlitePool};
use std::collections::BTreeMap;
use tv_core::types::{ColorKey, Group, Playlist, Video};

use crate::error::Result;
use crate::json::{decode_or_default, encode};

/// All playlists of a user, in stored order
pub async fn get_all(pool: &SqlitePool, user_id: &str) -> Result<Vec<Playlist>> {
    let rows = sqlx::query(
        "SELECT playlist_id, name, videos, video_groups
         FROM playlists
         WHERE user_id = ?
         ORDER BY position, playlist_id",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(|row| -> Result<Playlist> {
            let id: String = row.try_get("playlist_id")?;
            let name: String = row.try_get("name")?;
            let videos: Option<String> = row.try_get("videos")?;
            let groups: Option<String> = row.try_get("video_groups")?;

            let mut playlist = Playlist::new(id, name);
            playlist.videos = decode_or_default::<Vec<Video>>(videos.as_deref(), "videos", &playlist.id);

            let stored: BTreeMap<String, Group> =
                decode_or_default(groups.as_deref(), "video_groups", &playlist.id);
            for (key, group) in stored {
                if let Some(color) = ColorKey::from_str(&key) {
                    playlist.groups.insert(color, group);
                }
            }

            Ok(playlist)
        })
        .collect()
}

/// Replace a user's playlists
///
/// Upserts every playlist in `playlists` (keeping their order) and
/// deletes stored playlists that are no longer present.
pub async fn save_all(pool: &SqlitePool, user_id: &str, playlists: &[Playlist]) -> Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query("INSERT OR IGNORE INTO users (user_id) VALUES (?)")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    for (position, playlist) in playlists.iter().enumerate() {
        sqlx::query(
            "INSERT INTO playlists (user_id, playlist_id, name, videos, video_groups, position, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, strftime('%s', 'now'))
             ON CONFLICT(user_id, playlist_id) DO UPDATE SET
                name = excluded.name,
                videos = excluded.videos,
                video_groups = excluded.video_groups,
                position = excluded.position,
                updated_at = excluded.updated_at",
        )
        .bind(user_id)
        .bind(&playlist.id)
        .bind(&playlist.name)
        .bind(encode(&playlist.videos)?)
        .bind(encode(&playlist.groups)?)
        .bind(position as i64)
        .execute(&mut *tx)
        .await?;
    }

    let stored: Vec<String> = sqlx::query("SELECT playlist_id FROM playlists WHERE user_id = ?")
        .bind(user_id)
        .fetch_all(&mut *tx)
        .await?
        .into_iter()
        .map(|row| row.try_get("playlist_id"))
        .collect::<std::result::Result<_, _>>()?;

    for playlist_id in stored {
        if playlists.iter().all(|p| p.id != playlist_id) {
            sqlx::query("DELETE FROM playlists WHERE user_id = ? AND playlist_id = ?")
                .bind(user_id)
                .bind(&playlist_id)
                .execute(&mut *tx)
                .await?;
        }
    }

    tx.commit().await?;
    Ok(())
}
