//! Persistence seam between the playback engine and durable storage

use crate::error::Result;
use crate::types::{HistoryEntry, Playlist, PlaylistTab, ProgressMap, UserSnapshot};
use async_trait::async_trait;

/// Load/save access to one user's data
///
/// Implementations are bound to a single user, like a storage context.
/// Writes are best-effort and last-write-wins; callers retry a failed
/// write by resubmitting it on their next flush.
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    /// User whose data this gateway reads and writes
    fn user_id(&self) -> &str;

    /// Load the current snapshot of the user's data
    ///
    /// History is returned most recent first.
    async fn load(&self) -> Result<UserSnapshot>;

    /// Upsert playlists and tabs
    ///
    /// Idempotent. Playlists missing from `playlists` are removed.
    async fn save_structural(&self, playlists: &[Playlist], tabs: &[PlaylistTab]) -> Result<()>;

    /// Merge progress for the given videos, leaving other videos untouched
    async fn save_progress_delta(&self, delta: &ProgressMap) -> Result<()>;

    /// Insert or replace the history entry for `entry.video_id`
    async fn append_history(&self, entry: &HistoryEntry) -> Result<()>;

    /// Remove the history entry for a video
    ///
    /// History entries are keyed by video ID, so this is the entry ID.
    async fn delete_history(&self, video_id: &str) -> Result<()>;
}
