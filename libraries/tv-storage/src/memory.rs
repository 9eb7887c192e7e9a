//! In-process gateway
//!
//! Same semantics as the `SQLite` gateway, held in memory. Writes can be
//! switched to fail to exercise retry paths.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tv_core::error::{Result, TvError};
use tv_core::traits::PersistenceGateway;
use tv_core::types::{HistoryEntry, Playlist, PlaylistTab, ProgressMap, UserSnapshot};

use crate::error::StorageError;

/// Gateway over an in-memory snapshot
#[derive(Debug, Default)]
pub struct MemoryGateway {
    user_id: String,
    state: Mutex<UserSnapshot>,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryGateway {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self::with_snapshot(user_id, UserSnapshot::default())
    }

    /// Gateway whose first `load` returns `snapshot`
    pub fn with_snapshot(user_id: impl Into<String>, snapshot: UserSnapshot) -> Self {
        Self {
            user_id: user_id.into(),
            state: Mutex::new(snapshot),
            fail_writes: AtomicBool::new(false),
            writes: AtomicUsize::new(0),
        }
    }

    /// Make every write fail (or succeed again)
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Copy of the stored data
    pub fn snapshot(&self) -> UserSnapshot {
        self.state().clone()
    }

    /// Number of successful writes so far
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn state(&self) -> MutexGuard<'_, UserSnapshot> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fail if writes are switched off, otherwise count the write
    fn begin_write(&self, what: &str) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(TvError::from(StorageError::WriteFailed(what.to_string())));
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl PersistenceGateway for MemoryGateway {
    fn user_id(&self) -> &str {
        &self.user_id
    }

    async fn load(&self) -> Result<UserSnapshot> {
        let mut snapshot = self.snapshot();
        snapshot
            .history
            .sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(snapshot)
    }

    async fn save_structural(&self, playlists: &[Playlist], tabs: &[PlaylistTab]) -> Result<()> {
        self.begin_write("structural")?;
        let mut state = self.state();
        state.playlists = playlists.to_vec();
        state.playlist_tabs = tabs.to_vec();
        Ok(())
    }

    async fn save_progress_delta(&self, delta: &ProgressMap) -> Result<()> {
        self.begin_write("progress")?;
        self.state()
            .progress
            .extend(delta.iter().map(|(id, secs)| (id.clone(), *secs)));
        Ok(())
    }

    async fn append_history(&self, entry: &HistoryEntry) -> Result<()> {
        self.begin_write("history")?;
        let mut state = self.state();
        state.history.retain(|e| e.video_id != entry.video_id);
        state.history.insert(0, entry.clone());
        Ok(())
    }

    async fn delete_history(&self, video_id: &str) -> Result<()> {
        self.begin_write("history")?;
        self.state().history.retain(|e| e.video_id != video_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tv_core::types::FilterKey;

    #[tokio::test]
    async fn progress_is_merged() {
        let gateway = MemoryGateway::new("u1");
        gateway
            .save_progress_delta(&ProgressMap::from([("a".into(), 1), ("b".into(), 2)]))
            .await
            .unwrap();
        gateway
            .save_progress_delta(&ProgressMap::from([("a".into(), 9)]))
            .await
            .unwrap();

        let progress = gateway.load().await.unwrap().progress;
        assert_eq!(progress.get("a"), Some(&9));
        assert_eq!(progress.get("b"), Some(&2));
    }

    #[tokio::test]
    async fn failing_writes_change_nothing() {
        let gateway = MemoryGateway::new("u1");
        gateway.set_fail_writes(true);

        let entry = HistoryEntry::now("v1", "V1", "p1", "P1", FilterKey::All);
        assert!(gateway.append_history(&entry).await.is_err());
        assert!(gateway.snapshot().history.is_empty());
        assert_eq!(gateway.write_count(), 0);

        gateway.set_fail_writes(false);
        gateway.append_history(&entry).await.unwrap();
        gateway.append_history(&entry).await.unwrap();
        assert_eq!(gateway.snapshot().history.len(), 1);
        assert_eq!(gateway.write_count(), 2);
    }
}
