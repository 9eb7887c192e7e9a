//! Gateway over the per-user tables

use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::{debug, info};
use tv_core::error::Result;
use tv_core::traits::PersistenceGateway;
use tv_core::types::{HistoryEntry, Playlist, PlaylistTab, ProgressMap, UserSnapshot};

use crate::{history, playlists, users};

/// History rows loaded per user
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// `SQLite`-backed gateway for one user
pub struct SqliteGateway {
    pool: SqlitePool,
    user_id: String,
    history_limit: usize,
}

impl SqliteGateway {
    pub fn new(pool: SqlitePool, user_id: impl Into<String>) -> Self {
        Self {
            pool,
            user_id: user_id.into(),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }

    /// Open (creating if needed) and migrate the database at `database_url`
    pub async fn connect(
        database_url: &str,
        user_id: impl Into<String>,
    ) -> crate::error::Result<Self> {
        crate::ensure_parent_dir(database_url).await?;
        let pool = crate::create_pool(database_url).await?;
        crate::run_migrations(&pool).await?;

        let gateway = Self::new(pool, user_id);
        users::ensure(&gateway.pool, &gateway.user_id).await?;
        info!(user = %gateway.user_id, "Storage ready");
        Ok(gateway)
    }

    /// Load at most `limit` history rows (default 100)
    #[must_use]
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl PersistenceGateway for SqliteGateway {
    fn user_id(&self) -> &str {
        &self.user_id
    }

    async fn load(&self) -> Result<UserSnapshot> {
        let snapshot = UserSnapshot {
            playlists: playlists::get_all(&self.pool, &self.user_id).await?,
            playlist_tabs: users::get_tabs(&self.pool, &self.user_id).await?,
            progress: users::get_progress(&self.pool, &self.user_id).await?,
            history: history::get_recent(&self.pool, &self.user_id, self.history_limit).await?,
        };

        debug!(
            user = %self.user_id,
            playlists = snapshot.playlists.len(),
            history = snapshot.history.len(),
            "Loaded snapshot"
        );
        Ok(snapshot)
    }

    async fn save_structural(&self, playlists: &[Playlist], tabs: &[PlaylistTab]) -> Result<()> {
        playlists::save_all(&self.pool, &self.user_id, playlists).await?;
        users::set_tabs(&self.pool, &self.user_id, tabs).await?;
        debug!(user = %self.user_id, playlists = playlists.len(), "Saved structure");
        Ok(())
    }

    async fn save_progress_delta(&self, delta: &ProgressMap) -> Result<()> {
        users::merge_progress(&self.pool, &self.user_id, delta).await?;
        debug!(user = %self.user_id, videos = delta.len(), "Saved progress");
        Ok(())
    }

    async fn append_history(&self, entry: &HistoryEntry) -> Result<()> {
        history::upsert(&self.pool, &self.user_id, entry).await?;
        Ok(())
    }

    async fn delete_history(&self, video_id: &str) -> Result<()> {
        history::delete(&self.pool, &self.user_id, video_id).await?;
        Ok(())
    }
}
