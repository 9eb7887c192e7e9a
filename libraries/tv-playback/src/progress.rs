//! Per-video watch progress
//!
//! Progress is written to a fast in-memory cache on every heartbeat and
//! marked dirty; a debounced flush pushes the dirty entries to durable
//! storage as a merge patch.

use std::collections::{HashMap, HashSet};
use tv_core::types::{ProgressMap, Video};

/// Fraction of a video that counts as watched
pub const DEFAULT_WATCHED_RATIO: f64 = 0.95;

/// Watched-state selector for video listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WatchedFilter {
    #[default]
    All,
    Watched,
    Unwatched,
}

/// Last known playback offset per video
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    /// Latest values recorded this session
    cache: HashMap<String, u64>,

    /// Values as last loaded from, or acknowledged by, durable storage
    durable: ProgressMap,

    /// Cache entries not yet written durably
    dirty: HashSet<String>,

    watched_ratio: f64,
}

impl ProgressTracker {
    pub fn new(watched_ratio: f64) -> Self {
        Self {
            cache: HashMap::new(),
            durable: ProgressMap::new(),
            dirty: HashSet::new(),
            watched_ratio,
        }
    }

    /// Tracker seeded with durably stored progress
    pub fn with_durable(durable: ProgressMap, watched_ratio: f64) -> Self {
        let mut tracker = Self::new(watched_ratio);
        tracker.durable = durable;
        tracker
    }

    /// Replace the durable baseline with a newer snapshot
    ///
    /// Cached values recorded this session keep precedence.
    pub fn load_durable(&mut self, durable: ProgressMap) {
        self.durable = durable;
    }

    /// Record the playback offset for a video
    ///
    /// Ignores an empty video ID or a non-finite offset. Stores whole
    /// seconds (negative offsets clamp to 0). Returns `true` if recorded.
    pub fn record(&mut self, video_id: &str, seconds: f64) -> bool {
        if video_id.is_empty() || !seconds.is_finite() {
            return false;
        }

        let whole = seconds.max(0.0).floor() as u64;
        self.cache.insert(video_id.to_string(), whole);
        self.dirty.insert(video_id.to_string());
        true
    }

    /// Seconds watched: cached value, then durable value, then 0
    pub fn get(&self, video_id: &str) -> u64 {
        self.cache
            .get(video_id)
            .or_else(|| self.durable.get(video_id))
            .copied()
            .unwrap_or(0)
    }

    /// Whether at least the watched ratio of `duration_seconds` was played
    pub fn is_watched(&self, video_id: &str, duration_seconds: u64) -> bool {
        self.get(video_id) as f64 >= self.watched_ratio * duration_seconds as f64
    }

    /// Played fraction in `[0, 1]`
    pub fn fraction(&self, video_id: &str, duration_seconds: u64) -> f64 {
        let duration = duration_seconds.max(1) as f64;
        (self.get(video_id) as f64 / duration).clamp(0.0, 1.0)
    }

    /// Indices of `videos` matching a watched-state filter
    pub fn filter_watched(&self, videos: &[Video], filter: WatchedFilter) -> Vec<usize> {
        videos
            .iter()
            .enumerate()
            .filter(|(_, video)| match filter {
                WatchedFilter::All => true,
                WatchedFilter::Watched => self.is_watched(&video.id, video.duration_seconds),
                WatchedFilter::Unwatched => !self.is_watched(&video.id, video.duration_seconds),
            })
            .map(|(index, _)| index)
            .collect()
    }

    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    pub fn dirty_count(&self) -> usize {
        self.dirty.len()
    }

    /// Dirty entries with their current cached values
    pub fn pending_delta(&self) -> ProgressMap {
        self.dirty
            .iter()
            .filter_map(|id| self.cache.get(id).map(|secs| (id.clone(), *secs)))
            .collect()
    }

    /// Delta for the next write, or `None` when nothing is dirty
    ///
    /// Both the synchronous [`flush`](Self::flush) and an async writer start
    /// here, then call [`acknowledge`](Self::acknowledge) once the write
    /// succeeds.
    pub fn flush_batch(&self) -> Option<ProgressMap> {
        let delta = self.pending_delta();
        (!delta.is_empty()).then_some(delta)
    }

    /// Mark a successfully written delta as durable
    ///
    /// Entries recorded again after the delta was taken stay dirty.
    pub fn acknowledge(&mut self, delta: &ProgressMap) {
        for (id, secs) in delta {
            if self.cache.get(id) == Some(secs) {
                self.dirty.remove(id);
            }
            self.durable.insert(id.clone(), *secs);
        }
    }

    /// Write all dirty entries through `write`
    ///
    /// On success the entries are clean and the count written is returned.
    /// On failure they stay dirty for the next attempt.
    pub fn flush<E, F>(&mut self, write: F) -> Result<usize, E>
    where
        F: FnOnce(&ProgressMap) -> Result<(), E>,
    {
        let Some(delta) = self.flush_batch() else {
            return Ok(0);
        };
        write(&delta)?;
        self.acknowledge(&delta);
        Ok(delta.len())
    }
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new(DEFAULT_WATCHED_RATIO)
    }
}
