//! Engine configuration

use crate::history::DEFAULT_HISTORY_CAPACITY;
use crate::progress::DEFAULT_WATCHED_RATIO;
use serde::{Deserialize, Serialize};

/// Configuration for the playback engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Maximum history size (default: 100)
    pub history_capacity: usize,

    /// Fraction of a video that counts as watched (default: 0.95)
    pub watched_ratio: f64,

    /// Playlist preferred when there is no history to resume from
    pub default_playlist_id: Option<String>,

    /// Fixed shuffle seed; `None` seeds from OS entropy
    pub shuffle_seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            watched_ratio: DEFAULT_WATCHED_RATIO,
            default_playlist_id: None,
            shuffle_seed: None,
        }
    }
}
