/// Persisted user data as delivered by a persistence gateway
use crate::types::{HistoryEntry, Playlist, PlaylistTab};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Video ID -> whole seconds watched
pub type ProgressMap = HashMap<String, u64>;

/// Everything loaded for one user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSnapshot {
    #[serde(default)]
    pub playlists: Vec<Playlist>,

    #[serde(default)]
    pub playlist_tabs: Vec<PlaylistTab>,

    #[serde(default, alias = "videoProgress")]
    pub progress: ProgressMap,

    /// Most recent first
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}
