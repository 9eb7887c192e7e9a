//! Engine Events
//!
//! The engine performs no I/O. Anything the outside world must react to
//! (persisting history, saving structural edits, refreshing the player) is
//! queued as an event and drained by the host after each operation.

use serde::{Deserialize, Serialize};
use tv_core::types::{FilterKey, HistoryEntry};

/// Events emitted by the playback controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EngineEvent {
    /// The current video changed
    VideoChanged {
        playlist_id: String,
        video_id: String,
        /// Index into the playlist's videos
        video_index: usize,
    },

    /// The active filter of the active playlist changed
    FilterChanged {
        playlist_id: String,
        filter: FilterKey,
    },

    /// A history entry was recorded (append or move-to-front)
    HistoryRecorded { entry: HistoryEntry },

    /// A history entry fell off the end of the log
    HistoryEvicted { video_id: String },

    /// Playlist structure (videos or groups) was edited
    StructureChanged { playlist_id: String },
}
