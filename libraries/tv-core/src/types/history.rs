/// Watch history domain type
use crate::types::FilterKey;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A record of a video having been made current
///
/// Keyed by `video_id`: a log never holds two entries for the same video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub video_id: String,

    #[serde(default)]
    pub title: String,

    pub playlist_id: String,

    #[serde(default)]
    pub playlist_name: String,

    /// Filter that was active when the video became current
    #[serde(default)]
    pub filter: FilterKey,

    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    /// Create an entry stamped with the current time
    pub fn now(
        video_id: impl Into<String>,
        title: impl Into<String>,
        playlist_id: impl Into<String>,
        playlist_name: impl Into<String>,
        filter: FilterKey,
    ) -> Self {
        Self {
            video_id: video_id.into(),
            title: title.into(),
            playlist_id: playlist_id.into(),
            playlist_name: playlist_name.into(),
            filter,
            timestamp: Utc::now(),
        }
    }
}
