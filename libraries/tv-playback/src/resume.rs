//! Cold-start resolution
//!
//! Decides what plays first: the most recent history entry if it still
//! resolves, otherwise a random video from a fallback playlist.

use crate::controller::PlaybackController;
use tracing::{debug, info};
use tv_core::types::FilterKey;

/// How the initial controller state was established
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResumeOutcome {
    /// Continued from the most recent history entry
    Resumed {
        playlist_id: String,
        video_index: usize,
        filter: FilterKey,
    },

    /// History did not resolve; a random video was picked
    FellBack {
        playlist_id: String,
        video_index: usize,
    },

    /// No playlist has any video; nothing is active
    Empty,
}

impl ResumeOutcome {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// Establishes the controller's initial state, once per session
#[derive(Debug, Clone, Default)]
pub struct ResumeResolver {
    default_playlist_id: Option<String>,
}

impl ResumeResolver {
    /// `default_playlist_id` is preferred over the first non-empty playlist
    /// when history cannot be resumed
    pub fn new(default_playlist_id: Option<String>) -> Self {
        Self {
            default_playlist_id,
        }
    }

    pub fn resolve(&self, controller: &mut PlaybackController) -> ResumeOutcome {
        if let Some(outcome) = Self::from_history(controller) {
            return outcome;
        }
        self.fall_back(controller)
    }

    /// Rebuild the queue the most recent entry played from
    ///
    /// The recorded filter is kept even if the video has since left that
    /// group; only a filter with no videos at all drops back to `all`.
    fn from_history(controller: &mut PlaybackController) -> Option<ResumeOutcome> {
        let entry = controller.history().most_recent()?;
        let Some(playlist) = controller.playlists().get(&entry.playlist_id) else {
            debug!(playlist = %entry.playlist_id, "History playlist no longer exists");
            return None;
        };
        let Some(video_index) = playlist.index_of(&entry.video_id) else {
            debug!(video = %entry.video_id, "History video no longer in playlist");
            return None;
        };

        let filter = if playlist.eligible_count(entry.filter) == 0 {
            FilterKey::All
        } else {
            entry.filter
        };
        let playlist_id = playlist.id.clone();

        if !controller.establish(&playlist_id, filter, video_index, false) {
            return None;
        }

        info!(
            playlist = %playlist_id,
            video_index,
            filter = %filter,
            "Resumed from history"
        );
        Some(ResumeOutcome::Resumed {
            playlist_id,
            video_index,
            filter,
        })
    }

    /// Random video, under `all`, from the default or first non-empty playlist
    fn fall_back(&self, controller: &mut PlaybackController) -> ResumeOutcome {
        let playlists = controller.playlists();
        let target = self
            .default_playlist_id
            .as_deref()
            .and_then(|id| playlists.get(id))
            .filter(|playlist| !playlist.is_empty())
            .or_else(|| playlists.first_non_empty())
            .map(|playlist| (playlist.id.clone(), playlist.eligible_indices(FilterKey::All)));

        let Some((playlist_id, eligible)) = target else {
            info!("No videos available; nothing to resume");
            return ResumeOutcome::Empty;
        };
        let Some(video_index) = controller.pick_index(&eligible) else {
            return ResumeOutcome::Empty;
        };

        controller.establish(&playlist_id, FilterKey::All, video_index, true);
        info!(playlist = %playlist_id, video_index, "Started from random video");
        ResumeOutcome::FellBack {
            playlist_id,
            video_index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EngineConfig;
    use tv_core::types::{ColorKey, HistoryEntry, Playlist, Video};

    fn playlist(id: &str, len: usize) -> Playlist {
        let mut playlist = Playlist::new(id, id.to_uppercase());
        for i in 0..len {
            playlist
                .videos
                .push(Video::new(format!("v{i}"), format!("Video {i}"), 60));
        }
        playlist
    }

    fn config(default_playlist_id: Option<&str>) -> EngineConfig {
        EngineConfig {
            default_playlist_id: default_playlist_id.map(str::to_string),
            shuffle_seed: Some(5),
            ..EngineConfig::default()
        }
    }

    #[test]
    fn resumes_most_recent_entry() {
        let history = vec![HistoryEntry::now("v2", "Video 2", "p1", "P1", FilterKey::All)];
        let mut controller =
            PlaybackController::new(vec![playlist("p1", 5)], Vec::new(), history, &config(None));

        let outcome = controller.resume();
        assert_eq!(
            outcome,
            ResumeOutcome::Resumed {
                playlist_id: "p1".to_string(),
                video_index: 2,
                filter: FilterKey::All,
            }
        );
        assert_eq!(controller.current_video_index(), Some(2));
        assert_eq!(controller.queue_len(), 5);

        // Resuming does not add history
        assert_eq!(controller.history().len(), 1);
    }

    #[test]
    fn resumes_under_recorded_color_filter() {
        let mut p1 = playlist("p1", 5);
        p1.set_video_color("v1", Some(ColorKey::Red));
        p1.set_video_color("v3", Some(ColorKey::Red));
        let red = FilterKey::Color(ColorKey::Red);
        let history = vec![HistoryEntry::now("v3", "Video 3", "p1", "P1", red)];
        let mut controller = PlaybackController::new(vec![p1], Vec::new(), history, &config(None));

        controller.resume();
        assert_eq!(controller.active_filter(), red);
        assert_eq!(controller.queue_len(), 2);
        assert_eq!(controller.current_video_index(), Some(3));
    }

    #[test]
    fn empty_recorded_filter_resumes_under_all() {
        let history = vec![HistoryEntry::now(
            "v1",
            "Video 1",
            "p1",
            "P1",
            FilterKey::Color(ColorKey::Pink),
        )];
        let mut controller =
            PlaybackController::new(vec![playlist("p1", 3)], Vec::new(), history, &config(None));

        controller.resume();
        assert_eq!(controller.active_filter(), FilterKey::All);
        assert_eq!(controller.current_video_index(), Some(1));
    }

    #[test]
    fn shared_video_resumes_where_it_last_played() {
        let mut a = Playlist::new("a", "A");
        a.videos.push(Video::new("shared", "Shared", 60));
        a.videos.push(Video::new("a1", "A1", 60));
        let mut b = Playlist::new("b", "B");
        b.videos.push(Video::new("shared", "Shared", 60));
        b.videos.push(Video::new("b1", "B1", 60));
        b.set_video_color("shared", Some(ColorKey::Red));
        let red = FilterKey::Color(ColorKey::Red);

        let mut first = PlaybackController::new(
            vec![a.clone(), b.clone()],
            Vec::new(),
            Vec::new(),
            &config(None),
        );
        first.resume();
        assert!(first.select_video("a", 0, None));
        assert!(first.select_video("b", 0, Some(red)));

        let latest = first.history().most_recent().unwrap();
        assert_eq!(latest.video_id, "shared");
        assert_eq!(latest.playlist_id, "b");
        assert_eq!(latest.playlist_name, "B");
        assert_eq!(latest.filter, red);

        let history: Vec<HistoryEntry> = first.history().all().cloned().collect();
        let mut restarted = PlaybackController::new(vec![a, b], Vec::new(), history, &config(None));
        assert_eq!(
            restarted.resume(),
            ResumeOutcome::Resumed {
                playlist_id: "b".to_string(),
                video_index: 0,
                filter: red,
            }
        );
    }

    #[test]
    fn missing_history_video_falls_back() {
        let history = vec![HistoryEntry::now("gone", "Gone", "p1", "P1", FilterKey::All)];
        let mut controller =
            PlaybackController::new(vec![playlist("p1", 4)], Vec::new(), history, &config(None));

        let outcome = controller.resume();
        assert!(matches!(outcome, ResumeOutcome::FellBack { ref playlist_id, .. } if playlist_id == "p1"));
        assert!(controller.current_video().is_some());
        assert_eq!(controller.history().len(), 2);
    }

    #[test]
    fn default_playlist_is_preferred() {
        let mut controller = PlaybackController::new(
            vec![playlist("p1", 3), playlist("p2", 3)],
            Vec::new(),
            Vec::new(),
            &config(Some("p2")),
        );

        controller.resume();
        assert_eq!(controller.active_playlist_id(), Some("p2"));
        assert_eq!(controller.position(), Some(0));
    }

    #[test]
    fn empty_default_playlist_is_skipped() {
        let mut controller = PlaybackController::new(
            vec![playlist("empty", 0), playlist("p1", 2)],
            Vec::new(),
            Vec::new(),
            &config(Some("empty")),
        );

        controller.resume();
        assert_eq!(controller.active_playlist_id(), Some("p1"));
    }

    #[test]
    fn no_videos_anywhere_is_empty() {
        let mut controller = PlaybackController::new(
            vec![playlist("empty", 0)],
            Vec::new(),
            Vec::new(),
            &config(None),
        );

        assert!(controller.resume().is_empty());
        assert!(controller.current_video().is_none());
        assert!(controller.go_next().is_none());
    }
}
