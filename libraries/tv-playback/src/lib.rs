//! YouTube TV - Playback Engine
//!
//! Platform-agnostic shuffle playback over color-grouped playlists.
//!
//! This crate provides:
//! - Shuffle orders per (playlist, filter) pair, regenerated when stale
//! - Per-playlist memory of the last filter and position under each filter
//! - Bounded, de-duplicated watch history (default 100 entries)
//! - Cold-start resume from history, with a random fallback
//! - Watch progress tracking with a dirty set for debounced flushing
//!
//! # Architecture
//!
//! `tv-playback` performs no I/O:
//! - No dependency on `tv-storage` (database)
//! - No async runtime
//! - Everything the host must persist is emitted as an [`EngineEvent`]
//!
//! # Example: Resume and Navigate
//!
//! ```rust
//! use tv_core::types::{ColorKey, FilterKey, Playlist, Video};
//! use tv_playback::{EngineConfig, PlaybackController, ResumeOutcome};
//!
//! let mut playlist = Playlist::new("p1", "Favourites");
//! for i in 0..5 {
//!     playlist.videos.push(Video::new(format!("v{i}"), format!("Video {i}"), 240));
//! }
//! playlist.set_video_color("v1", Some(ColorKey::Red));
//!
//! let config = EngineConfig::default();
//! let mut controller = PlaybackController::new(vec![playlist], Vec::new(), Vec::new(), &config);
//!
//! // No history yet: a random video from the first non-empty playlist
//! assert!(matches!(controller.resume(), ResumeOutcome::FellBack { .. }));
//!
//! controller.go_next();
//! assert_eq!(controller.cycle_filter(), Some(FilterKey::Color(ColorKey::Red)));
//! assert_eq!(controller.current_video().unwrap().id, "v1");
//!
//! // History entries, filter changes and so on, for the host to persist
//! let events = controller.drain_events();
//! assert!(!events.is_empty());
//! ```
//!
//! # Example: Progress
//!
//! ```rust
//! use tv_playback::ProgressTracker;
//!
//! let mut progress = ProgressTracker::default();
//! progress.record("v1", 96.4);
//! assert!(progress.is_watched("v1", 100));
//!
//! let written = progress.flush(|delta| {
//!     assert_eq!(delta.get("v1"), Some(&96));
//!     Ok::<_, std::io::Error>(())
//! });
//! assert_eq!(written.unwrap(), 1);
//! ```

mod controller;
pub mod events;
mod history;
mod progress;
mod queue;
mod resume;
mod shuffle;
pub mod types;

// Public exports
pub use controller::PlaybackController;
pub use events::EngineEvent;
pub use history::{HistoryLog, DEFAULT_HISTORY_CAPACITY};
pub use progress::{ProgressTracker, WatchedFilter, DEFAULT_WATCHED_RATIO};
pub use queue::QueueState;
pub use resume::{ResumeOutcome, ResumeResolver};
pub use shuffle::{shuffle_indices, ShuffleOrderGenerator};
pub use types::EngineConfig;
