//! YouTube TV Core
//!
//! Platform-agnostic domain types, traits, and error handling for YouTube TV.
//!
//! This crate provides the foundational building blocks shared by the
//! playback engine, the storage layer, and the session runtime.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Video`, `Playlist`, `Group`, `FilterKey`, `HistoryEntry`, etc.
//! - **Core Traits**: `PersistenceGateway` (load/save of user data)
//! - **Error Handling**: Unified `TvError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use tv_core::types::{ColorKey, FilterKey, Playlist, Video};
//!
//! let mut playlist = Playlist::new("p1", "Meme Songs");
//! playlist.videos.push(Video::new("a", "First", 120));
//! playlist.videos.push(Video::new("b", "Second", 95));
//! playlist.set_video_color("b", Some(ColorKey::Red));
//!
//! assert_eq!(playlist.eligible_indices(FilterKey::All), vec![0, 1]);
//! assert_eq!(playlist.eligible_indices(FilterKey::Color(ColorKey::Red)), vec![1]);
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{Result, TvError};
pub use traits::PersistenceGateway;

pub use types::{
    ColorKey, FilterKey, Group, HistoryEntry, Playlist, PlaylistSet, PlaylistTab, ProgressMap,
    UserSnapshot, Video, UNSORTED_PLAYLIST_ID,
};
