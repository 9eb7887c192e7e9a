//! Domain types for YouTube TV
//!
//! These are explicit record types for everything the playback engine
//! reads; loosely shaped persisted JSON is decoded into them once, at the
//! storage boundary.

mod filter;
mod history;
mod playlist;
mod snapshot;
mod video;

pub use filter::{ColorKey, FilterKey};
pub use history::HistoryEntry;
pub use playlist::{Group, Playlist, PlaylistSet, PlaylistTab, UNSORTED_PLAYLIST_ID};
pub use snapshot::{ProgressMap, UserSnapshot};
pub use video::Video;
