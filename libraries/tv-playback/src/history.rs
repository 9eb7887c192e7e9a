//! Watch history tracking
//!
//! Maintains a bounded, de-duplicated log of recently played videos, most
//! recent first. The log is what a cold start resumes from.

use std::collections::VecDeque;
use tv_core::types::HistoryEntry;

/// Default number of entries kept
pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

/// Bounded watch history keyed by video ID
///
/// Front = most recent. Recording a video already in the log moves its
/// entry to the front instead of adding a second one.
#[derive(Debug, Clone)]
pub struct HistoryLog {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl HistoryLog {
    /// Create an empty log; a zero capacity is raised to 1
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Rebuild a log from persisted entries
    ///
    /// Entries are ordered newest first by timestamp, duplicates keep their
    /// newest occurrence, and anything past capacity is dropped.
    pub fn from_entries(mut entries: Vec<HistoryEntry>, capacity: usize) -> Self {
        let mut log = Self::new(capacity);

        // Stable sort keeps the persisted order for equal timestamps
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        for entry in entries {
            if log.entries.len() >= log.capacity {
                break;
            }
            if log.position(&entry.video_id).is_none() {
                log.entries.push_back(entry);
            }
        }

        log
    }

    /// Record a video as most recent
    ///
    /// An existing entry for the same video is replaced by `entry` and
    /// moves to the front, so playlist and filter always describe the latest
    /// play. Otherwise the entry is prepended, evicting the oldest one first
    /// when the log is full. Returns the evicted entry.
    pub fn record(&mut self, entry: HistoryEntry) -> Option<HistoryEntry> {
        if let Some(at) = self.position(&entry.video_id) {
            self.entries.remove(at);
            self.entries.push_front(entry);
            return None;
        }

        let evicted = if self.entries.len() >= self.capacity {
            self.entries.pop_back()
        } else {
            None
        };

        self.entries.push_front(entry);
        evicted
    }

    /// Most recently played entry
    pub fn most_recent(&self) -> Option<&HistoryEntry> {
        self.entries.front()
    }

    /// Entries, most recent first
    ///
    /// The iterator is cheap to clone, so a consumer can restart it.
    pub fn all(&self) -> std::collections::vec_deque::Iter<'_, HistoryEntry> {
        self.entries.iter()
    }

    /// Drop the entry for a video, returning it
    pub fn remove(&mut self, video_id: &str) -> Option<HistoryEntry> {
        let at = self.position(video_id)?;
        self.entries.remove(at)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn contains(&self, video_id: &str) -> bool {
        self.position(video_id).is_some()
    }

    fn position(&self, video_id: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.video_id == video_id)
    }
}

impl Default for HistoryLog {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}
