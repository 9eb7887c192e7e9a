//! Per (playlist, filter) shuffle queue
//!
//! A queue is a shuffle order over the indices of a playlist's eligible
//! videos plus a position within it. Queues loop: stepping past either end
//! wraps around.
//!
//! ```text
//! playlist.videos:  [v0, v1, v2, v3, v4]
//! order:            [ 3,  0,  4,  1,  2]
//!                           ^
//!                       position = 1  ->  current video v0
//! ```

use crate::shuffle::ShuffleOrderGenerator;
use tracing::debug;
use tv_core::types::{FilterKey, Playlist};

/// Shuffle order and position for one (playlist, filter) pair
///
/// Invariant: `order` is a permutation of the indices that were eligible
/// when it was generated, and `position < order.len()` whenever the order
/// is non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueueState {
    order: Vec<usize>,
    position: usize,
}

impl QueueState {
    /// Empty queue; the first `ensure_fresh` fills it
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue with an explicit order, position clamped into range
    pub fn with_order(order: Vec<usize>, position: usize) -> Self {
        let mut queue = Self { order, position: 0 };
        queue.set_position(position);
        queue
    }

    pub fn order(&self) -> &[usize] {
        &self.order
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Whether the order no longer matches the number of eligible videos
    ///
    /// Only lengths are compared. Content is never diffed: a change in the
    /// eligible set that keeps its size does not make the queue stale.
    pub fn is_stale(&self, eligible_count: usize) -> bool {
        self.order.len() != eligible_count
    }

    /// Regenerate the order if it is stale for `filter` on `playlist`
    ///
    /// After regeneration the position is `remembered` clamped into range,
    /// or 0. Returns `true` if the order was regenerated.
    pub fn ensure_fresh(
        &mut self,
        playlist: &Playlist,
        filter: FilterKey,
        remembered: Option<usize>,
        generator: &mut ShuffleOrderGenerator,
    ) -> bool {
        let eligible = playlist.eligible_indices(filter);
        if !self.is_stale(eligible.len()) {
            return false;
        }

        debug!(
            playlist = %playlist.id,
            filter = %filter,
            previous_len = self.order.len(),
            eligible = eligible.len(),
            "Regenerating stale shuffle order"
        );

        self.order = generator.generate(&eligible, None);
        self.set_position(remembered.unwrap_or(0));
        true
    }

    /// Replace the order with a fresh shuffle and rewind to the start
    pub fn regenerate(
        &mut self,
        eligible: &[usize],
        pin: Option<usize>,
        generator: &mut ShuffleOrderGenerator,
    ) {
        self.order = generator.generate(eligible, pin);
        self.position = 0;
    }

    /// Step forward one video, wrapping to the start
    pub fn advance(&mut self) {
        if self.order.is_empty() {
            return;
        }
        self.position = (self.position + 1) % self.order.len();
    }

    /// Step back one video, wrapping to the end
    pub fn retreat(&mut self) {
        if self.order.is_empty() {
            return;
        }
        let len = self.order.len();
        self.position = (self.position + len - 1) % len;
    }

    /// Make `video_index` current
    ///
    /// If the video is in the order, only the position moves. Otherwise the
    /// order is regenerated from `eligible` pinned to `video_index` and the
    /// position reset to 0.
    pub fn jump_to(
        &mut self,
        video_index: usize,
        eligible: &[usize],
        generator: &mut ShuffleOrderGenerator,
    ) {
        if let Some(at) = self.order.iter().position(|&index| index == video_index) {
            self.position = at;
            return;
        }

        self.regenerate(eligible, Some(video_index), generator);
    }

    /// Index (into the playlist's videos) of the current video
    pub fn current_video_index(&self) -> Option<usize> {
        self.order.get(self.position).copied()
    }

    /// Move to `position`, clamped into range
    pub fn set_position(&mut self, position: usize) {
        self.position = position.min(self.order.len().saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tv_core::types::{ColorKey, Video};

    fn playlist(len: usize) -> Playlist {
        let mut playlist = Playlist::new("p1", "Test");
        for i in 0..len {
            playlist
                .videos
                .push(Video::new(format!("v{i}"), format!("Video {i}"), 60));
        }
        playlist
    }

    #[test]
    fn fresh_queue_is_empty() {
        let queue = QueueState::new();
        assert!(queue.is_empty());
        assert_eq!(queue.current_video_index(), None);
    }

    #[test]
    fn ensure_fresh_fills_new_queue() {
        let mut generator = ShuffleOrderGenerator::seeded(1);
        let playlist = playlist(5);
        let mut queue = QueueState::new();

        assert!(queue.ensure_fresh(&playlist, FilterKey::All, None, &mut generator));
        assert_eq!(queue.len(), 5);
        assert_eq!(queue.position(), 0);

        // Same length: left alone
        let before = queue.clone();
        assert!(!queue.ensure_fresh(&playlist, FilterKey::All, Some(3), &mut generator));
        assert_eq!(queue, before);
    }

    #[test]
    fn ensure_fresh_clamps_remembered_position() {
        let mut generator = ShuffleOrderGenerator::seeded(1);
        let playlist = playlist(3);
        let mut queue = QueueState::new();

        queue.ensure_fresh(&playlist, FilterKey::All, Some(10), &mut generator);
        assert_eq!(queue.position(), 2);
    }

    #[test]
    fn ensure_fresh_on_empty_filter_stays_empty() {
        let mut generator = ShuffleOrderGenerator::seeded(1);
        let playlist = playlist(3);
        let mut queue = QueueState::new();

        let red = FilterKey::Color(ColorKey::Red);
        assert!(!queue.ensure_fresh(&playlist, red, Some(2), &mut generator));
        assert!(queue.is_empty());
        assert_eq!(queue.position(), 0);
    }

    #[test]
    fn group_growth_makes_queue_stale() {
        let mut generator = ShuffleOrderGenerator::seeded(2);
        let mut playlist = playlist(5);
        playlist.set_video_color("v1", Some(ColorKey::Red));
        playlist.set_video_color("v3", Some(ColorKey::Red));
        let red = FilterKey::Color(ColorKey::Red);

        let mut queue = QueueState::new();
        queue.ensure_fresh(&playlist, red, None, &mut generator);
        assert_eq!(queue.len(), 2);

        playlist.set_video_color("v0", Some(ColorKey::Red));
        assert!(queue.is_stale(playlist.eligible_count(red)));
        assert!(queue.ensure_fresh(&playlist, red, None, &mut generator));
        assert_eq!(queue.len(), 3);
    }

    #[test]
    fn advance_and_retreat_wrap() {
        let mut queue = QueueState::with_order(vec![4, 2, 0], 2);
        queue.advance();
        assert_eq!(queue.position(), 0);
        assert_eq!(queue.current_video_index(), Some(4));

        queue.retreat();
        assert_eq!(queue.position(), 2);
        assert_eq!(queue.current_video_index(), Some(0));
    }

    #[test]
    fn stepping_an_empty_queue_is_a_no_op() {
        let mut queue = QueueState::new();
        queue.advance();
        queue.retreat();
        assert_eq!(queue.position(), 0);
        assert_eq!(queue.current_video_index(), None);
    }

    #[test]
    fn jump_to_known_video_moves_position_only() {
        let mut generator = ShuffleOrderGenerator::seeded(3);
        let mut queue = QueueState::with_order(vec![3, 1, 4, 0, 2], 0);

        queue.jump_to(4, &[0, 1, 2, 3, 4], &mut generator);
        assert_eq!(queue.order(), &[3, 1, 4, 0, 2]);
        assert_eq!(queue.position(), 2);
    }

    #[test]
    fn jump_to_unknown_video_regenerates_pinned() {
        let mut generator = ShuffleOrderGenerator::seeded(3);
        let mut queue = QueueState::with_order(vec![1, 0], 1);

        queue.jump_to(2, &[0, 1, 2], &mut generator);
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.position(), 0);
        assert_eq!(queue.current_video_index(), Some(2));
    }

    #[test]
    fn with_order_clamps_position() {
        let queue = QueueState::with_order(vec![0, 1], 9);
        assert_eq!(queue.position(), 1);

        let empty = QueueState::with_order(Vec::new(), 9);
        assert_eq!(empty.position(), 0);
    }
}
