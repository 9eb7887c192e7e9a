//! Playback controller
//!
//! Owns every shuffle queue, the per-playlist filter/position memory and the
//! watch history. The UI reaches queues only through the operations here.

use crate::events::EngineEvent;
use crate::history::HistoryLog;
use crate::queue::QueueState;
use crate::resume::{ResumeOutcome, ResumeResolver};
use crate::shuffle::ShuffleOrderGenerator;
use crate::types::EngineConfig;
use std::collections::HashMap;
use tracing::{debug, trace};
use tv_core::types::{
    ColorKey, FilterKey, HistoryEntry, Playlist, PlaylistSet, PlaylistTab, Video,
    UNSORTED_PLAYLIST_ID,
};

/// Shuffle playback over a set of color-grouped playlists
///
/// State is the `(active playlist, active filter)` pair. Every operation
/// runs to completion synchronously and degrades to a no-op on missing
/// data; none of them fail.
#[derive(Debug)]
pub struct PlaybackController {
    playlists: PlaylistSet,
    tabs: Vec<PlaylistTab>,

    active_playlist_id: Option<String>,
    active_filter: FilterKey,

    /// playlist ID -> filter -> queue
    queues: HashMap<String, HashMap<FilterKey, QueueState>>,

    /// Last filter used per playlist
    last_filters: HashMap<String, FilterKey>,

    /// playlist ID -> filter -> position
    positions: HashMap<String, HashMap<FilterKey, usize>>,

    history: HistoryLog,
    generator: ShuffleOrderGenerator,
    default_playlist_id: Option<String>,

    events: Vec<EngineEvent>,
}

impl PlaybackController {
    /// Controller over loaded data, with nothing active yet
    ///
    /// Call [`resume`](Self::resume) to establish the initial state.
    pub fn new(
        playlists: Vec<Playlist>,
        tabs: Vec<PlaylistTab>,
        history: Vec<HistoryEntry>,
        config: &EngineConfig,
    ) -> Self {
        let generator = match config.shuffle_seed {
            Some(seed) => ShuffleOrderGenerator::seeded(seed),
            None => ShuffleOrderGenerator::new(),
        };

        Self {
            playlists: PlaylistSet::new(playlists),
            tabs,
            active_playlist_id: None,
            active_filter: FilterKey::All,
            queues: HashMap::new(),
            last_filters: HashMap::new(),
            positions: HashMap::new(),
            history: HistoryLog::from_entries(history, config.history_capacity),
            generator,
            default_playlist_id: config.default_playlist_id.clone(),
            events: Vec::new(),
        }
    }

    /// Establish the initial state from history, or a random pick
    pub fn resume(&mut self) -> ResumeOutcome {
        ResumeResolver::new(self.default_playlist_id.clone()).resolve(self)
    }

    // ===== Queries =====

    pub fn playlists(&self) -> &PlaylistSet {
        &self.playlists
    }

    pub fn tabs(&self) -> &[PlaylistTab] {
        &self.tabs
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn active_playlist_id(&self) -> Option<&str> {
        self.active_playlist_id.as_deref()
    }

    pub fn active_playlist(&self) -> Option<&Playlist> {
        self.playlists.get(self.active_playlist_id.as_deref()?)
    }

    pub fn active_filter(&self) -> FilterKey {
        self.active_filter
    }

    /// Video at the active queue's position
    pub fn current_video(&self) -> Option<&Video> {
        self.active_playlist()?.video(self.current_video_index()?)
    }

    /// Index into the active playlist's videos of the current video
    pub fn current_video_index(&self) -> Option<usize> {
        self.active_queue()?.current_video_index()
    }

    /// Position within the active queue
    pub fn position(&self) -> Option<usize> {
        let queue = self.active_queue()?;
        (!queue.is_empty()).then_some(queue.position())
    }

    /// Length of the active queue (0 when nothing is active)
    pub fn queue_len(&self) -> usize {
        self.active_queue().map_or(0, QueueState::len)
    }

    /// Filters offered for the active playlist, in cycle order
    pub fn available_filters(&self) -> Vec<FilterKey> {
        self.active_playlist()
            .map_or_else(|| vec![FilterKey::All], Playlist::available_filters)
    }

    /// Take all events emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    // ===== Navigation =====

    /// Switch to another playlist
    ///
    /// Restores that playlist's last filter (default `all`) and its
    /// remembered position. Returns `false` for an unknown playlist.
    pub fn change_playlist(&mut self, playlist_id: &str) -> bool {
        if self.playlists.get(playlist_id).is_none() {
            debug!(playlist = playlist_id, "Ignoring switch to unknown playlist");
            return false;
        }

        self.remember_position();

        let filter = self
            .last_filters
            .get(playlist_id)
            .copied()
            .unwrap_or_default();
        self.activate(playlist_id, filter);
        self.announce_current(true);
        true
    }

    /// Move to the next filter in `[all, colors with videos...]`
    ///
    /// Returns the new filter, or `None` with no active playlist.
    pub fn cycle_filter(&mut self) -> Option<FilterKey> {
        let playlist_id = self.active_playlist_id.clone()?;
        let filters = self.playlists.get(&playlist_id)?.available_filters();

        let at = filters
            .iter()
            .position(|f| *f == self.active_filter)
            .unwrap_or(0);
        let next = filters[(at + 1) % filters.len()];

        self.remember_position();
        self.activate(&playlist_id, next);
        self.events.push(EngineEvent::FilterChanged {
            playlist_id,
            filter: next,
        });
        self.announce_current(true);
        Some(next)
    }

    /// Step forward in the active queue, wrapping
    pub fn go_next(&mut self) -> Option<&Video> {
        self.step(true);
        self.current_video()
    }

    /// Step back in the active queue, wrapping
    pub fn go_previous(&mut self) -> Option<&Video> {
        self.step(false);
        self.current_video()
    }

    /// Play a specific video, e.g. picked from a menu
    ///
    /// `filter_hint` is honored only if it is a color the video belongs to;
    /// otherwise the `all` queue is used. A different playlist is entered
    /// through [`change_playlist`](Self::change_playlist) first. Returns
    /// `false` if the playlist or video does not exist.
    pub fn select_video(
        &mut self,
        playlist_id: &str,
        video_index: usize,
        filter_hint: Option<FilterKey>,
    ) -> bool {
        match self.playlists.get(playlist_id) {
            Some(playlist) if playlist.video(video_index).is_some() => {}
            _ => {
                debug!(
                    playlist = playlist_id,
                    video_index, "Ignoring selection of unknown video"
                );
                return false;
            }
        }

        if self.active_playlist_id.as_deref() != Some(playlist_id) {
            self.change_playlist(playlist_id);
        }
        self.remember_position();

        let Some(playlist) = self.playlists.get(playlist_id) else {
            return false;
        };
        let filter = match filter_hint {
            Some(hint @ FilterKey::Color(_)) if playlist.is_eligible(video_index, hint) => hint,
            _ => FilterKey::All,
        };

        let eligible = playlist.eligible_indices(filter);
        let queue = self
            .queues
            .entry(playlist_id.to_string())
            .or_default()
            .entry(filter)
            .or_default();
        if queue.is_stale(eligible.len()) {
            queue.regenerate(&eligible, Some(video_index), &mut self.generator);
        } else {
            queue.jump_to(video_index, &eligible, &mut self.generator);
        }

        let filter_changed = self.active_filter != filter;
        self.active_filter = filter;
        self.last_filters.insert(playlist_id.to_string(), filter);
        if filter_changed {
            self.events.push(EngineEvent::FilterChanged {
                playlist_id: playlist_id.to_string(),
                filter,
            });
        }

        self.remember_position();
        self.announce_current(true);
        true
    }

    /// Fresh shuffle of the active queue, starting from its first video
    pub fn reshuffle(&mut self) -> Option<&Video> {
        let playlist_id = self.active_playlist_id.clone()?;
        let filter = self.active_filter;
        let playlist = self.playlists.get(&playlist_id)?;

        let eligible = playlist.eligible_indices(filter);
        self.queues
            .entry(playlist_id)
            .or_default()
            .entry(filter)
            .or_default()
            .regenerate(&eligible, None, &mut self.generator);

        self.remember_position();
        self.announce_current(true);
        self.current_video()
    }

    /// Switch to the next playlist of a tab, wrapping
    ///
    /// Tab 0 (or an unknown tab) covers every playlist except the unsorted
    /// one.
    pub fn next_playlist(&mut self, tab_index: usize) -> bool {
        self.cycle_playlist(tab_index, true)
    }

    /// Switch to the previous playlist of a tab, wrapping
    pub fn previous_playlist(&mut self, tab_index: usize) -> bool {
        self.cycle_playlist(tab_index, false)
    }

    /// Play a video that belongs to no playlist
    ///
    /// The video is appended to the unsorted playlist (once) and selected
    /// under `all`.
    pub fn play_off_playlist(&mut self, video: Video) -> bool {
        let unsorted = self.playlists.unsorted_mut();
        let before = unsorted.videos.len();
        let index = unsorted.push_video(video);

        if unsorted.videos.len() != before {
            self.events.push(EngineEvent::StructureChanged {
                playlist_id: UNSORTED_PLAYLIST_ID.to_string(),
            });
        }

        self.select_video(UNSORTED_PLAYLIST_ID, index, None)
    }

    // ===== Editing =====

    /// Move a video into a color group, or out of all groups with `None`
    ///
    /// Queues affected by the change go stale and regenerate on next use.
    /// Returns `true` if anything changed.
    pub fn set_video_color(
        &mut self,
        playlist_id: &str,
        video_id: &str,
        color: Option<ColorKey>,
    ) -> bool {
        let Some(playlist) = self.playlists.get_mut(playlist_id) else {
            return false;
        };
        if !playlist.set_video_color(video_id, color) {
            return false;
        }

        debug!(
            playlist = playlist_id,
            video = video_id,
            color = color.map_or("none", |c| c.as_str()),
            "Video regrouped"
        );
        self.events.push(EngineEvent::StructureChanged {
            playlist_id: playlist_id.to_string(),
        });
        true
    }

    /// Adopt a newer snapshot of playlists (and optionally tabs)
    ///
    /// Queues are revalidated lazily. If the active playlist is gone the
    /// controller falls back to having nothing active. If the active queue
    /// went stale it is regenerated with the current video kept first.
    pub fn replace_playlists(&mut self, playlists: Vec<Playlist>, tabs: Option<Vec<PlaylistTab>>) {
        let current_id = self.current_video().map(|v| v.id.clone());
        self.playlists = PlaylistSet::new(playlists);
        if let Some(tabs) = tabs {
            self.tabs = tabs;
        }

        self.queues
            .retain(|playlist_id, _| self.playlists.get(playlist_id).is_some());
        self.positions
            .retain(|playlist_id, _| self.playlists.get(playlist_id).is_some());
        self.last_filters
            .retain(|playlist_id, _| self.playlists.get(playlist_id).is_some());

        let Some(playlist_id) = self.active_playlist_id.clone() else {
            return;
        };
        let Some(playlist) = self.playlists.get(&playlist_id) else {
            debug!(playlist = %playlist_id, "Active playlist removed");
            self.active_playlist_id = None;
            self.active_filter = FilterKey::All;
            return;
        };

        let filter = self.active_filter;
        let eligible = playlist.eligible_indices(filter);
        let pin = current_id.as_deref().and_then(|id| playlist.index_of(id));
        let queue = self
            .queues
            .entry(playlist_id)
            .or_default()
            .entry(filter)
            .or_default();

        if queue.is_stale(eligible.len()) {
            queue.regenerate(&eligible, pin, &mut self.generator);
            self.remember_position();
            let still_current = self.current_video().map(|v| v.id.clone()) == current_id;
            self.announce_current(!still_current);
        }
    }

    // ===== Resume primitives =====

    /// Regenerate `(playlist_id, filter)` pinned to `video_index` and make it active
    ///
    /// With `record` the video also lands in history.
    pub(crate) fn establish(
        &mut self,
        playlist_id: &str,
        filter: FilterKey,
        video_index: usize,
        record: bool,
    ) -> bool {
        let Some(playlist) = self.playlists.get(playlist_id) else {
            return false;
        };

        let eligible = playlist.eligible_indices(filter);
        let queue = self
            .queues
            .entry(playlist_id.to_string())
            .or_default()
            .entry(filter)
            .or_default();
        queue.regenerate(&eligible, Some(video_index), &mut self.generator);
        if let Some(at) = queue.order().iter().position(|&i| i == video_index) {
            queue.set_position(at);
        }

        self.active_playlist_id = Some(playlist_id.to_string());
        self.active_filter = filter;
        self.last_filters.insert(playlist_id.to_string(), filter);
        self.remember_position();
        self.announce_current(record);
        true
    }

    pub(crate) fn pick_index(&mut self, candidates: &[usize]) -> Option<usize> {
        self.generator.pick(candidates)
    }

    // ===== Internals =====

    fn active_queue(&self) -> Option<&QueueState> {
        self.queues
            .get(self.active_playlist_id.as_deref()?)?
            .get(&self.active_filter)
    }

    /// Store the active queue's position in the playlist's memory
    fn remember_position(&mut self) {
        let Some(playlist_id) = self.active_playlist_id.as_deref() else {
            return;
        };
        let Some(position) = self
            .queues
            .get(playlist_id)
            .and_then(|filters| filters.get(&self.active_filter))
            .filter(|queue| !queue.is_empty())
            .map(QueueState::position)
        else {
            return;
        };

        self.positions
            .entry(playlist_id.to_string())
            .or_default()
            .insert(self.active_filter, position);
    }

    /// Make `(playlist_id, filter)` active, freshening its queue and
    /// restoring the remembered position
    fn activate(&mut self, playlist_id: &str, filter: FilterKey) {
        let Some(playlist) = self.playlists.get(playlist_id) else {
            return;
        };

        let remembered = self
            .positions
            .get(playlist_id)
            .and_then(|filters| filters.get(&filter))
            .copied();
        let queue = self
            .queues
            .entry(playlist_id.to_string())
            .or_default()
            .entry(filter)
            .or_default();
        queue.ensure_fresh(playlist, filter, remembered, &mut self.generator);
        if let Some(position) = remembered {
            queue.set_position(position);
        }

        self.active_playlist_id = Some(playlist_id.to_string());
        self.active_filter = filter;
        self.last_filters.insert(playlist_id.to_string(), filter);
    }

    fn step(&mut self, forward: bool) {
        let Some(playlist_id) = self.active_playlist_id.clone() else {
            return;
        };
        let filter = self.active_filter;
        self.activate(&playlist_id, filter);

        let Some(queue) = self
            .queues
            .get_mut(&playlist_id)
            .and_then(|filters| filters.get_mut(&filter))
        else {
            return;
        };
        if queue.is_empty() {
            trace!(playlist = %playlist_id, filter = %filter, "Step on empty queue");
            return;
        }

        if forward {
            queue.advance();
        } else {
            queue.retreat();
        }

        self.remember_position();
        self.announce_current(true);
    }

    fn cycle_playlist(&mut self, tab_index: usize, forward: bool) -> bool {
        let ids: Vec<String> = self
            .playlists
            .tab_playlist_ids(&self.tabs, tab_index)
            .into_iter()
            .map(str::to_string)
            .collect();
        if ids.is_empty() {
            return false;
        }

        let len = ids.len();
        let current = self
            .active_playlist_id
            .as_deref()
            .and_then(|active| ids.iter().position(|id| id == active));
        let target = match (current, forward) {
            (Some(at), true) => (at + 1) % len,
            (Some(at), false) => (at + len - 1) % len,
            (None, true) => 0,
            (None, false) => len - 1,
        };

        self.change_playlist(&ids[target])
    }

    /// Emit `VideoChanged` for the current video and optionally record it
    fn announce_current(&mut self, record: bool) {
        let Some(playlist_id) = self.active_playlist_id.clone() else {
            return;
        };
        let Some(playlist) = self.playlists.get(&playlist_id) else {
            return;
        };
        let Some((video_index, video)) = self
            .current_video_index()
            .and_then(|index| playlist.video(index).map(|video| (index, video)))
        else {
            return;
        };

        let entry = HistoryEntry::now(
            video.id.clone(),
            video.title.clone(),
            playlist.id.clone(),
            playlist.name.clone(),
            self.active_filter,
        );

        self.events.push(EngineEvent::VideoChanged {
            playlist_id,
            video_id: entry.video_id.clone(),
            video_index,
        });

        if record {
            self.record_history(entry);
        }
    }

    fn record_history(&mut self, entry: HistoryEntry) {
        if let Some(evicted) = self.history.record(entry.clone()) {
            self.events.push(EngineEvent::HistoryEvicted {
                video_id: evicted.video_id,
            });
        }
        self.events.push(EngineEvent::HistoryRecorded { entry });
    }
}

impl Default for PlaybackController {
    fn default() -> Self {
        Self::new(Vec::new(), Vec::new(), Vec::new(), &EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> EngineConfig {
        EngineConfig {
            shuffle_seed: Some(11),
            ..EngineConfig::default()
        }
    }

    fn playlist(id: &str, len: usize) -> Playlist {
        let mut playlist = Playlist::new(id, format!("Playlist {id}"));
        for i in 0..len {
            playlist
                .videos
                .push(Video::new(format!("{id}-v{i}"), format!("Video {i}"), 60));
        }
        playlist
    }

    fn controller(playlists: Vec<Playlist>) -> PlaybackController {
        PlaybackController::new(playlists, Vec::new(), Vec::new(), &config())
    }

    fn red() -> FilterKey {
        FilterKey::Color(ColorKey::Red)
    }

    #[test]
    fn nothing_active_before_resume() {
        let mut controller = controller(vec![playlist("p1", 3)]);
        assert!(controller.current_video().is_none());
        assert!(controller.go_next().is_none());
        assert!(controller.cycle_filter().is_none());
        assert!(controller.drain_events().is_empty());
    }

    #[test]
    fn change_playlist_records_history() {
        let mut controller = controller(vec![playlist("p1", 3)]);
        assert!(controller.change_playlist("p1"));

        let current = controller.current_video().unwrap().id.clone();
        assert_eq!(controller.history().most_recent().unwrap().video_id, current);

        let events = controller.drain_events();
        assert!(matches!(events[0], EngineEvent::VideoChanged { .. }));
        assert!(matches!(events[1], EngineEvent::HistoryRecorded { .. }));
    }

    #[test]
    fn change_to_unknown_playlist_is_ignored() {
        let mut controller = controller(vec![playlist("p1", 3)]);
        controller.change_playlist("p1");
        assert!(!controller.change_playlist("missing"));
        assert_eq!(controller.active_playlist_id(), Some("p1"));
    }

    #[test]
    fn go_next_walks_the_whole_queue() {
        let mut controller = controller(vec![playlist("p1", 4)]);
        controller.change_playlist("p1");

        let mut seen = vec![controller.current_video_index().unwrap()];
        for _ in 0..3 {
            controller.go_next();
            seen.push(controller.current_video_index().unwrap());
        }
        seen.sort_unstable();
        assert_eq!(seen, vec![0, 1, 2, 3]);

        controller.go_next();
        assert_eq!(controller.position(), Some(0));
    }

    #[test]
    fn go_previous_undoes_go_next() {
        let mut controller = controller(vec![playlist("p1", 5)]);
        controller.change_playlist("p1");
        let start = controller.current_video_index();

        controller.go_next();
        controller.go_previous();
        assert_eq!(controller.current_video_index(), start);
    }

    #[test]
    fn cycle_filter_skips_empty_colors() {
        let mut p1 = playlist("p1", 4);
        p1.set_video_color("p1-v1", Some(ColorKey::Red));
        p1.set_video_color("p1-v2", Some(ColorKey::Cyan));
        let mut controller = controller(vec![p1]);
        controller.change_playlist("p1");

        assert_eq!(controller.cycle_filter(), Some(red()));
        assert_eq!(controller.current_video_index(), Some(1));
        assert_eq!(
            controller.cycle_filter(),
            Some(FilterKey::Color(ColorKey::Cyan))
        );
        assert_eq!(controller.current_video_index(), Some(2));
        assert_eq!(controller.cycle_filter(), Some(FilterKey::All));
        assert_eq!(controller.queue_len(), 4);
    }

    #[test]
    fn playlist_memory_is_restored() {
        let mut p1 = playlist("p1", 6);
        for id in ["p1-v0", "p1-v1", "p1-v2", "p1-v3", "p1-v4"] {
            p1.set_video_color(id, Some(ColorKey::Red));
        }
        let mut controller = controller(vec![p1, playlist("p2", 3)]);
        controller.change_playlist("p1");
        controller.cycle_filter();
        for _ in 0..3 {
            controller.go_next();
        }
        assert_eq!(controller.position(), Some(3));
        let video = controller.current_video_index();

        controller.change_playlist("p2");
        assert_eq!(controller.active_filter(), FilterKey::All);

        controller.change_playlist("p1");
        assert_eq!(controller.active_filter(), red());
        assert_eq!(controller.position(), Some(3));
        assert_eq!(controller.current_video_index(), video);
    }

    #[test]
    fn select_video_falls_back_to_all() {
        let mut p1 = playlist("p1", 5);
        p1.set_video_color("p1-v1", Some(ColorKey::Red));
        let mut controller = controller(vec![p1]);

        assert!(controller.select_video("p1", 2, Some(red())));
        assert_eq!(controller.active_filter(), FilterKey::All);
        assert_eq!(controller.current_video_index(), Some(2));

        assert!(controller.select_video("p1", 1, Some(red())));
        assert_eq!(controller.active_filter(), red());
        assert_eq!(controller.current_video_index(), Some(1));
    }

    #[test]
    fn select_unknown_video_is_ignored() {
        let mut controller = controller(vec![playlist("p1", 2)]);
        assert!(!controller.select_video("p1", 7, None));
        assert!(!controller.select_video("nope", 0, None));
        assert!(controller.active_playlist_id().is_none());
    }

    #[test]
    fn stepping_an_empty_playlist_is_a_no_op() {
        let mut controller = controller(vec![playlist("empty", 0)]);
        controller.change_playlist("empty");

        assert!(controller.go_next().is_none());
        assert!(controller.go_previous().is_none());
        assert!(controller.current_video().is_none());
        assert!(controller.history().is_empty());
    }

    #[test]
    fn regrouping_makes_the_queue_stale() {
        let mut p1 = playlist("p1", 5);
        p1.set_video_color("p1-v1", Some(ColorKey::Red));
        p1.set_video_color("p1-v3", Some(ColorKey::Red));
        let mut controller = controller(vec![p1]);
        controller.select_video("p1", 1, Some(red()));
        assert_eq!(controller.queue_len(), 2);

        assert!(controller.set_video_color("p1", "p1-v0", Some(ColorKey::Red)));
        assert!(!controller.set_video_color("p1", "p1-v0", Some(ColorKey::Red)));
        controller.go_next();
        assert_eq!(controller.queue_len(), 3);

        let events = controller.drain_events();
        assert!(events.contains(&EngineEvent::StructureChanged {
            playlist_id: "p1".to_string()
        }));
    }

    #[test]
    fn tabs_cycle_playlists_without_unsorted() {
        let mut controller = controller(vec![playlist("a", 1), playlist("b", 1)]);
        controller.change_playlist("a");

        assert!(controller.next_playlist(0));
        assert_eq!(controller.active_playlist_id(), Some("b"));
        assert!(controller.next_playlist(0));
        assert_eq!(controller.active_playlist_id(), Some("a"));
        assert!(controller.previous_playlist(0));
        assert_eq!(controller.active_playlist_id(), Some("b"));
    }

    #[test]
    fn custom_tab_limits_cycling() {
        let tabs = vec![
            PlaylistTab::all(),
            PlaylistTab {
                name: "Music".to_string(),
                playlist_ids: vec!["c".to_string(), "a".to_string()],
            },
        ];
        let mut controller = PlaybackController::new(
            vec![playlist("a", 1), playlist("b", 1), playlist("c", 1)],
            tabs,
            Vec::new(),
            &config(),
        );
        controller.change_playlist("b");

        // Tab members keep playlist order: [a, c]
        assert!(controller.next_playlist(1));
        assert_eq!(controller.active_playlist_id(), Some("a"));
        assert!(controller.next_playlist(1));
        assert_eq!(controller.active_playlist_id(), Some("c"));
    }

    #[test]
    fn off_playlist_video_lands_in_unsorted() {
        let mut controller = controller(vec![playlist("p1", 2)]);
        assert!(controller.play_off_playlist(Video::new("loose", "Loose", 30)));
        assert!(controller.play_off_playlist(Video::new("loose", "Loose", 30)));

        assert_eq!(controller.active_playlist_id(), Some(UNSORTED_PLAYLIST_ID));
        assert_eq!(controller.current_video().unwrap().id, "loose");
        let unsorted = controller.playlists().get(UNSORTED_PLAYLIST_ID).unwrap();
        assert_eq!(unsorted.videos.len(), 1);
    }

    #[test]
    fn history_eviction_is_reported() {
        let config = EngineConfig {
            history_capacity: 2,
            shuffle_seed: Some(1),
            ..EngineConfig::default()
        };
        let mut controller =
            PlaybackController::new(vec![playlist("p1", 3)], Vec::new(), Vec::new(), &config);

        for index in 0..3 {
            controller.select_video("p1", index, None);
        }

        let evicted: Vec<_> = controller
            .drain_events()
            .into_iter()
            .filter_map(|event| match event {
                EngineEvent::HistoryEvicted { video_id } => Some(video_id),
                _ => None,
            })
            .collect();
        assert!(!evicted.is_empty());
        assert_eq!(controller.history().len(), 2);
        assert!(controller.history().contains("p1-v2"));
        assert!(controller.history().contains("p1-v1"));
    }

    #[test]
    fn replace_playlists_keeps_current_video() {
        let mut controller = controller(vec![playlist("p1", 3)]);
        controller.select_video("p1", 1, None);

        let mut grown = playlist("p1", 3);
        grown.videos.insert(0, Video::new("new", "New", 10));
        controller.replace_playlists(vec![grown], None);

        assert_eq!(controller.queue_len(), 4);
        assert_eq!(controller.current_video().unwrap().id, "p1-v1");
    }

    #[test]
    fn replace_playlists_drops_removed_active() {
        let mut controller = controller(vec![playlist("p1", 3), playlist("p2", 1)]);
        controller.change_playlist("p1");

        controller.replace_playlists(vec![playlist("p2", 1)], None);
        assert!(controller.active_playlist_id().is_none());
        assert!(controller.current_video().is_none());
    }

    #[test]
    fn reshuffle_keeps_queue_length() {
        let mut controller = controller(vec![playlist("p1", 6)]);
        controller.change_playlist("p1");
        controller.go_next();

        assert!(controller.reshuffle().is_some());
        assert_eq!(controller.position(), Some(0));
        assert_eq!(controller.queue_len(), 6);
    }
}
