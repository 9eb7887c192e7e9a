//! Queue and controller integration tests
//!
//! Real-world scenarios: resuming a session, regrouping videos while
//! watching, switching playlists and coming back.

use tv_core::types::{ColorKey, FilterKey, HistoryEntry, Playlist, Video};
use tv_playback::{
    EngineConfig, EngineEvent, PlaybackController, QueueState, ResumeOutcome,
    ShuffleOrderGenerator,
};

// ===== Test Helpers =====

fn create_playlist(id: &str, len: usize) -> Playlist {
    let mut playlist = Playlist::new(id, format!("Playlist {id}"));
    for i in 0..len {
        playlist
            .videos
            .push(Video::new(format!("v{i}"), format!("Video {i}"), 300));
    }
    playlist
}

fn seeded_config(seed: u64) -> EngineConfig {
    EngineConfig {
        shuffle_seed: Some(seed),
        ..EngineConfig::default()
    }
}

fn red() -> FilterKey {
    FilterKey::Color(ColorKey::Red)
}

// ===== Queue Scenarios =====

#[test]
fn test_all_filter_order_is_permutation_and_loops() {
    let playlist = create_playlist("p1", 5);
    let mut generator = ShuffleOrderGenerator::seeded(8);
    let mut queue = QueueState::new();

    queue.ensure_fresh(&playlist, FilterKey::All, None, &mut generator);
    let mut sorted = queue.order().to_vec();
    sorted.sort_unstable();
    assert_eq!(sorted, vec![0, 1, 2, 3, 4]);

    let start = queue.position();
    for _ in 0..5 {
        queue.advance();
    }
    assert_eq!(queue.position(), start);
}

#[test]
fn test_adding_to_group_regenerates_on_next_use() {
    let mut playlist = create_playlist("p1", 5);
    playlist.set_video_color("v1", Some(ColorKey::Red));
    playlist.set_video_color("v3", Some(ColorKey::Red));

    let mut generator = ShuffleOrderGenerator::seeded(8);
    let mut queue = QueueState::new();
    queue.ensure_fresh(&playlist, red(), None, &mut generator);
    assert_eq!(queue.len(), 2);

    playlist.set_video_color("v0", Some(ColorKey::Red));
    assert!(queue.ensure_fresh(&playlist, red(), None, &mut generator));
    assert_eq!(queue.len(), 3);
}

#[test]
fn test_same_size_change_is_not_stale() {
    let mut playlist = create_playlist("p1", 5);
    playlist.set_video_color("v1", Some(ColorKey::Red));

    let mut generator = ShuffleOrderGenerator::seeded(8);
    let mut queue = QueueState::new();
    queue.ensure_fresh(&playlist, red(), None, &mut generator);
    assert_eq!(queue.order(), &[1]);

    // Swap the only red video for another one: same length, left alone
    playlist.set_video_color("v1", None);
    playlist.set_video_color("v4", Some(ColorKey::Red));
    assert!(!queue.ensure_fresh(&playlist, red(), None, &mut generator));
    assert_eq!(queue.order(), &[1]);
}

// ===== Controller Scenarios =====

#[test]
fn test_resume_places_history_video_current() {
    let history = vec![HistoryEntry::now("v2", "Video 2", "p1", "Playlist p1", FilterKey::All)];
    let mut controller = PlaybackController::new(
        vec![create_playlist("p1", 5)],
        Vec::new(),
        history,
        &seeded_config(1),
    );

    assert!(matches!(controller.resume(), ResumeOutcome::Resumed { .. }));
    assert_eq!(controller.current_video_index(), Some(2));
    assert_eq!(controller.current_video().unwrap().id, "v2");
}

#[test]
fn test_go_next_on_empty_playlist() {
    let mut controller = PlaybackController::new(
        vec![create_playlist("empty", 0)],
        Vec::new(),
        Vec::new(),
        &seeded_config(1),
    );
    controller.resume();
    controller.change_playlist("empty");

    assert!(controller.go_next().is_none());
    assert!(controller.current_video().is_none());
}

#[test]
fn test_select_video_outside_hinted_group_uses_all() {
    let mut playlist = create_playlist("p1", 5);
    playlist.set_video_color("v0", Some(ColorKey::Red));
    let mut controller =
        PlaybackController::new(vec![playlist], Vec::new(), Vec::new(), &seeded_config(2));
    controller.resume();

    assert!(controller.select_video("p1", 2, Some(red())));
    assert_eq!(controller.active_filter(), FilterKey::All);
    assert_eq!(controller.current_video().unwrap().id, "v2");
}

#[test]
fn test_switching_playlists_restores_filter_and_position() {
    let mut a = create_playlist("a", 8);
    for id in ["v0", "v2", "v4", "v5", "v7"] {
        a.set_video_color(id, Some(ColorKey::Red));
    }
    let mut controller = PlaybackController::new(
        vec![a, create_playlist("b", 4)],
        Vec::new(),
        Vec::new(),
        &seeded_config(3),
    );
    controller.resume();
    controller.change_playlist("a");

    while controller.active_filter() != red() {
        controller.cycle_filter();
    }
    while controller.position() != Some(3) {
        controller.go_next();
    }
    let playing = controller.current_video().unwrap().id.clone();

    controller.change_playlist("b");
    controller.go_next();
    controller.change_playlist("a");

    assert_eq!(controller.active_filter(), red());
    assert_eq!(controller.position(), Some(3));
    assert_eq!(controller.current_video().unwrap().id, playing);
}

#[test]
fn test_every_navigation_is_recorded_in_history() {
    let mut controller = PlaybackController::new(
        vec![create_playlist("p1", 4)],
        Vec::new(),
        Vec::new(),
        &seeded_config(4),
    );
    controller.resume();
    controller.drain_events();

    controller.go_next();
    let current = controller.current_video().unwrap().id.clone();
    let events = controller.drain_events();

    assert!(events.iter().any(|event| matches!(
        event,
        EngineEvent::HistoryRecorded { entry } if entry.video_id == current
    )));
    assert_eq!(controller.history().most_recent().unwrap().video_id, current);
}
