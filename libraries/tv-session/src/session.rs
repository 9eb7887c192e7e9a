//! Playback session
//!
//! Glues the synchronous engine to a persistence gateway. Engine events
//! become history writes (immediately) and structural saves (debounced);
//! heartbeats become progress writes (debounced). Everything runs on the
//! owner's task: call [`Session::run_due`] when [`Session::next_deadline`]
//! passes, and [`Session::shutdown`] on teardown.

use crate::config::SessionConfig;
use crate::error::Result;
use crate::scheduler::{FlushKind, PersistenceScheduler};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};
use tv_core::traits::PersistenceGateway;
use tv_core::types::{ColorKey, FilterKey, HistoryEntry, UserSnapshot, Video};
use tv_playback::{EngineEvent, PlaybackController, ProgressTracker, ResumeOutcome};

/// A history write waiting to reach the gateway
#[derive(Debug, Clone, PartialEq)]
enum HistoryWrite {
    Append(HistoryEntry),
    Delete(String),
}

/// One user's playback session
pub struct Session {
    gateway: Arc<dyn PersistenceGateway>,
    controller: PlaybackController,
    progress: ProgressTracker,
    scheduler: PersistenceScheduler,
    heartbeat_period: std::time::Duration,
    resume_outcome: ResumeOutcome,

    /// Playlists or tabs changed since the last successful save
    structure_dirty: bool,

    /// History writes not yet accepted by the gateway, oldest first
    pending_history: VecDeque<HistoryWrite>,
}

impl Session {
    /// Load the user's data, resume playback and persist what resuming recorded
    pub async fn start(gateway: Arc<dyn PersistenceGateway>, config: &SessionConfig) -> Result<Self> {
        config.validate()?;

        let UserSnapshot {
            playlists,
            playlist_tabs,
            progress,
            history,
        } = gateway.load().await?;

        info!(
            user = gateway.user_id(),
            playlists = playlists.len(),
            history = history.len(),
            "Starting session"
        );

        let engine_config = config.engine_config();
        let mut controller =
            PlaybackController::new(playlists, playlist_tabs, history, &engine_config);
        let resume_outcome = controller.resume();

        let mut session = Self {
            gateway,
            controller,
            progress: ProgressTracker::with_durable(progress, engine_config.watched_ratio),
            scheduler: PersistenceScheduler::new(
                config.structural_debounce(),
                config.progress_debounce(),
            ),
            heartbeat_period: config.heartbeat_period(),
            resume_outcome,
            structure_dirty: false,
            pending_history: VecDeque::new(),
        };
        session.process_events().await;

        Ok(session)
    }

    // ===== Queries =====

    pub fn resume_outcome(&self) -> &ResumeOutcome {
        &self.resume_outcome
    }

    /// Read-only view of the engine
    pub fn controller(&self) -> &PlaybackController {
        &self.controller
    }

    pub fn current_video(&self) -> Option<&Video> {
        self.controller.current_video()
    }

    /// Watch history, most recent first
    pub fn history(&self) -> impl Iterator<Item = &HistoryEntry> + Clone {
        self.controller.history().all()
    }

    pub fn progress(&self) -> &ProgressTracker {
        &self.progress
    }

    /// Seconds watched of a video
    pub fn progress_of(&self, video_id: &str) -> u64 {
        self.progress.get(video_id)
    }

    pub fn is_watched(&self, video: &Video) -> bool {
        self.progress.is_watched(&video.id, video.duration_seconds)
    }

    /// Whether any write is still waiting
    pub fn has_pending_writes(&self) -> bool {
        self.structure_dirty || self.progress.is_dirty() || !self.pending_history.is_empty()
    }

    /// Ticker for the playback heartbeat
    ///
    /// The host feeds the player position to [`heartbeat`](Self::heartbeat)
    /// on every tick while playing.
    pub fn heartbeat_interval(&self) -> Interval {
        let mut interval =
            tokio::time::interval_at(Instant::now() + self.heartbeat_period, self.heartbeat_period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        interval
    }

    // ===== Playback operations =====

    pub async fn change_playlist(&mut self, playlist_id: &str) -> Option<Video> {
        self.controller.change_playlist(playlist_id);
        self.finish_operation().await
    }

    pub async fn cycle_filter(&mut self) -> Option<FilterKey> {
        let filter = self.controller.cycle_filter();
        self.process_events().await;
        filter
    }

    pub async fn go_next(&mut self) -> Option<Video> {
        self.controller.go_next();
        self.finish_operation().await
    }

    pub async fn go_previous(&mut self) -> Option<Video> {
        self.controller.go_previous();
        self.finish_operation().await
    }

    pub async fn select_video(
        &mut self,
        playlist_id: &str,
        video_index: usize,
        filter_hint: Option<FilterKey>,
    ) -> Option<Video> {
        self.controller
            .select_video(playlist_id, video_index, filter_hint);
        self.finish_operation().await
    }

    pub async fn reshuffle(&mut self) -> Option<Video> {
        self.controller.reshuffle();
        self.finish_operation().await
    }

    pub async fn next_playlist(&mut self, tab_index: usize) -> Option<Video> {
        self.controller.next_playlist(tab_index);
        self.finish_operation().await
    }

    pub async fn previous_playlist(&mut self, tab_index: usize) -> Option<Video> {
        self.controller.previous_playlist(tab_index);
        self.finish_operation().await
    }

    pub async fn play_off_playlist(&mut self, video: Video) -> Option<Video> {
        self.controller.play_off_playlist(video);
        self.finish_operation().await
    }

    pub async fn set_video_color(
        &mut self,
        playlist_id: &str,
        video_id: &str,
        color: Option<ColorKey>,
    ) -> bool {
        let changed = self.controller.set_video_color(playlist_id, video_id, color);
        self.process_events().await;
        changed
    }

    /// Adopt a newer snapshot delivered by the data source
    ///
    /// History in the snapshot is ignored; the session's own log is newer.
    pub async fn apply_snapshot(&mut self, snapshot: UserSnapshot) {
        debug!(playlists = snapshot.playlists.len(), "Applying snapshot");
        self.controller
            .replace_playlists(snapshot.playlists, Some(snapshot.playlist_tabs));
        self.progress.load_durable(snapshot.progress);
        self.process_events().await;
    }

    // ===== Progress =====

    /// Record the player position for the current video
    ///
    /// Schedules a debounced progress flush. Returns `false` if nothing is
    /// playing or the position is not a finite number.
    pub fn heartbeat(&mut self, seconds: f64) -> bool {
        let Some(video_id) = self.controller.current_video().map(|v| v.id.clone()) else {
            return false;
        };
        if !self.progress.record(&video_id, seconds) {
            return false;
        }

        self.scheduler.schedule(FlushKind::Progress);
        true
    }

    /// Player paused: record the position like a heartbeat
    pub fn pause(&mut self, seconds: f64) -> bool {
        self.heartbeat(seconds)
    }

    /// Player stopped: record the position and write progress right away
    pub async fn stop(&mut self, seconds: f64) -> Result<()> {
        self.heartbeat(seconds);
        self.scheduler.cancel(FlushKind::Progress);
        if let Err(e) = self.save_progress().await {
            self.scheduler.schedule(FlushKind::Progress);
            return Err(e.into());
        }
        Ok(())
    }

    // ===== Persistence =====

    /// Earliest pending flush deadline
    pub fn next_deadline(&self) -> Option<Instant> {
        self.scheduler.next_deadline()
    }

    /// Run every flush that is due
    ///
    /// A failed flush keeps its data dirty and is scheduled again. Returns
    /// the number of flushes that succeeded.
    pub async fn run_due(&mut self) -> usize {
        let mut flushed = 0;

        for kind in self.scheduler.take_due(Instant::now()) {
            let result = match kind {
                FlushKind::Structural => self.save_structure().await,
                FlushKind::Progress => self.save_progress().await.map(|_| ()),
            };

            match result {
                Ok(()) => flushed += 1,
                Err(e) => {
                    warn!(kind = ?kind, error = %e, "Flush failed, retrying after debounce");
                    self.scheduler.schedule(kind);
                }
            }
        }

        flushed
    }

    /// Sleep until the next deadline, then run what is due
    ///
    /// Returns immediately with 0 if nothing is scheduled.
    pub async fn flush_when_due(&mut self) -> usize {
        let Some(deadline) = self.scheduler.next_deadline() else {
            return 0;
        };
        tokio::time::sleep_until(deadline).await;
        self.run_due().await
    }

    /// Write everything pending now, skipping the debounce
    pub async fn flush_now(&mut self) -> Result<()> {
        self.scheduler.cancel_all();

        let structure = self.save_structure().await;
        let progress = self.save_progress().await;

        if structure.is_err() {
            self.scheduler.schedule(FlushKind::Structural);
        }
        if progress.is_err() {
            self.scheduler.schedule(FlushKind::Progress);
        }

        structure?;
        progress?;
        Ok(())
    }

    /// Flush everything pending and end the session (best-effort)
    pub async fn shutdown(mut self) -> Result<()> {
        let result = self.flush_now().await;
        match &result {
            Ok(()) => info!(user = self.gateway.user_id(), "Session closed"),
            Err(e) => warn!(error = %e, "Session closed with unsaved changes"),
        }
        self.scheduler.cancel_all();
        result
    }

    // ===== Internals =====

    async fn finish_operation(&mut self) -> Option<Video> {
        self.process_events().await;
        self.controller.current_video().cloned()
    }

    /// Route drained engine events to the gateway and scheduler
    async fn process_events(&mut self) {
        for event in self.controller.drain_events() {
            match event {
                EngineEvent::VideoChanged {
                    playlist_id,
                    video_id,
                    video_index,
                } => {
                    debug!(playlist = %playlist_id, video = %video_id, video_index, "Now playing");
                }
                EngineEvent::FilterChanged {
                    playlist_id,
                    filter,
                } => {
                    debug!(playlist = %playlist_id, filter = %filter, "Filter changed");
                }
                EngineEvent::HistoryRecorded { entry } => {
                    self.pending_history.push_back(HistoryWrite::Append(entry));
                }
                EngineEvent::HistoryEvicted { video_id } => {
                    self.pending_history.push_back(HistoryWrite::Delete(video_id));
                }
                EngineEvent::StructureChanged { playlist_id } => {
                    debug!(playlist = %playlist_id, "Structure changed");
                    self.structure_dirty = true;
                    self.scheduler.schedule(FlushKind::Structural);
                }
            }
        }

        if let Err(e) = self.write_history().await {
            warn!(error = %e, pending = self.pending_history.len(), "History write failed, will retry");
            self.scheduler.schedule(FlushKind::Structural);
        }
    }

    /// Send queued history writes in order, stopping at the first failure
    async fn write_history(&mut self) -> tv_core::Result<()> {
        while let Some(write) = self.pending_history.front() {
            match write {
                HistoryWrite::Append(entry) => self.gateway.append_history(entry).await?,
                HistoryWrite::Delete(video_id) => self.gateway.delete_history(video_id).await?,
            }
            self.pending_history.pop_front();
        }
        Ok(())
    }

    /// Save queued history, then playlists and tabs if they changed
    async fn save_structure(&mut self) -> tv_core::Result<()> {
        self.write_history().await?;

        if !self.structure_dirty {
            return Ok(());
        }

        self.gateway
            .save_structural(
                self.controller.playlists().as_slice(),
                self.controller.tabs(),
            )
            .await?;
        self.structure_dirty = false;
        debug!("Structure saved");
        Ok(())
    }

    /// Write dirty progress as a delta; returns the number of videos written
    async fn save_progress(&mut self) -> tv_core::Result<usize> {
        let Some(delta) = self.progress.flush_batch() else {
            return Ok(0);
        };

        self.gateway.save_progress_delta(&delta).await?;
        self.progress.acknowledge(&delta);
        debug!(videos = delta.len(), "Progress saved");
        Ok(delta.len())
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if self.has_pending_writes() {
            warn!("Session dropped with unsaved changes; call shutdown() to flush");
        }
    }
}
