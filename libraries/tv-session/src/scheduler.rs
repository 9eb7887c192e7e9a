//! Two independently debounced persistence channels

use crate::debounce::DebounceTask;
use tokio::time::{Duration, Instant};

/// What a flush writes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushKind {
    /// Playlists and tabs (and any history writes waiting for a retry)
    Structural,
    /// Dirty watch progress
    Progress,
}

/// Debounce timers for structural and progress writes
#[derive(Debug, Clone)]
pub struct PersistenceScheduler {
    structural: DebounceTask,
    progress: DebounceTask,
}

impl PersistenceScheduler {
    pub fn new(structural_delay: Duration, progress_delay: Duration) -> Self {
        Self {
            structural: DebounceTask::new(structural_delay),
            progress: DebounceTask::new(progress_delay),
        }
    }

    /// (Re-)arm a channel; the previous deadline is discarded
    pub fn schedule(&mut self, kind: FlushKind) {
        self.task_mut(kind).schedule();
    }

    pub fn cancel(&mut self, kind: FlushKind) -> bool {
        self.task_mut(kind).cancel()
    }

    pub fn cancel_all(&mut self) {
        self.structural.cancel();
        self.progress.cancel();
    }

    pub fn is_pending(&self, kind: FlushKind) -> bool {
        self.task(kind).is_pending()
    }

    /// Earliest armed deadline
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.structural.deadline(), self.progress.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Disarm and return every channel that is due at `now`
    pub fn take_due(&mut self, now: Instant) -> Vec<FlushKind> {
        [FlushKind::Structural, FlushKind::Progress]
            .into_iter()
            .filter(|kind| self.task_mut(*kind).take_due(now))
            .collect()
    }

    fn task(&self, kind: FlushKind) -> &DebounceTask {
        match kind {
            FlushKind::Structural => &self.structural,
            FlushKind::Progress => &self.progress,
        }
    }

    fn task_mut(&mut self, kind: FlushKind) -> &mut DebounceTask {
        match kind {
            FlushKind::Structural => &mut self.structural,
            FlushKind::Progress => &mut self.progress,
        }
    }
}
