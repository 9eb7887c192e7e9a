//! Cancellable scheduled flushes
//!
//! A debounce is a single optional deadline on the tokio clock. Arming it
//! again replaces the deadline, so only the last mutation in a burst
//! leads to a write. The owner sleeps until the earliest deadline and
//! flushes whatever is due; nothing runs in the background.

use tokio::time::{Duration, Instant};

/// One debounced flush
#[derive(Debug, Clone)]
pub struct DebounceTask {
    delay: Duration,
    deadline: Option<Instant>,
}

impl DebounceTask {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Cancel any pending flush and schedule a new one `delay` from now
    pub fn schedule(&mut self) {
        self.deadline = Some(Instant::now() + self.delay);
    }

    /// Drop the pending flush; returns whether one was pending
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_due(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| deadline <= now)
    }

    /// Disarm if due; returns `true` when the caller should flush
    pub fn take_due(&mut self, now: Instant) -> bool {
        if self.is_due(now) {
            self.deadline = None;
            true
        } else {
            false
        }
    }

    /// Disarm regardless of the deadline; returns `true` if a flush was pending
    pub fn flush_now(&mut self) -> bool {
        self.cancel()
    }
}
