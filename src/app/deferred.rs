use std::time::{Duration, Instant};

/// A single pending callback of one kind, polled once per frame.
///
/// Scheduling again replaces the pending deadline, so a burst of events
/// collapses into one firing after `delay` of quiet.
pub struct Deferred {
    delay: Duration,
    due: Option<Instant>,
}

impl Deferred {
    pub fn new(delay: Duration) -> Self {
        Self { delay, due: None }
    }

    pub fn schedule(&mut self, now: Instant) {
        self.due = Some(now + self.delay);
    }

    pub fn cancel(&mut self) {
        self.due = None;
    }

    pub fn is_pending(&self) -> bool {
        self.due.is_some()
    }

    /// True once when the deadline has passed; the callback is then consumed.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.due {
            Some(due) if now >= due => {
                self.due = None;
                true
            }
            _ => false,
        }
    }

    /// Time left until the pending callback is due.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.due.map(|due| due.saturating_duration_since(now))
    }
}
