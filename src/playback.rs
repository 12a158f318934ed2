//! Month animation timer.
//!
//! The timer never runs on its own thread. The UI loop polls it and asks
//! egui for a repaint when the next tick is due.

use std::time::{Duration, Instant};

/// A cancellable repeating tick. At most one schedule exists at a time.
#[derive(Clone, Debug)]
pub struct Playback {
    interval: Duration,
    next_due: Option<Instant>,
}

impl Playback {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.next_due.is_some()
    }

    /// Schedules the first tick one interval from `now`. Returns `false`
    /// and keeps the running schedule if already playing.
    pub fn start(&mut self, now: Instant) -> bool {
        if self.is_playing() {
            return false;
        }
        self.next_due = Some(now + self.interval);
        true
    }

    /// Cancels the schedule. Returns `false` if nothing was running.
    pub fn stop(&mut self) -> bool {
        self.next_due.take().is_some()
    }

    /// Starts when stopped, stops when started. Returns the new state.
    pub fn toggle(&mut self, now: Instant) -> bool {
        if self.is_playing() {
            self.stop();
        } else {
            self.start(now);
        }
        self.is_playing()
    }

    /// Consumes a due tick. A stalled UI gets a single tick, not a burst.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.next_due {
            Some(due) if now >= due => {
                self.next_due = Some(now + self.interval);
                true
            }
            _ => false,
        }
    }

    /// Time left until the next tick, if playing.
    pub fn until_next(&self, now: Instant) -> Option<Duration> {
        self.next_due.map(|due| due.saturating_duration_since(now))
    }
}

/// The month after `index`, wrapping to the first past the last.
pub fn next_index(index: usize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    (index + 1) % len
}
