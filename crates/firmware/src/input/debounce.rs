//! Minimum-interval guard for one event class.

use embassy_time::{Duration, Instant};

/// Accepts an event only if `interval` has passed since the last accepted one.
///
/// The first event is always accepted. Rejected events do not restart the
/// interval, so a continuous burst still lets one event through per interval.
#[derive(Debug, Clone, Copy)]
pub struct Debouncer {
    interval: Duration,
    last: Option<Instant>,
}

impl Debouncer {
    /// Guard with the given minimum interval.
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    /// Record an event at `now`; `true` if it is accepted.
    pub fn accept(&mut self, now: Instant) -> bool {
        let accepted = match self.last {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.interval,
        };
        if accepted {
            self.last = Some(now);
        }
        accepted
    }
}
