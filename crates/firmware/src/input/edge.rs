//! Interrupt-context edge classifier.
//!
//! The encoder's edge interrupts call [`EdgeQueue::on_primary_edge`] and
//! [`EdgeQueue::on_switch_edge`]. Both are synchronous, never block, never
//! allocate and never log: they classify the edge and `try_send` it into a
//! bounded channel.
//!
//! # Drop policy
//!
//! When the channel already holds [`INPUT_QUEUE_DEPTH`] events the new event
//! is discarded and the drop counter incremented. Events already queued are
//! never replaced, so the consumer sees a prefix of the real edge sequence.
//! The consumer task reports the counter at `warn` level.

use core::sync::atomic::{AtomicU32, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use platform::config::INPUT_QUEUE_DEPTH;
use platform::{Direction, EncoderEvent, InputDevice};

/// Bounded handoff from interrupt context to the input consumer.
pub struct EdgeQueue {
    channel: Channel<CriticalSectionRawMutex, EncoderEvent, INPUT_QUEUE_DEPTH>,
    dropped: AtomicU32,
}

impl EdgeQueue {
    /// Empty queue.
    pub const fn new() -> Self {
        Self {
            channel: Channel::new(),
            dropped: AtomicU32::new(0),
        }
    }

    /// Rising edge on the primary phase line.
    ///
    /// `secondary_high` is the level of the secondary line sampled in the
    /// same interrupt: low means clockwise, high counter-clockwise. Returns
    /// `false` if the event was dropped.
    pub fn on_primary_edge(&self, secondary_high: bool) -> bool {
        let direction = if secondary_high {
            Direction::CounterClockwise
        } else {
            Direction::Clockwise
        };
        self.post(EncoderEvent::Step(direction))
    }

    /// Rising edge on the push switch. Returns `false` if dropped.
    pub fn on_switch_edge(&self) -> bool {
        self.post(EncoderEvent::Switch)
    }

    fn post(&self, event: EncoderEvent) -> bool {
        if self.channel.try_send(event).is_ok() {
            true
        } else {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            false
        }
    }

    /// Events dropped since start-up. Wraps at `u32::MAX`.
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Consumer handle.
    pub fn receiver(&self) -> EdgeReceiver<'_> {
        EdgeReceiver { queue: self }
    }
}

impl Default for EdgeQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Read side of an [`EdgeQueue`].
pub struct EdgeReceiver<'a> {
    queue: &'a EdgeQueue,
}

impl InputDevice for EdgeReceiver<'_> {
    async fn wait_for_event(&mut self) -> EncoderEvent {
        self.queue.channel.receive().await
    }

    fn poll_event(&mut self) -> Option<EncoderEvent> {
        self.queue.channel.try_receive().ok()
    }

    fn dropped_events(&self) -> u32 {
        self.queue.dropped()
    }
}

/// The device's edge queue, written by the encoder interrupts.
pub static INPUT_EVENTS: EdgeQueue = EdgeQueue::new();

/// Events the encoder interrupts had to drop so far.
pub fn dropped_events() -> u32 {
    INPUT_EVENTS.dropped()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secondary_level_selects_direction() {
        let queue = EdgeQueue::new();
        let mut rx = queue.receiver();
        assert!(queue.on_primary_edge(false));
        assert!(queue.on_primary_edge(true));
        assert!(queue.on_switch_edge());
        assert_eq!(rx.poll_event(), Some(EncoderEvent::Step(Direction::Clockwise)));
        assert_eq!(
            rx.poll_event(),
            Some(EncoderEvent::Step(Direction::CounterClockwise))
        );
        assert_eq!(rx.poll_event(), Some(EncoderEvent::Switch));
        assert_eq!(rx.poll_event(), None);
    }

    #[test]
    fn full_queue_drops_newest_and_counts() {
        let queue = EdgeQueue::new();
        for _ in 0..INPUT_QUEUE_DEPTH {
            assert!(queue.on_primary_edge(false));
        }
        assert!(!queue.on_switch_edge());
        assert!(!queue.on_primary_edge(true));
        assert_eq!(queue.dropped(), 2);

        let mut rx = queue.receiver();
        assert_eq!(rx.dropped_events(), 2);
        let drained: std::vec::Vec<_> = core::iter::from_fn(|| rx.poll_event()).collect();
        assert_eq!(drained.len(), INPUT_QUEUE_DEPTH);
        assert!(drained
            .iter()
            .all(|ev| *ev == EncoderEvent::Step(Direction::Clockwise)));

        // Space again after draining.
        assert!(queue.on_switch_edge());
    }
}
