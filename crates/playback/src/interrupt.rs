//! Generation-tagged interruption signal.
//!
//! The signal holds the newest generation that must be abandoned. A stream
//! checks it at every chunk boundary and stops when its own generation is at
//! or below the target. Only the engine servicing generation `g` may clear a
//! target of exactly `g`, so an engine finishing an old request can never
//! erase an interruption aimed at a newer one.

use core::sync::atomic::{AtomicU32, Ordering};

use crate::request::Generation;

/// "Abandon at next chunk boundary" flag, tagged with its target generation.
#[derive(Debug)]
pub struct InterruptSignal {
    target: AtomicU32,
}

impl InterruptSignal {
    /// Signal with nothing asserted.
    pub const fn new() -> Self {
        Self {
            target: AtomicU32::new(0),
        }
    }

    /// Ask the stream tagged `generation` (and anything older) to stop.
    ///
    /// Asserting [`Generation::NONE`] is a no-op. The target only moves
    /// forward.
    pub fn assert(&self, generation: Generation) {
        if generation.is_none() {
            return;
        }
        self.target.fetch_max(generation.get(), Ordering::AcqRel);
    }

    /// `true` if the stream tagged `generation` must stop.
    pub fn is_asserted_for(&self, generation: Generation) -> bool {
        let target = self.target.load(Ordering::Acquire);
        target != 0 && target >= generation.get()
    }

    /// Clear the signal if it targets exactly `generation`.
    ///
    /// Returns `true` if it was cleared. Called only by the engine, for the
    /// generation it just finished servicing.
    pub fn clear_for(&self, generation: Generation) -> bool {
        self.target
            .compare_exchange(generation.get(), 0, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Current target, [`Generation::NONE`] when clear.
    pub fn target(&self) -> Generation {
        Generation::from_raw(self.target.load(Ordering::Acquire))
    }
}

impl Default for InterruptSignal {
    fn default() -> Self {
        Self::new()
    }
}
