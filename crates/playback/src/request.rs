//! Stream requests, generations and outcome reports.

use core::sync::atomic::{AtomicU32, Ordering};

use platform::ResourcePath;

use crate::error::PlaybackError;

/// Monotonic tag identifying one stream request.
///
/// Every playback and announcement request gets a fresh generation from the
/// shared [`GenerationCounter`], so a later request always compares greater
/// than an earlier one. Zero is reserved for "none".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Generation(u32);

impl Generation {
    /// No request.
    pub const NONE: Self = Self(0);

    /// Raw value, zero for [`Generation::NONE`].
    pub const fn get(self) -> u32 {
        self.0
    }

    /// `true` for [`Generation::NONE`].
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }

    pub(crate) const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }
}

/// Source of fresh generations.
#[derive(Debug)]
pub struct GenerationCounter(AtomicU32);

impl GenerationCounter {
    /// Counter whose first generation is 1.
    pub const fn new() -> Self {
        Self(AtomicU32::new(0))
    }

    /// Allocate the next generation, never [`Generation::NONE`].
    pub fn next(&self) -> Generation {
        loop {
            let raw = self.0.fetch_add(1, Ordering::Relaxed).wrapping_add(1);
            if raw != 0 {
                return Generation(raw);
            }
        }
    }
}

impl Default for GenerationCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// Play one catalog track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackRequest {
    /// Index of the track in the open folder.
    pub track_index: usize,
    /// Resolved resource path of the track.
    pub path: ResourcePath,
    /// Request tag.
    pub generation: Generation,
}

/// Speak one announcement resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnouncementRequest {
    /// Resolved resource path.
    pub path: ResourcePath,
    /// Request tag.
    pub generation: Generation,
}

/// Which mailbox a stream came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StreamKind {
    /// Ordinary track playback; honours pause.
    Playback,
    /// Announcement; outranks playback and ignores pause.
    Announcement,
}

impl StreamKind {
    /// Short name for log lines.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Playback => "playback",
            Self::Announcement => "announcement",
        }
    }
}

/// How a serviced stream ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StreamOutcome {
    /// Reached end of data.
    Completed,
    /// Abandoned at a chunk boundary.
    Interrupted,
    /// Never started or aborted on an error; the engine is idle again.
    Failed(PlaybackError),
}

/// Published by the engine after every serviced request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StreamReport {
    /// Mailbox the request came from.
    pub kind: StreamKind,
    /// Tag of the serviced request.
    pub generation: Generation,
    /// How it ended.
    pub outcome: StreamOutcome,
}
