//! Audio playback: request mailboxes, preemption and PCM streaming.
//!
//! The control loop posts requests on a shared [`PlayerContext`]; a single
//! [`AudioEngine`] task takes them, announcements first, and streams the
//! resource to the one audio output in fixed-size chunks. Preemption is
//! generation-tagged: every request carries a [`Generation`], and an
//! interruption only ever stops the generation it names (or an older one).
//!
//! ```text
//! control loop ──request_announcement──► [announcement slot] ─┐
//!              ──request_playback─────► [playback slot]  ─────┼─► AudioEngine ─► AudioOutput
//!              ──interrupt / pause / volume (flags) ──────────┘        │
//!              ◄──────────────────── StreamReport ─────────────────────┘
//! ```

#![cfg_attr(all(not(test), not(feature = "std")), no_std)]
#![deny(clippy::unwrap_used)]
#![allow(async_fn_in_trait)]

#[macro_use]
mod fmt;

pub mod context;
pub mod decoder;
pub mod engine;
pub mod error;
pub mod interrupt;
pub mod request;
pub mod volume;

pub use context::PlayerContext;
pub use decoder::{FormatError, PcmFormat};
pub use engine::AudioEngine;
pub use error::PlaybackError;
pub use interrupt::InterruptSignal;
pub use request::{
    AnnouncementRequest, Generation, GenerationCounter, PlaybackRequest, StreamKind,
    StreamOutcome, StreamReport,
};
