//! Hardware Abstraction Layer (HAL) for the story box
//!
//! This crate provides trait-based abstractions for every external
//! collaborator of the navigation and playback controller, enabling
//! development and testing without physical hardware.
//!
//! # Architecture Layers
//!
//! ```text
//! Application Layer (firmware crate)
//!         ↓
//! Feature Layers (navigation, playback)
//!         ↓
//! Platform HAL (this crate - trait abstractions)
//!         ↓
//! Hardware Layer (Embassy HAL + PAC, or std on the host)
//! ```
//!
//! # Abstractions
//!
//! - [`AudioOutput`] - the single PCM output (I2S on the device)
//! - [`Storage`] / [`File`] - byte access to audio resources
//! - [`CatalogProvider`] - directory enumeration with entry-kind metadata
//! - [`InputDevice`] - encoder events delivered from interrupt context
//!
//! # Features
//!
//! - `std`: host storage backend ([`storage_local`]) and in-memory [`mocks`]
//! - `defmt`: `defmt::Format` derives on all public types
//!
//! # Example
//!
//! ```no_run
//! use platform::{CatalogProvider, EntryKind};
//!
//! async fn count_dirs<C: CatalogProvider>(catalog: &mut C) -> usize {
//!     let mut dirs = 0usize;
//!     let _ = catalog
//!         .read_dir("/sdcard", |entry| {
//!             if entry.kind == EntryKind::Directory {
//!                 dirs = dirs.saturating_add(1);
//!             }
//!             core::ops::ControlFlow::Continue(())
//!         })
//!         .await;
//!     dirs
//! }
//! ```

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(clippy::unreachable)] // no unreachable!() that isn't documented
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(all(not(test), not(feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)] // unsafe fn body is not implicitly unsafe block
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
#![allow(clippy::must_use_candidate)] // accessors: callers decide
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(async_fn_in_trait)] // Embassy no_std: single-threaded, Send bounds not needed

pub mod audio;
pub mod audio_types;
pub mod catalog;
pub mod config;
pub mod input;
pub mod storage;

#[cfg(any(test, feature = "std"))]
pub mod storage_local;

pub mod mocks;

// Re-export main high-level traits
pub use audio::{AudioConfig, AudioOutput};
pub use audio_types::{OutOfRangeError, SampleRateHz, VolumePercent};
pub use catalog::{CatalogError, CatalogProvider, DirEntry, EntryKind, EntryName, ResourcePath};
pub use input::{Button, Direction, EncoderEvent, InputDevice};
pub use storage::{File, Storage};
