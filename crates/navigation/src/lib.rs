//! Navigation layer: screens, catalog snapshot and the command state machine.
//!
//! This crate is `no_std` by default; it only uses `core` + `heapless`.
//! Catalog access goes through [`platform::CatalogProvider`], and playback
//! is requested by returning [`Effect`]s rather than by calling the engine.

#![cfg_attr(all(not(test), not(feature = "std")), no_std)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]
#![deny(clippy::expect_used)]
#![allow(async_fn_in_trait)]

#[macro_use]
mod fmt;

pub mod announce;
pub mod catalog;
pub mod command;
pub mod navigator;
pub mod screen;

pub use catalog::Catalog;
pub use command::Command;
pub use navigator::{Effect, Effects, Navigator};
pub use screen::Screen;
