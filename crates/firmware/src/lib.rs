//! Story box controller firmware.
//!
//! Wires the input pipeline, the navigation state machine and the playback
//! engine together:
//!
//! ```text
//! encoder EXTI ─▶ input::edge ─▶ input::consumer ─┐
//!                                                  ├─▶ control loop ─▶ PlayerContext ─▶ AudioEngine ─▶ output
//! button GPIOs ─▶ input::buttons ──────────────────┘
//! ```
//!
//! # Features
//!
//! - `hardware` - STM32H7 GPIO adapters (embassy-stm32 EXTI inputs), defmt over RTT
//! - `std` - host storage backend from `platform`
//! - `defmt` / `tracing` - log back end
//!
//! On the host everything except `input::hardware` builds and runs under
//! tokio with the embassy `std` time driver.

#![cfg_attr(all(not(test), not(feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::await_holding_lock)] // holding a blocking Mutex across .await is a bug
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
#![warn(clippy::dbg_macro)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::doc_markdown)]
#![allow(async_fn_in_trait)]

#[cfg(feature = "hardware")]
use defmt_rtt as _;

#[macro_use]
mod fmt;

pub mod app;
pub mod control;
pub mod input;

pub use app::{run, Board, CommandChannel, COMMANDS, PLAYER};
pub use control::{ControlLoop, Greeting};
pub use input::{dropped_events, InputConfig};
