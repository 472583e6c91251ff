//! Input pipeline: interrupt edges, debounce and polled buttons.
//!
//! ```text
//! encoder EXTI ──▶ edge::INPUT_EVENTS ──▶ InputConsumer ──▶ command channel ──▶ control loop
//! button GPIOs ─────────────────────────▶ ButtonPoller (polled by the control loop)
//! ```

pub mod buttons;
pub mod config;
pub mod consumer;
pub mod debounce;
pub mod edge;

#[cfg(feature = "hardware")]
pub mod hardware;

pub use buttons::ButtonPoller;
pub use config::InputConfig;
pub use consumer::InputConsumer;
pub use debounce::Debouncer;
pub use edge::{dropped_events, EdgeQueue, EdgeReceiver, INPUT_EVENTS};
