//! Runtime input tunables with a fluent builder.
//!
//! ```
//! use firmware::input::InputConfig;
//!
//! let config = InputConfig::new().step_debounce_ms(80).button_debounce_ms(40);
//! assert_eq!(config.step_debounce().as_millis(), 80);
//! ```

use embassy_time::Duration;
use platform::config::{STEP_DEBOUNCE_MS, SWITCH_DEBOUNCE_MS};

/// Debounce intervals for each input class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputConfig {
    step_debounce_ms: u64,
    switch_debounce_ms: u64,
    button_debounce_ms: u64,
}

impl InputConfig {
    /// Device defaults: 60 ms for encoder steps, 50 ms for the encoder
    /// switch and the polled buttons.
    pub const fn new() -> Self {
        Self {
            step_debounce_ms: STEP_DEBOUNCE_MS,
            switch_debounce_ms: SWITCH_DEBOUNCE_MS,
            button_debounce_ms: SWITCH_DEBOUNCE_MS,
        }
    }

    /// Minimum interval between accepted encoder steps.
    #[must_use]
    pub const fn step_debounce_ms(mut self, ms: u64) -> Self {
        self.step_debounce_ms = ms;
        self
    }

    /// Minimum interval between accepted encoder switch presses.
    #[must_use]
    pub const fn switch_debounce_ms(mut self, ms: u64) -> Self {
        self.switch_debounce_ms = ms;
        self
    }

    /// Minimum interval between accepted presses of one polled button.
    #[must_use]
    pub const fn button_debounce_ms(mut self, ms: u64) -> Self {
        self.button_debounce_ms = ms;
        self
    }

    /// Encoder step interval.
    pub fn step_debounce(&self) -> Duration {
        Duration::from_millis(self.step_debounce_ms)
    }

    /// Encoder switch interval.
    pub fn switch_debounce(&self) -> Duration {
        Duration::from_millis(self.switch_debounce_ms)
    }

    /// Polled button interval.
    pub fn button_debounce(&self) -> Duration {
        Duration::from_millis(self.button_debounce_ms)
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self::new()
    }
}
