//! Level-polled buttons.
//!
//! The control loop calls [`ButtonPoller::poll`] once per tick. A press is a
//! low-to-high transition of a line, accepted only if the same button's last
//! accepted press is at least the button debounce interval old. Level
//! tracking continues during the guard, so a bouncing contact cannot produce
//! a second press once it settles high.

use embassy_time::Instant;
use embedded_hal::digital::InputPin;
use heapless::Vec;
use platform::Button;

use super::config::InputConfig;
use super::debounce::Debouncer;

struct Line<P> {
    button: Button,
    pin: P,
    high: bool,
    guard: Debouncer,
}

/// Samples up to `N` active-high button lines.
pub struct ButtonPoller<P, const N: usize> {
    lines: Vec<Line<P>, N>,
    config: InputConfig,
}

impl<P: InputPin, const N: usize> ButtonPoller<P, N> {
    /// Poller with no lines.
    pub fn new(config: &InputConfig) -> Self {
        Self {
            lines: Vec::new(),
            config: *config,
        }
    }

    /// Register a line. Gives the pin back if all `N` slots are taken.
    pub fn add(&mut self, button: Button, pin: P) -> Result<(), P> {
        let line = Line {
            button,
            pin,
            high: false,
            guard: Debouncer::new(self.config.button_debounce()),
        };
        self.lines.push(line).map_err(|line| line.pin)
    }

    /// Number of registered lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// `true` if no line is registered.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sample every line once; returns the buttons pressed since the last
    /// poll, in registration order.
    pub fn poll(&mut self, now: Instant) -> Vec<Button, N> {
        let mut pressed = Vec::new();
        for line in &mut self.lines {
            let high = match line.pin.is_high() {
                Ok(level) => level,
                Err(_) => {
                    warn!("{} line unreadable", line.button.label());
                    continue;
                }
            };
            let rising = high && !line.high;
            line.high = high;
            if rising && line.guard.accept(now) {
                debug!("button {}", line.button.label());
                // Same capacity as `lines`.
                let _ = pressed.push(line.button);
            }
        }
        pressed
    }
}
