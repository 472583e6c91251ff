//! Input device abstraction

/// Source of encoder events, fed from interrupt context.
pub trait InputDevice {
    /// Wait for next input event (async, power-efficient)
    fn wait_for_event(&mut self) -> impl core::future::Future<Output = EncoderEvent>;

    /// Poll for event (non-blocking)
    fn poll_event(&mut self) -> Option<EncoderEvent>;

    /// Events discarded so far because the queue was full.
    fn dropped_events(&self) -> u32 {
        0
    }
}

/// Rotation direction of one encoder detent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Next entry
    Clockwise,
    /// Previous entry
    CounterClockwise,
}

/// Raw events classified in interrupt context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EncoderEvent {
    /// Rising edge on the primary phase line
    Step(Direction),
    /// Rising edge on the push switch
    Switch,
}

/// Level-polled buttons (active high).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Button {
    /// Enter / play / pause
    PlayPause,
    /// Back towards the home screen
    Home,
    /// Volume up
    VolumeUp,
    /// Volume down
    VolumeDown,
}

impl Button {
    /// Short label for logs.
    pub fn label(self) -> &'static str {
        match self {
            Self::PlayPause => "play/pause",
            Self::Home => "home",
            Self::VolumeUp => "vol+",
            Self::VolumeDown => "vol-",
        }
    }
}
