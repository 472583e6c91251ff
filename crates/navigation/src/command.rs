//! Semantic navigation commands.

use platform::Direction;

/// A debounced user action, independent of which input produced it.
///
/// The encoder switch and the play/pause button both map to
/// [`Command::Primary`]; the home button maps to [`Command::Secondary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Move the selection one entry.
    Step(Direction),
    /// Enter / play / pause.
    Primary,
    /// Go up one level.
    Secondary,
}

impl Command {
    /// Short name for log lines.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Step(Direction::Clockwise) => "step+",
            Self::Step(Direction::CounterClockwise) => "step-",
            Self::Primary => "primary",
            Self::Secondary => "secondary",
        }
    }
}
