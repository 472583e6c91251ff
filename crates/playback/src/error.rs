//! Errors local to one stream request.

use crate::decoder::FormatError;

/// Why a request could not be streamed.
///
/// None of these stop the engine: the request is reported as failed and the
/// engine returns to idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlaybackError {
    /// The resource does not exist
    NotFound,
    /// The resource header is malformed
    Format(FormatError),
    /// PCM bit depth other than 16
    UnsupportedFormat {
        /// Bits per sample declared by the header
        bits: u16,
    },
    /// The output rejected its configuration or a write
    Hardware,
    /// A write did not complete within the write timeout
    Timeout,
    /// Reading the resource failed
    Storage,
}

#[cfg(feature = "std")]
impl std::error::Error for PlaybackError {}

impl core::fmt::Display for PlaybackError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "resource not found"),
            Self::Format(e) => write!(f, "malformed resource: {e}"),
            Self::UnsupportedFormat { bits } => write!(f, "unsupported {bits}-bit PCM"),
            Self::Hardware => write!(f, "audio output failure"),
            Self::Timeout => write!(f, "audio output write timed out"),
            Self::Storage => write!(f, "storage read failure"),
        }
    }
}

impl From<FormatError> for PlaybackError {
    fn from(e: FormatError) -> Self {
        Self::Format(e)
    }
}
