//! PCM resource header parsing.
//!
//! Resources use the canonical 44-byte RIFF/WAVE layout: a single `fmt `
//! chunk followed immediately by the `data` chunk. Fields are read at fixed
//! offsets; no chunk walking is attempted.
//!
//! | Offset | Field           |
//! |--------|-----------------|
//! | 0      | `RIFF`          |
//! | 8      | `WAVE`          |
//! | 22     | channels (u16)  |
//! | 24     | sample rate     |
//! | 34     | bits per sample |
//! | 40     | data size       |
//! | 44     | sample data     |

use platform::config::{MAX_CHANNELS, PCM_BITS};
use platform::{AudioConfig, SampleRateHz};

use crate::error::PlaybackError;

/// Length of the fixed header; sample data starts right after it.
pub const WAV_HEADER_LEN: usize = 44;

/// Header defects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FormatError {
    /// Fewer than [`WAV_HEADER_LEN`] bytes
    Truncated,
    /// Missing `RIFF` or `WAVE` magic
    BadMagic,
    /// Channel count the output cannot take
    Channels(u16),
    /// Sample rate the output cannot clock
    SampleRate(u32),
}

#[cfg(feature = "std")]
impl std::error::Error for FormatError {}

impl core::fmt::Display for FormatError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Truncated => write!(f, "header shorter than {WAV_HEADER_LEN} bytes"),
            Self::BadMagic => write!(f, "not a RIFF/WAVE resource"),
            Self::Channels(n) => write!(f, "unsupported channel count {n}"),
            Self::SampleRate(hz) => write!(f, "unsupported sample rate {hz} Hz"),
        }
    }
}

/// Parameters declared by a resource header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PcmFormat {
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Interleaved channels
    pub channels: u16,
    /// Bits per sample
    pub bits_per_sample: u16,
    /// Declared length of the sample data in bytes
    pub data_size: u32,
}

fn le_u16(header: &[u8], at: usize) -> Option<u16> {
    let bytes = header.get(at..at.checked_add(2)?)?;
    Some(u16::from_le_bytes(bytes.try_into().ok()?))
}

fn le_u32(header: &[u8], at: usize) -> Option<u32> {
    let bytes = header.get(at..at.checked_add(4)?)?;
    Some(u32::from_le_bytes(bytes.try_into().ok()?))
}

impl PcmFormat {
    /// Read the fixed-offset fields of a header.
    ///
    /// Only the magic is checked here; [`PcmFormat::audio_config`] decides
    /// whether the output can play the declared parameters.
    pub fn parse(header: &[u8]) -> Result<Self, FormatError> {
        if header.len() < WAV_HEADER_LEN {
            return Err(FormatError::Truncated);
        }
        if header.get(0..4) != Some(b"RIFF".as_slice()) || header.get(8..12) != Some(b"WAVE".as_slice())
        {
            return Err(FormatError::BadMagic);
        }
        let field16 = |at| le_u16(header, at).ok_or(FormatError::Truncated);
        let field32 = |at| le_u32(header, at).ok_or(FormatError::Truncated);
        Ok(Self {
            channels: field16(22)?,
            sample_rate: field32(24)?,
            bits_per_sample: field16(34)?,
            data_size: field32(40)?,
        })
    }

    /// Output configuration for this resource.
    ///
    /// # Errors
    ///
    /// [`PlaybackError::UnsupportedFormat`] unless 16-bit, and
    /// [`PlaybackError::Format`] for channel counts or rates the output
    /// cannot take.
    pub fn audio_config(&self) -> Result<AudioConfig, PlaybackError> {
        if self.bits_per_sample != PCM_BITS {
            return Err(PlaybackError::UnsupportedFormat {
                bits: self.bits_per_sample,
            });
        }
        let channels = u8::try_from(self.channels)
            .ok()
            .filter(|c| (1..=MAX_CHANNELS).contains(c))
            .ok_or(FormatError::Channels(self.channels))?;
        let rate = SampleRateHz::new(self.sample_rate)
            .map_err(|_| FormatError::SampleRate(self.sample_rate))?;
        Ok(AudioConfig {
            sample_rate: rate.get(),
            channels,
            bit_depth: 16,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::mocks::wav_bytes;

    #[test]
    fn parses_canonical_header() {
        let bytes = wav_bytes(22_050, 2, 16, &[0; 8]);
        let fmt = PcmFormat::parse(&bytes).unwrap();
        assert_eq!(
            fmt,
            PcmFormat {
                sample_rate: 22_050,
                channels: 2,
                bits_per_sample: 16,
                data_size: 16,
            }
        );
        let cfg = fmt.audio_config().unwrap();
        assert_eq!(cfg.channels, 2);
        assert_eq!(cfg.sample_rate, 22_050);
    }

    #[test]
    fn rejects_missing_magic() {
        let mut bytes = wav_bytes(16_000, 1, 16, &[]);
        bytes[8..12].copy_from_slice(b"AVI ");
        assert_eq!(PcmFormat::parse(&bytes), Err(FormatError::BadMagic));
    }

    #[test]
    fn rejects_short_header() {
        let bytes = wav_bytes(16_000, 1, 16, &[]);
        assert_eq!(PcmFormat::parse(&bytes[..30]), Err(FormatError::Truncated));
    }

    #[test]
    fn only_16_bit_is_playable() {
        let bytes = wav_bytes(16_000, 1, 24, &[]);
        let fmt = PcmFormat::parse(&bytes).unwrap();
        assert_eq!(
            fmt.audio_config(),
            Err(PlaybackError::UnsupportedFormat { bits: 24 })
        );
    }

    #[test]
    fn rejects_surround_channel_counts() {
        let bytes = wav_bytes(16_000, 6, 16, &[]);
        let fmt = PcmFormat::parse(&bytes).unwrap();
        assert_eq!(
            fmt.audio_config(),
            Err(PlaybackError::Format(FormatError::Channels(6)))
        );
    }
}
