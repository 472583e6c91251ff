//! Audio domain newtypes for compile-time safety.
//!
//! These zero-cost abstractions prevent common errors:
//! - `VolumePercent`: clamps 0–200, the software gain range of the device
//! - `SampleRateHz`: validates the PCM rates the output accepts

use crate::config::{VOLUME_DEFAULT, VOLUME_MAX};

// ── Error type ───────────────────────────────────────────────────────────────

/// Error returned when a value is out of the valid range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OutOfRangeError {
    /// The value that was out of range.
    pub value: u32,
    /// The inclusive minimum allowed value.
    pub min: u32,
    /// The inclusive maximum allowed value.
    pub max: u32,
}

impl core::fmt::Display for OutOfRangeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "value {} outside {}..={}",
            self.value, self.min, self.max
        )
    }
}

#[cfg(feature = "std")]
impl std::error::Error for OutOfRangeError {}

// ── VolumePercent ────────────────────────────────────────────────────────────

/// Software gain as a percentage, clamped to 0–200.
///
/// 100 is unity gain. Values above 100 amplify and rely on saturation in the
/// sample scaler. Construct with [`VolumePercent::new`] (clamping),
/// [`VolumePercent::try_new`] (strict) or [`VolumePercent::saturating_from`]
/// for signed arithmetic results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct VolumePercent(u8);

impl VolumePercent {
    /// Unity gain.
    pub const UNITY: Self = Self(100);

    /// Upper bound of the gain range.
    pub const MAX: Self = Self(VOLUME_MAX);

    /// Silence.
    pub const MUTE: Self = Self(0);

    /// Create a `VolumePercent`, clamping values above 200 to 200.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        if value > Self::MAX.0 {
            Self::MAX
        } else {
            Self(value)
        }
    }

    /// Create a `VolumePercent`, returning an error if `value > 200`.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRangeError`] if `value > 200`.
    pub fn try_new(value: u8) -> Result<Self, OutOfRangeError> {
        if value > Self::MAX.0 {
            Err(OutOfRangeError {
                value: u32::from(value),
                min: 0,
                max: u32::from(Self::MAX.0),
            })
        } else {
            Ok(Self(value))
        }
    }

    /// Clamp an arbitrary signed value into 0–200.
    #[must_use]
    pub fn saturating_from(value: i32) -> Self {
        let clamped = value.clamp(0, i32::from(Self::MAX.0));
        // clamp() keeps the value inside u8 range
        Self(u8::try_from(clamped).unwrap_or(Self::MAX.0))
    }

    /// Apply a signed step, saturating at both ends of the range.
    #[must_use]
    pub fn step(self, delta: i32) -> Self {
        Self::saturating_from(i32::from(self.0).saturating_add(delta))
    }

    /// `true` at exactly 100 %.
    pub fn is_unity(self) -> bool {
        self == Self::UNITY
    }

    /// Return the inner volume value (0–200).
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl Default for VolumePercent {
    /// Boot volume.
    fn default() -> Self {
        Self::new(VOLUME_DEFAULT)
    }
}

// ── SampleRateHz ─────────────────────────────────────────────────────────────

/// Sample rate in Hz, validated to the range the I2S output can clock.
///
/// Valid range: 8000–96000 Hz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct SampleRateHz(u32);

impl SampleRateHz {
    /// Minimum supported sample rate: 8000 Hz (telephony).
    pub const MIN_HZ: u32 = 8_000;

    /// Maximum supported sample rate: 96000 Hz.
    pub const MAX_HZ: u32 = 96_000;

    /// Create a `SampleRateHz`, returning an error if out of 8000–96000 Hz.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRangeError`] if `hz < 8000` or `hz > 96000`.
    pub fn new(hz: u32) -> Result<Self, OutOfRangeError> {
        if hz < Self::MIN_HZ || hz > Self::MAX_HZ {
            Err(OutOfRangeError {
                value: hz,
                min: Self::MIN_HZ,
                max: Self::MAX_HZ,
            })
        } else {
            Ok(Self(hz))
        }
    }

    /// Return the sample rate in Hz.
    #[must_use]
    pub fn get(self) -> u32 {
        self.0
    }
}
