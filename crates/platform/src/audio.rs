//! Audio output abstraction

/// The single physical PCM output.
///
/// Exactly one stream may hold the output at a time. The playback engine
/// pairs every successful [`acquire`](AudioOutput::acquire) with exactly one
/// [`release`](AudioOutput::release), on every exit path.
pub trait AudioOutput {
    /// Error type
    type Error: core::fmt::Debug;

    /// Configure the output for a stream and take ownership of it.
    fn acquire(
        &mut self,
        config: AudioConfig,
    ) -> impl core::future::Future<Output = Result<(), Self::Error>>;

    /// Write interleaved little-endian 16-bit frames.
    ///
    /// Returns the number of bytes accepted, which may be less than
    /// `frames.len()`.
    fn write(
        &mut self,
        frames: &[u8],
    ) -> impl core::future::Future<Output = Result<usize, Self::Error>>;

    /// Tear down the output configured by the last `acquire`.
    ///
    /// Synchronous so that it can run from a `Drop` guard.
    fn release(&mut self);
}

/// Audio configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AudioConfig {
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of channels (1 = mono, 2 = stereo)
    pub channels: u8,
    /// Bit depth (always 16 for this device)
    pub bit_depth: u8,
}

impl AudioConfig {
    /// Bytes in one interleaved frame.
    pub fn frame_bytes(&self) -> usize {
        usize::from(self.bit_depth / 8).saturating_mul(usize::from(self.channels))
    }

    /// Bytes in one streaming chunk of `frames` frames.
    pub fn chunk_bytes(&self, frames: usize) -> usize {
        self.frame_bytes().saturating_mul(frames)
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            channels: 2,
            bit_depth: 16,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_bytes_scale_with_channels() {
        let mono = AudioConfig {
            sample_rate: 16_000,
            channels: 1,
            bit_depth: 16,
        };
        assert_eq!(mono.chunk_bytes(1024), 2048);
        assert_eq!(AudioConfig::default().chunk_bytes(1024), 4096);
    }
}
