//! Software volume for 16-bit PCM.
//!
//! The output has no hardware gain stage, so volume is applied to samples in
//! place before each chunk is written:
//!
//! ```text
//! out = clamp(s * volume / 100, -32768, 32767)
//! ```
//!
//! | `volume` | Effect                       |
//! |----------|------------------------------|
//! | 0%       | silence                      |
//! | 100%     | identity (buffer untouched)  |
//! | 200%     | double amplitude, saturating |

use platform::audio_types::VolumePercent;

/// Scale one sample, saturating to the i16 range.
///
/// Division truncates toward zero.
pub fn scale_sample(sample: i16, volume: VolumePercent) -> i16 {
    // |sample| * 200 fits comfortably in i32
    let scaled = i32::from(sample).saturating_mul(i32::from(volume.get())) / 100;
    i16::try_from(scaled).unwrap_or(if scaled < 0 { i16::MIN } else { i16::MAX })
}

/// Scale interleaved little-endian i16 samples in place.
///
/// Unity gain leaves the buffer untouched. A trailing odd byte is left as
/// is.
pub fn apply_volume(pcm: &mut [u8], volume: VolumePercent) {
    if volume.is_unity() {
        return;
    }
    for pair in pcm.chunks_exact_mut(2) {
        if let [lo, hi] = pair {
            let [a, b] = scale_sample(i16::from_le_bytes([*lo, *hi]), volume).to_le_bytes();
            *lo = a;
            *hi = b;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pcm(samples: &[i16]) -> Vec<u8> {
        samples.iter().flat_map(|s| s.to_le_bytes()).collect()
    }

    fn samples(pcm: &[u8]) -> Vec<i16> {
        pcm.chunks_exact(2)
            .map(|b| i16::from_le_bytes([b[0], b[1]]))
            .collect()
    }

    #[test]
    fn unity_is_identity() {
        let mut buf = pcm(&[i16::MIN, -1, 0, 1, i16::MAX]);
        let before = buf.clone();
        apply_volume(&mut buf, VolumePercent::UNITY);
        assert_eq!(buf, before);
    }

    #[test]
    fn half_volume_truncates_toward_zero() {
        let mut buf = pcm(&[1001, -1001, 3]);
        apply_volume(&mut buf, VolumePercent::new(50));
        assert_eq!(samples(&buf), vec![500, -500, 1]);
    }

    #[test]
    fn double_volume_saturates() {
        let mut buf = pcm(&[20_000, -20_000, 100]);
        apply_volume(&mut buf, VolumePercent::MAX);
        assert_eq!(samples(&buf), vec![i16::MAX, i16::MIN, 200]);
    }

    #[test]
    fn mute_silences() {
        let mut buf = pcm(&[i16::MAX, i16::MIN]);
        apply_volume(&mut buf, VolumePercent::MUTE);
        assert_eq!(samples(&buf), vec![0, 0]);
    }

    #[test]
    fn odd_trailing_byte_is_left_alone() {
        let mut buf = vec![0x10, 0x00, 0x7f];
        apply_volume(&mut buf, VolumePercent::new(50));
        assert_eq!(buf, vec![0x08, 0x00, 0x7f]);
    }
}
