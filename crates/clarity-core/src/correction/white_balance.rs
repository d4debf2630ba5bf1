//! Gray-world white balance.
//!
//! The gray-world assumption: the average color of a well-exposed scene
//! should be neutral gray. Each channel is scaled so its mean lands on the
//! average of the three channel means.

use crate::image::{PixelBuffer, PixelLayout};
use crate::transform::lut::{Lut1D, apply_channel_luts};

/// Mean of every color channel over the whole buffer, `[R, G, B]`.
///
/// Grayscale buffers report the single channel mean three times.
pub fn channel_means(buffer: &PixelBuffer) -> [f64; 3] {
    let channels = buffer.channels();
    let count = buffer.pixel_count() as f64;

    let mut sum = [0u64; 3];
    for px in buffer.as_bytes().chunks_exact(channels) {
        match buffer.layout() {
            PixelLayout::Gray => sum[0] += px[0] as u64,
            PixelLayout::Rgb | PixelLayout::Rgba => {
                sum[0] += px[0] as u64;
                sum[1] += px[1] as u64;
                sum[2] += px[2] as u64;
            }
        }
    }

    match buffer.layout() {
        PixelLayout::Gray => [sum[0] as f64 / count; 3],
        PixelLayout::Rgb | PixelLayout::Rgba => sum.map(|s| s as f64 / count),
    }
}

/// Per-channel gains that move every mean onto the common target.
///
/// A channel with zero mean keeps a gain of 1.0; there is nothing to scale.
pub fn gray_world_gains(means: [f64; 3]) -> [f64; 3] {
    let target = means.iter().sum::<f64>() / 3.0;
    means.map(|mean| if mean > 0.0 { target / mean } else { 1.0 })
}

/// Neutralize the average color of the buffer.
///
/// Scaled values are clamped to 0–255 and truncated. Grayscale buffers are
/// already neutral and are returned unchanged; alpha is copied.
pub fn gray_world(buffer: &PixelBuffer) -> PixelBuffer {
    if buffer.layout() == PixelLayout::Gray {
        return buffer.clone();
    }

    let gains = gray_world_gains(channel_means(buffer));
    tracing::debug!(?gains, "gray-world gains");

    let luts = gains.map(|gain| {
        Lut1D::from_fn(|level| (level as f64 * gain).clamp(0.0, 255.0) as u8)
    });
    apply_channel_luts(buffer, &luts)
}
