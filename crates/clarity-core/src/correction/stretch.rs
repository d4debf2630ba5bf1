//! Tonal stretch (autocontrast) with symmetric outlier cutoff.
//!
//! # Algorithm
//! For each color channel independently:
//! 1. Histogram the channel and drop `n × cutoff / 100` samples from the
//!    dark end and the same number from the bright end.
//! 2. Take the lowest and highest levels that still hold samples, `lo` and `hi`.
//! 3. Remap linearly so `lo → 0` and `hi → 255`, truncating and clamping.
//!
//! A channel with `hi <= lo` after the cutoff is flat and is left unchanged.

use crate::image::PixelBuffer;
use crate::scopes::histogram::BINS;
use crate::transform::lut::{Lut1D, apply_channel_luts};

/// Percentage of samples ignored at each end of every channel.
pub const DEFAULT_CUTOFF_PERCENT: u64 = 1;

/// Stretch each color channel to the full 0–255 range.
///
/// Alpha is copied unchanged.
pub fn autocontrast(buffer: &PixelBuffer, cutoff_percent: u64) -> PixelBuffer {
    let layout = buffer.layout();
    let channels = layout.channels();

    let luts: Vec<Lut1D> = (0..layout.color_channels())
        .map(|channel| {
            let hist = channel_histogram(buffer.as_bytes(), channels, channel);
            stretch_lut(&hist, cutoff_percent)
        })
        .collect();

    apply_channel_luts(buffer, &luts)
}

/// Remapping table for one channel histogram.
///
/// Returns the identity when the channel is flat after the cutoff.
pub fn stretch_lut(hist: &[u64; BINS], cutoff_percent: u64) -> Lut1D {
    let mut trimmed = *hist;
    let total: u64 = trimmed.iter().sum();
    let cut = total * cutoff_percent / 100;

    discard(trimmed.iter_mut(), cut);
    discard(trimmed.iter_mut().rev(), cut);

    let lo = trimmed.iter().position(|&count| count > 0);
    let hi = trimmed.iter().rposition(|&count| count > 0);

    match (lo, hi) {
        (Some(lo), Some(hi)) if hi > lo => {
            let scale = 255.0 / (hi - lo) as f64;
            let offset = -(lo as f64) * scale;
            Lut1D::from_fn(|level| (level as f64 * scale + offset).clamp(0.0, 255.0) as u8)
        }
        _ => Lut1D::identity(),
    }
}

/// Remove `cut` samples walking the bins in iteration order.
fn discard<'a>(bins: impl Iterator<Item = &'a mut u64>, mut cut: u64) {
    for count in bins {
        if cut == 0 {
            break;
        }
        let removed = cut.min(*count);
        *count -= removed;
        cut -= removed;
    }
}

fn channel_histogram(data: &[u8], stride: usize, channel: usize) -> [u64; BINS] {
    let mut hist = [0u64; BINS];
    for px in data.chunks_exact(stride) {
        hist[px[channel] as usize] += 1;
    }
    hist
}
