//! Scalar statistics of a single histogram.

use serde::{Deserialize, Serialize};

use crate::error::QualityError;
use crate::scopes::histogram::{BINS, Histogram};

/// Bins counted as clipped at each end of the range.
pub const DEFAULT_EDGE_BINS: usize = 2;

/// Statistics of one channel (or luma) histogram.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChannelMetrics {
    /// Fraction of samples in the lowest `edge_bins` levels.
    pub clipping_shadows: f64,
    /// Fraction of samples in the highest `edge_bins` levels.
    pub clipping_highlights: f64,
    /// Number of levels actually used.
    pub dynamic_range_bins: u32,
    /// Mean level.
    pub mean_level: f64,
    /// Population standard deviation of the level.
    pub std_level: f64,
}

/// Reduce a histogram to [`ChannelMetrics`].
///
/// `total_pixels` is the pixel count of the source image and is the
/// denominator of every fraction and moment.
///
/// # Errors
///
/// - [`QualityError::ZeroPixels`] if `total_pixels` is 0.
/// - [`QualityError::EmptyHistogram`] if every bin is 0.
/// - [`QualityError::EdgeBins`] unless `1 <= edge_bins <= 256`.
pub fn histogram_metrics(
    hist: &Histogram,
    total_pixels: u64,
    edge_bins: usize,
) -> Result<ChannelMetrics, QualityError> {
    if edge_bins == 0 || edge_bins > BINS {
        return Err(QualityError::EdgeBins(edge_bins));
    }
    let mean = mean_level(hist, total_pixels)?;

    let counts = hist.counts();
    let total = total_pixels as f64;
    let low: u64 = counts[..edge_bins].iter().sum();
    let high: u64 = counts[BINS - edge_bins..].iter().sum();

    let variance = counts
        .iter()
        .enumerate()
        .map(|(level, &count)| {
            let d = level as f64 - mean;
            count as f64 * d * d
        })
        .sum::<f64>()
        / total;

    Ok(ChannelMetrics {
        clipping_shadows: low as f64 / total,
        clipping_highlights: high as f64 / total,
        dynamic_range_bins: hist.occupied_bins() as u32,
        mean_level: mean,
        std_level: variance.sqrt(),
    })
}

/// Histogram-weighted mean level.
///
/// The weighted sum is accumulated in integers and divided once, so the
/// result does not depend on summation order.
pub fn mean_level(hist: &Histogram, total_pixels: u64) -> Result<f64, QualityError> {
    if total_pixels == 0 {
        return Err(QualityError::ZeroPixels);
    }
    if hist.total() == 0 {
        return Err(QualityError::EmptyHistogram);
    }

    let weighted: u64 = hist
        .counts()
        .iter()
        .enumerate()
        .map(|(level, &count)| level as u64 * count)
        .sum();

    Ok(weighted as f64 / total_pixels as f64)
}
