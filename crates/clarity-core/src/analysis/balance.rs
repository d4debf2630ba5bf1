//! Color balance from the three channel histograms.

use serde::{Deserialize, Serialize};

use crate::analysis::metrics::mean_level;
use crate::error::QualityError;
use crate::scopes::histogram::Histogram;

/// Channel means and how far they stray from neutral gray.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorBalance {
    pub mean_r: f64,
    pub mean_g: f64,
    pub mean_b: f64,
    /// Sum of absolute deviations of the channel means from their average.
    pub color_cast_index: f64,
}

/// Compute channel means and the color-cast index.
///
/// The index is an L1 distance from gray in level units. It is not
/// normalized, so the same relative cast scores higher on a bright image.
pub fn color_balance_metrics(
    hist_r: &Histogram,
    hist_g: &Histogram,
    hist_b: &Histogram,
    total_pixels: u64,
) -> Result<ColorBalance, QualityError> {
    let mean_r = mean_level(hist_r, total_pixels)?;
    let mean_g = mean_level(hist_g, total_pixels)?;
    let mean_b = mean_level(hist_b, total_pixels)?;

    Ok(ColorBalance {
        mean_r,
        mean_g,
        mean_b,
        color_cast_index: cast_index([mean_r, mean_g, mean_b]),
    })
}

fn cast_index(means: [f64; 3]) -> f64 {
    let center = means.iter().sum::<f64>() / 3.0;
    means.iter().map(|m| (m - center).abs()).sum()
}
