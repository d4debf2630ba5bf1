//! Precondition violations raised by the assessment engine.

/// Every error the engine can return.
///
/// All variants describe inputs that break a shape precondition. Once a
/// [`PixelBuffer`](crate::image::PixelBuffer) has been constructed the
/// transforms are total, so these surface either at construction or when
/// hand-built histograms are fed to the metric functions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QualityError {
    #[error("image has no pixels ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    #[error("unsupported channel count: {0} (expected 1, 3 or 4)")]
    UnsupportedChannelCount(usize),

    #[error("pixel data length ({actual}) does not match the image shape ({expected})")]
    DataLength { actual: usize, expected: usize },

    #[error("histogram must have 256 bins, got {0}")]
    HistogramBins(usize),

    #[error("histogram contains no samples")]
    EmptyHistogram,

    #[error("pixel count must be at least 1")]
    ZeroPixels,

    #[error("edge bin count {0} is outside 1..=256")]
    EdgeBins(usize),
}
