//! Clarity Core: image quality assessment and corrective enhancement.
//!
//! This crate contains histogram computation, quality metrics, threshold
//! classification and the one-pass correction pipeline. It operates on
//! decoded 8-bit pixel buffers and has no decoding or IO dependencies.

pub mod analysis;
pub mod assess;
pub mod color;
pub mod correction;
pub mod error;
pub mod image;
pub mod scopes;
pub mod transform;

// Re-exports for convenience.
pub use analysis::{Assessment, ChannelMetrics, ColorBalance, Issue, IssueKind, Verdict};
pub use assess::{CorrectedImage, CorrectionOutcome, Evaluation, evaluate, evaluate_and_correct};
pub use correction::{Correction, GammaDecision, correct};
pub use error::QualityError;
pub use image::{PixelBuffer, PixelLayout};
pub use scopes::{Histogram, HistogramData, compute_histograms};
