//! Assessment orchestration: histograms → metrics → verdict → correction.

use serde::{Deserialize, Serialize};

use crate::analysis::{
    Assessment, ChannelMetrics, DEFAULT_EDGE_BINS, assess_quality, color_balance_metrics,
    histogram_metrics,
};
use crate::correction::{self, GammaDecision};
use crate::error::QualityError;
use crate::image::PixelBuffer;
use crate::scopes::{HistogramData, compute_histograms};

/// Histograms of an image together with the assessment derived from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub histograms: HistogramData,
    pub assessment: Assessment,
}

/// The corrected image and its re-evaluation.
#[derive(Debug, Clone)]
pub struct CorrectedImage {
    pub image: PixelBuffer,
    pub gamma: GammaDecision,
    pub evaluation: Evaluation,
}

/// Result of [`evaluate_and_correct`].
#[derive(Debug, Clone)]
pub struct CorrectionOutcome {
    /// Evaluation of the input image.
    pub original: Evaluation,
    /// Present only when the input needed correction.
    pub corrected: Option<CorrectedImage>,
}

impl CorrectionOutcome {
    /// Whether the correction pass ran.
    pub fn was_corrected(&self) -> bool {
        self.corrected.is_some()
    }
}

/// Compute histograms and assess them.
///
/// # Errors
///
/// Propagates [`QualityError`] from the metric calculations. A valid
/// [`PixelBuffer`] always has pixels, so this only fails on internal
/// precondition violations.
pub fn evaluate(buffer: &PixelBuffer) -> Result<Evaluation, QualityError> {
    let histograms = compute_histograms(buffer);
    let total = buffer.pixel_count() as u64;

    let metrics = |index: usize| -> Result<ChannelMetrics, QualityError> {
        histogram_metrics(&histograms.bins[index], total, DEFAULT_EDGE_BINS)
    };
    let red = metrics(0)?;
    let green = metrics(1)?;
    let blue = metrics(2)?;
    let luma = metrics(3)?;

    let color = color_balance_metrics(
        histograms.red(),
        histograms.green(),
        histograms.blue(),
        total,
    )?;
    let assessment = assess_quality(luma, [red, green, blue], color);

    tracing::debug!(
        width = buffer.width(),
        height = buffer.height(),
        verdict = %assessment.verdict,
        issues = assessment.issues.len(),
        "image evaluated"
    );

    Ok(Evaluation {
        histograms,
        assessment,
    })
}

/// Evaluate, and when the verdict is `needs_correction` run the correction
/// pass once and evaluate the result.
///
/// The second assessment is reported as is and never triggers another pass.
pub fn evaluate_and_correct(buffer: &PixelBuffer) -> Result<CorrectionOutcome, QualityError> {
    let original = evaluate(buffer)?;
    if !original.assessment.needs_correction() {
        tracing::debug!("no correction needed");
        return Ok(CorrectionOutcome {
            original,
            corrected: None,
        });
    }

    let correction::Correction { image, gamma } = correction::correct(buffer);
    let evaluation = evaluate(&image)?;
    tracing::debug!(
        verdict = %evaluation.assessment.verdict,
        issues = evaluation.assessment.issues.len(),
        "corrected image re-evaluated"
    );

    Ok(CorrectionOutcome {
        original,
        corrected: Some(CorrectedImage {
            image,
            gamma,
            evaluation,
        }),
    })
}
