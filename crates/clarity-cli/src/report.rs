//! Text and JSON rendering of assessment outcomes.

use std::fmt::Write;

use clarity_core::{Assessment, CorrectionOutcome, GammaDecision, HistogramData};
use serde::Serialize;

/// Render one assessment as an indented text block.
pub fn render_assessment(assessment: &Assessment) -> String {
    let mut out = String::new();
    let luma = &assessment.luma;
    let color = &assessment.color;

    // Writing to a String cannot fail.
    let _ = writeln!(out, "Quality verdict: {}", assessment.verdict);
    let _ = writeln!(out, "\nLuma metrics:");
    let _ = writeln!(out, "  clipping_shadows: {:.4}", luma.clipping_shadows);
    let _ = writeln!(out, "  clipping_highlights: {:.4}", luma.clipping_highlights);
    let _ = writeln!(out, "  dynamic_range_bins: {}", luma.dynamic_range_bins);
    let _ = writeln!(out, "  mean_level: {:.2}", luma.mean_level);
    let _ = writeln!(out, "  std_level: {:.2}", luma.std_level);
    let _ = writeln!(out, "\nColor balance:");
    let _ = writeln!(out, "  mean_r: {:.2}", color.mean_r);
    let _ = writeln!(out, "  mean_g: {:.2}", color.mean_g);
    let _ = writeln!(out, "  mean_b: {:.2}", color.mean_b);
    let _ = writeln!(out, "  color_cast_index: {:.2}", color.color_cast_index);

    if assessment.issues.is_empty() {
        let _ = writeln!(out, "\nNo significant problems detected from the histogram.");
    } else {
        let _ = writeln!(out, "\nDiagnosed issues:");
        for issue in &assessment.issues {
            let _ = writeln!(out, "  - {}: {:.4}", issue.kind, issue.value);
        }
    }
    out
}

/// Render the gamma decision of a correction pass.
pub fn render_gamma(gamma: &GammaDecision) -> String {
    if gamma.is_identity() {
        format!("Gamma: unchanged (mean luma {:.2})", gamma.mean_luma)
    } else {
        format!("Gamma: {} (mean luma {:.2})", gamma.gamma, gamma.mean_luma)
    }
}

/// JSON view of a [`CorrectionOutcome`].
#[derive(Debug, Serialize)]
pub struct OutcomeReport<'a> {
    pub original: &'a Assessment,
    pub corrected: Option<CorrectedReport<'a>>,
}

/// JSON view of the corrected half of an outcome.
#[derive(Debug, Serialize)]
pub struct CorrectedReport<'a> {
    pub assessment: &'a Assessment,
    pub gamma: &'a GammaDecision,
}

impl<'a> OutcomeReport<'a> {
    pub fn new(outcome: &'a CorrectionOutcome) -> Self {
        Self {
            original: &outcome.original.assessment,
            corrected: outcome.corrected.as_ref().map(|c| CorrectedReport {
                assessment: &c.evaluation.assessment,
                gamma: &c.gamma,
            }),
        }
    }
}

/// Histograms exported for external plotting.
#[derive(Debug, Serialize)]
pub struct HistogramExport<'a> {
    pub original: &'a HistogramData,
    pub corrected: Option<&'a HistogramData>,
}

impl<'a> HistogramExport<'a> {
    pub fn new(outcome: &'a CorrectionOutcome) -> Self {
        Self {
            original: &outcome.original.histograms,
            corrected: outcome
                .corrected
                .as_ref()
                .map(|c| &c.evaluation.histograms),
        }
    }
}
