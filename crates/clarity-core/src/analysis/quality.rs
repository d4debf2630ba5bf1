//! Threshold classification of the computed metrics.
//!
//! The thresholds are calibration constants and not configurable. Every
//! comparison is strict: a value sitting exactly on a threshold passes.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::analysis::balance::ColorBalance;
use crate::analysis::metrics::ChannelMetrics;

/// Luma shadow clipping above this fraction is an issue.
pub const MAX_SHADOW_CLIPPING: f64 = 0.01;
/// Luma highlight clipping above this fraction is an issue.
pub const MAX_HIGHLIGHT_CLIPPING: f64 = 0.01;
/// Fewer occupied luma levels than this is an issue.
pub const MIN_DYNAMIC_RANGE_BINS: u32 = 180;
/// Luma standard deviation below this is an issue.
pub const MIN_CONTRAST_STD: f64 = 40.0;
/// Color-cast index above this is an issue.
pub const MAX_COLOR_CAST: f64 = 10.0;

/// Kind of deficiency found by [`assess_quality`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    ShadowClipping,
    HighlightClipping,
    LowDynamicRange,
    LowContrast,
    ColorCast,
}

impl IssueKind {
    /// Stable identifier used in reports.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::ShadowClipping => "shadow_clipping",
            Self::HighlightClipping => "highlight_clipping",
            Self::LowDynamicRange => "low_dynamic_range",
            Self::LowContrast => "low_contrast",
            Self::ColorCast => "color_cast",
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A deficiency together with the value that tripped it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub kind: IssueKind,
    pub value: f64,
}

/// Overall classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Acceptable,
    NeedsCorrection,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Acceptable => write!(f, "acceptable"),
            Self::NeedsCorrection => write!(f, "needs_correction"),
        }
    }
}

/// Full quality assessment of one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub luma: ChannelMetrics,
    pub red: ChannelMetrics,
    pub green: ChannelMetrics,
    pub blue: ChannelMetrics,
    pub color: ColorBalance,
    /// Issues in fixed order: shadow, highlight, dynamic range, contrast, color cast.
    pub issues: Vec<Issue>,
    pub verdict: Verdict,
}

impl Assessment {
    /// Whether the correction pipeline should run.
    pub fn needs_correction(&self) -> bool {
        self.verdict == Verdict::NeedsCorrection
    }

    /// Whether an issue of `kind` was found.
    pub fn has_issue(&self, kind: IssueKind) -> bool {
        self.issues.iter().any(|issue| issue.kind == kind)
    }
}

/// Classify an image from its precomputed metrics.
///
/// Only the luma metrics and the color balance drive the verdict; the
/// per-channel metrics are carried along for reporting. Every threshold
/// is checked, so issues accumulate.
pub fn assess_quality(
    luma: ChannelMetrics,
    [red, green, blue]: [ChannelMetrics; 3],
    color: ColorBalance,
) -> Assessment {
    let mut issues = Vec::new();

    if luma.clipping_shadows > MAX_SHADOW_CLIPPING {
        issues.push(Issue {
            kind: IssueKind::ShadowClipping,
            value: luma.clipping_shadows,
        });
    }
    if luma.clipping_highlights > MAX_HIGHLIGHT_CLIPPING {
        issues.push(Issue {
            kind: IssueKind::HighlightClipping,
            value: luma.clipping_highlights,
        });
    }
    if luma.dynamic_range_bins < MIN_DYNAMIC_RANGE_BINS {
        issues.push(Issue {
            kind: IssueKind::LowDynamicRange,
            value: luma.dynamic_range_bins as f64,
        });
    }
    if luma.std_level < MIN_CONTRAST_STD {
        issues.push(Issue {
            kind: IssueKind::LowContrast,
            value: luma.std_level,
        });
    }
    if color.color_cast_index > MAX_COLOR_CAST {
        issues.push(Issue {
            kind: IssueKind::ColorCast,
            value: color.color_cast_index,
        });
    }

    let verdict = if issues.is_empty() {
        Verdict::Acceptable
    } else {
        Verdict::NeedsCorrection
    };

    Assessment {
        luma,
        red,
        green,
        blue,
        color,
        issues,
        verdict,
    }
}
