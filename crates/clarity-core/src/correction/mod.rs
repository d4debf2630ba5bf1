//! Corrective enhancement pass.
//!
//! The four stages always run once, in this order, each producing a new
//! buffer:
//! 1. [`stretch::autocontrast`] widens every channel to the full range
//! 2. [`white_balance::gray_world`] neutralizes the average color
//! 3. [`gamma::adaptive_gamma`] brightens or darkens based on the balanced luma
//! 4. [`sharpen::unsharp_mask`] adds edge contrast

pub mod gamma;
pub mod sharpen;
pub mod stretch;
pub mod white_balance;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::image::PixelBuffer;

pub use gamma::GammaDecision;
pub use sharpen::UnsharpMask;

/// Named stages of the correction pass, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrectionStage {
    ToneStretch,
    WhiteBalance,
    AdaptiveGamma,
    Sharpen,
}

impl CorrectionStage {
    /// All stages in the order [`correct`] runs them.
    pub const ORDER: [Self; 4] = [
        Self::ToneStretch,
        Self::WhiteBalance,
        Self::AdaptiveGamma,
        Self::Sharpen,
    ];

    /// Human-readable label for logs and reports.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::ToneStretch => "tone stretch",
            Self::WhiteBalance => "white balance",
            Self::AdaptiveGamma => "adaptive gamma",
            Self::Sharpen => "sharpen",
        }
    }

    /// Run this stage alone.
    ///
    /// Returns the gamma decision when the stage is [`CorrectionStage::AdaptiveGamma`].
    pub fn apply(&self, buffer: &PixelBuffer) -> (PixelBuffer, Option<GammaDecision>) {
        match self {
            Self::ToneStretch => (
                stretch::autocontrast(buffer, stretch::DEFAULT_CUTOFF_PERCENT),
                None,
            ),
            Self::WhiteBalance => (white_balance::gray_world(buffer), None),
            Self::AdaptiveGamma => {
                let (image, decision) = gamma::adaptive_gamma(buffer);
                (image, Some(decision))
            }
            Self::Sharpen => (sharpen::unsharp_mask(buffer, &UnsharpMask::default()), None),
        }
    }
}

impl fmt::Display for CorrectionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Output of one correction pass.
#[derive(Debug, Clone)]
pub struct Correction {
    /// The corrected image.
    pub image: PixelBuffer,
    /// Brightness measured after white balance and the exponent chosen from it.
    pub gamma: GammaDecision,
}

/// Run the full correction pass once.
pub fn correct(buffer: &PixelBuffer) -> Correction {
    let mut image = buffer.clone();
    let mut gamma = None;

    for stage in CorrectionStage::ORDER {
        let (next, decision) = stage.apply(&image);
        if let Some(decision) = decision {
            tracing::debug!(
                mean_luma = decision.mean_luma,
                gamma = decision.gamma,
                "gamma selected"
            );
            gamma = Some(decision);
        }
        tracing::debug!(stage = %stage, "correction stage applied");
        image = next;
    }

    let gamma = gamma.unwrap_or_else(|| GammaDecision::from_mean_luma(gamma::mean_luma(&image)));
    Correction { image, gamma }
}
