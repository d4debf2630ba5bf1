//! Brightness-dependent gamma correction.

use serde::{Deserialize, Serialize};

use crate::color::luma;
use crate::image::{PixelBuffer, PixelLayout};
use crate::transform::lut::{Lut1D, apply_channel_luts};

/// Mean luma below which the image is brightened.
pub const DARK_MEAN_LUMA: f64 = 90.0;
/// Mean luma above which the image is darkened.
pub const BRIGHT_MEAN_LUMA: f64 = 165.0;
/// Exponent applied to dark images.
pub const BRIGHTEN_GAMMA: f64 = 0.9;
/// Exponent applied to bright images.
pub const DARKEN_GAMMA: f64 = 1.1;

/// The measured brightness and the exponent chosen from it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GammaDecision {
    pub mean_luma: f64,
    pub gamma: f64,
}

impl GammaDecision {
    /// Decide the exponent for a measured mean luma.
    pub fn from_mean_luma(mean_luma: f64) -> Self {
        Self {
            mean_luma,
            gamma: select_gamma(mean_luma),
        }
    }

    /// True when the stage leaves the image untouched.
    pub fn is_identity(&self) -> bool {
        self.gamma == 1.0
    }
}

/// Exponent for a mean luma. Both limits are exclusive.
pub fn select_gamma(mean_luma: f64) -> f64 {
    if mean_luma < DARK_MEAN_LUMA {
        BRIGHTEN_GAMMA
    } else if mean_luma > BRIGHT_MEAN_LUMA {
        DARKEN_GAMMA
    } else {
        1.0
    }
}

/// Average unquantized Rec. 709 luma of the buffer.
pub fn mean_luma(buffer: &PixelBuffer) -> f64 {
    let channels = buffer.channels();
    let total: f64 = buffer
        .as_bytes()
        .chunks_exact(channels)
        .map(|px| match buffer.layout() {
            PixelLayout::Gray => luma(px[0], px[0], px[0]),
            PixelLayout::Rgb | PixelLayout::Rgba => luma(px[0], px[1], px[2]),
        })
        .sum();
    total / buffer.pixel_count() as f64
}

/// `out = (in / 255)^gamma × 255`, clamped and truncated.
pub fn gamma_lut(gamma: f64) -> Lut1D {
    let gamma = gamma as f32;
    Lut1D::from_fn(|level| {
        let x = level as f32 / 255.0;
        (x.powf(gamma) * 255.0).clamp(0.0, 255.0) as u8
    })
}

/// Brighten dark images, darken bright ones.
///
/// One table is shared by every color channel. When the decision is 1.0
/// no table is applied and the input comes back as is.
pub fn adaptive_gamma(buffer: &PixelBuffer) -> (PixelBuffer, GammaDecision) {
    let decision = GammaDecision::from_mean_luma(mean_luma(buffer));
    if decision.is_identity() {
        return (buffer.clone(), decision);
    }

    let lut = gamma_lut(decision.gamma);
    let luts = vec![lut; buffer.layout().color_channels()];
    (apply_channel_luts(buffer, &luts), decision)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gamma_boundaries_are_exclusive() {
        assert_eq!(select_gamma(90.0), 1.0);
        assert_eq!(select_gamma(165.0), 1.0);
        assert_eq!(select_gamma(89.999), BRIGHTEN_GAMMA);
        assert_eq!(select_gamma(165.001), DARKEN_GAMMA);
        assert_eq!(select_gamma(128.0), 1.0);
    }

    #[test]
    fn test_boundary_means_skip_lookup() {
        for level in [90u8, 165] {
            let gray = PixelBuffer::filled(3, 3, PixelLayout::Gray, &[level]).unwrap();
            let (out, decision) = adaptive_gamma(&gray);
            assert!(decision.is_identity(), "level {level}: {decision:?}");
            assert_eq!(out, gray);
        }
    }

    #[test]
    fn test_dark_image_is_brightened() {
        let image = PixelBuffer::filled(2, 2, PixelLayout::Rgb, &[40, 40, 40]).unwrap();
        let (out, decision) = adaptive_gamma(&image);
        assert_eq!(decision.gamma, BRIGHTEN_GAMMA);
        assert!(out.as_bytes().iter().all(|&v| v > 40));
    }

    #[test]
    fn test_bright_image_is_darkened() {
        let image = PixelBuffer::filled(2, 2, PixelLayout::Rgba, &[220, 220, 220, 7]).unwrap();
        let (out, decision) = adaptive_gamma(&image);
        assert_eq!(decision.gamma, DARKEN_GAMMA);
        let px = out.pixel(0, 0).unwrap();
        assert!(px[..3].iter().all(|&v| v < 220));
        assert_eq!(px[3], 7);
    }

    #[test]
    fn test_gamma_lut_endpoints() {
        for gamma in [BRIGHTEN_GAMMA, DARKEN_GAMMA] {
            let lut = gamma_lut(gamma);
            assert_eq!(lut.apply(0), 0);
            assert_eq!(lut.apply(255), 255);
        }
        let brighten = gamma_lut(BRIGHTEN_GAMMA);
        let darken = gamma_lut(DARKEN_GAMMA);
        assert!(brighten.apply(128) > 128);
        assert!(darken.apply(128) < 128);
    }

    #[test]
    fn test_mean_luma_of_gray_matches_levels() {
        let gray = PixelBuffer::new(2, 1, PixelLayout::Gray, vec![100, 200]).unwrap();
        assert!((mean_luma(&gray) - 150.0).abs() < 1e-9);
    }
}
