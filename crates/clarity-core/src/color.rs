//! Rec. 709 luma shared by the histogram engine and the gamma stage.

/// Rec. 709 luma coefficients for `[R, G, B]`.
pub const REC709_LUMA: [f64; 3] = [0.2126, 0.7152, 0.0722];

/// Weighted luma of an 8-bit RGB triple, not quantized.
#[inline]
pub fn luma(r: u8, g: u8, b: u8) -> f64 {
    REC709_LUMA[0] * r as f64 + REC709_LUMA[1] * g as f64 + REC709_LUMA[2] * b as f64
}

/// Luma quantized to an 8-bit level.
///
/// Truncates toward zero after clamping, so a neutral `(10, 10, 10)`
/// (9.999… before quantization) lands in level 9.
#[inline]
pub fn luma_level(r: u8, g: u8, b: u8) -> u8 {
    luma(r, g, b).clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_luma_weights_sum_to_one() {
        let sum: f64 = REC709_LUMA.iter().sum();
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_luma_level_truncates() {
        assert_eq!(luma_level(0, 0, 0), 0);
        assert_eq!(luma_level(10, 10, 10), 9);
        assert_eq!(luma_level(128, 128, 128), 128);
        assert_eq!(luma_level(255, 255, 255), 254);
    }

    #[test]
    fn test_luma_favors_green() {
        assert!(luma(0, 255, 0) > luma(255, 0, 0));
        assert!(luma(255, 0, 0) > luma(0, 0, 255));
    }
}
