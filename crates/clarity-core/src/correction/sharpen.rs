//! Unsharp-mask sharpening with threshold masking.
//!
//! # Algorithm
//! 1. Blur a copy of the image with a separable Gaussian (σ = radius),
//!    replicating edge pixels, and round the blur back to 8 bits.
//! 2. `diff = original − blurred` per channel.
//! 3. Where `|diff| > threshold`, `out = original + diff × percent / 100`
//!    in integer arithmetic, clamped to 0–255. Elsewhere the original value
//!    is kept, so flat and near-flat regions do not pick up amplified noise.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::image::PixelBuffer;

/// Unsharp-mask parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnsharpMask {
    /// Gaussian standard deviation in pixels.
    pub radius: f32,
    /// Strength of the added detail, in percent.
    pub percent: i32,
    /// Minimum per-channel difference that gets sharpened (exclusive).
    pub threshold: i32,
}

impl Default for UnsharpMask {
    fn default() -> Self {
        Self {
            radius: 1.5,
            percent: 120,
            threshold: 3,
        }
    }
}

/// Sharpen every color channel. Alpha is copied unchanged.
pub fn unsharp_mask(buffer: &PixelBuffer, params: &UnsharpMask) -> PixelBuffer {
    let blurred = gaussian_blur(buffer, params.radius);
    let layout = buffer.layout();
    let channels = layout.channels();
    let color = layout.color_channels();
    let row_len = buffer.width() as usize * channels;

    let mut out = buffer.as_bytes().to_vec();
    out.par_chunks_mut(row_len)
        .zip(blurred.as_bytes().par_chunks(row_len))
        .for_each(|(row, blur_row)| {
            for (px, blur_px) in row
                .chunks_exact_mut(channels)
                .zip(blur_row.chunks_exact(channels))
            {
                for (value, &soft) in px[..color].iter_mut().zip(&blur_px[..color]) {
                    let original = *value as i32;
                    let diff = original - soft as i32;
                    if diff.abs() > params.threshold {
                        *value = (original + diff * params.percent / 100).clamp(0, 255) as u8;
                    }
                }
            }
        });

    buffer.with_data(out)
}

/// Separable Gaussian blur of the color channels.
///
/// Reads only from `buffer` and an intermediate row-blurred copy, never from
/// the output being written. A non-positive `sigma` returns the input.
pub fn gaussian_blur(buffer: &PixelBuffer, sigma: f32) -> PixelBuffer {
    if sigma <= 0.0 {
        return buffer.clone();
    }

    let kernel_size = 2 * (3.0 * sigma).ceil() as usize + 1;
    let kernel = gaussian_kernel_1d(kernel_size, sigma);
    let half = (kernel_size / 2) as isize;

    let width = buffer.width() as usize;
    let height = buffer.height() as usize;
    let channels = buffer.channels();
    let color = buffer.layout().color_channels();
    let row_len = width * channels;
    let src = buffer.as_bytes();

    // horizontal pass
    let mut rows = vec![0f32; src.len()];
    rows.par_chunks_mut(row_len)
        .zip(src.par_chunks(row_len))
        .for_each(|(dst_row, src_row)| {
            for x in 0..width {
                for c in 0..color {
                    let mut acc = 0.0f32;
                    for (k, &w) in kernel.iter().enumerate() {
                        let sx = clamp_index(x as isize + k as isize - half, width);
                        acc += w * src_row[sx * channels + c] as f32;
                    }
                    dst_row[x * channels + c] = acc;
                }
            }
        });

    // vertical pass
    let mut out = src.to_vec();
    out.par_chunks_mut(row_len)
        .enumerate()
        .for_each(|(y, dst_row)| {
            for x in 0..width {
                for c in 0..color {
                    let mut acc = 0.0f32;
                    for (k, &w) in kernel.iter().enumerate() {
                        let sy = clamp_index(y as isize + k as isize - half, height);
                        acc += w * rows[sy * row_len + x * channels + c];
                    }
                    dst_row[x * channels + c] = acc.round().clamp(0.0, 255.0) as u8;
                }
            }
        });

    buffer.with_data(out)
}

/// Create a normalized gaussian kernel of `kernel_size` taps.
pub fn gaussian_kernel_1d(kernel_size: usize, sigma: f32) -> Vec<f32> {
    let mut kernel = Vec::with_capacity(kernel_size);

    let mean = (kernel_size - 1) as f32 / 2.0;
    let sigma_sq = sigma * sigma;

    for i in 0..kernel_size {
        let x = i as f32 - mean;
        kernel.push((-(x * x) / (2.0 * sigma_sq)).exp());
    }

    let norm = kernel.iter().sum::<f32>();
    kernel.iter_mut().for_each(|k| *k /= norm);
    kernel
}

#[inline]
fn clamp_index(i: isize, len: usize) -> usize {
    i.clamp(0, len as isize - 1) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::PixelLayout;

    fn step_edge(width: u32, height: u32) -> PixelBuffer {
        let mut data = Vec::new();
        for _ in 0..height {
            for x in 0..width {
                data.push(if x < width / 2 { 50 } else { 200 });
            }
        }
        PixelBuffer::new(width, height, PixelLayout::Gray, data).unwrap()
    }

    #[test]
    fn test_gaussian_kernel_is_normalized_and_symmetric() {
        let kernel = gaussian_kernel_1d(11, 1.5);
        let sum: f32 = kernel.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
        for i in 0..5 {
            assert!((kernel[i] - kernel[10 - i]).abs() < 1e-7);
        }
        assert!((kernel[5] - 0.266_011_7).abs() < 1e-5);
    }

    #[test]
    fn test_uniform_image_is_unchanged() {
        let image = PixelBuffer::filled(9, 7, PixelLayout::Rgb, &[30, 140, 220]).unwrap();
        assert_eq!(gaussian_blur(&image, 1.5), image);
        assert_eq!(unsharp_mask(&image, &UnsharpMask::default()), image);
    }

    #[test]
    fn test_edge_gets_overshoot() {
        let image = step_edge(16, 4);
        let out = unsharp_mask(&image, &UnsharpMask::default());
        for y in 0..4 {
            let row = |x: u32| out.pixel(x, y).unwrap()[0];
            assert_eq!(row(0), 50);
            assert_eq!(row(15), 200);
            assert!(row(7) < 50, "dark side of the edge should darken");
            assert!(row(8) > 200, "bright side of the edge should brighten");
        }
    }

    #[test]
    fn test_small_differences_are_masked() {
        let mut data = vec![100u8; 49];
        data[24] = 101;
        let image = PixelBuffer::new(7, 7, PixelLayout::Gray, data).unwrap();
        let out = unsharp_mask(&image, &UnsharpMask::default());
        assert_eq!(out, image);
    }

    #[test]
    fn test_alpha_is_not_sharpened() {
        let mut data = Vec::new();
        for x in 0..8u8 {
            let v = if x < 4 { 20 } else { 230 };
            data.extend([v, v, v, x * 30]);
        }
        let image = PixelBuffer::new(8, 1, PixelLayout::Rgba, data).unwrap();
        let out = unsharp_mask(&image, &UnsharpMask::default());
        for x in 0..8u32 {
            assert_eq!(out.pixel(x, 0).unwrap()[3], image.pixel(x, 0).unwrap()[3]);
        }
    }

    #[test]
    fn test_zero_radius_is_identity() {
        let image = step_edge(6, 2);
        let params = UnsharpMask {
            radius: 0.0,
            ..UnsharpMask::default()
        };
        assert_eq!(unsharp_mask(&image, &params), image);
    }
}
