//! RGB + luminance histogram computation.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::color::luma_level;
use crate::error::QualityError;
use crate::image::{PixelBuffer, PixelLayout};

/// Number of bins in every histogram, one per 8-bit level.
pub const BINS: usize = 256;

/// Pixels binned per parallel work item.
const CHUNK_PIXELS: usize = 4096;

/// Per-level sample counts. Always exactly [`BINS`] entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<u64>", into = "Vec<u64>")]
pub struct Histogram(Vec<u64>);

impl Histogram {
    /// Build a histogram from explicit counts.
    ///
    /// # Errors
    ///
    /// Returns [`QualityError::HistogramBins`] unless `counts` has [`BINS`] entries.
    pub fn from_counts(counts: Vec<u64>) -> Result<Self, QualityError> {
        if counts.len() != BINS {
            return Err(QualityError::HistogramBins(counts.len()));
        }
        Ok(Self(counts))
    }

    /// Counts indexed by level.
    pub fn counts(&self) -> &[u64] {
        &self.0
    }

    /// Samples at one level.
    pub fn count(&self, level: u8) -> u64 {
        self.0[level as usize]
    }

    /// Total number of samples.
    pub fn total(&self) -> u64 {
        self.0.iter().sum()
    }

    /// Largest single bin.
    pub fn peak(&self) -> u64 {
        self.0.iter().copied().max().unwrap_or(0)
    }

    /// Number of levels with at least one sample.
    pub fn occupied_bins(&self) -> usize {
        self.0.iter().filter(|&&c| c > 0).count()
    }
}

impl TryFrom<Vec<u64>> for Histogram {
    type Error = QualityError;

    fn try_from(counts: Vec<u64>) -> Result<Self, Self::Error> {
        Self::from_counts(counts)
    }
}

impl From<Histogram> for Vec<u64> {
    fn from(histogram: Histogram) -> Self {
        histogram.0
    }
}

/// Histogram data for R, G, B, and luminance channels (256 bins each).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistogramData {
    /// Histograms for `[R, G, B, Luma]`.
    pub bins: [Histogram; 4],
    /// Peak bin value across all channels (for normalization).
    pub peak: u64,
}

impl HistogramData {
    /// Red channel histogram.
    pub fn red(&self) -> &Histogram {
        &self.bins[0]
    }

    /// Green channel histogram.
    pub fn green(&self) -> &Histogram {
        &self.bins[1]
    }

    /// Blue channel histogram.
    pub fn blue(&self) -> &Histogram {
        &self.bins[2]
    }

    /// Luma histogram.
    pub fn luma(&self) -> &Histogram {
        &self.bins[3]
    }
}

type Counts = [[u64; BINS]; 4];

/// Compute the four histograms of a pixel buffer.
///
/// Grayscale buffers report the single channel as R, G, B and luma alike.
/// Color buffers bin luma from the truncated Rec. 709 weighted sum; alpha
/// is ignored.
///
/// Chunks are binned in parallel and merged by addition, so the result is
/// identical to a sequential pass.
pub fn compute_histograms(buffer: &PixelBuffer) -> HistogramData {
    let layout = buffer.layout();
    let chunk_len = CHUNK_PIXELS * layout.channels();

    let counts = buffer
        .as_bytes()
        .par_chunks(chunk_len)
        .fold(
            || [[0u64; BINS]; 4],
            |mut local, chunk| {
                bin_chunk(layout, chunk, &mut local);
                local
            },
        )
        .reduce(
            || [[0u64; BINS]; 4],
            |mut a, b| {
                for (dst, src) in a.iter_mut().zip(b.iter()) {
                    for (d, s) in dst.iter_mut().zip(src.iter()) {
                        *d += s;
                    }
                }
                a
            },
        );

    let bins = match layout {
        PixelLayout::Gray => {
            let gray = Histogram(counts[0].to_vec());
            [gray.clone(), gray.clone(), gray.clone(), gray]
        }
        PixelLayout::Rgb | PixelLayout::Rgba => counts.map(|c| Histogram(c.to_vec())),
    };
    let peak = bins.iter().map(Histogram::peak).max().unwrap_or(0);

    HistogramData { bins, peak }
}

fn bin_chunk(layout: PixelLayout, chunk: &[u8], counts: &mut Counts) {
    match layout {
        PixelLayout::Gray => {
            for &v in chunk {
                counts[0][v as usize] += 1;
            }
        }
        PixelLayout::Rgb => {
            for &[r, g, b] in bytemuck::cast_slice::<u8, [u8; 3]>(chunk) {
                bin_rgb(counts, r, g, b);
            }
        }
        PixelLayout::Rgba => {
            for &[r, g, b, _] in bytemuck::cast_slice::<u8, [u8; 4]>(chunk) {
                bin_rgb(counts, r, g, b);
            }
        }
    }
}

#[inline]
fn bin_rgb(counts: &mut Counts, r: u8, g: u8, b: u8) {
    counts[0][r as usize] += 1;
    counts[1][g as usize] += 1;
    counts[2][b as usize] += 1;
    counts[3][luma_level(r, g, b) as usize] += 1;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgb_buffer(width: u32, height: u32, pixels: &[[u8; 3]]) -> PixelBuffer {
        PixelBuffer::new(width, height, PixelLayout::Rgb, pixels.concat()).unwrap()
    }

    #[test]
    fn test_histogram_conserves_pixel_count() {
        let pixels: Vec<[u8; 3]> = (0..120u32)
            .map(|i| [(i * 7 % 256) as u8, (i * 13 % 256) as u8, (i * 29 % 256) as u8])
            .collect();
        let buffer = rgb_buffer(12, 10, &pixels);
        let data = compute_histograms(&buffer);
        for hist in &data.bins {
            assert_eq!(hist.counts().len(), BINS);
            assert_eq!(hist.total(), 120);
        }
    }

    #[test]
    fn test_histogram_spans_multiple_chunks() {
        // Larger than one work item so the reduce step is exercised.
        let width = 100;
        let height = 100;
        let data: Vec<u8> = (0..width * height).map(|i| (i % 256) as u8).collect();
        let buffer = PixelBuffer::new(width, height, PixelLayout::Gray, data).unwrap();
        let hist = compute_histograms(&buffer);
        assert_eq!(hist.luma().total(), 10_000);
        // 10_000 = 39 * 256 + 16
        assert_eq!(hist.luma().count(0), 40);
        assert_eq!(hist.luma().count(255), 39);
    }

    #[test]
    fn test_grayscale_copies_single_channel() {
        let buffer = PixelBuffer::new(2, 2, PixelLayout::Gray, vec![0, 64, 64, 255]).unwrap();
        let hist = compute_histograms(&buffer);
        assert_eq!(hist.red(), hist.luma());
        assert_eq!(hist.green(), hist.luma());
        assert_eq!(hist.blue(), hist.luma());
        assert_eq!(hist.luma().count(64), 2);
        assert_eq!(hist.peak, 2);
    }

    #[test]
    fn test_rgba_ignores_alpha() {
        let data = vec![10, 20, 30, 0, 10, 20, 30, 255];
        let buffer = PixelBuffer::new(2, 1, PixelLayout::Rgba, data).unwrap();
        let hist = compute_histograms(&buffer);
        assert_eq!(hist.red().count(10), 2);
        assert_eq!(hist.green().count(20), 2);
        assert_eq!(hist.blue().count(30), 2);
        assert_eq!(hist.luma().count(luma_level(10, 20, 30)), 2);
        assert_eq!(hist.red().count(0), 0);
        assert_eq!(hist.red().count(255), 0);
    }

    #[test]
    fn test_luma_bins_truncate() {
        let buffer = rgb_buffer(2, 1, &[[10, 10, 10], [255, 255, 255]]);
        let hist = compute_histograms(&buffer);
        assert_eq!(hist.luma().count(9), 1);
        assert_eq!(hist.luma().count(254), 1);
        assert_eq!(hist.luma().occupied_bins(), 2);
    }

    #[test]
    fn test_from_counts_rejects_wrong_length() {
        assert_eq!(
            Histogram::from_counts(vec![0; 255]),
            Err(QualityError::HistogramBins(255))
        );
        assert!(Histogram::from_counts(vec![0; BINS]).is_ok());
    }

    #[test]
    fn test_histogram_json_keeps_bin_invariant() {
        let hist = Histogram::from_counts(vec![1; BINS]).unwrap();
        let json = serde_json::to_string(&hist).unwrap();
        let back: Histogram = serde_json::from_str(&json).unwrap();
        assert_eq!(back, hist);
        assert!(serde_json::from_str::<Histogram>("[1, 2, 3]").is_err());
    }
}
