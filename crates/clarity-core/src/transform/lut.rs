//! 1D lookup tables for 8-bit channel remapping.

use rayon::prelude::*;

use crate::image::PixelBuffer;
use crate::scopes::histogram::BINS;

/// Maps each 8-bit input level to an output level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lut1D {
    /// Output level for every input level.
    pub table: [u8; BINS],
}

impl Lut1D {
    /// The identity table.
    pub fn identity() -> Self {
        Self::from_fn(|level| level)
    }

    /// Bake a table by evaluating `f` at every level.
    pub fn from_fn(f: impl Fn(u8) -> u8) -> Self {
        let mut table = [0u8; BINS];
        for (level, out) in table.iter_mut().enumerate() {
            *out = f(level as u8);
        }
        Self { table }
    }

    /// Look up one level.
    #[inline]
    pub fn apply(&self, level: u8) -> u8 {
        self.table[level as usize]
    }

    /// Whether every level maps to itself.
    pub fn is_identity(&self) -> bool {
        self.table
            .iter()
            .enumerate()
            .all(|(level, &out)| level == out as usize)
    }
}

/// Remap every color channel through its own table.
///
/// `luts` holds one table per color channel (one for grayscale, three for
/// RGB/RGBA). Alpha is copied unchanged.
pub fn apply_channel_luts(buffer: &PixelBuffer, luts: &[Lut1D]) -> PixelBuffer {
    let layout = buffer.layout();
    let channels = layout.channels();
    debug_assert_eq!(luts.len(), layout.color_channels());

    let row_len = buffer.width() as usize * channels;
    let mut out = buffer.as_bytes().to_vec();
    out.par_chunks_mut(row_len).for_each(|row| {
        for px in row.chunks_exact_mut(channels) {
            for (value, lut) in px.iter_mut().zip(luts) {
                *value = lut.apply(*value);
            }
        }
    });

    buffer.with_data(out)
}
