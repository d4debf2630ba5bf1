//! Decoded 8-bit pixel buffers fed to the assessment engine.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::QualityError;

/// Channel layout of a [`PixelBuffer`], fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PixelLayout {
    /// Single luminance channel.
    Gray,
    /// Interleaved red, green, blue.
    Rgb,
    /// Interleaved red, green, blue, alpha. Alpha is never examined.
    Rgba,
}

impl PixelLayout {
    /// Number of interleaved channels per pixel.
    pub const fn channels(self) -> usize {
        match self {
            Self::Gray => 1,
            Self::Rgb => 3,
            Self::Rgba => 4,
        }
    }

    /// Number of color channels (alpha excluded).
    pub const fn color_channels(self) -> usize {
        match self {
            Self::Gray => 1,
            Self::Rgb | Self::Rgba => 3,
        }
    }

    /// Layout for a raw channel count.
    pub fn from_channels(channels: usize) -> Result<Self, QualityError> {
        match channels {
            1 => Ok(Self::Gray),
            3 => Ok(Self::Rgb),
            4 => Ok(Self::Rgba),
            other => Err(QualityError::UnsupportedChannelCount(other)),
        }
    }
}

impl fmt::Display for PixelLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gray => write!(f, "grayscale"),
            Self::Rgb => write!(f, "RGB"),
            Self::Rgba => write!(f, "RGBA"),
        }
    }
}

/// Interleaved 8-bit image, row-major, top row first.
///
/// The shape is validated once in [`PixelBuffer::new`]; afterwards the
/// buffer is never mutated. Transforms build a new buffer from the old one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    layout: PixelLayout,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap decoded pixel data.
    ///
    /// # Errors
    ///
    /// Returns [`QualityError::EmptyImage`] when either dimension is zero and
    /// [`QualityError::DataLength`] when `data` does not hold exactly
    /// `width * height * channels` bytes.
    pub fn new(
        width: u32,
        height: u32,
        layout: PixelLayout,
        data: Vec<u8>,
    ) -> Result<Self, QualityError> {
        if width == 0 || height == 0 {
            return Err(QualityError::EmptyImage { width, height });
        }

        let expected = width as usize * height as usize * layout.channels();
        if data.len() != expected {
            return Err(QualityError::DataLength {
                actual: data.len(),
                expected,
            });
        }

        Ok(Self {
            width,
            height,
            layout,
            data,
        })
    }

    /// Same as [`PixelBuffer::new`] but with the layout given as a raw channel count.
    pub fn from_channels(
        width: u32,
        height: u32,
        channels: usize,
        data: Vec<u8>,
    ) -> Result<Self, QualityError> {
        Self::new(width, height, PixelLayout::from_channels(channels)?, data)
    }

    /// Buffer where every pixel equals `pixel`.
    pub fn filled(
        width: u32,
        height: u32,
        layout: PixelLayout,
        pixel: &[u8],
    ) -> Result<Self, QualityError> {
        if pixel.len() != layout.channels() {
            return Err(QualityError::UnsupportedChannelCount(pixel.len()));
        }
        let count = width as usize * height as usize;
        Self::new(width, height, layout, pixel.repeat(count))
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Channel layout.
    pub fn layout(&self) -> PixelLayout {
        self.layout
    }

    /// Interleaved channels per pixel.
    pub fn channels(&self) -> usize {
        self.layout.channels()
    }

    /// Number of pixels, always at least 1.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Raw interleaved bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consume the buffer and return its bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Interleaved values of one pixel.
    ///
    /// Returns `None` if the coordinates fall outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let channels = self.channels();
        let start = (y as usize * self.width as usize + x as usize) * channels;
        self.data.get(start..start + channels)
    }

    /// New buffer with this buffer's shape and the given bytes.
    ///
    /// Used by the correction stages, which always produce data of the
    /// same length as their input.
    pub(crate) fn with_data(&self, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), self.data.len());
        Self {
            width: self.width,
            height: self.height,
            layout: self.layout,
            data,
        }
    }
}
