//! Image decoding, format conversion and persistence.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use clarity_core::QualityError;
use clarity_core::image::{PixelBuffer, PixelLayout};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, GrayImage, RgbImage, RgbaImage};

/// Load an image from disk and convert it to a [`PixelBuffer`].
///
/// Supports common formats via the `image` crate (PNG, JPEG, TIFF, ...).
pub fn load_image(path: &Path) -> Result<PixelBuffer, ImageIoError> {
    let img = image::open(path).map_err(ImageIoError::Decode)?;
    from_dynamic(img)
}

/// Convert a decoded image.
///
/// 8-bit gray, RGB and RGBA keep their layout; every other color type is
/// converted to 8-bit RGB.
pub fn from_dynamic(img: DynamicImage) -> Result<PixelBuffer, ImageIoError> {
    let (width, height) = (img.width(), img.height());
    let (layout, data) = match img {
        DynamicImage::ImageLuma8(buf) => (PixelLayout::Gray, buf.into_raw()),
        DynamicImage::ImageRgb8(buf) => (PixelLayout::Rgb, buf.into_raw()),
        DynamicImage::ImageRgba8(buf) => (PixelLayout::Rgba, buf.into_raw()),
        other => (PixelLayout::Rgb, other.to_rgb8().into_raw()),
    };
    Ok(PixelBuffer::new(width, height, layout, data)?)
}

/// Convert a [`PixelBuffer`] back into an `image` crate image.
pub fn to_dynamic(buffer: &PixelBuffer) -> Result<DynamicImage, ImageIoError> {
    let (width, height) = (buffer.width(), buffer.height());
    let data = buffer.as_bytes().to_vec();
    let img = match buffer.layout() {
        PixelLayout::Gray => GrayImage::from_raw(width, height, data).map(DynamicImage::ImageLuma8),
        PixelLayout::Rgb => RgbImage::from_raw(width, height, data).map(DynamicImage::ImageRgb8),
        PixelLayout::Rgba => RgbaImage::from_raw(width, height, data).map(DynamicImage::ImageRgba8),
    };
    img.ok_or(ImageIoError::RawLength { width, height })
}

/// Whether `path` names a JPEG file.
pub fn is_jpeg(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("jpeg"))
}

/// Write `buffer` to `path`.
///
/// JPEG output is encoded at `jpeg_quality` with any alpha channel dropped.
/// Other formats are chosen from the extension.
pub fn save_image(buffer: &PixelBuffer, path: &Path, jpeg_quality: u8) -> Result<(), ImageIoError> {
    let img = to_dynamic(buffer)?;

    if is_jpeg(path) {
        let img = if img.color().has_alpha() {
            DynamicImage::ImageRgb8(img.to_rgb8())
        } else {
            img
        };
        let writer = BufWriter::new(File::create(path)?);
        let encoder = JpegEncoder::new_with_quality(writer, jpeg_quality);
        img.write_with_encoder(encoder).map_err(ImageIoError::Encode)?;
    } else {
        img.save(path).map_err(ImageIoError::Encode)?;
    }

    tracing::debug!(path = %path.display(), layout = %buffer.layout(), "image written");
    Ok(())
}

/// Errors that can occur while loading or saving images.
#[derive(Debug, thiserror::Error)]
pub enum ImageIoError {
    #[error("failed to decode image: {0}")]
    Decode(image::ImageError),
    #[error("failed to encode image: {0}")]
    Encode(image::ImageError),
    #[error("invalid pixel buffer: {0}")]
    Buffer(#[from] QualityError),
    #[error("pixel data does not fit a {width}x{height} image")]
    RawLength { width: u32, height: u32 },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
