//! Pure Rust codec backend built on the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Identify | `image::image_dimensions` |
//! | Decode (JPEG, PNG, TIFF, WebP) | `ImageReader` with content sniffing, then `to_rgba8` |
//! | Encode → PNG | `image::codecs::png::PngEncoder` (RGBA) |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` (RGB, alpha dropped, uses [`Quality`](super::Quality)) |
//! | Encode → TIFF | `image::codecs::tiff::TiffEncoder` (RGBA) |
//! | Encode → WebP | `image::codecs::webp::WebPEncoder::new_lossless` (RGBA) |

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::params::EncodeParams;
use super::pixels::PixelBuffer;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::tiff::TiffEncoder;
use image::codecs::webp::WebPEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, ImageReader, RgbaImage};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::debug;

/// Output extensions the backend knows how to write.
pub const OUTPUT_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "tif", "tiff", "webp"];

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn output_extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

fn encode_error(path: &Path, e: impl std::fmt::Display) -> BackendError {
    BackendError::Encode {
        path: path.display().to_string(),
        reason: e.to_string(),
    }
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let (width, height) =
            image::image_dimensions(path).map_err(|e| BackendError::Decode {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
        Ok(Dimensions { width, height })
    }

    fn decode(&self, path: &Path) -> Result<PixelBuffer, BackendError> {
        let img = ImageReader::open(path)?
            .with_guessed_format()?
            .decode()
            .map_err(|e| BackendError::Decode {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
        debug!(
            path = %path.display(),
            width = img.width(),
            height = img.height(),
            "decoded image"
        );
        Ok(PixelBuffer::from(img.to_rgba8()))
    }

    fn encode(&self, buffer: &PixelBuffer, params: &EncodeParams) -> Result<(), BackendError> {
        let path = params.output.as_path();
        let ext = output_extension(path);
        if !OUTPUT_EXTENSIONS.contains(&ext.as_str()) {
            return Err(BackendError::UnsupportedFormat(ext));
        }

        let (w, h) = (buffer.width(), buffer.height());
        let file = File::create(path)?;
        let writer = BufWriter::new(file);

        match ext.as_str() {
            "png" => PngEncoder::new(writer)
                .write_image(buffer.as_raw(), w, h, ExtendedColorType::Rgba8)
                .map_err(|e| encode_error(path, e))?,
            "jpg" | "jpeg" => {
                // JPEG has no alpha channel
                let rgba = RgbaImage::from(buffer.clone());
                let rgb = DynamicImage::ImageRgba8(rgba).to_rgb8();
                JpegEncoder::new_with_quality(writer, params.quality.value() as u8)
                    .write_image(rgb.as_raw(), w, h, ExtendedColorType::Rgb8)
                    .map_err(|e| encode_error(path, e))?
            }
            "tif" | "tiff" => TiffEncoder::new(writer)
                .write_image(buffer.as_raw(), w, h, ExtendedColorType::Rgba8)
                .map_err(|e| encode_error(path, e))?,
            _ => WebPEncoder::new_lossless(writer)
                .write_image(buffer.as_raw(), w, h, ExtendedColorType::Rgba8)
                .map_err(|e| encode_error(path, e))?,
        }

        debug!(path = %path.display(), format = %ext, "encoded image");
        Ok(())
    }
}
