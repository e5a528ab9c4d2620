//! High-level image operations.
//!
//! These functions wrap the pure enhancement transform with backend I/O:
//! decode the input, run the transform once over the whole buffer, encode
//! the result. The buffer is never observable half-processed.

use super::backend::{BackendError, ImageBackend};
use super::enhance::{EnhancementSettings, enhance};
use super::params::{EncodeParams, Quality};
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Get image dimensions using the backend.
pub fn get_dimensions(backend: &impl ImageBackend, path: &Path) -> Result<(u32, u32)> {
    let dims = backend.identify(path)?;
    Ok((dims.width, dims.height))
}

/// What an enhancement run did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnhancementReport {
    pub settings: EnhancementSettings,
    pub width: u32,
    pub height: u32,
    pub output: String,
}

/// Decode `source`, apply `settings`, encode to `output`.
pub fn enhance_file(
    backend: &impl ImageBackend,
    source: &Path,
    output: &Path,
    settings: EnhancementSettings,
    quality: Quality,
) -> Result<EnhancementReport> {
    let buffer = backend.decode(source)?;
    let (width, height) = (buffer.width(), buffer.height());

    let enhanced = enhance(buffer, settings);
    backend.encode(&enhanced, &EncodeParams::new(output, quality))?;

    info!(
        source = %source.display(),
        output = %output.display(),
        brightness = settings.brightness,
        contrast = settings.contrast,
        saturation = settings.saturation,
        "enhanced image"
    );

    Ok(EnhancementReport {
        settings,
        width,
        height,
        output: output.display().to_string(),
    })
}

/// [`enhance_file`] with the quick preset.
pub fn quick_enhance_file(
    backend: &impl ImageBackend,
    source: &Path,
    output: &Path,
    quality: Quality,
) -> Result<EnhancementReport> {
    enhance_file(backend, source, output, EnhancementSettings::QUICK, quality)
}
