//! Parameter types for encode operations.
//!
//! These describe *what* to write, not *how*. The [`backend`](super::backend)
//! decides the codec from the output extension.
//!
//! - [`Quality`] — Lossy encoding quality (1–100, default 90). Clamped on construction.
//! - [`EncodeParams`] — Output path plus quality for a single encode.

use std::path::PathBuf;

/// Quality setting for lossy image encoding (1-100).
///
/// Only JPEG output reads it; PNG, TIFF and WebP are written losslessly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

/// Parameters for writing a pixel buffer to disk.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodeParams {
    pub output: PathBuf,
    pub quality: Quality,
}

impl EncodeParams {
    pub fn new(output: impl Into<PathBuf>, quality: Quality) -> Self {
        Self {
            output: output.into(),
            quality,
        }
    }
}
