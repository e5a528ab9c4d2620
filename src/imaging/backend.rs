//! Image codec backend trait and shared types.
//!
//! The enhancement engine never touches files. Everything that can fail on
//! the way in or out (missing file, corrupt data, unknown extension) lives
//! behind [`ImageBackend`], so the transforms stay total and the CLI can be
//! tested against a mock.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend).

use super::params::EncodeParams;
use super::pixels::PixelBuffer;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to decode {path}: {reason}")]
    Decode { path: String, reason: String },
    #[error("Failed to encode {path}: {reason}")]
    Encode { path: String, reason: String },
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),
}

/// Intrinsic pixel size of an image resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Decode and encode collaborator around the pure transforms.
pub trait ImageBackend {
    /// Read the intrinsic dimensions without decoding pixel data.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Decode an image file into an RGBA8 buffer.
    fn decode(&self, path: &Path) -> Result<PixelBuffer, BackendError>;

    /// Encode a buffer to `params.output`, picking the codec from its extension.
    fn encode(&self, buffer: &PixelBuffer, params: &EncodeParams) -> Result<(), BackendError>;
}
