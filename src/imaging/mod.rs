//! Image enhancement and the codec boundary around it.
//!
//! | Operation | Where |
//! |---|---|
//! | **Identify / decode / encode** | [`RustBackend`] via the `image` crate |
//! | **Brightness → contrast → saturation** | [`enhance`] / [`quick_enhance`] |
//! | **File in, file out** | [`enhance_file`] / [`quick_enhance_file`] |
//!
//! The module is split into:
//! - **Pixels**: [`PixelBuffer`], the RGBA8 buffer the transform works on
//! - **Enhance**: The pure per-pixel transform (unit testable, no I/O)
//! - **Parameters**: Encode quality and output path
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: Decode → transform → encode

pub mod backend;
pub mod enhance;
pub mod operations;
mod params;
pub mod pixels;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use enhance::{EnhancementSettings, enhance, quick_enhance};
pub use operations::{EnhancementReport, enhance_file, get_dimensions, quick_enhance_file};
pub use params::{EncodeParams, Quality};
pub use pixels::PixelBuffer;
pub use rust_backend::RustBackend;
