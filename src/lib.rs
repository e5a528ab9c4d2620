//! # pixel-lens
//!
//! Image enhancement, text layout synthesis and overlay mapping for a single
//! in-memory image.
//!
//! # Architecture: Three Pure Cores, One I/O Shell
//!
//! ```text
//! decode ──► enhance / quick_enhance ──► encode            (imaging)
//! recognize ──► synthesize ──► remap on load/resize        (recognize, text_layout, overlay)
//! ```
//!
//! The three cores are plain functions with no I/O and no shared state:
//!
//! - **Enhancement** ([`enhance`](imaging::enhance())) rewrites an RGBA8 buffer with a
//!   fixed brightness → contrast → saturation sequence.
//! - **Text layout** ([`text_layout::synthesize`]) turns recognized text into
//!   approximate word boxes sized from character counts.
//! - **Overlay mapping** ([`overlay::remap`]) scales those boxes from
//!   intrinsic pixels to displayed pixels, each axis on its own.
//!
//! Everything that can fail (reading files, running a recognizer, writing
//! images) sits around them: [`imaging::ImageBackend`] for codecs,
//! [`recognize::Recognizer`] for text, [`overlay::ImageSurface`] for the
//! load/resize lifecycle.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Pixel buffer, enhancement transform, codec backend, file-level operations |
//! | [`text_layout`] | Synthetic word boxes from plain text |
//! | [`overlay`] | Natural → displayed box mapping and the surface that drives it |
//! | [`recognize`] | Recognition collaborators (tesseract CLI, sidecar text) |
//! | [`config`] | `pixel-lens.toml` loading, merging and validation |
//! | [`output`] | CLI output formatting |
//! | [`logging`] | `--verbose` diagnostics via `tracing` |

pub mod config;
pub mod imaging;
pub mod logging;
pub mod output;
pub mod overlay;
pub mod recognize;
pub mod text_layout;
