//! Mapping text boxes from intrinsic image pixels to display pixels.
//!
//! Boxes come out of [`synthesize`](crate::text_layout::synthesize) in the
//! image's natural coordinate space. Whatever renders the image usually shows
//! it at some other size, and not necessarily at the same aspect ratio, so
//! each axis is scaled on its own:
//!
//! ```text
//! scale_x = displayed_width  / natural_width
//! scale_y = displayed_height / natural_height
//! ```
//!
//! A 1000x500 image stretched into a 500x500 box gets `scale_x = 0.5`,
//! `scale_y = 1.0`, and the overlays stretch with it.
//!
//! [`remap`] is pure. Keeping overlays current as the image loads and the
//! display resizes is the job of [`surface`].

pub mod surface;

use crate::text_layout::TextBlock;
use serde::{Deserialize, Serialize};

pub use surface::{ImageSurface, OverlayView, Subscription};

/// Natural and displayed size of one rendered image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageDimensions {
    pub natural_width: u32,
    pub natural_height: u32,
    pub displayed_width: f64,
    pub displayed_height: f64,
}

impl ImageDimensions {
    pub fn new(natural: (u32, u32), displayed: (f64, f64)) -> Self {
        Self {
            natural_width: natural.0,
            natural_height: natural.1,
            displayed_width: displayed.0,
            displayed_height: displayed.1,
        }
    }

    /// Natural size is known and non-zero, so [`remap`] may be called.
    pub fn is_measurable(&self) -> bool {
        self.natural_width > 0 && self.natural_height > 0
    }

    /// Per-axis scale factors `(x, y)`.
    pub fn scale(&self) -> (f64, f64) {
        (
            self.displayed_width / f64::from(self.natural_width),
            self.displayed_height / f64::from(self.natural_height),
        )
    }
}

/// A [`TextBlock`] positioned in display pixels. Unrounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayBox {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub confidence: f64,
}

/// Scale `boxes` from natural to displayed size.
///
/// An empty slice returns immediately without looking at `dims`. Otherwise
/// `dims` must be [measurable](ImageDimensions::is_measurable); callers defer
/// the call until the image has loaded.
pub fn remap(boxes: &[TextBlock], dims: &ImageDimensions) -> Vec<OverlayBox> {
    if boxes.is_empty() {
        return Vec::new();
    }
    debug_assert!(
        dims.is_measurable(),
        "remap called before natural dimensions were known"
    );

    let (sx, sy) = dims.scale();
    boxes
        .iter()
        .map(|b| OverlayBox {
            text: b.text.clone(),
            x: f64::from(b.x) * sx,
            y: f64::from(b.y) * sy,
            width: f64::from(b.width) * sx,
            height: f64::from(b.height) * sy,
            confidence: b.confidence,
        })
        .collect()
}
