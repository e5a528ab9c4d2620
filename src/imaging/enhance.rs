//! Per-pixel brightness, contrast and saturation adjustment.
//!
//! The transform runs on R, G and B independently, in a fixed order:
//!
//! ```text
//! 1. brightness   c1 = c + brightness
//! 2. contrast     c2 = factor * (c1 - 128) + 128
//!                 factor = 259 * (contrast + 255) / (255 * (259 - contrast))
//! 3. saturation   gray = 0.2989*r2 + 0.587*g2 + 0.114*b2     (post-contrast values)
//!                 c3 = gray + (c2 - gray) * (1 + saturation / 100)
//! 4. clamp        round to nearest, clamp to [0, 255]
//! ```
//!
//! Step 3 is skipped entirely when `saturation == 0`. Alpha is never touched.
//! Intermediate values stay unclamped `f64` until step 4, so a large
//! brightness followed by negative contrast can pull a channel back into
//! range.
//!
//! Settings are documented as `[-100, 100]` but are not validated: values
//! outside the range go through the same formulas and simply saturate.

use super::pixels::{CHANNELS, PixelBuffer};
use serde::{Deserialize, Serialize};

/// Luma weights applied to post-contrast R, G, B.
const LUMA: [f64; 3] = [0.2989, 0.587, 0.114];

/// Brightness, contrast and saturation offsets for a single [`enhance`] call.
///
/// Each field is nominally in `[-100, 100]`. Missing fields deserialize as 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnhancementSettings {
    pub brightness: i32,
    pub contrast: i32,
    pub saturation: i32,
}

impl EnhancementSettings {
    /// The one-click preset used by [`quick_enhance`].
    pub const QUICK: Self = Self {
        brightness: 40,
        contrast: 20,
        saturation: 10,
    };

    pub const fn new(brightness: i32, contrast: i32, saturation: i32) -> Self {
        Self {
            brightness,
            contrast,
            saturation,
        }
    }

    /// True when every adjustment is zero.
    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }

    /// Multiplier applied around mid-grey in the contrast step.
    ///
    /// Exactly `1.0` at `contrast == 0`.
    pub fn contrast_factor(&self) -> f64 {
        let c = f64::from(self.contrast);
        (259.0 * (c + 255.0)) / (255.0 * (259.0 - c))
    }
}

/// Apply `settings` to every pixel of `buffer` and return the result.
pub fn enhance(mut buffer: PixelBuffer, settings: EnhancementSettings) -> PixelBuffer {
    let brightness = f64::from(settings.brightness);
    let factor = settings.contrast_factor();
    let saturation = (settings.saturation != 0).then(|| 1.0 + f64::from(settings.saturation) / 100.0);

    for px in buffer.as_raw_mut().chunks_exact_mut(CHANNELS) {
        let mut rgb = [0.0f64; 3];
        for (out, &c) in rgb.iter_mut().zip(px.iter()) {
            let c1 = f64::from(c) + brightness;
            *out = factor * (c1 - 128.0) + 128.0;
        }

        if let Some(scale) = saturation {
            let gray = LUMA[0] * rgb[0] + LUMA[1] * rgb[1] + LUMA[2] * rgb[2];
            for c in &mut rgb {
                *c = gray + (*c - gray) * scale;
            }
        }

        for (dst, c) in px.iter_mut().zip(rgb) {
            *dst = to_channel(c);
        }
    }

    buffer
}

/// [`enhance`] with [`EnhancementSettings::QUICK`].
pub fn quick_enhance(buffer: PixelBuffer) -> PixelBuffer {
    enhance(buffer, EnhancementSettings::QUICK)
}

/// Round half-to-even and clamp to a u8 sample. NaN (only reachable with
/// `contrast == 259`) maps to 0.
fn to_channel(value: f64) -> u8 {
    value.round_ties_even().clamp(0.0, 255.0) as u8
}
