//! Synthetic word boxes from plain recognized text.
//!
//! Recognition engines differ wildly in what geometry they report, and some
//! report none. This module ignores all of it and lays the raw text out as if
//! it were set in a monospace face on the image: one slot per line, words
//! advancing left to right by character count. The boxes are approximations,
//! not measurements.
//!
//! All layout constants scale with the image:
//!
//! ```text
//! line_height    = 0.15  * height
//! padding_top    = 0.09  * height
//! padding_left   = 0.04  * width
//! avg_char_width = 0.022 * width
//! space_width    = 0.5   * avg_char_width
//! word_gap       = 0.8   * avg_char_width
//! ```
//!
//! Blank lines keep their slot: they emit nothing but still push every
//! following line down by one `line_height`.

use serde::{Deserialize, Serialize};

/// Confidence attached to every synthesized block.
pub const SYNTHETIC_CONFIDENCE: f64 = 0.95;

/// `full_text` reported when recognition produced nothing but whitespace.
pub const NO_TEXT_DETECTED: &str = "No text detected";

/// A word and its approximate box in intrinsic image pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    pub text: String,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub confidence: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
}

/// Output of [`synthesize`]: blocks in reading order plus the cleaned text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLayout {
    pub text_blocks: Vec<TextBlock>,
    pub full_text: String,
    pub language: Language,
}

impl TextLayout {
    fn empty() -> Self {
        Self {
            text_blocks: Vec::new(),
            full_text: NO_TEXT_DETECTED.to_string(),
            language: Language::En,
        }
    }

    /// True when recognition found no text.
    pub fn is_empty(&self) -> bool {
        self.text_blocks.is_empty()
    }
}

/// Layout constants derived from the image size.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Metrics {
    line_height: f64,
    padding_top: f64,
    padding_left: f64,
    avg_char_width: f64,
    space_width: f64,
    word_gap: f64,
}

impl Metrics {
    fn for_image(width: u32, height: u32) -> Self {
        let (w, h) = (f64::from(width), f64::from(height));
        let avg_char_width = w * 0.022;
        Self {
            line_height: h * 0.15,
            padding_top: h * 0.09,
            padding_left: w * 0.04,
            avg_char_width,
            space_width: avg_char_width * 0.5,
            word_gap: avg_char_width * 0.8,
        }
    }
}

/// Lay out `raw_text` over an image of `image_width` x `image_height` pixels.
///
/// Never fails. Whitespace-only input returns an empty layout with
/// `full_text` set to [`NO_TEXT_DETECTED`].
pub fn synthesize(raw_text: &str, image_width: u32, image_height: u32) -> TextLayout {
    let full_text = raw_text.trim();
    if full_text.is_empty() {
        return TextLayout::empty();
    }

    let m = Metrics::for_image(image_width, image_height);
    let block_height = (m.line_height * 0.55).round() as u32;
    let mut text_blocks = Vec::new();

    for (index, line) in full_text.split('\n').enumerate() {
        let y = (m.padding_top + index as f64 * m.line_height).round() as u32;
        let mut x = m.padding_left;

        for word in line.split_whitespace() {
            let word_width = word.chars().count() as f64 * m.avg_char_width;
            text_blocks.push(TextBlock {
                text: word.to_string(),
                x: x.round() as u32,
                y,
                width: word_width.round() as u32,
                height: block_height,
                confidence: SYNTHETIC_CONFIDENCE,
            });
            x += word_width + m.space_width + m.word_gap;
        }
    }

    TextLayout {
        text_blocks,
        full_text: full_text.to_string(),
        language: Language::En,
    }
}
