//! CLI output formatting.
//!
//! Every command has a `format_*` function returning `Vec<String>` and a
//! `print_*` wrapper that writes to stdout. Format functions are pure so the
//! exact display can be unit tested.
//!
//! # Output Format
//!
//! ## Enhance
//!
//! ```text
//! Enhanced 1024x768 → out.png
//!     Brightness: 40
//!     Contrast: 20
//!     Saturation: 10
//! ```
//!
//! ## OCR
//!
//! ```text
//! Found 3 text blocks
//! 001 Hello
//!     Position: (40, 45)  Size: 110x41  Confidence: 95.0%
//! 002 World
//!     Position: (179, 45)  Size: 110x41  Confidence: 95.0%
//! 003 Foo
//!     Position: (40, 195)  Size: 66x41  Confidence: 95.0%
//!
//! Full text
//!     Hello World
//!
//!     Foo
//! ```
//!
//! ## Overlay
//!
//! ```text
//! Overlays at 500x500 (natural 1000x500, scale 0.500 x 1.000)
//! 001 Hello
//!     Box: (20.0, 45.0) 55.0x41.0
//! ```

use crate::imaging::EnhancementReport;
use crate::overlay::{ImageDimensions, OverlayBox};
use crate::text_layout::TextLayout;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

// ============================================================================
// Enhance
// ============================================================================

pub fn format_enhance_report(report: &EnhancementReport) -> Vec<String> {
    vec![
        format!(
            "Enhanced {}x{} → {}",
            report.width, report.height, report.output
        ),
        format!("{}Brightness: {}", indent(1), report.settings.brightness),
        format!("{}Contrast: {}", indent(1), report.settings.contrast),
        format!("{}Saturation: {}", indent(1), report.settings.saturation),
    ]
}

pub fn print_enhance_report(report: &EnhancementReport) {
    for line in format_enhance_report(report) {
        println!("{}", line);
    }
}

// ============================================================================
// OCR
// ============================================================================

/// Block list followed by the full text, one indented line per text line.
pub fn format_text_layout(layout: &TextLayout) -> Vec<String> {
    let mut lines = Vec::new();

    if layout.is_empty() {
        lines.push(layout.full_text.clone());
        return lines;
    }

    lines.push(format!("Found {} text blocks", layout.text_blocks.len()));
    for (i, block) in layout.text_blocks.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), block.text));
        lines.push(format!(
            "{}Position: ({}, {})  Size: {}x{}  Confidence: {:.1}%",
            indent(1),
            block.x,
            block.y,
            block.width,
            block.height,
            block.confidence * 100.0
        ));
    }

    lines.push(String::new());
    lines.push("Full text".to_string());
    for text_line in layout.full_text.lines() {
        if text_line.trim().is_empty() {
            lines.push(String::new());
        } else {
            lines.push(format!("{}{}", indent(1), text_line));
        }
    }

    lines
}

pub fn print_text_layout(layout: &TextLayout) {
    for line in format_text_layout(layout) {
        println!("{}", line);
    }
}

// ============================================================================
// Overlay
// ============================================================================

pub fn format_overlays(dims: &ImageDimensions, overlays: &[OverlayBox]) -> Vec<String> {
    let (sx, sy) = dims.scale();
    let mut lines = vec![format!(
        "Overlays at {}x{} (natural {}x{}, scale {:.3} x {:.3})",
        dims.displayed_width, dims.displayed_height, dims.natural_width, dims.natural_height, sx, sy
    )];

    if overlays.is_empty() {
        lines.push(format!("{}(none)", indent(1)));
    }
    for (i, o) in overlays.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), o.text));
        lines.push(format!(
            "{}Box: ({:.1}, {:.1}) {:.1}x{:.1}",
            indent(1),
            o.x,
            o.y,
            o.width,
            o.height
        ));
    }
    lines
}

pub fn print_overlays(dims: &ImageDimensions, overlays: &[OverlayBox]) {
    for line in format_overlays(dims, overlays) {
        println!("{}", line);
    }
}
