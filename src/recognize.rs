//! Text recognition collaborators.
//!
//! A [`Recognizer`] turns an image file into raw text and nothing else. Any
//! geometry an engine might report is dropped at this boundary; word boxes
//! are rebuilt afterwards by [`synthesize`](crate::text_layout::synthesize).
//!
//! Two implementations ship:
//!
//! - [`TesseractRecognizer`] runs the `tesseract` CLI and reads stdout.
//! - [`SidecarRecognizer`] reads a `.txt` file next to the image
//!   (`scan.png` → `scan.txt`), for text that was recognized elsewhere.

use crate::config::{RecognitionConfig, RecognitionEngine};
use crate::imaging::{BackendError, Dimensions, ImageBackend};
use crate::text_layout::{TextLayout, synthesize};
use std::path::Path;
use std::process::Command;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum RecognizeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to run {command}: {reason}")]
    Spawn { command: String, reason: String },
    #[error("{command} exited with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },
    #[error("Image error: {0}")]
    Image(#[from] BackendError),
}

/// Turns an image into plain text.
pub trait Recognizer {
    fn recognize(&self, path: &Path) -> Result<String, RecognizeError>;
}

/// Shells out to `tesseract <image> stdout -l <language>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TesseractRecognizer {
    pub command: String,
    pub language: String,
}

impl Default for TesseractRecognizer {
    fn default() -> Self {
        Self {
            command: "tesseract".to_string(),
            language: "eng".to_string(),
        }
    }
}

impl Recognizer for TesseractRecognizer {
    fn recognize(&self, path: &Path) -> Result<String, RecognizeError> {
        debug!(command = %self.command, path = %path.display(), "running recognizer");
        let output = Command::new(&self.command)
            .arg(path)
            .arg("stdout")
            .args(["-l", self.language.as_str()])
            .output()
            .map_err(|e| RecognizeError::Spawn {
                command: self.command.clone(),
                reason: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(RecognizeError::CommandFailed {
                command: self.command.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Reads previously recognized text from `<image stem>.txt`.
///
/// A missing sidecar means "no text", not an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SidecarRecognizer;

impl Recognizer for SidecarRecognizer {
    fn recognize(&self, path: &Path) -> Result<String, RecognizeError> {
        let sidecar = path.with_extension("txt");
        match std::fs::read_to_string(&sidecar) {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(sidecar = %sidecar.display(), "no sidecar text file");
                Ok(String::new())
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Build the recognizer selected in config.
pub fn from_config(config: &RecognitionConfig) -> Box<dyn Recognizer> {
    match config.engine {
        RecognitionEngine::Tesseract => Box::new(TesseractRecognizer {
            command: config.command.clone(),
            language: config.language.clone(),
        }),
        RecognitionEngine::Sidecar => Box::new(SidecarRecognizer),
    }
}

/// Recognize `path` and lay the text out over the image's natural size.
pub fn extract_text(
    recognizer: &dyn Recognizer,
    backend: &impl ImageBackend,
    path: &Path,
) -> Result<TextLayout, RecognizeError> {
    let dims = backend.identify(path)?;
    layout_text(recognizer, path, dims)
}

/// Recognize `path` and lay the text out over an already known natural size.
pub fn layout_text(
    recognizer: &dyn Recognizer,
    path: &Path,
    dims: Dimensions,
) -> Result<TextLayout, RecognizeError> {
    let raw = recognizer.recognize(path)?;
    let layout = synthesize(&raw, dims.width, dims.height);
    info!(
        path = %path.display(),
        blocks = layout.text_blocks.len(),
        "extracted text"
    );
    Ok(layout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::PixelBuffer;
    use crate::imaging::backend::tests::MockBackend;
    use crate::text_layout::NO_TEXT_DETECTED;
    use std::sync::Mutex;

    /// Returns fixed text and records which paths were asked for.
    #[derive(Default)]
    struct StaticRecognizer {
        text: String,
        calls: Mutex<Vec<String>>,
    }

    impl StaticRecognizer {
        fn new(text: &str) -> Self {
            Self {
                text: text.to_string(),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    impl Recognizer for StaticRecognizer {
        fn recognize(&self, path: &Path) -> Result<String, RecognizeError> {
            self.calls
                .lock()
                .unwrap()
                .push(path.to_string_lossy().to_string());
            Ok(self.text.clone())
        }
    }

    #[test]
    fn sidecar_reads_matching_txt() {
        let tmp = tempfile::TempDir::new().unwrap();
        let image = tmp.path().join("scan.png");
        std::fs::write(tmp.path().join("scan.txt"), "Invoice 42\nTotal").unwrap();

        let text = SidecarRecognizer.recognize(&image).unwrap();
        assert_eq!(text, "Invoice 42\nTotal");
    }

    #[test]
    fn sidecar_missing_is_empty_text() {
        let tmp = tempfile::TempDir::new().unwrap();
        let text = SidecarRecognizer
            .recognize(&tmp.path().join("nothing.png"))
            .unwrap();
        assert!(text.is_empty());
    }

    #[test]
    fn tesseract_missing_binary_is_spawn_error() {
        let recognizer = TesseractRecognizer {
            command: "/nonexistent/tesseract-binary".to_string(),
            language: "eng".to_string(),
        };
        let result = recognizer.recognize(Path::new("/tmp/whatever.png"));
        assert!(matches!(result, Err(RecognizeError::Spawn { .. })));
    }

    #[test]
    fn from_config_selects_engine() {
        let tmp = tempfile::TempDir::new().unwrap();
        std::fs::write(tmp.path().join("a.txt"), "from sidecar").unwrap();

        let config = RecognitionConfig {
            engine: RecognitionEngine::Sidecar,
            ..RecognitionConfig::default()
        };
        let recognizer = from_config(&config);
        assert_eq!(
            recognizer.recognize(&tmp.path().join("a.png")).unwrap(),
            "from sidecar"
        );
    }

    #[test]
    fn extract_text_uses_natural_dimensions() {
        let backend = MockBackend::with_buffers(vec![PixelBuffer::filled(1000, 500, [0; 4])]);
        let recognizer = StaticRecognizer::new("Hello World\n\nFoo");

        let layout = extract_text(&recognizer, &backend, Path::new("/img.png")).unwrap();
        let ys: Vec<u32> = layout.text_blocks.iter().map(|b| b.y).collect();
        assert_eq!(ys, vec![45, 45, 195]);
        assert_eq!(*recognizer.calls.lock().unwrap(), vec!["/img.png".to_string()]);
    }

    #[test]
    fn extract_text_identifies_once() {
        let backend = MockBackend::with_buffers(vec![PixelBuffer::filled(100, 100, [0; 4])]);
        extract_text(&StaticRecognizer::new("abc"), &backend, Path::new("/img.png")).unwrap();
        assert_eq!(backend.get_operations().len(), 1);
    }

    #[test]
    fn layout_text_uses_given_dimensions() {
        let recognizer = StaticRecognizer::new("Hello World\n\nFoo");
        let dims = Dimensions {
            width: 1000,
            height: 500,
        };

        let layout = layout_text(&recognizer, Path::new("/img.png"), dims).unwrap();
        assert_eq!(layout.text_blocks[0].x, 40);
        assert_eq!(layout.text_blocks[2].y, 195);
    }

    #[test]
    fn extract_text_empty_recognition_is_sentinel() {
        let backend = MockBackend::with_buffers(vec![PixelBuffer::filled(10, 10, [0; 4])]);
        let layout =
            extract_text(&StaticRecognizer::new("  \n"), &backend, Path::new("/img.png")).unwrap();
        assert!(layout.is_empty());
        assert_eq!(layout.full_text, NO_TEXT_DETECTED);
    }

    #[test]
    fn extract_text_propagates_image_errors() {
        let result = extract_text(
            &StaticRecognizer::new("text"),
            &MockBackend::new(),
            Path::new("/img.png"),
        );
        assert!(matches!(result, Err(RecognizeError::Image(_))));
    }
}
