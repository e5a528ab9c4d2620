//! Application configuration.
//!
//! Handles loading, validating, and merging `pixel-lens.toml`. Stock defaults
//! are serialized to a TOML table, the user file is merged on top key by key,
//! and the result is deserialized and validated. A missing file means "use
//! the defaults".
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [enhance]
//! brightness = 0            # Used by `enhance` when --brightness is omitted
//! contrast = 0
//! saturation = 0
//!
//! [output]
//! quality = 90              # JPEG quality (1-100); PNG/TIFF/WebP are lossless
//!
//! [recognition]
//! engine = "tesseract"      # "tesseract" or "sidecar"
//! command = "tesseract"     # Executable for the tesseract engine
//! language = "eng"          # Passed as `-l`
//! ```
//!
//! Enhancement values are deliberately not range-checked. Values outside
//! `[-100, 100]` are legal and simply saturate.
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::EnhancementSettings;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "pixel-lens.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from `pixel-lens.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Fallback values for the `enhance` command.
    pub enhance: EnhancementSettings,
    /// Encode settings for written images.
    pub output: OutputConfig,
    /// Which recognizer to run for `ocr` and `overlay`.
    pub recognition: RecognitionConfig,
}

impl AppConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=100).contains(&self.output.quality) {
            return Err(ConfigError::Validation(
                "output.quality must be 1-100".into(),
            ));
        }
        if self.recognition.command.trim().is_empty() {
            return Err(ConfigError::Validation(
                "recognition.command must not be empty".into(),
            ));
        }
        if self.recognition.language.trim().is_empty() {
            return Err(ConfigError::Validation(
                "recognition.language must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Encode settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// JPEG encoding quality (1 = worst, 100 = best).
    pub quality: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { quality: 90 }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RecognitionEngine {
    #[default]
    Tesseract,
    Sidecar,
}

/// Recognition collaborator settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RecognitionConfig {
    pub engine: RecognitionEngine,
    /// Executable for the tesseract engine.
    pub command: String,
    /// Tesseract language code.
    pub language: String,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            engine: RecognitionEngine::Tesseract,
            command: "tesseract".to_string(),
            language: "eng".to_string(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(AppConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<AppConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: AppConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `path`, layered over stock defaults.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let overlay = load_raw_config(path)?;
    resolve_config(stock_defaults_value(), overlay)
}

/// Returns a fully-commented stock `pixel-lens.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r#"# pixel-lens configuration
# ========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Enhancement
# ---------------------------------------------------------------------------
[enhance]
# Used by `pixel-lens enhance` for any flag that is not given.
# Nominal range is -100..100; larger values are accepted and saturate.
# `pixel-lens quick-enhance` ignores these and always applies
# brightness 40, contrast 20, saturation 10.
brightness = 0
contrast = 0
saturation = 0

# ---------------------------------------------------------------------------
# Output
# ---------------------------------------------------------------------------
[output]
# JPEG encoding quality (1 = worst, 100 = best).
# PNG, TIFF and WebP output is always lossless.
quality = 90

# ---------------------------------------------------------------------------
# Text recognition
# ---------------------------------------------------------------------------
[recognition]
# "tesseract" runs the tesseract CLI.
# "sidecar" reads <image>.txt next to the image instead.
engine = "tesseract"

# Executable for the tesseract engine.
command = "tesseract"

# Language passed as `-l`.
language = "eng"
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = AppConfig::default();
        assert_eq!(config.enhance, EnhancementSettings::default());
        assert_eq!(config.output.quality, 90);
        assert_eq!(config.recognition.engine, RecognitionEngine::Tesseract);
        assert_eq!(config.recognition.command, "tesseract");
        assert_eq!(config.recognition.language, "eng");
    }

    #[test]
    fn parse_partial_config() {
        let config: AppConfig = toml::from_str(
            r#"
[enhance]
contrast = 25
"#,
        )
        .unwrap();
        assert_eq!(config.enhance, EnhancementSettings::new(0, 25, 0));
        assert_eq!(config.output.quality, 90);
    }

    #[test]
    fn parse_sidecar_engine() {
        let config: AppConfig = toml::from_str(
            r#"
[recognition]
engine = "sidecar"
"#,
        )
        .unwrap();
        assert_eq!(config.recognition.engine, RecognitionEngine::Sidecar);
        assert_eq!(config.recognition.language, "eng");
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(&tmp.path().join(DEFAULT_CONFIG_FILE)).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(DEFAULT_CONFIG_FILE);
        fs::write(
            &path,
            r#"
[enhance]
brightness = -20

[output]
quality = 75

[recognition]
language = "deu"
"#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.enhance.brightness, -20);
        assert_eq!(config.output.quality, 75);
        assert_eq!(config.recognition.language, "deu");
        assert_eq!(config.recognition.command, "tesseract");
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(DEFAULT_CONFIG_FILE);
        fs::write(&path, "this is not valid toml [[[").unwrap();

        assert!(matches!(load_config(&path), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(DEFAULT_CONFIG_FILE);
        fs::write(&path, "[output]\nquality = 0\n").unwrap();

        assert!(matches!(load_config(&path), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn out_of_range_enhancement_is_not_a_validation_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(DEFAULT_CONFIG_FILE);
        fs::write(&path, "[enhance]\nbrightness = 400\n").unwrap();

        assert_eq!(load_config(&path).unwrap().enhance.brightness, 400);
    }

    // =========================================================================
    // Merge tests
    // =========================================================================

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str("quality = 90").unwrap();
        let overlay: toml::Value = toml::from_str("quality = 70").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("quality").unwrap().as_integer(), Some(70));
    }

    #[test]
    fn merge_toml_table_merge() {
        let base: toml::Value = toml::from_str(
            r#"
[enhance]
brightness = 10
contrast = 20
"#,
        )
        .unwrap();
        let overlay: toml::Value = toml::from_str(
            r#"
[enhance]
contrast = 5
"#,
        )
        .unwrap();
        let merged = merge_toml(base, overlay);
        let enhance = merged.get("enhance").unwrap();
        assert_eq!(enhance.get("contrast").unwrap().as_integer(), Some(5));
        assert_eq!(enhance.get("brightness").unwrap().as_integer(), Some(10));
    }

    // =========================================================================
    // Validation and unknown keys
    // =========================================================================

    #[test]
    fn validate_default_config_passes() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_quality_too_high() {
        let mut config = AppConfig::default();
        config.output.quality = 101;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_empty_command() {
        let mut config = AppConfig::default();
        config.recognition.command = "  ".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn unknown_key_rejected() {
        let result: Result<AppConfig, _> = toml::from_str("[enhance]\nbrightnes = 4\n");
        let err = result.unwrap_err().to_string();
        assert!(err.contains("unknown field"));
    }

    #[test]
    fn unknown_section_rejected() {
        let result: Result<AppConfig, _> = toml::from_str("[enhancement]\nbrightness = 4\n");
        assert!(result.is_err());
    }

    #[test]
    fn unknown_engine_rejected() {
        let result: Result<AppConfig, _> = toml::from_str("[recognition]\nengine = \"easyocr\"\n");
        assert!(result.is_err());
    }

    // =========================================================================
    // Stock config
    // =========================================================================

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: AppConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn stock_defaults_value_has_all_sections() {
        let value = stock_defaults_value();
        for section in ["enhance", "output", "recognition"] {
            assert!(value.get(section).is_some(), "missing [{section}]");
        }
    }
}
