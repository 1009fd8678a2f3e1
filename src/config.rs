//! Transformer configuration.
//!
//! Handles loading, validating, and merging a `config.toml`. User files are
//! sparse: they are merged key-by-key over the stock defaults, so a file only
//! needs the values it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [output]
//! default_format = "png"    # Used when the source is neither jpeg nor png
//! jpeg_quality = 80         # JPEG encoding quality (1-100)
//! preserve_metadata = true  # Carry the embedded ICC profile into outputs
//!
//! [processing]
//! max_threads = 4           # Max parallel batch workers (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::OutputFormat;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TransformConfig {
    /// Output encoding settings.
    pub output: OutputConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl TransformConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=100).contains(&self.output.jpeg_quality) {
            return Err(ConfigError::Validation(
                "output.jpeg_quality must be 1-100".into(),
            ));
        }
        if self.processing.max_threads == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_threads must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Output encoding settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Fallback for sources outside the allow-list, and for `reformat`
    /// without an explicit format.
    pub default_format: OutputFormat,
    /// JPEG encoding quality (1 = worst, 100 = best).
    pub jpeg_quality: u32,
    /// Ask the engine to keep embedded metadata (ICC profile).
    pub preserve_metadata: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            default_format: OutputFormat::Png,
            jpeg_quality: 80,
            preserve_metadata: true,
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel batch workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_threads: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_threads.map(|n| n.min(cores)).unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(TransformConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
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

/// Merge an optional overlay onto the defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<TransformConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: TransformConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Parse config from TOML text.
pub fn parse_config(content: &str) -> Result<TransformConfig, ConfigError> {
    let value: toml::Value = toml::from_str(content)?;
    resolve_config(Some(value))
}

/// Load config from a TOML file.
///
/// Unlike a missing optional file, an explicitly named file must exist.
pub fn load_config(path: &Path) -> Result<TransformConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# sharp-image configuration
# =========================
# Every key is optional. Values shown are the defaults.

[output]
# Format written when the source is neither jpeg nor png, and by
# `reformat` when no format is given. One of: "jpeg", "png".
default_format = "png"

# JPEG encoding quality, 1 (worst) to 100 (best).
jpeg_quality = 80

# Carry the source's embedded ICC profile into every output.
preserve_metadata = true

[processing]
# Maximum parallel workers for batch resizes.
# Omit to use every CPU core. Larger values are clamped to the core count.
# max_threads = 4
"##
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let config = TransformConfig::default();
        assert_eq!(config.output.default_format, OutputFormat::Png);
        assert_eq!(config.output.jpeg_quality, 80);
        assert!(config.output.preserve_metadata);
        assert_eq!(config.processing.max_threads, None);
    }

    #[test]
    fn parse_partial_config() {
        let config = parse_config(
            r#"
            [output]
            jpeg_quality = 65
            "#,
        )
        .unwrap();
        assert_eq!(config.output.jpeg_quality, 65);
        assert_eq!(config.output.default_format, OutputFormat::Png);
        assert!(config.output.preserve_metadata);
    }

    #[test]
    fn parse_full_config() {
        let config = parse_config(
            r#"
            [output]
            default_format = "jpeg"
            jpeg_quality = 92
            preserve_metadata = false

            [processing]
            max_threads = 2
            "#,
        )
        .unwrap();
        assert_eq!(config.output.default_format, OutputFormat::Jpeg);
        assert_eq!(config.output.jpeg_quality, 92);
        assert!(!config.output.preserve_metadata);
        assert_eq!(config.processing.max_threads, Some(2));
    }

    #[test]
    fn empty_config_is_default() {
        assert_eq!(parse_config("").unwrap(), TransformConfig::default());
    }

    #[test]
    fn stock_config_parses_to_defaults() {
        assert_eq!(
            parse_config(stock_config_toml()).unwrap(),
            TransformConfig::default()
        );
    }

    #[test]
    fn default_format_outside_allow_list_rejected() {
        let result = parse_config(
            r#"
            [output]
            default_format = "webp"
            "#,
        );
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn quality_out_of_range_rejected() {
        for quality in [0, 101] {
            let result = parse_config(&format!("[output]\njpeg_quality = {quality}\n"));
            assert!(
                matches!(result, Err(ConfigError::Validation(_))),
                "quality {quality} should fail validation"
            );
        }
    }

    #[test]
    fn zero_threads_rejected() {
        let result = parse_config("[processing]\nmax_threads = 0\n");
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn unknown_key_rejected() {
        let result = parse_config("[output]\nformat = \"png\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn unknown_section_rejected() {
        let result = parse_config("[colors]\nbackground = \"#fff\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn invalid_toml_is_error() {
        let result = parse_config("this is not [valid toml");
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "[output]\ndefault_format = \"jpeg\"\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.output.default_format, OutputFormat::Jpeg);
    }

    #[test]
    fn load_config_missing_file_is_io_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let result = load_config(&tmp.path().join("missing.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn effective_threads_auto() {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        assert_eq!(effective_threads(&ProcessingConfig::default()), cores);
    }

    #[test]
    fn effective_threads_user_constrains_down() {
        let config = ProcessingConfig {
            max_threads: Some(1),
        };
        assert_eq!(effective_threads(&config), 1);
    }

    #[test]
    fn effective_threads_clamped_to_cores() {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        let config = ProcessingConfig {
            max_threads: Some(99_999),
        };
        assert_eq!(effective_threads(&config), cores);
    }

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str("a = 1\nb = 2").unwrap();
        let overlay: toml::Value = toml::from_str("b = 3").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["a"].as_integer(), Some(1));
        assert_eq!(merged["b"].as_integer(), Some(3));
    }

    #[test]
    fn merge_toml_nested_tables() {
        let base: toml::Value =
            toml::from_str("[output]\njpeg_quality = 80\npreserve_metadata = true").unwrap();
        let overlay: toml::Value = toml::from_str("[output]\njpeg_quality = 50").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["output"]["jpeg_quality"].as_integer(), Some(50));
        assert_eq!(merged["output"]["preserve_metadata"].as_bool(), Some(true));
    }
}
