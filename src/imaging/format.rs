//! Source and output format types.
//!
//! Decoding accepts whatever the engine can read; encoding is limited to the
//! two formats in [`OutputFormat`]. Anything else is reported as
//! [`SourceFormat::Other`] and falls back to the configured default on output.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A format name outside the output allow-list.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid output format: {0}")]
pub struct UnsupportedFormat(pub String);

/// Encodings this crate is willing to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Jpeg,
    #[default]
    Png,
}

impl OutputFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpeg",
            OutputFormat::Png => "png",
        }
    }

    /// File extension used when writing results to disk.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Png => "png",
        }
    }

    /// Whether a source already uses this encoding.
    pub fn matches(self, source: &SourceFormat) -> bool {
        source.as_output() == Some(self)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = UnsupportedFormat;

    /// Case-insensitive; aliases such as `jpg` are not accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "jpeg" => Ok(OutputFormat::Jpeg),
            "png" => Ok(OutputFormat::Png),
            _ => Err(UnsupportedFormat(s.to_string())),
        }
    }
}

/// Format of a decoded source image, as detected from its bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SourceFormat {
    Jpeg,
    Png,
    /// Any other detected format, by lowercase name (`gif`, `webp`, ...).
    Other(String),
}

impl SourceFormat {
    /// The matching output format, if this source is in the allow-list.
    pub fn as_output(&self) -> Option<OutputFormat> {
        match self {
            SourceFormat::Jpeg => Some(OutputFormat::Jpeg),
            SourceFormat::Png => Some(OutputFormat::Png),
            SourceFormat::Other(_) => None,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            SourceFormat::Jpeg => "jpeg",
            SourceFormat::Png => "png",
            SourceFormat::Other(name) => name,
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
