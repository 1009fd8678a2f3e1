//! Parameter types for engine operations.
//!
//! These structs describe *what* the engine should do, not *how*. They are
//! the interface between the [`ImageTransformer`](crate::transform::ImageTransformer),
//! which decides sizes and formats, and the [`backend`](super::backend), which
//! does the pixel work. Keeping them plain data lets tests swap in a mock
//! engine and assert on exactly what was asked of it.
//!
//! ## Types
//!
//! - [`Quality`]: JPEG encoding quality (1–100, default 80). Clamped on construction.
//! - [`ResizeMode`]: Bounded (fit within, keep aspect) or exact (stretch).
//! - [`ResizeParams`]: Target box plus mode.
//! - [`EncodeParams`]: Target encoding (or keep the source's), quality, metadata policy.

use super::format::OutputFormat;

/// Quality setting for lossy encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(80)
    }
}

/// How the target box constrains the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeMode {
    /// Scale to fit within the box, preserving aspect ratio. Neither side
    /// exceeds the requested dimensions.
    Bounded,
    /// Output is exactly the requested dimensions; aspect ratio is discarded.
    Exact,
}

/// Parameters for a resize operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeParams {
    pub width: u32,
    pub height: u32,
    pub mode: ResizeMode,
}

/// Parameters for an encode operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeParams {
    /// `None` keeps the source encoding.
    pub format: Option<OutputFormat>,
    pub quality: Quality,
    /// Carry embedded metadata (ICC profile) into the output.
    pub preserve_metadata: bool,
}
