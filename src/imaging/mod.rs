//! Image engine layer: everything that touches pixels.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::ImageReader` (format guessed from magic bytes) |
//! | **Metadata** | detected format + decoded dimensions |
//! | **Resize** | Lanczos3, bounded or exact |
//! | **Encode** | `JpegEncoder` / `PngEncoder`, ICC profile and EXIF carried through |
//!
//! The module is split into:
//! - **Format**: [`OutputFormat`] allow-list and detected [`SourceFormat`]
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing engine operations
//! - **Backend**: [`ImageEngine`] trait + [`RustEngine`]

pub mod backend;
mod calculations;
pub mod format;
mod params;
pub mod rust_backend;

pub use backend::{EngineError, ImageEngine, Metadata};
pub use calculations::{MAX_DIMENSION, MAX_PIXELS, calculate_bounded_dimensions, check_dimensions};
pub use format::{OutputFormat, SourceFormat, UnsupportedFormat};
pub use params::{EncodeParams, Quality, ResizeMode, ResizeParams};
pub use rust_backend::{DecodedImage, RustEngine};
