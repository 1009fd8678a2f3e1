//! # sharp-image
//!
//! Load an image buffer once, inspect it, and produce resized or reformatted
//! JPEG/PNG copies as in-memory buffers.
//!
//! ```no_run
//! use sharp_image::imaging::RustEngine;
//! use sharp_image::{ImageTransformer, ResizeRequest};
//!
//! # fn main() -> Result<(), sharp_image::TransformError> {
//! let bytes = std::fs::read("bird.jpg").unwrap();
//! let transformer = ImageTransformer::new(RustEngine::new());
//! let bird = transformer.load(&bytes)?;
//!
//! let thumb = transformer.resize(&bird, &ResizeRequest::new(100, 100).square())?;
//! let png = transformer.reformat(&bird, Some("png"))?;
//! let sizes = transformer.batch_resize(
//!     &bird,
//!     &[ResizeRequest::new(320, 320), ResizeRequest::new(500, 500).named("large")],
//! )?;
//! # Ok(())
//! # }
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`transform`] | [`ImageTransformer`]: load, resize, batch resize, reformat, format resolution |
//! | [`request`] | [`ResizeRequest`] construction and validation, including loose JSON input |
//! | [`imaging`] | Engine trait, `image`-crate engine, formats, dimension math |
//! | [`config`] | `config.toml` loading, merging over defaults, validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Loaded Images Are Values
//!
//! [`ImageTransformer::load`] returns a [`LoadedImage`] that the caller owns
//! and passes back by reference. The transformer holds only configuration,
//! so a single instance can serve many images and many threads, and a new
//! load never invalidates outputs still being produced from an older one.
//!
//! ## Engine Behind a Trait
//!
//! Pixel work sits behind [`imaging::ImageEngine`]. The transformer decides
//! *what* to produce (sizes, modes, formats) and the engine decides *how*.
//! Tests run the orchestration against a recording mock that can delay or
//! fail individual resizes, which is how batch ordering is checked.
//!
//! ## Two Output Formats
//!
//! Outputs are JPEG or PNG, nothing else. A source in either format keeps it;
//! every other source (GIF, WebP, BMP, TIFF) becomes PNG unless the config
//! names a different default.
//!
//! ## Ordered Parallel Batches
//!
//! Batches run on rayon and collect into a `Vec` indexed by request
//! position, so results always match request order. The first error wins and
//! no partial batch is returned.

pub mod config;
pub mod imaging;
pub mod output;
pub mod request;
pub mod transform;

pub use request::ResizeRequest;
pub use transform::{ImageTransformer, LoadedImage, TransformError, TransformResult};

#[cfg(test)]
pub(crate) mod test_helpers;
