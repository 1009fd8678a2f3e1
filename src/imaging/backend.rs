//! Image engine trait and shared types.
//!
//! The [`ImageEngine`] trait defines the four operations the transformer
//! relies on: decode, metadata, resize, and encode. Handles are immutable;
//! `resize` returns a new handle instead of changing the one it was given, so
//! a loaded source can serve any number of independent outputs.
//!
//! The production implementation is
//! [`RustEngine`](super::rust_backend::RustEngine), built on the `image` crate.

use super::format::SourceFormat;
use super::params::{EncodeParams, ResizeParams};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Decode failed: {0}")]
    Decode(String),
    #[error("Encode failed: {0}")]
    Encode(String),
    #[error("Processing failed: {0}")]
    Processing(String),
}

/// Format and dimensions of a decoded image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    pub format: SourceFormat,
    pub width: u32,
    pub height: u32,
}

/// Trait for image engines.
///
/// `Sync` plus `Send + Sync` handles let one decoded source be resized from
/// several rayon workers at once.
pub trait ImageEngine: Sync {
    /// Opaque decoded image.
    type Handle: Send + Sync;

    /// Decode raw bytes into a handle.
    fn decode(&self, bytes: &[u8]) -> Result<Self::Handle, EngineError>;

    /// Read format and dimensions of a handle.
    fn metadata(&self, handle: &Self::Handle) -> Result<Metadata, EngineError>;

    /// Produce a resized copy of a handle.
    fn resize(
        &self,
        handle: &Self::Handle,
        params: &ResizeParams,
    ) -> Result<Self::Handle, EngineError>;

    /// Encode a handle to bytes.
    fn encode(&self, handle: &Self::Handle, params: &EncodeParams) -> Result<Vec<u8>, EngineError>;
}
