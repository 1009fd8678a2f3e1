//! Resize and reformat orchestration.
//!
//! [`ImageTransformer`] turns one loaded source into any number of encoded
//! outputs. It never touches pixels itself: it validates requests, picks the
//! output encoding, and asks an [`ImageEngine`] to do the work.
//!
//! ## Lifecycle
//!
//! ```text
//! bytes ──load──▶ LoadedImage ──resize / batch_resize / reformat──▶ TransformResult
//! ```
//!
//! A [`LoadedImage`] is an ordinary value owned by the caller. Every
//! operation borrows it immutably and the engine returns new handles for
//! resized copies, so one load can feed many outputs, from many threads,
//! without copying the source first.
//!
//! ## Output format
//!
//! An explicitly requested format wins (and must be `jpeg` or `png`).
//! Otherwise a jpeg or png source keeps its format, and anything else is
//! written in the configured default format (`png` unless configured).
//!
//! ## Batches
//!
//! [`ImageTransformer::batch_resize`] runs every request on the rayon pool.
//! Results come back in request order regardless of which finishes first, and
//! the first failure fails the whole batch.

use crate::config::OutputConfig;
use crate::imaging::{
    EncodeParams, EngineError, ImageEngine, Metadata, OutputFormat, Quality, ResizeMode,
    ResizeParams, UnsupportedFormat,
};
use crate::request::ResizeRequest;
use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum TransformError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Not a valid resize request: {0}")]
    InvalidResizeRequest(String),
    #[error(transparent)]
    InvalidFormat(#[from] UnsupportedFormat),
    #[error("Image engine failed: {0}")]
    Engine(#[from] EngineError),
}

/// Result type for transformer operations.
pub type Result<T> = std::result::Result<T, TransformError>;

/// A decoded source image and the metadata read from it at load time.
#[derive(Debug, Clone)]
pub struct LoadedImage<H> {
    handle: H,
    metadata: Metadata,
}

impl<H> LoadedImage<H> {
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }
}

/// One encoded output.
///
/// Serializes without the encoded bytes, for reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransformResult {
    #[serde(skip)]
    pub image: Vec<u8>,
    pub format: OutputFormat,
    /// Copied from the request, for correlating batch results.
    pub name: Option<String>,
}

/// Resizes and reformats loaded images through an [`ImageEngine`].
pub struct ImageTransformer<E> {
    engine: E,
    output: OutputConfig,
}

impl<E: ImageEngine> ImageTransformer<E> {
    pub fn new(engine: E) -> Self {
        Self::with_config(engine, OutputConfig::default())
    }

    pub fn with_config(engine: E, output: OutputConfig) -> Self {
        Self { engine, output }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Decode `bytes` and read its metadata.
    pub fn load(&self, bytes: &[u8]) -> Result<LoadedImage<E::Handle>> {
        if bytes.is_empty() {
            return Err(TransformError::InvalidInput(
                "image data is empty".to_string(),
            ));
        }
        let handle = self.engine.decode(bytes)?;
        let metadata = self.engine.metadata(&handle)?;
        debug!(
            format = %metadata.format,
            width = metadata.width,
            height = metadata.height,
            bytes = bytes.len(),
            "loaded image"
        );
        Ok(LoadedImage { handle, metadata })
    }

    /// Resize a loaded image and encode the result.
    ///
    /// Non-square requests fit within `width`x`height` keeping the aspect
    /// ratio; square requests produce exactly `width`x`height`.
    pub fn resize(
        &self,
        loaded: &LoadedImage<E::Handle>,
        request: &ResizeRequest,
    ) -> Result<TransformResult> {
        request.validate()?;

        let mode = if request.is_square {
            ResizeMode::Exact
        } else {
            ResizeMode::Bounded
        };
        debug!(
            width = request.width,
            height = request.height,
            ?mode,
            name = request.name.as_deref(),
            "resizing"
        );
        let resized = self.engine.resize(
            &loaded.handle,
            &ResizeParams {
                width: request.width,
                height: request.height,
                mode,
            },
        )?;

        self.output(&resized, &loaded.metadata, None, request.name.clone())
    }

    /// Resize a loaded image once per request, in parallel.
    ///
    /// Every request is validated before any engine work starts. Results are
    /// in request order; the first failure fails the batch.
    pub fn batch_resize(
        &self,
        loaded: &LoadedImage<E::Handle>,
        requests: &[ResizeRequest],
    ) -> Result<Vec<TransformResult>> {
        if requests.is_empty() {
            return Err(TransformError::InvalidInput(
                "batch resize needs at least one request".to_string(),
            ));
        }
        requests.iter().try_for_each(ResizeRequest::validate)?;

        let results = requests
            .par_iter()
            .map(|request| self.resize(loaded, request))
            .collect::<Result<Vec<_>>>();

        if let Err(err) = &results {
            warn!(requests = requests.len(), %err, "batch resize failed");
        }
        results
    }

    /// Re-encode a loaded image without resizing.
    ///
    /// `format` is validated against the allow-list; `None` means the
    /// configured default format.
    pub fn reformat(
        &self,
        loaded: &LoadedImage<E::Handle>,
        format: Option<&str>,
    ) -> Result<TransformResult> {
        let format = match format {
            Some(name) => parse_output_format(name)?,
            None => self.output.default_format,
        };
        self.reformat_to(loaded, format)
    }

    /// Re-encode a loaded image to `format` without resizing.
    pub fn reformat_to(
        &self,
        loaded: &LoadedImage<E::Handle>,
        format: OutputFormat,
    ) -> Result<TransformResult> {
        self.output(&loaded.handle, &loaded.metadata, Some(format), None)
    }

    /// Output format used when none is requested explicitly.
    pub fn output_format_for(&self, metadata: &Metadata) -> OutputFormat {
        metadata
            .format
            .as_output()
            .unwrap_or(self.output.default_format)
    }

    fn output(
        &self,
        handle: &E::Handle,
        metadata: &Metadata,
        explicit: Option<OutputFormat>,
        name: Option<String>,
    ) -> Result<TransformResult> {
        let format = explicit.unwrap_or_else(|| self.output_format_for(metadata));
        let params = EncodeParams {
            format: (!format.matches(&metadata.format)).then_some(format),
            quality: Quality::new(self.output.jpeg_quality),
            preserve_metadata: self.output.preserve_metadata,
        };

        let image = self.engine.encode(handle, &params)?;
        debug!(%format, bytes = image.len(), name = name.as_deref(), "encoded image");
        Ok(TransformResult {
            image,
            format,
            name,
        })
    }
}

/// Check a requested format name against the allow-list.
pub fn parse_output_format(name: &str) -> Result<OutputFormat> {
    Ok(name.parse::<OutputFormat>()?)
}
