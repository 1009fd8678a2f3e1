//! Pure Rust image engine built on the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Detect format | `ImageReader::with_guessed_format` (magic bytes) |
//! | Decode (JPEG, PNG, GIF, WebP, BMP, TIFF) | `ImageReader::into_decoder` + `DynamicImage::from_decoder` |
//! | ICC profile | `ImageDecoder::icc_profile` → `ImageEncoder::set_icc_profile` |
//! | EXIF | `ImageDecoder::exif_metadata` → `ImageEncoder::set_exif_metadata` |
//! | Resize | `DynamicImage::resize_exact` with `Lanczos3` filter |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` |
//! | Encode → PNG | `image::codecs::png::PngEncoder` |

use super::backend::{EngineError, ImageEngine, Metadata};
use super::calculations::{calculate_bounded_dimensions, check_dimensions};
use super::format::{OutputFormat, SourceFormat};
use super::params::{EncodeParams, ResizeMode, ResizeParams};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageDecoder, ImageEncoder, ImageFormat, ImageReader};
use std::borrow::Cow;
use std::io::Cursor;
use tracing::debug;

/// Interpolation used for every resize.
const FILTER: FilterType = FilterType::Lanczos3;

/// Pure Rust engine using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustEngine;

impl RustEngine {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// A decoded image plus what is needed to re-encode it faithfully.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pixels: DynamicImage,
    format: SourceFormat,
    icc_profile: Option<Vec<u8>>,
    /// Raw TIFF-structured EXIF block, without the `Exif\0\0` marker.
    exif: Option<Vec<u8>>,
}

impl DecodedImage {
    pub fn pixels(&self) -> &DynamicImage {
        &self.pixels
    }

    pub fn icc_profile(&self) -> Option<&[u8]> {
        self.icc_profile.as_deref()
    }

    pub fn exif(&self) -> Option<&[u8]> {
        self.exif.as_deref()
    }
}

fn source_format(format: ImageFormat) -> SourceFormat {
    match format {
        ImageFormat::Jpeg => SourceFormat::Jpeg,
        ImageFormat::Png => SourceFormat::Png,
        other => SourceFormat::Other(format!("{:?}", other).to_lowercase()),
    }
}

/// JPEG has no alpha channel and only 8-bit samples.
fn jpeg_compatible(img: &DynamicImage) -> Cow<'_, DynamicImage> {
    match img {
        DynamicImage::ImageLuma8(_) | DynamicImage::ImageRgb8(_) => Cow::Borrowed(img),
        _ => Cow::Owned(DynamicImage::ImageRgb8(img.to_rgb8())),
    }
}

/// PNG cannot store floating point samples.
fn png_compatible(img: &DynamicImage) -> Cow<'_, DynamicImage> {
    match img {
        DynamicImage::ImageRgb32F(_) | DynamicImage::ImageRgba32F(_) => {
            Cow::Owned(DynamicImage::ImageRgba16(img.to_rgba16()))
        }
        _ => Cow::Borrowed(img),
    }
}

/// Hand the source's ICC profile and EXIF to `encoder`. Either one the
/// encoder refuses is dropped.
fn attach_metadata(encoder: &mut impl ImageEncoder, source: &DecodedImage) {
    if let Some(profile) = &source.icc_profile {
        if let Err(err) = encoder.set_icc_profile(profile.clone()) {
            debug!(%err, "encoder cannot embed ICC profile; dropping it");
        }
    }
    if let Some(exif) = &source.exif {
        if let Err(err) = encoder.set_exif_metadata(exif.clone()) {
            debug!(%err, "encoder cannot embed EXIF; dropping it");
        }
    }
}

impl ImageEngine for RustEngine {
    type Handle = DecodedImage;

    fn decode(&self, bytes: &[u8]) -> Result<DecodedImage, EngineError> {
        let reader = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| EngineError::Decode(format!("failed to read image header: {}", e)))?;
        let format = reader
            .format()
            .ok_or_else(|| EngineError::Decode("unrecognized image format".to_string()))?;

        let mut decoder = reader
            .into_decoder()
            .map_err(|e| EngineError::Decode(format!("{:?} decoder failed: {}", format, e)))?;
        // Broken metadata is not worth failing the whole decode over.
        let icc_profile = decoder.icc_profile().ok().flatten();
        let exif = decoder.exif_metadata().ok().flatten();
        let pixels = DynamicImage::from_decoder(decoder)
            .map_err(|e| EngineError::Decode(format!("failed to decode {:?}: {}", format, e)))?;

        Ok(DecodedImage {
            pixels,
            format: source_format(format),
            icc_profile,
            exif,
        })
    }

    fn metadata(&self, handle: &DecodedImage) -> Result<Metadata, EngineError> {
        Ok(Metadata {
            format: handle.format.clone(),
            width: handle.pixels.width(),
            height: handle.pixels.height(),
        })
    }

    fn resize(&self, handle: &DecodedImage, params: &ResizeParams) -> Result<DecodedImage, EngineError> {
        if params.width == 0 || params.height == 0 {
            return Err(EngineError::Processing(format!(
                "cannot resize to {}x{}",
                params.width, params.height
            )));
        }
        let (width, height) = match params.mode {
            ResizeMode::Bounded => calculate_bounded_dimensions(
                (handle.pixels.width(), handle.pixels.height()),
                (params.width, params.height),
            ),
            ResizeMode::Exact => (params.width, params.height),
        };
        check_dimensions(width, height).map_err(EngineError::Processing)?;

        Ok(DecodedImage {
            pixels: handle.pixels.resize_exact(width, height, FILTER),
            format: handle.format.clone(),
            icc_profile: handle.icc_profile.clone(),
            exif: handle.exif.clone(),
        })
    }

    fn encode(&self, handle: &DecodedImage, params: &EncodeParams) -> Result<Vec<u8>, EngineError> {
        let target = match params.format {
            Some(format) => format,
            None => handle.format.as_output().ok_or_else(|| {
                EngineError::Encode(format!("cannot write {} output", handle.format))
            })?,
        };
        let mut buffer = Vec::new();
        let written = match target {
            OutputFormat::Jpeg => {
                let quality = params.quality.value() as u8;
                let mut encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
                if params.preserve_metadata {
                    attach_metadata(&mut encoder, handle);
                }
                jpeg_compatible(&handle.pixels).write_with_encoder(encoder)
            }
            OutputFormat::Png => {
                let mut encoder = PngEncoder::new(&mut buffer);
                if params.preserve_metadata {
                    attach_metadata(&mut encoder, handle);
                }
                png_compatible(&handle.pixels).write_with_encoder(encoder)
            }
        };
        written.map_err(|e| EngineError::Encode(format!("{} encode failed: {}", target, e)))?;

        Ok(buffer)
    }
}
