//! Resize requests and their validation.
//!
//! Requests can be built directly in Rust or parsed from loosely typed JSON
//! (the CLI's batch file). Either way a request reaches the engine only after
//! [`ResizeRequest::validate`] has accepted it.
//!
//! ## JSON shape
//!
//! ```json
//! [
//!   { "width": 100, "height": 100, "isSquare": true, "name": "thumb" },
//!   { "width": 320, "height": 320 }
//! ]
//! ```
//!
//! `width` and `height` must be positive whole numbers. `isSquare` (or
//! `is_square`) counts only when it is literally `true`; any other value is
//! treated as `false`. A non-string `name` is ignored.

use crate::imaging::{MAX_DIMENSION, check_dimensions};
use crate::transform::TransformError;
use serde_json::{Map, Value};

/// One output to produce from a loaded image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeRequest {
    pub width: u32,
    pub height: u32,
    /// Force exactly `width`x`height` instead of fitting within it.
    pub is_square: bool,
    /// Caller-supplied tag copied onto the result.
    pub name: Option<String>,
}

impl ResizeRequest {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            is_square: false,
            name: None,
        }
    }

    pub fn square(mut self) -> Self {
        self.is_square = true;
        self
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Reject requests the engine could not satisfy.
    pub fn validate(&self) -> Result<(), TransformError> {
        if self.width == 0 || self.height == 0 {
            return Err(TransformError::InvalidResizeRequest(format!(
                "width and height must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if self.width > MAX_DIMENSION || self.height > MAX_DIMENSION {
            return Err(TransformError::InvalidResizeRequest(format!(
                "width and height must be at most {}, got {}x{}",
                MAX_DIMENSION, self.width, self.height
            )));
        }
        // Square outputs are exactly the box; bounded ones are checked once
        // the engine knows the source aspect ratio.
        if self.is_square {
            check_dimensions(self.width, self.height)
                .map_err(TransformError::InvalidResizeRequest)?;
        }
        Ok(())
    }

    /// Parse and validate a single request object.
    pub fn from_value(value: &Value) -> Result<Self, TransformError> {
        let object = value.as_object().ok_or_else(|| {
            TransformError::InvalidResizeRequest("expected an object".to_string())
        })?;

        let request = Self {
            width: dimension(object, "width")?,
            height: dimension(object, "height")?,
            is_square: matches!(
                object.get("isSquare").or_else(|| object.get("is_square")),
                Some(Value::Bool(true))
            ),
            name: object.get("name").and_then(Value::as_str).map(str::to_owned),
        };
        request.validate()?;
        Ok(request)
    }

    /// Parse a batch: a non-empty array of request objects.
    pub fn batch_from_value(value: &Value) -> Result<Vec<Self>, TransformError> {
        let items = value.as_array().ok_or_else(|| {
            TransformError::InvalidInput("batch resize expects a list of requests".to_string())
        })?;
        if items.is_empty() {
            return Err(TransformError::InvalidInput(
                "batch resize needs at least one request".to_string(),
            ));
        }
        items.iter().map(Self::from_value).collect()
    }
}

fn dimension(object: &Map<String, Value>, key: &str) -> Result<u32, TransformError> {
    let value = object
        .get(key)
        .ok_or_else(|| TransformError::InvalidResizeRequest(format!("missing {key}")))?;
    let number = value
        .as_f64()
        .ok_or_else(|| TransformError::InvalidResizeRequest(format!("{key} is not a number: {value}")))?;

    if !number.is_finite() || number <= 0.0 || number.fract() != 0.0 || number > u32::MAX as f64 {
        return Err(TransformError::InvalidResizeRequest(format!(
            "{key} must be a positive whole number, got {value}"
        )));
    }
    Ok(number as u32)
}
