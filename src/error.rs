//! Error type shared by the cropper, the focus estimator and the frame pipeline.

use thiserror::Error;

/// Focus pipeline errors.
#[derive(Error, Debug)]
pub enum FocusError {
    #[error("Image source unavailable: {0}")]
    SourceUnavailable(String),
    #[error("Failed to decode image: {0}")]
    Decode(String),
    #[error(
        "Crop region {width}x{height} does not fit into {source_width}x{source_height} image"
    )]
    Geometry {
        width: u32,
        height: u32,
        source_width: u32,
        source_height: u32,
    },
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("Failed to encode image: {0}")]
    Encode(String),
}

impl FocusError {
    /// HTTP status code used when the error is reported to a web client.
    pub fn status_code(&self) -> u16 {
        match self {
            FocusError::SourceUnavailable(_) => 502,
            FocusError::Decode(_) => 502,
            FocusError::Geometry { .. } => 422,
            FocusError::InvalidParameter(_) => 400,
            FocusError::Encode(_) => 500,
        }
    }

    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }
}
