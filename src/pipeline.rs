//! Frame pipeline: fetch, decode, crop, estimate focus, annotate, encode.

use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{DateTime, Utc};
use image::{ImageFormat, RgbImage};
use serde::Serialize;
use std::io::Cursor;
use tracing::debug;

use crate::error::FocusError;
use crate::focus::{estimate_focus, validate_radii};
use crate::geometry::crop_centered;
use crate::overlay::Overlay;
use crate::source::ImageSource;

/// Default inner radius of the focus ring.
pub const DEFAULT_R1: u32 = 50;
/// Default outer radius of the focus ring.
pub const DEFAULT_R2: u32 = 100;

/// Parameters of one diagnostic image request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagnosticRequest {
    /// Width of the returned image.
    pub width: u32,
    /// Height of the returned image.
    pub height: u32,
    /// Inner radius of the focus ring.
    pub r1: u32,
    /// Outer radius of the focus ring.
    pub r2: u32,
}

impl DiagnosticRequest {
    /// Request with the default ring radii.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            r1: DEFAULT_R1,
            r2: DEFAULT_R2,
        }
    }

    pub fn with_radii(mut self, r1: u32, r2: u32) -> Self {
        self.r1 = r1;
        self.r2 = r2;
        self
    }

    /// Reject requests that could never succeed, before any work is done.
    pub fn validate(&self) -> Result<(), FocusError> {
        if self.width == 0 || self.height == 0 {
            return Err(FocusError::invalid_parameter(format!(
                "width and height must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        validate_radii(self.r1, self.r2)
    }
}

/// Summary of one measurement.
#[derive(Debug, Clone, Serialize)]
pub struct FocusReport {
    pub score: f64,
    pub width: u32,
    pub height: u32,
    pub r1: u32,
    pub r2: u32,
    pub captured_at: DateTime<Utc>,
}

/// The annotated, PNG encoded output of the pipeline.
#[derive(Debug, Clone)]
pub struct AnnotatedFrame {
    pub png: Vec<u8>,
    pub report: FocusReport,
}

impl AnnotatedFrame {
    pub const CONTENT_TYPE: &'static str = "image/png";

    pub fn score(&self) -> f64 {
        self.report.score
    }

    /// The image as a `data:` URL, ready for an `<img src>` attribute.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", Self::CONTENT_TYPE, STANDARD.encode(&self.png))
    }
}

/// Decode an encoded frame into an RGB raster.
pub fn decode_frame(bytes: &[u8]) -> Result<RgbImage, FocusError> {
    let image = image::load_from_memory(bytes).map_err(|e| FocusError::Decode(e.to_string()))?;
    Ok(image.to_rgb8())
}

/// Encode a raster as PNG.
pub fn encode_png(image: &RgbImage) -> Result<Vec<u8>, FocusError> {
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, ImageFormat::Png)
        .map_err(|e| FocusError::Encode(e.to_string()))?;
    Ok(buffer.into_inner())
}

/// Run everything after the fetch: decode, crop, measure, annotate and encode.
pub fn render_diagnostic(
    bytes: &[u8],
    request: &DiagnosticRequest,
    overlay: &Overlay,
) -> Result<AnnotatedFrame, FocusError> {
    request.validate()?;

    let frame = decode_frame(bytes)?;
    debug!(
        source_width = frame.width(),
        source_height = frame.height(),
        "decoded frame"
    );

    // crop so the result fits the viewer without scaling
    let (cropped, center) = crop_centered(&frame, (request.width, request.height))?;
    let estimate = estimate_focus(&cropped, request.r1, request.r2)?;
    debug!(score = estimate.score, "focus variance");

    let annotated = overlay.annotate(&cropped, center, request.r1, request.r2, estimate.score);
    let png = encode_png(&annotated)?;

    Ok(AnnotatedFrame {
        png,
        report: FocusReport {
            score: estimate.score,
            width: request.width,
            height: request.height,
            r1: request.r1,
            r2: request.r2,
            captured_at: Utc::now(),
        },
    })
}

/// Produces annotated focus images from an [`ImageSource`].
///
/// Every call performs a full fetch-decode-compute-encode cycle; nothing is
/// cached between calls.
#[derive(Debug, Clone)]
pub struct FramePipeline<S> {
    source: S,
    overlay: Overlay,
}

impl<S: ImageSource> FramePipeline<S> {
    pub fn new(source: S, overlay: Overlay) -> Self {
        Self { source, overlay }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    /// Fetch a frame and turn it into an annotated diagnostic image.
    pub async fn produce_diagnostic_image(
        &self,
        request: &DiagnosticRequest,
    ) -> Result<AnnotatedFrame, FocusError> {
        debug!(
            width = request.width,
            height = request.height,
            r1 = request.r1,
            r2 = request.r2,
            "diagnostic image requested"
        );
        request.validate()?;

        let bytes = self.source.fetch().await?;
        render_diagnostic(&bytes, request, &self.overlay)
    }
}
