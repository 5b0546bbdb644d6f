//! Request boundary for web front ends.
//!
//! Turns a query string such as
//! `image&width=588&height=441&r1=40&r2=100` into a [`DiagnosticRequest`] and
//! the pipeline result into an [`ApiResponse`]. Every path produces a
//! response: errors become a plain-text body with a matching status code.

use tracing::warn;

use crate::error::FocusError;
use crate::pipeline::{AnnotatedFrame, DiagnosticRequest, FramePipeline, DEFAULT_R1, DEFAULT_R2};
use crate::source::ImageSource;

/// Query key that selects the diagnostic image endpoint.
pub const IMAGE_FLAG: &str = "image";

const TEXT_PLAIN: &str = "text/plain";

/// A response ready to be written by an HTTP layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn image(frame: AnnotatedFrame) -> Self {
        Self {
            status: 200,
            content_type: AnnotatedFrame::CONTENT_TYPE,
            body: frame.png,
        }
    }

    pub fn error(error: &FocusError) -> Self {
        Self {
            status: error.status_code(),
            content_type: TEXT_PLAIN,
            body: error.to_string().into_bytes(),
        }
    }

    pub fn not_found() -> Self {
        Self {
            status: 404,
            content_type: TEXT_PLAIN,
            body: b"Unknown request".to_vec(),
        }
    }

    pub fn from_result(result: Result<AnnotatedFrame, FocusError>) -> Self {
        match result {
            Ok(frame) => Self::image(frame),
            Err(e) => {
                warn!(error = %e, "diagnostic image failed");
                Self::error(&e)
            }
        }
    }
}

/// Split a query string into key/value pairs. Keys without `=` get an empty value.
fn query_pairs(query: &str) -> impl Iterator<Item = (&str, &str)> {
    query
        .trim_start_matches('?')
        .split('&')
        .filter(|part| !part.is_empty())
        .map(|part| part.split_once('=').unwrap_or((part, "")))
}

fn parse_u32(key: &str, value: &str) -> Result<u32, FocusError> {
    value.trim().parse::<u32>().map_err(|_| {
        FocusError::invalid_parameter(format!("{} must be a non-negative integer, got {:?}", key, value))
    })
}

/// Build a request from query parameters.
///
/// Returns `Ok(None)` when the `image` flag is absent. `width` and `height`
/// are required; `r1` and `r2` default to 50 and 100.
pub fn parse_image_query(query: &str) -> Result<Option<DiagnosticRequest>, FocusError> {
    let mut is_image = false;
    let mut width = None;
    let mut height = None;
    let mut r1 = DEFAULT_R1;
    let mut r2 = DEFAULT_R2;

    for (key, value) in query_pairs(query) {
        match key {
            IMAGE_FLAG => is_image = true,
            "width" => width = Some(parse_u32(key, value)?),
            "height" => height = Some(parse_u32(key, value)?),
            "r1" => r1 = parse_u32(key, value)?,
            "r2" => r2 = parse_u32(key, value)?,
            // e.g. apikey, handled by the host
            _ => {}
        }
    }

    if !is_image {
        return Ok(None);
    }

    let width = width.ok_or_else(|| FocusError::invalid_parameter("missing width"))?;
    let height = height.ok_or_else(|| FocusError::invalid_parameter("missing height"))?;
    Ok(Some(DiagnosticRequest::new(width, height).with_radii(r1, r2)))
}

/// Answer a GET query. Never fails; errors are rendered as text responses.
pub async fn handle_query<S: ImageSource>(pipeline: &FramePipeline<S>, query: &str) -> ApiResponse {
    match parse_image_query(query) {
        Ok(Some(request)) => {
            ApiResponse::from_result(pipeline.produce_diagnostic_image(&request).await)
        }
        Ok(None) => ApiResponse::not_found(),
        Err(e) => ApiResponse::from_result(Err(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::Overlay;
    use crate::pipeline::encode_png;
    use crate::source::MemorySource;
    use image::RgbImage;

    #[test]
    fn test_parse_full_query() {
        let request = parse_image_query("image&width=588&height=441&apikey=abc&r1=40&r2=100")
            .unwrap()
            .unwrap();
        assert_eq!(request, DiagnosticRequest::new(588, 441).with_radii(40, 100));
    }

    #[test]
    fn test_parse_defaults() {
        let request = parse_image_query("?image=&width=300&height=200").unwrap().unwrap();
        assert_eq!(request.r1, 50);
        assert_eq!(request.r2, 100);
    }

    #[test]
    fn test_parse_without_image_flag() {
        assert_eq!(parse_image_query("width=300&height=200").unwrap(), None);
    }

    #[test]
    fn test_parse_missing_height() {
        assert!(matches!(
            parse_image_query("image&width=300"),
            Err(FocusError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_parse_bad_number() {
        assert!(matches!(
            parse_image_query("image&width=300&height=200&r1=-4"),
            Err(FocusError::InvalidParameter(_))
        ));
    }

    #[tokio::test]
    async fn test_handle_query_success() {
        let png = encode_png(&RgbImage::new(640, 480)).unwrap();
        let pipeline = FramePipeline::new(MemorySource::new(png), Overlay::default());
        let response = handle_query(&pipeline, "image&width=300&height=240").await;
        assert_eq!(response.status, 200);
        assert_eq!(response.content_type, "image/png");
        assert!(response.body.starts_with(b"\x89PNG\r\n\x1a\n"));
    }

    #[tokio::test]
    async fn test_handle_query_geometry_error() {
        let png = encode_png(&RgbImage::new(640, 480)).unwrap();
        let pipeline = FramePipeline::new(MemorySource::new(png), Overlay::default());
        let response = handle_query(&pipeline, "image&width=700&height=700").await;
        assert_eq!(response.status, 422);
        assert_eq!(response.content_type, "text/plain");
        assert_eq!(
            String::from_utf8(response.body).unwrap(),
            "Crop region 700x700 does not fit into 640x480 image"
        );
    }

    #[tokio::test]
    async fn test_handle_query_decode_error() {
        let pipeline = FramePipeline::new(MemorySource::new(b"<html>".to_vec()), Overlay::default());
        let response = handle_query(&pipeline, "image&width=300&height=240").await;
        assert_eq!(response.status, 502);
        assert_eq!(response.content_type, "text/plain");
    }

    #[tokio::test]
    async fn test_handle_query_not_image() {
        let pipeline = FramePipeline::new(MemorySource::new(Vec::new()), Overlay::default());
        let response = handle_query(&pipeline, "status").await;
        assert_eq!(response, ApiResponse::not_found());
    }
}
