//! Alignment guides drawn on top of the inspection frame.
//!
//! Two concentric circles mark the inner and outer radius of the focus ring
//! and a `var:<score>` label reports the measured sharpness.

mod stroke_font;

use ab_glyph::{Font, FontArc, PxScale, ScaleFont};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_circle_mut, draw_text_mut};
use std::fs;
use std::path::Path;
use thiserror::Error;

pub use stroke_font::{draw_stroke_text, stroke_text_width};

/// Default guide color.
pub const ACCENT_GREEN: Rgb<u8> = Rgb([0, 255, 0]);

/// Font loading errors.
#[derive(Error, Debug)]
pub enum FontError {
    #[error("Failed to read font file: {0}")]
    Read(#[from] std::io::Error),
    #[error("Invalid font data: {0}")]
    Invalid(String),
}

/// Fixed drawing parameters for the overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayStyle {
    /// Color of the circles and the label.
    pub accent: Rgb<u8>,
    /// Baseline-left anchor of the label.
    pub label_origin: (i32, i32),
    /// Pixel height of the label digits.
    pub label_cap_height: f32,
    /// Stroke width of the label.
    pub label_thickness: u32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            accent: ACCENT_GREEN,
            label_origin: (0, 30),
            label_cap_height: 22.0,
            label_thickness: 2,
        }
    }
}

/// Font used for the score label.
#[derive(Clone, Default)]
pub enum LabelFont {
    /// Built-in stroke glyphs, always available.
    #[default]
    Stroke,
    /// A TrueType/OpenType font loaded at runtime.
    Outline(FontArc),
}

impl std::fmt::Debug for LabelFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LabelFont::Stroke => f.write_str("LabelFont::Stroke"),
            LabelFont::Outline(_) => f.write_str("LabelFont::Outline"),
        }
    }
}

impl LabelFont {
    /// Load a font file from disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, FontError> {
        let data = fs::read(path.as_ref())?;
        Self::from_bytes(data)
    }

    /// Parse font data.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self, FontError> {
        FontArc::try_from_vec(data)
            .map(LabelFont::Outline)
            .map_err(|e| FontError::Invalid(e.to_string()))
    }
}

/// Format the focus score the way it appears on the frame.
pub fn score_label(score: f64) -> String {
    format!("var:{:.0}", score)
}

/// Draws the alignment guides.
#[derive(Debug, Clone, Default)]
pub struct Overlay {
    style: OverlayStyle,
    font: LabelFont,
}

impl Overlay {
    pub fn new(style: OverlayStyle, font: LabelFont) -> Self {
        Self { style, font }
    }

    pub fn style(&self) -> &OverlayStyle {
        &self.style
    }

    /// Return a copy of `frame` with the guide circles around `center` and the
    /// score label drawn on it.
    pub fn annotate(
        &self,
        frame: &RgbImage,
        center: (u32, u32),
        r1: u32,
        r2: u32,
        score: f64,
    ) -> RgbImage {
        let mut canvas = frame.clone();
        self.draw_guides(&mut canvas, center, r1, r2);
        self.draw_label(&mut canvas, &score_label(score));
        canvas
    }

    /// Draw the inner and outer circle, one pixel wide.
    pub fn draw_guides(&self, canvas: &mut RgbImage, center: (u32, u32), r1: u32, r2: u32) {
        let center = (center.0 as i32, center.1 as i32);
        for radius in [r1, r2] {
            draw_hollow_circle_mut(canvas, center, radius as i32, self.style.accent);
        }
    }

    pub fn draw_label(&self, canvas: &mut RgbImage, text: &str) {
        let (x, baseline) = self.style.label_origin;
        match &self.font {
            LabelFont::Stroke => draw_stroke_text(
                canvas,
                text,
                (x, baseline),
                self.style.label_cap_height,
                self.style.label_thickness,
                self.style.accent,
            ),
            LabelFont::Outline(font) => {
                // cap height is roughly 70% of the em size for common fonts
                let scale = PxScale::from(self.style.label_cap_height / 0.7);
                let ascent = font.as_scaled(scale).ascent();
                let top = baseline - ascent.round() as i32;
                draw_text_mut(canvas, self.style.accent, x, top, scale, font, text);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_label_rounds() {
        assert_eq!(score_label(0.0), "var:0");
        assert_eq!(score_label(1234.4), "var:1234");
        assert_eq!(score_label(99.7), "var:100");
    }

    #[test]
    fn test_circles_drawn_at_radii() {
        let frame = RgbImage::new(300, 240);
        let overlay = Overlay::default();
        let annotated = overlay.annotate(&frame, (150, 120), 40, 100, 12.0);

        assert_eq!(annotated.get_pixel(190, 120), &ACCENT_GREEN);
        assert_eq!(annotated.get_pixel(110, 120), &ACCENT_GREEN);
        assert_eq!(annotated.get_pixel(250, 120), &ACCENT_GREEN);
        assert_eq!(annotated.get_pixel(150, 220), &ACCENT_GREEN);
        assert_eq!(annotated.get_pixel(150, 120), &Rgb([0, 0, 0]));
        // the source frame is left untouched
        assert!(frame.pixels().all(|p| p.0 == [0, 0, 0]));
    }

    #[test]
    fn test_label_drawn_in_top_left() {
        let frame = RgbImage::new(300, 240);
        let overlay = Overlay::default();
        let mut canvas = frame.clone();
        overlay.draw_label(&mut canvas, "var:42");
        let inked: Vec<(u32, u32)> = canvas
            .enumerate_pixels()
            .filter(|(_, _, p)| p.0 != [0, 0, 0])
            .map(|(x, y, _)| (x, y))
            .collect();
        assert!(!inked.is_empty());
        assert!(inked.iter().all(|&(x, y)| x < 120 && y < 40));
    }

    #[test]
    fn test_invalid_font_data() {
        let result = LabelFont::from_bytes(b"not a font".to_vec());
        assert!(matches!(result, Err(FontError::Invalid(_))));
    }

    #[test]
    fn test_missing_font_file() {
        let result = LabelFont::from_file("/nonexistent/toolfocus/font.ttf");
        assert!(matches!(result, Err(FontError::Read(_))));
    }
}
