//! Minimal anti-aliased stroke font for score labels.
//!
//! Glyphs are polylines on a 6x10 unit grid (y grows downwards, row 10 is the
//! baseline). Only the characters a score label needs are defined; anything
//! else advances the pen without drawing.

use image::{Rgb, RgbImage};
use imageproc::drawing::draw_antialiased_line_segment_mut;
use imageproc::pixelops::interpolate;

/// Height of a capital/digit glyph in grid units.
const GRID_HEIGHT: f32 = 10.0;

type Polyline = &'static [(f32, f32)];

struct Glyph {
    strokes: &'static [Polyline],
    advance: f32,
}

const DIGIT_ADVANCE: f32 = 8.0;
const PUNCT_ADVANCE: f32 = 4.0;

fn glyph(c: char) -> Glyph {
    let strokes: &'static [Polyline] = match c {
        '0' => &[&[
            (1.0, 0.0),
            (5.0, 0.0),
            (6.0, 1.0),
            (6.0, 9.0),
            (5.0, 10.0),
            (1.0, 10.0),
            (0.0, 9.0),
            (0.0, 1.0),
            (1.0, 0.0),
        ]],
        '1' => &[&[(1.0, 2.0), (3.0, 0.0), (3.0, 10.0)], &[(1.0, 10.0), (5.0, 10.0)]],
        '2' => &[&[
            (0.0, 1.0),
            (1.0, 0.0),
            (5.0, 0.0),
            (6.0, 1.0),
            (6.0, 4.0),
            (0.0, 10.0),
            (6.0, 10.0),
        ]],
        '3' => &[&[
            (0.0, 0.0),
            (6.0, 0.0),
            (3.0, 4.0),
            (5.0, 4.0),
            (6.0, 5.0),
            (6.0, 9.0),
            (5.0, 10.0),
            (1.0, 10.0),
            (0.0, 9.0),
        ]],
        '4' => &[&[(5.0, 10.0), (5.0, 0.0), (0.0, 7.0), (6.0, 7.0)]],
        '5' => &[&[
            (6.0, 0.0),
            (0.0, 0.0),
            (0.0, 4.0),
            (5.0, 4.0),
            (6.0, 5.0),
            (6.0, 9.0),
            (5.0, 10.0),
            (0.0, 10.0),
        ]],
        '6' => &[&[
            (5.0, 0.0),
            (2.0, 0.0),
            (0.0, 3.0),
            (0.0, 9.0),
            (1.0, 10.0),
            (5.0, 10.0),
            (6.0, 9.0),
            (6.0, 6.0),
            (5.0, 5.0),
            (0.0, 5.0),
        ]],
        '7' => &[&[(0.0, 0.0), (6.0, 0.0), (2.0, 10.0)]],
        '8' => &[
            &[
                (1.0, 0.0),
                (5.0, 0.0),
                (6.0, 1.0),
                (6.0, 4.0),
                (5.0, 5.0),
                (1.0, 5.0),
                (0.0, 6.0),
                (0.0, 9.0),
                (1.0, 10.0),
                (5.0, 10.0),
                (6.0, 9.0),
                (6.0, 6.0),
                (5.0, 5.0),
            ],
            &[(1.0, 5.0), (0.0, 4.0), (0.0, 1.0), (1.0, 0.0)],
        ],
        '9' => &[&[
            (6.0, 5.0),
            (1.0, 5.0),
            (0.0, 4.0),
            (0.0, 1.0),
            (1.0, 0.0),
            (5.0, 0.0),
            (6.0, 1.0),
            (6.0, 7.0),
            (4.0, 10.0),
            (1.0, 10.0),
        ]],
        'v' => &[&[(0.0, 4.0), (3.0, 10.0), (6.0, 4.0)]],
        'a' => &[
            &[(0.0, 4.0), (5.0, 4.0), (6.0, 5.0), (6.0, 10.0)],
            &[(6.0, 7.0), (1.0, 7.0), (0.0, 8.0), (0.0, 9.0), (1.0, 10.0), (6.0, 10.0)],
        ],
        'r' => &[&[(0.0, 4.0), (0.0, 10.0)], &[(0.0, 6.0), (2.0, 4.0), (5.0, 4.0)]],
        '-' => &[&[(1.0, 6.0), (5.0, 6.0)]],
        ':' => {
            return Glyph {
                strokes: &[&[(1.0, 4.0), (1.0, 5.0)], &[(1.0, 9.0), (1.0, 10.0)]],
                advance: PUNCT_ADVANCE,
            }
        }
        '.' => {
            return Glyph {
                strokes: &[&[(1.0, 9.0), (1.0, 10.0)]],
                advance: PUNCT_ADVANCE,
            }
        }
        ' ' => &[],
        _ => {
            tracing::trace!("no stroke glyph for {:?}", c);
            &[]
        }
    };
    Glyph {
        strokes,
        advance: DIGIT_ADVANCE,
    }
}

/// Draw `text` with its baseline-left corner at `origin`.
///
/// `cap_height` is the pixel height of a digit, `thickness` the stroke width
/// in pixels. Strokes outside the image are clipped.
pub fn draw_stroke_text(
    image: &mut RgbImage,
    text: &str,
    origin: (i32, i32),
    cap_height: f32,
    thickness: u32,
    color: Rgb<u8>,
) {
    let unit = cap_height / GRID_HEIGHT;
    let top = origin.1 as f32 - cap_height;
    let mut pen_x = origin.0 as f32;

    for c in text.chars() {
        let glyph = glyph(c);
        for stroke in glyph.strokes {
            for segment in stroke.windows(2) {
                let start = (pen_x + segment[0].0 * unit, top + segment[0].1 * unit);
                let end = (pen_x + segment[1].0 * unit, top + segment[1].1 * unit);
                draw_thick_segment(image, start, end, thickness, color);
            }
        }
        pen_x += glyph.advance * unit;
    }
}

/// Pixel width of `text` as laid out by [`draw_stroke_text`].
pub fn stroke_text_width(text: &str, cap_height: f32) -> f32 {
    let unit = cap_height / GRID_HEIGHT;
    text.chars().map(|c| glyph(c).advance * unit).sum()
}

fn draw_thick_segment(
    image: &mut RgbImage,
    start: (f32, f32),
    end: (f32, f32),
    thickness: u32,
    color: Rgb<u8>,
) {
    let steep = (end.1 - start.1).abs() > (end.0 - start.0).abs();
    let thickness = thickness.max(1);
    let spread = (thickness - 1) as f32 / 2.0;

    for k in 0..thickness {
        let offset = k as f32 - spread;
        let (ox, oy) = if steep { (offset, 0.0) } else { (0.0, offset) };
        let a = ((start.0 + ox).round() as i32, (start.1 + oy).round() as i32);
        let b = ((end.0 + ox).round() as i32, (end.1 + oy).round() as i32);
        if a == b {
            // Wu's algorithm needs a non-zero run
            if a.0 >= 0 && a.1 >= 0 && (a.0 as u32) < image.width() && (a.1 as u32) < image.height()
            {
                image.put_pixel(a.0 as u32, a.1 as u32, color);
            }
            continue;
        }
        draw_antialiased_line_segment_mut(image, a, b, color, interpolate);
    }
}
