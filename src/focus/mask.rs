//! Ring-shaped mask restricting the focus measurement.

use image::{GrayImage, Luma};

/// Mask value for pixels that contribute to the score.
pub const RING: u8 = 0;
/// Mask value for ignored pixels.
pub const EXCLUDED: u8 = 1;

/// Annulus over the focus crop, stored as a `GrayImage` holding [`RING`] or
/// [`EXCLUDED`] per pixel.
///
/// The ring is described the way a thick circle stroke is drawn: a center
/// radius of `(r1 + r2) / 2` and a stroke width of `r2 - r1`.
#[derive(Debug, Clone)]
pub struct AnnulusMask {
    mask: GrayImage,
    center: (u32, u32),
    radius: u32,
    thickness: u32,
}

impl AnnulusMask {
    /// Build a `width` x `height` mask with the ring between `r1` and `r2`
    /// around `center`. Callers guarantee `r1 < r2`.
    pub fn new(width: u32, height: u32, center: (u32, u32), r1: u32, r2: u32) -> Self {
        let radius = (r1 + r2) / 2;
        let thickness = r2 - r1;
        let half = f64::from(thickness) / 2.0;
        let (cx, cy) = (f64::from(center.0), f64::from(center.1));

        let mask = GrayImage::from_fn(width, height, |x, y| {
            let dx = f64::from(x) - cx;
            let dy = f64::from(y) - cy;
            let distance = (dx * dx + dy * dy).sqrt();
            if (distance - f64::from(radius)).abs() <= half {
                Luma([RING])
            } else {
                Luma([EXCLUDED])
            }
        });

        Self {
            mask,
            center,
            radius,
            thickness,
        }
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        self.mask.get_pixel(x, y).0[0] == RING
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.mask.dimensions()
    }

    pub fn center(&self) -> (u32, u32) {
        self.center
    }

    /// Center-line radius of the ring stroke.
    pub fn radius(&self) -> u32 {
        self.radius
    }

    /// Stroke width of the ring.
    pub fn thickness(&self) -> u32 {
        self.thickness
    }

    /// Number of pixels inside the ring.
    pub fn ring_pixel_count(&self) -> usize {
        self.mask.pixels().filter(|p| p.0[0] == RING).count()
    }

    pub fn as_image(&self) -> &GrayImage {
        &self.mask
    }
}
