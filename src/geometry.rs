//! Centered cropping.
//!
//! All pixel coordinates are computed with integer floor division, so the
//! center of an image with an odd dimension sits on the pixel left of (or
//! above) the true midpoint. The same rule places the focus mask and the
//! overlay circles.

use image::{imageops, ImageBuffer, Pixel};

use crate::error::FocusError;

/// An axis-aligned rectangle inside a source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    /// Compute the region of `size` centered on a `source_width` x `source_height` image.
    pub fn centered(
        source_width: u32,
        source_height: u32,
        size: (u32, u32),
    ) -> Result<Self, FocusError> {
        let (width, height) = size;
        if width == 0 || height == 0 {
            return Err(FocusError::invalid_parameter(format!(
                "crop size must be positive, got {}x{}",
                width, height
            )));
        }

        let out_of_bounds = || FocusError::Geometry {
            width,
            height,
            source_width,
            source_height,
        };

        let left = i64::from(source_width / 2) - i64::from(width / 2);
        let top = i64::from(source_height / 2) - i64::from(height / 2);
        if left < 0 || top < 0 {
            return Err(out_of_bounds());
        }
        if left + i64::from(width) > i64::from(source_width)
            || top + i64::from(height) > i64::from(source_height)
        {
            return Err(out_of_bounds());
        }

        Ok(Self {
            x: left as u32,
            y: top as u32,
            width,
            height,
        })
    }

    /// Exclusive bottom-right corner.
    pub fn bottom_right(&self) -> (u32, u32) {
        (self.x + self.width, self.y + self.height)
    }

    /// Center of the region in its own coordinate frame.
    pub fn local_center(&self) -> (u32, u32) {
        (self.width / 2, self.height / 2)
    }
}

/// Crop `image` to `size` around its center.
///
/// Returns the cropped copy together with the center point expressed in the
/// cropped image's coordinates, which is where every later drawing step is
/// anchored.
pub fn crop_centered<P>(
    image: &ImageBuffer<P, Vec<P::Subpixel>>,
    size: (u32, u32),
) -> Result<(ImageBuffer<P, Vec<P::Subpixel>>, (u32, u32)), FocusError>
where
    P: Pixel + 'static,
{
    let (source_width, source_height) = image.dimensions();
    let region = Region::centered(source_width, source_height, size)?;
    let cropped = imageops::crop_imm(image, region.x, region.y, region.width, region.height)
        .to_image();
    Ok((cropped, region.local_center()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_centered_region_even() {
        let region = Region::centered(640, 480, (200, 200)).unwrap();
        assert_eq!(region, Region { x: 220, y: 140, width: 200, height: 200 });
        assert_eq!(region.bottom_right(), (420, 340));
        assert_eq!(region.local_center(), (100, 100));
    }

    #[test]
    fn test_centered_region_offset_within_half_pixel() {
        for &(sw, sh) in &[(640u32, 480u32), (641, 481), (33, 17)] {
            for &(w, h) in &[(10u32, 10u32), (11, 7), (32, 16), (1, 1)] {
                let region = Region::centered(sw, sh, (w, h)).unwrap();
                assert_eq!((region.width, region.height), (w, h));
                let region_cx = region.x as f64 + w as f64 / 2.0;
                let region_cy = region.y as f64 + h as f64 / 2.0;
                assert!((region_cx - sw as f64 / 2.0).abs() <= 0.5);
                assert!((region_cy - sh as f64 / 2.0).abs() <= 0.5);
            }
        }
    }

    #[test]
    fn test_crop_copies_center_pixels() {
        let image = RgbImage::from_fn(64, 48, |x, y| Rgb([x as u8, y as u8, 0]));
        let (cropped, center) = crop_centered(&image, (20, 10)).unwrap();
        assert_eq!(cropped.dimensions(), (20, 10));
        assert_eq!(center, (10, 5));
        // top-left of the crop is (32 - 10, 24 - 5)
        assert_eq!(cropped.get_pixel(0, 0), &Rgb([22, 19, 0]));
        assert_eq!(cropped.get_pixel(19, 9), &Rgb([41, 28, 0]));
    }

    #[test]
    fn test_crop_full_size() {
        let image = RgbImage::new(31, 17);
        let (cropped, center) = crop_centered(&image, (31, 17)).unwrap();
        assert_eq!(cropped.dimensions(), (31, 17));
        assert_eq!(center, (15, 8));
    }

    #[test]
    fn test_crop_larger_than_source_fails() {
        let image = RgbImage::new(640, 480);
        let result = crop_centered(&image, (700, 700));
        assert!(matches!(
            result,
            Err(FocusError::Geometry {
                width: 700,
                height: 700,
                source_width: 640,
                source_height: 480,
            })
        ));
        assert!(matches!(
            crop_centered(&image, (600, 481)),
            Err(FocusError::Geometry { .. })
        ));
    }

    #[test]
    fn test_crop_zero_size_fails() {
        let image = RgbImage::new(10, 10);
        assert!(matches!(
            crop_centered(&image, (0, 5)),
            Err(FocusError::InvalidParameter(_))
        ));
    }
}
