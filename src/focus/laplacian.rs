//! Grayscale conversion and the 3x3 Laplacian edge response.

use image::{GrayImage, ImageBuffer, Luma, RgbImage};

/// Floating point, single channel field produced by the Laplacian.
pub type EdgeField = ImageBuffer<Luma<f32>, Vec<f32>>;

/// Aperture-3 Laplacian: the sum of the two 3x3 Sobel second derivatives.
pub const LAPLACIAN_KERNEL: [[f32; 3]; 3] = [[2.0, 0.0, 2.0], [0.0, -8.0, 0.0], [2.0, 0.0, 2.0]];

/// Convert to grayscale using BT.601 luma weights (0.299 R + 0.587 G + 0.114 B).
///
/// `DynamicImage::to_luma8` uses Rec. 709 weights instead, which shifts the
/// score for saturated colors.
pub fn to_grayscale(image: &RgbImage) -> GrayImage {
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        let [r, g, b] = image.get_pixel(x, y).0;
        let luma = 0.299 * f32::from(r) + 0.587 * f32::from(g) + 0.114 * f32::from(b);
        Luma([luma.round().clamp(0.0, 255.0) as u8])
    })
}

/// Mirror an out-of-range index back into `0..len` without repeating the edge
/// sample (`-1 -> 1`, `len -> len - 2`).
fn reflect_101(index: i64, len: u32) -> u32 {
    let len = i64::from(len);
    if len == 1 {
        return 0;
    }
    let mut i = index;
    while i < 0 || i >= len {
        if i < 0 {
            i = -i;
        }
        if i >= len {
            i = 2 * (len - 1) - i;
        }
    }
    i as u32
}

/// Apply [`LAPLACIAN_KERNEL`] to a grayscale image.
pub fn laplacian(gray: &GrayImage) -> EdgeField {
    let (width, height) = gray.dimensions();
    EdgeField::from_fn(width, height, |x, y| {
        let mut acc = 0.0f32;
        for (ky, row) in LAPLACIAN_KERNEL.iter().enumerate() {
            for (kx, weight) in row.iter().enumerate() {
                if *weight == 0.0 {
                    continue;
                }
                let sx = reflect_101(i64::from(x) + kx as i64 - 1, width);
                let sy = reflect_101(i64::from(y) + ky as i64 - 1, height);
                acc += weight * f32::from(gray.get_pixel(sx, sy).0[0]);
            }
        }
        Luma([acc])
    })
}
