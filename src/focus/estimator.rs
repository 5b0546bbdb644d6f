//! Variance-of-Laplacian focus score.

use image::RgbImage;
use tracing::debug;

use super::laplacian::{laplacian, to_grayscale, EdgeField};
use super::mask::AnnulusMask;
use crate::error::FocusError;
use crate::geometry::crop_centered;

/// Result of a focus estimation.
#[derive(Debug, Clone)]
pub struct FocusEstimate {
    /// Variance of the Laplacian inside the ring. Higher is sharper.
    pub score: f64,
    /// Laplacian of the `2 * r2` square the score was computed on.
    pub edges: EdgeField,
    /// Number of pixels that contributed to the score.
    pub samples: usize,
}

/// Check that `r1` and `r2` describe a non-empty ring.
pub fn validate_radii(r1: u32, r2: u32) -> Result<(), FocusError> {
    if r1 == 0 || r2 == 0 {
        return Err(FocusError::invalid_parameter(format!(
            "radii must be positive, got r1={} r2={}",
            r1, r2
        )));
    }
    if r1 >= r2 {
        return Err(FocusError::invalid_parameter(format!(
            "r1 must be smaller than r2, got r1={} r2={}",
            r1, r2
        )));
    }
    Ok(())
}

/// Estimate how sharply `image` is focused within the ring between `r1` and `r2`.
///
/// The image is first cropped to a `2 * r2` square around its center, so only
/// the region that can fall inside the ring goes through the Laplacian. A
/// flat image scores exactly 0.
pub fn estimate_focus(image: &RgbImage, r1: u32, r2: u32) -> Result<FocusEstimate, FocusError> {
    validate_radii(r1, r2)?;

    let side = r2.checked_mul(2).ok_or_else(|| {
        FocusError::invalid_parameter(format!("r2={} is too large", r2))
    })?;
    let (square, center) = crop_centered(image, (side, side))?;

    let gray = to_grayscale(&square);
    let edges = laplacian(&gray);
    let mask = AnnulusMask::new(side, side, center, r1, r2);

    let (score, samples) = masked_variance(&edges, &mask);
    debug!(r1, r2, samples, score, "estimated focus");

    Ok(FocusEstimate {
        score,
        edges,
        samples,
    })
}

/// Population variance of the edge field over the ring pixels.
fn masked_variance(edges: &EdgeField, mask: &AnnulusMask) -> (f64, usize) {
    let values: Vec<f64> = edges
        .enumerate_pixels()
        .filter(|(x, y, _)| mask.contains(*x, *y))
        .map(|(_, _, p)| f64::from(p.0[0]))
        .collect();

    if values.is_empty() {
        return (0.0, 0);
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (variance, values.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{imageops, Rgb};

    fn stripe_frame(with_stripe: bool) -> RgbImage {
        RgbImage::from_fn(640, 480, |x, _| {
            if with_stripe && (315..325).contains(&x) {
                Rgb([255, 255, 255])
            } else {
                Rgb([0, 0, 0])
            }
        })
    }

    #[test]
    fn test_flat_image_scores_zero() {
        let image = RgbImage::from_pixel(300, 300, Rgb([90, 160, 30]));
        for &(r1, r2) in &[(1u32, 2u32), (40, 100), (10, 150)] {
            let estimate = estimate_focus(&image, r1, r2).unwrap();
            assert_eq!(estimate.score, 0.0);
            assert!(estimate.samples > 0);
            assert_eq!(estimate.edges.dimensions(), (2 * r2, 2 * r2));
        }
    }

    #[test]
    fn test_stripe_scenario() {
        let (cropped, _) = crop_centered(&stripe_frame(true), (200, 200)).unwrap();
        let sharp = estimate_focus(&cropped, 40, 100).unwrap();
        assert!(sharp.score > 0.0);

        let (cropped, _) = crop_centered(&stripe_frame(false), (200, 200)).unwrap();
        let flat = estimate_focus(&cropped, 40, 100).unwrap();
        assert_eq!(flat.score, 0.0);
    }

    #[test]
    fn test_blur_lowers_score() {
        // vertical edge 30px right of center, crossing the ring; the margin
        // keeps blur border effects out of the measured square
        let image = RgbImage::from_fn(300, 300, |x, _| {
            if x >= 180 {
                Rgb([230, 230, 230])
            } else {
                Rgb([20, 20, 20])
            }
        });
        let sharp = estimate_focus(&image, 40, 100).unwrap();
        let blurred = imageops::blur(&image, 2.0);
        let soft = estimate_focus(&blurred, 40, 100).unwrap();
        assert!(sharp.score > 0.0);
        assert!(soft.score < sharp.score);
    }

    #[test]
    fn test_edge_outside_ring_is_ignored() {
        // a small dot at the center sits inside the inner radius
        let image = RgbImage::from_fn(200, 200, |x, y| {
            if (98..102).contains(&x) && (98..102).contains(&y) {
                Rgb([255, 255, 255])
            } else {
                Rgb([0, 0, 0])
            }
        });
        let estimate = estimate_focus(&image, 40, 100).unwrap();
        assert_eq!(estimate.score, 0.0);
        assert!(estimate.edges.pixels().any(|p| p.0[0] != 0.0));
    }

    #[test]
    fn test_invalid_radii() {
        let image = RgbImage::new(300, 300);
        for &(r1, r2) in &[(100u32, 100u32), (120, 100), (0, 50), (0, 0)] {
            assert!(matches!(
                estimate_focus(&image, r1, r2),
                Err(FocusError::InvalidParameter(_))
            ));
        }
    }

    #[test]
    fn test_ring_larger_than_image() {
        let image = RgbImage::new(150, 150);
        assert!(matches!(
            estimate_focus(&image, 40, 100),
            Err(FocusError::Geometry { .. })
        ));
    }
}
