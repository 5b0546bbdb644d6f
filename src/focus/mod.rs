//! Focus estimation restricted to an annular region of interest.

mod estimator;
pub mod laplacian;
mod mask;

pub use estimator::{estimate_focus, validate_radii, FocusEstimate};
pub use laplacian::{EdgeField, LAPLACIAN_KERNEL};
pub use mask::AnnulusMask;
