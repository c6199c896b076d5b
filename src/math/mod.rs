//! Miscellaneous math functions for general use

/// Free functions used in more than one module of the crate.
pub mod ancillary;
pub use ancillary::sum;

/// Free functions for normalizing, rounding and evaluating trigonometric
/// functions of angles.
pub mod angular;

/// Polynomial evaluation and Fourier series summation
pub mod series;
pub use series::polyval;
pub use series::sin_cos_series;
