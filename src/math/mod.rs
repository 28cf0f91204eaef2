//! Numerical utilities: per-axis line filters, B-spline shifting, Gaussian smoothing.

pub mod axis;
pub mod smooth;
pub mod spline;

pub use axis::*;
pub use smooth::*;
pub use spline::*;
