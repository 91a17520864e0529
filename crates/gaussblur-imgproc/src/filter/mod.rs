//! Filter operations
//!
//! This module provides the gaussian kernel builder and the convolution engine.

/// Filter kernels
pub mod kernels;
pub use kernels::Kernel;

/// Direct 2D convolution
mod convolution;
pub use convolution::*;

/// Separable filter operations
mod separable_filter;
pub use separable_filter::*;

/// Gaussian blur entry points
mod ops;
pub use ops::*;
