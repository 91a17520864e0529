#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// image representation for computer vision purposes.
pub mod image;

/// Error types for the image module.
pub mod error;

/// Per-element conversions used by the filters.
pub mod pixel;

pub use crate::error::ImageError;
pub use crate::image::{Image, ImageSize, Rgb8, Rgba8};
pub use crate::pixel::{PixelValue, TRUNCATION_EPSILON};
