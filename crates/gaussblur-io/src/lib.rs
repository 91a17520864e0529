#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for I/O operations.
pub mod error;

/// High-level image reading functions.
///
/// See [`functional::read_image_any_rgb8`] for automatic format detection.
pub mod functional;

/// JPEG image encoding.
pub mod jpeg;

/// PNG image encoding.
pub mod png;

pub use crate::error::IoError;
