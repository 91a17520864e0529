use gaussblur_image::{ImageError, ImageSize};

use crate::parallel::ParallelError;

/// An error type for the filter operations.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum FilterError {
    /// The kernel size is zero or even, so the kernel has no center.
    #[error("Invalid kernel size ({0}), must be a positive odd integer")]
    InvalidKernelSize(usize),

    /// The standard deviation is zero, negative or not finite.
    #[error("Invalid sigma ({0}), must be a positive finite number")]
    InvalidSigma(f64),

    /// The destination image does not have the size of the source image.
    #[error("Destination size ({1}) does not match the source size ({0})")]
    DimensionMismatch(ImageSize, ImageSize),

    /// Error from the image module.
    #[error(transparent)]
    Image(#[from] ImageError),

    /// Error while scheduling the work.
    #[error(transparent)]
    Parallel(#[from] ParallelError),
}
