#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for the filtering operations.
pub mod error;

/// image filtering module.
pub mod filter;

/// module containing parallization utilities.
pub mod parallel;

pub use crate::error::FilterError;
