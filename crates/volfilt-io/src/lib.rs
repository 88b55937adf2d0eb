#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for I/O operations.
///
/// Defines [`IoError`] variants for file access, header parsing and payload failures.
pub mod error;

/// Raw volume container reading and writing.
///
/// A JSON header next to a little endian `u16` payload.
/// See [`raw::read_raw_series`] and [`raw::write_raw_series`].
pub mod raw;

/// Slice series assembly.
///
/// Stacks per-slice `u16` planes into a volume and estimates the physical spacing.
pub mod series;

/// Internal utility functions for sample byte conversion.
mod conv_utils;

pub use crate::error::IoError;
