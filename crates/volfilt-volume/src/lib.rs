#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Dense volume representation with a flat sample buffer.
pub mod volume;

/// Error types for the volume module.
pub mod error;

pub use crate::error::{ErrorKind, VolumeError};
pub use crate::volume::{Axis, Volume, VolumeSize};
