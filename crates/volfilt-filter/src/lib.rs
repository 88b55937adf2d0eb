#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// border index resolution module.
pub mod border;

/// volume filtering module.
pub mod filter;

/// volume padding and cropping module.
pub mod padding;

/// module containing parallization utilities.
pub mod parallel;
