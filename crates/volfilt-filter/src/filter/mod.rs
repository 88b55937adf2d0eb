//! Filter operations
//!
//! This module provides the 1D correlation engine and the separable volume filters built on it.

/// Filter kernels
pub mod kernels;

/// 1D correlation along one volume axis
mod correlation;
pub use correlation::*;

/// Filter operations
mod ops;
pub use ops::*;
