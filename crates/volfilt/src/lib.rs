#![doc = env!("CARGO_PKG_DESCRIPTION")]

#[doc(inline)]
pub use volfilt_volume as volume;

#[doc(inline)]
pub use volfilt_filter as filter;

#[doc(inline)]
pub use volfilt_io as io;
