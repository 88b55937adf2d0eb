/// Coarse classification of a [`VolumeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// An argument is malformed: empty input, bad kernel, bad axis, bad pad specification.
    InvalidArgument,
    /// Two shapes that must agree do not.
    DimensionMismatch,
    /// An explicit index lies outside the valid range.
    OutOfRange,
}

/// An error type for volume construction and filtering.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum VolumeError {
    /// The volume has no samples.
    #[error("Volume is empty")]
    EmptyVolume,

    /// The kernel is empty or has no center tap.
    #[error("Invalid kernel length {0}, expected an odd length >= 1")]
    InvalidKernelLength(usize),

    /// The axis selector is not 0 (row), 1 (column) or 2 (depth).
    #[error("Invalid axis {0}, expected 0 (row), 1 (column) or 2 (depth)")]
    InvalidAxis(usize),

    /// The pad specification has too few entries.
    #[error("Padding needs at least 2 values (rows, cols), got {0}")]
    InvalidPadding(usize),

    /// The padding is larger than the padded volume it should be removed from.
    #[error("Padding does not fit in volume of size {0}")]
    PaddingTooLarge(crate::VolumeSize),

    /// The border mode code is not one of the known codes.
    #[error("Invalid border mode code {0}, expected 0..=3")]
    InvalidBorderCode(i32),

    /// The standard deviation of a gaussian is negative or not finite.
    #[error("Invalid sigma {0}, expected a finite value >= 0")]
    InvalidSigma(f64),

    /// The data length does not match the volume size.
    #[error("Data length ({0}) does not match the volume size ({1})")]
    InvalidDataLength(usize, usize),

    /// A slice of nested input has a different shape than the first one.
    #[error("Slice {0} has shape {1}x{2}, expected {3}x{4}")]
    RaggedSlice(usize, usize, usize, usize, usize),

    /// The number of samples of the volume size does not fit in `usize`.
    #[error("Number of samples of {0} overflows")]
    SizeOverflow(crate::VolumeSize),

    /// The number of per-slice records does not match the volume depth.
    #[error("Volume depth ({0}) does not match the number of slice records ({1})")]
    SliceCountMismatch(usize, usize),

    /// The requested slice index is not within `[0, depth)`.
    #[error("Slice index {0} is out of range for depth {1}")]
    SliceIndexOutOfRange(usize, usize),

    /// A sample could not be represented in the target type.
    #[error("Failed to cast sample to {0}")]
    CastError(String),
}

impl VolumeError {
    /// Returns the kind of failure this error reports.
    pub fn kind(&self) -> ErrorKind {
        match self {
            VolumeError::EmptyVolume
            | VolumeError::InvalidKernelLength(_)
            | VolumeError::InvalidAxis(_)
            | VolumeError::InvalidPadding(_)
            | VolumeError::PaddingTooLarge(_)
            | VolumeError::InvalidBorderCode(_)
            | VolumeError::InvalidSigma(_)
            | VolumeError::SizeOverflow(_)
            | VolumeError::CastError(_) => ErrorKind::InvalidArgument,
            VolumeError::InvalidDataLength(..)
            | VolumeError::RaggedSlice(..)
            | VolumeError::SliceCountMismatch(..) => ErrorKind::DimensionMismatch,
            VolumeError::SliceIndexOutOfRange(..) => ErrorKind::OutOfRange,
        }
    }
}
