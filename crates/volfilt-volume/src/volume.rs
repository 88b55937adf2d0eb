use crate::error::VolumeError;

/// Volume size in samples.
///
/// A struct to represent the extents of a volume along depth, rows and columns.
///
/// # Examples
///
/// ```
/// use volfilt_volume::VolumeSize;
///
/// let size = VolumeSize {
///   depth: 4,
///   height: 20,
///   width: 10,
/// };
///
/// assert_eq!(size.num_samples(), 800);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VolumeSize {
    /// Number of slices.
    pub depth: usize,
    /// Number of rows in each slice.
    pub height: usize,
    /// Number of columns in each row.
    pub width: usize,
}

impl VolumeSize {
    /// Total number of samples, `depth * height * width`.
    pub fn num_samples(&self) -> usize {
        self.depth * self.height * self.width
    }

    /// Total number of samples, or `None` if it does not fit in `usize`.
    pub fn checked_num_samples(&self) -> Option<usize> {
        self.depth
            .checked_mul(self.height)
            .and_then(|n| n.checked_mul(self.width))
    }

    /// Number of samples in one slice, `height * width`.
    pub fn slice_len(&self) -> usize {
        self.height * self.width
    }

    /// True when any of the extents is zero.
    pub fn is_empty(&self) -> bool {
        self.depth == 0 || self.height == 0 || self.width == 0
    }
}

impl std::fmt::Display for VolumeSize {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "VolumeSize {{ depth: {}, height: {}, width: {} }}",
            self.depth, self.height, self.width
        )
    }
}

impl From<[usize; 3]> for VolumeSize {
    fn from(size: [usize; 3]) -> Self {
        VolumeSize {
            depth: size[0],
            height: size[1],
            width: size[2],
        }
    }
}

impl From<VolumeSize> for [usize; 3] {
    fn from(size: VolumeSize) -> Self {
        [size.depth, size.height, size.width]
    }
}

/// One of the three axes of a volume.
///
/// The integer codes follow the filtering convention: `0` walks along rows
/// (changes `y`), `1` along columns (changes `x`) and `2` across slices
/// (changes `z`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    /// Axis `0`, the row index within a slice.
    Row,
    /// Axis `1`, the column index within a row.
    Col,
    /// Axis `2`, the slice index.
    Depth,
}

impl Axis {
    /// All axes in ascending code order.
    pub const ALL: [Axis; 3] = [Axis::Row, Axis::Col, Axis::Depth];

    /// The integer code of the axis.
    pub fn index(&self) -> usize {
        match self {
            Axis::Row => 0,
            Axis::Col => 1,
            Axis::Depth => 2,
        }
    }

    /// Extent of `size` along this axis.
    pub fn extent(&self, size: VolumeSize) -> usize {
        match self {
            Axis::Row => size.height,
            Axis::Col => size.width,
            Axis::Depth => size.depth,
        }
    }

    /// Distance in the flat buffer between two neighbours along this axis.
    pub fn stride(&self, size: VolumeSize) -> usize {
        match self {
            Axis::Row => size.width,
            Axis::Col => 1,
            Axis::Depth => size.height * size.width,
        }
    }
}

impl TryFrom<usize> for Axis {
    type Error = VolumeError;

    fn try_from(axis: usize) -> Result<Self, Self::Error> {
        match axis {
            0 => Ok(Axis::Row),
            1 => Ok(Axis::Col),
            2 => Ok(Axis::Depth),
            _ => Err(VolumeError::InvalidAxis(axis)),
        }
    }
}

/// A dense rectangular 3D array of samples.
///
/// The samples are stored in a single flat buffer, slice after slice, each
/// slice row after row. The sample at `(z, y, x)` lives at
/// `(z * height + y) * width + x`.
#[derive(Clone, Debug, PartialEq)]
pub struct Volume<T> {
    data: Vec<T>,
    size: VolumeSize,
}

impl<T> Volume<T> {
    /// Create a new volume from sample data.
    ///
    /// # Arguments
    ///
    /// * `size` - The size of the volume in samples.
    /// * `data` - The samples in depth, row, column order.
    ///
    /// # Errors
    ///
    /// * [`VolumeError::SizeOverflow`] if the number of samples does not fit in `usize`.
    /// * [`VolumeError::InvalidDataLength`] if the length of the data does not match
    ///   the volume size.
    ///
    /// # Examples
    ///
    /// ```
    /// use volfilt_volume::{Volume, VolumeSize};
    ///
    /// let volume = Volume::new(
    ///     VolumeSize { depth: 2, height: 3, width: 4 },
    ///     vec![0u16; 2 * 3 * 4],
    /// ).unwrap();
    ///
    /// assert_eq!(volume.depth(), 2);
    /// assert_eq!(volume.height(), 3);
    /// assert_eq!(volume.width(), 4);
    /// ```
    pub fn new(size: VolumeSize, data: Vec<T>) -> Result<Self, VolumeError> {
        let num_samples = size
            .checked_num_samples()
            .ok_or(VolumeError::SizeOverflow(size))?;
        if data.len() != num_samples {
            return Err(VolumeError::InvalidDataLength(data.len(), num_samples));
        }
        Ok(Self { data, size })
    }

    /// Create a new volume filled with a single value.
    pub fn from_size_val(size: VolumeSize, val: T) -> Self
    where
        T: Clone,
    {
        Self {
            data: vec![val; size.num_samples()],
            size,
        }
    }

    /// Create a volume from nested `[depth][row][column]` vectors.
    ///
    /// # Errors
    ///
    /// Returns [`VolumeError::RaggedSlice`] if any slice has a different row
    /// count, or any row a different length, than the first slice.
    ///
    /// # Examples
    ///
    /// ```
    /// use volfilt_volume::Volume;
    ///
    /// let volume = Volume::from_nested(vec![vec![vec![1.0, 2.0], vec![3.0, 4.0]]]).unwrap();
    /// assert_eq!(volume.as_slice(), &[1.0, 2.0, 3.0, 4.0]);
    ///
    /// let ragged = Volume::from_nested(vec![vec![vec![1.0, 2.0], vec![3.0]]]);
    /// assert!(ragged.is_err());
    /// ```
    pub fn from_nested(nested: Vec<Vec<Vec<T>>>) -> Result<Self, VolumeError> {
        let depth = nested.len();
        let height = nested.first().map_or(0, |s| s.len());
        let width = nested
            .first()
            .and_then(|s| s.first())
            .map_or(0, |r| r.len());

        let mut data = Vec::with_capacity(depth * height * width);
        for (z, slice) in nested.into_iter().enumerate() {
            let rows = slice.len();
            if rows != height {
                let cols = slice.first().map_or(0, |r| r.len());
                return Err(VolumeError::RaggedSlice(z, rows, cols, height, width));
            }
            for row in slice {
                if row.len() != width {
                    return Err(VolumeError::RaggedSlice(z, rows, row.len(), height, width));
                }
                data.extend(row);
            }
        }

        Self::new(
            VolumeSize {
                depth,
                height,
                width,
            },
            data,
        )
    }

    /// Get the size of the volume in samples.
    pub fn size(&self) -> VolumeSize {
        self.size
    }

    /// Get the number of slices.
    pub fn depth(&self) -> usize {
        self.size.depth
    }

    /// Get the number of rows in each slice.
    pub fn height(&self) -> usize {
        self.size.height
    }

    /// Get the number of columns in each row.
    pub fn width(&self) -> usize {
        self.size.width
    }

    /// Total number of samples.
    pub fn num_samples(&self) -> usize {
        self.data.len()
    }

    /// True when the volume holds no samples.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get the samples as a flat slice.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Get the samples as a flat mutable slice.
    pub fn as_slice_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consume the volume and return its flat buffer.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Get the sample at `[z, y, x]`, or `None` if any index is out of bounds.
    pub fn get(&self, index: [usize; 3]) -> Option<&T> {
        let [z, y, x] = index;
        if z >= self.depth() || y >= self.height() || x >= self.width() {
            return None;
        }
        self.data.get((z * self.height() + y) * self.width() + x)
    }

    /// Get the samples of slice `z` as a flat row-major slice.
    ///
    /// # Errors
    ///
    /// Returns [`VolumeError::SliceIndexOutOfRange`] if `z >= depth`.
    pub fn slice_data(&self, z: usize) -> Result<&[T], VolumeError> {
        if z >= self.depth() {
            return Err(VolumeError::SliceIndexOutOfRange(z, self.depth()));
        }
        let len = self.size.slice_len();
        Ok(&self.data[z * len..(z + 1) * len])
    }

    /// Extract slice `z` as a new single-slice volume.
    ///
    /// # Errors
    ///
    /// Returns [`VolumeError::EmptyVolume`] for an empty volume and
    /// [`VolumeError::SliceIndexOutOfRange`] if `z >= depth`.
    ///
    /// # Examples
    ///
    /// ```
    /// use volfilt_volume::{Volume, VolumeSize};
    ///
    /// let volume = Volume::new(
    ///     VolumeSize { depth: 2, height: 1, width: 2 },
    ///     vec![1, 2, 3, 4],
    /// ).unwrap();
    /// let slice = volume.slice(1).unwrap();
    /// assert_eq!(slice.as_slice(), &[3, 4]);
    /// assert!(volume.slice(2).is_err());
    /// ```
    pub fn slice(&self, z: usize) -> Result<Volume<T>, VolumeError>
    where
        T: Clone,
    {
        if self.is_empty() {
            return Err(VolumeError::EmptyVolume);
        }
        let data = self.slice_data(z)?.to_vec();
        Volume::new(
            VolumeSize {
                depth: 1,
                ..self.size
            },
            data,
        )
    }

    /// Convert the volume back into nested `[depth][row][column]` vectors.
    pub fn to_nested(&self) -> Vec<Vec<Vec<T>>>
    where
        T: Clone,
    {
        if self.size.slice_len() == 0 {
            return vec![vec![Vec::new(); self.height()]; self.depth()];
        }
        self.data
            .chunks_exact(self.size.slice_len())
            .map(|slice| {
                slice
                    .chunks_exact(self.width().max(1))
                    .map(|row| row.to_vec())
                    .collect()
            })
            .collect()
    }

    /// Cast the samples of the volume to a different type.
    ///
    /// # Errors
    ///
    /// Returns [`VolumeError::CastError`] if a sample cannot be represented in `U`.
    pub fn cast<U>(&self) -> Result<Volume<U>, VolumeError>
    where
        T: Copy + num_traits::NumCast,
        U: num_traits::NumCast,
    {
        let data = self
            .data
            .iter()
            .map(|&x| {
                U::from(x)
                    .ok_or_else(|| VolumeError::CastError(std::any::type_name::<U>().to_string()))
            })
            .collect::<Result<Vec<U>, VolumeError>>()?;

        Volume::new(self.size, data)
    }

    /// Apply `f` to every sample, producing a new volume of the same size.
    pub fn map<U>(&self, f: impl Fn(&T) -> U) -> Volume<U> {
        Volume {
            data: self.data.iter().map(f).collect(),
            size: self.size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn volume_size() {
        let size = VolumeSize {
            depth: 2,
            height: 3,
            width: 4,
        };
        assert_eq!(size.num_samples(), 24);
        assert_eq!(size.checked_num_samples(), Some(24));
        assert_eq!(size.slice_len(), 12);
        assert!(!size.is_empty());
        assert_eq!(VolumeSize::from([2, 3, 4]), size);
        assert_eq!(<[usize; 3]>::from(size), [2, 3, 4]);
    }

    #[test]
    fn axis_codes() {
        let size = VolumeSize {
            depth: 2,
            height: 3,
            width: 4,
        };
        for (code, axis) in Axis::ALL.iter().enumerate() {
            assert_eq!(Axis::try_from(code), Ok(*axis));
            assert_eq!(axis.index(), code);
        }
        assert_eq!(Axis::Row.extent(size), 3);
        assert_eq!(Axis::Depth.stride(size), 12);
        let err = Axis::try_from(3).unwrap_err();
        assert_eq!(err, VolumeError::InvalidAxis(3));
        assert_eq!(err.kind(), crate::ErrorKind::InvalidArgument);
    }

    #[test]
    fn volume_new_length_mismatch() {
        let res = Volume::new([1, 2, 2].into(), vec![0u8; 3]);
        assert_eq!(res, Err(VolumeError::InvalidDataLength(3, 4)));
    }

    #[test]
    fn volume_size_overflow() {
        let size = VolumeSize::from([2, 1 << 32, 1 << 32]);
        assert_eq!(size.checked_num_samples(), None);
        assert!(!size.is_empty());

        let err = Volume::new(size, vec![0u16; 4]).unwrap_err();
        assert_eq!(err, VolumeError::SizeOverflow(size));
        assert_eq!(err.kind(), crate::ErrorKind::InvalidArgument);
    }

    #[test]
    fn volume_from_nested() -> Result<(), VolumeError> {
        let volume = Volume::from_nested(vec![
            vec![vec![1, 2, 3], vec![4, 5, 6]],
            vec![vec![7, 8, 9], vec![10, 11, 12]],
        ])?;
        assert_eq!(volume.size(), [2, 2, 3].into());
        assert_eq!(volume.get([1, 0, 2]), Some(&9));
        assert_eq!(volume.get([0, 1, 0]), Some(&4));
        assert_eq!(volume.get([2, 0, 0]), None);
        assert_eq!(volume.to_nested()[1][1], vec![10, 11, 12]);
        Ok(())
    }

    #[test]
    fn volume_from_nested_ragged() {
        let res = Volume::from_nested(vec![vec![vec![1, 2], vec![3, 4]], vec![vec![5, 6]]]);
        assert_eq!(res, Err(VolumeError::RaggedSlice(1, 1, 2, 2, 2)));

        let res = Volume::from_nested(vec![vec![vec![1, 2], vec![3]]]);
        let err = res.unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::DimensionMismatch);
    }

    #[test]
    fn volume_from_nested_empty() -> Result<(), VolumeError> {
        let volume = Volume::<f64>::from_nested(vec![])?;
        assert!(volume.is_empty());
        assert_eq!(volume.size(), [0, 0, 0].into());
        Ok(())
    }

    #[test]
    fn volume_slice() -> Result<(), VolumeError> {
        let volume = Volume::new([3, 1, 2].into(), vec![1, 2, 3, 4, 5, 6])?;
        assert_eq!(volume.slice(2)?.as_slice(), &[5, 6]);
        assert_eq!(volume.slice_data(0)?, &[1, 2]);

        let err = volume.slice(3).unwrap_err();
        assert_eq!(err, VolumeError::SliceIndexOutOfRange(3, 3));
        assert_eq!(err.kind(), crate::ErrorKind::OutOfRange);

        let empty = Volume::<u8>::from_size_val([0, 0, 0].into(), 0);
        assert_eq!(empty.slice(0), Err(VolumeError::EmptyVolume));
        Ok(())
    }

    #[test]
    fn volume_cast() -> Result<(), VolumeError> {
        let volume = Volume::new([1, 1, 3].into(), vec![0u16, 1000, 65535])?;
        let volume_f64 = volume.cast::<f64>()?;
        assert_eq!(volume_f64.as_slice(), &[0.0, 1000.0, 65535.0]);

        let negative = Volume::new([1, 1, 1].into(), vec![-1.0f64])?;
        assert!(negative.cast::<u16>().is_err());
        Ok(())
    }

    #[test]
    fn volume_map() -> Result<(), VolumeError> {
        let volume = Volume::new([1, 2, 1].into(), vec![1.5f64, 2.5])?;
        let doubled = volume.map(|x| x * 2.0);
        assert_eq!(doubled.as_slice(), &[3.0, 5.0]);
        assert_eq!(doubled.size(), volume.size());
        Ok(())
    }
}
