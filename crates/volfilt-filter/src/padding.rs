use volfilt_volume::{Axis, Volume, VolumeError, VolumeSize};

use crate::{
    border::BorderMode,
    parallel::{for_each_row_with, ExecutionStrategy},
};

/// Represents 3D padding with per-axis amounts (in samples).
///
/// Each amount is added on both sides of its axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Padding3D {
    /// Amount of padding above and below every slice (axis 0).
    pub rows: usize,
    /// Amount of padding left and right of every row (axis 1).
    pub cols: usize,
    /// Amount of padding before the first and after the last slice (axis 2).
    pub depth: usize,
}

impl Padding3D {
    /// Padding of `amount` along `axis` only.
    pub fn along(axis: Axis, amount: usize) -> Self {
        match axis {
            Axis::Row => Padding3D {
                rows: amount,
                ..Default::default()
            },
            Axis::Col => Padding3D {
                cols: amount,
                ..Default::default()
            },
            Axis::Depth => Padding3D {
                depth: amount,
                ..Default::default()
            },
        }
    }

    /// Size of a volume of `size` after applying this padding.
    pub fn padded_size(&self, size: VolumeSize) -> VolumeSize {
        VolumeSize {
            depth: size.depth + 2 * self.depth,
            height: size.height + 2 * self.rows,
            width: size.width + 2 * self.cols,
        }
    }

    /// Size of a volume of `size` after applying this padding, or `None` on overflow.
    pub fn checked_padded_size(&self, size: VolumeSize) -> Option<VolumeSize> {
        let grow = |extent: usize, pad: usize| pad.checked_mul(2)?.checked_add(extent);
        Some(VolumeSize {
            depth: grow(size.depth, self.depth)?,
            height: grow(size.height, self.rows)?,
            width: grow(size.width, self.cols)?,
        })
    }

    /// Validates that a new volume size correctly matches the expected dimensions
    /// after applying this padding to an existing volume.
    ///
    /// # Example
    /// ```rust
    /// use volfilt_volume::VolumeSize;
    /// use volfilt_filter::padding::Padding3D;
    ///
    /// let padding = Padding3D { rows: 1, cols: 2, depth: 0 };
    /// let old_size = VolumeSize { depth: 3, height: 4, width: 4 };
    /// let new_size = VolumeSize { depth: 3, height: 6, width: 8 };
    ///
    /// assert!(padding.validate_size(old_size, new_size));
    /// ```
    pub fn validate_size(&self, old_size: VolumeSize, new_size: VolumeSize) -> bool {
        self.padded_size(old_size) == new_size
    }
}

impl TryFrom<&[usize]> for Padding3D {
    type Error = VolumeError;

    /// Build the padding from `[rows, cols]` or `[rows, cols, depth]`.
    ///
    /// A missing depth amount means no depth padding. Extra values are ignored.
    fn try_from(pads: &[usize]) -> Result<Self, Self::Error> {
        match pads {
            [rows, cols] => Ok(Padding3D {
                rows: *rows,
                cols: *cols,
                depth: 0,
            }),
            [rows, cols, depth, ..] => Ok(Padding3D {
                rows: *rows,
                cols: *cols,
                depth: *depth,
            }),
            _ => Err(VolumeError::InvalidPadding(pads.len())),
        }
    }
}

/// Pads the rows and columns of one slice into `dst`.
///
/// `dst` must hold `(rows + 2 * pad_rows) * (cols + 2 * pad_cols)` samples and,
/// for the constant mode, must already be filled with the fill value.
fn pad_slice_into(
    src: &[f64],
    rows: usize,
    cols: usize,
    dst: &mut [f64],
    pad_rows: usize,
    pad_cols: usize,
    border: BorderMode,
) {
    let new_cols = cols + 2 * pad_cols;

    for (y, dst_row) in dst.chunks_exact_mut(new_cols).enumerate() {
        let src_y = y as isize - pad_rows as isize;
        let inside = src_y >= 0 && (src_y as usize) < rows;

        if let BorderMode::Constant(_) = border {
            if inside {
                let start = src_y as usize * cols;
                dst_row[pad_cols..pad_cols + cols].copy_from_slice(&src[start..start + cols]);
            }
            continue;
        }

        let start = border.map_index(src_y, rows) * cols;
        let src_row = &src[start..start + cols];

        let (left, rest) = dst_row.split_at_mut(pad_cols);
        let (center, right) = rest.split_at_mut(cols);
        center.copy_from_slice(src_row);

        left.iter_mut().enumerate().for_each(|(x, v)| {
            *v = src_row[border.map_index(x as isize - pad_cols as isize, cols)];
        });

        right.iter_mut().enumerate().for_each(|(x, v)| {
            *v = src_row[border.map_index((cols + x) as isize, cols)];
        });
    }
}

/// Creates a new volume with a halo of `padding` samples around it.
///
/// Every slice is first padded along rows and columns; the depth halo is then
/// made of whole padded slices, either filled with the constant value or
/// copied from the slice the border mode resolves to.
///
/// # Arguments
///
/// * `src` - The source volume to pad.
/// * `padding` - The amount of padding per axis defined in [`Padding3D`].
/// * `border` - The border handling defined in [`BorderMode`].
///
/// Slices are padded on the thread pool for large volumes, see
/// [`pad3d_with_strategy`] to choose the execution.
///
/// # Errors
///
/// * [`VolumeError::EmptyVolume`] if `src` holds no samples.
/// * [`VolumeError::SizeOverflow`] if the padded size does not fit in memory indices.
///
/// # Example
///
/// ```rust
/// use volfilt_volume::{Volume, VolumeSize};
/// use volfilt_filter::{border::BorderMode, padding::{pad3d, Padding3D}};
///
/// let src = Volume::new(VolumeSize { depth: 1, height: 1, width: 2 }, vec![1.0, 2.0]).unwrap();
///
/// let dst = pad3d(&src, Padding3D { rows: 0, cols: 1, depth: 1 }, BorderMode::Replicate).unwrap();
///
/// assert_eq!(dst.size(), VolumeSize { depth: 3, height: 1, width: 4 });
/// assert_eq!(dst.slice_data(0).unwrap(), &[1.0, 1.0, 2.0, 2.0]);
/// ```
pub fn pad3d(
    src: &Volume<f64>,
    padding: Padding3D,
    border: BorderMode,
) -> Result<Volume<f64>, VolumeError> {
    pad3d_with_strategy(src, padding, border, ExecutionStrategy::Auto)
}

/// Creates a new volume with a halo of `padding` samples around it, with an
/// explicit execution strategy for the per-slice padding.
///
/// See [`pad3d`].
pub fn pad3d_with_strategy(
    src: &Volume<f64>,
    padding: Padding3D,
    border: BorderMode,
    strategy: ExecutionStrategy,
) -> Result<Volume<f64>, VolumeError> {
    if src.is_empty() {
        return Err(VolumeError::EmptyVolume);
    }

    let old_size = src.size();
    let new_size = padding
        .checked_padded_size(old_size)
        .filter(|size| size.checked_num_samples().is_some())
        .ok_or(VolumeError::SizeOverflow(old_size))?;

    let fill = border.fill_value().unwrap_or_default();
    let mut dst = Volume::from_size_val(new_size, fill);

    let old_slice_len = old_size.slice_len();
    let new_slice_len = new_size.slice_len();
    let center_offset = padding.depth * new_slice_len;

    // pad the rows and columns of every source slice
    let src_data = src.as_slice();
    for_each_row_with(
        &mut dst.as_slice_mut()[center_offset..center_offset + old_size.depth * new_slice_len],
        new_slice_len,
        strategy,
        |z, dst_slice| {
            pad_slice_into(
                &src_data[z * old_slice_len..(z + 1) * old_slice_len],
                old_size.height,
                old_size.width,
                dst_slice,
                padding.rows,
                padding.cols,
                border,
            );
        },
    );

    if let BorderMode::Constant(_) = border {
        return Ok(dst);
    }

    // front and back slices, copied from already padded slices
    let dst_data = dst.as_slice_mut();
    let halo = (0..padding.depth).chain(padding.depth + old_size.depth..new_size.depth);
    for z in halo {
        let src_z = border.map_index(z as isize - padding.depth as isize, old_size.depth);
        let src_start = (padding.depth + src_z) * new_slice_len;
        dst_data.copy_within(src_start..src_start + new_slice_len, z * new_slice_len);
    }

    Ok(dst)
}

/// Pads the rows and columns of every slice of `src`, leaving the depth untouched.
///
/// # Errors
///
/// Returns [`VolumeError::EmptyVolume`] if `src` holds no samples.
pub fn pad2d(
    src: &Volume<f64>,
    pad_rows: usize,
    pad_cols: usize,
    border: BorderMode,
) -> Result<Volume<f64>, VolumeError> {
    pad3d(
        src,
        Padding3D {
            rows: pad_rows,
            cols: pad_cols,
            depth: 0,
        },
        border,
    )
}

/// Extracts the central block of a padded volume, undoing [`pad3d`].
///
/// # Errors
///
/// Returns [`VolumeError::PaddingTooLarge`] if the padding does not fit in `src`.
pub fn crop3d(src: &Volume<f64>, padding: Padding3D) -> Result<Volume<f64>, VolumeError> {
    let size = src.size();
    if size.depth < 2 * padding.depth
        || size.height < 2 * padding.rows
        || size.width < 2 * padding.cols
    {
        return Err(VolumeError::PaddingTooLarge(size));
    }

    let new_size = VolumeSize {
        depth: size.depth - 2 * padding.depth,
        height: size.height - 2 * padding.rows,
        width: size.width - 2 * padding.cols,
    };

    let mut data = Vec::with_capacity(new_size.num_samples());
    let src_data = src.as_slice();
    for z in padding.depth..padding.depth + new_size.depth {
        for y in padding.rows..padding.rows + new_size.height {
            let start = (z * size.height + y) * size.width + padding.cols;
            data.extend_from_slice(&src_data[start..start + new_size.width]);
        }
    }

    Volume::new(new_size, data)
}
