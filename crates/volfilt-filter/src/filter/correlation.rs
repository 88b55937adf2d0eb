use volfilt_volume::{Axis, Volume, VolumeError};

use crate::{
    border::BorderMode,
    padding::{pad3d_with_strategy, Padding3D},
    parallel::{for_each_row_with, ExecutionStrategy},
};

/// Default absolute tolerance used to detect kernel symmetry.
pub const DEFAULT_SYMMETRY_TOLERANCE: f64 = 1e-6;

/// Options of the 1D correlation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrelationOptions {
    /// Absolute tolerance for comparing mirrored kernel taps.
    ///
    /// A tolerance of `0.0` never detects symmetry and always runs the general path.
    pub symmetry_tolerance: f64,
    /// How the sweep over the output rows is executed.
    pub strategy: ExecutionStrategy,
}

impl Default for CorrelationOptions {
    fn default() -> Self {
        Self {
            symmetry_tolerance: DEFAULT_SYMMETRY_TOLERANCE,
            strategy: ExecutionStrategy::Auto,
        }
    }
}

/// Symmetry class of a kernel about its center tap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelSymmetry {
    /// `w[r + i] == w[r - i]` for every `i`.
    Symmetric,
    /// `w[r + i] == -w[r - i]` for every `i`.
    Antisymmetric,
    /// Neither of the above.
    General,
}

#[inline]
fn is_close(a: f64, b: f64, eps: f64) -> bool {
    (a - b).abs() < eps
}

impl KernelSymmetry {
    /// Classify an odd-length kernel.
    ///
    /// A kernel that is both symmetric and antisymmetric (e.g. all zeros off
    /// center) is reported as symmetric.
    ///
    /// # Example
    ///
    /// ```rust
    /// use volfilt_filter::filter::KernelSymmetry;
    ///
    /// assert_eq!(KernelSymmetry::classify(&[1.0, 2.0, 1.0], 1e-6), KernelSymmetry::Symmetric);
    /// assert_eq!(
    ///     KernelSymmetry::classify(&[-1.0, 0.0, 1.0], 1e-6),
    ///     KernelSymmetry::Antisymmetric
    /// );
    /// assert_eq!(KernelSymmetry::classify(&[1.0, 2.0, 3.0], 1e-6), KernelSymmetry::General);
    /// ```
    pub fn classify(kernel: &[f64], tolerance: f64) -> Self {
        let r = kernel.len() / 2;
        let mut symmetric = true;
        let mut antisymmetric = true;
        for i in 1..=r {
            if !is_close(kernel[r + i], kernel[r - i], tolerance) {
                symmetric = false;
            }
            if !is_close(kernel[r + i], -kernel[r - i], tolerance) {
                antisymmetric = false;
            }
        }

        if symmetric {
            KernelSymmetry::Symmetric
        } else if antisymmetric {
            KernelSymmetry::Antisymmetric
        } else {
            KernelSymmetry::General
        }
    }
}

type TapFn = fn(&[f64], usize, usize, &[f64]) -> f64;

// mirrored taps share the weight, one multiply per pair
#[inline]
fn taps_symmetric(src: &[f64], center: usize, stride: usize, kernel: &[f64]) -> f64 {
    let r = kernel.len() / 2;
    let mut sum = src[center] * kernel[r];
    for i in 1..=r {
        let offset = i * stride;
        sum += (src[center - offset] + src[center + offset]) * kernel[r + i];
    }
    sum
}

// mirrored taps have opposite weights, one multiply per pair
#[inline]
fn taps_antisymmetric(src: &[f64], center: usize, stride: usize, kernel: &[f64]) -> f64 {
    let r = kernel.len() / 2;
    let mut sum = src[center] * kernel[r];
    for i in 1..=r {
        let offset = i * stride;
        sum += (src[center - offset] - src[center + offset]) * kernel[r - i];
    }
    sum
}

#[inline]
fn taps_general(src: &[f64], center: usize, stride: usize, kernel: &[f64]) -> f64 {
    let start = center - (kernel.len() / 2) * stride;
    kernel
        .iter()
        .enumerate()
        .map(|(i, &k)| src[start + i * stride] * k)
        .sum()
}

/// Correlate a volume with a 1D kernel along one axis.
///
/// Uses the default [`CorrelationOptions`]. See [`correlate1d_with_options`].
///
/// # Example
///
/// ```rust
/// use volfilt_volume::{Volume, VolumeSize};
/// use volfilt_filter::{border::BorderMode, filter::correlate1d};
///
/// let src = Volume::new(
///     VolumeSize { depth: 1, height: 1, width: 4 },
///     vec![2.0, 4.0, 6.0, 8.0],
/// ).unwrap();
/// let dst = correlate1d(&src, &[0.25, 0.5, 0.25], 1, BorderMode::Replicate).unwrap();
///
/// assert_eq!(dst.as_slice(), &[2.5, 4.0, 6.0, 7.5]);
/// ```
pub fn correlate1d(
    src: &Volume<f64>,
    kernel: &[f64],
    axis: usize,
    border: BorderMode,
) -> Result<Volume<f64>, VolumeError> {
    correlate1d_with_options(src, kernel, axis, border, &CorrelationOptions::default())
}

/// Correlate a volume with a 1D kernel along one axis with explicit options.
///
/// The source is padded by `r = (kernel.len() - 1) / 2` samples along `axis`
/// only, then every output sample is the inner product of its `2r + 1`
/// neighbours along `axis` with `kernel`, without reversing the kernel.
/// The symmetry of the kernel is detected once per call and selects the
/// paired (symmetric or antisymmetric) or the general summation.
///
/// # Arguments
///
/// * `src` - The source volume.
/// * `kernel` - The kernel weights, odd length.
/// * `axis` - `0` rows, `1` columns, `2` depth.
/// * `border` - The border handling.
/// * `options` - Symmetry tolerance and execution strategy.
///
/// # Errors
///
/// * [`VolumeError::InvalidAxis`] if `axis` is not 0, 1 or 2.
/// * [`VolumeError::InvalidKernelLength`] if the kernel is empty or has an even length.
/// * [`VolumeError::EmptyVolume`] if `src` holds no samples.
pub fn correlate1d_with_options(
    src: &Volume<f64>,
    kernel: &[f64],
    axis: usize,
    border: BorderMode,
    options: &CorrelationOptions,
) -> Result<Volume<f64>, VolumeError> {
    let axis = Axis::try_from(axis)?;

    if kernel.is_empty() || kernel.len() % 2 == 0 {
        return Err(VolumeError::InvalidKernelLength(kernel.len()));
    }

    if src.is_empty() {
        return Err(VolumeError::EmptyVolume);
    }

    let radius = kernel.len() / 2;
    let symmetry = KernelSymmetry::classify(kernel, options.symmetry_tolerance);

    log::debug!(
        "correlate1d: axis {:?}, {} taps, {:?} path, {:?}",
        axis,
        kernel.len(),
        symmetry,
        border
    );

    let taps: TapFn = match symmetry {
        KernelSymmetry::Symmetric => taps_symmetric,
        KernelSymmetry::Antisymmetric => taps_antisymmetric,
        KernelSymmetry::General => taps_general,
    };

    let padded = pad3d_with_strategy(
        src,
        Padding3D::along(axis, radius),
        border,
        options.strategy,
    )?;
    let padded_size = padded.size();
    let padded_data = padded.as_slice();
    let stride = axis.stride(padded_size);

    let size = src.size();
    let mut dst = Volume::from_size_val(size, 0.0);

    for_each_row_with(
        dst.as_slice_mut(),
        size.width,
        options.strategy,
        |row_idx, dst_row| {
            let z = row_idx / size.height;
            let y = row_idx % size.height;

            // position of (z, y, 0) inside the padded volume
            let (pz, py, px) = match axis {
                Axis::Row => (z, y + radius, 0),
                Axis::Col => (z, y, radius),
                Axis::Depth => (z + radius, y, 0),
            };
            let base = (pz * padded_size.height + py) * padded_size.width + px;

            dst_row
                .iter_mut()
                .enumerate()
                .for_each(|(x, out)| *out = taps(padded_data, base + x, stride, kernel));
        },
    );

    Ok(dst)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use volfilt_volume::ErrorKind;

    fn make_row(values: &[f64]) -> Result<Volume<f64>, VolumeError> {
        Volume::new([1, 1, values.len()].into(), values.to_vec())
    }

    const GENERAL_ONLY: CorrelationOptions = CorrelationOptions {
        symmetry_tolerance: 0.0,
        strategy: ExecutionStrategy::Serial,
    };

    #[test]
    fn test_classify() {
        assert_eq!(
            KernelSymmetry::classify(&[1.0], 1e-6),
            KernelSymmetry::Symmetric
        );
        assert_eq!(
            KernelSymmetry::classify(&[0.25, 0.5, 0.25 + 1e-8], 1e-6),
            KernelSymmetry::Symmetric
        );
        assert_eq!(
            KernelSymmetry::classify(&[1.0, -2.0, 0.0, 2.0, -1.0], 1e-6),
            KernelSymmetry::Antisymmetric
        );
        assert_eq!(
            KernelSymmetry::classify(&[0.25, 0.5, 0.25], 0.0),
            KernelSymmetry::General
        );
        assert_eq!(
            KernelSymmetry::classify(&[0.2, 0.5, 0.3], 1e-6),
            KernelSymmetry::General
        );
    }

    #[test]
    fn test_correlate_symmetric_replicate() -> Result<(), VolumeError> {
        let src = make_row(&[2.0, 4.0, 6.0, 8.0])?;
        let dst = correlate1d(&src, &[0.25, 0.5, 0.25], 1, BorderMode::Replicate)?;
        assert_eq!(dst.as_slice(), &[2.5, 4.0, 6.0, 7.5]);
        Ok(())
    }

    #[test]
    fn test_correlate_gradient_no_reversal() -> Result<(), VolumeError> {
        let src = make_row(&[0.0, 0.0, 0.0, 10.0, 10.0, 10.0])?;
        let dst = correlate1d(&src, &[-1.0, 0.0, 1.0], 1, BorderMode::Replicate)?;
        assert_eq!(dst.as_slice(), &[0.0, 0.0, 10.0, 10.0, 0.0, 0.0]);

        let general = correlate1d_with_options(
            &src,
            &[-1.0, 0.0, 1.0],
            1,
            BorderMode::Replicate,
            &GENERAL_ONLY,
        )?;
        assert_eq!(general, dst);
        Ok(())
    }

    #[test]
    fn test_correlate_general_kernel() -> Result<(), VolumeError> {
        let src = make_row(&[1.0, 2.0, 3.0])?;
        let dst = correlate1d(&src, &[1.0, 0.0, 0.0], 1, BorderMode::Constant(0.0))?;
        // out[x] = src[x - 1]
        assert_eq!(dst.as_slice(), &[0.0, 1.0, 2.0]);
        Ok(())
    }

    #[test]
    fn test_correlate_constant_border() -> Result<(), VolumeError> {
        let src = make_row(&[1.0, 1.0, 1.0])?;
        let dst = correlate1d(&src, &[1.0, 1.0, 1.0], 1, BorderMode::Constant(5.0))?;
        assert_eq!(dst.as_slice(), &[7.0, 3.0, 7.0]);
        Ok(())
    }

    #[test]
    fn test_correlate_along_each_axis() -> Result<(), VolumeError> {
        // impulse in the middle of a 3x3x3 volume
        let mut src = Volume::from_size_val([3, 3, 3].into(), 0.0);
        src.as_slice_mut()[13] = 1.0;
        let kernel = [1.0, 2.0, 3.0];

        // axis 0 walks along rows: out[z][y][x] = sum_k w[k] * src[z][y + k - 1][x]
        let dst = correlate1d(&src, &kernel, 0, BorderMode::Constant(0.0))?;
        assert_eq!(dst.get([1, 0, 1]), Some(&3.0));
        assert_eq!(dst.get([1, 1, 1]), Some(&2.0));
        assert_eq!(dst.get([1, 2, 1]), Some(&1.0));
        assert_eq!(dst.as_slice().iter().sum::<f64>(), 6.0);

        let dst = correlate1d(&src, &kernel, 1, BorderMode::Constant(0.0))?;
        assert_eq!(dst.get([1, 1, 0]), Some(&3.0));
        assert_eq!(dst.get([1, 1, 2]), Some(&1.0));

        let dst = correlate1d(&src, &kernel, 2, BorderMode::Constant(0.0))?;
        assert_eq!(dst.get([0, 1, 1]), Some(&3.0));
        assert_eq!(dst.get([2, 1, 1]), Some(&1.0));

        Ok(())
    }

    #[test]
    fn test_correlate_identity_kernel() -> Result<(), VolumeError> {
        let src = Volume::new([2, 2, 2].into(), (0..8).map(|v| v as f64).collect())?;
        for axis in 0..3 {
            let dst = correlate1d(&src, &[1.0], axis, BorderMode::Reflect)?;
            assert_eq!(dst, src);
        }
        Ok(())
    }

    #[test]
    fn test_fast_paths_match_general() -> Result<(), VolumeError> {
        let data = (0..4 * 5 * 6)
            .map(|v| ((v * 37) % 11) as f64 - 3.5)
            .collect::<Vec<_>>();
        let src = Volume::new([4, 5, 6].into(), data)?;

        let kernels: [&[f64]; 3] = [
            &[0.1, 0.2, 0.4, 0.2, 0.1],
            &[-1.0, -2.0, 0.0, 2.0, 1.0],
            &[0.5, 0.0, -0.5],
        ];

        for kernel in kernels {
            for axis in 0..3 {
                for border in [BorderMode::Reflect101, BorderMode::Constant(2.0)] {
                    let fast = correlate1d(&src, kernel, axis, border)?;
                    let general =
                        correlate1d_with_options(&src, kernel, axis, border, &GENERAL_ONLY)?;
                    for (a, b) in fast.as_slice().iter().zip(general.as_slice()) {
                        assert_relative_eq!(*a, *b, epsilon = 1e-12, max_relative = 1e-9);
                    }
                }
            }
        }
        Ok(())
    }

    #[test]
    fn test_correlate_strategies_identical() -> Result<(), VolumeError> {
        let data = (0..3 * 7 * 9).map(|v| (v as f64).sin()).collect::<Vec<_>>();
        let src = Volume::new([3, 7, 9].into(), data)?;
        let kernel = [0.1, 0.2, 0.4, 0.2, 0.1];

        for axis in 0..3 {
            let serial = correlate1d_with_options(
                &src,
                &kernel,
                axis,
                BorderMode::Reflect,
                &CorrelationOptions {
                    strategy: ExecutionStrategy::Serial,
                    ..Default::default()
                },
            )?;
            let parallel = correlate1d_with_options(
                &src,
                &kernel,
                axis,
                BorderMode::Reflect,
                &CorrelationOptions {
                    strategy: ExecutionStrategy::Parallel,
                    ..Default::default()
                },
            )?;
            assert_eq!(serial, parallel);
        }
        Ok(())
    }

    #[test]
    fn test_correlate_kernel_longer_than_axis() -> Result<(), VolumeError> {
        let src = make_row(&[1.0, 2.0])?;
        let kernel = [1.0; 7];
        let dst = correlate1d(&src, &kernel, 1, BorderMode::Reflect)?;
        // reflect extension of [1, 2]: ... 1 2 2 1 | 1 2 | 2 1 1 2 ...
        assert_eq!(dst.as_slice(), &[11.0, 10.0]);
        Ok(())
    }

    #[test]
    fn test_correlate_errors() -> Result<(), VolumeError> {
        let src = make_row(&[1.0, 2.0])?;

        let err = correlate1d(&src, &[1.0], 3, BorderMode::Replicate).unwrap_err();
        assert_eq!(err, VolumeError::InvalidAxis(3));
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);

        let err = correlate1d(&src, &[], 0, BorderMode::Replicate).unwrap_err();
        assert_eq!(err, VolumeError::InvalidKernelLength(0));

        let err = correlate1d(&src, &[1.0, 1.0], 0, BorderMode::Replicate).unwrap_err();
        assert_eq!(err, VolumeError::InvalidKernelLength(2));

        let empty = Volume::from_size_val([0, 0, 0].into(), 0.0);
        let err = correlate1d(&empty, &[1.0], 0, BorderMode::Replicate).unwrap_err();
        assert_eq!(err, VolumeError::EmptyVolume);
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);

        Ok(())
    }
}
