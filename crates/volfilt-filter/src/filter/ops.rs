use volfilt_volume::{Axis, Volume, VolumeError};

use super::{correlate1d_with_options, kernels, CorrelationOptions};
use crate::border::BorderMode;

/// Smooth a volume along one axis with a gaussian kernel.
///
/// # Arguments
///
/// * `src` - The source volume.
/// * `sigma` - The sigma of the gaussian kernel, in samples.
/// * `axis` - `0` rows, `1` columns, `2` depth.
/// * `border` - The border handling.
pub fn gaussian_filter1d(
    src: &Volume<f64>,
    sigma: f64,
    axis: usize,
    border: BorderMode,
) -> Result<Volume<f64>, VolumeError> {
    gaussian_filter1d_with_options(src, sigma, axis, border, &CorrelationOptions::default())
}

/// Smooth a volume along one axis with a gaussian kernel and explicit options.
///
/// The kernel radius is [`kernels::gaussian_radius`]. The kernel is reversed
/// before the correlation so the operation is a true convolution.
pub fn gaussian_filter1d_with_options(
    src: &Volume<f64>,
    sigma: f64,
    axis: usize,
    border: BorderMode,
    options: &CorrelationOptions,
) -> Result<Volume<f64>, VolumeError> {
    let radius = kernels::gaussian_radius(sigma)?;
    let mut kernel = kernels::gaussian_kernel_1d(sigma, radius)?;
    kernel.reverse();
    correlate1d_with_options(src, &kernel, axis, border, options)
}

/// Blur a volume using a separable 3D gaussian filter.
///
/// # Arguments
///
/// * `src` - The source volume.
/// * `sigma` - The sigma of the gaussian kernel, in samples, on every axis.
/// * `border` - The border handling.
///
/// # Example
///
/// ```rust
/// use volfilt_volume::{Volume, VolumeSize};
/// use volfilt_filter::{border::BorderMode, filter::gaussian_filter3d};
///
/// let src = Volume::from_size_val(VolumeSize { depth: 4, height: 4, width: 4 }, 3.0);
/// let dst = gaussian_filter3d(&src, 1.0, BorderMode::Replicate).unwrap();
///
/// assert!(dst.as_slice().iter().all(|v| (v - 3.0).abs() < 1e-12));
/// ```
pub fn gaussian_filter3d(
    src: &Volume<f64>,
    sigma: f64,
    border: BorderMode,
) -> Result<Volume<f64>, VolumeError> {
    gaussian_filter3d_with_options(src, [sigma; 3], border, &CorrelationOptions::default())
}

/// Blur a volume using a separable 3D gaussian filter with one sigma per axis.
///
/// `sigmas` holds the sigma along rows, columns and depth, in samples.
pub fn gaussian_filter3d_with_sigmas(
    src: &Volume<f64>,
    sigmas: [f64; 3],
    border: BorderMode,
) -> Result<Volume<f64>, VolumeError> {
    gaussian_filter3d_with_options(src, sigmas, border, &CorrelationOptions::default())
}

/// Blur a volume using a separable 3D gaussian filter with one sigma per axis
/// and explicit options.
///
/// The 1D gaussian filter is applied along rows, then columns, then depth,
/// each stage consuming the output of the previous one.
///
/// # Arguments
///
/// * `src` - The source volume.
/// * `sigmas` - The sigma along rows, columns and depth, in samples.
/// * `border` - The border handling.
/// * `options` - Symmetry tolerance and execution strategy.
pub fn gaussian_filter3d_with_options(
    src: &Volume<f64>,
    sigmas: [f64; 3],
    border: BorderMode,
    options: &CorrelationOptions,
) -> Result<Volume<f64>, VolumeError> {
    let mut dst: Option<Volume<f64>> = None;

    for (axis, &sigma) in Axis::ALL.iter().zip(sigmas.iter()) {
        log::debug!("gaussian_filter3d: axis {:?}, sigma {}", axis, sigma);
        let stage_src = dst.as_ref().unwrap_or(src);
        dst = Some(gaussian_filter1d_with_options(
            stage_src,
            sigma,
            axis.index(),
            border,
            options,
        )?);
    }

    dst.ok_or(VolumeError::EmptyVolume)
}

/// Compute the sobel derivative of a volume along one axis.
///
/// # Arguments
///
/// * `src` - The source volume.
/// * `axis` - The derivative axis, `0` rows, `1` columns, `2` depth.
/// * `border` - The border handling.
///
/// # Example
///
/// ```rust
/// use volfilt_volume::{Volume, VolumeSize};
/// use volfilt_filter::{border::BorderMode, filter::sobel3d};
///
/// let src = Volume::new(
///     VolumeSize { depth: 1, height: 1, width: 4 },
///     vec![0.0, 0.0, 1.0, 1.0],
/// ).unwrap();
/// let dst = sobel3d(&src, 1, BorderMode::Replicate).unwrap();
///
/// // 1 x 1 x 4 volume: the [1, 2, 1] smoothing on the other axes scales by 16
/// assert_eq!(dst.as_slice(), &[0.0, 16.0, 16.0, 0.0]);
/// ```
pub fn sobel3d(
    src: &Volume<f64>,
    axis: usize,
    border: BorderMode,
) -> Result<Volume<f64>, VolumeError> {
    sobel3d_with_options(src, axis, border, &CorrelationOptions::default())
}

/// Compute the sobel derivative of a volume along one axis with explicit options.
///
/// The gradient kernel `[-1, 0, 1]` is correlated along `axis` as is, without
/// reversal, so a rising edge gives a positive response. The smoothing kernel
/// `[1, 2, 1]` is then correlated along the two remaining axes in ascending order.
///
/// # Errors
///
/// * [`VolumeError::InvalidAxis`] if `axis` is not 0, 1 or 2.
/// * [`VolumeError::EmptyVolume`] if `src` holds no samples.
pub fn sobel3d_with_options(
    src: &Volume<f64>,
    axis: usize,
    border: BorderMode,
    options: &CorrelationOptions,
) -> Result<Volume<f64>, VolumeError> {
    let axis = Axis::try_from(axis)?;
    let (gradient, smooth) = kernels::sobel_kernel_1d();

    let mut dst = correlate1d_with_options(src, &gradient, axis.index(), border, options)?;

    for other in Axis::ALL.iter().filter(|&&a| a != axis) {
        dst = correlate1d_with_options(&dst, &smooth, other.index(), border, options)?;
    }

    Ok(dst)
}

/// Compute the sobel gradient magnitude of a volume.
///
/// The magnitude is `sqrt(gx^2 + gy^2 + gz^2)` where each term is the
/// [`sobel3d`] response along one axis.
pub fn sobel_magnitude3d(
    src: &Volume<f64>,
    border: BorderMode,
) -> Result<Volume<f64>, VolumeError> {
    sobel_magnitude3d_with_options(src, border, &CorrelationOptions::default())
}

/// Compute the sobel gradient magnitude of a volume with explicit options.
pub fn sobel_magnitude3d_with_options(
    src: &Volume<f64>,
    border: BorderMode,
    options: &CorrelationOptions,
) -> Result<Volume<f64>, VolumeError> {
    let mut dst = Volume::from_size_val(src.size(), 0.0);

    for axis in Axis::ALL {
        let grad = sobel3d_with_options(src, axis.index(), border, options)?;
        dst.as_slice_mut()
            .iter_mut()
            .zip(grad.as_slice().iter())
            .for_each(|(acc, &g)| *acc += g * g);
    }

    dst.as_slice_mut().iter_mut().for_each(|v| *v = v.sqrt());

    Ok(dst)
}
