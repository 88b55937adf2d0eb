use volfilt_volume::VolumeError;

/// Largest radius of a generated gaussian kernel.
pub const MAX_GAUSSIAN_RADIUS: usize = 1 << 20;

/// Recommended gaussian radius for a given sigma, `floor(4 * sigma + 0.5)`.
///
/// # Errors
///
/// Returns [`VolumeError::InvalidSigma`] if `sigma` is negative, not finite,
/// or gives a radius above [`MAX_GAUSSIAN_RADIUS`].
pub fn gaussian_radius(sigma: f64) -> Result<usize, VolumeError> {
    if !sigma.is_finite() || sigma < 0.0 {
        return Err(VolumeError::InvalidSigma(sigma));
    }
    let radius = (4.0 * sigma + 0.5).floor();
    if radius > MAX_GAUSSIAN_RADIUS as f64 {
        return Err(VolumeError::InvalidSigma(sigma));
    }
    Ok(radius as usize)
}

/// Create a gaussian kernel.
///
/// # Arguments
///
/// * `sigma` - The sigma of the gaussian kernel.
/// * `radius` - The radius of the kernel, the kernel has `2 * radius + 1` taps.
///
/// # Returns
///
/// A vector of the kernel, normalized to sum 1. A zero radius gives the
/// identity kernel `[1.0]`; a zero sigma gives a unit impulse at the center.
///
/// # Errors
///
/// * [`VolumeError::InvalidSigma`] if `sigma` is negative or not finite.
/// * [`VolumeError::InvalidKernelLength`] if `radius` is above [`MAX_GAUSSIAN_RADIUS`].
pub fn gaussian_kernel_1d(sigma: f64, radius: usize) -> Result<Vec<f64>, VolumeError> {
    if !sigma.is_finite() || sigma < 0.0 {
        return Err(VolumeError::InvalidSigma(sigma));
    }

    if radius > MAX_GAUSSIAN_RADIUS {
        return Err(VolumeError::InvalidKernelLength(
            radius.saturating_mul(2).saturating_add(1),
        ));
    }

    let kernel_size = 2 * radius + 1;

    if sigma == 0.0 {
        let mut kernel = vec![0.0; kernel_size];
        kernel[radius] = 1.0;
        return Ok(kernel);
    }

    let sigma_sq = sigma * sigma;

    // compute the kernel
    let mut kernel = (0..kernel_size)
        .map(|i| {
            let x = i as f64 - radius as f64;
            (-0.5 * x * x / sigma_sq).exp()
        })
        .collect::<Vec<_>>();

    // normalize the kernel
    let norm = kernel.iter().sum::<f64>();
    kernel.iter_mut().for_each(|k| *k /= norm);

    Ok(kernel)
}

/// Create the 3-tap sobel kernels.
///
/// # Returns
///
/// The gradient kernel `[-1, 0, 1]` and the smoothing kernel `[1, 2, 1]`.
pub fn sobel_kernel_1d() -> ([f64; 3], [f64; 3]) {
    ([-1.0, 0.0, 1.0], [1.0, 2.0, 1.0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sobel_kernel_1d() {
        let (gradient, smooth) = sobel_kernel_1d();
        assert_eq!(gradient, [-1.0, 0.0, 1.0]);
        assert_eq!(smooth, [1.0, 2.0, 1.0]);
    }

    #[test]
    fn test_gaussian_kernel_1d() -> Result<(), VolumeError> {
        let kernel = gaussian_kernel_1d(0.5, 2)?;

        let expected = [
            0.000263865082737,
            0.106450771973592,
            0.786570725887342,
            0.106450771973592,
            0.000263865082737,
        ];

        for (k, e) in kernel.iter().zip(expected.iter()) {
            assert_relative_eq!(*k, *e, epsilon = 1e-12);
        }
        assert_relative_eq!(kernel.iter().sum::<f64>(), 1.0, epsilon = 1e-12);

        Ok(())
    }

    #[test]
    fn test_gaussian_kernel_1d_symmetric() -> Result<(), VolumeError> {
        let kernel = gaussian_kernel_1d(1.7, 7)?;
        assert_eq!(kernel.len(), 15);
        for i in 1..=7 {
            assert_relative_eq!(kernel[7 + i], kernel[7 - i], epsilon = 1e-15);
            assert!(kernel[7 + i] < kernel[7 + i - 1]);
        }
        Ok(())
    }

    #[test]
    fn test_gaussian_kernel_1d_degenerate() -> Result<(), VolumeError> {
        assert_eq!(gaussian_kernel_1d(0.0, 0)?, vec![1.0]);
        assert_eq!(gaussian_kernel_1d(3.0, 0)?, vec![1.0]);
        assert_eq!(gaussian_kernel_1d(0.0, 2)?, vec![0.0, 0.0, 1.0, 0.0, 0.0]);
        assert_eq!(
            gaussian_kernel_1d(-1.0, 2),
            Err(VolumeError::InvalidSigma(-1.0))
        );
        assert!(gaussian_kernel_1d(f64::NAN, 2).is_err());
        Ok(())
    }

    #[test]
    fn test_gaussian_radius() -> Result<(), VolumeError> {
        assert_eq!(gaussian_radius(0.0)?, 0);
        assert_eq!(gaussian_radius(0.1)?, 0);
        assert_eq!(gaussian_radius(0.125)?, 1);
        assert_eq!(gaussian_radius(1.0)?, 4);
        assert_eq!(gaussian_radius(4.0)?, 16);
        assert!(gaussian_radius(f64::INFINITY).is_err());
        Ok(())
    }

    #[test]
    fn test_gaussian_huge_sigma() -> Result<(), VolumeError> {
        assert_eq!(gaussian_radius(1e300), Err(VolumeError::InvalidSigma(1e300)));
        assert_eq!(gaussian_radius(262_144.0)?, MAX_GAUSSIAN_RADIUS);
        assert!(gaussian_radius(262_144.5).is_err());

        assert_eq!(
            gaussian_kernel_1d(1.0, usize::MAX),
            Err(VolumeError::InvalidKernelLength(usize::MAX))
        );
        Ok(())
    }
}
