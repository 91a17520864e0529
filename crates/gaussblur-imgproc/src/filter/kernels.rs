use crate::error::FilterError;

/// Check the parameters of a gaussian kernel.
///
/// The size is checked first, so a call with both an even size and a bad sigma
/// reports [`FilterError::InvalidKernelSize`].
pub fn validate_gaussian_params(kernel_size: usize, sigma: f64) -> Result<(), FilterError> {
    if kernel_size == 0 || kernel_size % 2 == 0 {
        return Err(FilterError::InvalidKernelSize(kernel_size));
    }

    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(FilterError::InvalidSigma(sigma));
    }

    Ok(())
}

/// `exp(-d² / 2σ²)`, exactly 1.0 at the center even if `2σ²` underflows to zero.
#[inline]
fn unnormalized_density(dist_sq: f64, two_sigma_sq: f64) -> f64 {
    if dist_sq == 0.0 {
        return 1.0;
    }
    (-dist_sq / two_sigma_sq).exp()
}

/// A square, normalized 2D weight matrix with an odd side length.
///
/// The weights are stored row-major: `get(x, y)` is the weight applied to the
/// neighbour at horizontal offset `x - radius` and vertical offset `y - radius`.
#[derive(Clone, Debug, PartialEq)]
pub struct Kernel {
    size: usize,
    weights: Vec<f64>,
}

impl Kernel {
    /// Create a gaussian kernel.
    ///
    /// Each cell holds the density `exp(-(dx² + dy²) / (2σ²))` at its offset from the
    /// center, divided by the sum over all cells so the weights add up to one.
    ///
    /// # Arguments
    ///
    /// * `kernel_size` - The side length of the kernel, a positive odd integer.
    /// * `sigma` - The standard deviation of the gaussian, a positive real.
    ///
    /// # Errors
    ///
    /// [`FilterError::InvalidKernelSize`] or [`FilterError::InvalidSigma`] before any
    /// weight is computed.
    ///
    /// # Examples
    ///
    /// ```
    /// use gaussblur_imgproc::filter::Kernel;
    ///
    /// let kernel = Kernel::gaussian(3, 1.0).unwrap();
    /// assert_eq!(kernel.size(), 3);
    /// assert!((kernel.sum() - 1.0).abs() < 1e-9);
    /// ```
    pub fn gaussian(kernel_size: usize, sigma: f64) -> Result<Self, FilterError> {
        validate_gaussian_params(kernel_size, sigma)?;

        let center = (kernel_size - 1) / 2;
        let two_sigma_sq = 2.0 * sigma * sigma;

        // the 1 / (2πσ²) factor cancels out in the normalization, leaving it out keeps
        // the center at exactly 1.0 even when sigma is tiny
        let mut weights = Vec::with_capacity(kernel_size * kernel_size);
        for y in 0..kernel_size {
            let dy = y as f64 - center as f64;
            for x in 0..kernel_size {
                let dx = x as f64 - center as f64;
                weights.push(unnormalized_density(dx * dx + dy * dy, two_sigma_sq));
            }
        }

        let total = weights.iter().sum::<f64>();
        weights.iter_mut().for_each(|w| *w /= total);

        log::debug!(
            "built gaussian kernel: size={} sigma={} center weight={}",
            kernel_size,
            sigma,
            weights[center * kernel_size + center]
        );

        Ok(Self {
            size: kernel_size,
            weights,
        })
    }

    /// The side length of the kernel.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Distance from the center cell to the border, `(size - 1) / 2`.
    pub fn radius(&self) -> usize {
        (self.size - 1) / 2
    }

    /// The weight at cell `(x, y)`, or `None` outside the kernel.
    pub fn get(&self, x: usize, y: usize) -> Option<f64> {
        if x >= self.size || y >= self.size {
            return None;
        }
        Some(self.weights[y * self.size + x])
    }

    /// The weights as a row-major slice of length `size * size`.
    pub fn as_slice(&self) -> &[f64] {
        &self.weights
    }

    /// The sum of all weights.
    pub fn sum(&self) -> f64 {
        self.weights.iter().sum()
    }
}

/// Create a gaussian blur kernel.
///
/// The 2D gaussian is the outer product of this kernel with itself, which is what the
/// separable filter relies on.
///
/// # Arguments
///
/// * `kernel_size` - The size of the kernel.
/// * `sigma` - The sigma of the gaussian kernel.
///
/// # Returns
///
/// A vector of the kernel.
pub fn gaussian_kernel_1d(kernel_size: usize, sigma: f64) -> Result<Vec<f64>, FilterError> {
    validate_gaussian_params(kernel_size, sigma)?;

    let mut kernel = Vec::with_capacity(kernel_size);

    let mean = (kernel_size - 1) as f64 / 2.0;
    let sigma_sq = sigma * sigma;

    // compute the kernel
    for i in 0..kernel_size {
        let x = i as f64 - mean;
        kernel.push(unnormalized_density(x * x, 2.0 * sigma_sq));
    }

    // normalize the kernel
    let norm = kernel.iter().sum::<f64>();
    kernel.iter_mut().for_each(|k| *k /= norm);
    Ok(kernel)
}
