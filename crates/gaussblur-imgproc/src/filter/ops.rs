use gaussblur_image::{Image, PixelValue};

use super::{convolve2d_into, kernels, separable_filter, Kernel};
use crate::{error::FilterError, parallel::ExecutionStrategy};

/// How the gaussian kernel is applied to the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConvolutionMethod {
    /// Full 2D convolution, `O(W * H * K²)`.
    #[default]
    Direct,

    /// Two 1D passes (rows then columns), `O(W * H * K)`.
    ///
    /// Matches [`ConvolutionMethod::Direct`] within one unit per channel for integer images.
    Separable,
}

/// Parameters of a gaussian blur.
///
/// # Examples
///
/// ```
/// use gaussblur_imgproc::filter::{ConvolutionMethod, GaussianBlurConfig};
///
/// let config = GaussianBlurConfig::new(15, 5.0).with_method(ConvolutionMethod::Separable);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussianBlurConfig {
    /// Side length of the kernel, a positive odd integer. Controls the spatial extent.
    pub kernel_size: usize,
    /// Standard deviation of the gaussian, a positive real. Controls the smoothing strength.
    pub sigma: f64,
    /// Direct or separable convolution.
    pub method: ConvolutionMethod,
    /// How the rows are scheduled.
    pub strategy: ExecutionStrategy,
}

impl Default for GaussianBlurConfig {
    fn default() -> Self {
        Self {
            kernel_size: 3,
            sigma: 0.2,
            method: ConvolutionMethod::default(),
            strategy: ExecutionStrategy::default(),
        }
    }
}

impl GaussianBlurConfig {
    /// Create a configuration with the given kernel size and sigma.
    pub fn new(kernel_size: usize, sigma: f64) -> Self {
        Self {
            kernel_size,
            sigma,
            ..Default::default()
        }
    }

    /// Set the convolution method.
    pub fn with_method(mut self, method: ConvolutionMethod) -> Self {
        self.method = method;
        self
    }

    /// Set the execution strategy.
    pub fn with_strategy(mut self, strategy: ExecutionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Check the kernel size and sigma.
    pub fn validate(&self) -> Result<(), FilterError> {
        kernels::validate_gaussian_params(self.kernel_size, self.sigma)
    }
}

/// A gaussian blur with its kernel built once and reusable across images.
#[derive(Debug, Clone)]
pub struct GaussianBlur {
    config: GaussianBlurConfig,
    kernel: Kernel,
    kernel_1d: Vec<f64>,
}

impl GaussianBlur {
    /// Validate the configuration and build the kernels.
    ///
    /// # Errors
    ///
    /// [`FilterError::InvalidKernelSize`] or [`FilterError::InvalidSigma`].
    pub fn new(config: GaussianBlurConfig) -> Result<Self, FilterError> {
        config.validate()?;
        let kernel = Kernel::gaussian(config.kernel_size, config.sigma)?;
        let kernel_1d = kernels::gaussian_kernel_1d(config.kernel_size, config.sigma)?;
        Ok(Self {
            config,
            kernel,
            kernel_1d,
        })
    }

    /// The configuration this filter was built from.
    pub fn config(&self) -> &GaussianBlurConfig {
        &self.config
    }

    /// The 2D kernel.
    pub fn kernel(&self) -> &Kernel {
        &self.kernel
    }

    /// Blur `src` into a new image of the same size.
    pub fn apply<T, const C: usize>(&self, src: &Image<T, C>) -> Result<Image<T, C>, FilterError>
    where
        T: PixelValue,
    {
        let mut dst = Image::from_size_val(src.size(), T::from_f64(0.0))?;
        self.apply_into(src, &mut dst)?;
        Ok(dst)
    }

    /// Blur `src` into `dst`.
    ///
    /// PRECONDITION: `src` and `dst` must have the same shape.
    pub fn apply_into<T, const C: usize>(
        &self,
        src: &Image<T, C>,
        dst: &mut Image<T, C>,
    ) -> Result<(), FilterError>
    where
        T: PixelValue,
    {
        match self.config.method {
            ConvolutionMethod::Direct => {
                convolve2d_into(src, dst, &self.kernel, self.config.strategy)
            }
            ConvolutionMethod::Separable => separable_filter(
                src,
                dst,
                &self.kernel_1d,
                &self.kernel_1d,
                self.config.strategy,
            ),
        }
    }
}

/// Blur an image using a gaussian blur filter
///
/// Invalid parameters are reported before anything is allocated or convolved.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `config` - The kernel size, sigma, method and execution strategy.
///
/// # Returns
///
/// A new image with the size of `src`.
///
/// # Examples
///
/// ```
/// use gaussblur_image::{Image, ImageSize};
/// use gaussblur_imgproc::filter::{gaussian_blur, GaussianBlurConfig};
///
/// let img = Image::<u8, 3>::from_size_val(ImageSize { width: 3, height: 3 }, 100).unwrap();
/// let blurred = gaussian_blur(&img, &GaussianBlurConfig::new(3, 5.0)).unwrap();
/// assert_eq!(blurred.as_slice(), &[100u8; 27]);
/// ```
pub fn gaussian_blur<T, const C: usize>(
    src: &Image<T, C>,
    config: &GaussianBlurConfig,
) -> Result<Image<T, C>, FilterError>
where
    T: PixelValue,
{
    GaussianBlur::new(*config)?.apply(src)
}

/// Blur an image using a gaussian blur filter into a preallocated destination.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `dst` - The destination image with shape (H, W, C).
/// * `config` - The kernel size, sigma, method and execution strategy.
///
/// PRECONDITION: `src` and `dst` must have the same shape.
pub fn gaussian_blur_into<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    config: &GaussianBlurConfig,
) -> Result<(), FilterError>
where
    T: PixelValue,
{
    GaussianBlur::new(*config)?.apply_into(src, dst)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gaussblur_image::ImageSize;

    #[test]
    fn test_default_config() {
        let config = GaussianBlurConfig::default();
        assert_eq!(config.kernel_size, 3);
        assert_eq!(config.sigma, 0.2);
        assert_eq!(config.method, ConvolutionMethod::Direct);
        assert_eq!(config.strategy, ExecutionStrategy::Auto);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_gaussian_blur_flat_3x3() -> Result<(), FilterError> {
        let size = ImageSize {
            width: 3,
            height: 3,
        };
        let img = Image::<u8, 3>::from_size_val(size, 100)?;

        for method in [ConvolutionMethod::Direct, ConvolutionMethod::Separable] {
            let config = GaussianBlurConfig::new(3, 5.0).with_method(method);
            let dst = gaussian_blur(&img, &config)?;
            assert_eq!(dst.as_slice(), &[100u8; 27], "{method:?}");
        }
        Ok(())
    }

    #[test]
    fn test_gaussian_blur_f32_ramp() -> Result<(), FilterError> {
        let size = ImageSize {
            width: 5,
            height: 5,
        };
        let img = Image::<f32, 1>::new(size, (0..25).map(|x| x as f32).collect())?;

        let dst = gaussian_blur(&img, &GaussianBlurConfig::new(3, 0.5))?;

        // a linear ramp is preserved away from the border by a symmetric kernel
        for y in 1..4 {
            for x in 1..4 {
                let got = *dst.get_pixel(x, y, 0)?;
                let expected = (y * 5 + x) as f32;
                assert!((got - expected).abs() < 1e-4, "({x}, {y}): {got}");
            }
        }
        // clamping pulls the top-left corner towards its own value
        assert!(*dst.get_pixel(0, 0, 0)? > 0.0);
        assert!(*dst.get_pixel(0, 0, 0)? < 1.0);
        Ok(())
    }

    #[test]
    fn test_gaussian_blur_invalid_params() -> Result<(), FilterError> {
        let img = Image::<u8, 3>::from_size_val([3, 3].into(), 10)?;

        let res = gaussian_blur(&img, &GaussianBlurConfig::new(4, 1.0));
        assert_eq!(res, Err(FilterError::InvalidKernelSize(4)));

        let res = gaussian_blur(&img, &GaussianBlurConfig::new(3, 0.0));
        assert_eq!(res, Err(FilterError::InvalidSigma(0.0)));
        Ok(())
    }

    #[test]
    fn test_gaussian_blur_into_untouched_on_error() -> Result<(), FilterError> {
        let img = Image::<u8, 3>::from_size_val([3, 3].into(), 10)?;
        let mut dst = Image::<u8, 3>::from_size_val([3, 3].into(), 42)?;

        let res = gaussian_blur_into(&img, &mut dst, &GaussianBlurConfig::new(2, 1.0));
        assert_eq!(res, Err(FilterError::InvalidKernelSize(2)));
        assert_eq!(dst.as_slice(), &[42u8; 27]);
        Ok(())
    }

    #[test]
    fn test_gaussian_blur_reuse() -> Result<(), FilterError> {
        let blur = GaussianBlur::new(GaussianBlurConfig::new(5, 1.0))?;
        assert_eq!(blur.kernel().size(), 5);
        assert_eq!(blur.config().sigma, 1.0);

        let a = Image::<u8, 3>::from_size_val([8, 8].into(), 7)?;
        let b = Image::<u8, 3>::from_size_val([4, 2].into(), 250)?;
        assert_eq!(blur.apply(&a)?, a);
        assert_eq!(blur.apply(&b)?, b);
        Ok(())
    }
}
