use gaussblur_image::{Image, PixelValue};

use super::convolution::clamp_to_edge;
use crate::{
    error::FilterError,
    parallel::{self, ExecutionStrategy},
};

/// A separable 2D filter that applies horizontal and vertical 1D convolutions sequentially.
///
/// This struct caches the kernel data and precomputed offsets for efficient filtering.
struct SeparableFilter<'a> {
    kernel_x: &'a [f64],
    kernel_y: &'a [f64],
    offsets_x: Vec<isize>,
    offsets_y: Vec<isize>,
}

impl<'a> SeparableFilter<'a> {
    /// Create a new separable filter with the given kernels.
    ///
    /// # Arguments
    ///
    /// * `kernel_x` - The horizontal convolution kernel
    /// * `kernel_y` - The vertical convolution kernel
    fn new(kernel_x: &'a [f64], kernel_y: &'a [f64]) -> Self {
        let half_x = kernel_x.len() / 2;
        let half_y = kernel_y.len() / 2;

        let offsets_x = (0..kernel_x.len())
            .map(|i| i as isize - half_x as isize)
            .collect();

        let offsets_y = (0..kernel_y.len())
            .map(|i| i as isize - half_y as isize)
            .collect();

        Self {
            kernel_x,
            kernel_y,
            offsets_x,
            offsets_y,
        }
    }

    /// Apply the filter to an image.
    ///
    /// Performs horizontal filtering into an `f64` buffer followed by vertical filtering
    /// into `dst`, so the values are only converted back to `T` once.
    fn apply<T, const C: usize>(
        &self,
        src: &Image<T, C>,
        dst: &mut Image<T, C>,
        strategy: ExecutionStrategy,
    ) -> Result<(), FilterError>
    where
        T: PixelValue,
    {
        let rows = src.rows();
        let cols = src.cols();
        let row_len = cols * C;
        let alpha = Image::<T, C>::ALPHA_CHANNEL;

        let src_data = src.as_slice();
        let mut temp = vec![0.0f64; src_data.len()];

        // Horizontal
        parallel::for_each_row::<_, C, _>(strategy, &mut temp, cols, |r, row_temp| {
            let src_row = &src_data[r * row_len..(r + 1) * row_len];
            for c in 0..cols {
                let mut acc = [0.0f64; C];
                for (&k, &off) in self.kernel_x.iter().zip(self.offsets_x.iter()) {
                    let x = clamp_to_edge(c as isize + off, cols);
                    let px = &src_row[x * C..(x + 1) * C];
                    for (acc_val, &val) in acc.iter_mut().zip(px.iter()) {
                        *acc_val += val.to_f64() * k;
                    }
                }
                row_temp[c * C..(c + 1) * C].copy_from_slice(&acc);
            }
        })?;

        // Vertical
        let temp = temp.as_slice();
        parallel::for_each_row::<_, C, _>(strategy, dst.as_slice_mut(), cols, |r, row_dst| {
            for c in 0..cols {
                let mut acc = [0.0f64; C];
                for (&k, &off) in self.kernel_y.iter().zip(self.offsets_y.iter()) {
                    let y = clamp_to_edge(r as isize + off, rows);
                    let idx = y * row_len + c * C;
                    for (acc_val, &val) in acc.iter_mut().zip(temp[idx..idx + C].iter()) {
                        *acc_val += val * k;
                    }
                }

                let out_idx = c * C;
                for (ch, &acc_val) in acc.iter().enumerate() {
                    row_dst[out_idx + ch] = if alpha == Some(ch) {
                        src_data[r * row_len + out_idx + ch]
                    } else {
                        T::from_f64(acc_val)
                    };
                }
            }
        })?;

        Ok(())
    }
}

/// Apply a separable filter to an image.
///
/// Both passes sample neighbours outside the image from the nearest border pixel.
/// For two and four channel images the alpha channel is copied from the source pixel.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `dst` - The destination image with shape (H, W, C).
/// * `kernel_x` - The horizontal kernel, odd length.
/// * `kernel_y` - The vertical kernel, odd length.
/// * `strategy` - Execution strategy: `Serial`, `Parallel`, `Auto` or `Fixed`.
///
/// PRECONDITION: `src` and `dst` must have the same shape.
pub fn separable_filter<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    kernel_x: &[f64],
    kernel_y: &[f64],
    strategy: ExecutionStrategy,
) -> Result<(), FilterError>
where
    T: PixelValue,
{
    for kernel in [kernel_x, kernel_y] {
        if kernel.len() % 2 == 0 {
            return Err(FilterError::InvalidKernelSize(kernel.len()));
        }
    }

    if src.size() != dst.size() {
        return Err(FilterError::DimensionMismatch(src.size(), dst.size()));
    }

    log::debug!(
        "separable convolution: {} kernel={}x{} strategy={:?}",
        src.size(),
        kernel_x.len(),
        kernel_y.len(),
        strategy
    );

    let filter = SeparableFilter::new(kernel_x, kernel_y);
    parallel::with_thread_pool(strategy, |strategy| filter.apply(src, dst, strategy))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::kernels;
    use gaussblur_image::ImageSize;

    #[test]
    fn test_separable_filter_f32() -> Result<(), FilterError> {
        let size = ImageSize {
            width: 5,
            height: 5,
        };

        #[rustfmt::skip]
        let img = Image::<f32, 1>::new(
            size,
            vec![
                0.0, 0.0, 0.0, 0.0, 0.0,
                0.0, 0.0, 0.0, 0.0, 0.0,
                0.0, 0.0, 1.0, 0.0, 0.0,
                0.0, 0.0, 0.0, 0.0, 0.0,
                0.0, 0.0, 0.0, 0.0, 0.0,
            ],
        )?;

        let mut dst = Image::<f32, 1>::from_size_val(size, 0.0)?;
        let kernel_x = vec![1.0, 1.0, 1.0];
        let kernel_y = vec![1.0, 1.0, 1.0];

        separable_filter(&img, &mut dst, &kernel_x, &kernel_y, ExecutionStrategy::Serial)?;

        #[rustfmt::skip]
        assert_eq!(
            dst.as_slice(),
            &[
                0.0, 0.0, 0.0, 0.0, 0.0,
                0.0, 1.0, 1.0, 1.0, 0.0,
                0.0, 1.0, 1.0, 1.0, 0.0,
                0.0, 1.0, 1.0, 1.0, 0.0,
                0.0, 0.0, 0.0, 0.0, 0.0,
            ]
        );

        Ok(())
    }

    #[test]
    fn test_separable_filter_replicates_border() -> Result<(), FilterError> {
        #[rustfmt::skip]
        let img = Image::<f32, 1>::new(
            [3, 2].into(),
            vec![
                3.0, 0.0, 0.0,
                0.0, 0.0, 0.0,
            ],
        )?;

        let mut dst = Image::<f32, 1>::from_size_val(img.size(), 0.0)?;
        let kernel = vec![1.0, 1.0, 1.0];
        separable_filter(&img, &mut dst, &kernel, &kernel, ExecutionStrategy::Serial)?;

        // the corner pixel is sampled 2x horizontally and 2x vertically
        #[rustfmt::skip]
        assert_eq!(
            dst.as_slice(),
            &[
                12.0, 6.0, 0.0,
                 6.0, 3.0, 0.0,
            ]
        );
        Ok(())
    }

    #[test]
    fn test_separable_filter_u8_flat() -> Result<(), FilterError> {
        let img = Image::<u8, 3>::from_size_val([6, 4].into(), 100)?;
        let mut dst = Image::<u8, 3>::from_size_val(img.size(), 0)?;
        let kernel = kernels::gaussian_kernel_1d(5, 5.0)?;

        separable_filter(&img, &mut dst, &kernel, &kernel, ExecutionStrategy::Serial)?;
        assert_eq!(dst, img);
        Ok(())
    }

    #[test]
    fn test_separable_filter_preserves_alpha() -> Result<(), FilterError> {
        let data = (0..16).flat_map(|i| [(i * 13) as u8, i as u8]).collect();
        let img = Image::<u8, 2>::new([4, 4].into(), data)?;
        let mut dst = Image::<u8, 2>::from_size_val(img.size(), 0)?;
        let kernel = kernels::gaussian_kernel_1d(3, 1.0)?;

        separable_filter(&img, &mut dst, &kernel, &kernel, ExecutionStrategy::Parallel)?;
        for (d, s) in dst.as_slice().chunks(2).zip(img.as_slice().chunks(2)) {
            assert_eq!(d[1], s[1]);
        }
        Ok(())
    }

    #[test]
    fn test_separable_filter_fixed_threads() -> Result<(), FilterError> {
        let data = (0..7 * 5 * 3).map(|i| (i * 37 % 256) as u8).collect();
        let img = Image::<u8, 3>::new([7, 5].into(), data)?;
        let kernel = kernels::gaussian_kernel_1d(5, 1.5)?;

        let mut expected = Image::<u8, 3>::from_size_val(img.size(), 0)?;
        separable_filter(&img, &mut expected, &kernel, &kernel, ExecutionStrategy::Serial)?;

        let mut dst = Image::<u8, 3>::from_size_val(img.size(), 0)?;
        separable_filter(&img, &mut dst, &kernel, &kernel, ExecutionStrategy::Fixed(2))?;
        assert_eq!(dst, expected);

        let res = separable_filter(&img, &mut dst, &kernel, &kernel, ExecutionStrategy::Fixed(0));
        assert!(matches!(res, Err(FilterError::Parallel(_))));
        Ok(())
    }

    #[test]
    fn test_separable_filter_even_kernel() -> Result<(), FilterError> {
        let img = Image::<f32, 1>::from_size_val([3, 3].into(), 0.0)?;
        let mut dst = img.clone();
        let res = separable_filter(
            &img,
            &mut dst,
            &[0.5, 0.5],
            &[1.0],
            ExecutionStrategy::Serial,
        );
        assert_eq!(res, Err(FilterError::InvalidKernelSize(2)));

        let res = separable_filter(&img, &mut dst, &[1.0], &[], ExecutionStrategy::Serial);
        assert_eq!(res, Err(FilterError::InvalidKernelSize(0)));
        Ok(())
    }

    #[test]
    fn test_separable_filter_size_mismatch() -> Result<(), FilterError> {
        let img = Image::<f32, 1>::from_size_val([3, 3].into(), 0.0)?;
        let mut dst = Image::<f32, 1>::from_size_val([2, 3].into(), 0.0)?;
        let res = separable_filter(&img, &mut dst, &[1.0], &[1.0], ExecutionStrategy::Serial);
        assert_eq!(
            res,
            Err(FilterError::DimensionMismatch([3, 3].into(), [2, 3].into()))
        );
        Ok(())
    }
}
