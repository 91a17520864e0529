use gaussblur_image::{Image, PixelValue};

use crate::{
    error::FilterError,
    filter::Kernel,
    parallel::{self, ExecutionStrategy},
};

/// Clamp a sampling coordinate to `[0, len)`, replicating the border pixel.
#[inline]
pub(crate) fn clamp_to_edge(pos: isize, len: usize) -> usize {
    pos.clamp(0, len as isize - 1) as usize
}

/// Convolve an image with a 2D kernel into a newly allocated image.
///
/// Neighbours outside the image are sampled from the nearest border pixel, so every
/// output pixel is a full weighted average. For two and four channel images the
/// alpha channel is copied from the source pixel.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `kernel` - The normalized kernel.
/// * `strategy` - How the rows are scheduled.
///
/// # Returns
///
/// The filtered image with the size of `src`.
pub fn convolve2d<T, const C: usize>(
    src: &Image<T, C>,
    kernel: &Kernel,
    strategy: ExecutionStrategy,
) -> Result<Image<T, C>, FilterError>
where
    T: PixelValue,
{
    let mut dst = Image::from_size_val(src.size(), T::from_f64(0.0))?;
    convolve2d_into(src, &mut dst, kernel, strategy)?;
    Ok(dst)
}

/// Convolve an image with a 2D kernel.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `dst` - The destination image with shape (H, W, C).
/// * `kernel` - The normalized kernel.
/// * `strategy` - How the rows are scheduled.
///
/// PRECONDITION: `src` and `dst` must have the same shape.
pub fn convolve2d_into<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    kernel: &Kernel,
    strategy: ExecutionStrategy,
) -> Result<(), FilterError>
where
    T: PixelValue,
{
    if src.size() != dst.size() {
        return Err(FilterError::DimensionMismatch(src.size(), dst.size()));
    }

    let rows = src.rows();
    let cols = src.cols();
    let row_len = cols * C;
    let src_data = src.as_slice();

    let ksize = kernel.size();
    let radius = kernel.radius() as isize;
    let weights = kernel.as_slice();
    let alpha = Image::<T, C>::ALPHA_CHANNEL;

    log::debug!(
        "direct convolution: {} kernel={}x{} strategy={:?}",
        src.size(),
        ksize,
        ksize,
        strategy
    );

    parallel::for_each_row::<_, C, _>(strategy, dst.as_slice_mut(), cols, |r, dst_row| {
        for c in 0..cols {
            let mut acc = [0.0f64; C];

            for (ky, kernel_row) in weights.chunks_exact(ksize).enumerate() {
                let sy = clamp_to_edge(r as isize + ky as isize - radius, rows);
                let src_row = &src_data[sy * row_len..(sy + 1) * row_len];

                for (kx, &w) in kernel_row.iter().enumerate() {
                    let sx = clamp_to_edge(c as isize + kx as isize - radius, cols);
                    let px = &src_row[sx * C..(sx + 1) * C];
                    for (acc_val, &val) in acc.iter_mut().zip(px.iter()) {
                        *acc_val += val.to_f64() * w;
                    }
                }
            }

            let out_idx = c * C;
            for (ch, &acc_val) in acc.iter().enumerate() {
                dst_row[out_idx + ch] = if alpha == Some(ch) {
                    src_data[r * row_len + out_idx + ch]
                } else {
                    T::from_f64(acc_val)
                };
            }
        }
    })?;

    Ok(())
}
