use std::path::Path;

use gaussblur_image::Image;
use jpeg_encoder::{ColorType, Encoder};

use crate::error::IoError;

/// Writes the given JPEG _(rgb8)_ data to the given file path.
///
/// # Arguments
///
/// - `file_path` - The path to the JPEG image.
/// - `image` - The image containing the RGB data.
/// - `quality` - The quality of the JPEG encoding, range from 0 (lowest) to 100 (highest)
pub fn write_image_jpeg_rgb8(
    file_path: impl AsRef<Path>,
    image: &Image<u8, 3>,
    quality: u8,
) -> Result<(), IoError> {
    write_image_jpeg_imp(file_path, image, ColorType::Rgb, quality)
}

/// Writes the given JPEG _(grayscale)_ data to the given file path.
///
/// # Arguments
///
/// - `file_path` - The path to the JPEG image.
/// - `image` - The image containing the grayscale data.
/// - `quality` - The quality of the JPEG encoding, range from 0 (lowest) to 100 (highest)
pub fn write_image_jpeg_gray8(
    file_path: impl AsRef<Path>,
    image: &Image<u8, 1>,
    quality: u8,
) -> Result<(), IoError> {
    write_image_jpeg_imp(file_path, image, ColorType::Luma, quality)
}

fn write_image_jpeg_imp<const N: usize>(
    file_path: impl AsRef<Path>,
    image: &Image<u8, N>,
    color_type: ColorType,
    quality: u8,
) -> Result<(), IoError> {
    let size = image.size();
    let max = u16::MAX as usize;
    if size.width > max || size.height > max {
        return Err(IoError::ImageTooLarge(size.width, size.height, max));
    }

    let encoder = Encoder::new_file(file_path, quality)?;
    encoder.encode(
        image.as_slice(),
        size.width as u16,
        size.height as u16,
        color_type,
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_jpeg_rgb8() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("out.jpg");

        let image = Image::<u8, 3>::from_size_val([32, 16].into(), 200)?;
        write_image_jpeg_rgb8(&file_path, &image, 90)?;

        let bytes = std::fs::read(&file_path)?;
        // SOI marker
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
        Ok(())
    }

    #[test]
    fn write_jpeg_gray8() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("gray.jpg");

        let image = Image::<u8, 1>::from_size_val([8, 8].into(), 64)?;
        write_image_jpeg_gray8(&file_path, &image, 75)?;
        assert!(file_path.exists());
        Ok(())
    }
}
