use std::path::Path;

use gaussblur_image::Image;

use crate::error::IoError;

/// Writes the given PNG _(rgb8)_ data to the given file path.
///
/// # Arguments
///
/// - `file_path` - The path to the PNG image.
/// - `image` - The image containing the RGB data.
pub fn write_image_png_rgb8(
    file_path: impl AsRef<Path>,
    image: &Image<u8, 3>,
) -> Result<(), IoError> {
    write_image_png_imp(file_path, image, image::ExtendedColorType::Rgb8)
}

/// Writes the given PNG _(rgba8)_ data to the given file path.
///
/// # Arguments
///
/// - `file_path` - The path to the PNG image.
/// - `image` - The image containing the RGBA data.
pub fn write_image_png_rgba8(
    file_path: impl AsRef<Path>,
    image: &Image<u8, 4>,
) -> Result<(), IoError> {
    write_image_png_imp(file_path, image, image::ExtendedColorType::Rgba8)
}

fn write_image_png_imp<const N: usize>(
    file_path: impl AsRef<Path>,
    image: &Image<u8, N>,
    color_type: image::ExtendedColorType,
) -> Result<(), IoError> {
    let size = image.size();
    image::save_buffer_with_format(
        file_path,
        image.as_slice(),
        size.width as u32,
        size.height as u32,
        color_type,
        image::ImageFormat::Png,
    )?;
    Ok(())
}
