use std::path::Path;

use gaussblur_image::{Image, ImageSize, Rgb8, Rgba8};

use crate::{error::IoError, jpeg::write_image_jpeg_rgb8, png::write_image_png_rgb8};

/// Decode an image file of any format supported by the `image` crate.
fn decode_any(file_path: &Path) -> Result<image::DynamicImage, IoError> {
    // verify the file exists
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    let img = image::ImageReader::open(file_path)?
        .with_guessed_format()?
        .decode()?;

    log::debug!(
        "decoded {}: {}x{} {:?}",
        file_path.display(),
        img.width(),
        img.height(),
        img.color()
    );

    Ok(img)
}

/// Reads an image from the given file path as 8-bit RGB.
///
/// The format is guessed from the file contents; grayscale and alpha images are
/// converted to RGB.
///
/// # Arguments
///
/// * `file_path` - The path to a valid image file.
///
/// # Returns
///
/// An RGB image with three channels _(rgb8)_.
pub fn read_image_any_rgb8(file_path: impl AsRef<Path>) -> Result<Rgb8, IoError> {
    let img = decode_any(file_path.as_ref())?;
    let size = ImageSize {
        width: img.width() as usize,
        height: img.height() as usize,
    };
    Ok(Image::new(size, img.into_rgb8().into_raw())?)
}

/// Reads an image from the given file path as 8-bit RGBA.
///
/// Images without an alpha channel get a fully opaque one.
///
/// # Arguments
///
/// * `file_path` - The path to a valid image file.
///
/// # Returns
///
/// An RGBA image with four channels _(rgba8)_.
pub fn read_image_any_rgba8(file_path: impl AsRef<Path>) -> Result<Rgba8, IoError> {
    let img = decode_any(file_path.as_ref())?;
    let size = ImageSize {
        width: img.width() as usize,
        height: img.height() as usize,
    };
    Ok(Image::new(size, img.into_rgba8().into_raw())?)
}

/// Writes an RGB image, choosing the encoder from the file extension.
///
/// `jpg`/`jpeg` are written with [`write_image_jpeg_rgb8`] at `quality`,
/// `png` with [`write_image_png_rgb8`].
pub fn write_image_rgb8(
    file_path: impl AsRef<Path>,
    image: &Rgb8,
    quality: u8,
) -> Result<(), IoError> {
    let file_path = file_path.as_ref();
    let ext = file_path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => write_image_jpeg_rgb8(file_path, image, quality),
        Some("png") => write_image_png_rgb8(file_path, image),
        _ => Err(IoError::InvalidFileExtension(file_path.to_path_buf())),
    }
}
