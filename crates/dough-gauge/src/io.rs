//! Bridging between `image` buffers and the core raster views.

use crate::DoughError;
use dough_gauge_core::{ChannelOrder, ColorImageView, Mask};
use image::{GrayImage, ImageReader, RgbImage};
use std::path::Path;

/// Decode any supported image file into packed RGB.
pub fn load_rgb(path: impl AsRef<Path>) -> Result<RgbImage, DoughError> {
    let path = path.as_ref();
    let to_err = |source| DoughError::ImageLoad {
        path: path.to_path_buf(),
        source,
    };
    let img = ImageReader::open(path)
        .map_err(|e| to_err(image::ImageError::IoError(e)))?
        .with_guessed_format()
        .map_err(|e| to_err(image::ImageError::IoError(e)))?
        .decode()
        .map_err(to_err)?;
    log::debug!(
        "loaded {} ({}x{})",
        path.display(),
        img.width(),
        img.height()
    );
    Ok(img.to_rgb8())
}

/// Convert an `image::RgbImage` into the lightweight core view type.
pub fn color_view(img: &RgbImage) -> ColorImageView<'_> {
    ColorImageView {
        width: img.width() as usize,
        height: img.height() as usize,
        order: ChannelOrder::Rgb,
        data: img.as_raw(),
    }
}

/// Mask as a displayable grayscale image.
pub fn mask_image(mask: &Mask) -> GrayImage {
    let (w, h) = (mask.width() as u32, mask.height() as u32);
    GrayImage::from_fn(w, h, |x, y| {
        let v = if mask.is_foreground(x as usize, y as usize) {
            255
        } else {
            0
        };
        image::Luma([v])
    })
}

/// Save an RGB image; the format follows the file extension.
pub fn save_rgb(img: &RgbImage, path: impl AsRef<Path>) -> Result<(), DoughError> {
    let path = path.as_ref();
    img.save(path).map_err(|source| DoughError::ImageSave {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("saved {}", path.display());
    Ok(())
}
