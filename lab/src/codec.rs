use std::path::Path;

use image::{GrayImage, RgbImage, imageops::FilterType};
use layer_engine::Image;
use log::info;

use crate::error::{LabErr, Result};

/// Reads the image at `path` as RGB, downscaling it when its longer side exceeds `max_side`.
///
/// # Arguments
/// * `path` - Any format the `image` crate was built with.
/// * `max_side` - The longest side allowed, the aspect ratio is kept.
pub fn decode<P: AsRef<Path>>(path: P, max_side: u32) -> Result<Image> {
    let mut img = image::open(path.as_ref())?;

    if img.width().max(img.height()) > max_side {
        let (w, h) = (img.width(), img.height());
        img = img.resize(max_side, max_side, FilterType::Triangle);
        info!("downscaled input from {w}x{h} to {}x{}", img.width(), img.height());
    }

    from_rgb(img.to_rgb8())
}

/// Converts an 8-bit RGB buffer to an engine image.
pub fn from_rgb(rgb: RgbImage) -> Result<Image> {
    let (width, height) = (rgb.width() as usize, rgb.height() as usize);
    Image::from_rgb8(height, width, rgb.as_raw())
        .map_err(|e| LabErr::InvalidRequest(e.to_string()))
}

/// Writes `image` to `path` with the format picked by its extension.
///
/// Values are clamped to `[0, 1]` before quantizing. Three channel images are saved as RGB,
/// single channel ones as grayscale.
pub fn encode<P: AsRef<Path>>(image: &Image, path: P) -> Result<()> {
    let (width, height) = (image.width() as u32, image.height() as u32);
    let bytes = image.to_bytes();
    let bad_buffer = || LabErr::InvalidRequest(format!("can't encode a {} image", image.shape()));

    match image.channels() {
        3 => RgbImage::from_raw(width, height, bytes)
            .ok_or_else(bad_buffer)?
            .save(path)?,
        1 => GrayImage::from_raw(width, height, bytes)
            .ok_or_else(bad_buffer)?
            .save(path)?,
        _ => return Err(bad_buffer()),
    }

    Ok(())
}
