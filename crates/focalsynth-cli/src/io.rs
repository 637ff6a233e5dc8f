use std::path::Path;

use anyhow::{bail, Context, Result};
use focalsynth_core::image::Image;
use image::{GrayImage, ImageFormat, RgbImage};
use ndarray::Array3;

/// Load an image file as `[height, width, channel]` samples in 0..255.
///
/// Color files load as 3 channels (RGB), grayscale files as 1.
pub fn load_image(path: &Path) -> Result<Image<f64>> {
    let img = image::open(path).with_context(|| format!("Failed to open {}", path.display()))?;

    let (w, h, channels, raw) = if img.color().has_color() {
        let rgb = img.to_rgb8();
        let (w, h) = rgb.dimensions();
        (w, h, 3, rgb.into_raw())
    } else {
        let gray = img.to_luma8();
        let (w, h) = gray.dimensions();
        (w, h, 1, gray.into_raw())
    };

    let data = Array3::from_shape_vec(
        (h as usize, w as usize, channels),
        raw.into_iter().map(f64::from).collect(),
    )?;
    Ok(Image::new(data))
}

/// Save 8-bit `[height, width, channel]` pixels, choosing the format from the
/// file extension (PNG unless `.tif`/`.tiff`).
pub fn save_pixels(pixels: &Array3<u8>, path: &Path) -> Result<()> {
    let (h, w, c) = pixels.dim();
    let raw: Vec<u8> = pixels.iter().copied().collect();

    let format = match path.extension().and_then(|e| e.to_str()) {
        Some("tiff" | "tif") => ImageFormat::Tiff,
        _ => ImageFormat::Png,
    };

    match c {
        1 => GrayImage::from_raw(w as u32, h as u32, raw)
            .context("buffer size matches dimensions")?
            .save_with_format(path, format)?,
        3 => RgbImage::from_raw(w as u32, h as u32, raw)
            .context("buffer size matches dimensions")?
            .save_with_format(path, format)?,
        _ => bail!("Cannot save an image with {} channels", c),
    }
    Ok(())
}
