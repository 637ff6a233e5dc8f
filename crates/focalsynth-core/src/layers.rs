use std::ops::Add;

use ndarray::{s, Array3, Axis};
use num_complex::Complex64;
use num_traits::Zero;
use tracing::warn;

use crate::consts::DISPLAY_MAX;
use crate::error::{FocalError, Result};
use crate::image::{Image, LayerStack};

/// Split an image into `layers` depth slices by horizontal bands.
///
/// Layer `n` is zero everywhere except rows `[n*delta, (n+1)*delta)`, copied
/// from the source, where `delta = height / layers`. When `layers` does not
/// divide the height the trailing rows are dropped.
pub fn split_horizontally(image: &Image<f64>, layers: usize) -> Result<LayerStack<f64>> {
    let (h, w, c) = image.dim();
    if layers == 0 || layers > h {
        return Err(FocalError::InvalidLayerCount { layers, height: h });
    }
    if h % layers != 0 {
        warn!(
            height = h,
            layers,
            dropped_rows = h % layers,
            "Image height is not divisible by the layer count"
        );
    }

    let delta = h / layers;
    let mut stack = LayerStack::zeros(layers, h, w, c);
    for n in 0..layers {
        let (from, to) = (delta * n, delta * (n + 1));
        stack
            .data
            .slice_mut(s![n, from..to, .., ..])
            .assign(&image.data.slice(s![from..to, .., ..]));
    }

    Ok(stack)
}

/// Sum all layers into one image.
pub fn overlay<T>(stack: &LayerStack<T>) -> Image<T>
where
    T: Clone + Zero + Add<Output = T>,
{
    Image::new(stack.data.sum_axis(Axis(0)))
}

/// Tile layers row-major into a grid of `ceil(sqrt(L))` columns.
///
/// Cells without a layer stay zero.
pub fn montage<T>(stack: &LayerStack<T>) -> Result<Image<T>>
where
    T: Clone + Zero,
{
    let (l, h, w, c) = stack.dim();
    if l == 0 {
        return Err(FocalError::EmptyStack);
    }

    let columns = (l as f64).sqrt().ceil() as usize;
    let rows = l.div_ceil(columns);

    let mut tiled = Array3::<T>::zeros((h * rows, w * columns, c));
    for i in 0..l {
        let (y, x) = ((i / columns) * h, (i % columns) * w);
        tiled
            .slice_mut(s![y..y + h, x..x + w, ..])
            .assign(&stack.layer_view(i));
    }

    Ok(Image::new(tiled))
}

/// Real part clamped to `[0, 255]` and truncated to `u8`.
pub fn to_display(spectrum: &Image<Complex64>) -> Array3<u8> {
    spectrum.data.mapv(|z| quantize(z.re))
}

pub fn to_display_real(image: &Image<f64>) -> Array3<u8> {
    image.data.mapv(quantize)
}

fn quantize(v: f64) -> u8 {
    v.clamp(0.0, DISPLAY_MAX) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantize_clamps_and_truncates() {
        assert_eq!(quantize(-3.0), 0);
        assert_eq!(quantize(12.9), 12);
        assert_eq!(quantize(300.0), 255);
    }
}
