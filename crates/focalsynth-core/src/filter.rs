use ndarray::{Array3, ArrayD, ArrayView2, ArrayView3, ArrayViewMut3, Axis, Ix2, Ix3, Zip};
use num_complex::Complex64;
use rayon::prelude::*;

use crate::consts::PARALLEL_PLANE_THRESHOLD;
use crate::error::{FocalError, Result};
use crate::image::{Image, LayerStack, Spectrum, StackSpectrum};
use crate::psf::{Kernel, KernelFamily};

/// Multiply every channel of a spectrum element-wise by `kernel`.
pub fn apply(spectrum: &Spectrum, kernel: &Kernel) -> Result<Spectrum> {
    check_plane(spectrum.height(), spectrum.width(), kernel.height(), kernel.width())?;
    Ok(Image::new(filter_layer(spectrum.data.view(), kernel.data.view())))
}

/// Multiply every layer of a stack by the same kernel.
pub fn apply_stack(stack: &StackSpectrum, kernel: &Kernel) -> Result<StackSpectrum> {
    check_plane(stack.height(), stack.width(), kernel.height(), kernel.width())?;
    Ok(map_layers(stack, |_| kernel.data.view()))
}

/// Multiply layer `l` of a stack by kernel `l` of `family`.
pub fn apply_per_layer(stack: &StackSpectrum, family: &KernelFamily) -> Result<StackSpectrum> {
    if family.len() != stack.layers() {
        return Err(FocalError::DimensionMismatch(format!(
            "{} filters given for {} layers",
            family.len(),
            stack.layers()
        )));
    }
    check_plane(stack.height(), stack.width(), family.height(), family.width())?;
    Ok(map_layers(stack, |l| family.kernel_view(l)))
}

/// Rank-dispatching form of [`apply`], [`apply_stack`] and [`apply_per_layer`].
///
/// A rank-3 spectrum takes a rank-2 filter; a rank-4 spectrum takes a rank-2
/// filter (broadcast) or a rank-3 filter (one per layer).
pub fn apply_dyn(spectrum: &ArrayD<Complex64>, filter: &ArrayD<Complex64>) -> Result<ArrayD<Complex64>> {
    match (spectrum.ndim(), filter.ndim()) {
        (3, 2) => {
            let image = Image::from_dyn(spectrum.clone())?;
            Ok(apply(&image, &kernel_from_dyn(filter)?)?.into_dyn())
        }
        (4, 2) => {
            let stack = LayerStack::from_dyn(spectrum.clone())?;
            Ok(apply_stack(&stack, &kernel_from_dyn(filter)?)?.into_dyn())
        }
        (4, 3) => {
            let stack = LayerStack::from_dyn(spectrum.clone())?;
            let family = filter
                .clone()
                .into_dimensionality::<Ix3>()
                .map(KernelFamily::new)
                .map_err(|_| FocalError::Shape {
                    expected: "3 ([layer, height, width])",
                    actual: filter.ndim(),
                })?;
            Ok(apply_per_layer(&stack, &family)?.into_dyn())
        }
        (3, rank) => Err(FocalError::Shape {
            expected: "2 (one filter for a single image)",
            actual: rank,
        }),
        (4, rank) => Err(FocalError::Shape {
            expected: "2 or 3",
            actual: rank,
        }),
        (rank, _) => Err(FocalError::Shape {
            expected: "3 or 4",
            actual: rank,
        }),
    }
}

fn kernel_from_dyn(filter: &ArrayD<Complex64>) -> Result<Kernel> {
    filter
        .clone()
        .into_dimensionality::<Ix2>()
        .map(Kernel::new)
        .map_err(|_| FocalError::Shape {
            expected: "2 ([height, width])",
            actual: filter.ndim(),
        })
}

fn check_plane(height: usize, width: usize, kh: usize, kw: usize) -> Result<()> {
    if (height, width) != (kh, kw) {
        return Err(FocalError::DimensionMismatch(format!(
            "filter is {}x{}, spectrum is {}x{}",
            kw, kh, width, height
        )));
    }
    Ok(())
}

/// Filter each layer independently; `kernel_for` picks the kernel of layer `l`.
fn map_layers<'k, F>(stack: &StackSpectrum, kernel_for: F) -> StackSpectrum
where
    F: Fn(usize) -> ArrayView2<'k, Complex64> + Sync,
{
    let (l, h, w, c) = stack.dim();
    let layers: Vec<Array3<Complex64>> = if l >= PARALLEL_PLANE_THRESHOLD {
        (0..l)
            .into_par_iter()
            .map(|i| filter_layer(stack.layer_view(i), kernel_for(i)))
            .collect()
    } else {
        (0..l)
            .map(|i| filter_layer(stack.layer_view(i), kernel_for(i)))
            .collect()
    };

    let mut result = LayerStack::zeros(l, h, w, c);
    for (i, layer) in layers.into_iter().enumerate() {
        result.data.index_axis_mut(Axis(0), i).assign(&layer);
    }
    result
}

/// `[H, W, C]` layer times a `[H, W]` kernel, broadcast over channels.
pub(crate) fn filter_layer(
    layer: ArrayView3<'_, Complex64>,
    kernel: ArrayView2<'_, Complex64>,
) -> Array3<Complex64> {
    let mut result = layer.to_owned();
    for mut plane in result.axis_iter_mut(Axis(2)) {
        Zip::from(&mut plane).and(kernel).for_each(|s, &k| *s *= k);
    }
    result
}

/// `acc += layer * kernel`, without materializing the filtered layer.
pub(crate) fn accumulate_filtered(
    acc: &mut ArrayViewMut3<'_, Complex64>,
    layer: ArrayView3<'_, Complex64>,
    kernel: ArrayView2<'_, Complex64>,
) {
    for (mut acc_plane, plane) in acc.axis_iter_mut(Axis(2)).zip(layer.axis_iter(Axis(2))) {
        Zip::from(&mut acc_plane)
            .and(plane)
            .and(kernel)
            .for_each(|a, &s, &k| *a += s * k);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulate_matches_filter_then_add() {
        let layer = Array3::from_shape_fn((2, 3, 2), |(r, c, ch)| {
            Complex64::new((r + c) as f64, ch as f64)
        });
        let kernel = ndarray::Array2::from_shape_fn((2, 3), |(r, c)| Complex64::new(0.5, (r * c) as f64));

        let filtered = filter_layer(layer.view(), kernel.view());
        let mut acc = Array3::from_elem((2, 3, 2), Complex64::new(1.0, 0.0));
        accumulate_filtered(&mut acc.view_mut(), layer.view(), kernel.view());

        for (a, f) in acc.iter().zip(filtered.iter()) {
            assert!((a - (f + Complex64::new(1.0, 0.0))).norm() < 1e-12);
        }
    }
}
