//! Focal-stack synthesis in the frequency domain.
//!
//! Source depth layer `n` appears in focus plane `m` blurred by the PSF for
//! distance `|m - n|`:
//!
//! ```text
//! output[m] = sum_n filter(layers[n], kernel[|m - n|])
//! ```
//!
//! Only `L` distinct kernels exist for `L` layers. They are built once and
//! shared read-only across all `L^2` pair terms. The sum is not normalized by
//! `L`; callers wanting an energy-preserving average divide the result
//! themselves (see [`crate::image::LayerStack::scaled`]).

use ndarray::{Array3, Axis};
use num_complex::Complex64;
use rayon::prelude::*;
use tracing::debug;

use crate::consts::{PARALLEL_PIXEL_THRESHOLD, PARALLEL_PLANE_THRESHOLD};
use crate::error::{FocalError, Result};
use crate::filter::{accumulate_filtered, filter_layer};
use crate::image::{Image, LayerStack, Spectrum, StackSpectrum};
use crate::psf::{FrequencyGrid, KernelFamily, PointSpreadFunction};

/// Build the distance-indexed kernel family for `layers` layers.
///
/// Kernel 0 is the identity; kernel `d > 0` is `psf.kernel(grid, sigma * d)`.
pub fn kernel_family(
    grid: &FrequencyGrid,
    layers: usize,
    sigma: f64,
    psf: &dyn PointSpreadFunction,
) -> KernelFamily {
    let (h, w) = grid.dim();
    let mut data = Array3::from_elem((layers, h, w), Complex64::new(1.0, 0.0));
    for d in 1..layers {
        let kernel = psf.kernel(grid, sigma * d as f64);
        data.index_axis_mut(Axis(0), d).assign(&kernel.data);
    }
    debug!(
        layers,
        sigma,
        psf = psf.name(),
        "Built focal-stack kernel family"
    );
    KernelFamily::new(data)
}

/// Synthesize a focal stack from per-layer spectra `[L, H, W, C]`.
pub fn synthesize(
    layer_spectra: &StackSpectrum,
    sigma: f64,
    psf: &dyn PointSpreadFunction,
) -> Result<StackSpectrum> {
    let (l, h, w, _) = layer_spectra.dim();
    if l == 0 {
        return Err(FocalError::EmptyStack);
    }

    let grid = FrequencyGrid::new(h, w);
    let family = kernel_family(&grid, l, sigma, psf);
    synthesize_with_family(layer_spectra, &family)
}

/// Synthesize with a precomputed family (`family.len()` must equal `L`).
pub fn synthesize_with_family(
    layer_spectra: &StackSpectrum,
    family: &KernelFamily,
) -> Result<StackSpectrum> {
    let (l, h, w, c) = layer_spectra.dim();
    if l == 0 {
        return Err(FocalError::EmptyStack);
    }
    check_family(layer_spectra, family)?;

    let focus_plane = |m: usize| -> Array3<Complex64> {
        let mut acc = Array3::<Complex64>::zeros((h, w, c));
        for n in 0..l {
            accumulate_filtered(
                &mut acc.view_mut(),
                layer_spectra.layer_view(n),
                family.kernel_view(m.abs_diff(n)),
            );
        }
        acc
    };

    let parallel = l >= PARALLEL_PLANE_THRESHOLD || l * h * w >= PARALLEL_PIXEL_THRESHOLD;
    debug!(layers = l, height = h, width = w, channels = c, parallel, "Synthesizing focal stack");

    let planes: Vec<Array3<Complex64>> = if parallel && l > 1 {
        (0..l).into_par_iter().map(focus_plane).collect()
    } else {
        (0..l).map(focus_plane).collect()
    };

    let mut result = LayerStack::zeros(l, h, w, c);
    for (m, plane) in planes.into_iter().enumerate() {
        result.data.index_axis_mut(Axis(0), m).assign(&plane);
    }
    Ok(result)
}

/// Contribution of source layer `n` to focus plane `m`:
/// `filter(layer_spectra[n], family[|m - n|])`.
///
/// Each pair term is independent; summing over `n` gives output layer `m`.
pub fn pair_contribution(
    layer_spectra: &StackSpectrum,
    family: &KernelFamily,
    m: usize,
    n: usize,
) -> Result<Spectrum> {
    check_family(layer_spectra, family)?;
    let l = layer_spectra.layers();
    if m >= l || n >= l {
        return Err(FocalError::DimensionMismatch(format!(
            "layer pair ({}, {}) out of range for {} layers",
            m, n, l
        )));
    }
    Ok(Image::new(filter_layer(
        layer_spectra.layer_view(n),
        family.kernel_view(m.abs_diff(n)),
    )))
}

fn check_family(layer_spectra: &StackSpectrum, family: &KernelFamily) -> Result<()> {
    if family.len() != layer_spectra.layers() {
        return Err(FocalError::DimensionMismatch(format!(
            "kernel family has {} entries for {} layers",
            family.len(),
            layer_spectra.layers()
        )));
    }
    if (family.height(), family.width()) != (layer_spectra.height(), layer_spectra.width()) {
        return Err(FocalError::DimensionMismatch(format!(
            "kernel family is {}x{}, layers are {}x{}",
            family.width(),
            family.height(),
            layer_spectra.width(),
            layer_spectra.height()
        )));
    }
    Ok(())
}
