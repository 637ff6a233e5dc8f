use std::f64::consts::TAU;

use ndarray::{Array2, Array3, ArrayView2, Axis};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{FocalError, Result};

// ---------------------------------------------------------------------------
// Frequency grid
// ---------------------------------------------------------------------------

/// Normalized frequency coordinates for an `[H, W]` plane.
///
/// `u[i, j] = j / W - 0.5` and `v[i, j] = i / H - 0.5`, so both lie in
/// `[-0.5, 0.5)` with the origin at the grid centre. Kernels evaluated on the
/// grid must be passed through [`zero_frequency_shift`] before use.
#[derive(Clone, Debug, PartialEq)]
pub struct FrequencyGrid {
    pub u: Array2<f64>,
    pub v: Array2<f64>,
}

impl FrequencyGrid {
    pub fn new(height: usize, width: usize) -> Self {
        let u = Array2::from_shape_fn((height, width), |(_, j)| j as f64 / width as f64 - 0.5);
        let v = Array2::from_shape_fn((height, width), |(i, _)| i as f64 / height as f64 - 0.5);
        Self { u, v }
    }

    pub fn height(&self) -> usize {
        self.u.nrows()
    }

    pub fn width(&self) -> usize {
        self.u.ncols()
    }

    pub fn dim(&self) -> (usize, usize) {
        self.u.dim()
    }

    /// Evaluate `f(u, v)` at every grid point and move the centre to `[0, 0]`.
    fn shifted_map<F>(&self, f: F) -> Kernel
    where
        F: Fn(f64, f64) -> Complex64,
    {
        let centered = ndarray::Zip::from(&self.u)
            .and(&self.v)
            .map_collect(|&u, &v| f(u, v));
        Kernel::new(zero_frequency_shift(&centered))
    }
}

/// Roll a centered plane by `floor(n/2)` along each axis so the grid centre
/// lands on index `[0, 0]`, matching DFT output ordering.
pub fn zero_frequency_shift<T: Clone>(centered: &Array2<T>) -> Array2<T> {
    let (h, w) = centered.dim();
    Array2::from_shape_fn((h, w), |(r, c)| {
        centered[[(r + h - h / 2) % h, (c + w - w / 2) % w]].clone()
    })
}

// ---------------------------------------------------------------------------
// Kernels
// ---------------------------------------------------------------------------

/// A single frequency-domain filter, shape = (height, width), DFT layout.
#[derive(Clone, Debug, PartialEq)]
pub struct Kernel {
    pub data: Array2<Complex64>,
}

impl Kernel {
    pub fn new(data: Array2<Complex64>) -> Self {
        Self { data }
    }

    /// All-ones kernel: leaves any spectrum unchanged.
    pub fn identity(height: usize, width: usize) -> Self {
        Self::new(Array2::from_elem((height, width), Complex64::new(1.0, 0.0)))
    }

    pub fn from_real(data: &Array2<f64>) -> Self {
        Self::new(data.mapv(|v| Complex64::new(v, 0.0)))
    }

    pub fn height(&self) -> usize {
        self.data.nrows()
    }

    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    pub fn dim(&self) -> (usize, usize) {
        self.data.dim()
    }
}

/// One kernel per layer (or per distance), shape = (layer, height, width).
#[derive(Clone, Debug, PartialEq)]
pub struct KernelFamily {
    pub data: Array3<Complex64>,
}

impl KernelFamily {
    pub fn new(data: Array3<Complex64>) -> Self {
        Self { data }
    }

    pub fn from_kernels(kernels: &[Kernel]) -> Result<Self> {
        let first = kernels.first().ok_or(FocalError::EmptyStack)?;
        let (h, w) = first.dim();

        let mut data = Array3::zeros((kernels.len(), h, w));
        for (i, kernel) in kernels.iter().enumerate() {
            if kernel.dim() != (h, w) {
                return Err(FocalError::DimensionMismatch(format!(
                    "kernel {} is {}x{}, expected {}x{}",
                    i,
                    kernel.width(),
                    kernel.height(),
                    w,
                    h
                )));
            }
            data.index_axis_mut(Axis(0), i).assign(&kernel.data);
        }

        Ok(Self::new(data))
    }

    pub fn len(&self) -> usize {
        self.data.dim().0
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn height(&self) -> usize {
        self.data.dim().1
    }

    pub fn width(&self) -> usize {
        self.data.dim().2
    }

    pub fn kernel_view(&self, index: usize) -> ArrayView2<'_, Complex64> {
        self.data.index_axis(Axis(0), index)
    }

    pub fn kernel(&self, index: usize) -> Kernel {
        Kernel::new(self.kernel_view(index).to_owned())
    }
}

// ---------------------------------------------------------------------------
// PSF evaluation on a grid
// ---------------------------------------------------------------------------

/// Cauchy-type PSF: `exp(-2*pi*sigma*hypot(u, v))`.
pub fn cauchy_psf_on_grid(grid: &FrequencyGrid, sigma: f64) -> Kernel {
    grid.shifted_map(|u, v| Complex64::new((-TAU * sigma * u.hypot(v)).exp(), 0.0))
}

/// Gaussian PSF: `exp(-2*pi*sigma*(u^2 + v^2))`. `sigma = 0` is the identity.
pub fn gaussian_psf_on_grid(grid: &FrequencyGrid, sigma: f64) -> Kernel {
    grid.shifted_map(|u, v| Complex64::new((-TAU * sigma * (u * u + v * v)).exp(), 0.0))
}

/// Pure phase-shift filter: `exp(i*2*pi*(u*dx + v*dy))`.
///
/// After filtering and inverse transforming, the sample at `(y, x)` is read
/// from `((y + dy) mod H, (x + dx) mod W)` for integer shifts on even grids.
pub fn translation_on_grid(grid: &FrequencyGrid, dx: f64, dy: f64) -> Kernel {
    grid.shifted_map(|u, v| Complex64::from_polar(1.0, TAU * (u * dx + v * dy)))
}

pub fn cauchy_psf(height: usize, width: usize, sigma: f64) -> Kernel {
    cauchy_psf_on_grid(&FrequencyGrid::new(height, width), sigma)
}

pub fn gaussian_psf(height: usize, width: usize, sigma: f64) -> Kernel {
    gaussian_psf_on_grid(&FrequencyGrid::new(height, width), sigma)
}

pub fn translation(height: usize, width: usize, dx: f64, dy: f64) -> Kernel {
    translation_on_grid(&FrequencyGrid::new(height, width), dx, dy)
}

// ---------------------------------------------------------------------------
// PSF strategies
// ---------------------------------------------------------------------------

/// A PSF family parameterized by a single blur strength.
///
/// The focal-stack synthesizer calls `kernel(grid, sigma * d)` for every
/// inter-layer distance `d > 0`.
pub trait PointSpreadFunction: Send + Sync {
    fn name(&self) -> &str;

    fn kernel(&self, grid: &FrequencyGrid, sigma: f64) -> Kernel;

    fn kernel_for_size(&self, height: usize, width: usize, sigma: f64) -> Kernel {
        self.kernel(&FrequencyGrid::new(height, width), sigma)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct GaussianPsf;

impl PointSpreadFunction for GaussianPsf {
    fn name(&self) -> &str {
        "Gaussian"
    }

    fn kernel(&self, grid: &FrequencyGrid, sigma: f64) -> Kernel {
        gaussian_psf_on_grid(grid, sigma)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct CauchyPsf;

impl PointSpreadFunction for CauchyPsf {
    fn name(&self) -> &str {
        "Cauchy"
    }

    fn kernel(&self, grid: &FrequencyGrid, sigma: f64) -> Kernel {
        cauchy_psf_on_grid(grid, sigma)
    }
}

/// Translation by `(dx, dy) * sigma` pixels.
///
/// Used in a focal stack this displaces each layer in proportion to its
/// distance from the focus plane instead of blurring it.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TranslationPsf {
    pub dx: f64,
    pub dy: f64,
}

impl PointSpreadFunction for TranslationPsf {
    fn name(&self) -> &str {
        "Translation"
    }

    fn kernel(&self, grid: &FrequencyGrid, sigma: f64) -> Kernel {
        translation_on_grid(grid, self.dx * sigma, self.dy * sigma)
    }
}

/// Serializable PSF selection, dispatching to the strategies above.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum PsfModel {
    #[default]
    Gaussian,
    Cauchy,
    Translation {
        dx: f64,
        dy: f64,
    },
}

impl std::fmt::Display for PsfModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gaussian => write!(f, "Gaussian"),
            Self::Cauchy => write!(f, "Cauchy"),
            Self::Translation { dx, dy } => write!(f, "Translation (dx={}, dy={})", dx, dy),
        }
    }
}

impl PointSpreadFunction for PsfModel {
    fn name(&self) -> &str {
        match self {
            Self::Gaussian => GaussianPsf.name(),
            Self::Cauchy => CauchyPsf.name(),
            Self::Translation { .. } => "Translation",
        }
    }

    fn kernel(&self, grid: &FrequencyGrid, sigma: f64) -> Kernel {
        match *self {
            Self::Gaussian => GaussianPsf.kernel(grid, sigma),
            Self::Cauchy => CauchyPsf.kernel(grid, sigma),
            Self::Translation { dx, dy } => TranslationPsf { dx, dy }.kernel(grid, sigma),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shift_moves_centre_to_origin() {
        let centered = Array2::from_shape_fn((4, 6), |(r, c)| r * 10 + c);
        let shifted = zero_frequency_shift(&centered);
        assert_eq!(shifted[[0, 0]], centered[[2, 3]]);
        assert_eq!(shifted[[2, 3]], centered[[0, 0]]);
        assert_eq!(shifted[[3, 5]], centered[[1, 2]]);
    }

    #[test]
    fn shift_odd_size_matches_roll() {
        // roll by floor(n/2): out[(i + n/2) % n] = in[i]
        let centered = Array2::from_shape_fn((3, 5), |(r, c)| r * 10 + c);
        let shifted = zero_frequency_shift(&centered);
        for r in 0..3 {
            for c in 0..5 {
                assert_eq!(shifted[[(r + 1) % 3, (c + 2) % 5]], centered[[r, c]]);
            }
        }
    }
}
