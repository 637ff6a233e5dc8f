use std::sync::Arc;

use ndarray::{Array2, Array3, ArrayD, ArrayView3, Axis};
use num_complex::Complex64;
use rayon::prelude::*;
use rustfft::{Fft, FftPlanner};
use tracing::debug;

use crate::consts::{PARALLEL_PIXEL_THRESHOLD, PARALLEL_PLANE_THRESHOLD};
use crate::error::{FocalError, Result};
use crate::image::{Image, LayerStack, Spectrum, StackSpectrum};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Direction {
    Forward,
    Inverse,
}

/// Cached row/column FFT plans for one `(height, width)` plane size.
///
/// Every `[H, W]` plane of an image or stack is transformed independently:
/// rows first, then columns. The inverse is normalized by `1/(H*W)` so that
/// `inverse(forward(x)) == x`.
pub struct Fft2d {
    height: usize,
    width: usize,
    row_forward: Arc<dyn Fft<f64>>,
    col_forward: Arc<dyn Fft<f64>>,
    row_inverse: Arc<dyn Fft<f64>>,
    col_inverse: Arc<dyn Fft<f64>>,
}

impl Fft2d {
    pub fn new(height: usize, width: usize) -> Self {
        let mut planner = FftPlanner::new();
        Self {
            height,
            width,
            row_forward: planner.plan_fft_forward(width),
            col_forward: planner.plan_fft_forward(height),
            row_inverse: planner.plan_fft_inverse(width),
            col_inverse: planner.plan_fft_inverse(height),
        }
    }

    pub fn dim(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    /// Forward 2D DFT of a single plane.
    pub fn forward_plane(&self, plane: &Array2<Complex64>) -> Array2<Complex64> {
        self.transform_plane(plane.clone(), Direction::Forward)
    }

    /// Normalized inverse 2D DFT of a single plane.
    pub fn inverse_plane(&self, plane: &Array2<Complex64>) -> Array2<Complex64> {
        self.transform_plane(plane.clone(), Direction::Inverse)
    }

    pub fn forward_image<T>(&self, image: &Image<T>) -> Result<Spectrum>
    where
        T: Copy + Into<Complex64>,
    {
        self.check_dims(image.height(), image.width())?;
        Ok(Image::new(self.transform_channels(
            image.data.view(),
            Direction::Forward,
        )))
    }

    pub fn inverse_image(&self, spectrum: &Spectrum) -> Result<Spectrum> {
        self.check_dims(spectrum.height(), spectrum.width())?;
        Ok(Image::new(self.transform_channels(
            spectrum.data.view(),
            Direction::Inverse,
        )))
    }

    pub fn forward_stack<T>(&self, stack: &LayerStack<T>) -> Result<StackSpectrum>
    where
        T: Copy + Into<Complex64> + Send + Sync,
    {
        self.check_dims(stack.height(), stack.width())?;
        Ok(self.transform_layers(stack, Direction::Forward))
    }

    pub fn inverse_stack(&self, stack: &StackSpectrum) -> Result<StackSpectrum> {
        self.check_dims(stack.height(), stack.width())?;
        Ok(self.transform_layers(stack, Direction::Inverse))
    }

    fn check_dims(&self, height: usize, width: usize) -> Result<()> {
        if (height, width) != (self.height, self.width) {
            return Err(FocalError::DimensionMismatch(format!(
                "FFT planned for {}x{}, got {}x{}",
                self.width, self.height, width, height
            )));
        }
        Ok(())
    }

    /// Transform every layer as an independent image.
    fn transform_layers<T>(&self, stack: &LayerStack<T>, direction: Direction) -> StackSpectrum
    where
        T: Copy + Into<Complex64> + Send + Sync,
    {
        let (l, h, w, c) = stack.dim();
        let layers: Vec<Array3<Complex64>> = if l >= PARALLEL_PLANE_THRESHOLD {
            (0..l)
                .into_par_iter()
                .map(|i| self.transform_channels(stack.layer_view(i), direction))
                .collect()
        } else {
            (0..l)
                .map(|i| self.transform_channels(stack.layer_view(i), direction))
                .collect()
        };

        let mut result = LayerStack::zeros(l, h, w, c);
        for (i, layer) in layers.into_iter().enumerate() {
            result.data.index_axis_mut(Axis(0), i).assign(&layer);
        }
        result
    }

    /// Transform each channel plane of a `[H, W, C]` array.
    fn transform_channels<T>(&self, data: ArrayView3<'_, T>, direction: Direction) -> Array3<Complex64>
    where
        T: Copy + Into<Complex64>,
    {
        let mut result: Array3<Complex64> = data.mapv(Into::into);
        for c in 0..result.dim().2 {
            let plane = result.index_axis(Axis(2), c).to_owned();
            let transformed = self.transform_plane(plane, direction);
            result.index_axis_mut(Axis(2), c).assign(&transformed);
        }
        result
    }

    fn transform_plane(&self, mut plane: Array2<Complex64>, direction: Direction) -> Array2<Complex64> {
        let (row_fft, col_fft) = match direction {
            Direction::Forward => (&self.row_forward, &self.col_forward),
            Direction::Inverse => (&self.row_inverse, &self.col_inverse),
        };

        if self.height * self.width >= PARALLEL_PIXEL_THRESHOLD {
            fft_rows_parallel(&mut plane, row_fft);
            fft_cols_parallel(&mut plane, col_fft);
        } else {
            fft_rows_sequential(&mut plane, row_fft);
            fft_cols_sequential(&mut plane, col_fft);
        }

        if direction == Direction::Inverse {
            let scale = 1.0 / (self.height * self.width) as f64;
            plane.mapv_inplace(|z| z * scale);
        }

        plane
    }
}

// ---------------------------------------------------------------------------
// Row / column passes
// ---------------------------------------------------------------------------

fn fft_rows_sequential(plane: &mut Array2<Complex64>, fft: &Arc<dyn Fft<f64>>) {
    for mut row in plane.axis_iter_mut(Axis(0)) {
        let mut row_data = row.to_vec();
        fft.process(&mut row_data);
        row.assign(&ndarray::aview1(&row_data));
    }
}

fn fft_cols_sequential(plane: &mut Array2<Complex64>, fft: &Arc<dyn Fft<f64>>) {
    for mut col in plane.axis_iter_mut(Axis(1)) {
        let mut col_data = col.to_vec();
        fft.process(&mut col_data);
        col.assign(&ndarray::aview1(&col_data));
    }
}

fn fft_rows_parallel(plane: &mut Array2<Complex64>, fft: &Arc<dyn Fft<f64>>) {
    let (h, _) = plane.dim();
    let processed: Vec<Vec<Complex64>> = (0..h)
        .into_par_iter()
        .map(|row| {
            let mut row_data = plane.row(row).to_vec();
            fft.process(&mut row_data);
            row_data
        })
        .collect();
    for (row, row_data) in processed.into_iter().enumerate() {
        plane.row_mut(row).assign(&ndarray::aview1(&row_data));
    }
}

fn fft_cols_parallel(plane: &mut Array2<Complex64>, fft: &Arc<dyn Fft<f64>>) {
    let (_, w) = plane.dim();
    let processed: Vec<Vec<Complex64>> = (0..w)
        .into_par_iter()
        .map(|col| {
            let mut col_data = plane.column(col).to_vec();
            fft.process(&mut col_data);
            col_data
        })
        .collect();
    for (col, col_data) in processed.into_iter().enumerate() {
        plane.column_mut(col).assign(&ndarray::aview1(&col_data));
    }
}

// ---------------------------------------------------------------------------
// Free-function entry points
// ---------------------------------------------------------------------------

/// Forward 2D DFT of every channel of an image.
pub fn forward<T>(image: &Image<T>) -> Spectrum
where
    T: Copy + Into<Complex64>,
{
    let planner = Fft2d::new(image.height(), image.width());
    Image::new(planner.transform_channels(image.data.view(), Direction::Forward))
}

/// Normalized inverse 2D DFT of every channel of a spectrum.
pub fn inverse(spectrum: &Spectrum) -> Spectrum {
    let planner = Fft2d::new(spectrum.height(), spectrum.width());
    Image::new(planner.transform_channels(spectrum.data.view(), Direction::Inverse))
}

/// Forward 2D DFT of every (layer, channel) plane of a stack.
pub fn forward_stack<T>(stack: &LayerStack<T>) -> StackSpectrum
where
    T: Copy + Into<Complex64> + Send + Sync,
{
    debug!(dim = ?stack.dim(), "Forward FFT of layer stack");
    let planner = Fft2d::new(stack.height(), stack.width());
    planner.transform_layers(stack, Direction::Forward)
}

/// Normalized inverse 2D DFT of every (layer, channel) plane of a stack.
pub fn inverse_stack(stack: &StackSpectrum) -> StackSpectrum {
    debug!(dim = ?stack.dim(), "Inverse FFT of layer stack");
    let planner = Fft2d::new(stack.height(), stack.width());
    planner.transform_layers(stack, Direction::Inverse)
}

/// Forward transform of a rank-3 `[H,W,C]` or rank-4 `[L,H,W,C]` array.
pub fn forward_dyn<T>(data: &ArrayD<T>) -> Result<ArrayD<Complex64>>
where
    T: Copy + Into<Complex64> + Send + Sync,
{
    match data.ndim() {
        3 => Ok(forward(&Image::from_dyn(data.clone())?).into_dyn()),
        4 => Ok(forward_stack(&LayerStack::from_dyn(data.clone())?).into_dyn()),
        rank => Err(FocalError::Shape {
            expected: "3 or 4",
            actual: rank,
        }),
    }
}

/// Inverse transform of a rank-3 or rank-4 complex array.
pub fn inverse_dyn(data: &ArrayD<Complex64>) -> Result<ArrayD<Complex64>> {
    match data.ndim() {
        3 => Ok(inverse(&Image::from_dyn(data.clone())?).into_dyn()),
        4 => Ok(inverse_stack(&LayerStack::from_dyn(data.clone())?).into_dyn()),
        rank => Err(FocalError::Shape {
            expected: "3 or 4",
            actual: rank,
        }),
    }
}
