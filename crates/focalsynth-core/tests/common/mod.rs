#![allow(dead_code)]

use ndarray::{Array2, Array3, Array4};
use num_complex::Complex64;

use focalsynth_core::image::{Image, LayerStack};

/// Deterministic, non-symmetric test image with samples in 0..255.
pub fn pattern_image(h: usize, w: usize, c: usize) -> Image<f64> {
    Image::new(Array3::from_shape_fn((h, w, c), |(r, col, ch)| {
        ((r * 37 + col * 11 + ch * 53 + r * col * 7) % 256) as f64
    }))
}

/// Stack of `l` distinct pattern images.
pub fn pattern_stack(l: usize, h: usize, w: usize, c: usize) -> LayerStack<f64> {
    LayerStack::new(Array4::from_shape_fn((l, h, w, c), |(n, r, col, ch)| {
        ((n * 71 + r * 37 + col * 11 + ch * 53 + r * col * 7) % 256) as f64
    }))
}

/// Frequency of DFT bin `k` for a length-`n` axis (same as numpy's fftfreq).
pub fn fft_freq(k: usize, n: usize) -> f64 {
    if k < n / 2 {
        k as f64 / n as f64
    } else {
        k as f64 / n as f64 - 1.0
    }
}

/// Closed-form Gaussian PSF in DFT layout.
pub fn gaussian_closed_form(h: usize, w: usize, sigma: f64) -> Array2<Complex64> {
    Array2::from_shape_fn((h, w), |(r, c)| {
        let u = fft_freq(c, w);
        let v = fft_freq(r, h);
        Complex64::new((-std::f64::consts::TAU * sigma * (u * u + v * v)).exp(), 0.0)
    })
}

pub fn assert_complex_close<'a, I>(actual: I, expected: I, tol: f64)
where
    I: IntoIterator<Item = &'a Complex64>,
{
    for (i, (a, e)) in actual.into_iter().zip(expected).enumerate() {
        assert!(
            (a - e).norm() <= tol * (1.0 + e.norm()),
            "element {i}: got {a}, expected {e}"
        );
    }
}

pub fn assert_real_close<'a, I>(actual: I, expected: I, tol: f64)
where
    I: IntoIterator<Item = &'a f64>,
{
    for (i, (a, e)) in actual.into_iter().zip(expected).enumerate() {
        assert!(
            (a - e).abs() <= tol * (1.0 + e.abs()),
            "element {i}: got {a}, expected {e}"
        );
    }
}
