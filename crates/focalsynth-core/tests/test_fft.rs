mod common;

use ndarray::{Array3, ArrayD, IxDyn};
use num_complex::Complex64;

use focalsynth_core::error::FocalError;
use focalsynth_core::fft::{forward, forward_dyn, forward_stack, inverse, inverse_dyn, inverse_stack, Fft2d};
use focalsynth_core::image::Image;

use common::{assert_complex_close, assert_real_close, pattern_image, pattern_stack};

// ---------------------------------------------------------------------------
// Round-trip
// ---------------------------------------------------------------------------

#[test]
fn image_roundtrip_restores_samples() {
    let image = pattern_image(16, 12, 3);
    let restored = inverse(&forward(&image));
    assert_eq!(restored.dim(), (16, 12, 3));
    assert_real_close(restored.real().data.iter(), image.data.iter(), 1e-9);
    assert!(restored.data.iter().all(|z| z.im.abs() < 1e-9));
}

#[test]
fn image_roundtrip_odd_sizes() {
    let image = pattern_image(7, 9, 2);
    let restored = inverse(&forward(&image));
    assert_real_close(restored.real().data.iter(), image.data.iter(), 1e-9);
}

#[test]
fn image_roundtrip_large_parallel_path() {
    // 256x256 = 65536 pixels, exercises the parallel row/column passes
    let image = pattern_image(256, 256, 1);
    let restored = inverse(&forward(&image));
    assert_real_close(restored.real().data.iter(), image.data.iter(), 1e-9);
}

#[test]
fn stack_roundtrip_restores_samples() {
    let stack = pattern_stack(5, 8, 8, 3);
    let restored = inverse_stack(&forward_stack(&stack));
    assert_eq!(restored.dim(), (5, 8, 8, 3));
    assert_real_close(restored.real().data.iter(), stack.data.iter(), 1e-9);
}

// ---------------------------------------------------------------------------
// Per-plane independence
// ---------------------------------------------------------------------------

#[test]
fn stack_layers_transform_independently() {
    let stack = pattern_stack(3, 8, 6, 2);
    let spectra = forward_stack(&stack);
    for l in 0..3 {
        let single = forward(&stack.layer(l));
        assert_complex_close(spectra.layer_view(l).iter(), single.data.view().iter(), 1e-12);
    }
}

#[test]
fn channels_do_not_mix() {
    let mut image = Image::<f64>::zeros(4, 4, 3);
    image.data[[1, 2, 1]] = 10.0;
    let spectrum = forward(&image);
    for ch in [0, 2] {
        assert!(spectrum
            .data
            .index_axis(ndarray::Axis(2), ch)
            .iter()
            .all(|z| z.norm() < 1e-12));
    }
}

#[test]
fn impulse_at_origin_has_flat_spectrum() {
    let mut image = Image::<f64>::zeros(4, 6, 1);
    image.data[[0, 0, 0]] = 1.0;
    let spectrum = forward(&image);
    for z in spectrum.data.iter() {
        assert!((z - Complex64::new(1.0, 0.0)).norm() < 1e-12);
    }
}

#[test]
fn real_and_complex_input_agree() {
    let image = pattern_image(6, 6, 2);
    let complex = Image::new(image.data.mapv(|v| Complex64::new(v, 0.0)));
    assert_complex_close(forward(&image).data.iter(), forward(&complex).data.iter(), 1e-12);
}

#[test]
fn planner_matches_free_functions() {
    let image = pattern_image(8, 4, 3);
    let planner = Fft2d::new(8, 4);
    let spectrum = planner.forward_image(&image).unwrap();
    assert_complex_close(spectrum.data.iter(), forward(&image).data.iter(), 1e-12);
    let restored = planner.inverse_image(&spectrum).unwrap();
    assert_real_close(restored.real().data.iter(), image.data.iter(), 1e-9);
}

// ---------------------------------------------------------------------------
// Dynamic rank
// ---------------------------------------------------------------------------

#[test]
fn dyn_accepts_rank_three_and_four() {
    let image = pattern_image(4, 4, 3).data.into_dyn();
    let spectrum = forward_dyn(&image).unwrap();
    assert_eq!(spectrum.shape(), &[4, 4, 3]);
    let restored = inverse_dyn(&spectrum).unwrap();
    assert_real_close(restored.mapv(|z| z.re).iter(), image.iter(), 1e-9);

    let stack = pattern_stack(2, 4, 4, 3).data.into_dyn();
    assert_eq!(forward_dyn(&stack).unwrap().shape(), &[2, 4, 4, 3]);
}

#[test]
fn dyn_rejects_other_ranks() {
    let plane = ArrayD::<f64>::zeros(IxDyn(&[4, 4]));
    assert!(matches!(
        forward_dyn(&plane),
        Err(FocalError::Shape { actual: 2, .. })
    ));

    let five = ArrayD::<Complex64>::zeros(IxDyn(&[1, 2, 4, 4, 3]));
    assert!(matches!(
        inverse_dyn(&five),
        Err(FocalError::Shape { actual: 5, .. })
    ));
}

#[test]
fn output_is_fresh_array() {
    let image = Image::new(Array3::from_elem((2, 2, 1), 3.0f64));
    let before = image.clone();
    let _ = forward(&image);
    assert_eq!(image, before);
}
