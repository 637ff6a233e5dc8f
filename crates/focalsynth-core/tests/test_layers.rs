mod common;

use ndarray::{s, Array3};
use num_complex::Complex64;

use focalsynth_core::error::FocalError;
use focalsynth_core::image::{Image, LayerStack};
use focalsynth_core::layers::{montage, overlay, split_horizontally, to_display, to_display_real};

use common::pattern_image;

// ---------------------------------------------------------------------------
// split_horizontally
// ---------------------------------------------------------------------------

#[test]
fn split_copies_one_band_per_layer() {
    let image = pattern_image(8, 5, 3);
    let stack = split_horizontally(&image, 4).unwrap();
    assert_eq!(stack.dim(), (4, 8, 5, 3));

    for n in 0..4 {
        let layer = stack.layer(n);
        for r in 0..8 {
            let in_band = r / 2 == n;
            for c in 0..5 {
                for ch in 0..3 {
                    let expected = if in_band { image.data[[r, c, ch]] } else { 0.0 };
                    assert_eq!(layer.data[[r, c, ch]], expected, "layer {n} row {r}");
                }
            }
        }
    }
}

#[test]
fn split_then_overlay_restores_image() {
    let image = pattern_image(9, 4, 3);
    let stack = split_horizontally(&image, 3).unwrap();
    assert_eq!(overlay(&stack), image);
}

#[test]
fn split_truncates_trailing_rows() {
    let image = pattern_image(10, 4, 1);
    let stack = split_horizontally(&image, 3).unwrap();
    let restored = overlay(&stack);
    assert_eq!(
        restored.data.slice(s![..9, .., ..]),
        image.data.slice(s![..9, .., ..])
    );
    assert!(restored.data.slice(s![9, .., ..]).iter().all(|&v| v == 0.0));
}

#[test]
fn split_rejects_invalid_layer_counts() {
    let image = pattern_image(4, 4, 3);
    assert!(matches!(
        split_horizontally(&image, 0),
        Err(FocalError::InvalidLayerCount { layers: 0, height: 4 })
    ));
    assert!(matches!(
        split_horizontally(&image, 5),
        Err(FocalError::InvalidLayerCount { layers: 5, .. })
    ));
}

// ---------------------------------------------------------------------------
// montage
// ---------------------------------------------------------------------------

#[test]
fn montage_tiles_row_major_with_padding() {
    // 5 layers -> 3 columns, 2 rows; the last cell stays empty
    let stack = LayerStack::new(ndarray::Array4::from_shape_fn((5, 2, 3, 1), |(n, _, _, _)| {
        (n + 1) as f64
    }));
    let tiled = montage(&stack).unwrap();
    assert_eq!(tiled.dim(), (4, 9, 1));

    for n in 0..5 {
        let (y, x) = ((n / 3) * 2, (n % 3) * 3);
        assert!(tiled
            .data
            .slice(s![y..y + 2, x..x + 3, ..])
            .iter()
            .all(|&v| v == (n + 1) as f64));
    }
    assert!(tiled.data.slice(s![2..4, 6..9, ..]).iter().all(|&v| v == 0.0));
}

#[test]
fn montage_of_perfect_square() {
    let stack = LayerStack::<f64>::zeros(4, 3, 3, 2);
    assert_eq!(montage(&stack).unwrap().dim(), (6, 6, 2));
}

#[test]
fn montage_of_empty_stack_fails() {
    let stack = LayerStack::<f64>::zeros(0, 3, 3, 1);
    assert!(matches!(montage(&stack), Err(FocalError::EmptyStack)));
}

// ---------------------------------------------------------------------------
// Display conversion
// ---------------------------------------------------------------------------

#[test]
fn display_takes_clamped_real_part() {
    let spectrum = Image::new(Array3::from_shape_vec(
        (1, 4, 1),
        vec![
            Complex64::new(-5.0, 100.0),
            Complex64::new(127.7, -3.0),
            Complex64::new(255.0, 0.0),
            Complex64::new(1000.0, 0.0),
        ],
    )
    .unwrap());
    let pixels = to_display(&spectrum);
    assert_eq!(pixels.iter().copied().collect::<Vec<u8>>(), vec![0, 127, 255, 255]);
}

#[test]
fn display_real_matches_complex_path() {
    let image = pattern_image(3, 3, 3);
    let complex = Image::new(image.data.mapv(|v| Complex64::new(v, 0.0)));
    assert_eq!(to_display_real(&image), to_display(&complex));
}
