/// Minimum pixel count (h*w) to use row/column-level Rayon parallelism
/// inside a single FFT plane.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// Minimum number of independent planes (layers) to process them with
/// Rayon instead of sequentially.
pub const PARALLEL_PLANE_THRESHOLD: usize = 4;

/// Default number of depth layers the source image is split into.
pub const DEFAULT_LAYER_COUNT: usize = 8;

/// Default blur rate: PSF sigma grows by this much per layer of distance.
pub const DEFAULT_SIGMA: f64 = 1.0;

/// Upper clamp for display quantization (8-bit sample range).
pub const DISPLAY_MAX: f64 = 255.0;
