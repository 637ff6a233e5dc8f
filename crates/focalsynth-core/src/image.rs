use ndarray::{Array3, Array4, ArrayD, ArrayView3, Axis, Ix3, Ix4};
use num_complex::Complex64;
use num_traits::Zero;

use crate::error::{FocalError, Result};

/// A multi-channel image, shape = (height, width, channel).
///
/// Spatial images hold `f64` samples (typically 0..255); spectra hold
/// `Complex64` values in DFT layout.
#[derive(Clone, Debug, PartialEq)]
pub struct Image<T> {
    pub data: Array3<T>,
}

/// Frequency-domain image produced by [`crate::fft::forward`].
pub type Spectrum = Image<Complex64>;

impl<T> Image<T> {
    pub fn new(data: Array3<T>) -> Self {
        Self { data }
    }

    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    pub fn channels(&self) -> usize {
        self.data.dim().2
    }

    pub fn dim(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    /// Convert a dynamic-rank array into an image. Fails unless the rank is 3.
    pub fn from_dyn(data: ArrayD<T>) -> Result<Self> {
        let rank = data.ndim();
        data.into_dimensionality::<Ix3>()
            .map(Self::new)
            .map_err(|_| FocalError::Shape {
                expected: "3 ([height, width, channel])",
                actual: rank,
            })
    }

    pub fn into_dyn(self) -> ArrayD<T> {
        self.data.into_dyn()
    }
}

impl<T: Clone + Zero> Image<T> {
    pub fn zeros(height: usize, width: usize, channels: usize) -> Self {
        Self::new(Array3::zeros((height, width, channels)))
    }
}

impl Image<Complex64> {
    /// Real part of every sample.
    pub fn real(&self) -> Image<f64> {
        Image::new(self.data.mapv(|z| z.re))
    }
}

/// A stack of equally sized images, shape = (layer, height, width, channel).
///
/// Layer 0 is the nearest depth slice.
#[derive(Clone, Debug, PartialEq)]
pub struct LayerStack<T> {
    pub data: Array4<T>,
}

/// Frequency-domain layer stack.
pub type StackSpectrum = LayerStack<Complex64>;

impl<T> LayerStack<T> {
    pub fn new(data: Array4<T>) -> Self {
        Self { data }
    }

    pub fn layers(&self) -> usize {
        self.data.dim().0
    }

    pub fn height(&self) -> usize {
        self.data.dim().1
    }

    pub fn width(&self) -> usize {
        self.data.dim().2
    }

    pub fn channels(&self) -> usize {
        self.data.dim().3
    }

    pub fn dim(&self) -> (usize, usize, usize, usize) {
        self.data.dim()
    }

    pub fn is_empty(&self) -> bool {
        self.layers() == 0
    }

    /// Borrow one layer as a `[height, width, channel]` view.
    pub fn layer_view(&self, index: usize) -> ArrayView3<'_, T> {
        self.data.index_axis(Axis(0), index)
    }

    /// Convert a dynamic-rank array into a stack. Fails unless the rank is 4.
    pub fn from_dyn(data: ArrayD<T>) -> Result<Self> {
        let rank = data.ndim();
        data.into_dimensionality::<Ix4>()
            .map(Self::new)
            .map_err(|_| FocalError::Shape {
                expected: "4 ([layer, height, width, channel])",
                actual: rank,
            })
    }

    pub fn into_dyn(self) -> ArrayD<T> {
        self.data.into_dyn()
    }
}

impl<T: Clone> LayerStack<T> {
    /// Copy one layer out as a standalone image.
    pub fn layer(&self, index: usize) -> Image<T> {
        Image::new(self.layer_view(index).to_owned())
    }

    pub fn images(&self) -> impl Iterator<Item = Image<T>> + '_ {
        self.data
            .axis_iter(Axis(0))
            .map(|layer| Image::new(layer.to_owned()))
    }
}

impl<T: Clone + Zero> LayerStack<T> {
    pub fn zeros(layers: usize, height: usize, width: usize, channels: usize) -> Self {
        Self::new(Array4::zeros((layers, height, width, channels)))
    }

    /// Stack images along a new leading layer axis.
    ///
    /// All images must share height, width and channel count.
    pub fn from_images(images: &[Image<T>]) -> Result<Self> {
        let first = images.first().ok_or(FocalError::EmptyStack)?;
        let (h, w, c) = first.dim();

        let mut stack = Self::zeros(images.len(), h, w, c);
        for (i, image) in images.iter().enumerate() {
            if image.dim() != (h, w, c) {
                return Err(FocalError::DimensionMismatch(format!(
                    "layer {} is {:?}, expected {:?}",
                    i,
                    image.dim(),
                    (h, w, c)
                )));
            }
            stack
                .data
                .index_axis_mut(Axis(0), i)
                .assign(&image.data);
        }

        Ok(stack)
    }
}

impl LayerStack<Complex64> {
    /// Multiply every sample by `factor`.
    ///
    /// The synthesizer sums layer contributions without normalizing; callers
    /// wanting an average divide by the layer count with this.
    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(self.data.mapv(|z| z * factor))
    }

    pub fn real(&self) -> LayerStack<f64> {
        LayerStack::new(self.data.mapv(|z| z.re))
    }
}
