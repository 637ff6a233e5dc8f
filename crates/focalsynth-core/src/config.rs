use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_LAYER_COUNT, DEFAULT_SIGMA};
use crate::psf::PsfModel;

/// Parameters of a full split -> synthesize -> inverse focal-stack run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FocalStackConfig {
    /// Number of horizontal depth layers.
    #[serde(default = "default_layers")]
    pub layers: usize,
    /// Blur rate: distance `d` uses PSF strength `sigma * d`.
    #[serde(default = "default_sigma")]
    pub sigma: f64,
    #[serde(default)]
    pub psf: PsfModel,
    /// Divide the synthesized stack by the layer count.
    #[serde(default)]
    pub normalize: bool,
}

impl Default for FocalStackConfig {
    fn default() -> Self {
        Self {
            layers: DEFAULT_LAYER_COUNT,
            sigma: DEFAULT_SIGMA,
            psf: PsfModel::default(),
            normalize: false,
        }
    }
}

fn default_layers() -> usize {
    DEFAULT_LAYER_COUNT
}

fn default_sigma() -> f64 {
    DEFAULT_SIGMA
}

/// A single-image frequency filter run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    pub psf: PsfModel,
    pub sigma: f64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            psf: PsfModel::Gaussian,
            sigma: 7.0,
        }
    }
}
