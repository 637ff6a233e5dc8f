use crate::image::{LayerStack, StackSpectrum};

/// Pipeline processing stage, used for progress reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineStage {
    Splitting,
    Transforming,
    Synthesizing,
    InverseTransforming,
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Splitting => write!(f, "Splitting layers"),
            Self::Transforming => write!(f, "Forward FFT"),
            Self::Synthesizing => write!(f, "Synthesizing"),
            Self::InverseTransforming => write!(f, "Inverse FFT"),
        }
    }
}

impl PipelineStage {
    pub const ALL: [PipelineStage; 4] = [
        Self::Splitting,
        Self::Transforming,
        Self::Synthesizing,
        Self::InverseTransforming,
    ];

    /// Zero-based position in [`PipelineStage::ALL`].
    pub fn index(self) -> usize {
        match self {
            Self::Splitting => 0,
            Self::Transforming => 1,
            Self::Synthesizing => 2,
            Self::InverseTransforming => 3,
        }
    }
}

/// Result of a focal-stack run.
#[derive(Clone, Debug)]
pub struct FocalStackOutput {
    /// Spatial-domain depth layers the source was split into.
    pub layers: LayerStack<f64>,
    /// Spatial-domain focal stack (complex; imaginary parts are rounding noise
    /// for real PSFs).
    pub focal_stack: StackSpectrum,
}

/// Thread-safe progress reporting for the pipeline.
///
/// All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    /// A new pipeline stage has started.
    fn begin_stage(&self, _stage: PipelineStage) {}

    /// The current stage is finished.
    fn finish_stage(&self, _stage: PipelineStage) {}
}

/// No-op progress reporter, used when `run_focal_stack` delegates.
pub(super) struct NoOpReporter;
impl ProgressReporter for NoOpReporter {}
