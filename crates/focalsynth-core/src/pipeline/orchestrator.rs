use tracing::info;

use crate::config::FocalStackConfig;
use crate::error::Result;
use crate::fft::{self, Fft2d};
use crate::filter;
use crate::focal_stack::synthesize;
use crate::image::{Image, Spectrum};
use crate::layers::split_horizontally;
use crate::psf::Kernel;

use super::types::{FocalStackOutput, NoOpReporter, PipelineStage, ProgressReporter};

/// Split, transform, synthesize and inverse-transform a focal stack.
pub fn run_focal_stack(image: &Image<f64>, config: &FocalStackConfig) -> Result<FocalStackOutput> {
    run_focal_stack_reported(image, config, &NoOpReporter)
}

/// [`run_focal_stack`] with stage notifications sent to `reporter`.
pub fn run_focal_stack_reported(
    image: &Image<f64>,
    config: &FocalStackConfig,
    reporter: &dyn ProgressReporter,
) -> Result<FocalStackOutput> {
    let (h, w, c) = image.dim();
    info!(
        height = h,
        width = w,
        channels = c,
        layers = config.layers,
        sigma = config.sigma,
        psf = %config.psf,
        "Running focal-stack synthesis"
    );

    reporter.begin_stage(PipelineStage::Splitting);
    let layers = split_horizontally(image, config.layers)?;
    reporter.finish_stage(PipelineStage::Splitting);

    let planner = Fft2d::new(h, w);

    reporter.begin_stage(PipelineStage::Transforming);
    let spectra = planner.forward_stack(&layers)?;
    reporter.finish_stage(PipelineStage::Transforming);

    reporter.begin_stage(PipelineStage::Synthesizing);
    let mut stack = synthesize(&spectra, config.sigma, &config.psf)?;
    if config.normalize {
        stack = stack.scaled(1.0 / config.layers as f64);
    }
    reporter.finish_stage(PipelineStage::Synthesizing);

    reporter.begin_stage(PipelineStage::InverseTransforming);
    let focal_stack = planner.inverse_stack(&stack)?;
    reporter.finish_stage(PipelineStage::InverseTransforming);

    info!("Focal-stack synthesis complete");
    Ok(FocalStackOutput {
        layers,
        focal_stack,
    })
}

/// Forward transform, filter by `kernel`, inverse transform.
pub fn run_filter(image: &Image<f64>, kernel: &Kernel) -> Result<Spectrum> {
    let spectrum = fft::forward(image);
    let filtered = filter::apply(&spectrum, kernel)?;
    Ok(fft::inverse(&filtered))
}
