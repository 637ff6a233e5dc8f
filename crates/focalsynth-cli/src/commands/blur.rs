use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use focalsynth_core::config::FilterConfig;
use focalsynth_core::layers::to_display;
use focalsynth_core::pipeline::run_filter;
use focalsynth_core::psf::{PointSpreadFunction, PsfModel};

use crate::io::{load_image, save_pixels};

#[derive(Clone, Copy, ValueEnum)]
pub enum BlurPsfArg {
    Gaussian,
    Cauchy,
}

impl From<BlurPsfArg> for PsfModel {
    fn from(arg: BlurPsfArg) -> Self {
        match arg {
            BlurPsfArg::Gaussian => PsfModel::Gaussian,
            BlurPsfArg::Cauchy => PsfModel::Cauchy,
        }
    }
}

#[derive(Args)]
pub struct BlurArgs {
    /// Input image file (PNG, TIFF, BMP, ...)
    pub file: PathBuf,

    /// PSF model
    #[arg(long, value_enum, default_value = "gaussian")]
    pub psf: BlurPsfArg,

    /// PSF strength (larger = more blur)
    #[arg(long, default_value_t = FilterConfig::default().sigma)]
    pub sigma: f64,

    /// Output file path
    #[arg(short, long, default_value = "blurred.png")]
    pub output: PathBuf,
}

pub fn run(args: &BlurArgs) -> Result<()> {
    let config = FilterConfig {
        psf: args.psf.into(),
        sigma: args.sigma,
    };
    crate::summary::print_filter_summary(&config, &args.file, &args.output);

    let image = load_image(&args.file)?;
    println!("Loaded {}x{} image ({} channels)", image.width(), image.height(), image.channels());

    let kernel = config
        .psf
        .kernel_for_size(image.height(), image.width(), config.sigma);
    let filtered = run_filter(&image, &kernel).context("Filtering failed")?;

    save_pixels(&to_display(&filtered), &args.output)?;
    println!("Saved to {}", args.output.display());

    Ok(())
}
