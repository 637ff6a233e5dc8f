use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use focalsynth_core::config::FilterConfig;
use focalsynth_core::layers::to_display;
use focalsynth_core::pipeline::run_filter;
use focalsynth_core::psf::{PointSpreadFunction, PsfModel};

use crate::io::{load_image, save_pixels};

#[derive(Args)]
pub struct TranslateArgs {
    /// Input image file
    pub file: PathBuf,

    /// Horizontal shift in pixels
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub dx: f64,

    /// Vertical shift in pixels
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub dy: f64,

    /// Output file path
    #[arg(short, long, default_value = "translated.png")]
    pub output: PathBuf,
}

pub fn run(args: &TranslateArgs) -> Result<()> {
    let config = FilterConfig {
        psf: PsfModel::Translation {
            dx: args.dx,
            dy: args.dy,
        },
        sigma: 1.0,
    };
    crate::summary::print_filter_summary(&config, &args.file, &args.output);

    let image = load_image(&args.file)?;
    let kernel = config
        .psf
        .kernel_for_size(image.height(), image.width(), config.sigma);
    let shifted = run_filter(&image, &kernel).context("Translation failed")?;

    save_pixels(&to_display(&shifted), &args.output)?;
    println!("Saved to {}", args.output.display());

    Ok(())
}
