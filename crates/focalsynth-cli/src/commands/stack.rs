use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use focalsynth_core::config::FocalStackConfig;
use focalsynth_core::consts::{DEFAULT_LAYER_COUNT, DEFAULT_SIGMA};
use focalsynth_core::layers::{montage, to_display, to_display_real};
use focalsynth_core::pipeline::{run_focal_stack_reported, PipelineStage, ProgressReporter};
use focalsynth_core::psf::PsfModel;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use crate::io::{load_image, save_pixels};

#[derive(Clone, Copy, ValueEnum)]
pub enum StackPsfArg {
    Gaussian,
    Cauchy,
    Translation,
}

#[derive(Args)]
pub struct StackArgs {
    /// Input image file
    pub file: PathBuf,

    /// Focal-stack config file (TOML); overrides the PSF flags below
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Number of horizontal depth layers
    #[arg(long, default_value_t = DEFAULT_LAYER_COUNT)]
    pub layers: usize,

    /// Blur rate per layer of distance
    #[arg(long, default_value_t = DEFAULT_SIGMA)]
    pub sigma: f64,

    /// PSF model
    #[arg(long, value_enum, default_value = "gaussian")]
    pub psf: StackPsfArg,

    /// Horizontal shift per layer of distance (translation PSF)
    #[arg(long, default_value = "1", allow_hyphen_values = true)]
    pub dx: f64,

    /// Vertical shift per layer of distance (translation PSF)
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub dy: f64,

    /// Divide the focal stack by the layer count
    #[arg(long)]
    pub normalize: bool,

    /// Also save every focus plane as <output-stem>_<index>.<ext>
    #[arg(long)]
    pub each: bool,

    /// Save a montage of the split depth layers here
    #[arg(long)]
    pub layers_output: Option<PathBuf>,

    /// Output montage path
    #[arg(short, long, default_value = "focal_stack.png")]
    pub output: PathBuf,
}

/// Drives an indicatif bar, one tick per pipeline stage.
struct BarReporter {
    bar: ProgressBar,
}

impl ProgressReporter for BarReporter {
    fn begin_stage(&self, stage: PipelineStage) {
        self.bar.set_message(stage.to_string());
    }

    fn finish_stage(&self, stage: PipelineStage) {
        self.bar.set_position(stage.index() as u64 + 1);
    }
}

pub fn run(args: &StackArgs) -> Result<()> {
    let config = if let Some(ref config_path) = args.config {
        let contents = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config {}", config_path.display()))?;
        toml::from_str(&contents).context("Invalid focal-stack config")?
    } else {
        build_config_from_args(args)
    };

    crate::summary::print_stack_summary(&config, &args.file, &args.output);

    let image = load_image(&args.file)?;
    info!(
        width = image.width(),
        height = image.height(),
        channels = image.channels(),
        "Loaded source image"
    );

    let bar = ProgressBar::new(PipelineStage::ALL.len() as u64);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{msg:20} [{bar:40}] {pos}/{len}")?
            .progress_chars("=> "),
    );
    let reporter = BarReporter { bar };

    let output = run_focal_stack_reported(&image, &config, &reporter)
        .context("Focal-stack synthesis failed")?;
    reporter.bar.finish_with_message("Done");

    let tiled = montage(&output.focal_stack)?;
    save_pixels(&to_display(&tiled), &args.output)?;
    println!("\nFocal stack saved to {}", args.output.display());

    if let Some(ref path) = args.layers_output {
        let tiled_layers = montage(&output.layers)?;
        save_pixels(&to_display_real(&tiled_layers), path)?;
        println!("Depth layers saved to {}", path.display());
    }

    if args.each {
        for m in 0..output.focal_stack.layers() {
            let path = indexed_path(&args.output, m);
            save_pixels(&to_display(&output.focal_stack.layer(m)), &path)?;
            println!("Focus plane {} saved to {}", m, path.display());
        }
    }

    Ok(())
}

fn build_config_from_args(args: &StackArgs) -> FocalStackConfig {
    let psf = match args.psf {
        StackPsfArg::Gaussian => PsfModel::Gaussian,
        StackPsfArg::Cauchy => PsfModel::Cauchy,
        StackPsfArg::Translation => PsfModel::Translation {
            dx: args.dx,
            dy: args.dy,
        },
    };

    FocalStackConfig {
        layers: args.layers,
        sigma: args.sigma,
        psf,
        normalize: args.normalize,
    }
}

/// `out/stack.png` -> `out/stack_3.png`
fn indexed_path(base: &Path, index: usize) -> PathBuf {
    let stem = base
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("focal_stack");
    let name = match base.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{}_{}.{}", stem, index, ext),
        None => format!("{}_{}", stem, index),
    };
    base.with_file_name(name)
}
