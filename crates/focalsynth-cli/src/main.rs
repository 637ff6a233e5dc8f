mod commands;
mod io;
mod summary;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "focalsynth", about = "Frequency-domain focal-stack synthesis")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Blur an image with a Gaussian or Cauchy PSF
    Blur(commands::blur::BlurArgs),
    /// Circularly shift an image with a phase-shift filter
    Translate(commands::translate::TranslateArgs),
    /// Split an image into depth layers and synthesize a focal stack
    Stack(commands::stack::StackArgs),
    /// Print the default focal-stack config as TOML
    Config(commands::config::ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &cli.command {
        Commands::Blur(args) => commands::blur::run(args),
        Commands::Translate(args) => commands::translate::run(args),
        Commands::Stack(args) => commands::stack::run(args),
        Commands::Config(args) => commands::config::run(args),
    }
}
