//! lux - progressive accumulation and display transform CLI
//!
//! Feeds a sequence of HDR frames through a render session and writes the
//! converged display image.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod io;

#[derive(Parser)]
#[command(name = "lux")]
#[command(author, version, about = "Progressive accumulation and display transform")]
#[command(long_about = "
Accumulates noisy HDR frames into a converged estimate and maps it to a
display image (antialiasing, white balance, exposure, LUT, tone curve).

Examples:
  lux converge 'render/frame_*.exr' -o out.png
  lux converge frames/*.exr -o out.png --hdr-out estimate.exr
  lux converge f_*.exr -o out.png --exposure 1.5 --white-point 4500
  lux converge f_*.exr -o out.png --config look.yaml --lut grade.png
  lux lut-info grade.png
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Number of threads (0 = auto)
    #[arg(short = 'j', long, global = true, default_value = "0")]
    threads: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Accumulate frames and write the display image
    #[command(visible_alias = "c")]
    Converge(ConvergeArgs),

    /// Describe a packed LUT strip
    #[command(name = "lut-info")]
    LutInfo(LutInfoArgs),
}

/// LUT interpolation selectable on the command line.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum LutInterp {
    Nearest,
    Linear,
    Tetrahedral,
}

#[derive(Args)]
struct ConvergeArgs {
    /// Input frames (EXR files or glob patterns), accumulated in sorted order
    #[arg(required = true)]
    frames: Vec<String>,

    /// Display output (PNG)
    #[arg(short, long)]
    output: PathBuf,

    /// Also write the HDR estimate (EXR)
    #[arg(long)]
    hdr_out: Option<PathBuf>,

    /// Pipeline settings (YAML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Packed LUT strip (PNG); enables the LUT step
    #[arg(long)]
    lut: Option<PathBuf>,

    /// LUT interpolation
    #[arg(long, value_enum, default_value = "tetrahedral")]
    lut_interp: LutInterp,

    /// Exposure compensation in stops
    #[arg(short, long, allow_hyphen_values = true)]
    exposure: Option<f32>,

    /// White point in kelvin; enables white balance
    #[arg(short, long)]
    white_point: Option<f32>,

    /// Disable antialiasing
    #[arg(long)]
    no_aa: bool,
}

#[derive(Args)]
struct LutInfoArgs {
    /// LUT strip (PNG)
    input: PathBuf,
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Configure thread pool
    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    match cli.command {
        Commands::Converge(args) => commands::converge::run(args, cli.verbose),
        Commands::LutInfo(args) => commands::lut_info::run(args, cli.verbose),
    }
}
