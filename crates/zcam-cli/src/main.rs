//! zcam - ZCAM color attributes and sRGB gamut boundary tool
//!
//! Inspects colors, finds cusps, clamps to the displayable gamut and dumps
//! the fitted boundary for plotting.

use anyhow::Result;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "zcam")]
#[command(author, version, about = "ZCAM color attributes and sRGB gamut boundary")]
#[command(long_about = "
Converts sRGB colors to ZCAM perceptual attributes and answers questions
about the 8-bit sRGB gamut in ZCAM hue, lightness and chroma.

Examples:
  zcam inspect '#ff0000' 3366cc          # Attributes of sRGB colors
  zcam rgb --hue 259 -J 50 --saturation 40
  zcam cusp 0 90 180 270 --build         # Cusps from the fitted boundary
  zcam clamp --hue 259 -J 60 -C 80       # Reduce chroma into the gamut
  zcam dump ./boundary                   # Write x y files for gnuplot
  RUST_LOG=zcam_gamut=debug zcam dump ./boundary
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(flatten)]
    viewing: ViewingArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Show ZCAM attributes of sRGB hex colors
    #[command(visible_alias = "i")]
    Inspect(InspectArgs),

    /// Convert ZCAM attributes to sRGB
    Rgb(RgbArgs),

    /// Find the gamut cusp of hues
    Cusp(CuspArgs),

    /// Reduce chroma until a color is displayable
    Clamp(ClampArgs),

    /// Build the boundary and write its samples and splines
    Dump(DumpArgs),
}

/// Surround class of the viewing environment.
#[derive(Clone, Copy, ValueEnum)]
enum SurroundArg {
    Dark,
    Dim,
    Average,
}

#[derive(Args)]
struct ViewingArgs {
    /// Luminance of the white, cd/m²
    #[arg(long, global = true, default_value = "203")]
    white_luminance: f64,

    /// Adapting field luminance, cd/m²
    #[arg(long, global = true, default_value = "4")]
    adapting_luminance: f64,

    /// Background luminance factor
    #[arg(long, global = true, default_value = "20")]
    background: f64,

    /// Surround
    #[arg(long, global = true, value_enum, default_value = "average")]
    surround: SurroundArg,
}

#[derive(Args)]
struct InspectArgs {
    /// Colors as #rrggbb or #rgb
    #[arg(required = true)]
    colors: Vec<String>,
}

#[derive(Args)]
struct RgbArgs {
    /// Hue angle hz, degrees
    #[arg(long, conflicts_with = "hue_quadrature")]
    hue: Option<f64>,

    /// Hue quadrature Hz
    #[arg(long = "hue-quadrature")]
    hue_quadrature: Option<f64>,

    /// Lightness Jz
    #[arg(short = 'J', long)]
    lightness: Option<f64>,

    /// Brightness Qz
    #[arg(short = 'Q', long)]
    brightness: Option<f64>,

    /// Chroma Cz
    #[arg(short = 'C', long)]
    chroma: Option<f64>,

    /// Colorfulness Mz
    #[arg(short = 'M', long)]
    colorfulness: Option<f64>,

    /// Saturation Sz
    #[arg(short = 'S', long)]
    saturation: Option<f64>,

    /// Vividness Vz
    #[arg(long)]
    vividness: Option<f64>,

    /// Blackness Kz
    #[arg(long)]
    blackness: Option<f64>,

    /// Whiteness Wz
    #[arg(long)]
    whiteness: Option<f64>,
}

#[derive(Args)]
struct CuspArgs {
    /// Hue angles, degrees
    #[arg(required = true, allow_negative_numbers = true)]
    hues: Vec<f64>,

    /// Fit the boundary first instead of searching each hue
    #[arg(short, long)]
    build: bool,
}

#[derive(Args)]
struct ClampArgs {
    /// Hue angle, degrees
    #[arg(long, allow_negative_numbers = true)]
    hue: f64,

    /// Lightness Jz
    #[arg(short = 'J', long)]
    lightness: f64,

    /// Chroma Cz
    #[arg(short = 'C', long)]
    chroma: f64,

    /// Chroma tolerance
    #[arg(long, default_value = "1e-3")]
    eps: f64,

    /// Fit the boundary first
    #[arg(short, long)]
    build: bool,
}

#[derive(Args)]
struct DumpArgs {
    /// Output directory (created if missing)
    dir: PathBuf,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let viewing = commands::viewing(&cli.viewing)?;
    match cli.command {
        Commands::Inspect(args) => commands::inspect::run(args, &viewing),
        Commands::Rgb(args) => commands::rgb::run(args, &viewing),
        Commands::Cusp(args) => commands::cusp::run(args, viewing),
        Commands::Clamp(args) => commands::clamp::run(args, viewing),
        Commands::Dump(args) => commands::dump::run(args, viewing),
    }
}
