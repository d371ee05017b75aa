//! Dump command.
//!
//! Builds the gamut boundary and writes `hue value` text files for
//! plotting, e.g. with gnuplot:
//!
//! ```text
//! plot "chroma-samples.txt" with lines, "chroma-curve.txt" with lines, "chroma-knots.txt"
//! ```

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;
use zcam_color::ViewingConditions;
use zcam_gamut::{BoundaryCurve, GamutBoundary, GamutEngine};

use super::build_boundary;
use crate::DumpArgs;

/// Runs the dump command.
pub fn run(args: DumpArgs, viewing: ViewingConditions) -> Result<()> {
    let mut engine = GamutEngine::new(viewing);
    build_boundary(&mut engine)?;
    let boundary = engine.boundary().context("Gamut boundary missing after build")?;

    fs::create_dir_all(&args.dir)
        .with_context(|| format!("Failed to create {}", args.dir.display()))?;

    for (curve, name) in [(BoundaryCurve::Lightness, "lightness"), (BoundaryCurve::Chroma, "chroma")] {
        write(&args.dir, &format!("{name}-samples.txt"), |w| boundary.write_samples(curve, w))?;
        write(&args.dir, &format!("{name}-curve.txt"), |w| boundary.write_curve(curve, w))?;
        write(&args.dir, &format!("{name}-knots.txt"), |w| boundary.write_knots(curve, w))?;
    }

    print_summary(boundary);
    Ok(())
}

fn write<F>(dir: &Path, name: &str, body: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> std::io::Result<()>,
{
    let path = dir.join(name);
    let file = File::create(&path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut out = BufWriter::new(file);
    body(&mut out)
        .and_then(|()| out.flush())
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), "Wrote");
    Ok(())
}

fn print_summary(boundary: &GamutBoundary) {
    let extrema: Vec<String> = boundary.extrema().iter().map(|h| format!("{h:.4}")).collect();
    println!("extrema:  {}", extrema.join(" "));
    println!("samples:  {}", boundary.sample_hues().len());
    println!(
        "knots:    lightness {}  chroma {}",
        boundary.lightness_spline().knot_count(),
        boundary.chroma_spline().knot_count()
    );
    println!("chroma:   {:.4} .. {:.4}", boundary.min_chroma(), boundary.max_chroma());
}
