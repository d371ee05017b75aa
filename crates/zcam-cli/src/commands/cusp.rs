//! Cusp command.
//!
//! Prints the most chromatic displayable color of each hue.

use anyhow::{Context, Result};
use tracing::debug;
use zcam_color::ViewingConditions;
use zcam_gamut::{GamutEngine, GamutOracle};

use super::{build_boundary, display_rgb, print_attributes};
use crate::CuspArgs;

/// Runs the cusp command.
pub fn run(args: CuspArgs, viewing: ViewingConditions) -> Result<()> {
    let mut engine = GamutEngine::new(viewing);
    if args.build {
        build_boundary(&mut engine)?;
    }

    for (i, &hue) in args.hues.iter().enumerate() {
        let cusp = engine
            .find_cusp(hue)
            .with_context(|| format!("Cusp search failed at hue {hue}"))?;
        debug!(hue, lightness = cusp.lightness, chroma = cusp.chroma, "Found cusp");
        let (rgb, _) = display_rgb(&engine, cusp.jch());
        println!("cusp at {hue}°: {}", rgb.to_hex());
        print_attributes(&engine.oracle().describe(cusp.jch()));
        if i + 1 < args.hues.len() {
            println!();
        }
    }
    Ok(())
}
