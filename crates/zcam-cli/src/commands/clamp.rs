//! Clamp command.
//!
//! Reduces chroma at constant hue and lightness until the color fits the
//! 8-bit sRGB gamut.

use anyhow::{Context, Result};
use zcam_color::{Jch, ViewingConditions};
use zcam_gamut::GamutEngine;

use super::{build_boundary, display_rgb};
use crate::ClampArgs;

/// Runs the clamp command.
pub fn run(args: ClampArgs, viewing: ViewingConditions) -> Result<()> {
    let mut engine = GamutEngine::new(viewing);
    if args.build {
        build_boundary(&mut engine)?;
    }

    let input = Jch::new(args.hue, args.lightness, args.chroma);
    let clamped = engine
        .clamp_to_gamut(input, args.eps)
        .context("Failed to clamp color")?;
    let (rgb, inside) = display_rgb(&engine, clamped);

    println!(
        "in:  hz {:.4}  Jz {:.4}  Cz {:.4}{}",
        input.hue,
        input.lightness,
        input.chroma,
        if engine.contains(input) { "" } else { "  (outside)" }
    );
    println!(
        "out: hz {:.4}  Jz {:.4}  Cz {:.4}  {}{}",
        clamped.hue,
        clamped.lightness,
        clamped.chroma,
        rgb.to_hex(),
        if inside { "" } else { "  (outside)" }
    );
    Ok(())
}
