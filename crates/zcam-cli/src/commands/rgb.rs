//! Rgb command.
//!
//! Resolves a partial set of ZCAM attributes and converts it to sRGB.

use anyhow::{Context, Result};
use zcam_color::{PartialZcam, ViewingConditions, ZcamColor, linear_rgb_from_jch};

use super::print_attributes;
use crate::RgbArgs;

/// Runs the rgb command.
pub fn run(args: RgbArgs, viewing: &ViewingConditions) -> Result<()> {
    let partial = PartialZcam {
        hue: args.hue,
        hue_quadrature: args.hue_quadrature,
        lightness: args.lightness,
        brightness: args.brightness,
        chroma: args.chroma,
        colorfulness: args.colorfulness,
        saturation: args.saturation,
        vividness: args.vividness,
        blackness: args.blackness,
        whiteness: args.whiteness,
    };
    let jch = partial.normalize(viewing).context("Incomplete ZCAM color")?;
    let linear = linear_rgb_from_jch(jch, viewing);
    let inside = linear.in_unit_cube_8bit();

    println!("{}{}", linear.to_companded().to_hex(), if inside { "" } else { "  (outside sRGB, clipped)" });
    print_attributes(&ZcamColor::from_jch(jch, viewing));
    Ok(())
}
