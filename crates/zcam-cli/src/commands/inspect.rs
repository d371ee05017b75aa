//! Inspect command.
//!
//! Prints the ZCAM attributes of sRGB colors.

use anyhow::{Context, Result};
use zcam_color::{Rgb, ViewingConditions, ZcamColor};

use super::print_attributes;
use crate::InspectArgs;

/// Runs the inspect command.
pub fn run(args: InspectArgs, viewing: &ViewingConditions) -> Result<()> {
    for (i, hex) in args.colors.iter().enumerate() {
        let rgb = Rgb::from_hex(hex).with_context(|| format!("Cannot parse color {hex:?}"))?;
        let z = ZcamColor::from_srgb(rgb, viewing);
        println!("{}", rgb.to_hex());
        print_attributes(&z);
        if i + 1 < args.colors.len() {
            println!();
        }
    }
    Ok(())
}
