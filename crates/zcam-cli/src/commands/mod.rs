//! CLI command implementations

pub mod clamp;
pub mod cusp;
pub mod dump;
pub mod inspect;
pub mod rgb;

use anyhow::{Context, Result};
use tracing::info;
use zcam_color::{Jch, Rgb, Surround, ViewingConditions, ZcamColor};
use zcam_gamut::{BuildPhase, GamutEngine, GamutOracle};
use zcam_math::D65;

use crate::{SurroundArg, ViewingArgs};

/// Viewing conditions from the global flags.
pub fn viewing(args: &ViewingArgs) -> Result<ViewingConditions> {
    let surround = match args.surround {
        SurroundArg::Dark => Surround::Dark,
        SurroundArg::Dim => Surround::Dim,
        SurroundArg::Average => Surround::Average,
    };
    ViewingConditions::builder()
        .white(D65 * args.white_luminance)
        .adapting_luminance(args.adapting_luminance)
        .background(args.background)
        .surround(surround)
        .build()
        .context("Invalid viewing conditions")
}

/// Builds the engine's boundary, logging each phase once.
pub fn build_boundary(engine: &mut GamutEngine) -> Result<()> {
    let mut phase = None;
    engine
        .build_boundary_with(|p| {
            if phase != Some(p.phase) {
                phase = Some(p.phase);
                let what = match p.phase {
                    BuildPhase::Extrema => "Refining hue extrema",
                    BuildPhase::Sampling => "Sampling cusps",
                    BuildPhase::FitLightness => "Fitting lightness",
                    BuildPhase::FitChroma => "Fitting chroma",
                    BuildPhase::Finish => "Finishing",
                };
                info!(units = p.total, "{what}");
            }
        })
        .context("Failed to build gamut boundary")
}

/// Companded sRGB of a triple and whether it rounds into the 8-bit cube.
pub fn display_rgb(engine: &GamutEngine, jch: Jch) -> (Rgb, bool) {
    let linear = engine.oracle().linear_rgb(jch);
    (linear.to_companded(), linear.in_unit_cube_8bit())
}

/// Prints every attribute, one per line.
pub fn print_attributes(z: &ZcamColor) {
    println!("  hz (hue):            {:.4}", z.hue);
    println!("  Hz (hue quadrature): {:.4}", z.hue_quadrature);
    println!("  Jz (lightness):      {:.4}", z.lightness);
    println!("  Qz (brightness):     {:.4}", z.brightness);
    println!("  Cz (chroma):         {:.4}", z.chroma);
    println!("  Mz (colorfulness):   {:.4}", z.colorfulness);
    println!("  Sz (saturation):     {:.4}", z.saturation);
    println!("  Vz (vividness):      {:.4}", z.vividness);
    println!("  Kz (blackness):      {:.4}", z.blackness);
    println!("  Wz (whiteness):      {:.4}", z.whiteness);
}
