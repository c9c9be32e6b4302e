//! LUT info command
//!
//! Prints the cube size of a packed LUT strip and how it maps a grey ramp.

use crate::LutInfoArgs;
use anyhow::{Context, Result};
use tracing::trace;

const GREY_RAMP: [f32; 5] = [0.0, 0.18, 0.5, 0.75, 1.0];

pub fn run(args: LutInfoArgs, verbose: u8) -> Result<()> {
    trace!(input = %args.input.display(), "lut_info::run");

    let lut = lux_lut::load_packed_png(&args.input)
        .with_context(|| format!("Failed to load LUT: {}", args.input.display()))?;

    println!("{}", args.input.display());
    println!("  Cube:     {0}x{0}x{0} ({1} entries)", lut.size(), lut.entry_count());
    println!("  Identity: {}", lut.is_identity(1.0 / 255.0));

    if verbose > 0 {
        println!("  Grey ramp:");
        for v in GREY_RAMP {
            let out = lut.apply([v, v, v]);
            println!("    {v:.3} -> [{:.4}, {:.4}, {:.4}]", out[0], out[1], out[2]);
        }
    }

    Ok(())
}
