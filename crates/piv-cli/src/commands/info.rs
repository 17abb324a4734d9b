use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use piv_core::io::load_image;

#[derive(Args)]
pub struct InfoArgs {
    /// Input image file
    pub file: PathBuf,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let frame = load_image(&args.file)
        .with_context(|| format!("Failed to load {}", args.file.display()))?;

    println!("File:        {}", args.file.display());
    println!("Dimensions:  {}x{}", frame.width(), frame.height());
    println!("Bit depth:   {}", frame.original_bit_depth);
    if let Some((lo, hi)) = frame.intensity_range() {
        println!("Intensity:   {:.4} .. {:.4}", lo, hi);
    }

    Ok(())
}
