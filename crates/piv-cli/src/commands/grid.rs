use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use piv_core::consts::{DEFAULT_OVERLAP, DEFAULT_WINDOW_SIZE};
use piv_core::field::get_coordinates;
use piv_core::io::load_image;

#[derive(Args)]
pub struct GridArgs {
    /// Image whose shape defines the grid
    pub file: PathBuf,

    /// Interrogation window size in pixels
    #[arg(long, default_value_t = DEFAULT_WINDOW_SIZE)]
    pub window_size: usize,

    /// Overlap between neighbouring windows in pixels
    #[arg(long, default_value_t = DEFAULT_OVERLAP)]
    pub overlap: usize,
}

pub fn run(args: &GridArgs) -> Result<()> {
    let frame = load_image(&args.file)
        .with_context(|| format!("Failed to load {}", args.file.display()))?;
    let coords = get_coordinates(frame.shape(), args.window_size, args.overlap)?;

    println!("Image:       {}x{}", frame.width(), frame.height());
    println!(
        "Window:      {} px, overlap {} px, step {} px",
        args.window_size,
        args.overlap,
        args.window_size - args.overlap
    );
    println!("Field:       {} rows x {} cols", coords.y.len(), coords.x.len());
    if let (Some(x0), Some(x1)) = (coords.x.first(), coords.x.last()) {
        println!("x centres:   {:.1} .. {:.1}", x0, x1);
    }
    if let (Some(y0), Some(y1)) = (coords.y.first(), coords.y.last()) {
        println!("y centres:   {:.1} .. {:.1}", y0, y1);
    }

    Ok(())
}
