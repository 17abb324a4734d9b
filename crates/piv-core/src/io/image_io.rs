use std::path::Path;

use ndarray::Array2;
use tracing::debug;

use crate::error::{PivError, Result};
use crate::frame::Frame;

/// Load an image file as a grayscale frame.
///
/// Decoding is delegated to the `image` crate; any supported format works
/// (BMP, PNG, TIFF, ...). Intensities are scaled to [0, 1] from 16-bit luma.
pub fn load_image(path: &Path) -> Result<Frame> {
    let img = image::open(path)?;
    let gray = img.to_luma16();
    let (w, h) = gray.dimensions();
    let mut data = Array2::<f32>::zeros((h as usize, w as usize));

    for (col, row, pixel) in gray.enumerate_pixels() {
        data[[row as usize, col as usize]] = pixel.0[0] as f32 / 65535.0;
    }

    debug!(path = %path.display(), width = w, height = h, "Loaded frame");
    Ok(Frame::new(data, 16))
}

/// Load both frames of a recording and check that they share a shape.
pub fn load_frame_pair(path_a: &Path, path_b: &Path) -> Result<(Frame, Frame)> {
    let frame_a = load_image(path_a)?;
    let frame_b = load_image(path_b)?;
    if frame_a.shape() != frame_b.shape() {
        return Err(PivError::ShapeMismatch {
            expected: frame_a.shape(),
            actual: frame_b.shape(),
        });
    }
    Ok((frame_a, frame_b))
}
