use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::error::{PivError, Result};

use super::types::Coordinates;

/// Geometry of the interrogation grid.
///
/// Interrogation windows of `window_size` advance by `window_size - overlap`.
/// Each one is paired with a search area of `search_area_size` centred on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSpec {
    pub window_size: usize,
    pub overlap: usize,
    pub search_area_size: usize,
}

impl GridSpec {
    /// Grid whose search area equals the interrogation window.
    pub fn new(window_size: usize, overlap: usize) -> Self {
        Self {
            window_size,
            overlap,
            search_area_size: window_size,
        }
    }

    pub fn with_search_area(mut self, search_area_size: usize) -> Self {
        self.search_area_size = search_area_size;
        self
    }

    /// Distance between the origins of neighbouring windows.
    /// Only meaningful on a validated spec.
    pub fn step(&self) -> usize {
        self.window_size - self.overlap
    }

    /// Offset of the search area's top-left corner relative to the
    /// interrogation window's top-left corner (applied towards the origin).
    /// Zero when the search area is not larger than the window.
    pub fn search_offset(&self) -> usize {
        self.search_area_size.saturating_sub(self.window_size) / 2
    }

    pub fn validate(&self) -> Result<()> {
        validate_window(self.window_size, self.overlap)?;
        if self.window_size > self.search_area_size {
            return Err(PivError::InvalidGridSpec(format!(
                "window size {} exceeds search area size {}",
                self.window_size, self.search_area_size
            )));
        }
        Ok(())
    }

    /// Number of (rows, cols) of the vector field for an image of `image_shape`.
    pub fn field_shape(&self, image_shape: (usize, usize)) -> Result<(usize, usize)> {
        self.validate()?;
        field_shape(image_shape, self.window_size, self.overlap)
    }

    /// Top-left pixel (row, col) of the interrogation window for field cell (i, j).
    pub fn window_origin(&self, cell_row: usize, cell_col: usize) -> (usize, usize) {
        (cell_row * self.step(), cell_col * self.step())
    }
}

impl Default for GridSpec {
    fn default() -> Self {
        Self::new(
            crate::consts::DEFAULT_WINDOW_SIZE,
            crate::consts::DEFAULT_OVERLAP,
        )
    }
}

fn validate_window(window_size: usize, overlap: usize) -> Result<()> {
    if window_size == 0 {
        return Err(PivError::InvalidGridSpec(
            "window size must be positive".into(),
        ));
    }
    if overlap >= window_size {
        return Err(PivError::InvalidGridSpec(format!(
            "overlap {overlap} must be smaller than window size {window_size}"
        )));
    }
    Ok(())
}

/// Shape (rows, cols) of the vector field covering `image_shape`.
///
/// Only windows lying fully inside the image are counted:
/// `(extent - window_size) / step + 1` along each axis.
pub fn field_shape(
    image_shape: (usize, usize),
    window_size: usize,
    overlap: usize,
) -> Result<(usize, usize)> {
    validate_window(window_size, overlap)?;
    let (h, w) = image_shape;
    if h < window_size || w < window_size {
        return Err(PivError::InvalidGridSpec(format!(
            "image {w}x{h} is smaller than one {window_size}px window"
        )));
    }
    let step = window_size - overlap;
    Ok(((h - window_size) / step + 1, (w - window_size) / step + 1))
}

/// Window-centre coordinates of the vector field in pixels.
///
/// `x` runs along columns and `y` along rows; both start at the centre of the
/// first window, `(window_size - 1) / 2`, and advance by the step. The lengths
/// always equal the field shape returned by [`field_shape`].
pub fn get_coordinates(
    image_shape: (usize, usize),
    window_size: usize,
    overlap: usize,
) -> Result<Coordinates> {
    let (rows, cols) = field_shape(image_shape, window_size, overlap)?;
    let step = (window_size - overlap) as f64;
    let centre = (window_size as f64 - 1.0) / 2.0;

    let x = Array1::from_shape_fn(cols, |i| i as f64 * step + centre);
    let y = Array1::from_shape_fn(rows, |j| j as f64 * step + centre);

    Ok(Coordinates { x, y })
}
