use ndarray::Array2;

use crate::pipeline::config::SubpixelMethod;

use super::subpixel::refine_peak;

/// Integer location and height of a correlation peak.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Peak {
    pub row: usize,
    pub col: usize,
    pub value: f64,
}

impl Peak {
    /// True if the peak lacks a neighbour on at least one side.
    pub fn is_on_border(&self, shape: (usize, usize)) -> bool {
        self.row == 0 || self.col == 0 || self.row + 1 >= shape.0 || self.col + 1 >= shape.1
    }
}

/// Displacement recovered from a correlation plane, in pixels.
#[derive(Clone, Copy, Debug)]
pub struct PeakEstimate {
    /// Displacement along rows.
    pub dy: f64,
    /// Displacement along columns.
    pub dx: f64,
    pub peak: Peak,
    /// Peak on the plane border: integer estimate only.
    pub at_border: bool,
}

/// Global maximum of the plane.
///
/// Ties resolve to the lowest row, then the lowest column. NaN samples are
/// never selected.
pub fn find_peak(plane: &Array2<f64>) -> Peak {
    let mut best = Peak {
        row: 0,
        col: 0,
        value: f64::NEG_INFINITY,
    };

    for ((row, col), &value) in plane.indexed_iter() {
        if value > best.value {
            best = Peak { row, col, value };
        }
    }

    best
}

/// Locate the correlation peak and convert it into a displacement.
///
/// `window_shape` is the interrogation window's shape and `search_offset` the
/// (rows, cols) by which the search area's top-left precedes the window's.
pub fn locate_displacement(
    plane: &Array2<f64>,
    window_shape: (usize, usize),
    search_offset: (usize, usize),
    method: SubpixelMethod,
) -> PeakEstimate {
    let peak = find_peak(plane);
    let at_border = peak.is_on_border(plane.dim());
    let (sub_row, sub_col) = refine_peak(plane, peak.row, peak.col, window_shape, method);

    let centre_row = (window_shape.0 - 1 + search_offset.0) as f64;
    let centre_col = (window_shape.1 - 1 + search_offset.1) as f64;

    PeakEstimate {
        dy: peak.row as f64 + sub_row - centre_row,
        dx: peak.col as f64 + sub_col - centre_col,
        peak,
        at_border,
    }
}
