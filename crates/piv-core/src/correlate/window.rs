use std::ops::Range;

use ndarray::{s, Array2};

use crate::consts::EPSILON;
use crate::error::{PivError, Result};

/// A square sub-region cut out of a frame.
///
/// Samples outside the source image are zero; `rows` and `cols` give the part
/// of `data` that came from inside the image.
#[derive(Clone, Debug)]
pub struct Window {
    pub data: Array2<f64>,
    pub rows: Range<usize>,
    pub cols: Range<usize>,
}

impl Window {
    pub fn dim(&self) -> (usize, usize) {
        self.data.dim()
    }

    /// True if every sample lies inside the source image.
    pub fn is_complete(&self) -> bool {
        let (h, w) = self.data.dim();
        self.rows == (0..h) && self.cols == (0..w)
    }
}

/// Extract the `size`x`size` interrogation window whose top-left is (top, left).
pub fn extract_window(data: &Array2<f32>, top: usize, left: usize, size: usize) -> Window {
    extract_padded(data, top as isize, left as isize, size)
}

/// Extract the search area paired with the interrogation window at (top, left).
///
/// The search area is centred on the interrogation window: its top-left lies
/// `(search_size - window_size) / 2` pixels up and to the left. Parts falling
/// outside the image are zero-filled.
pub fn extract_search_area(
    data: &Array2<f32>,
    top: usize,
    left: usize,
    window_size: usize,
    search_size: usize,
) -> Window {
    let offset = (search_size.saturating_sub(window_size) / 2) as isize;
    extract_padded(data, top as isize - offset, left as isize - offset, search_size)
}

fn extract_padded(data: &Array2<f32>, top: isize, left: isize, size: usize) -> Window {
    let (h, w) = data.dim();
    let mut region = Array2::<f64>::zeros((size, size));

    let rows = clip_range(top, size, h);
    let cols = clip_range(left, size, w);

    if !rows.is_empty() && !cols.is_empty() {
        let src_rows = (rows.start as isize + top) as usize..(rows.end as isize + top) as usize;
        let src_cols = (cols.start as isize + left) as usize..(cols.end as isize + left) as usize;
        region
            .slice_mut(s![rows.clone(), cols.clone()])
            .zip_mut_with(&data.slice(s![src_rows, src_cols]), |dst, &src| {
                *dst = src as f64
            });
    }

    Window {
        data: region,
        rows,
        cols,
    }
}

/// Local index range of a window starting at `start` with `size` samples that
/// overlaps `0..extent`.
fn clip_range(start: isize, size: usize, extent: usize) -> Range<usize> {
    let lo = (-start).clamp(0, size as isize) as usize;
    let hi = (extent as isize - start).clamp(0, size as isize) as usize;
    lo..hi.max(lo)
}

/// Normalise a window to zero mean and unit standard deviation over its
/// in-image region. Padding stays zero.
///
/// Fails with [`PivError::DegenerateWindow`] when the region is empty or flat.
pub fn normalize(window: &Window) -> Result<Array2<f64>> {
    let view = window
        .data
        .slice(s![window.rows.clone(), window.cols.clone()]);
    let n = view.len();
    if n == 0 {
        return Err(PivError::DegenerateWindow { std_dev: 0.0 });
    }

    let mean = view.sum() / n as f64;
    let var = view.fold(0.0, |acc, &v| acc + (v - mean) * (v - mean)) / n as f64;
    let std_dev = var.sqrt();
    if std_dev < EPSILON {
        return Err(PivError::DegenerateWindow { std_dev });
    }

    if window.is_complete() {
        return Ok(window.data.mapv(|v| (v - mean) / std_dev));
    }

    let mut out = Array2::<f64>::zeros(window.data.dim());
    out.slice_mut(s![window.rows.clone(), window.cols.clone()])
        .zip_mut_with(&view, |dst, &v| *dst = (v - mean) / std_dev);
    Ok(out)
}
