use ndarray::Array2;

use crate::consts::{EPSILON, SUBPIXEL_CLAMP};
use crate::pipeline::config::SubpixelMethod;

/// Refine a peak location with independent 3-point fits along rows and columns.
///
/// `window_shape` is the interrogation window's shape; the search window's
/// shape follows from the plane. Each fit sample is divided by the number of
/// samples the two windows share at its shift, which removes the pull towards
/// zero shift inherent to a linear correlation of finite windows.
///
/// Returns (delta_row, delta_col) as fractional offsets from the integer peak.
/// A peak on the plane border has no neighbours to fit and yields (0, 0).
pub fn refine_peak(
    plane: &Array2<f64>,
    peak_row: usize,
    peak_col: usize,
    window_shape: (usize, usize),
    method: SubpixelMethod,
) -> (f64, f64) {
    let (h, w) = plane.dim();
    if peak_row == 0 || peak_row + 1 >= h || peak_col == 0 || peak_col + 1 >= w {
        return (0.0, 0.0);
    }

    let search_shape = (h + 1 - window_shape.0, w + 1 - window_shape.1);
    let row_weight = |k: usize| overlap_len(k, window_shape.0, search_shape.0);
    let col_weight = |k: usize| overlap_len(k, window_shape.1, search_shape.1);
    let curr = plane[[peak_row, peak_col]];

    let delta_row = fit_three_point(
        plane[[peak_row - 1, peak_col]] / row_weight(peak_row - 1),
        curr / row_weight(peak_row),
        plane[[peak_row + 1, peak_col]] / row_weight(peak_row + 1),
        method,
    );
    let delta_col = fit_three_point(
        plane[[peak_row, peak_col - 1]] / col_weight(peak_col - 1),
        curr / col_weight(peak_col),
        plane[[peak_row, peak_col + 1]] / col_weight(peak_col + 1),
        method,
    );

    (delta_row, delta_col)
}

/// Vertex of the curve through (-1, prev), (0, curr), (+1, next), clamped to
/// half a pixel.
///
/// The Gaussian fit needs strictly positive samples; otherwise it falls back
/// to the parabola.
pub fn fit_three_point(prev: f64, curr: f64, next: f64, method: SubpixelMethod) -> f64 {
    let delta = match method {
        SubpixelMethod::Gaussian if prev > 0.0 && curr > 0.0 && next > 0.0 => {
            parabolic(prev.ln(), curr.ln(), next.ln())
        }
        SubpixelMethod::Gaussian | SubpixelMethod::Parabolic => parabolic(prev, curr, next),
        SubpixelMethod::Centroid => {
            let sum = prev + curr + next;
            if sum.abs() > EPSILON {
                (next - prev) / sum
            } else {
                0.0
            }
        }
    };
    delta.clamp(-SUBPIXEL_CLAMP, SUBPIXEL_CLAMP)
}

/// Number of samples shared by a window of `window_len` and a search area of
/// `search_len` at plane index `k` along one axis.
fn overlap_len(k: usize, window_len: usize, search_len: usize) -> f64 {
    let shift = k as isize - (window_len as isize - 1);
    let start = (-shift).max(0);
    let end = (search_len as isize - shift).min(window_len as isize);
    (end - start).max(1) as f64
}

fn parabolic(prev: f64, curr: f64, next: f64) -> f64 {
    let denom = prev - 2.0 * curr + next;
    if denom.abs() > EPSILON {
        (prev - next) / (2.0 * denom)
    } else {
        0.0
    }
}
