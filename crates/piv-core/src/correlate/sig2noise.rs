use ndarray::Array2;

use crate::consts::{EPSILON, SIG2NOISE_SENTINEL};
use crate::pipeline::config::Sig2NoiseMethod;

use super::peak::{find_peak, Peak};

/// Signal-to-noise ratio of a correlation plane. Always finite and `>= 0`.
///
/// A perfectly flat plane, or one with nothing positive competing with the
/// primary peak, scores [`SIG2NOISE_SENTINEL`]. A non-positive primary peak
/// scores zero.
pub fn sig2noise(plane: &Array2<f64>, method: Sig2NoiseMethod, exclusion_radius: usize) -> f64 {
    if plane.is_empty() {
        return 0.0;
    }

    let peak = find_peak(plane);
    let min = plane.iter().copied().fold(f64::INFINITY, f64::min);
    if !peak.value.is_finite() || (peak.value - min).abs() < EPSILON {
        return SIG2NOISE_SENTINEL;
    }
    if peak.value <= 0.0 {
        return 0.0;
    }

    let noise = match method {
        Sig2NoiseMethod::Peak2Peak => second_peak(plane, &peak, exclusion_radius),
        Sig2NoiseMethod::Peak2Mean => {
            Some(plane.iter().map(|v| v.abs()).sum::<f64>() / plane.len() as f64)
        }
    };

    match noise {
        Some(n) if n > EPSILON => (peak.value / n).min(SIG2NOISE_SENTINEL),
        _ => SIG2NOISE_SENTINEL,
    }
}

/// Height of the highest local maximum outside the square exclusion zone of
/// `radius` around the primary peak, if any.
pub fn second_peak(plane: &Array2<f64>, primary: &Peak, radius: usize) -> Option<f64> {
    let mut best: Option<f64> = None;
    for ((row, col), &value) in plane.indexed_iter() {
        if row.abs_diff(primary.row) <= radius && col.abs_diff(primary.col) <= radius {
            continue;
        }
        if best.is_some_and(|b| value <= b) {
            continue;
        }
        if is_local_max(plane, row, col) {
            best = Some(value);
        }
    }
    best
}

/// True if no 8-neighbour inside the plane is larger.
fn is_local_max(plane: &Array2<f64>, row: usize, col: usize) -> bool {
    let (h, w) = plane.dim();
    let value = plane[[row, col]];
    for r in row.saturating_sub(1)..(row + 2).min(h) {
        for c in col.saturating_sub(1)..(col + 2).min(w) {
            if (r, c) != (row, col) && plane[[r, c]] > value {
                return false;
            }
        }
    }
    true
}
