use ndarray::{s, Array2, Zip};

use crate::error::Result;

use super::dispatcher::{plane_shape, Correlator};

/// Spatial cross-correlation by explicit summation over every shift.
///
/// Exact and free of wrap-around, at O(N^2 * M^2) per window pair.
#[derive(Clone, Copy, Debug, Default)]
pub struct DirectCorrelator;

impl Correlator for DirectCorrelator {
    fn cross_correlate(&self, window: &Array2<f64>, search: &Array2<f64>) -> Result<Array2<f64>> {
        let (ha, wa) = window.dim();
        let (hb, wb) = search.dim();
        let (ph, pw) = plane_shape((ha, wa), (hb, wb));
        let mut plane = Array2::<f64>::zeros((ph, pw));

        for kr in 0..ph {
            let (ar, br) = overlap_ranges(kr as isize - (ha as isize - 1), ha, hb);
            for kc in 0..pw {
                let (ac, bc) = overlap_ranges(kc as isize - (wa as isize - 1), wa, wb);
                let a = window.slice(s![ar.clone(), ac.clone()]);
                let b = search.slice(s![br.clone(), bc]);
                plane[[kr, kc]] = Zip::from(&a).and(&b).fold(0.0, |acc, &x, &y| acc + x * y);
            }
        }

        Ok(plane)
    }

    fn name(&self) -> &'static str {
        "direct"
    }
}

/// Index ranges of the window and search samples that overlap when the search
/// window is shifted by `shift` along one axis.
fn overlap_ranges(
    shift: isize,
    window_len: usize,
    search_len: usize,
) -> (std::ops::Range<usize>, std::ops::Range<usize>) {
    let start = (-shift).max(0) as usize;
    let end = (search_len as isize - shift).min(window_len as isize).max(start as isize) as usize;
    let b_start = (start as isize + shift) as usize;
    (start..end, b_start..b_start + (end - start))
}
