use ndarray::Array2;

use crate::error::Result;
use crate::field::grid::GridSpec;
use crate::pipeline::config::CorrelationMethod;

use super::direct::DirectCorrelator;
use super::fft::FftCorrelator;
use super::window::{normalize, Window};

/// A way of computing the cross-correlation plane of two windows.
///
/// For an interrogation window of shape (ha, wa) and a search window of shape
/// (hb, wb) the plane has shape (ha + hb - 1, wa + wb - 1). Plane index
/// (kr, kc) holds the score of shifting the search window by
/// (kr - (ha - 1), kc - (wa - 1)) relative to the interrogation window, so
/// peak handling is the same for every implementation.
pub trait Correlator: Send + Sync {
    fn cross_correlate(&self, window: &Array2<f64>, search: &Array2<f64>) -> Result<Array2<f64>>;

    fn name(&self) -> &'static str;
}

/// Shape of the correlation plane for the given window shapes.
pub fn plane_shape(window: (usize, usize), search: (usize, usize)) -> (usize, usize) {
    (window.0 + search.0 - 1, window.1 + search.1 - 1)
}

/// Build the correlator for a grid. FFT plans are sized once here and shared
/// by every cell.
pub fn build_correlator(method: CorrelationMethod, grid: &GridSpec) -> Box<dyn Correlator> {
    match method {
        CorrelationMethod::Fft => {
            let window = (grid.window_size, grid.window_size);
            let search = (grid.search_area_size, grid.search_area_size);
            Box::new(FftCorrelator::new(window, search))
        }
        CorrelationMethod::Direct => Box::new(DirectCorrelator),
    }
}

/// Normalise both windows and correlate them.
///
/// Flat windows fail with `DegenerateWindow` before any correlation work.
pub fn correlate_windows(
    correlator: &dyn Correlator,
    window: &Window,
    search: &Window,
) -> Result<Array2<f64>> {
    let a = normalize(window)?;
    let b = normalize(search)?;
    correlator.cross_correlate(&a, &b)
}
