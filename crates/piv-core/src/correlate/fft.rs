use std::sync::Arc;

use ndarray::{Array2, Zip};
use num_complex::Complex;
use rustfft::{Fft, FftPlanner};

use crate::error::{PivError, Result};

use super::dispatcher::{plane_shape, Correlator};

/// Frequency-domain cross-correlation.
///
/// Both windows are zero-padded to the full linear correlation size, so the
/// periodic result of the inverse transform contains every shift exactly once
/// and can be unwrapped into the same plane layout as [`super::direct::DirectCorrelator`].
pub struct FftCorrelator {
    window_shape: (usize, usize),
    search_shape: (usize, usize),
    padded: (usize, usize),
    fft_row: Arc<dyn Fft<f64>>,
    fft_col: Arc<dyn Fft<f64>>,
    ifft_row: Arc<dyn Fft<f64>>,
    ifft_col: Arc<dyn Fft<f64>>,
}

impl FftCorrelator {
    /// Plan transforms for a fixed pair of window shapes.
    pub fn new(window_shape: (usize, usize), search_shape: (usize, usize)) -> Self {
        let padded = plane_shape(window_shape, search_shape);
        let mut planner = FftPlanner::new();
        Self {
            window_shape,
            search_shape,
            padded,
            fft_row: planner.plan_fft_forward(padded.1),
            fft_col: planner.plan_fft_forward(padded.0),
            ifft_row: planner.plan_fft_inverse(padded.1),
            ifft_col: planner.plan_fft_inverse(padded.0),
        }
    }

    /// Zero-padded 2D FFT: row-wise FFT, then column-wise FFT.
    fn fft2d(&self, data: &Array2<f64>) -> Array2<Complex<f64>> {
        let (h, w) = self.padded;
        let mut result = Array2::<Complex<f64>>::zeros((h, w));
        for ((row, col), &v) in data.indexed_iter() {
            result[[row, col]] = Complex::new(v, 0.0);
        }

        // Rows beyond the source are all zero and transform to zero.
        for row in 0..data.nrows() {
            let mut row_data: Vec<Complex<f64>> = (0..w).map(|c| result[[row, c]]).collect();
            self.fft_row.process(&mut row_data);
            for col in 0..w {
                result[[row, col]] = row_data[col];
            }
        }

        for col in 0..w {
            let mut col_data: Vec<Complex<f64>> = (0..h).map(|r| result[[r, col]]).collect();
            self.fft_col.process(&mut col_data);
            for row in 0..h {
                result[[row, col]] = col_data[row];
            }
        }

        result
    }

    /// Inverse 2D FFT, real part, normalised.
    fn ifft2d(&self, data: &Array2<Complex<f64>>) -> Array2<f64> {
        let (h, w) = data.dim();
        let mut work = data.clone();

        for col in 0..w {
            let mut col_data: Vec<Complex<f64>> = (0..h).map(|r| work[[r, col]]).collect();
            self.ifft_col.process(&mut col_data);
            for row in 0..h {
                work[[row, col]] = col_data[row];
            }
        }

        for row in 0..h {
            let mut row_data: Vec<Complex<f64>> = (0..w).map(|c| work[[row, c]]).collect();
            self.ifft_row.process(&mut row_data);
            for col in 0..w {
                work[[row, col]] = row_data[col];
            }
        }

        let scale = 1.0 / (h * w) as f64;
        work.mapv(|c| c.re * scale)
    }
}

impl Correlator for FftCorrelator {
    fn cross_correlate(&self, window: &Array2<f64>, search: &Array2<f64>) -> Result<Array2<f64>> {
        check_shape(self.window_shape, window.dim())?;
        check_shape(self.search_shape, search.dim())?;

        let window_fft = self.fft2d(window);
        let search_fft = self.fft2d(search);

        let cross = Zip::from(&window_fft)
            .and(&search_fft)
            .map_collect(|a, b| a.conj() * b);
        let circular = self.ifft2d(&cross);

        // circular[m] holds shift m mod P; plane index k holds shift k - (ha - 1).
        let (ph, pw) = self.padded;
        let row_lag = self.window_shape.0 - 1;
        let col_lag = self.window_shape.1 - 1;
        Ok(Array2::from_shape_fn((ph, pw), |(r, c)| {
            circular[[(r + ph - row_lag) % ph, (c + pw - col_lag) % pw]]
        }))
    }

    fn name(&self) -> &'static str {
        "fft"
    }
}

fn check_shape(expected: (usize, usize), actual: (usize, usize)) -> Result<()> {
    if expected != actual {
        return Err(PivError::ShapeMismatch { expected, actual });
    }
    Ok(())
}
