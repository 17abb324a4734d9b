use std::sync::atomic::{AtomicUsize, Ordering};

use ndarray::{Array2, Zip};
use tracing::{debug, info};

use crate::consts::{DEFAULT_DT, DEFAULT_SIG2NOISE_EXCLUSION_RADIUS, PARALLEL_CELL_THRESHOLD};
use crate::correlate::{
    build_correlator, correlate_windows, extract_search_area, extract_window,
    locate_displacement, sig2noise, Correlator,
};
use crate::error::{PivError, Result};
use crate::frame::Frame;
use crate::pipeline::config::{CorrelationMethod, Sig2NoiseMethod, SubpixelMethod};

use super::grid::GridSpec;
use super::types::{CellResult, CellStatus, VectorField};

/// Parameters of one correlation pass.
#[derive(Clone, Debug, PartialEq)]
pub struct PivSettings {
    pub grid: GridSpec,
    /// Time between the frames; displacements are divided by it.
    pub dt: f64,
    pub correlation_method: CorrelationMethod,
    pub subpixel_method: SubpixelMethod,
    pub sig2noise_method: Sig2NoiseMethod,
    pub sig2noise_exclusion_radius: usize,
}

impl Default for PivSettings {
    fn default() -> Self {
        Self {
            grid: GridSpec::default(),
            dt: DEFAULT_DT,
            correlation_method: CorrelationMethod::default(),
            subpixel_method: SubpixelMethod::default(),
            sig2noise_method: Sig2NoiseMethod::default(),
            sig2noise_exclusion_radius: DEFAULT_SIG2NOISE_EXCLUSION_RADIUS,
        }
    }
}

impl PivSettings {
    pub fn validate(&self) -> Result<()> {
        self.grid.validate()?;
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(PivError::InvalidSettings(format!(
                "dt must be positive, got {}",
                self.dt
            )));
        }
        Ok(())
    }
}

/// Estimate the velocity field between two frames.
///
/// See [`extended_search_area_piv_with_progress`].
pub fn extended_search_area_piv(
    frame_a: &Frame,
    frame_b: &Frame,
    settings: &PivSettings,
) -> Result<VectorField> {
    extended_search_area_piv_with_progress(frame_a, frame_b, settings, |_| {})
}

/// Estimate the velocity field between two frames, reporting each finished
/// cell through `on_cell_done(cells_done)`.
///
/// Grid, `dt` and frame shapes are checked before any cell is processed.
/// Flat windows and border peaks never abort the pass; they show up as
/// zero-confidence cells with the matching [`CellStatus`].
pub fn extended_search_area_piv_with_progress<F>(
    frame_a: &Frame,
    frame_b: &Frame,
    settings: &PivSettings,
    on_cell_done: F,
) -> Result<VectorField>
where
    F: Fn(usize) + Send + Sync,
{
    settings.validate()?;
    if frame_a.shape() != frame_b.shape() {
        return Err(PivError::ShapeMismatch {
            expected: frame_a.shape(),
            actual: frame_b.shape(),
        });
    }

    let shape = settings.grid.field_shape(frame_a.shape())?;
    let correlator = build_correlator(settings.correlation_method, &settings.grid);
    info!(
        rows = shape.0,
        cols = shape.1,
        method = correlator.name(),
        window = settings.grid.window_size,
        search = settings.grid.search_area_size,
        threads = rayon::current_num_threads(),
        "Correlating frame pair"
    );

    let counter = AtomicUsize::new(0);
    let mut cells = Array2::<CellResult>::default(shape);
    let run_cell = |(row, col): (usize, usize), slot: &mut CellResult| {
        *slot = process_cell(frame_a, frame_b, row, col, settings, correlator.as_ref());
        let done = counter.fetch_add(1, Ordering::Relaxed) + 1;
        on_cell_done(done);
    };

    if cells.len() >= PARALLEL_CELL_THRESHOLD {
        Zip::indexed(&mut cells).par_for_each(run_cell);
    } else {
        Zip::indexed(&mut cells).for_each(run_cell);
    }

    let field = VectorField::from_cells(&cells, settings.dt);
    debug!(
        degenerate = field.count_status(CellStatus::Degenerate),
        border_peaks = field.count_status(CellStatus::BorderPeak),
        "Correlation pass complete"
    );
    Ok(field)
}

/// Correlate a single grid cell. Displacements are in pixels.
pub fn process_cell(
    frame_a: &Frame,
    frame_b: &Frame,
    cell_row: usize,
    cell_col: usize,
    settings: &PivSettings,
    correlator: &dyn Correlator,
) -> CellResult {
    let grid = &settings.grid;
    let (top, left) = grid.window_origin(cell_row, cell_col);
    let window = extract_window(&frame_a.data, top, left, grid.window_size);
    let search = extract_search_area(
        &frame_b.data,
        top,
        left,
        grid.window_size,
        grid.search_area_size,
    );

    let plane = match correlate_windows(correlator, &window, &search) {
        Ok(plane) => plane,
        Err(_) => return CellResult::degenerate(),
    };

    let offset = grid.search_offset();
    let estimate = locate_displacement(
        &plane,
        window.dim(),
        (offset, offset),
        settings.subpixel_method,
    );

    if estimate.at_border {
        return CellResult {
            dx: estimate.dx,
            dy: estimate.dy,
            sig2noise: 0.0,
            status: CellStatus::BorderPeak,
        };
    }

    CellResult {
        dx: estimate.dx,
        dy: estimate.dy,
        sig2noise: sig2noise(
            &plane,
            settings.sig2noise_method,
            settings.sig2noise_exclusion_radius,
        ),
        status: CellStatus::Ok,
    }
}
