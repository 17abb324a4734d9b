use ndarray::{Array1, Array2};

/// Per-cell outcome of the correlation pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CellStatus {
    /// Peak found and refined to sub-pixel precision.
    #[default]
    Ok,
    /// Peak on the border of the correlation plane; integer estimate only,
    /// confidence degraded to zero.
    BorderPeak,
    /// Flat window (no texture to correlate); zero vector, zero confidence.
    Degenerate,
}

impl std::fmt::Display for CellStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ok => write!(f, "Ok"),
            Self::BorderPeak => write!(f, "Border Peak"),
            Self::Degenerate => write!(f, "Degenerate"),
        }
    }
}

/// Result of a single interrogation cell, in pixels.
#[derive(Clone, Copy, Debug, Default)]
pub struct CellResult {
    /// Displacement along columns.
    pub dx: f64,
    /// Displacement along rows (downwards).
    pub dy: f64,
    pub sig2noise: f64,
    pub status: CellStatus,
}

impl CellResult {
    pub fn degenerate() -> Self {
        Self {
            dx: 0.0,
            dy: 0.0,
            sig2noise: 0.0,
            status: CellStatus::Degenerate,
        }
    }
}

/// Window-centre coordinates of a vector field.
#[derive(Clone, Debug, PartialEq)]
pub struct Coordinates {
    /// Column centres, one per field column.
    pub x: Array1<f64>,
    /// Row centres, one per field row.
    pub y: Array1<f64>,
}

impl Coordinates {
    /// Expand into full (rows, cols) grids, one entry per vector.
    pub fn meshgrid(&self) -> (Array2<f64>, Array2<f64>) {
        let shape = (self.y.len(), self.x.len());
        let xs = Array2::from_shape_fn(shape, |(_, c)| self.x[c]);
        let ys = Array2::from_shape_fn(shape, |(r, _)| self.y[r]);
        (xs, ys)
    }
}

/// Velocity field produced by one correlation pass.
///
/// `u` is along columns, `v` along rows (image convention, positive down),
/// both already divided by `dt`. All arrays share the same shape.
#[derive(Clone, Debug)]
pub struct VectorField {
    pub u: Array2<f64>,
    pub v: Array2<f64>,
    pub sig2noise: Array2<f64>,
    pub status: Array2<CellStatus>,
}

impl VectorField {
    /// Assemble the field from per-cell pixel results, converting to velocity.
    pub fn from_cells(cells: &Array2<CellResult>, dt: f64) -> Self {
        Self {
            u: cells.mapv(|c| c.dx / dt),
            v: cells.mapv(|c| c.dy / dt),
            sig2noise: cells.mapv(|c| c.sig2noise),
            status: cells.mapv(|c| c.status),
        }
    }

    /// (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        self.u.dim()
    }

    pub fn count_status(&self, status: CellStatus) -> usize {
        self.status.iter().filter(|&&s| s == status).count()
    }
}
