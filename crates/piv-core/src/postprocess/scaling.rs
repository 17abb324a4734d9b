use ndarray::Array2;

use crate::error::{PivError, Result};
use crate::field::types::Coordinates;

use super::validation::check_same_shape;

/// Convert pixel coordinates and velocities to physical units by dividing
/// everything by `scaling_factor` (pixels per unit length).
pub fn uniform(
    coordinates: &Coordinates,
    u: &Array2<f64>,
    v: &Array2<f64>,
    scaling_factor: f64,
) -> Result<(Coordinates, Array2<f64>, Array2<f64>)> {
    check_same_shape(u, v)?;
    if !scaling_factor.is_finite() || scaling_factor <= 0.0 {
        return Err(PivError::InvalidSettings(format!(
            "scaling factor must be positive, got {scaling_factor}"
        )));
    }

    let scaled = Coordinates {
        x: &coordinates.x / scaling_factor,
        y: &coordinates.y / scaling_factor,
    };
    Ok((scaled, u / scaling_factor, v / scaling_factor))
}
