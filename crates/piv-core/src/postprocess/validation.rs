use ndarray::{Array2, Zip};

use crate::error::{PivError, Result};

/// Velocity components after validation.
///
/// `mask` is `true` for rejected vectors, whose `u` and `v` are NaN.
#[derive(Clone, Debug)]
pub struct ValidatedField {
    pub u: Array2<f64>,
    pub v: Array2<f64>,
    pub mask: Array2<bool>,
}

impl ValidatedField {
    pub fn invalid_count(&self) -> usize {
        self.mask.iter().filter(|&&m| m).count()
    }
}

/// Reject vectors whose signal-to-noise ratio is below `threshold`.
pub fn sig2noise_val(
    u: &Array2<f64>,
    v: &Array2<f64>,
    sig2noise: &Array2<f64>,
    threshold: f64,
) -> Result<ValidatedField> {
    check_same_shape(u, v)?;
    check_same_shape(u, sig2noise)?;
    if !threshold.is_finite() {
        return Err(PivError::InvalidSettings(format!(
            "signal-to-noise threshold must be finite, got {threshold}"
        )));
    }

    let mask = sig2noise.mapv(|s| s < threshold);
    let reject = |value: &f64, &masked: &bool| if masked { f64::NAN } else { *value };
    let u = Zip::from(u).and(&mask).map_collect(reject);
    let v = Zip::from(v).and(&mask).map_collect(reject);

    Ok(ValidatedField { u, v, mask })
}

pub(crate) fn check_same_shape<A, B>(a: &Array2<A>, b: &Array2<B>) -> Result<()> {
    if a.dim() != b.dim() {
        return Err(PivError::ShapeMismatch {
            expected: a.dim(),
            actual: b.dim(),
        });
    }
    Ok(())
}
