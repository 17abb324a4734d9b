use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Parameters handed to an [`OutlierFiller`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlierSettings {
    /// Maximum number of fill iterations.
    pub max_iter: usize,
    /// Half-size of the neighbourhood used to estimate replacements.
    pub kernel_size: usize,
}

/// Replaces rejected vectors (NaN in `u`/`v`, `true` in `mask`) with
/// estimates from their neighbourhood.
///
/// Implementations must return arrays of the input shape and leave accepted
/// vectors untouched.
pub trait OutlierFiller: Send + Sync {
    fn fill(
        &self,
        u: &Array2<f64>,
        v: &Array2<f64>,
        mask: &Array2<bool>,
        settings: &OutlierSettings,
    ) -> Result<(Array2<f64>, Array2<f64>)>;
}

/// Filler that leaves rejected vectors as NaN.
#[derive(Clone, Copy, Debug, Default)]
pub struct KeepInvalid;

impl OutlierFiller for KeepInvalid {
    fn fill(
        &self,
        u: &Array2<f64>,
        v: &Array2<f64>,
        _mask: &Array2<bool>,
        _settings: &OutlierSettings,
    ) -> Result<(Array2<f64>, Array2<f64>)> {
        Ok((u.clone(), v.clone()))
    }
}
