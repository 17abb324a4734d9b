pub mod outliers;
pub mod scaling;
pub mod validation;

pub use outliers::{KeepInvalid, OutlierFiller, OutlierSettings};
pub use scaling::uniform;
pub use validation::{sig2noise_val, ValidatedField};
