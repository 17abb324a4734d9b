use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_DT, DEFAULT_OUTLIER_KERNEL_SIZE, DEFAULT_OUTLIER_MAX_ITER, DEFAULT_OVERLAP,
    DEFAULT_SCALING_FACTOR, DEFAULT_SIG2NOISE_EXCLUSION_RADIUS, DEFAULT_SNR_THRESHOLD,
    DEFAULT_WINDOW_SIZE,
};
use crate::error::{PivError, Result};
use crate::field::driver::PivSettings;
use crate::field::grid::GridSpec;
use crate::postprocess::outliers::OutlierSettings;

/// How the correlation plane of two windows is computed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CorrelationMethod {
    /// Zero-padded frequency-domain correlation.
    #[default]
    Fft,
    /// Explicit spatial summation.
    Direct,
}

impl std::fmt::Display for CorrelationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fft => write!(f, "FFT"),
            Self::Direct => write!(f, "Direct"),
        }
    }
}

/// 3-point peak interpolation scheme.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubpixelMethod {
    #[default]
    Gaussian,
    Parabolic,
    Centroid,
}

impl std::fmt::Display for SubpixelMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gaussian => write!(f, "Gaussian"),
            Self::Parabolic => write!(f, "Parabolic"),
            Self::Centroid => write!(f, "Centroid"),
        }
    }
}

/// Confidence metric derived from the correlation plane.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sig2NoiseMethod {
    /// Primary peak over the best competing local maximum.
    #[default]
    Peak2Peak,
    /// Primary peak over the mean absolute plane value.
    Peak2Mean,
}

impl std::fmt::Display for Sig2NoiseMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Peak2Peak => write!(f, "Peak to Peak"),
            Self::Peak2Mean => write!(f, "Peak to Mean"),
        }
    }
}

/// Full analysis configuration: correlation, validation, outlier handling and
/// scaling.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PivConfig {
    /// Interrogation window size in pixels.
    pub window_size: usize,
    /// Overlap between neighbouring windows in pixels.
    pub overlap: usize,
    /// Search area size in pixels; `None` uses the window size.
    pub search_area_size: Option<usize>,
    /// Time between the two frames.
    pub dt: f64,
    pub correlation_method: CorrelationMethod,
    pub subpixel_method: SubpixelMethod,
    pub sig2noise_method: Sig2NoiseMethod,
    /// Half-width of the zone ignored around the primary peak (peak-to-peak).
    pub sig2noise_exclusion_radius: usize,
    /// Vectors with a lower signal-to-noise ratio are flagged invalid.
    pub snr_threshold: f64,
    pub outlier_max_iter: usize,
    pub outlier_kernel_size: usize,
    /// Pixels per physical length unit.
    pub scaling_factor: f64,
}

impl Default for PivConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            overlap: DEFAULT_OVERLAP,
            search_area_size: None,
            dt: DEFAULT_DT,
            correlation_method: CorrelationMethod::default(),
            subpixel_method: SubpixelMethod::default(),
            sig2noise_method: Sig2NoiseMethod::default(),
            sig2noise_exclusion_radius: DEFAULT_SIG2NOISE_EXCLUSION_RADIUS,
            snr_threshold: DEFAULT_SNR_THRESHOLD,
            outlier_max_iter: DEFAULT_OUTLIER_MAX_ITER,
            outlier_kernel_size: DEFAULT_OUTLIER_KERNEL_SIZE,
            scaling_factor: DEFAULT_SCALING_FACTOR,
        }
    }
}

impl PivConfig {
    pub fn grid(&self) -> GridSpec {
        GridSpec::new(self.window_size, self.overlap)
            .with_search_area(self.search_area_size.unwrap_or(self.window_size))
    }

    pub fn settings(&self) -> PivSettings {
        PivSettings {
            grid: self.grid(),
            dt: self.dt,
            correlation_method: self.correlation_method,
            subpixel_method: self.subpixel_method,
            sig2noise_method: self.sig2noise_method,
            sig2noise_exclusion_radius: self.sig2noise_exclusion_radius,
        }
    }

    pub fn outlier_settings(&self) -> OutlierSettings {
        OutlierSettings {
            max_iter: self.outlier_max_iter,
            kernel_size: self.outlier_kernel_size,
        }
    }

    /// Check everything that would make a run fail, before any work starts.
    pub fn validate(&self) -> Result<()> {
        self.settings().validate()?;
        if !self.snr_threshold.is_finite() || self.snr_threshold < 0.0 {
            return Err(PivError::InvalidSettings(format!(
                "signal-to-noise threshold must be finite and non-negative, got {}",
                self.snr_threshold
            )));
        }
        if !self.scaling_factor.is_finite() || self.scaling_factor <= 0.0 {
            return Err(PivError::InvalidSettings(format!(
                "scaling factor must be positive, got {}",
                self.scaling_factor
            )));
        }
        Ok(())
    }
}
