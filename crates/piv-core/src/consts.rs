/// Minimum number of grid cells to use cell-level Rayon parallelism.
pub const PARALLEL_CELL_THRESHOLD: usize = 16;

/// Small epsilon to avoid division by zero in floating-point comparisons.
pub const EPSILON: f64 = 1e-10;

/// Signal-to-noise value reported when no competing correlation peak exists
/// (flat plane, or nothing positive outside the exclusion zone).
/// Finite so the value survives persistence and arithmetic downstream.
pub const SIG2NOISE_SENTINEL: f64 = 1.0e6;

/// Default half-width of the square zone around the primary peak that is
/// ignored when searching for the competing peak.
pub const DEFAULT_SIG2NOISE_EXCLUSION_RADIUS: usize = 2;

/// Maximum sub-pixel correction applied to an integer peak, in pixels.
pub const SUBPIXEL_CLAMP: f64 = 0.5;

/// Default interrogation window size in pixels.
pub const DEFAULT_WINDOW_SIZE: usize = 24;

/// Default overlap between neighbouring interrogation windows in pixels.
pub const DEFAULT_OVERLAP: usize = 12;

/// Default time between the two frames in seconds.
pub const DEFAULT_DT: f64 = 0.02;

/// Default signal-to-noise acceptance threshold.
pub const DEFAULT_SNR_THRESHOLD: f64 = 2.5;

/// Default maximum iterations handed to the outlier filler.
pub const DEFAULT_OUTLIER_MAX_ITER: usize = 10;

/// Default neighbourhood half-size handed to the outlier filler.
pub const DEFAULT_OUTLIER_KERNEL_SIZE: usize = 2;

/// Default pixels-per-physical-unit scaling factor.
pub const DEFAULT_SCALING_FACTOR: f64 = 96.52;
