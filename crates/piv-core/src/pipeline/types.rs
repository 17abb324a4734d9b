use ndarray::Array2;

use crate::error::Result;
use crate::field::types::{Coordinates, VectorField};

/// Pipeline processing stage, used for progress reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineStage {
    Correlating,
    Validating,
    ReplacingOutliers,
    Scaling,
    Writing,
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Correlating => write!(f, "Correlating windows"),
            Self::Validating => write!(f, "Validating vectors"),
            Self::ReplacingOutliers => write!(f, "Replacing outliers"),
            Self::Scaling => write!(f, "Scaling"),
            Self::Writing => write!(f, "Writing output"),
        }
    }
}

/// Vector field in physical units, ready to be persisted.
#[derive(Clone, Debug)]
pub struct ScaledField {
    pub coordinates: Coordinates,
    pub u: Array2<f64>,
    pub v: Array2<f64>,
    /// `true` where the vector was rejected by validation.
    pub mask: Array2<bool>,
}

/// Result of a full pipeline run.
#[derive(Clone, Debug)]
pub struct PipelineOutput {
    /// Raw correlation result in pixels per time unit.
    pub raw: VectorField,
    pub scaled: ScaledField,
    pub invalid_count: usize,
}

/// Destination for the finished field (file writer, terminal, ...).
pub trait FieldSink {
    fn write(&mut self, field: &ScaledField) -> Result<()>;
}

/// Sink that discards the field.
pub struct NullSink;
impl FieldSink for NullSink {
    fn write(&mut self, _field: &ScaledField) -> Result<()> {
        Ok(())
    }
}

/// Thread-safe progress reporting for the pipeline.
///
/// Implementors can use this to drive progress bars, logging, or any other
/// UI feedback. All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    /// A new pipeline stage has started. `total_items` is the number of
    /// work items in this stage (e.g., cell count), if known.
    fn begin_stage(&self, _stage: PipelineStage, _total_items: Option<usize>) {}

    /// One work item within the current stage has completed.
    fn advance(&self, _items_done: usize) {}

    /// The current stage is finished.
    fn finish_stage(&self) {}
}

/// No-op progress reporter, used when `run_pipeline` delegates.
pub(super) struct NoOpReporter;
impl ProgressReporter for NoOpReporter {}
