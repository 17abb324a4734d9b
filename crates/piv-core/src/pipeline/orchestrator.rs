use tracing::info;

use crate::error::Result;
use crate::field::driver::extended_search_area_piv_with_progress;
use crate::field::grid::get_coordinates;
use crate::frame::Frame;
use crate::postprocess::outliers::{KeepInvalid, OutlierFiller};
use crate::postprocess::scaling::uniform;
use crate::postprocess::validation::sig2noise_val;

use super::config::PivConfig;
use super::types::{
    FieldSink, NoOpReporter, PipelineOutput, PipelineStage, ProgressReporter, ScaledField,
};

/// Run the full analysis with a thread-safe progress reporter:
/// correlate, validate by signal-to-noise, replace outliers, scale, write.
pub fn run_pipeline_reported(
    frame_a: &Frame,
    frame_b: &Frame,
    config: &PivConfig,
    filler: &dyn OutlierFiller,
    sink: &mut dyn FieldSink,
    reporter: &dyn ProgressReporter,
) -> Result<PipelineOutput> {
    config.validate()?;
    let settings = config.settings();
    let grid = settings.grid;
    let shape = grid.field_shape(frame_a.shape())?;
    info!(
        width = frame_a.width(),
        height = frame_a.height(),
        cells = shape.0 * shape.1,
        method = %config.correlation_method,
        "Starting PIV analysis"
    );

    reporter.begin_stage(PipelineStage::Correlating, Some(shape.0 * shape.1));
    let raw = extended_search_area_piv_with_progress(frame_a, frame_b, &settings, |done| {
        reporter.advance(done)
    })?;
    reporter.finish_stage();

    // Coordinates follow the interrogation window, independent of the search area.
    let coordinates = get_coordinates(frame_a.shape(), grid.window_size, grid.overlap)?;

    reporter.begin_stage(PipelineStage::Validating, None);
    let validated = sig2noise_val(&raw.u, &raw.v, &raw.sig2noise, config.snr_threshold)?;
    let invalid_count = validated.invalid_count();
    info!(
        invalid = invalid_count,
        threshold = config.snr_threshold,
        "Signal-to-noise validation complete"
    );
    reporter.finish_stage();

    reporter.begin_stage(PipelineStage::ReplacingOutliers, None);
    let (u, v) = filler.fill(
        &validated.u,
        &validated.v,
        &validated.mask,
        &config.outlier_settings(),
    )?;
    reporter.finish_stage();

    reporter.begin_stage(PipelineStage::Scaling, None);
    let (coordinates, u, v) = uniform(&coordinates, &u, &v, config.scaling_factor)?;
    reporter.finish_stage();

    let scaled = ScaledField {
        coordinates,
        u,
        v,
        mask: validated.mask,
    };

    reporter.begin_stage(PipelineStage::Writing, None);
    sink.write(&scaled)?;
    reporter.finish_stage();
    info!("PIV analysis complete");

    Ok(PipelineOutput {
        raw,
        scaled,
        invalid_count,
    })
}

/// Run the full analysis without outlier replacement or progress reporting.
pub fn run_pipeline(
    frame_a: &Frame,
    frame_b: &Frame,
    config: &PivConfig,
    sink: &mut dyn FieldSink,
) -> Result<PipelineOutput> {
    run_pipeline_reported(frame_a, frame_b, config, &KeepInvalid, sink, &NoOpReporter)
}
