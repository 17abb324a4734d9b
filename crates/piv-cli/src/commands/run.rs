use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use piv_core::io::load_frame_pair;
use piv_core::pipeline::config::{CorrelationMethod, PivConfig, Sig2NoiseMethod, SubpixelMethod};
use piv_core::pipeline::{run_pipeline_reported, PipelineStage, ProgressReporter};
use piv_core::postprocess::KeepInvalid;

use crate::summary::{print_config_summary, print_field_summary, TerminalSink};

#[derive(Clone, ValueEnum)]
pub enum CorrelationArg {
    Fft,
    Direct,
}

impl From<CorrelationArg> for CorrelationMethod {
    fn from(arg: CorrelationArg) -> Self {
        match arg {
            CorrelationArg::Fft => Self::Fft,
            CorrelationArg::Direct => Self::Direct,
        }
    }
}

#[derive(Clone, ValueEnum)]
pub enum SubpixelArg {
    Gaussian,
    Parabolic,
    Centroid,
}

impl From<SubpixelArg> for SubpixelMethod {
    fn from(arg: SubpixelArg) -> Self {
        match arg {
            SubpixelArg::Gaussian => Self::Gaussian,
            SubpixelArg::Parabolic => Self::Parabolic,
            SubpixelArg::Centroid => Self::Centroid,
        }
    }
}

#[derive(Clone, ValueEnum)]
pub enum Sig2NoiseArg {
    Peak2peak,
    Peak2mean,
}

impl From<Sig2NoiseArg> for Sig2NoiseMethod {
    fn from(arg: Sig2NoiseArg) -> Self {
        match arg {
            Sig2NoiseArg::Peak2peak => Self::Peak2Peak,
            Sig2NoiseArg::Peak2mean => Self::Peak2Mean,
        }
    }
}

#[derive(Args)]
pub struct RunArgs {
    /// First frame of the pair
    pub frame_a: PathBuf,

    /// Second frame of the pair
    pub frame_b: PathBuf,

    /// Analysis config file (TOML); cannot be combined with the flags below
    #[arg(
        long,
        conflicts_with_all = [
            "window_size",
            "overlap",
            "search_area_size",
            "dt",
            "method",
            "subpixel",
            "sig2noise",
            "threshold",
            "scale",
        ]
    )]
    pub config: Option<PathBuf>,

    /// Interrogation window size in pixels
    #[arg(long, default_value = "24")]
    pub window_size: usize,

    /// Overlap between neighbouring windows in pixels
    #[arg(long, default_value = "12")]
    pub overlap: usize,

    /// Search area size in pixels (defaults to the window size)
    #[arg(long)]
    pub search_area_size: Option<usize>,

    /// Time between the frames
    #[arg(long, default_value = "0.02")]
    pub dt: f64,

    /// Correlation method
    #[arg(long, value_enum, default_value = "fft")]
    pub method: CorrelationArg,

    /// Sub-pixel peak interpolation
    #[arg(long, value_enum, default_value = "gaussian")]
    pub subpixel: SubpixelArg,

    /// Signal-to-noise metric
    #[arg(long, value_enum, default_value = "peak2peak")]
    pub sig2noise: Sig2NoiseArg,

    /// Reject vectors with a lower signal-to-noise ratio
    #[arg(long, default_value = "2.5")]
    pub threshold: f64,

    /// Pixels per physical length unit
    #[arg(long, default_value = "96.52")]
    pub scale: f64,
}

pub fn run(args: &RunArgs) -> Result<()> {
    let config = if let Some(ref config_path) = args.config {
        let contents = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config {}", config_path.display()))?;
        toml::from_str(&contents).context("Invalid analysis config")?
    } else {
        build_config_from_args(args)
    };
    config.validate().context("Invalid analysis config")?;

    let (frame_a, frame_b) = load_frame_pair(&args.frame_a, &args.frame_b)
        .context("Failed to load frame pair")?;

    print_config_summary(&config, &args.frame_a, &args.frame_b);

    let reporter = BarReporter::new()?;
    let mut sink = TerminalSink;
    let output = run_pipeline_reported(
        &frame_a,
        &frame_b,
        &config,
        &KeepInvalid,
        &mut sink,
        &reporter,
    )?;
    reporter.bar.finish_and_clear();

    print_field_summary(&output);
    Ok(())
}

fn build_config_from_args(args: &RunArgs) -> PivConfig {
    PivConfig {
        window_size: args.window_size,
        overlap: args.overlap,
        search_area_size: args.search_area_size,
        dt: args.dt,
        correlation_method: args.method.clone().into(),
        subpixel_method: args.subpixel.clone().into(),
        sig2noise_method: args.sig2noise.clone().into(),
        snr_threshold: args.threshold,
        scaling_factor: args.scale,
        ..PivConfig::default()
    }
}

/// Drives an indicatif bar from pipeline progress.
struct BarReporter {
    bar: ProgressBar,
}

impl BarReporter {
    fn new() -> Result<Self> {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{msg:20} [{bar:40}] {pos}/{len}")?
                .progress_chars("=> "),
        );
        Ok(Self { bar })
    }
}

impl ProgressReporter for BarReporter {
    fn begin_stage(&self, stage: PipelineStage, total_items: Option<usize>) {
        self.bar.set_message(stage.to_string());
        self.bar.set_length(total_items.unwrap_or(1) as u64);
        self.bar.set_position(0);
    }

    /// Cells finish out of order across workers, so only one step is taken
    /// per call.
    fn advance(&self, _items_done: usize) {
        self.bar.inc(1);
    }

    fn finish_stage(&self) {
        if let Some(len) = self.bar.length() {
            self.bar.set_position(len);
        }
    }
}
