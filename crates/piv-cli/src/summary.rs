use std::path::Path;

use console::Style;
use ndarray::Array2;
use piv_core::error::Result;
use piv_core::field::CellStatus;
use piv_core::pipeline::config::PivConfig;
use piv_core::pipeline::{FieldSink, PipelineOutput, ScaledField};

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    method: Style,
    warn: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            method: Style::new().green(),
            warn: Style::new().yellow(),
            path: Style::new().underlined(),
        }
    }
}

pub fn print_config_summary(config: &PivConfig, frame_a: &Path, frame_b: &Path) {
    let s = Styles::new();
    let grid = config.grid();

    println!();
    println!("  {}", s.title.apply_to("PIV Analysis"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(12)));
    println!();

    println!(
        "  {:<14}{}",
        s.label.apply_to("Frame A"),
        s.path.apply_to(frame_a.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Frame B"),
        s.path.apply_to(frame_b.display())
    );
    println!();

    println!("  {}", s.header.apply_to("Correlation"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Method"),
        s.method.apply_to(config.correlation_method)
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Window"),
        s.value.apply_to(format!(
            "{} px (overlap {} px)",
            grid.window_size, grid.overlap
        ))
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Search"),
        s.value.apply_to(format!("{} px", grid.search_area_size))
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Sub-pixel"),
        s.method.apply_to(config.subpixel_method)
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("dt"),
        s.value.apply_to(config.dt)
    );
    println!();

    println!("  {}", s.header.apply_to("Validation"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Metric"),
        s.method.apply_to(config.sig2noise_method)
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Threshold"),
        s.value.apply_to(config.snr_threshold)
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Scale"),
        s.value.apply_to(format!("{} px/unit", config.scaling_factor))
    );
    println!();
}

pub fn print_field_summary(output: &PipelineOutput) {
    let s = Styles::new();
    let raw = &output.raw;
    let (rows, cols) = raw.shape();
    let total = rows * cols;

    println!("  {}", s.header.apply_to("Correlation Result"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Field"),
        s.value.apply_to(format!("{rows} x {cols} ({total} vectors)"))
    );
    for status in [CellStatus::BorderPeak, CellStatus::Degenerate] {
        let count = raw.count_status(status);
        let style = if count > 0 { &s.warn } else { &s.value };
        println!(
            "    {:<12}{}",
            s.label.apply_to(status),
            style.apply_to(count)
        );
    }
    let style = if output.invalid_count > 0 {
        &s.warn
    } else {
        &s.value
    };
    println!(
        "    {:<12}{}",
        s.label.apply_to("Rejected"),
        style.apply_to(format!("{} / {}", output.invalid_count, total))
    );
    if let Some(median) = median(&raw.sig2noise) {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Median S/N"),
            s.value.apply_to(format!("{median:.2}"))
        );
    }
    println!();
}

/// Prints statistics of the scaled field in place of writing it to disk.
pub struct TerminalSink;

impl FieldSink for TerminalSink {
    fn write(&mut self, field: &ScaledField) -> Result<()> {
        let s = Styles::new();
        let speeds: Vec<f64> = field
            .u
            .iter()
            .zip(field.v.iter())
            .map(|(u, v)| u.hypot(*v))
            .filter(|m| m.is_finite())
            .collect();

        println!();
        println!("  {}", s.header.apply_to("Scaled Field"));
        if speeds.is_empty() {
            println!(
                "    {:<12}{}",
                s.label.apply_to("Speed"),
                s.warn.apply_to("no valid vectors")
            );
            return Ok(());
        }

        let mean = speeds.iter().sum::<f64>() / speeds.len() as f64;
        let max = speeds.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        println!(
            "    {:<12}{}",
            s.label.apply_to("Valid"),
            s.value.apply_to(speeds.len())
        );
        println!(
            "    {:<12}{}",
            s.label.apply_to("Mean speed"),
            s.value.apply_to(format!("{mean:.4}"))
        );
        println!(
            "    {:<12}{}",
            s.label.apply_to("Max speed"),
            s.value.apply_to(format!("{max:.4}"))
        );
        Ok(())
    }
}

fn median(data: &Array2<f64>) -> Option<f64> {
    let mut vals: Vec<f64> = data.iter().copied().filter(|v| v.is_finite()).collect();
    if vals.is_empty() {
        return None;
    }
    let mid = vals.len() / 2;
    let (_, m, _) = vals.select_nth_unstable_by(mid, |a, b| a.total_cmp(b));
    Some(*m)
}
