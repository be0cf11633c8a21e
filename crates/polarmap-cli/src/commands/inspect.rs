//! Load a measurement set and print what was found.

use super::common::{Format, load_with_tally};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args)]
pub struct InspectArgs {
    /// Measurement directory or file
    #[arg(value_name = "SOURCE")]
    source: PathBuf,

    /// Source encoding
    #[arg(long, value_enum)]
    format: Format,

    /// Sample rate for formats that do not record one
    #[arg(long, default_value = "48000")]
    fs: u32,

    /// Emit the measurement list as JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct MeasurementRow<'a> {
    name: &'a str,
    samples: usize,
    sample_rate: u32,
    h: f64,
    v: f64,
}

pub fn run(args: InspectArgs) -> anyhow::Result<()> {
    let outcome = load_with_tally(args.format, &args.source, args.fs)?;

    let rows: Vec<MeasurementRow<'_>> = outcome
        .measurements
        .iter()
        .map(|m| MeasurementRow {
            name: m.name(),
            samples: m.len(),
            sample_rate: m.sample_rate(),
            h: m.h(),
            v: m.v(),
        })
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!("{:<24} {:>10} {:>8} {:>8} {:>8}", "File", "Samples", "Rate", "H", "V");
    for row in &rows {
        println!(
            "{:<24} {:>10} {:>8} {:>8} {:>8}",
            row.name, row.samples, row.sample_rate, row.h, row.v
        );
    }
    if let Some(peak) = outcome.measurements.first().map(|m| m.peak_index()) {
        let first = &outcome.measurements[0];
        println!(
            "\nReference peak at sample {} (gate guess {}..{})",
            peak,
            first.start_index(),
            first.first_reflection_index()
        );
    }
    Ok(())
}
