//! Run the analysis pipeline and export the derived data.

use super::common::{Format, load_with_tally};
use anyhow::Context;
use clap::Args;
use polarmap_analysis::{AnalysisModel, DataSource, DspKernel};
use polarmap_core::{GatePair, SmoothingType, WindowSpec, WindowType, XyData};
use polarmap_config::Session;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Measurement directory or file
    #[arg(value_name = "SOURCE")]
    source: PathBuf,

    /// Source encoding
    #[arg(long, value_enum)]
    format: Format,

    /// Sample rate for formats that do not record one
    #[arg(long)]
    fs: Option<u32>,

    /// Session file carrying gate, modal, and display settings
    #[arg(long)]
    session: Option<PathBuf>,

    /// Left gate position in samples (overrides session and auto-guess)
    #[arg(long)]
    left_position: Option<usize>,

    /// Right gate position in samples (overrides session and auto-guess)
    #[arg(long)]
    right_position: Option<usize>,

    /// Gate window type (Rectangle, Hann, Hamming, Blackman-Harris,
    /// Nuttall, Tukey; unknown names fall back to Tukey)
    #[arg(long, default_value = "Tukey")]
    window: String,

    /// Taper percentage for both gate edges
    #[arg(long, default_value = "25")]
    taper_percent: u8,

    /// Smoothing applied to magnitude exports (e.g. "1/3 Octave")
    #[arg(long)]
    smoothing: Option<String>,

    /// Normalise magnitude exports against this angle
    #[arg(long)]
    normalise: Option<f64>,

    /// Fit the modal model and export the reconstructed dataset
    #[arg(long)]
    modal: bool,

    /// Export a polar slice at this frequency (repeatable)
    #[arg(long = "polar")]
    polar_freqs: Vec<f64>,

    /// Output directory for the exported data
    #[arg(short, long, default_value = ".")]
    output: PathBuf,
}

pub fn run(args: AnalyzeArgs) -> anyhow::Result<()> {
    let session = match &args.session {
        Some(path) => {
            Session::load(path).with_context(|| format!("loading session {}", path.display()))?
        }
        None => Session::new("cli"),
    };
    let sample_rate = args.fs.unwrap_or(session.sample_rate);
    if args.fs.is_some() && args.format.carries_sample_rate() {
        info!(
            target: "polarmap::cli",
            "--fs ignored, the {:?} format records its own sample rate", args.format
        );
    }

    let outcome = load_with_tally(args.format, &args.source, sample_rate)?;
    anyhow::ensure!(
        !outcome.measurements.is_empty(),
        "no measurements loaded from {}",
        args.source.display()
    );

    let mut model = AnalysisModel::new(DspKernel);
    model.load(outcome.measurements);

    let gate = resolve_gate(&args, &session, &model)?;
    info!(
        target: "polarmap::cli",
        "gating {}..{} with {} tapers",
        gate.left.position,
        gate.right.position,
        gate.left.window_type
    );

    if let Some(name) = &args.smoothing {
        let smoothing: SmoothingType = name
            .parse()
            .with_context(|| format!("--smoothing {name}"))?;
        model.set_smoothing(Some(smoothing));
    } else {
        model.set_smoothing(session.smoothing);
    }
    if let Some(angle) = args.normalise {
        model.set_normalisation(true, angle);
    } else if session.display.normalised {
        model.set_normalisation(true, session.display.normalisation_angle);
    }
    model.set_modal_parameters(session.modal);

    model.analyse(&gate);
    if args.modal {
        model
            .analyse_modal()
            .context("modal analysis failed, frequency-domain exports are still valid")?;
    }

    std::fs::create_dir_all(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    export(&model, &args, DataSource::Measured, "measured")?;
    if args.modal {
        export(&model, &args, DataSource::Modal, "modal")?;
    }
    println!("Exported analysis to {}", args.output.display());
    Ok(())
}

/// Gate precedence: explicit positions, then the session file, then the
/// auto-guess from the first measurement.
fn resolve_gate(
    args: &AnalyzeArgs,
    session: &Session,
    model: &AnalysisModel<DspKernel>,
) -> anyhow::Result<GatePair> {
    let window_type = WindowType::from_name(&args.window);
    if let (Some(left), Some(right)) = (args.left_position, args.right_position) {
        return Ok(GatePair::new(
            WindowSpec::new(left, window_type, args.taper_percent),
            WindowSpec::new(right, window_type, args.taper_percent),
        ));
    }
    let mut gate = if args.session.is_some() {
        session.gate.clone()
    } else {
        model
            .default_gate()
            .context("cannot guess a gate for frequency-domain data, pass --left-position/--right-position")?
    };
    if let Some(left) = args.left_position {
        gate.set_left_position(left);
    }
    if let Some(right) = args.right_position {
        gate.set_right_position(right);
    }
    Ok(gate)
}

fn export(
    model: &AnalysisModel<DspKernel>,
    args: &AnalyzeArgs,
    source: DataSource,
    label: &str,
) -> anyhow::Result<()> {
    let magnitude = model.magnitude_data(source);
    write_magnitude_csv(&args.output.join(format!("{label}_magnitude.csv")), &magnitude)?;

    if let Some(contour) = model.contour_data(source) {
        let path = args.output.join(format!("{label}_contour.csv"));
        let mut file = File::create(&path)?;
        writeln!(file, "freq_hz,angle_deg,magnitude_db")?;
        for i in 0..contour.x.len() {
            writeln!(file, "{:.6},{:.2},{:.6}", contour.x[i], contour.y[i], contour.z[i])?;
        }
    }

    if source == DataSource::Measured {
        if let (Some(power), Some(di)) = (model.power_response(), model.directivity_index()) {
            let path = args.output.join("power.csv");
            let mut file = File::create(&path)?;
            writeln!(file, "freq_hz,power_db,di_db")?;
            for i in 0..power.x.len() {
                writeln!(file, "{:.6},{:.6},{:.6}", power.x[i], power.y[i], di.y[i])?;
            }
        }
        if let Some(data) = model.complex_data(source) {
            for d in data {
                write_frd(&args.output.join(format!("{}.frd", d.display_name)), d)?;
            }
        }
    }

    for &freq in &args.polar_freqs {
        if let Some(slice) = model.polar_slice(source, freq) {
            let path = args
                .output
                .join(format!("{label}_polar_{:.0}hz.csv", slice.freq));
            let mut file = File::create(&path)?;
            writeln!(file, "angle_deg,magnitude_db")?;
            for (theta, r) in slice.theta.iter().zip(&slice.r) {
                writeln!(file, "{:.2},{:.6}", theta.to_degrees(), r)?;
            }
        }
    }
    Ok(())
}

/// Long-format magnitude CSV: one row per (angle, frequency) pair, robust
/// to datasets whose frequency axes differ.
fn write_magnitude_csv(path: &Path, series: &[XyData]) -> anyhow::Result<()> {
    let mut file = File::create(path)?;
    writeln!(file, "name,angle_deg,freq_hz,magnitude_db")?;
    for s in series {
        for (x, y) in s.x.iter().zip(&s.y) {
            writeln!(file, "{},{:.2},{:.6},{:.6}", s.name, s.angle, x, y)?;
        }
    }
    Ok(())
}

/// FRD export: frequency, magnitude in dB, phase in degrees.
fn write_frd(
    path: &Path,
    data: &polarmap_core::ComplexFrequencyData,
) -> anyhow::Result<()> {
    let mut file = File::create(path)?;
    writeln!(file, "* Frequency response exported by polarmap")?;
    let magnitude = data.magnitude(1.0);
    let phase = data.phase();
    for i in 0..data.frequencies.len() {
        writeln!(
            file,
            "{:.6} {:.6} {:.6}",
            data.frequencies[i],
            magnitude.y[i],
            phase.y[i].to_degrees()
        )?;
    }
    Ok(())
}
