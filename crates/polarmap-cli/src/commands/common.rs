//! Shared CLI helpers used across multiple commands.

use anyhow::Context;
use clap::ValueEnum;
use indicatif::{ProgressBar, ProgressStyle};
use polarmap_io::{
    ArtaLoader, DblLoader, FormatLoader, HolmLoader, LoadOutcome, NfsLoader, RewLoader, TxtLoader,
    WavLoader,
};
use std::path::Path;
use std::time::Duration;

/// The measurement encodings the CLI can ingest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Directory of newline-delimited float text files.
    Txt,
    /// Directory of raw little-endian f64 binary files.
    Dbl,
    /// Directory of RIFF/WAVE files.
    Wav,
    /// Single HolmImpulse export.
    Holm,
    /// Directory of REW text exports.
    Rew,
    /// Directory of ARTA .pir files.
    Arta,
    /// Single near-field-scanner export.
    Nfs,
}

impl Format {
    /// True when the format records its own sample rate.
    pub fn carries_sample_rate(self) -> bool {
        !matches!(self, Format::Txt | Format::Dbl)
    }
}

/// Build the loader for `format` over `source`.
fn loader(format: Format, source: &Path, sample_rate: u32) -> Box<dyn FormatLoader> {
    match format {
        Format::Txt => Box::new(TxtLoader::new(source, sample_rate)),
        Format::Dbl => Box::new(DblLoader::new(source, sample_rate)),
        Format::Wav => Box::new(WavLoader::new(source)),
        Format::Holm => Box::new(HolmLoader::new(source)),
        Format::Rew => Box::new(RewLoader::new(source)),
        Format::Arta => Box::new(ArtaLoader::new(source)),
        Format::Nfs => Box::new(NfsLoader::new(source)),
    }
}

/// Load `source` as `format`, showing a spinner while the loader works and
/// printing the loaded/ignored tally afterwards.
pub fn load_with_tally(
    format: Format,
    source: &Path,
    sample_rate: u32,
) -> anyhow::Result<LoadOutcome> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner());
    spinner.set_message(format!("Loading {}", source.display()));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let outcome = loader(format, source, sample_rate)
        .load()
        .with_context(|| format!("loading {} as {:?}", source.display(), format))?;
    spinner.finish_and_clear();

    println!(
        "Loaded {} measurements from {} file(s), ignored {}",
        outcome.measurements.len(),
        outcome.loaded.len(),
        outcome.ignored.len()
    );
    for (path, reason) in &outcome.ignored {
        println!("  ignored {}: {}", path.display(), reason);
    }
    Ok(outcome)
}
