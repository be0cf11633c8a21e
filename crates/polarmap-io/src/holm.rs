//! HolmImpulse single-file loader.
//!
//! One export holds every angle as a `;`-delimited column. The comment
//! header must carry a `Samplerate: <int>` line and a column-name row of
//! the form `## sample;<idx> (<angle>) ;…`; the parenthesized tokens are
//! the angle names.

use crate::{Error, FormatLoader, LoadOutcome, Result};
use polarmap_core::Measurement;
use regex::Regex;
use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;
use tracing::debug;

/// Loads a single HolmImpulse text export holding many angle columns.
#[derive(Debug, Clone)]
pub struct HolmLoader {
    file: PathBuf,
}

impl HolmLoader {
    /// Create a loader for `file`.
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self { file: file.into() }
    }
}

fn angle_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\(([^)]+)\)").unwrap())
}

impl FormatLoader for HolmLoader {
    fn load(&self) -> Result<LoadOutcome> {
        let text = fs::read_to_string(&self.file).map_err(|e| Error::io(&self.file, e))?;

        let mut sample_rate: Option<u32> = None;
        let mut angles: Option<Vec<f64>> = None;
        for line in text.lines().filter(|l| l.starts_with('#')) {
            if let Some(rest) = line.split("Samplerate:").nth(1) {
                sample_rate = rest.split_whitespace().next().and_then(|v| v.parse().ok());
            }
            if line.starts_with("##") && line.contains("sample;") {
                let parsed: Option<Vec<f64>> = angle_name_pattern()
                    .captures_iter(line)
                    .map(|c| c[1].trim().parse::<f64>().ok())
                    .collect();
                angles = parsed;
            }
        }
        let sample_rate = sample_rate.ok_or(Error::MissingHeader {
            path: self.file.clone(),
            what: "a 'Samplerate:' header line",
        })?;
        let angles = angles.ok_or(Error::MissingHeader {
            path: self.file.clone(),
            what: "a '## sample' column-name row",
        })?;

        // one sample column per angle, the leading column is the sample index
        let mut columns: Vec<Vec<f64>> = vec![Vec::new(); angles.len()];
        for line in text
            .lines()
            .filter(|l| !l.starts_with('#') && !l.trim().is_empty())
        {
            for (slot, field) in columns.iter_mut().zip(line.split(';').skip(1)) {
                let value = field.trim().parse::<f64>().map_err(|_| {
                    Error::malformed(&self.file, format!("bad sample value '{}'", field.trim()))
                })?;
                slot.push(value);
            }
        }

        let mut outcome = LoadOutcome::default();
        for (angle, samples) in angles.into_iter().zip(columns) {
            debug!(
                target: "polarmap::io",
                "holm column at {}deg: {} samples", angle, samples.len()
            );
            outcome
                .measurements
                .push(Measurement::new(format!("H{angle}"), angle, 0.0, sample_rate, samples));
        }
        outcome.loaded.push(self.file.clone());
        outcome.sort_by_angle();
        Ok(outcome)
    }
}
