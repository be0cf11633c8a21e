//! Directory-based loaders: raw text samples and raw f64 binary.

use crate::angle;
use crate::{Error, FormatLoader, LoadOutcome, Result};
use polarmap_core::Measurement;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Walk `dir` for files with `ext`, parse the angle from each file name and
/// the samples with `parse`, skipping and recording files that fail either
/// step.
pub(crate) fn load_directory<F>(dir: &Path, ext: &str, parse: F) -> Result<LoadOutcome>
where
    F: Fn(&Path) -> Result<(Vec<f64>, u32)>,
{
    let entries = fs::read_dir(dir).map_err(|e| Error::io(dir, e))?;
    let mut outcome = LoadOutcome::default();
    for entry in entries {
        let entry = entry.map_err(|e| Error::io(dir, e))?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some(ext) {
            continue;
        }
        match load_file(&path, &parse) {
            Ok(m) => {
                debug!(target: "polarmap::io", "loaded {} ({} samples)", path.display(), m.len());
                outcome.loaded.push(path);
                outcome.measurements.push(m);
            }
            Err(e) => {
                debug!(target: "polarmap::io", "ignored {}: {}", path.display(), e);
                outcome.ignored.push((path, e));
            }
        }
    }
    outcome.sort_by_angle();
    Ok(outcome)
}

fn load_file<F>(path: &Path, parse: &F) -> Result<Measurement>
where
    F: Fn(&Path) -> Result<(Vec<f64>, u32)>,
{
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| Error::NoAngle { path: path.into() })?;
    let (h, v) = angle::from_file_name(stem)
        .ok_or_else(|| Error::NoAngle { path: path.into() })?
        .hv();
    let (samples, sample_rate) = parse(path)?;
    Ok(Measurement::new(stem, h, v, sample_rate, samples))
}

/// Parse a text file containing one float per line.
pub(crate) fn parse_float_lines(path: &Path) -> Result<Vec<f64>> {
    let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(|l| {
            l.parse::<f64>()
                .map_err(|_| Error::malformed(path, format!("bad sample value '{l}'")))
        })
        .collect()
}

/// Loads a directory of `.txt` files, one newline-delimited float sample
/// per line, one file per angle. The sample rate is not recorded in the
/// files and must be supplied by the caller.
#[derive(Debug, Clone)]
pub struct TxtLoader {
    dir: PathBuf,
    sample_rate: u32,
}

impl TxtLoader {
    /// Create a loader for `dir` with the user-entered sample rate.
    pub fn new(dir: impl Into<PathBuf>, sample_rate: u32) -> Self {
        Self {
            dir: dir.into(),
            sample_rate,
        }
    }
}

impl FormatLoader for TxtLoader {
    fn load(&self) -> Result<LoadOutcome> {
        let sample_rate = self.sample_rate;
        load_directory(&self.dir, "txt", |path| {
            Ok((parse_float_lines(path)?, sample_rate))
        })
    }
}

/// Loads a directory of `.dbl` files, each a raw array of little-endian
/// f64 samples, one file per angle. The sample rate must be supplied by the
/// caller.
#[derive(Debug, Clone)]
pub struct DblLoader {
    dir: PathBuf,
    sample_rate: u32,
}

impl DblLoader {
    /// Create a loader for `dir` with the user-entered sample rate.
    pub fn new(dir: impl Into<PathBuf>, sample_rate: u32) -> Self {
        Self {
            dir: dir.into(),
            sample_rate,
        }
    }
}

impl FormatLoader for DblLoader {
    fn load(&self) -> Result<LoadOutcome> {
        let sample_rate = self.sample_rate;
        load_directory(&self.dir, "dbl", |path| {
            let bytes = fs::read(path).map_err(|e| Error::io(path, e))?;
            if bytes.len() % 8 != 0 {
                return Err(Error::malformed(
                    path,
                    format!("length {} is not a whole number of f64s", bytes.len()),
                ));
            }
            let samples = bytes
                .chunks_exact(8)
                .map(|c| {
                    let mut b = [0u8; 8];
                    b.copy_from_slice(c);
                    f64::from_le_bytes(b)
                })
                .collect();
            Ok((samples, sample_rate))
        })
    }
}
