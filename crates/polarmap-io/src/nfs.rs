//! Near-field-scanner directivity export loader.
//!
//! A single tab-delimited file carries every angle as a pre-paired
//! frequency/SPL column pair; the data is already frequency domain. Half
//! sweeps (minimum angle 0) are mirrored to reconstruct the negative
//! angles.

use crate::{Error, FormatLoader, LoadOutcome, Result};
use polarmap_core::{FrequencyResponse, Measurement};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

/// Number of header rows preceding the data block.
const HEADER_ROWS: usize = 3;

/// Loads a single NFS directivity export.
#[derive(Debug, Clone)]
pub struct NfsLoader {
    file: PathBuf,
}

impl NfsLoader {
    /// Create a loader for `file`.
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self { file: file.into() }
    }
}

/// Parse an angle column label: `On-Axis` is 0, anything else keeps its
/// digits and sign.
fn parse_angle(token: &str) -> Option<f64> {
    if token.contains("On-Axis") {
        return Some(0.0);
    }
    let digits: String = token
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '-')
        .collect();
    if digits.is_empty() {
        None
    } else {
        digits.parse().ok()
    }
}

/// Prepend the reversed mirrors of every non-zero angle, reconstructing a
/// full sweep from a half sweep.
fn mirrored(measurements: Vec<Measurement>) -> Vec<Measurement> {
    let mut full: Vec<Measurement> = measurements
        .iter()
        .filter(|m| m.h() != 0.0)
        .map(Measurement::mirror)
        .collect();
    full.reverse();
    full.extend(measurements);
    full
}

impl FormatLoader for NfsLoader {
    fn load(&self) -> Result<LoadOutcome> {
        let text = fs::read_to_string(&self.file).map_err(|e| Error::io(&self.file, e))?;

        let angles: Vec<f64> = text
            .lines()
            .find(|l| l.contains("On-Axis"))
            .map(|l| l.trim().split('\t').filter_map(parse_angle).collect())
            .unwrap_or_default();
        if angles.is_empty() {
            return Err(Error::UnrecognizedFormat {
                path: self.file.clone(),
                expected: "NFS directivity export",
            });
        }

        // columns come pre-paired: freq then SPL per angle
        let mut columns: Vec<Vec<f64>> = vec![Vec::new(); angles.len() * 2];
        for line in text.lines().skip(HEADER_ROWS).filter(|l| !l.trim().is_empty()) {
            for (slot, field) in columns.iter_mut().zip(line.split('\t')) {
                let cleaned: String = field.chars().filter(|c| *c != ',' && *c != '"').collect();
                let value = cleaned.trim().parse::<f64>().map_err(|_| {
                    Error::malformed(&self.file, format!("bad data value '{}'", field.trim()))
                })?;
                slot.push(value);
            }
        }

        let measurements: Vec<Measurement> = angles
            .iter()
            .enumerate()
            .map(|(idx, &angle)| {
                Measurement::from_response(
                    "NFS",
                    angle,
                    0.0,
                    FrequencyResponse {
                        freqs: columns[idx * 2].clone(),
                        spl: columns[idx * 2 + 1].clone(),
                    },
                )
            })
            .collect();

        let min_angle = angles.iter().copied().fold(f64::INFINITY, f64::min);
        let measurements = if min_angle == 0.0 {
            debug!(target: "polarmap::io", "half sweep detected, mirroring {} angles", angles.len() - 1);
            mirrored(measurements)
        } else {
            measurements
        };

        let mut outcome = LoadOutcome {
            measurements,
            loaded: vec![self.file.clone()],
            ignored: Vec::new(),
        };
        outcome.sort_by_angle();
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // the label row carries one token per angle; data columns come in
    // freq/SPL pairs
    const EXPORT: &str = "\
\"On-Axis\"\t\"15 deg\"\t\"30 deg\"
Freq\tSPL\tFreq\tSPL\tFreq\tSPL
[Hz]\t[dB]\t[Hz]\t[dB]\t[Hz]\t[dB]
100.0\t90.0\t100.0\t88.0\t100.0\t85.0
\"1,000.0\"\t91.0\t\"1,000.0\"\t87.5\t\"1,000.0\"\t83.0
";

    #[test]
    fn half_sweep_is_mirrored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nfs.txt");
        fs::write(&path, EXPORT).unwrap();

        let outcome = NfsLoader::new(&path).load().unwrap();
        let angles: Vec<f64> = outcome.measurements.iter().map(|m| m.h()).collect();
        assert_eq!(angles, vec![-30.0, -15.0, 0.0, 15.0, 30.0]);

        let at = |a: f64| {
            outcome
                .measurements
                .iter()
                .find(|m| m.h() == a)
                .unwrap()
                .response()
                .unwrap()
                .clone()
        };
        assert_eq!(at(-15.0).spl, at(15.0).spl);
        assert_eq!(at(0.0).freqs, vec![100.0, 1000.0]);
        assert_eq!(at(30.0).spl, vec![85.0, 83.0]);
    }

    #[test]
    fn thousands_separators_are_stripped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nfs.txt");
        fs::write(&path, EXPORT).unwrap();
        let outcome = NfsLoader::new(&path).load().unwrap();
        let on_axis = outcome.measurements.iter().find(|m| m.h() == 0.0).unwrap();
        assert_eq!(on_axis.response().unwrap().freqs[1], 1000.0);
    }

    #[test]
    fn files_without_angles_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nfs.txt");
        fs::write(&path, "Freq\tSPL\n100\t90\n").unwrap();
        assert!(matches!(
            NfsLoader::new(&path).load().unwrap_err(),
            Error::UnrecognizedFormat { .. }
        ));
    }
}
