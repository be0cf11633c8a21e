//! REW text export directory loader.

use crate::dir::load_directory;
use crate::{Error, FormatLoader, LoadOutcome, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Loads a directory of REW impulse-response text exports, one file per
/// angle. The header block ends at the first blank line; the sample rate is
/// derived from the `// Sample interval (seconds)` comment as
/// `round(1 / interval)`.
#[derive(Debug, Clone)]
pub struct RewLoader {
    dir: PathBuf,
}

impl RewLoader {
    /// Create a loader for `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl FormatLoader for RewLoader {
    fn load(&self) -> Result<LoadOutcome> {
        load_directory(&self.dir, "txt", parse_rew)
    }
}

fn parse_rew(path: &Path) -> Result<(Vec<f64>, u32)> {
    let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let mut lines = text.lines();

    let mut interval: Option<f64> = None;
    for line in lines.by_ref() {
        if line.trim().is_empty() {
            break;
        }
        if let Some(rest) = line.split("Sample interval (seconds)").nth(1) {
            interval = rest
                .trim_start_matches([':', '=', ' '])
                .split_whitespace()
                .next()
                .and_then(|v| v.parse().ok());
        }
    }
    let interval = interval.ok_or(Error::MissingHeader {
        path: path.into(),
        what: "a '// Sample interval (seconds)' comment",
    })?;
    let sample_rate = (1.0 / interval).round() as u32;

    let samples = lines
        .filter(|l| !l.trim().is_empty())
        .map(|l| {
            // value is the last column; some exports prefix a time column
            l.split_whitespace()
                .last()
                .and_then(|v| v.parse::<f64>().ok())
                .ok_or_else(|| Error::malformed(path, format!("bad sample line '{l}'")))
        })
        .collect::<Result<Vec<f64>>>()?;
    Ok((samples, sample_rate))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPORT: &str = "\
* Impulse Response data
// Peak value before normalisation: 0.5
// Sample interval (seconds): 0.000020833333333

0.0
0.25
1.0
-0.5
";

    #[test]
    fn sample_rate_is_inverse_of_interval() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sweep_H0.txt");
        fs::write(&path, EXPORT).unwrap();
        let (samples, fs) = parse_rew(&path).unwrap();
        assert_eq!(fs, 48000);
        assert_eq!(samples, vec![0.0, 0.25, 1.0, -0.5]);
    }

    #[test]
    fn missing_interval_is_a_header_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sweep_H0.txt");
        fs::write(&path, "* no header here\n\n1.0\n").unwrap();
        assert!(matches!(
            parse_rew(&path).unwrap_err(),
            Error::MissingHeader { .. }
        ));
    }

    #[test]
    fn header_only_files_load_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sweep_H0.txt");
        fs::write(&path, "// Sample interval (seconds): 0.001\n\n").unwrap();
        let (samples, fs) = parse_rew(&path).unwrap();
        assert_eq!(fs, 1000);
        assert!(samples.is_empty());
    }
}
