//! ARTA `.pir` binary directory loader.

use crate::dir::load_directory;
use crate::{Error, FormatLoader, LoadOutcome, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Smallest byte count a `.pir` header can occupy.
const HEADER_FLOOR: usize = 68;

/// Offset of the little-endian `i32` sample rate.
const SAMPLE_RATE_OFFSET: usize = 24;

/// Offset of the first `f32` sample: 24 skipped bytes, two i32 fields, 44
/// more skipped bytes.
const DATA_OFFSET: usize = SAMPLE_RATE_OFFSET + 4 + 4 + 44;

/// Loads a directory of ARTA `.pir` files, one file per angle. The layout
/// is fixed: 24 bytes skipped, `i32` sample rate, `i32` sample count, 44
/// bytes skipped, then the float32 samples, all little-endian.
#[derive(Debug, Clone)]
pub struct ArtaLoader {
    dir: PathBuf,
}

impl ArtaLoader {
    /// Create a loader for `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl FormatLoader for ArtaLoader {
    fn load(&self) -> Result<LoadOutcome> {
        load_directory(&self.dir, "pir", parse_pir)
    }
}

fn read_i32(bytes: &[u8], offset: usize) -> i32 {
    let mut b = [0u8; 4];
    b.copy_from_slice(&bytes[offset..offset + 4]);
    i32::from_le_bytes(b)
}

fn parse_pir(path: &Path) -> Result<(Vec<f64>, u32)> {
    let bytes = fs::read(path).map_err(|e| Error::io(path, e))?;
    if bytes.len() < HEADER_FLOOR {
        return Err(Error::malformed(
            path,
            format!("{} bytes is below the {HEADER_FLOOR}-byte header floor", bytes.len()),
        ));
    }
    let sample_rate = read_i32(&bytes, SAMPLE_RATE_OFFSET);
    let count = read_i32(&bytes, SAMPLE_RATE_OFFSET + 4);
    if sample_rate <= 0 || count < 0 {
        return Err(Error::malformed(
            path,
            format!("implausible header (fs {sample_rate}, {count} samples)"),
        ));
    }
    let count = count as usize;
    let data = &bytes[DATA_OFFSET.min(bytes.len())..];
    if data.len() < count * 4 {
        return Err(Error::malformed(
            path,
            format!("truncated: {count} samples declared, {} bytes of data", data.len()),
        ));
    }
    let samples = data[..count * 4]
        .chunks_exact(4)
        .map(|c| {
            let mut b = [0u8; 4];
            b.copy_from_slice(c);
            f64::from(f32::from_le_bytes(b))
        })
        .collect();
    Ok((samples, sample_rate as u32))
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn synthetic_pir(sample_rate: i32, samples: &[f32]) -> Vec<u8> {
        let mut bytes = vec![0u8; SAMPLE_RATE_OFFSET];
        bytes.extend_from_slice(&sample_rate.to_le_bytes());
        bytes.extend_from_slice(&(samples.len() as i32).to_le_bytes());
        bytes.extend_from_slice(&[0u8; 44]);
        for s in samples {
            bytes.extend_from_slice(&s.to_le_bytes());
        }
        bytes
    }

    #[test]
    fn round_trips_a_synthetic_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ir_H0.pir");
        let samples: Vec<f32> = (0..100).map(|i| i as f32 / 100.0).collect();
        fs::write(&path, synthetic_pir(48000, &samples)).unwrap();

        let (loaded, fs) = parse_pir(&path).unwrap();
        assert_eq!(fs, 48000);
        assert_eq!(loaded.len(), 100);
        assert!((loaded[50] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn undersized_files_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ir_H0.pir");
        fs::write(&path, vec![0u8; HEADER_FLOOR - 1]).unwrap();
        assert!(matches!(
            parse_pir(&path).unwrap_err(),
            Error::Malformed { .. }
        ));
    }

    #[test]
    fn truncated_sample_data_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ir_H0.pir");
        let mut bytes = synthetic_pir(48000, &[1.0; 10]);
        bytes.truncate(bytes.len() - 8);
        fs::write(&path, bytes).unwrap();
        assert!(matches!(
            parse_pir(&path).unwrap_err(),
            Error::Malformed { .. }
        ));
    }
}
