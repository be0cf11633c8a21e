//! WAV directory loader.

use crate::dir::load_directory;
use crate::{Error, FormatLoader, LoadOutcome, Result};
use hound::{SampleFormat, WavReader};
use std::path::{Path, PathBuf};

/// Loads a directory of RIFF/WAVE files, one file per angle. The sample
/// rate comes from each file's header; multi-channel files are mixed down
/// to mono and all sample formats are coerced to f64.
#[derive(Debug, Clone)]
pub struct WavLoader {
    dir: PathBuf,
}

impl WavLoader {
    /// Create a loader for `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl FormatLoader for WavLoader {
    fn load(&self) -> Result<LoadOutcome> {
        load_directory(&self.dir, "wav", read_wav_mono)
    }
}

fn read_wav_mono(path: &Path) -> Result<(Vec<f64>, u32)> {
    let reader = WavReader::open(path)?;
    let spec = reader.spec();
    let channels = spec.channels as usize;

    let interleaved: Vec<f64> = match spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .map(|s| s.map(f64::from).map_err(Error::from))
            .collect::<Result<_>>()?,
        SampleFormat::Int => {
            let scale = f64::from(1u32 << (spec.bits_per_sample - 1));
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| f64::from(v) / scale).map_err(Error::from))
                .collect::<Result<_>>()?
        }
    };

    let samples = if channels == 1 {
        interleaved
    } else {
        interleaved
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f64>() / channels as f64)
            .collect()
    };
    Ok((samples, spec.sample_rate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hound::WavSpec;

    fn write_wav(path: &Path, sample_rate: u32, samples: &[f32]) {
        let spec = WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for &s in samples {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn sample_rate_comes_from_the_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ir_H10.wav");
        write_wav(&path, 44100, &[0.0, 1.0, 0.5]);
        let (samples, fs) = read_wav_mono(&path).unwrap();
        assert_eq!(fs, 44100);
        assert_eq!(samples.len(), 3);
        assert!((samples[1] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn directory_load_sorts_by_angle() {
        let dir = tempfile::tempdir().unwrap();
        for angle in ["H30", "H-30", "H0"] {
            write_wav(&dir.path().join(format!("ir_{angle}.wav")), 48000, &[1.0]);
        }
        let outcome = WavLoader::new(dir.path()).load().unwrap();
        let angles: Vec<f64> = outcome.measurements.iter().map(|m| m.h()).collect();
        assert_eq!(angles, vec![-30.0, 0.0, 30.0]);
        assert_eq!(outcome.ignored.len(), 0);
    }
}
