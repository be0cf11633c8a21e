//! Measurement ingestion for the polarmap workspace.
//!
//! Every supported on-disk encoding sits behind the [`FormatLoader`]
//! capability:
//!
//! - [`TxtLoader`] - directory of newline-delimited float text files
//! - [`DblLoader`] - directory of raw little-endian f64 binary files
//! - [`WavLoader`] - directory of RIFF/WAVE files
//! - [`HolmLoader`] - one HolmImpulse export holding many angle columns
//! - [`RewLoader`] - directory of REW text exports
//! - [`ArtaLoader`] - directory of ARTA `.pir` binary files
//! - [`NfsLoader`] - one near-field-scanner tab-delimited export
//!
//! Loading is per-file fault tolerant: a malformed file is skipped and
//! recorded in [`LoadOutcome::ignored`], never fatal for the rest of the
//! directory. Single-file formats fail wholesale only when a required
//! header is absent.

use polarmap_core::Measurement;
use std::path::PathBuf;
use thiserror::Error;

mod angle;
mod arta;
mod dir;
mod holm;
mod nfs;
mod rew;
mod wav;

pub use arta::ArtaLoader;
pub use dir::{DblLoader, TxtLoader};
pub use holm::HolmLoader;
pub use nfs::NfsLoader;
pub use rew::RewLoader;
pub use wav::WavLoader;

/// Errors raised while loading measurement files.
#[derive(Debug, Error)]
pub enum Error {
    /// Underlying I/O failure.
    #[error("failed to read '{path}': {source}")]
    Io {
        /// Path of the file or directory that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// WAV decode failure.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// A header the format requires was absent.
    #[error("'{path}' is missing {what}")]
    MissingHeader {
        /// Path of the offending file.
        path: PathBuf,
        /// Description of the absent header element.
        what: &'static str,
    },

    /// The file's contents do not match the format.
    #[error("'{path}' is malformed: {reason}")]
    Malformed {
        /// Path of the offending file.
        path: PathBuf,
        /// Why the file was rejected.
        reason: String,
    },

    /// No angle could be extracted from the file name.
    #[error("no angle in file name '{path}'")]
    NoAngle {
        /// Path of the offending file.
        path: PathBuf,
    },

    /// The file is not an instance of the requested format at all.
    #[error("'{path}' is not a {expected} file")]
    UnrecognizedFormat {
        /// Path of the offending file.
        path: PathBuf,
        /// The format that was requested.
        expected: &'static str,
    },
}

impl Error {
    /// Wrap an I/O error with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    /// A malformed-file rejection.
    pub fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Error::Malformed {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Result alias for loader operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The result of a load: the measurements plus a per-file tally.
///
/// Directory loaders accumulate per-file failures in `ignored` rather than
/// aborting; callers surface the tally to the user.
#[derive(Debug, Default)]
pub struct LoadOutcome {
    /// Successfully loaded measurements, sorted by `(h, v)` ascending.
    pub measurements: Vec<Measurement>,
    /// Files that produced a measurement.
    pub loaded: Vec<PathBuf>,
    /// Files that were skipped, with the reason.
    pub ignored: Vec<(PathBuf, Error)>,
}

impl LoadOutcome {
    /// Sort measurements by `(h, v)` ascending; all directory loaders call
    /// this before returning.
    pub fn sort_by_angle(&mut self) {
        self.measurements
            .sort_by(|a, b| a.h().total_cmp(&b.h()).then(a.v().total_cmp(&b.v())));
    }
}

/// The capability every concrete loader provides.
pub trait FormatLoader {
    /// Load measurements from this loader's source.
    fn load(&self) -> Result<LoadOutcome>;
}
