//! Session file format and operations.

use crate::error::ConfigError;
use polarmap_core::{GatePair, ModalParameters, SmoothingType, WindowSpec, WindowType};
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_sample_rate() -> u32 {
    48000
}

fn default_db_range() -> f64 {
    60.0
}

/// How charts should present the derived data.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DisplayPrefs {
    /// Visible dB range of magnitude axes.
    pub db_range: f64,
    /// Whether magnitude reads are normalised against a reference angle.
    pub normalised: bool,
    /// The reference angle for normalisation, degrees.
    pub normalisation_angle: f64,
}

impl Default for DisplayPrefs {
    fn default() -> Self {
        Self {
            db_range: default_db_range(),
            normalised: false,
            normalisation_angle: 0.0,
        }
    }
}

/// A saved analysis session: gate, modal parameters, display preferences
/// and smoothing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    /// Name of the session.
    pub name: String,

    /// Sample rate for formats that do not record one, in Hz.
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// The gate spec pair.
    #[serde(default = "Session::default_gate")]
    pub gate: GatePair,

    /// Parameters for the modal fit.
    #[serde(default)]
    pub modal: ModalParameters,

    /// Chart presentation preferences.
    #[serde(default)]
    pub display: DisplayPrefs,

    /// Smoothing applied to magnitude reads, absent for none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smoothing: Option<SmoothingType>,
}

impl Session {
    /// A session with the given name and defaults for everything else.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sample_rate: default_sample_rate(),
            gate: Self::default_gate(),
            modal: ModalParameters::default(),
            display: DisplayPrefs::default(),
            smoothing: None,
        }
    }

    fn default_gate() -> GatePair {
        GatePair::new(
            WindowSpec::new(0, WindowType::Tukey, 25),
            WindowSpec::new(1024, WindowType::Tukey, 25),
        )
    }

    /// Load a session from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let session: Session = toml::from_str(&text)?;
        session.validate()?;
        Ok(session)
    }

    /// Save the session to a TOML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        self.validate()?;
        let text = toml::to_string_pretty(self)?;
        std::fs::write(path, text).map_err(|e| ConfigError::write_file(path, e))
    }

    /// Reject values the pipeline would refuse later: degenerate gates,
    /// out-of-range tapers, and geometry the modal stage cannot fit.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.gate.left.position >= self.gate.right.position {
            return Err(ConfigError::Invalid(format!(
                "gate left position {} must be below right position {}",
                self.gate.left.position, self.gate.right.position
            )));
        }
        for (side, spec) in [("left", &self.gate.left), ("right", &self.gate.right)] {
            if spec.taper_percent > 100 {
                return Err(ConfigError::Invalid(format!(
                    "{side} taper percent {} exceeds 100",
                    spec.taper_percent
                )));
            }
        }
        if self.modal.driver_radius_m >= self.modal.box_radius_m {
            return Err(ConfigError::Invalid(format!(
                "driver radius {} m must be less than box radius {} m",
                self.modal.driver_radius_m, self.modal.box_radius_m
            )));
        }
        if self.sample_rate == 0 {
            return Err(ConfigError::Invalid("sample rate must be non-zero".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.toml");

        let mut session = Session::new("tower-prototype");
        session.smoothing = Some(SmoothingType::OneSixthOctave);
        session.gate.set_left_position(150);
        session.save(&path).unwrap();

        let loaded = Session::load(&path).unwrap();
        assert_eq!(loaded, session);
    }

    #[test]
    fn degenerate_gate_is_rejected() {
        let mut session = Session::new("bad");
        session.gate.left.position = 500;
        session.gate.right.position = 100;
        assert!(matches!(
            session.validate().unwrap_err(),
            ConfigError::Invalid(_)
        ));
    }

    #[test]
    fn bad_geometry_is_rejected_at_load_time() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.toml");
        std::fs::write(
            &path,
            "name = \"bad\"\n[modal]\ndriver_radius_m = 0.5\nbox_radius_m = 0.3\n",
        )
        .unwrap();
        assert!(matches!(
            Session::load(&path).unwrap_err(),
            ConfigError::Invalid(_)
        ));
    }

    #[test]
    fn missing_fields_take_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.toml");
        std::fs::write(&path, "name = \"minimal\"\n").unwrap();
        let session = Session::load(&path).unwrap();
        assert_eq!(session.sample_rate, 48000);
        assert_eq!(session.modal, ModalParameters::default());
        assert!(session.smoothing.is_none());
    }
}
