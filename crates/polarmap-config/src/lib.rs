//! Session file management for the polarmap workspace.
//!
//! A session captures everything a user tunes between runs: the gate
//! specs, the modal parameters, display preferences, and the smoothing
//! selection. Sessions are TOML files that can be loaded, edited, and
//! saved; [`Session::validate`] rejects combinations the pipeline would
//! refuse later.
//!
//! # TOML Format
//!
//! ```toml
//! name = "tower-prototype"
//! sample_rate = 48000
//!
//! [gate.left]
//! position = 150
//! window_type = "Tukey"
//! taper_percent = 25
//!
//! [gate.right]
//! position = 1200
//! window_type = "Tukey"
//! taper_percent = 25
//!
//! [modal]
//! driver_radius_m = 0.06
//! box_radius_m = 0.25
//!
//! [display]
//! db_range = 60.0
//! normalised = false
//! ```

mod error;
mod session;

/// Platform-specific session and config directories.
pub mod paths;

pub use error::ConfigError;
pub use session::{DisplayPrefs, Session};
