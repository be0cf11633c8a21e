//! Parameters for the spatial modal fit.

use serde::{Deserialize, Serialize};

/// Configuration for the modal decomposition and polar reconstruction.
///
/// `box_radius_m` is not the cabinet dimension but the radius of a sphere
/// with the same volume as the enclosure. Changing any field marks the
/// modal stage stale; the orchestrator recomputes on the next explicit
/// analysis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModalParameters {
    /// Microphone distance from the source in metres.
    pub measurement_distance_m: f64,
    /// Radius of the driver in metres.
    pub driver_radius_m: f64,
    /// Number of modal coefficients to fit.
    pub coefficient_count: usize,
    /// Source resonance frequency in Hz.
    pub f0_hz: f64,
    /// Source resonance Q.
    pub q0: f64,
    /// Low-frequency blend transition frequency in Hz.
    pub transition_freq_hz: f64,
    /// Low-frequency blend gain adjustment in dB.
    pub lf_gain_db: f64,
    /// Radius of the volume-equivalent sphere in metres.
    pub box_radius_m: f64,
}

impl Default for ModalParameters {
    fn default() -> Self {
        Self {
            measurement_distance_m: 1.0,
            driver_radius_m: 0.06,
            coefficient_count: 14,
            f0_hz: 70.0,
            q0: 0.7,
            transition_freq_hz: 200.0,
            lf_gain_db: 0.0,
            box_radius_m: 0.25,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_a_valid_geometry() {
        let p = ModalParameters::default();
        assert!(p.driver_radius_m < p.box_radius_m);
        assert_eq!(p.coefficient_count, 14);
    }
}
