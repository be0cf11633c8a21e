//! Smoothing selector for log-spaced magnitude data.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Smoothing algorithms applied to log-spaced magnitude data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SmoothingType {
    /// 1/3 octave boxcar.
    OneThirdOctave,
    /// 1/6 octave boxcar.
    OneSixthOctave,
    /// 1/12 octave boxcar.
    OneTwelfthOctave,
    /// Critical bands after Zwicker (Bark scale widths).
    CriticalBandZwicker,
    /// Critical bands after Moore (ERB widths).
    CriticalBandMoore,
    /// Narrow fixed-width smoothing.
    Narrow,
}

impl SmoothingType {
    /// All supported types, in display order.
    pub const ALL: [SmoothingType; 6] = [
        SmoothingType::OneThirdOctave,
        SmoothingType::OneSixthOctave,
        SmoothingType::OneTwelfthOctave,
        SmoothingType::CriticalBandZwicker,
        SmoothingType::CriticalBandMoore,
        SmoothingType::Narrow,
    ];
}

impl fmt::Display for SmoothingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SmoothingType::OneThirdOctave => "1/3 Octave",
            SmoothingType::OneSixthOctave => "1/6 Octave",
            SmoothingType::OneTwelfthOctave => "1/12 Octave",
            SmoothingType::CriticalBandZwicker => "CB Zwicker",
            SmoothingType::CriticalBandMoore => "CB Moore",
            SmoothingType::Narrow => "Narrow",
        };
        f.write_str(name)
    }
}

/// Rejection of a smoothing name that does not match any supported type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown smoothing type: {0}")]
pub struct UnknownSmoothingType(pub String);

impl FromStr for SmoothingType {
    type Err = UnknownSmoothingType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SmoothingType::ALL
            .iter()
            .find(|t| t.to_string() == s)
            .copied()
            .ok_or_else(|| UnknownSmoothingType(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_round_trip() {
        for t in SmoothingType::ALL {
            assert_eq!(t.to_string().parse::<SmoothingType>(), Ok(t));
        }
    }

    #[test]
    fn unknown_name_is_rejected() {
        let err = "1/24 Octave".parse::<SmoothingType>().unwrap_err();
        assert_eq!(err.to_string(), "unknown smoothing type: 1/24 Octave");
    }
}
