//! Angle extraction from measurement file names.

use regex::Regex;
use std::sync::OnceLock;

/// The angle parsed from a file name.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FileAngle {
    /// Horizontal angle in degrees.
    Horizontal(f64),
    /// Vertical angle in degrees.
    Vertical(f64),
}

impl FileAngle {
    /// The `(h, v)` pair this angle describes.
    pub fn hv(self) -> (f64, f64) {
        match self {
            FileAngle::Horizontal(h) => (h, 0.0),
            FileAngle::Vertical(v) => (0.0, v),
        }
    }
}

fn pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"_([HV])(-?[0-9]+)").unwrap())
}

/// Extract the angle embedded in a file name of the form `…_H<degrees>…` or
/// `…_V<degrees>…`. Returns `None` when the name carries no angle.
pub fn from_file_name(stem: &str) -> Option<FileAngle> {
    let captures = pattern().captures(stem)?;
    let degrees: f64 = captures[2].parse().ok()?;
    match &captures[1] {
        "H" => Some(FileAngle::Horizontal(degrees)),
        _ => Some(FileAngle::Vertical(degrees)),
    }
}
