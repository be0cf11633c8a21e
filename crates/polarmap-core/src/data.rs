//! Immutable value objects derived from measurements.
//!
//! A new instance replaces the old on every recompute; nothing here is
//! mutated in place, so consumers can hold copies across an analysis pass.

use num_complex::Complex64;

/// Complex frequency-domain data for one angle.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexFrequencyData {
    /// Name shown to consumers, e.g. `H10V0`.
    pub display_name: String,
    /// Horizontal angle in degrees.
    pub angle: f64,
    /// Log-spaced frequencies in Hz, ascending.
    pub frequencies: Vec<f64>,
    /// Complex pressure values, one per frequency.
    pub values: Vec<Complex64>,
    /// Scale applied when converting to magnitude (e.g. `2 / fft_points`).
    pub scale_factor: f64,
}

impl ComplexFrequencyData {
    /// Magnitude in dB relative to `reference`.
    pub fn magnitude(&self, reference: f64) -> XyData {
        let y = self
            .values
            .iter()
            .map(|v| to_db(v.norm() * self.scale_factor / reference))
            .collect();
        XyData {
            name: self.display_name.clone(),
            angle: self.angle,
            x: self.frequencies.clone(),
            y,
        }
    }

    /// Phase in radians.
    pub fn phase(&self) -> XyData {
        XyData {
            name: self.display_name.clone(),
            angle: self.angle,
            x: self.frequencies.clone(),
            y: self.values.iter().map(|v| v.arg()).collect(),
        }
    }
}

fn to_db(linear: f64) -> f64 {
    20.0 * linear.max(1e-12).log10()
}

/// A named xy series for one angle.
#[derive(Debug, Clone, PartialEq)]
pub struct XyData {
    /// Name shown to consumers.
    pub name: String,
    /// Horizontal angle in degrees.
    pub angle: f64,
    /// X values (frequencies in Hz).
    pub x: Vec<f64>,
    /// Y values (dB or radians).
    pub y: Vec<f64>,
}

impl XyData {
    /// Create a series.
    pub fn new(name: impl Into<String>, angle: f64, x: Vec<f64>, y: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            angle,
            x,
            y,
        }
    }

    /// Subtract the target's y values, yielding a series normalised against
    /// the target curve.
    pub fn normalise(&self, target: &XyData) -> XyData {
        XyData {
            name: self.name.clone(),
            angle: self.angle,
            x: self.x.clone(),
            y: self
                .y
                .iter()
                .zip(&target.y)
                .map(|(y, t)| y - t)
                .collect(),
        }
    }
}

/// Flattened grid for contour (sonogram) plots.
#[derive(Debug, Clone, PartialEq)]
pub struct ContourData {
    /// Frequency of each grid point in Hz.
    pub x: Vec<f64>,
    /// Angle of each grid point in degrees.
    pub y: Vec<f64>,
    /// Magnitude of each grid point in dB.
    pub z: Vec<f64>,
}

/// One polar slice: magnitude by angle at a single frequency.
#[derive(Debug, Clone, PartialEq)]
pub struct PolarSlice {
    /// The analysed frequency the slice was taken at.
    pub freq: f64,
    /// Angles in radians.
    pub theta: Vec<f64>,
    /// Magnitudes in dB.
    pub r: Vec<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfd(values: Vec<Complex64>) -> ComplexFrequencyData {
        ComplexFrequencyData {
            display_name: "H0V0".into(),
            angle: 0.0,
            frequencies: vec![100.0, 1000.0],
            values,
            scale_factor: 1.0,
        }
    }

    #[test]
    fn magnitude_is_20log10_of_norm() {
        let data = cfd(vec![Complex64::new(1.0, 0.0), Complex64::new(0.0, 10.0)]);
        let mag = data.magnitude(1.0);
        assert!((mag.y[0] - 0.0).abs() < 1e-9);
        assert!((mag.y[1] - 20.0).abs() < 1e-9);
    }

    #[test]
    fn magnitude_respects_scale_and_reference() {
        let mut data = cfd(vec![Complex64::new(4.0, 0.0), Complex64::new(4.0, 0.0)]);
        data.scale_factor = 0.5;
        let mag = data.magnitude(2.0);
        // 4 * 0.5 / 2 == 1 -> 0 dB
        assert!((mag.y[0]).abs() < 1e-9);
    }

    #[test]
    fn normalise_subtracts_target() {
        let a = XyData::new("a", 0.0, vec![1.0, 2.0], vec![10.0, 20.0]);
        let b = XyData::new("b", 15.0, vec![1.0, 2.0], vec![4.0, 25.0]);
        let n = b.normalise(&a);
        assert_eq!(n.y, vec![-6.0, 5.0]);
        assert_eq!(n.angle, 15.0);
    }
}
