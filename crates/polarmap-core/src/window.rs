//! Gate window specs and the composite asymmetric gate builder.
//!
//! A gate is assembled from two independent halves, each described by a
//! [`WindowSpec`]: the sample position of the gate edge, the window family
//! used for the taper, and the percentage of the half that tapers (the rest
//! is a flat plateau of ones). The result is a Tukey-like window whose edge
//! steepness is tunable per side.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;

/// Window families available for the gate tapers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WindowType {
    /// Rectangular (no taper).
    Rectangle,
    /// Hann window (raised cosine).
    Hann,
    /// Hamming window.
    Hamming,
    /// Blackman-Harris window.
    BlackmanHarris,
    /// Nuttall window.
    Nuttall,
    /// Tukey (tapered cosine) window.
    Tukey,
}

impl WindowType {
    /// Resolve a window type from its display name, defaulting to Tukey for
    /// unrecognized names.
    pub fn from_name(name: &str) -> Self {
        match name {
            "Rectangle" => WindowType::Rectangle,
            "Hann" => WindowType::Hann,
            "Hamming" => WindowType::Hamming,
            "Blackman-Harris" => WindowType::BlackmanHarris,
            "Nuttall" => WindowType::Nuttall,
            _ => WindowType::Tukey,
        }
    }

    /// Generate the full symmetric window of length `n`.
    pub fn coefficients(self, n: usize) -> Vec<f64> {
        if n == 0 {
            return Vec::new();
        }
        if n == 1 {
            return vec![1.0];
        }
        let m = (n - 1) as f64;
        match self {
            WindowType::Rectangle => vec![1.0; n],
            WindowType::Hann => cosine_sum(n, &[0.5, 0.5]),
            WindowType::Hamming => cosine_sum(n, &[0.54, 0.46]),
            WindowType::BlackmanHarris => cosine_sum(n, &[0.35875, 0.48829, 0.14128, 0.01168]),
            WindowType::Nuttall => cosine_sum(n, &[0.3635819, 0.4891775, 0.1365995, 0.0106411]),
            WindowType::Tukey => {
                // alpha = 0.5: taper the outer quarter on each side
                let alpha = 0.5;
                let edge = alpha * m / 2.0;
                (0..n)
                    .map(|i| {
                        let i = i as f64;
                        if i < edge {
                            0.5 * (1.0 + (PI * (i / edge - 1.0)).cos())
                        } else if i > m - edge {
                            0.5 * (1.0 + (PI * ((i - m + edge) / edge)).cos())
                        } else {
                            1.0
                        }
                    })
                    .collect()
            }
        }
    }
}

impl fmt::Display for WindowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WindowType::Rectangle => "Rectangle",
            WindowType::Hann => "Hann",
            WindowType::Hamming => "Hamming",
            WindowType::BlackmanHarris => "Blackman-Harris",
            WindowType::Nuttall => "Nuttall",
            WindowType::Tukey => "Tukey",
        };
        f.write_str(name)
    }
}

/// Generalized cosine window, `w[i] = sum_k (-1)^k a_k cos(2 pi k i / (n-1))`.
fn cosine_sum(n: usize, coeffs: &[f64]) -> Vec<f64> {
    let m = (n - 1) as f64;
    (0..n)
        .map(|i| {
            let x = 2.0 * PI * i as f64 / m;
            coeffs
                .iter()
                .enumerate()
                .map(|(k, a)| if k % 2 == 0 { a * (x * k as f64).cos() } else { -a * (x * k as f64).cos() })
                .sum()
        })
        .collect()
}

/// One side of the gate: edge position, taper family, and how much of the
/// half tapers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowSpec {
    /// Sample index of the gate edge.
    pub position: usize,
    /// Window family used for the taper.
    pub window_type: WindowType,
    /// Percentage (0..=100) of the half that tapers; the rest is ones.
    pub taper_percent: u8,
}

impl WindowSpec {
    /// Create a spec with the given edge position.
    pub fn new(position: usize, window_type: WindowType, taper_percent: u8) -> Self {
        Self {
            position,
            window_type,
            taper_percent: taper_percent.min(100),
        }
    }
}

/// Which half of a symmetric window a taper takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

/// The taper and plateau for one side of the gate.
fn half_window(spec: &WindowSpec, peak: usize, side: Side) -> (Vec<f64>, Vec<f64>) {
    let length = peak.abs_diff(spec.position);
    let taper_len =
        ((length as f64 * f64::from(spec.taper_percent) / 100.0).round() as usize).min(length);
    let full = spec.window_type.coefficients(taper_len * 2);
    let taper = match side {
        Side::Left => full[..taper_len].to_vec(),
        Side::Right => full[taper_len..].to_vec(),
    };
    (taper, vec![1.0; length - taper_len])
}

/// Build the composite gate window for a `left`/`right` spec pair around the
/// shared `peak` index.
///
/// Layout is `left.taper ++ left.plateau ++ right.plateau ++ right.taper`;
/// with `left.position <= peak <= right.position` the total length is
/// `right.position - left.position`. Each taper ramps between 0 and 1 over
/// exactly `round(length * taper_percent / 100)` samples.
pub fn build_gate(left: &WindowSpec, right: &WindowSpec, peak: usize) -> Vec<f64> {
    let (left_taper, left_plateau) = half_window(left, peak, Side::Left);
    let (right_taper, right_plateau) = half_window(right, peak, Side::Right);
    let mut gate =
        Vec::with_capacity(left_taper.len() + left_plateau.len() + right_plateau.len() + right_taper.len());
    gate.extend(left_taper);
    gate.extend(left_plateau);
    gate.extend(right_plateau);
    gate.extend(right_taper);
    gate
}

/// The left/right spec pair with the `left.position < right.position`
/// invariant maintained across edits: moving one edge past the other pushes
/// the other edge out of the way by one sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatePair {
    /// Left gate edge.
    pub left: WindowSpec,
    /// Right gate edge.
    pub right: WindowSpec,
}

impl GatePair {
    /// Create a pair, nudging the right edge if the specs collide.
    pub fn new(left: WindowSpec, right: WindowSpec) -> Self {
        let mut pair = Self { left, right };
        if pair.left.position >= pair.right.position {
            pair.right.position = pair.left.position + 1;
        }
        pair
    }

    /// Move the left edge; the right edge yields if overtaken.
    pub fn set_left_position(&mut self, position: usize) {
        self.left.position = position;
        if position >= self.right.position {
            self.right.position = position + 1;
        }
    }

    /// Move the right edge; the left edge yields if overtaken.
    pub fn set_right_position(&mut self, position: usize) {
        let position = position.max(1);
        self.right.position = position;
        if position <= self.left.position {
            self.left.position = position - 1;
        }
    }

    /// Build the composite gate for this pair around `peak`.
    pub fn build(&self, peak: usize) -> Vec<f64> {
        build_gate(&self.left, &self.right, peak)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn spec(position: usize, taper_percent: u8) -> WindowSpec {
        WindowSpec::new(position, WindowType::Hann, taper_percent)
    }

    #[test]
    fn gate_length_matches_edge_span() {
        let gate = build_gate(&spec(100, 25), &spec(400, 50), 200);
        assert_eq!(gate.len(), 300);
    }

    #[test]
    fn zero_percent_taper_is_all_ones() {
        let gate = build_gate(&spec(10, 0), &spec(50, 0), 20);
        assert_eq!(gate.len(), 40);
        assert!(gate.iter().all(|&x| x == 1.0));
    }

    #[test]
    fn full_taper_starts_and_ends_near_zero() {
        let gate = build_gate(&spec(0, 100), &spec(256, 100), 128);
        assert!(gate[0] < 0.01);
        assert!(gate[gate.len() - 1] < 0.01);
        let mid = gate.len() / 2;
        assert!(gate[mid] > 0.99);
    }

    #[test]
    fn unknown_window_name_falls_back_to_tukey() {
        assert_eq!(WindowType::from_name("Kaiser"), WindowType::Tukey);
        assert_eq!(WindowType::from_name("Hann"), WindowType::Hann);
    }

    #[test]
    fn coefficients_are_symmetric() {
        for wt in [
            WindowType::Hann,
            WindowType::Hamming,
            WindowType::BlackmanHarris,
            WindowType::Nuttall,
            WindowType::Tukey,
        ] {
            let w = wt.coefficients(64);
            for i in 0..32 {
                assert!(
                    (w[i] - w[63 - i]).abs() < 1e-12,
                    "{wt} not symmetric at {i}"
                );
            }
        }
    }

    #[test]
    fn left_edit_pushes_right_out_of_the_way() {
        let mut pair = GatePair::new(spec(10, 25), spec(100, 25));
        pair.set_left_position(150);
        assert_eq!(pair.right.position, 151);
        assert!(pair.left.position < pair.right.position);
    }

    #[test]
    fn right_edit_pushes_left_out_of_the_way() {
        let mut pair = GatePair::new(spec(50, 25), spec(100, 25));
        pair.set_right_position(30);
        assert_eq!(pair.left.position, 29);
        assert!(pair.left.position < pair.right.position);
    }

    #[test]
    fn colliding_specs_are_nudged_at_construction() {
        let pair = GatePair::new(spec(100, 25), spec(100, 25));
        assert_eq!(pair.right.position, 101);
    }

    proptest! {
        #[test]
        fn gate_length_and_taper_monotonicity(
            left_pos in 0usize..500,
            span in 2usize..1000,
            peak_offset in 1usize..400,
            left_pct in 0u8..=100,
            right_pct in 0u8..=100,
        ) {
            let right_pos = left_pos + span;
            let peak = (left_pos + peak_offset).min(right_pos);
            let left = spec(left_pos, left_pct);
            let right = spec(right_pos, right_pct);
            let gate = build_gate(&left, &right, peak);
            prop_assert_eq!(gate.len(), right_pos - left_pos);

            // left taper is non-decreasing, right taper non-increasing
            let left_len = peak - left_pos;
            let left_taper =
                ((left_len as f64 * f64::from(left_pct) / 100.0).round() as usize).min(left_len);
            for i in 1..left_taper {
                prop_assert!(gate[i] >= gate[i - 1] - 1e-12);
            }
            let right_len = right_pos - peak;
            let right_taper =
                ((right_len as f64 * f64::from(right_pct) / 100.0).round() as usize).min(right_len);
            for i in (gate.len() - right_taper + 1)..gate.len() {
                prop_assert!(gate[i] <= gate[i - 1] + 1e-12);
            }
        }

        #[test]
        fn invariant_survives_arbitrary_edits(
            edits in prop::collection::vec((any::<bool>(), 0usize..2000), 1..50)
        ) {
            let mut pair = GatePair::new(spec(10, 25), spec(500, 25));
            for (is_left, pos) in edits {
                if is_left {
                    pair.set_left_position(pos);
                } else {
                    pair.set_right_position(pos);
                }
                prop_assert!(pair.left.position < pair.right.position);
            }
        }
    }
}
