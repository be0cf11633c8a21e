//! Fractional-octave and critical-band smoothing over a log axis.

use polarmap_core::SmoothingType;

/// Bandwidth in Hz of the smoothing window centred at `f`.
fn bandwidth(smoothing: SmoothingType, f: f64) -> f64 {
    let octave = |n: f64| f * (2f64.powf(0.5 / n) - 2f64.powf(-0.5 / n));
    match smoothing {
        SmoothingType::OneThirdOctave => octave(3.0),
        SmoothingType::OneSixthOctave => octave(6.0),
        SmoothingType::OneTwelfthOctave => octave(12.0),
        // Bark critical bandwidth after Zwicker
        SmoothingType::CriticalBandZwicker => {
            25.0 + 75.0 * (1.0 + 1.4 * (f / 1000.0).powi(2)).powf(0.69)
        }
        // equivalent rectangular bandwidth after Moore
        SmoothingType::CriticalBandMoore => 24.7 * (4.37 * f / 1000.0 + 1.0),
        SmoothingType::Narrow => octave(48.0),
    }
}

/// Smooth `data` (linear magnitudes) over `freqs` with a boxcar whose width
/// follows the selected smoothing type. Output length matches the input.
pub fn smooth(data: &[f64], freqs: &[f64], smoothing: SmoothingType) -> Vec<f64> {
    data.iter()
        .zip(freqs)
        .map(|(_, &f)| {
            let half = bandwidth(smoothing, f) / 2.0;
            let (lo, hi) = (f - half, f + half);
            let mut sum = 0.0;
            let mut count = 0usize;
            for (y, &fj) in data.iter().zip(freqs) {
                if fj >= lo && fj <= hi {
                    sum += y;
                    count += 1;
                }
            }
            if count == 0 { 0.0 } else { sum / count as f64 }
        })
        .collect()
}
