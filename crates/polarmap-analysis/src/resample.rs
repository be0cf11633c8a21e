//! Linear-to-log frequency resampling.
//!
//! Display and the modal fit both want perceptually even (log-spaced)
//! frequencies; the FFT delivers linear spacing. The resampler
//! interpolates the complex spectrum onto a fixed 20 Hz - 20 kHz log axis
//! whose density follows the number of linear bins available.

use num_complex::Complex64;

/// Log-axis bounds in Hz.
const F_MIN: f64 = 20.0;
const F_MAX: f64 = 20_000.0;

/// Output point count for a given number of linear input points; inputs not
/// in the table fall back to `min(128, n / 4)`.
const LOG_POINTS: [(usize, usize); 7] = [
    (64, 15),
    (128, 30),
    (256, 50),
    (512, 100),
    (1024, 200),
    (2048, 300),
    (4096, 300),
];

fn output_points(input_points: usize) -> usize {
    LOG_POINTS
        .iter()
        .find(|(n, _)| *n == input_points)
        .map(|(_, pts)| *pts)
        .unwrap_or_else(|| 128.min(((input_points + 1) as f64 / 4.0).round() as usize))
}

/// The log-spaced frequency axis for `points` output bins.
fn log_axis(points: usize) -> Vec<f64> {
    let lo = F_MIN.log10();
    let hi = F_MAX.log10();
    (0..points)
        .map(|i| 10f64.powf(lo + (hi - lo) * i as f64 / (points - 1) as f64))
        .collect()
}

/// Resample a linearly spaced half spectrum onto the log axis.
///
/// `freq_step` is the bin spacing of the input in Hz (`fs / fft_points`).
/// Values are linearly interpolated between the two neighbouring linear
/// bins; frequencies beyond the last bin clamp to it. Returns the
/// log-spaced values and their frequencies, ascending.
pub fn log_resample(spectrum: &[Complex64], freq_step: f64) -> (Vec<Complex64>, Vec<f64>) {
    let points = output_points(spectrum.len().saturating_sub(1));
    let freqs = log_axis(points.max(2));
    let values = freqs
        .iter()
        .map(|&f| {
            let idx = f / freq_step;
            let i0 = (idx.floor() as usize).min(spectrum.len() - 1);
            let i1 = (i0 + 1).min(spectrum.len() - 1);
            let frac = idx - idx.floor();
            spectrum[i0] * (1.0 - frac) + spectrum[i1] * frac
        })
        .collect();
    (values, freqs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_sizes_are_honoured() {
        assert_eq!(output_points(1024), 200);
        assert_eq!(output_points(2048), 300);
        assert_eq!(output_points(64), 15);
    }

    #[test]
    fn off_table_sizes_fall_back() {
        assert_eq!(output_points(100), 25);
        assert_eq!(output_points(8192), 128);
    }

    #[test]
    fn axis_is_strictly_increasing_and_bounded() {
        let spectrum = vec![Complex64::new(1.0, 0.0); 1025];
        let (_, freqs) = log_resample(&spectrum, 48000.0 / 2048.0);
        assert_eq!(freqs.len(), 200);
        assert!((freqs[0] - 20.0).abs() < 1e-9);
        assert!((freqs[freqs.len() - 1] - 20_000.0).abs() < 1e-6);
        for pair in freqs.windows(2) {
            assert!(pair[1] > pair[0]);
        }
    }

    #[test]
    fn flat_spectrum_stays_flat() {
        let spectrum = vec![Complex64::new(2.0, 0.0); 257];
        let (values, _) = log_resample(&spectrum, 48000.0 / 512.0);
        for v in values {
            assert!((v.re - 2.0).abs() < 1e-9);
            assert!(v.im.abs() < 1e-9);
        }
    }
}
