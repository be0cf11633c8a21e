//! Real FFT with pow2 padding for the analysis pipeline.

use num_complex::Complex64;
use rustfft::FftPlanner;

/// Smallest FFT size used; gives the log resampler enough linear bins to
/// work with for short gates.
pub const MIN_FFT_POINTS: usize = 512;

/// Forward FFT of a real signal, zero-padded to the next power of two of
/// at least [`MIN_FFT_POINTS`].
///
/// Returns the positive-frequency half spectrum (DC through Nyquist,
/// `n / 2 + 1` bins) and the padded point count `n`.
pub fn fft(samples: &[f64]) -> (Vec<Complex64>, usize) {
    let n = samples.len().max(MIN_FFT_POINTS).next_power_of_two();
    let mut buffer: Vec<Complex64> = samples
        .iter()
        .map(|&x| Complex64::new(x, 0.0))
        .collect();
    buffer.resize(n, Complex64::new(0.0, 0.0));

    let mut planner = FftPlanner::new();
    planner.plan_fft_forward(n).process(&mut buffer);

    buffer.truncate(n / 2 + 1);
    (buffer, n)
}
