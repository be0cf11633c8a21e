//! A single measurement taken in the real world.

use num_complex::Complex64;

/// Samples below this magnitude count as reflection-free when guessing the
/// left gate position.
const REFLECTION_FREE_ZONE_LIMIT: f64 = 1e-4;

/// Minimum distance (in samples) between the impulse peak and anything that
/// can count as the first reflection.
const REFLECTION_GUARD: usize = 40;

/// Frequency-domain data attached to measurements whose source format
/// delivers an already-analysed response (e.g. near field scanner exports)
/// rather than time-domain samples.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyResponse {
    /// Frequencies in Hz, ascending.
    pub freqs: Vec<f64>,
    /// SPL in dB at each frequency.
    pub spl: Vec<f64>,
}

/// One impulse response recorded at a horizontal/vertical angle pair.
///
/// Raw `samples` are owned exclusively by the measurement; `gated_samples`
/// and the FFT cache are derived state managed by the analysis orchestrator.
/// The FFT cache is only ever valid for the current `gated_samples` - any
/// re-gate clears it.
#[derive(Debug, Clone)]
pub struct Measurement {
    name: String,
    h: f64,
    v: f64,
    sample_rate: u32,
    samples: Vec<f64>,
    gated_samples: Vec<f64>,
    fft_cache: Option<(Vec<Complex64>, usize)>,
    response: Option<FrequencyResponse>,
}

impl Measurement {
    /// Create a measurement from time-domain samples.
    pub fn new(name: impl Into<String>, h: f64, v: f64, sample_rate: u32, samples: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            h,
            v,
            sample_rate,
            samples,
            gated_samples: Vec::new(),
            fft_cache: None,
            response: None,
        }
    }

    /// Create a measurement from an already-analysed frequency response.
    pub fn from_response(
        name: impl Into<String>,
        h: f64,
        v: f64,
        response: FrequencyResponse,
    ) -> Self {
        Self {
            name: name.into(),
            h,
            v,
            sample_rate: 0,
            samples: Vec::new(),
            gated_samples: Vec::new(),
            fft_cache: None,
            response: Some(response),
        }
    }

    /// The source file name (without extension).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Horizontal angle in degrees.
    pub fn h(&self) -> f64 {
        self.h
    }

    /// Vertical angle in degrees.
    pub fn v(&self) -> f64 {
        self.v
    }

    /// Sample rate in Hz (0 for frequency-domain measurements).
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Raw time-domain samples.
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Gated samples, zero-padded back to the full sample length. Empty
    /// until a window has been applied.
    pub fn gated_samples(&self) -> &[f64] {
        &self.gated_samples
    }

    /// Frequency-domain payload for pre-analysed formats.
    pub fn response(&self) -> Option<&FrequencyResponse> {
        self.response.as_ref()
    }

    /// Number of raw samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True when the measurement carries no time-domain samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// The smallest sample value.
    pub fn min(&self) -> f64 {
        self.samples.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// The largest sample value.
    pub fn max(&self) -> f64 {
        self.samples
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Index of the peak sample value.
    pub fn peak_index(&self) -> usize {
        self.samples
            .iter()
            .enumerate()
            .filter(|(_, x)| !x.is_nan())
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .map_or(0, |(i, _)| i)
    }

    /// A guess at where to put the left gate: walk back from the peak until
    /// the signal drops into the reflection-free zone.
    pub fn start_index(&self) -> usize {
        if self.samples.is_empty() {
            return 0;
        }
        let peak = self.peak_index();
        for (offset, x) in self.samples[..=peak].iter().rev().enumerate() {
            if x.abs() < REFLECTION_FREE_ZONE_LIMIT {
                return peak - offset;
            }
        }
        0
    }

    /// A guess at the location of the first reflection: the first prominent
    /// local maximum past the guard zone after the peak, else the last
    /// sample.
    pub fn first_reflection_index(&self) -> usize {
        if self.samples.is_empty() {
            return 0;
        }
        let peak = self.peak_index();
        let threshold = self.samples[peak].abs() * 0.05;
        let tail = &self.samples[peak..];
        for i in 1..tail.len().saturating_sub(1) {
            if i > REFLECTION_GUARD
                && tail[i].abs() > threshold
                && tail[i].abs() > tail[i - 1].abs()
                && tail[i].abs() >= tail[i + 1].abs()
            {
                return peak + i;
            }
        }
        self.len().saturating_sub(1)
    }

    /// The display name, e.g. `H10V0`.
    pub fn display_name(&self) -> String {
        format!("H{}V{}", self.h, self.v)
    }

    /// Apply a gate to the measurement: multiply `samples[left..right]` by
    /// the window and zero-pad the result back to the full sample length so
    /// all measurements share one x-axis. Invalidates the FFT cache.
    pub fn gate(&mut self, left: usize, right: usize, window: &[f64]) {
        let left = left.min(self.samples.len());
        let right = right.clamp(left, self.samples.len());
        let mut gated = vec![0.0; self.samples.len()];
        for (i, (s, w)) in self.samples[left..right].iter().zip(window).enumerate() {
            gated[left + i] = s * w;
        }
        self.gated_samples = gated;
        self.fft_cache = None;
    }

    /// Drop the gate and any spectrum derived from it.
    pub fn clear_gate(&mut self) {
        self.gated_samples.clear();
        self.fft_cache = None;
    }

    /// The cached spectrum, if one was computed from the current gate.
    pub fn fft_cache(&self) -> Option<(&[Complex64], usize)> {
        self.fft_cache.as_ref().map(|(c, n)| (c.as_slice(), *n))
    }

    /// Store the spectrum computed from the current `gated_samples`.
    pub fn set_fft(&mut self, spectrum: Vec<Complex64>, fft_points: usize) {
        self.fft_cache = Some((spectrum, fft_points));
    }

    /// The angle-negated counterpart of this measurement, sharing the same
    /// data. Used to reconstruct a full sweep from a half sweep.
    pub fn mirror(&self) -> Self {
        let mut m = self.clone();
        m.h = -self.h;
        m.v = -self.v;
        m
    }
}
