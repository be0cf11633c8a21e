//! The staged analysis state machine.
//!
//! [`AnalysisModel`] owns the measurement collection and sequences the
//! pipeline: gate -> transform -> log resample -> modal fit -> polar
//! reconstruction. Derived caches are invalidated wholesale rather than
//! patched when an upstream input changes; a stage is either fully
//! recomputed or left exactly as it was. Windowing and explicit analyse
//! calls are eager; smoothing, normalisation and modal parameter edits are
//! lazy and take effect on the next read or analysis.

use crate::kernel::{Kernel, KernelError};
use num_complex::Complex64;
use polarmap_core::{
    ComplexFrequencyData, ContourData, Event, EventKind, EventSink, GatePair, Measurement,
    ModalParameters, NotificationBus, PolarSlice, SmoothingType, WindowSpec, WindowType, XyData,
};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Angular step of the reconstructed modal dataset, degrees.
const MODAL_GRID_STEP: usize = 2;

/// Default taper fraction for gates guessed from a measurement.
const DEFAULT_TAPER_PERCENT: u8 = 25;

/// Floor for linear magnitudes before conversion to dB.
const DB_FLOOR: f64 = 1e-12;

/// How far through the pipeline the model has progressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisStage {
    /// No measurements loaded.
    Empty,
    /// Measurements loaded, nothing derived yet.
    Loaded,
    /// Gates applied, spectra not yet computed.
    Gated,
    /// Per-angle frequency responses and the power response are cached.
    FrequencyAnalysed,
    /// The modal model and its reconstruction are cached as well.
    ModalAnalysed,
}

/// Which derived dataset a read targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    /// Data transformed from the measurements themselves.
    Measured,
    /// The synthetic dataset reconstructed from the modal model.
    Modal,
}

/// Owns the measurements and runs the analysis pipeline over a [`Kernel`].
pub struct AnalysisModel<K: Kernel> {
    kernel: K,
    measurements: Vec<Measurement>,
    stage: AnalysisStage,
    modal_parameters: ModalParameters,
    smoothing: Option<SmoothingType>,
    normalised: bool,
    normalisation_angle: f64,
    frequency_data: Option<Vec<ComplexFrequencyData>>,
    power_response: Option<XyData>,
    directivity: Option<XyData>,
    modal_coefficients: Option<Vec<Vec<Complex64>>>,
    modal_data: Option<Vec<ComplexFrequencyData>>,
    bus: NotificationBus,
}

impl<K: Kernel> AnalysisModel<K> {
    /// Create an empty model over `kernel`.
    pub fn new(kernel: K) -> Self {
        Self {
            kernel,
            measurements: Vec::new(),
            stage: AnalysisStage::Empty,
            modal_parameters: ModalParameters::default(),
            smoothing: None,
            normalised: false,
            normalisation_angle: 0.0,
            frequency_data: None,
            power_response: None,
            directivity: None,
            modal_coefficients: None,
            modal_data: None,
            bus: NotificationBus::new(),
        }
    }

    /// Register a consumer for lifecycle events.
    pub fn register(&mut self, sink: Rc<RefCell<dyn EventSink>>) {
        self.bus.register(sink);
    }

    /// Current pipeline stage.
    pub fn stage(&self) -> AnalysisStage {
        self.stage
    }

    /// The loaded measurements.
    pub fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }

    /// Number of loaded measurements.
    pub fn len(&self) -> usize {
        self.measurements.len()
    }

    /// True when nothing is loaded.
    pub fn is_empty(&self) -> bool {
        self.measurements.is_empty()
    }

    /// The active modal parameters.
    pub fn modal_parameters(&self) -> &ModalParameters {
        &self.modal_parameters
    }

    /// The active smoothing type, if any.
    pub fn smoothing(&self) -> Option<SmoothingType> {
        self.smoothing
    }

    /// The size of the longest measurement.
    pub fn max_sample_len(&self) -> usize {
        self.measurements.iter().map(Measurement::len).max().unwrap_or(0)
    }

    /// The largest absolute sample value in the set.
    pub fn max_sample_value(&self) -> f64 {
        self.measurements
            .iter()
            .map(|m| m.max().abs().max(m.min().abs()))
            .fold(0.0, f64::max)
    }

    /// Replace the measurement set. An existing set is cleared first; an
    /// empty replacement leaves the model empty and tells consumers to
    /// clear.
    pub fn load(&mut self, measurements: Vec<Measurement>) {
        if !self.measurements.is_empty() {
            self.clear();
        }
        self.measurements = measurements;
        if self.measurements.is_empty() {
            self.stage = AnalysisStage::Empty;
            self.bus.dispatch(Event::all(EventKind::Cleared));
        } else {
            info!(target: "polarmap::analysis", "loaded {} measurements", self.measurements.len());
            self.stage = AnalysisStage::Loaded;
            self.bus.dispatch(Event::all(EventKind::Loaded));
        }
    }

    /// Drop the measurements and every derived cache.
    pub fn clear(&mut self) {
        self.measurements.clear();
        self.invalidate_frequency_caches();
        self.stage = AnalysisStage::Empty;
        self.bus.dispatch(Event::all(EventKind::Cleared));
    }

    fn invalidate_frequency_caches(&mut self) {
        self.frequency_data = None;
        self.power_response = None;
        self.directivity = None;
        self.invalidate_modal_caches();
    }

    fn invalidate_modal_caches(&mut self) {
        self.modal_coefficients = None;
        self.modal_data = None;
    }

    /// A gate guess for the loaded set: left edge where the first
    /// measurement drops into the reflection-free zone, right edge at its
    /// first reflection.
    pub fn default_gate(&self) -> Option<GatePair> {
        let first = self.measurements.iter().find(|m| !m.is_empty())?;
        Some(GatePair::new(
            WindowSpec::new(first.start_index(), WindowType::Tukey, DEFAULT_TAPER_PERCENT),
            WindowSpec::new(
                first.first_reflection_index(),
                WindowType::Tukey,
                DEFAULT_TAPER_PERCENT,
            ),
        ))
    }

    /// Gate every measurement with `gate` and run the frequency stage.
    /// Eager by user intent: the caches are rebuilt before this returns and
    /// consumers are notified once.
    pub fn analyse(&mut self, gate: &GatePair) {
        if self.measurements.is_empty() {
            debug!(target: "polarmap::analysis", "analyse with no measurements loaded");
            return;
        }
        let start = Instant::now();
        self.apply_gate(gate);
        self.analyse_frequency();
        debug!(
            target: "polarmap::analysis",
            "analysed {} measurements in {}ms",
            self.measurements.len(),
            start.elapsed().as_millis()
        );
        self.bus.dispatch(Event::all(EventKind::Analysed));
    }

    /// The gate window is built once around the first measurement's peak
    /// and reused for every measurement, aligning all channels to a
    /// reference peak.
    fn apply_gate(&mut self, gate: &GatePair) {
        if let Some(first) = self.measurements.iter().find(|m| !m.is_empty()) {
            let peak = first.peak_index();
            let window = gate.build(peak);
            for m in self.measurements.iter_mut().filter(|m| !m.is_empty()) {
                m.gate(gate.left.position, gate.right.position, &window);
            }
        }
        self.invalidate_frequency_caches();
        self.stage = AnalysisStage::Gated;
    }

    fn analyse_frequency(&mut self) {
        let mut data = Vec::with_capacity(self.measurements.len());
        for m in &mut self.measurements {
            data.push(frequency_data_for(&self.kernel, m));
        }
        let (power, directivity) = self.summary_series(&data);
        self.frequency_data = Some(data);
        self.power_response = power;
        self.directivity = directivity;
        self.stage = AnalysisStage::FrequencyAnalysed;
    }

    /// Power response and directivity index across the angle set.
    fn summary_series(
        &self,
        data: &[ComplexFrequencyData],
    ) -> (Option<XyData>, Option<XyData>) {
        let Some(first) = data.first() else {
            return (None, None);
        };
        let bins = data
            .iter()
            .map(|d| d.frequencies.len())
            .min()
            .unwrap_or(0);
        let freqs: Vec<f64> = first.frequencies[..bins].to_vec();
        let power_y: Vec<f64> = (0..bins)
            .map(|i| {
                let stack: Vec<Complex64> = data
                    .iter()
                    .map(|d| d.values[i] * d.scale_factor)
                    .collect();
                let p = self
                    .kernel
                    .power(&stack, freqs[i], self.modal_parameters.box_radius_m);
                20.0 * p.max(DB_FLOOR).log10()
            })
            .collect();

        let on_axis = data
            .iter()
            .min_by(|a, b| a.angle.abs().total_cmp(&b.angle.abs()))
            .map(|d| d.magnitude(1.0));
        let di = on_axis.map(|axis| {
            let y = axis
                .y
                .iter()
                .zip(&power_y)
                .map(|(a, p)| a - p)
                .collect();
            XyData::new("DI", axis.angle, freqs.clone(), y)
        });
        (
            Some(XyData::new("Power", 0.0, freqs, power_y)),
            di,
        )
    }

    /// Fit the modal model and reconstruct the synthetic polar dataset.
    ///
    /// On failure (invalid geometry) every previously cached stage is left
    /// intact and the error surfaces to the caller.
    pub fn analyse_modal(&mut self) -> Result<(), KernelError> {
        let Some(frequency_data) = &self.frequency_data else {
            debug!(target: "polarmap::analysis", "modal analysis requested before frequency analysis");
            return Ok(());
        };
        let start = Instant::now();
        let freqs = frequency_data
            .first()
            .map(|d| d.frequencies.clone())
            .unwrap_or_default();
        let spectra: Vec<Vec<Complex64>> =
            frequency_data.iter().map(|d| d.values.clone()).collect();
        let angles_rad: Vec<f64> = frequency_data
            .iter()
            .map(|d| d.angle.to_radians())
            .collect();

        let coefficients =
            self.kernel
                .modal_fit(&spectra, &freqs, &angles_rad, &self.modal_parameters)?;

        // one coefficient column per frequency
        let columns: Vec<Vec<Complex64>> = (0..freqs.len())
            .map(|fi| coefficients.iter().map(|row| row[fi]).collect())
            .collect();
        let box_radius = self.modal_parameters.box_radius_m;
        let modal_data = (0..=180)
            .step_by(MODAL_GRID_STEP)
            .map(|angle| {
                let values = columns
                    .iter()
                    .zip(&freqs)
                    .map(|(column, &f)| {
                        self.kernel
                            .polar_reconstruct(column, f64::from(angle), f, box_radius)
                    })
                    .collect();
                ComplexFrequencyData {
                    display_name: format!("modal {angle}"),
                    angle: f64::from(angle),
                    frequencies: freqs.clone(),
                    values,
                    scale_factor: 1.0,
                }
            })
            .collect();

        self.modal_coefficients = Some(coefficients);
        self.modal_data = Some(modal_data);
        self.stage = AnalysisStage::ModalAnalysed;
        debug!(
            target: "polarmap::analysis",
            "modal analysis in {}ms", start.elapsed().as_millis()
        );
        self.bus.dispatch(Event::all(EventKind::Analysed));
        Ok(())
    }

    /// Set the smoothing applied to magnitude reads. Takes effect lazily on
    /// the next read.
    pub fn set_smoothing(&mut self, smoothing: Option<SmoothingType>) {
        self.smoothing = smoothing;
        if self.frequency_data.is_some() {
            self.bus.dispatch(Event::all(EventKind::Analysed));
        }
    }

    /// Toggle normalisation of magnitude reads against the curve at
    /// `angle`. Takes effect lazily on the next read.
    pub fn set_normalisation(&mut self, normalised: bool, angle: f64) {
        self.normalised = normalised;
        self.normalisation_angle = angle;
        if self.frequency_data.is_some() {
            self.bus.dispatch(Event::all(EventKind::Analysed));
        }
    }

    /// Replace the modal parameters, marking the modal stage stale. The
    /// frequency stage stays valid; the modal caches are rebuilt on the
    /// next explicit modal analysis.
    pub fn set_modal_parameters(&mut self, parameters: ModalParameters) {
        self.modal_parameters = parameters;
        if self.stage == AnalysisStage::ModalAnalysed {
            self.invalidate_modal_caches();
            self.stage = AnalysisStage::FrequencyAnalysed;
        }
    }

    fn source_data(&self, source: DataSource) -> Option<&Vec<ComplexFrequencyData>> {
        match source {
            DataSource::Measured => self.frequency_data.as_ref(),
            DataSource::Modal => self.modal_data.as_ref(),
        }
    }

    /// The cached complex datasets for `source`, when that stage has run.
    pub fn complex_data(&self, source: DataSource) -> Option<&[ComplexFrequencyData]> {
        self.source_data(source).map(Vec::as_slice)
    }

    /// Per-angle magnitude series in dB, smoothed and normalised per the
    /// current settings.
    pub fn magnitude_data(&self, source: DataSource) -> Vec<XyData> {
        let Some(data) = self.source_data(source) else {
            return Vec::new();
        };
        let mut series: Vec<XyData> = data.iter().map(|d| self.magnitude_of(d)).collect();
        if self.normalised {
            let target = series
                .iter()
                .find(|s| (s.angle - self.normalisation_angle).abs() < 1e-9)
                .cloned();
            match target {
                Some(target) => {
                    series = series.iter().map(|s| s.normalise(&target)).collect();
                }
                None => {
                    warn!(
                        target: "polarmap::analysis",
                        "unable to normalise to {}", self.normalisation_angle
                    );
                }
            }
        }
        series
    }

    fn magnitude_of(&self, data: &ComplexFrequencyData) -> XyData {
        let mut linear: Vec<f64> = data
            .values
            .iter()
            .map(|v| v.norm() * data.scale_factor)
            .collect();
        if let Some(smoothing) = self.smoothing {
            linear = self.kernel.smooth(&linear, &data.frequencies, smoothing);
        }
        let y = linear.iter().map(|v| 20.0 * v.max(DB_FLOOR).log10()).collect();
        XyData::new(data.display_name.clone(), data.angle, data.frequencies.clone(), y)
    }

    /// The power response summary series.
    pub fn power_response(&self) -> Option<XyData> {
        self.power_response.clone()
    }

    /// The directivity index summary series.
    pub fn directivity_index(&self) -> Option<XyData> {
        self.directivity.clone()
    }

    /// Flattened contour grid over frequency and angle.
    pub fn contour_data(&self, source: DataSource) -> Option<ContourData> {
        let series = self.magnitude_data(source);
        if series.is_empty() {
            return None;
        }
        let mut x = Vec::new();
        let mut y = Vec::new();
        let mut z = Vec::new();
        for s in &series {
            x.extend_from_slice(&s.x);
            y.extend(std::iter::repeat_n(s.angle, s.x.len()));
            z.extend_from_slice(&s.y);
        }
        Some(ContourData { x, y, z })
    }

    /// The polar slice at the analysed frequency nearest to `freq`.
    pub fn polar_slice(&self, source: DataSource, freq: f64) -> Option<PolarSlice> {
        let series = self.magnitude_data(source);
        let first = series.first()?;
        let idx = first
            .x
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| (*a - freq).abs().total_cmp(&(*b - freq).abs()))
            .map(|(i, _)| i)?;
        let theta = series.iter().map(|s| s.angle.to_radians()).collect();
        let r = series.iter().map(|s| s.y.get(idx).copied().unwrap_or(f64::NEG_INFINITY)).collect();
        Some(PolarSlice {
            freq: first.x[idx],
            theta,
            r,
        })
    }
}

/// Transform one measurement to log-spaced complex frequency data. Formats
/// that deliver frequency-domain data pass through unchanged; everything
/// else goes through FFT and log resampling, caching the spectrum on the
/// measurement.
fn frequency_data_for<K: Kernel>(kernel: &K, m: &mut Measurement) -> ComplexFrequencyData {
    if let Some(response) = m.response() {
        let values = response
            .spl
            .iter()
            .map(|db| Complex64::new(10f64.powf(db / 20.0), 0.0))
            .collect();
        return ComplexFrequencyData {
            display_name: m.display_name(),
            angle: m.h(),
            frequencies: response.freqs.clone(),
            values,
            scale_factor: 1.0,
        };
    }
    // the cache is only ever valid for the current gated_samples; gating
    // clears it
    let cached = m.fft_cache().map(|(s, n)| (s.to_vec(), n));
    let (spectrum, fft_points) = match cached {
        Some(cached) => cached,
        None => {
            let (spectrum, points) = kernel.fft(m.gated_samples());
            m.set_fft(spectrum.clone(), points);
            (spectrum, points)
        }
    };
    let freq_step = f64::from(m.sample_rate()) / fft_points as f64;
    let (values, frequencies) = kernel.log_resample(&spectrum, freq_step);
    ComplexFrequencyData {
        display_name: m.display_name(),
        angle: m.h(),
        frequencies,
        values,
        scale_factor: 2.0 / fft_points as f64,
    }
}
