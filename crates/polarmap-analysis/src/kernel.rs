//! The transform kernel seam.
//!
//! The orchestrator talks to the numeric kernel exclusively through the
//! [`Kernel`] trait, so tests can substitute instrumented kernels and the
//! numerics can be swapped without touching the state machine. Calls are
//! synchronous and blocking; the caller is responsible for serializing
//! them (the orchestrator does so by taking `&mut self`).

use crate::{fft, resample, smooth, spatial};
use num_complex::Complex64;
use polarmap_core::{ModalParameters, SmoothingType};
use thiserror::Error;

/// Errors raised by kernel calls.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum KernelError {
    /// The driver radius must be strictly inside the volume-equivalent box
    /// sphere.
    #[error("driver radius {driver_radius} m must be less than box radius {box_radius} m")]
    Geometry {
        /// Offending driver radius in metres.
        driver_radius: f64,
        /// Box sphere radius in metres.
        box_radius: f64,
    },
}

/// The stateless numeric call contract of the analysis pipeline.
pub trait Kernel {
    /// Forward FFT of a real signal padded to the next pow2 of at least
    /// 512. Returns the half spectrum and the padded point count.
    fn fft(&self, samples: &[f64]) -> (Vec<Complex64>, usize);

    /// Resample a linearly spaced spectrum onto the log axis; `freq_step`
    /// is the linear bin spacing in Hz. Returns values and frequencies.
    fn log_resample(&self, spectrum: &[Complex64], freq_step: f64)
    -> (Vec<Complex64>, Vec<f64>);

    /// Fit modal coefficients to per-angle spectra; the result is indexed
    /// `[coefficient][frequency]`.
    fn modal_fit(
        &self,
        spectra: &[Vec<Complex64>],
        freqs: &[f64],
        angles_rad: &[f64],
        params: &ModalParameters,
    ) -> Result<Vec<Vec<Complex64>>, KernelError>;

    /// Evaluate one modal coefficient column at an angle/frequency.
    fn polar_reconstruct(
        &self,
        modal_row: &[Complex64],
        angle_deg: f64,
        freq: f64,
        box_radius: f64,
    ) -> Complex64;

    /// Pressure-equivalent radiated power across the angle stack at one
    /// frequency.
    fn power(&self, angle_stack: &[Complex64], freq: f64, box_radius: f64) -> f64;

    /// Smooth linear magnitudes over a log frequency axis.
    fn smooth(&self, data: &[f64], freqs: &[f64], smoothing: SmoothingType) -> Vec<f64>;
}

/// The default kernel, built on `rustfft` and `nalgebra`.
#[derive(Debug, Default, Clone, Copy)]
pub struct DspKernel;

impl Kernel for DspKernel {
    fn fft(&self, samples: &[f64]) -> (Vec<Complex64>, usize) {
        fft::fft(samples)
    }

    fn log_resample(
        &self,
        spectrum: &[Complex64],
        freq_step: f64,
    ) -> (Vec<Complex64>, Vec<f64>) {
        resample::log_resample(spectrum, freq_step)
    }

    fn modal_fit(
        &self,
        spectra: &[Vec<Complex64>],
        freqs: &[f64],
        angles_rad: &[f64],
        params: &ModalParameters,
    ) -> Result<Vec<Vec<Complex64>>, KernelError> {
        spatial::modal_fit(spectra, freqs, angles_rad, params)
    }

    fn polar_reconstruct(
        &self,
        modal_row: &[Complex64],
        angle_deg: f64,
        freq: f64,
        box_radius: f64,
    ) -> Complex64 {
        spatial::polar_reconstruct(modal_row, angle_deg, freq, box_radius)
    }

    fn power(&self, angle_stack: &[Complex64], freq: f64, box_radius: f64) -> f64 {
        spatial::power(angle_stack, freq, box_radius)
    }

    fn smooth(&self, data: &[f64], freqs: &[f64], smoothing: SmoothingType) -> Vec<f64> {
        smooth::smooth(data, freqs, smoothing)
    }
}
