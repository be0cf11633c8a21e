//! Spatial modal decomposition, polar reconstruction, and the power
//! quadrature.
//!
//! The measured directivity at each log frequency is decomposed onto an
//! axisymmetric Legendre basis by complex least squares. A coefficient row
//! can then be evaluated at any angle to synthesize the pressure response,
//! which is how the reconstructed polar dataset is produced.

use crate::kernel::KernelError;
use nalgebra::DMatrix;
use num_complex::Complex64;
use polarmap_core::ModalParameters;
use tracing::debug;

/// Speed of sound in air, m/s.
const SPEED_OF_SOUND: f64 = 343.0;

/// Evaluate Legendre polynomials `P_0..P_{count-1}` at `x` via the
/// three-term recurrence.
fn legendre(count: usize, x: f64) -> Vec<f64> {
    let mut p = Vec::with_capacity(count);
    for k in 0..count {
        let value = match k {
            0 => 1.0,
            1 => x,
            _ => {
                let k1 = (k - 1) as f64;
                ((2.0 * k1 + 1.0) * x * p[k - 1] - k1 * p[k - 2]) / (k1 + 1.0)
            }
        };
        p.push(value);
    }
    p
}

/// Second-order high-pass response of the source resonance at `f`.
fn source_response(f: f64, f0: f64, q0: f64) -> Complex64 {
    let s = Complex64::new(0.0, f / f0);
    let denom = s * s + s / q0 + Complex64::new(1.0, 0.0);
    s * s / denom
}

/// Blend weight for the low-frequency source model: 0 well above the
/// transition frequency, 1 well below it.
fn lf_blend(f: f64, transition: f64) -> f64 {
    1.0 / (1.0 + (f / transition).powi(2))
}

/// Fit modal coefficients to per-angle spectra at every log frequency.
///
/// `spectra` is one log-spaced spectrum per angle, `angles_rad` the
/// measurement angles in radians. Returns the coefficient matrix indexed
/// `[coefficient][frequency]`. Fails when the driver radius is not
/// strictly inside the volume-equivalent box sphere.
pub fn modal_fit(
    spectra: &[Vec<Complex64>],
    freqs: &[f64],
    angles_rad: &[f64],
    params: &ModalParameters,
) -> Result<Vec<Vec<Complex64>>, KernelError> {
    if params.driver_radius_m >= params.box_radius_m {
        return Err(KernelError::Geometry {
            driver_radius: params.driver_radius_m,
            box_radius: params.box_radius_m,
        });
    }

    // the fit cannot be better determined than the number of angles
    let rank = params.coefficient_count.min(angles_rad.len());
    let rows: Vec<Vec<f64>> = angles_rad
        .iter()
        .map(|a| legendre(rank, a.cos()))
        .collect();
    let basis = DMatrix::from_fn(angles_rad.len(), rank, |i, k| {
        Complex64::new(rows[i][k], 0.0)
    });
    let basis_h = basis.adjoint();
    let lu = (&basis_h * &basis).lu();

    let lf_gain = 10f64.powf(params.lf_gain_db / 20.0);
    let mut coefficients = vec![vec![Complex64::new(0.0, 0.0); freqs.len()]; params.coefficient_count];
    for (fi, &freq) in freqs.iter().enumerate() {
        // remove the propagation to the microphone before fitting
        let k_wave = 2.0 * std::f64::consts::PI * freq / SPEED_OF_SOUND;
        let r = params.measurement_distance_m;
        let spreading = Complex64::new(0.0, -k_wave * r).exp() / r;

        let rhs = DMatrix::from_fn(angles_rad.len(), 1, |i, _| spectra[i][fi] / spreading);
        let solution = lu
            .solve(&(&basis_h * rhs))
            .unwrap_or_else(|| DMatrix::zeros(rank, 1));

        // below the transition frequency the source model shapes the
        // coefficients instead of the (unreliable) measured data
        let blend = lf_blend(freq, params.transition_freq_hz);
        let shaping = Complex64::new(1.0 - blend, 0.0)
            + source_response(freq, params.f0_hz, params.q0) * (blend * lf_gain);
        for k in 0..rank {
            coefficients[k][fi] = solution[(k, 0)] * shaping;
        }
    }
    debug!(
        target: "polarmap::spatial",
        "fit {} coefficients over {} freqs from {} angles",
        params.coefficient_count,
        freqs.len(),
        angles_rad.len()
    );
    Ok(coefficients)
}

/// Evaluate one modal coefficient column at an arbitrary angle and
/// frequency, phase-referenced to the box sphere surface.
pub fn polar_reconstruct(
    modal_row: &[Complex64],
    angle_deg: f64,
    freq: f64,
    box_radius: f64,
) -> Complex64 {
    let basis = legendre(modal_row.len(), angle_deg.to_radians().cos());
    let pressure: Complex64 = modal_row
        .iter()
        .zip(&basis)
        .map(|(c, p)| *c * *p)
        .sum();
    let k_wave = 2.0 * std::f64::consts::PI * freq / SPEED_OF_SOUND;
    pressure * Complex64::new(0.0, -k_wave * box_radius).exp()
}

/// Pressure-equivalent radiated power across the angle stack at one
/// frequency, with the piston radiation-efficiency correction for the box
/// sphere.
pub fn power(angle_stack: &[Complex64], freq: f64, box_radius: f64) -> f64 {
    if angle_stack.is_empty() {
        return 0.0;
    }
    let mean_square =
        angle_stack.iter().map(|p| p.norm_sqr()).sum::<f64>() / angle_stack.len() as f64;
    let kr = 2.0 * std::f64::consts::PI * freq / SPEED_OF_SOUND * box_radius;
    let efficiency = kr / (1.0 + kr * kr).sqrt();
    mean_square.sqrt() * efficiency
}
