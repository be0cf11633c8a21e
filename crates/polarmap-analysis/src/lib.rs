//! Transform kernel and analysis orchestration for polar measurements.
//!
//! The pipeline runs gate -> FFT -> log resample -> modal fit -> polar
//! reconstruction, orchestrated by [`AnalysisModel`] over a [`Kernel`]
//! implementation:
//!
//! - [`fft`] - pow2-padded real FFT to a half spectrum
//! - [`resample`] - linear-to-log frequency resampling
//! - [`spatial`] - modal decomposition, polar reconstruction, and the power
//!   quadrature
//! - [`smooth`] - fractional-octave and critical-band smoothing
//! - [`kernel`] - the [`Kernel`] seam and the default [`DspKernel`]
//! - [`orchestrator`] - the staged analysis state machine
//!
//! All kernel calls are synchronous and serialized through `&mut self` on
//! the orchestrator; consumers observe progress through the notification
//! bus and pull owned value objects afterwards.

pub mod fft;
pub mod kernel;
pub mod orchestrator;
pub mod resample;
pub mod smooth;
pub mod spatial;

pub use kernel::{DspKernel, Kernel, KernelError};
pub use orchestrator::{AnalysisModel, AnalysisStage, DataSource};
