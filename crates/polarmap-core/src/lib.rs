//! Core data model for loudspeaker polar (directivity) measurement analysis.
//!
//! This crate provides the leaf entities shared across the polarmap
//! workspace:
//!
//! - [`measurement`] - One impulse response per angle, with gate state and
//!   an FFT cache
//! - [`window`] - Gate window specs, window coefficient generation, and the
//!   composite asymmetric gate builder
//! - [`data`] - Immutable derived value objects (complex frequency data,
//!   xy series)
//! - [`modal`] - Parameters for the spatial modal fit
//! - [`smoothing`] - Fractional-octave / critical-band smoothing selector
//! - [`event`] - Typed lifecycle events and the change notification bus
//!
//! Measurements are owned exclusively by the analysis orchestrator (in
//! `polarmap-analysis`); everything handed to consumers is an owned value
//! object, so redraw code never races a recompute.

pub mod data;
pub mod event;
pub mod measurement;
pub mod modal;
pub mod smoothing;
pub mod window;

pub use data::{ComplexFrequencyData, ContourData, PolarSlice, XyData};
pub use event::{Event, EventKind, EventSink, NotificationBus};
pub use measurement::{FrequencyResponse, Measurement};
pub use modal::ModalParameters;
pub use smoothing::{SmoothingType, UnknownSmoothingType};
pub use window::{GatePair, WindowSpec, WindowType, build_gate};
