//! End-to-end pipeline scenarios over the default kernel.

use polarmap_analysis::{AnalysisModel, AnalysisStage, DataSource, DspKernel, KernelError};
use polarmap_core::{
    Event, EventKind, EventSink, FrequencyResponse, GatePair, Measurement, ModalParameters,
    SmoothingType, WindowSpec, WindowType,
};
use std::cell::RefCell;
use std::rc::Rc;

fn synthetic_ir(h: f64) -> Measurement {
    let mut samples = vec![0.0; 2048];
    samples[200] = 1.0;
    // a touch of decay so the gate has something to taper
    samples[201] = 0.4;
    samples[202] = 0.1;
    Measurement::new(format!("ir_H{h}"), h, 0.0, 48000, samples)
}

fn loaded_model() -> AnalysisModel<DspKernel> {
    let mut model = AnalysisModel::new(DspKernel);
    model.load(vec![synthetic_ir(-30.0), synthetic_ir(0.0), synthetic_ir(30.0)]);
    model
}

fn default_gate() -> GatePair {
    GatePair::new(
        WindowSpec::new(150, WindowType::Tukey, 25),
        WindowSpec::new(1200, WindowType::Tukey, 25),
    )
}

#[test]
fn end_to_end_frequency_analysis() {
    let mut model = loaded_model();
    assert_eq!(model.stage(), AnalysisStage::Loaded);

    let gate = model.default_gate().expect("measurements are loaded");
    assert!(gate.left.position < gate.right.position);
    model.analyse(&gate);

    assert_eq!(model.stage(), AnalysisStage::FrequencyAnalysed);
    let data = model.complex_data(DataSource::Measured).unwrap();
    assert_eq!(data.len(), 3);
    for d in data {
        assert!(!d.frequencies.is_empty());
        for pair in d.frequencies.windows(2) {
            assert!(pair[1] > pair[0], "frequency axis must be strictly increasing");
        }
    }
    assert!(model.power_response().is_some());
    assert!(model.directivity_index().is_some());
}

#[test]
fn analyse_is_idempotent() {
    let mut model = loaded_model();
    let gate = default_gate();
    model.analyse(&gate);
    let first = model.magnitude_data(DataSource::Measured);
    let first_power = model.power_response();

    model.analyse(&gate);
    assert_eq!(model.magnitude_data(DataSource::Measured), first);
    assert_eq!(model.power_response(), first_power);
}

#[test]
fn geometry_failure_leaves_previous_caches_intact() {
    let mut model = loaded_model();
    model.analyse(&default_gate());
    let before: Vec<_> = model
        .complex_data(DataSource::Measured)
        .unwrap()
        .to_vec();

    model.set_modal_parameters(ModalParameters {
        driver_radius_m: 0.5,
        box_radius_m: 0.3,
        ..ModalParameters::default()
    });
    let err = model.analyse_modal().unwrap_err();
    assert!(matches!(err, KernelError::Geometry { .. }));

    assert_eq!(model.stage(), AnalysisStage::FrequencyAnalysed);
    assert_eq!(model.complex_data(DataSource::Measured).unwrap(), &before[..]);
    assert!(model.complex_data(DataSource::Modal).is_none());
}

#[test]
fn modal_analysis_reconstructs_the_angular_grid() {
    let mut model = loaded_model();
    model.analyse(&default_gate());
    model.analyse_modal().unwrap();

    assert_eq!(model.stage(), AnalysisStage::ModalAnalysed);
    let modal = model.complex_data(DataSource::Modal).unwrap();
    // every 2 degrees from 0 to 180 inclusive
    assert_eq!(modal.len(), 91);
    assert_eq!(modal[0].angle, 0.0);
    assert_eq!(modal[90].angle, 180.0);
    assert_eq!(modal[1].display_name, "modal 2");
    assert_eq!(modal[0].frequencies, model.complex_data(DataSource::Measured).unwrap()[0].frequencies);
}

#[test]
fn modal_parameter_edits_mark_the_modal_stage_stale() {
    let mut model = loaded_model();
    model.analyse(&default_gate());
    model.analyse_modal().unwrap();
    assert_eq!(model.stage(), AnalysisStage::ModalAnalysed);

    model.set_modal_parameters(ModalParameters {
        coefficient_count: 8,
        ..ModalParameters::default()
    });
    assert_eq!(model.stage(), AnalysisStage::FrequencyAnalysed);
    assert!(model.complex_data(DataSource::Modal).is_none());
    // the frequency stage stayed valid
    assert!(model.complex_data(DataSource::Measured).is_some());

    model.analyse_modal().unwrap();
    assert_eq!(model.stage(), AnalysisStage::ModalAnalysed);
}

#[test]
fn smoothing_changes_the_read_not_the_cache() {
    let mut model = loaded_model();
    model.analyse(&default_gate());
    let raw = model.magnitude_data(DataSource::Measured);

    model.set_smoothing(Some(SmoothingType::OneThirdOctave));
    let smoothed = model.magnitude_data(DataSource::Measured);
    assert_eq!(smoothed.len(), raw.len());
    // cached complex data is untouched by a smoothing change
    assert_eq!(model.stage(), AnalysisStage::FrequencyAnalysed);

    model.set_smoothing(None);
    assert_eq!(model.magnitude_data(DataSource::Measured), raw);
}

#[test]
fn normalisation_zeroes_the_reference_curve() {
    let mut model = loaded_model();
    model.analyse(&default_gate());
    model.set_normalisation(true, 0.0);

    let data = model.magnitude_data(DataSource::Measured);
    let reference = data.iter().find(|d| d.angle == 0.0).unwrap();
    assert!(reference.y.iter().all(|&y| y.abs() < 1e-9));
}

#[test]
fn frequency_domain_measurements_pass_through() {
    let mut model = AnalysisModel::new(DspKernel);
    model.load(vec![Measurement::from_response(
        "NFS",
        0.0,
        0.0,
        FrequencyResponse {
            freqs: vec![100.0, 1000.0, 10_000.0],
            spl: vec![80.0, 86.0, 83.0],
        },
    )]);
    model.analyse(&default_gate());

    let data = model.magnitude_data(DataSource::Measured);
    assert_eq!(data.len(), 1);
    assert_eq!(data[0].x, vec![100.0, 1000.0, 10_000.0]);
    for (got, want) in data[0].y.iter().zip([80.0, 86.0, 83.0]) {
        assert!((got - want).abs() < 1e-9);
    }
}

#[test]
fn polar_slice_picks_the_nearest_frequency() {
    let mut model = loaded_model();
    model.analyse(&default_gate());
    let slice = model.polar_slice(DataSource::Measured, 1000.0).unwrap();
    assert_eq!(slice.theta.len(), 3);
    assert!((slice.freq - 1000.0).abs() / 1000.0 < 0.05);
}

#[test]
fn contour_grid_is_freqs_by_angles() {
    let mut model = loaded_model();
    model.analyse(&default_gate());
    let contour = model.contour_data(DataSource::Measured).unwrap();
    let bins = model.complex_data(DataSource::Measured).unwrap()[0]
        .frequencies
        .len();
    assert_eq!(contour.x.len(), bins * 3);
    assert_eq!(contour.y.len(), contour.x.len());
    assert_eq!(contour.z.len(), contour.x.len());
    assert_eq!(contour.y[0], -30.0);
    assert_eq!(contour.y[contour.y.len() - 1], 30.0);
}

struct Recorder {
    events: Rc<RefCell<Vec<EventKind>>>,
}

impl EventSink for Recorder {
    fn name(&self) -> &str {
        "recorder"
    }

    fn on_event(&mut self, event: Event) {
        self.events.borrow_mut().push(event.kind);
    }
}

#[test]
fn lifecycle_events_reach_registered_consumers() {
    let events = Rc::new(RefCell::new(Vec::new()));
    let mut model = AnalysisModel::new(DspKernel);
    model.register(Rc::new(RefCell::new(Recorder {
        events: events.clone(),
    })));

    model.load(vec![synthetic_ir(0.0)]);
    model.analyse(&default_gate());
    model.clear();

    assert_eq!(
        *events.borrow(),
        vec![EventKind::Loaded, EventKind::Analysed, EventKind::Cleared]
    );
    assert_eq!(model.stage(), AnalysisStage::Empty);
}
