//! Benchmarks for the hot paths of the analysis pipeline.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use polarmap_analysis::{DspKernel, Kernel};
use polarmap_core::{WindowSpec, WindowType, build_gate};

fn bench_gate(c: &mut Criterion) {
    let left = WindowSpec::new(100, WindowType::Tukey, 25);
    let right = WindowSpec::new(4000, WindowType::Tukey, 50);
    c.bench_function("build_gate_4k", |b| {
        b.iter(|| build_gate(black_box(&left), black_box(&right), black_box(500)))
    });
}

fn bench_fft(c: &mut Criterion) {
    let kernel = DspKernel;
    let samples: Vec<f64> = (0..4096).map(|i| (i as f64 * 0.01).sin()).collect();
    c.bench_function("fft_4k", |b| b.iter(|| kernel.fft(black_box(&samples))));
}

fn bench_log_resample(c: &mut Criterion) {
    let kernel = DspKernel;
    let samples: Vec<f64> = (0..4096).map(|i| (i as f64 * 0.01).sin()).collect();
    let (spectrum, n) = kernel.fft(&samples);
    let step = 48000.0 / n as f64;
    c.bench_function("log_resample_4k", |b| {
        b.iter(|| kernel.log_resample(black_box(&spectrum), black_box(step)))
    });
}

criterion_group!(benches, bench_gate, bench_fft, bench_log_resample);
criterion_main!(benches);
