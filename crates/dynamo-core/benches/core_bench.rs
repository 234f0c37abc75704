//! Criterion benchmarks for dynamo-core DSP primitives
//!
//! Run with: cargo bench -p dynamo-core
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use dynamo_core::sidechain::{calc_coeffs, side_chain_db, side_chain_lin};
use dynamo_core::{
    BiquadSettings, BiquadShape, OversamplingMode, Oversampler, ScSettings, ScState, SoftClip5,
    Stereo, StereoBiquad, StereoProcessor, window_method,
};

const SAMPLE_RATE: f32 = 48000.0;
const BLOCK_SIZES: &[usize] = &[64, 256, 1024];

fn generate_test_signal(size: usize) -> Vec<Stereo<f32>> {
    (0..size)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE;
            let v = (2.0 * std::f32::consts::PI * 440.0 * t).sin() * 0.5;
            Stereo::new(v, -v)
        })
        .collect()
}

/// Soft clipper as a unit so the oversampler has real work to wrap.
struct Clipper(SoftClip5);

impl StereoProcessor for Clipper {
    fn process_sample(&mut self, x: Stereo<f32>) -> Stereo<f32> {
        self.0.process_stereo(x * 2.0)
    }
    fn update_coeffs(&mut self) {}
    fn reset(&mut self, _sample_rate: f32) {}
}

fn bench_side_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("SideChain");
    let settings = ScSettings {
        thresh_db: -18.0,
        ratio: 4.0,
        ..ScSettings::default()
    };
    let coeffs = calc_coeffs(SAMPLE_RATE, &settings);
    let rms_coeffs = calc_coeffs(
        SAMPLE_RATE,
        &ScSettings {
            rms_enable: true,
            ..settings
        },
    );

    for &block_size in BLOCK_SIZES {
        let input = generate_test_signal(block_size);

        group.bench_with_input(BenchmarkId::new("db", block_size), &block_size, |b, _| {
            let mut state = ScState::new();
            b.iter(|| {
                for x in &input {
                    black_box(side_chain_db(&coeffs, &mut state, black_box(x.l)));
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("lin", block_size), &block_size, |b, _| {
            let mut state = ScState::new();
            b.iter(|| {
                for x in &input {
                    black_box(side_chain_lin(&coeffs, &mut state, black_box(x.l)));
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("db_rms", block_size), &block_size, |b, _| {
            let mut state = ScState::new();
            b.iter(|| {
                for x in &input {
                    black_box(side_chain_db(&rms_coeffs, &mut state, black_box(x.l)));
                }
            });
        });
    }

    group.bench_function("calc_coeffs", |b| {
        b.iter(|| black_box(calc_coeffs(black_box(SAMPLE_RATE), black_box(&settings))));
    });

    group.finish();
}

fn bench_biquad(c: &mut Criterion) {
    let mut group = c.benchmark_group("Biquad");
    let settings = BiquadSettings {
        gain_db: 6.0,
        ..BiquadSettings::new(BiquadShape::Bell, 3000.0)
    };

    for &block_size in BLOCK_SIZES {
        let input = generate_test_signal(block_size);

        group.bench_with_input(
            BenchmarkId::new("process", block_size),
            &block_size,
            |b, _| {
                let mut filter = StereoBiquad::new();
                filter.update(&settings, SAMPLE_RATE);
                b.iter(|| {
                    for &x in &input {
                        black_box(filter.process(black_box(x)));
                    }
                });
            },
        );
    }

    group.bench_function("coefficient_calc", |b| {
        let mut filter = StereoBiquad::new();
        b.iter(|| filter.update(black_box(&settings), black_box(SAMPLE_RATE)));
    });

    group.finish();
}

fn bench_oversampler(c: &mut Criterion) {
    let mut group = c.benchmark_group("Oversampler");
    let input = generate_test_signal(1024);

    for mode in OversamplingMode::ALL {
        group.bench_with_input(BenchmarkId::new("process", mode), &mode, |b, &mode| {
            let mut os = Oversampler::new(Clipper(SoftClip5::new()));
            os.set_mode(mode, SAMPLE_RATE);
            b.iter(|| {
                for &x in &input {
                    black_box(os.process_sample(black_box(x)));
                }
            });
        });
    }

    group.bench_function("design_8x_hq", |b| {
        b.iter(|| black_box(window_method(22_000.0, black_box(192), SAMPLE_RATE * 8.0)));
    });

    group.finish();
}

criterion_group!(benches, bench_side_chain, bench_biquad, bench_oversampler);
criterion_main!(benches);
