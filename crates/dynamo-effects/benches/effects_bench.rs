//! Criterion benchmarks for dynamo processing units
//!
//! Run with: cargo bench -p dynamo-effects
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use dynamo_core::{OversamplingMode, Oversampler, ParameterInfo, Stereo, StereoProcessor};
use dynamo_effects::{Compressor, Gain, TapeEcho};

const SAMPLE_RATE: f32 = 48000.0;
const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512, 1024];

fn generate_test_signal(size: usize) -> Vec<Stereo<f32>> {
    (0..size)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE;
            let v = (2.0 * std::f32::consts::PI * 440.0 * t).sin() * 0.5;
            Stereo::new(v, 0.8 * v)
        })
        .collect()
}

fn bench_unit<P: StereoProcessor>(c: &mut Criterion, name: &str, mut unit: P) {
    let mut group = c.benchmark_group(name);

    for &block_size in BLOCK_SIZES {
        let input = generate_test_signal(block_size);

        group.bench_with_input(
            BenchmarkId::from_parameter(block_size),
            &block_size,
            |b, _| {
                let mut buffer = input.clone();
                b.iter(|| {
                    buffer.copy_from_slice(&input);
                    unit.process_block(black_box(&mut buffer));
                    black_box(buffer[0])
                })
            },
        );
    }

    group.finish();
}

fn bench_compressor(c: &mut Criterion) {
    let mut unit = Compressor::new(SAMPLE_RATE);
    unit.set_threshold_db(-20.0);
    unit.set_ratio(4.0);
    unit.set_attack_ms(5.0);
    unit.set_release_ms(50.0);
    bench_unit(c, "Compressor", unit);
}

fn bench_compressor_rms_linked(c: &mut Criterion) {
    let mut unit = Compressor::new(SAMPLE_RATE);
    unit.set_threshold_db(-20.0);
    unit.set_param(10, 1.0); // RMS
    unit.set_param(13, 1.0); // Link
    bench_unit(c, "Compressor_RMS_Link", unit);
}

fn bench_tape_echo(c: &mut Criterion) {
    let mut unit = TapeEcho::with_max_sample_rate(SAMPLE_RATE, SAMPLE_RATE);
    unit.set_param(1, 0.6);
    unit.set_param(4, 6.0);
    unit.set_param(8, 2.0);
    bench_unit(c, "TapeEcho", unit);
}

fn bench_gain(c: &mut Criterion) {
    let mut unit = Gain::new(SAMPLE_RATE);
    unit.set_gain_db(-6.0);
    bench_unit(c, "Gain", unit);
}

fn bench_oversampled_compressor(c: &mut Criterion) {
    for mode in [OversamplingMode::Fir2xHq, OversamplingMode::Fir4xHq, OversamplingMode::Fir8xHq] {
        let mut comp = Compressor::new(SAMPLE_RATE);
        comp.set_threshold_db(-20.0);
        comp.set_makeup_db(6.0);
        let mut os = Oversampler::new(comp);
        os.set_mode(mode, SAMPLE_RATE);
        bench_unit(c, &format!("Compressor_{}", mode.label()), os);
    }
}

criterion_group!(
    benches,
    bench_compressor,
    bench_compressor_rms_linked,
    bench_tape_echo,
    bench_gain,
    bench_oversampled_compressor,
);
criterion_main!(benches);
