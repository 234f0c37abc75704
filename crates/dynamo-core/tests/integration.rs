//! Integration tests for dynamo-core primitives working together.
//!
//! Covers the side-chain steady state, NaN recovery, and the oversampler
//! wrapped around real processing units.

use dynamo_core::sidechain::{calc_coeffs, side_chain_db, side_chain_lin};
use dynamo_core::{
    BiquadSettings, BiquadShape, OversamplingMode, Oversampler, ProcessorExt, ScSettings, ScState,
    SoftClip5, Stereo, StereoBiquad, StereoProcessor, db_to_linear, linear_to_db,
};
use std::f32::consts::PI;

const SAMPLE_RATE: f32 = 48000.0;

/// Static gain stage for chaining tests.
struct Scale(f32);

impl StereoProcessor for Scale {
    fn process_sample(&mut self, x: Stereo<f32>) -> Stereo<f32> {
        x * self.0
    }
    fn update_coeffs(&mut self) {}
    fn reset(&mut self, _sample_rate: f32) {}
}

/// Soft clipper wrapped as a processing unit.
struct Clipper(SoftClip5);

impl StereoProcessor for Clipper {
    fn process_sample(&mut self, x: Stereo<f32>) -> Stereo<f32> {
        self.0.process_stereo(x * 2.0)
    }
    fn update_coeffs(&mut self) {}
    fn reset(&mut self, _sample_rate: f32) {}
}

fn sine(freq: f32, amplitude: f32, len: usize) -> Vec<f32> {
    (0..len)
        .map(|i| amplitude * (2.0 * PI * freq * i as f32 / SAMPLE_RATE).sin())
        .collect()
}

#[test]
fn test_side_chain_reference_scenario() {
    // -12 dB threshold, 4:1, hard knee, -6 dBFS steady input:
    // 6 dB over → 1.5 dB out → 4.5 dB reduction → gain 10^(-4.5/20)
    let settings = ScSettings {
        thresh_db: -12.0,
        ratio: 4.0,
        knee_db: 0.0,
        t_att_ms: 1.0,
        t_rel_ms: 50.0,
        ..ScSettings::default()
    };
    let coeffs = calc_coeffs(SAMPLE_RATE, &settings);
    let mut state = ScState::new();
    let x = db_to_linear(-6.0);

    let mut gain = 1.0;
    for _ in 0..(SAMPLE_RATE as usize / 10) {
        gain = side_chain_db(&coeffs, &mut state, x);
    }

    assert!((gain - 0.596).abs() < 1e-3, "gain = {gain}");
    assert!((linear_to_db(gain) + 4.5).abs() < 0.01);
}

#[test]
fn test_side_chain_release_slower_than_attack() {
    let settings = ScSettings {
        thresh_db: -20.0,
        ratio: 8.0,
        knee_db: 0.0,
        t_att_ms: 1.0,
        t_rel_ms: 200.0,
        ..ScSettings::default()
    };
    let coeffs = calc_coeffs(SAMPLE_RATE, &settings);
    let mut state = ScState::new();

    // 5 ms of loud signal: reduction builds within the attack time
    let mut gain = 1.0;
    for _ in 0..240 {
        gain = side_chain_db(&coeffs, &mut state, 0.9);
    }
    let attacked = gain;
    assert!(attacked < 0.5);

    // 5 ms of silence: the release has barely started
    for _ in 0..240 {
        gain = side_chain_db(&coeffs, &mut state, 0.0);
    }
    assert!(gain < 0.6, "release too fast: {gain}");
    assert!(gain > attacked);
}

#[test]
fn test_side_chain_nan_recovers_within_two_samples() {
    let settings = ScSettings {
        thresh_db: -12.0,
        ratio: 4.0,
        ..ScSettings::default()
    };
    let coeffs = calc_coeffs(SAMPLE_RATE, &settings);
    let mut state = ScState::new();

    for _ in 0..100 {
        side_chain_lin(&coeffs, &mut state, 0.5);
    }
    side_chain_lin(&coeffs, &mut state, f32::NAN);
    let g1 = side_chain_lin(&coeffs, &mut state, 0.5);
    let g2 = side_chain_lin(&coeffs, &mut state, 0.5);
    assert!(g1.is_finite());
    assert!(g2.is_finite() && g2 > 0.0 && g2 <= 1.0);
    assert!(state.y_sens_last.is_finite());
    assert!(state.y_filter_last.is_finite());
}

#[test]
fn test_oversampler_disabled_bit_identical() {
    let mut wrapped = Oversampler::new(Clipper(SoftClip5::new()));
    let mut direct = Clipper(SoftClip5::new());

    let input = sine(997.0, 0.8, 512);
    for &v in &input {
        let x = Stereo::new(v, -v * 0.5);
        assert_eq!(wrapped.process_sample(x), direct.process_sample(x));
    }
}

#[test]
fn test_oversampler_sine_round_trip() {
    for mode in [
        OversamplingMode::Fir2xLq,
        OversamplingMode::Fir4xHq,
        OversamplingMode::Fir8xHq,
    ] {
        let mut os = Oversampler::new(Scale(1.0));
        os.set_mode(mode, SAMPLE_RATE);
        let latency = os.latency_samples();
        assert_eq!(latency, mode.fir_len_mult() - 1);

        let input = sine(1000.0, 0.5, 2048);
        let output: Vec<f32> = input
            .iter()
            .map(|&v| os.process_sample(Stereo::splat(v)).l)
            .collect();

        for i in 400..input.len() {
            let err = (output[i] - input[i - latency]).abs();
            assert!(err < 0.02, "{mode}: sample {i} error {err}");
        }
    }
}

#[test]
fn test_oversampler_around_chain() {
    let chain = Scale(0.5).chain(Scale(2.0));
    let mut os = Oversampler::new(chain);
    os.set_mode(OversamplingMode::Fir2xHq, SAMPLE_RATE);

    let mut y = Stereo::ZERO;
    for _ in 0..1000 {
        y = os.process_sample(Stereo::splat(0.25));
    }
    assert!((y.l - 0.25).abs() < 0.01);
    assert!((y.r - 0.25).abs() < 0.01);
}

#[test]
fn test_soft_clip_inside_oversampler_stays_bounded() {
    let mut os = Oversampler::new(Clipper(SoftClip5::new()));
    os.set_mode(OversamplingMode::Fir4xLq, SAMPLE_RATE);

    for &v in &sine(5000.0, 4.0, 4096) {
        let y = os.process_sample(Stereo::splat(v));
        assert!(y.l.is_finite());
        // FIR ringing may overshoot the clipper ceiling slightly
        assert!(y.l.abs() < 1.5, "overshoot {}", y.l);
    }
}

#[test]
fn test_side_chain_filters_shape_detector() {
    // A 20 Hz high-pass removes DC from the detector path
    let mut hpf = StereoBiquad::new();
    hpf.update(&BiquadSettings::new(BiquadShape::Hpf, 20.0), SAMPLE_RATE);

    let coeffs = calc_coeffs(
        SAMPLE_RATE,
        &ScSettings {
            thresh_db: -30.0,
            ratio: 10.0,
            knee_db: 0.0,
            ..ScSettings::default()
        },
    );
    let mut state = ScState::new();
    let mut gain = 0.0;
    for _ in 0..SAMPLE_RATE as usize {
        let sc = hpf.process(Stereo::splat(0.5));
        gain = side_chain_db(&coeffs, &mut state, sc.l);
    }
    assert!(gain > 0.99, "DC leaked into detector: {gain}");
}
