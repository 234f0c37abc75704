//! Stereo compressor with side-chain EQ, feedback detection and listen mode.
//!
//! Each channel runs its own side-chain gain computer. The detector sees
//! either the input (feed-forward) or the previous compressed output
//! (feedback), shaped by a high-pass and a boost bell first.
//!
//! # Signal Flow
//!
//! ```text
//!              ┌──────────────── fb_state ◄──────────────┐
//!              ▼                                          │
//! Input ─┬─► [FF/FB] → SC HPF → SC Boost → Side-chain ─► × gr ─► SoftClip5(·makeup) ─► Mix ─► Output
//!        │                         │                                                    ▲
//!        │                         └──► (listen)                                        │
//!        └──────────────────────────────────── dry ─────────────────────────────────────┘
//! ```
//!
//! # Parameters
//!
//! | Parameter | Range | Description |
//! |-----------|-------|-------------|
//! | Threshold | -60 to 0 dB | Level where compression begins |
//! | Ratio | 1:1 to 20:1 | Compression strength, 2:1 at half travel |
//! | Attack | 0.01-50 ms | How fast gain reduction engages |
//! | Release | 10-1000 ms | How fast gain reduction releases |
//! | Makeup | 0-24 dB | Gain into the output soft clipper |
//!
//! The secondary row holds knee, RMS window, mix and the side-chain EQ.
//! Toggles switch RMS sensing, feedback topology, the linear-domain curve,
//! stereo link, side-chain listen and bypass.
//!
//! # Tips
//!
//! - **Link** applies the deeper of the two channel reductions to both,
//!   keeping the stereo image still under uneven material
//! - **SC_HPF** stops bass from driving the detector
//! - **Feedback** gives the softer, program-dependent response of
//!   classic opto and vari-mu designs

use dynamo_core::sidechain::{ScCoeffs, ScSettings, ScState, SideChainCurve, calc_coeffs, side_chain};
use dynamo_core::{
    BiquadSettings, BiquadShape, DiagnosticChannel, MeterSpec, Metered, NonFiniteTag,
    ParamDescriptor, ParamId, ParamUnit, ParameterInfo, PeakMeters, SoftClip5, Stereo,
    StereoBiquad, StereoProcessor, db_to_linear, wet_dry_mix,
};

/// Meter layout: input peak, output peak, gain reduction (inverted).
const METERS: [MeterSpec; 3] = [
    MeterSpec::peak("IN"),
    MeterSpec::peak("OUT").with_scale(),
    MeterSpec::inverted("GR"),
];

/// Meter index of the input meter.
pub const METER_IN: usize = 0;
/// Meter index of the output meter.
pub const METER_OUT: usize = 1;
/// Meter index of the gain-reduction meter.
pub const METER_GR: usize = 2;

const PARAM_COUNT: usize = 16;

#[inline]
fn flag(v: f32) -> bool {
    v >= 0.5
}

#[inline]
fn from_flag(b: bool) -> f32 {
    if b { 1.0 } else { 0.0 }
}

/// Stereo dynamics compressor.
///
/// ## Parameter Indices (`ParameterInfo`)
///
/// | Index | Name | Range | Default |
/// |-------|------|-------|---------|
/// | 0 | Threshold | -60.0–0.0 dB | 0.0 |
/// | 1 | Ratio | 1.0–20.0 (mid 2.0) | 2.0 |
/// | 2 | Attack | 0.01–50.0 ms | 1.0 |
/// | 3 | Release | 10.0–1000.0 ms | 100.0 |
/// | 4 | Makeup | 0.0–24.0 dB | 0.0 |
/// | 5 | Knee | 0.0–24.0 dB | 12.0 |
/// | 6 | RMS_time | 1.0–80.0 ms | 80.0 |
/// | 7 | Mix | 0–100 % | 100 |
/// | 8 | SC_HPF | 20–2000 Hz (mid 200) | 20 |
/// | 9 | SC_Boost | 0.0–24.0 dB | 0.0 |
/// | 10 | RMS | toggle | off |
/// | 11 | Feedback | toggle | off |
/// | 12 | Linear | toggle | off |
/// | 13 | Link | toggle | off |
/// | 14 | SC_Listen | toggle | off |
/// | 15 | Bypass | toggle | off |
///
/// # Example
///
/// ```rust
/// use dynamo_core::{ParameterInfo, Stereo, StereoProcessor};
/// use dynamo_effects::Compressor;
///
/// let mut comp = Compressor::new(48000.0);
/// comp.set_param(0, -20.0); // threshold
/// comp.set_param(1, 4.0); // ratio
///
/// let mut y = Stereo::ZERO;
/// for _ in 0..4800 {
///     y = comp.process_sample(Stereo::splat(0.5));
/// }
/// assert!(y.l < 0.5);
/// ```
#[derive(Debug, Clone)]
pub struct Compressor {
    sample_rate: f32,

    // Plain parameter values
    sc_settings: ScSettings,
    makeup_db: f32,
    mix_percent: f32,
    bypass: bool,
    linear: bool,
    feedback: bool,
    listen: bool,
    link: bool,
    sc_hpf: BiquadSettings,
    sc_boost: BiquadSettings,

    // Derived coefficients
    sc_coeffs: ScCoeffs,
    makeup_lin: f32,
    mix_lin: f32,

    // State
    sc_state: [ScState; 2],
    hpf: StereoBiquad,
    boost: StereoBiquad,
    fb_state: Stereo<f32>,
    clipper: SoftClip5,
    meters: PeakMeters<3>,
    diagnostics: DiagnosticChannel,
}

impl Compressor {
    /// Create a compressor at default settings, reset to `sample_rate`.
    pub fn new(sample_rate: f32) -> Self {
        let mut comp = Self {
            sample_rate,
            sc_settings: ScSettings::default(),
            makeup_db: 0.0,
            mix_percent: 100.0,
            bypass: false,
            linear: false,
            feedback: false,
            listen: false,
            link: false,
            sc_hpf: BiquadSettings::new(BiquadShape::Hpf, 20.0),
            sc_boost: BiquadSettings::new(BiquadShape::Bell, 3000.0),
            sc_coeffs: ScCoeffs::default(),
            makeup_lin: 1.0,
            mix_lin: 1.0,
            sc_state: [ScState::new(), ScState::new()],
            hpf: StereoBiquad::new(),
            boost: StereoBiquad::new(),
            fb_state: Stereo::ZERO,
            clipper: SoftClip5::new(),
            meters: PeakMeters::new(METERS),
            diagnostics: DiagnosticChannel::new(),
        };
        comp.reset(sample_rate);
        comp
    }

    /// Side-chain settings currently in effect.
    pub fn sc_settings(&self) -> &ScSettings {
        &self.sc_settings
    }

    /// Side-chain coefficients derived at the last update.
    pub fn sc_coeffs(&self) -> &ScCoeffs {
        &self.sc_coeffs
    }

    /// Gain curve selected by the Linear toggle.
    pub fn curve(&self) -> SideChainCurve {
        if self.linear {
            SideChainCurve::Linear
        } else {
            SideChainCurve::Decibel
        }
    }

    /// Sample rate the coefficients were derived for.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Non-finite diagnostics for this unit.
    pub fn diagnostics_mut(&mut self) -> &mut DiagnosticChannel {
        &mut self.diagnostics
    }

    /// Set threshold in dB.
    pub fn set_threshold_db(&mut self, threshold_db: f32) {
        self.set_param(0, threshold_db);
    }

    /// Set compression ratio.
    pub fn set_ratio(&mut self, ratio: f32) {
        self.set_param(1, ratio);
    }

    /// Set attack time in milliseconds.
    pub fn set_attack_ms(&mut self, attack_ms: f32) {
        self.set_param(2, attack_ms);
    }

    /// Set release time in milliseconds.
    pub fn set_release_ms(&mut self, release_ms: f32) {
        self.set_param(3, release_ms);
    }

    /// Set makeup gain in dB.
    pub fn set_makeup_db(&mut self, makeup_db: f32) {
        self.set_param(4, makeup_db);
    }

    /// Set knee width in dB.
    pub fn set_knee_db(&mut self, knee_db: f32) {
        self.set_param(5, knee_db);
    }

    #[inline]
    fn detect(&mut self, x_sc: Stereo<f32>) -> Stereo<f32> {
        let curve = self.curve();
        let [left, right] = &mut self.sc_state;
        Stereo::new(
            side_chain(curve, &self.sc_coeffs, left, x_sc.l),
            side_chain(curve, &self.sc_coeffs, right, x_sc.r),
        )
    }
}

impl Default for Compressor {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

impl StereoProcessor for Compressor {
    #[inline]
    fn process_sample(&mut self, x: Stereo<f32>) -> Stereo<f32> {
        self.meters.update(METER_IN, x);
        if self.bypass {
            self.meters.update(METER_OUT, x);
            return x;
        }

        self.diagnostics.check(NonFiniteTag::InputLeft, x.l);
        self.diagnostics.check(NonFiniteTag::InputRight, x.r);
        self.diagnostics
            .check_stereo(NonFiniteTag::FeedbackState, self.fb_state);
        let x = x.sanitize(0.0);
        self.fb_state = self.fb_state.sanitize(0.0);

        let detector = if self.feedback { self.fb_state } else { x };
        let x_sc = self.boost.process(self.hpf.process(detector));

        let mut gr = self.detect(x_sc);
        if self.link {
            gr = Stereo::splat(gr.abs_min());
        }
        self.meters.update(METER_GR, gr);
        self.diagnostics.check_stereo(NonFiniteTag::GainReduction, gr);
        let gr = gr.sanitize(1.0);

        let y_comp = x * gr;
        self.fb_state = y_comp;
        let wet = self.clipper.process_stereo(y_comp * self.makeup_lin);
        let y = Stereo::new(
            wet_dry_mix(x.l, wet.l, self.mix_lin),
            wet_dry_mix(x.r, wet.r, self.mix_lin),
        );
        self.meters.update(METER_OUT, y);

        if self.listen { x_sc } else { y }
    }

    fn update_coeffs(&mut self) {
        self.hpf.update(&self.sc_hpf, self.sample_rate);
        self.boost.update(&self.sc_boost, self.sample_rate);
        self.sc_coeffs = calc_coeffs(self.sample_rate, &self.sc_settings);
        self.makeup_lin = db_to_linear(self.makeup_db);
        self.mix_lin = self.mix_percent / 100.0;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            sample_rate = self.sample_rate,
            thresh_db = self.sc_settings.thresh_db,
            ratio = self.sc_settings.ratio,
            alpha_att = self.sc_coeffs.alpha_att,
            alpha_rel = self.sc_coeffs.alpha_rel,
            n_rms = self.sc_coeffs.n_rms,
            "compressor coefficients updated"
        );
    }

    fn reset(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.meters.reset();
        self.fb_state = Stereo::ZERO;
        for state in &mut self.sc_state {
            state.reset();
        }
        self.hpf.clear();
        self.boost.clear();
        self.update_coeffs();
    }
}

impl Metered for Compressor {
    fn meter_count(&self) -> usize {
        METERS.len()
    }

    fn meter_spec(&self, idx: usize) -> Option<MeterSpec> {
        METERS.get(idx).copied()
    }

    fn get_and_reset_peak_level(&mut self, idx: usize) -> Stereo<f32> {
        if let Some(held) = self.meters.peek(idx) {
            self.diagnostics.check_stereo(NonFiniteTag::Meter, held);
        }
        self.meters.get_and_reset(idx)
    }
}

impl ParameterInfo for Compressor {
    fn param_count(&self) -> usize {
        PARAM_COUNT
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        match index {
            0 => Some(
                ParamDescriptor::gain_db("Threshold", "Thresh", -60.0, 0.0, 0.0)
                    .with_id(ParamId(100), "comp_thresh"),
            ),
            1 => Some(
                ParamDescriptor::knob("Ratio", "Ratio", ParamUnit::Ratio, 1.0, 20.0, 2.0)
                    .with_mid_point(2.0)
                    .with_step(0.1)
                    .with_id(ParamId(101), "comp_ratio"),
            ),
            2 => Some(
                ParamDescriptor::time_ms("Attack", "Attack", 0.01, 50.0, 1.0)
                    .with_step(0.01)
                    .with_id(ParamId(102), "comp_attack"),
            ),
            3 => Some(
                ParamDescriptor::time_ms("Release", "Release", 10.0, 1000.0, 100.0)
                    .with_id(ParamId(103), "comp_release"),
            ),
            4 => Some(
                ParamDescriptor::gain_db("Makeup", "Makeup", 0.0, 24.0, 0.0)
                    .with_id(ParamId(104), "comp_makeup"),
            ),
            5 => Some(
                ParamDescriptor::gain_db("Knee", "Knee", 0.0, 24.0, 12.0)
                    .secondary()
                    .with_id(ParamId(105), "comp_knee"),
            ),
            6 => Some(
                ParamDescriptor::time_ms("RMS_time", "RMS t", 1.0, 80.0, 80.0)
                    .secondary()
                    .with_active(self.sc_settings.rms_enable)
                    .with_id(ParamId(106), "comp_rms_time"),
            ),
            7 => Some(
                ParamDescriptor::mix()
                    .secondary()
                    .with_id(ParamId(107), "comp_mix"),
            ),
            8 => Some(
                ParamDescriptor::frequency_hz("SC_HPF", "SC HPF", 20.0, 2000.0, 20.0)
                    .with_mid_point(200.0)
                    .secondary()
                    .with_id(ParamId(108), "comp_sc_hpf"),
            ),
            9 => Some(
                ParamDescriptor::gain_db("SC_Boost", "SC Boost", 0.0, 24.0, 0.0)
                    .secondary()
                    .with_id(ParamId(109), "comp_sc_boost"),
            ),
            10 => Some(ParamDescriptor::toggle("RMS", "RMS", false).with_id(ParamId(110), "comp_rms")),
            11 => Some(
                ParamDescriptor::toggle("Feedback", "FB", false)
                    .with_id(ParamId(111), "comp_feedback"),
            ),
            12 => Some(
                ParamDescriptor::toggle("Linear", "Lin", false).with_id(ParamId(112), "comp_linear"),
            ),
            13 => Some(ParamDescriptor::toggle("Link", "Link", false).with_id(ParamId(113), "comp_link")),
            14 => Some(
                ParamDescriptor::toggle("SC_Listen", "Listen", false)
                    .with_id(ParamId(114), "comp_sc_listen"),
            ),
            15 => Some(
                ParamDescriptor::toggle("Bypass", "Bypass", false)
                    .with_id(ParamId(115), "comp_bypass"),
            ),
            _ => None,
        }
    }

    fn get_param(&self, index: usize) -> f32 {
        match index {
            0 => self.sc_settings.thresh_db,
            1 => self.sc_settings.ratio,
            2 => self.sc_settings.t_att_ms,
            3 => self.sc_settings.t_rel_ms,
            4 => self.makeup_db,
            5 => self.sc_settings.knee_db,
            6 => self.sc_settings.t_rms_ms,
            7 => self.mix_percent,
            8 => self.sc_hpf.fc,
            9 => self.sc_boost.gain_db,
            10 => from_flag(self.sc_settings.rms_enable),
            11 => from_flag(self.feedback),
            12 => from_flag(self.linear),
            13 => from_flag(self.link),
            14 => from_flag(self.listen),
            15 => from_flag(self.bypass),
            _ => 0.0,
        }
    }

    fn set_param(&mut self, index: usize, value: f32) {
        let Some(desc) = self.param_info(index) else {
            return;
        };
        let v = desc.quantize(value);
        match index {
            0 => self.sc_settings.thresh_db = v,
            1 => self.sc_settings.ratio = v,
            2 => self.sc_settings.t_att_ms = v,
            3 => self.sc_settings.t_rel_ms = v,
            4 => self.makeup_db = v,
            5 => self.sc_settings.knee_db = v,
            6 => self.sc_settings.t_rms_ms = v,
            7 => self.mix_percent = v,
            8 => self.sc_hpf.fc = v,
            9 => self.sc_boost.gain_db = v,
            10 => self.sc_settings.rms_enable = flag(v),
            11 => self.feedback = flag(v),
            12 => self.linear = flag(v),
            13 => self.link = flag(v),
            14 => self.listen = flag(v),
            15 => self.bypass = flag(v),
            _ => return,
        }
        self.update_coeffs();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dynamo_core::linear_to_db;

    const SAMPLE_RATE: f32 = 48000.0;

    fn settle(comp: &mut Compressor, x: Stereo<f32>, n: usize) -> Stereo<f32> {
        let mut y = Stereo::ZERO;
        for _ in 0..n {
            y = comp.process_sample(x);
        }
        y
    }

    /// Drives an alternating-sign signal, which the 20 Hz side-chain
    /// high-pass passes at unity, and returns the last output magnitude.
    fn settle_nyquist(comp: &mut Compressor, amp: Stereo<f32>, n: usize) -> Stereo<f32> {
        let mut y = Stereo::ZERO;
        for i in 0..n {
            let sign = if i % 2 == 0 { 1.0 } else { -1.0 };
            y = comp.process_sample(amp * sign);
        }
        y.map(f32::abs)
    }

    fn reference() -> Compressor {
        let mut comp = Compressor::new(SAMPLE_RATE);
        comp.set_threshold_db(-12.0);
        comp.set_ratio(4.0);
        comp.set_knee_db(0.0);
        comp.set_attack_ms(1.0);
        comp.set_release_ms(50.0);
        comp
    }

    #[test]
    fn test_defaults_match_table() {
        let comp = Compressor::new(SAMPLE_RATE);
        for i in 0..comp.param_count() {
            let desc = comp.param_info(i).unwrap();
            assert_eq!(comp.get_param(i), desc.default, "param {}", desc.name);
        }
    }

    #[test]
    fn test_reference_gain_reduction() {
        let mut comp = reference();
        let x = Stereo::splat(db_to_linear(-6.0));
        settle_nyquist(&mut comp, x, 4800);

        comp.get_and_reset_peak_level(METER_GR);
        settle_nyquist(&mut comp, x, 16);
        let gr = comp.get_and_reset_peak_level(METER_GR);
        assert!((gr.l - 0.596).abs() < 1e-3, "gr = {gr:?}");
        assert!((linear_to_db(gr.r) + 4.5).abs() < 0.01);
    }

    #[test]
    fn test_output_goes_through_soft_clipper() {
        let mut comp = reference();
        let x = Stereo::splat(db_to_linear(-6.0));
        let y = settle_nyquist(&mut comp, x, 4800);
        let expected = SoftClip5::new().process(x.l * 0.5957);
        assert!((y.l - expected).abs() < 1e-3);
    }

    #[test]
    fn test_transparent_below_threshold_at_zero_knee() {
        let mut comp = Compressor::new(SAMPLE_RATE);
        comp.set_threshold_db(-6.0);
        comp.set_knee_db(0.0);
        let x = Stereo::new(0.05, -0.05);
        let y = settle(&mut comp, x, 1000);
        // Only the soft clipper's near-unity slope remains
        assert!((y.l - SoftClip5::new().process(0.05)).abs() < 1e-6);
        assert!((y.r + SoftClip5::new().process(0.05)).abs() < 1e-6);
    }

    #[test]
    fn test_bypass_is_identity() {
        let mut comp = reference();
        comp.set_param(15, 1.0);
        let x = Stereo::new(0.9, -0.3);
        assert_eq!(comp.process_sample(x), x);
        assert_eq!(comp.get_and_reset_peak_level(METER_IN), x);
        assert_eq!(comp.get_and_reset_peak_level(METER_OUT), x);
    }

    #[test]
    fn test_mix_zero_is_dry() {
        let mut comp = reference();
        comp.set_param(7, 0.0);
        let x = Stereo::new(0.8, 0.4);
        let y = settle(&mut comp, x, 2000);
        assert_eq!(y, x);
    }

    #[test]
    fn test_half_mix_blends_dry_and_wet() {
        let x = Stereo::new(0.8, 0.4);
        let mut wet = reference();
        let y_wet = settle(&mut wet, x, 2000);
        let mut half = reference();
        half.set_param(7, 50.0);
        let y_half = settle(&mut half, x, 2000);
        assert!((y_half.l - 0.5 * (x.l + y_wet.l)).abs() < 1e-5);
        assert!((y_half.r - 0.5 * (x.r + y_wet.r)).abs() < 1e-5);
    }

    #[test]
    fn test_link_applies_deeper_reduction_to_both() {
        let mut comp = reference();
        comp.set_param(13, 1.0);
        let x = Stereo::new(0.9, 0.05);
        let y = settle_nyquist(&mut comp, x, 4800);
        let gr = comp.get_and_reset_peak_level(METER_GR);
        assert_eq!(gr.l, gr.r);
        // Quiet right channel is pulled down by the loud left one
        assert!(y.r < SoftClip5::new().process(0.05) * 0.9);
    }

    #[test]
    fn test_unlinked_channels_independent() {
        let mut comp = reference();
        let x = Stereo::new(0.9, 0.05);
        settle_nyquist(&mut comp, x, 4800);
        let gr = comp.get_and_reset_peak_level(METER_GR);
        assert!(gr.l < 0.9);
        assert!((gr.r - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_listen_outputs_side_chain() {
        let mut comp = reference();
        comp.set_param(14, 1.0);
        let x = Stereo::splat(0.5);
        let y = comp.process_sample(x);
        // 20 Hz high-pass passes the first sample of a step almost unchanged
        assert!((y.l - 0.5).abs() < 0.01);
        let y = settle(&mut comp, x, 48000);
        assert!(y.l.abs() < 1e-3, "DC should be removed: {y:?}");
    }

    #[test]
    fn test_linear_curve_reduces() {
        let mut comp = reference();
        comp.set_param(12, 1.0);
        assert_eq!(comp.curve(), SideChainCurve::Linear);
        let y = settle_nyquist(&mut comp, Stereo::splat(0.8), 4800);
        assert!(y.l < SoftClip5::new().process(0.8));
    }

    #[test]
    fn test_feedback_reduces_less_than_feed_forward() {
        let mut ff = reference();
        let mut fb = reference();
        fb.set_param(11, 1.0);
        let x = Stereo::splat(0.9);
        let y_ff = settle_nyquist(&mut ff, x, 9600);
        let y_fb = settle_nyquist(&mut fb, x, 9600);
        assert!(y_fb.l < 0.9);
        assert!(y_fb.l > y_ff.l, "ff {} fb {}", y_ff.l, y_fb.l);
    }

    #[test]
    fn test_rms_toggle_activates_rms_time() {
        let mut comp = Compressor::new(SAMPLE_RATE);
        assert!(!comp.param_info(6).unwrap().is_active());
        comp.set_param(10, 1.0);
        assert!(comp.param_info(6).unwrap().is_active());
        assert!(comp.sc_coeffs().rms_enable);
    }

    #[test]
    fn test_set_param_clamps_and_updates() {
        let mut comp = Compressor::new(SAMPLE_RATE);
        comp.set_param(1, 100.0);
        assert_eq!(comp.get_param(1), 20.0);
        assert_eq!(comp.sc_coeffs().ratio, 20.0);
        comp.set_param(4, 12.0);
        assert!((comp.makeup_lin - db_to_linear(12.0)).abs() < 1e-6);
        comp.set_param(8, 1.0);
        assert_eq!(comp.get_param(8), 20.0);
    }

    #[test]
    fn test_find_param_by_name() {
        let comp = Compressor::new(SAMPLE_RATE);
        assert_eq!(comp.find_param_by_name("threshold"), Some(0));
        assert_eq!(comp.find_param_by_name("sc_listen"), Some(14));
        assert_eq!(comp.find_param_by_name("comp_makeup"), Some(4));
        assert_eq!(comp.find_param_by_name("nope"), None);
    }

    #[test]
    fn test_nan_input_heals() {
        let mut comp = reference();
        comp.diagnostics_mut().set_enabled(true);
        settle(&mut comp, Stereo::splat(0.5), 100);
        let y = comp.process_sample(Stereo::new(f32::NAN, 0.5));
        assert!(y.l.is_finite() && y.r.is_finite());
        assert_eq!(comp.diagnostics_mut().take(), Some(NonFiniteTag::InputLeft));

        let y1 = comp.process_sample(Stereo::splat(0.5));
        let y2 = comp.process_sample(Stereo::splat(0.5));
        assert!(y1.l.is_finite() && y2.l.is_finite());
        assert_eq!(comp.diagnostics_mut().take(), None);
    }

    #[test]
    fn test_nan_feedback_state_heals() {
        let mut comp = reference();
        comp.set_param(11, 1.0);
        assert!(comp.feedback);
        comp.diagnostics_mut().set_enabled(true);
        settle(&mut comp, Stereo::splat(0.5), 100);

        comp.fb_state = Stereo::splat(f32::NAN);
        let y0 = comp.process_sample(Stereo::splat(0.5));
        let y1 = comp.process_sample(Stereo::splat(0.5));
        assert!(y0.l.is_finite() && y0.r.is_finite());
        assert!(y1.l.is_finite() && y1.r.is_finite());
        assert!(comp.fb_state.l.is_finite() && comp.fb_state.r.is_finite());
        assert_eq!(comp.diagnostics_mut().take(), Some(NonFiniteTag::FeedbackState));
    }

    #[test]
    fn test_reset_restores_meters_and_state() {
        let mut comp = reference();
        settle(&mut comp, Stereo::splat(0.9), 1000);
        comp.reset(96000.0);
        assert_eq!(comp.sample_rate(), 96000.0);
        assert_eq!(comp.get_and_reset_peak_level(METER_IN), Stereo::ZERO);
        assert_eq!(comp.get_and_reset_peak_level(METER_GR), Stereo::ONE);
        assert_eq!(comp.fb_state, Stereo::ZERO);
    }

    #[test]
    fn test_meter_specs() {
        let comp = Compressor::new(SAMPLE_RATE);
        assert_eq!(comp.meter_count(), 3);
        assert_eq!(comp.meter_spec(METER_IN).unwrap().label, "IN");
        assert!(comp.meter_spec(METER_OUT).unwrap().has_scale);
        assert!(comp.meter_spec(METER_GR).unwrap().inverted);
        assert!(comp.meter_spec(3).is_none());
    }
}
