//! Tape echo with wow, drive, filtered feedback and tempo sync.
//!
//! A long circular buffer stands in for the tape loop. The read heads are
//! modulated by a triangle LFO (wow), the repeats pass through a
//! third-order soft clipper (tape drive) and a high-pass/low-pass pair, and
//! the filtered signal feeds back into the write head. Delay-time changes
//! glide one sample at a time, pitching the repeats like a motor slowing
//! down or speeding up.
//!
//! # Signal Flow
//!
//! ```text
//! Input ─┬─► (+) ─► Tape ─► Read L/R (LFO) ─► SoftClip3(drive) ─► HPF ─► LPF ─┬─► Mix ─► SoftClip5 ─► Output
//!        │    ▲                                                              │    ▲
//!        │    └────────────────────────── × feedback ◄───────────────────────┘    │
//!        └──────────────────────────────────── dry ───────────────────────────────┘
//! ```
//!
//! The right read head runs at a phase offset from the left one and can be
//! pushed further back by the Offset parameter.

use core::cmp::Ordering;

use dynamo_core::delay::{MAX_DELAY_SECONDS, MAX_OVERSAMPLING, MAX_SAMPLE_RATE};
use dynamo_core::{
    BiquadSettings, BiquadShape, DiagnosticChannel, MeterSpec, Metered, ModOscillator,
    NonFiniteTag, ParamDescriptor, ParamId, ParamScale, ParamUnit, ParameterInfo, PeakMeters,
    SoftClip3, SoftClip5, Stereo, StereoBiquad, StereoDelayLine, StereoProcessor, Subdivision,
    db_to_linear, ms_to_samples, wet_dry_mix,
};
use libm::{ceilf, roundf};

const METERS: [MeterSpec; 2] = [MeterSpec::peak("IN"), MeterSpec::peak("OUT").with_scale()];

/// Meter index of the input meter.
pub const METER_IN: usize = 0;
/// Meter index of the output meter.
pub const METER_OUT: usize = 1;

/// Shortest delay time in seconds.
pub const MIN_TIME_SECONDS: f32 = 0.02;

/// Longest right-channel offset in milliseconds.
pub const MAX_OFFSET_MS: f32 = 50.0;

/// Largest modulation depth as a fraction of the delay time.
const MAX_MOD_DEPTH: f32 = 0.1;

/// Default glide step interval in samples.
pub const DEFAULT_GLIDE_INTERVAL: usize = 4;

const PARAM_COUNT: usize = 14;

const SUBDIVISION_LABELS: &[&str] = &[
    "half",
    "fourth",
    "eighth_dot",
    "eighth",
    "sixteenth_dot",
    "sixteenth",
];

/// Stereo tape echo.
///
/// ## Parameter Indices (`ParameterInfo`)
///
/// | Index | Name | Range | Default |
/// |-------|------|-------|---------|
/// | 0 | Time | 0.02–2.0 s | 0.5 |
/// | 1 | Feedback | 0.0–2.0 x | 0.2 |
/// | 2 | HPF | 20–2000 Hz (log) | 20 |
/// | 3 | LPF | 200–20000 Hz (log) | 20000 |
/// | 4 | Drive | -20.0–20.0 dB | 0.0 |
/// | 5 | Q_HP | 0.5–2.0 (log) | 0.707 |
/// | 6 | Q_LP | 0.5–2.0 (log) | 0.707 |
/// | 7 | Mod_Frequency | 0.1–10 Hz (log) | 1.0 |
/// | 8 | Mod_Depth | 0.1–10 % (log) | 0.1 |
/// | 9 | Mod_Phase | 0–180 deg | 0 |
/// | 10 | Offset | 0–50 ms | 0 |
/// | 11 | Dry_Mix | 0–100 % | 100 |
/// | 12 | Subdivision | half … sixteenth | fourth |
/// | 13 | Sync | toggle | off |
///
/// `Dry_Mix` weights the echo path against the input: at 100 % only the
/// repeats reach the output.
///
/// With Sync on and a host tempo known, Time follows the tempo and its
/// descriptor is reported inactive.
///
/// # Example
///
/// ```rust
/// use dynamo_core::{ParameterInfo, Stereo, StereoProcessor};
/// use dynamo_effects::TapeEcho;
///
/// let mut echo = TapeEcho::with_max_sample_rate(48000.0, 48000.0);
/// echo.set_param(13, 1.0); // sync
/// echo.set_param(12, 2.0); // dotted eighth
/// echo.set_tempo(120.0);
/// assert!((echo.time_seconds() - 0.375).abs() < 1e-6);
///
/// let y = echo.process_sample(Stereo::splat(0.5));
/// assert!(y.l.is_finite());
/// ```
#[derive(Debug, Clone)]
pub struct TapeEcho {
    sample_rate: f32,
    tempo: f32,

    // Plain parameter values
    time_s: f32,
    feedback: f32,
    hpf_settings: BiquadSettings,
    lpf_settings: BiquadSettings,
    drive_db: f32,
    mod_freq_hz: f32,
    mod_depth_percent: f32,
    mod_phase_deg: f32,
    offset_ms: f32,
    mix_percent: f32,
    subdivision: Subdivision,
    sync: bool,
    n_glide: usize,

    // Derived coefficients
    a_clip: f32,
    mix_lin: f32,
    mod_depth: f32,
    n_offset: usize,
    n_target: usize,
    max_delay_samples: usize,
    max_offset_samples: usize,

    // State
    delay_line: StereoDelayLine,
    n_glided: usize,
    glide_count: usize,
    lfo: ModOscillator,
    hpf: StereoBiquad,
    lpf: StereoBiquad,
    fb_state: Stereo<f32>,
    drive_clip: SoftClip3,
    out_clip: SoftClip5,
    meters: PeakMeters<2>,
    diagnostics: DiagnosticChannel,
}

impl TapeEcho {
    /// Create a tape echo sized for any supported rate, including 8x
    /// oversampling at 192 kHz.
    pub fn new(sample_rate: f32) -> Self {
        Self::with_max_sample_rate(sample_rate, MAX_SAMPLE_RATE * MAX_OVERSAMPLING as f32)
    }

    /// Create a tape echo whose tape only needs to cover `max_sample_rate`.
    ///
    /// The buffer holds two seconds at that rate plus room for the deepest
    /// modulation and the longest offset. Running faster than
    /// `max_sample_rate` later shortens the reachable delay time.
    pub fn with_max_sample_rate(sample_rate: f32, max_sample_rate: f32) -> Self {
        let max_rate = max_sample_rate.max(sample_rate);
        let max_delay_samples = ceilf(max_rate * MAX_DELAY_SECONDS) as usize;
        let max_offset_samples = ceilf(ms_to_samples(MAX_OFFSET_MS, max_rate)) as usize;
        let mod_headroom = ceilf(max_delay_samples as f32 * MAX_MOD_DEPTH) as usize + 1;
        let capacity = StereoDelayLine::capacity_for(
            max_rate,
            MAX_DELAY_SECONDS,
            mod_headroom + max_offset_samples,
        );

        let mut hpf_settings = BiquadSettings::new(BiquadShape::Hpf, 20.0);
        hpf_settings.q = 0.707;
        let mut lpf_settings = BiquadSettings::new(BiquadShape::Lpf, 20000.0);
        lpf_settings.q = 0.707;

        let mut echo = Self {
            sample_rate,
            tempo: 0.0,
            time_s: 0.5,
            feedback: 0.2,
            hpf_settings,
            lpf_settings,
            drive_db: 0.0,
            mod_freq_hz: 1.0,
            mod_depth_percent: 0.1,
            mod_phase_deg: 0.0,
            offset_ms: 0.0,
            mix_percent: 100.0,
            subdivision: Subdivision::Fourth,
            sync: false,
            n_glide: DEFAULT_GLIDE_INTERVAL,
            a_clip: 1.0,
            mix_lin: 1.0,
            mod_depth: 0.001,
            n_offset: 0,
            n_target: 0,
            max_delay_samples,
            max_offset_samples,
            delay_line: StereoDelayLine::new(capacity),
            n_glided: 0,
            glide_count: 0,
            lfo: ModOscillator::new(),
            hpf: StereoBiquad::new(),
            lpf: StereoBiquad::new(),
            fb_state: Stereo::ZERO,
            drive_clip: SoftClip3::new(),
            out_clip: SoftClip5::new(),
            meters: PeakMeters::new(METERS),
            diagnostics: DiagnosticChannel::new(),
        };
        echo.reset(sample_rate);
        echo
    }

    /// Delay time in effect, in seconds (follows the tempo when synced).
    pub fn time_seconds(&self) -> f32 {
        self.time_s
    }

    /// Delay the read heads are gliding towards, in samples.
    pub fn target_delay_samples(&self) -> usize {
        self.n_target
    }

    /// Delay the read heads are currently at, in samples.
    pub fn glided_delay_samples(&self) -> usize {
        self.n_glided
    }

    /// Last tempo received from the host (0 when unknown).
    pub fn tempo(&self) -> f32 {
        self.tempo
    }

    /// Whether Time is currently driven by the tempo.
    pub fn is_time_locked(&self) -> bool {
        self.sync && self.tempo > 0.0
    }

    /// Samples between one-sample glide steps. Zero jumps straight to the
    /// target.
    pub fn set_glide_interval(&mut self, n_glide: usize) {
        self.n_glide = n_glide;
        self.glide_count = n_glide;
    }

    /// Non-finite diagnostics for this unit.
    pub fn diagnostics_mut(&mut self) -> &mut DiagnosticChannel {
        &mut self.diagnostics
    }

    /// Tape length in samples.
    pub fn capacity(&self) -> usize {
        self.delay_line.capacity()
    }

    /// Sync handling: pins Time to the subdivision when a tempo is known,
    /// then derives the target delay.
    fn apply_tempo(&mut self) {
        if self.sync
            && let Some(t) = self.subdivision.seconds(self.tempo)
        {
            self.time_s = t.clamp(MIN_TIME_SECONDS, MAX_DELAY_SECONDS);
        }
        let n = roundf(self.time_s * self.sample_rate).max(0.0) as usize;
        self.n_target = n.min(self.max_delay_samples);
    }

    /// Moves the read heads one sample towards the target every `n_glide` calls.
    #[inline]
    fn glide(&mut self) {
        if self.n_glide == 0 {
            self.n_glided = self.n_target;
            return;
        }
        self.glide_count = self.glide_count.saturating_sub(1);
        if self.glide_count == 0 {
            match self.n_target.cmp(&self.n_glided) {
                Ordering::Greater => self.n_glided += 1,
                Ordering::Less => self.n_glided -= 1,
                Ordering::Equal => {}
            }
            self.glide_count = self.n_glide;
        }
    }

    /// Read offset for one head: the glided delay swung by `depth` of itself.
    #[inline]
    fn head_offset(&self, lfo: f32, extra: usize) -> usize {
        let n = self.n_glided as f32;
        let swing = roundf(lfo * n * self.mod_depth);
        let d = (swing + n).max(0.0) as usize + extra;
        d.min(self.delay_line.max_delay())
    }
}

impl StereoProcessor for TapeEcho {
    #[inline]
    fn process_sample(&mut self, x: Stereo<f32>) -> Stereo<f32> {
        self.diagnostics.check(NonFiniteTag::InputLeft, x.l);
        self.diagnostics.check(NonFiniteTag::InputRight, x.r);
        self.diagnostics
            .check_stereo(NonFiniteTag::FeedbackState, self.fb_state);
        let x = x.sanitize(0.0);
        let fb_state = self.fb_state.sanitize(0.0);

        let (mod_l, mod_r) = self.lfo.next();
        let n_l = self.head_offset(mod_l, 0);
        let n_r = self.head_offset(mod_r, self.n_offset);

        self.delay_line.push(x + self.feedback * fb_state);
        let y_delay = self.delay_line.read_split(n_l, n_r);

        let y_clip = self.drive_clip.process_stereo(y_delay * self.a_clip) / self.a_clip;
        self.diagnostics.check_stereo(NonFiniteTag::DelayLine, y_clip);
        let y_clip = y_clip.sanitize(0.0);
        let y_lp = self.lpf.process(self.hpf.process(y_clip));

        self.glide();
        self.fb_state = y_lp;

        let y = self.out_clip.process_stereo(Stereo::new(
            wet_dry_mix(x.l, y_lp.l, self.mix_lin),
            wet_dry_mix(x.r, y_lp.r, self.mix_lin),
        ));
        self.meters.update(METER_IN, x);
        self.meters.update(METER_OUT, y);
        y
    }

    fn update_coeffs(&mut self) {
        let fs = self.sample_rate;
        self.hpf.update(&self.hpf_settings, fs);
        self.lpf.update(&self.lpf_settings, fs);
        self.n_offset =
            (roundf(ms_to_samples(self.offset_ms, fs)).max(0.0) as usize).min(self.max_offset_samples);
        self.a_clip = db_to_linear(self.drive_db);
        self.mix_lin = self.mix_percent / 100.0;
        self.mod_depth = self.mod_depth_percent / 100.0;
        self.lfo.set_frequency(self.mod_freq_hz, fs);
        self.lfo.set_phase_offset_deg(self.mod_phase_deg);
        self.glide_count = self.n_glide;
        self.apply_tempo();

        #[cfg(feature = "tracing")]
        tracing::debug!(
            sample_rate = fs,
            time_s = self.time_s,
            n_target = self.n_target,
            n_offset = self.n_offset,
            synced = self.is_time_locked(),
            "tape echo coefficients updated"
        );
    }

    fn reset(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.delay_line.clear();
        self.hpf.clear();
        self.lpf.clear();
        self.fb_state = Stereo::ZERO;
        self.meters.reset();
        self.lfo.reset();
        self.update_coeffs();
        self.n_glided = self.n_target;
    }

    fn set_tempo(&mut self, bpm: f32) {
        self.tempo = if bpm.is_finite() && bpm > 0.0 { bpm } else { 0.0 };
        self.apply_tempo();
    }
}

impl Metered for TapeEcho {
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

impl ParameterInfo for TapeEcho {
    fn param_count(&self) -> usize {
        PARAM_COUNT
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        match index {
            0 => Some(
                ParamDescriptor::knob(
                    "Time",
                    "Time",
                    ParamUnit::Seconds,
                    MIN_TIME_SECONDS,
                    MAX_DELAY_SECONDS,
                    0.5,
                )
                .with_step(0.001)
                .with_active(!self.is_time_locked())
                .with_id(ParamId(200), "echo_time"),
            ),
            1 => Some(
                ParamDescriptor::knob("Feedback", "FB", ParamUnit::Multiplier, 0.0, 2.0, 0.2)
                    .with_id(ParamId(201), "echo_feedback"),
            ),
            2 => Some(
                ParamDescriptor::frequency_hz("HPF", "HPF", 20.0, 2000.0, 20.0)
                    .with_id(ParamId(202), "echo_hpf"),
            ),
            3 => Some(
                ParamDescriptor::frequency_hz("LPF", "LPF", 200.0, 20000.0, 20000.0)
                    .with_id(ParamId(203), "echo_lpf"),
            ),
            4 => Some(
                ParamDescriptor::gain_db("Drive", "Drive", -20.0, 20.0, 0.0)
                    .with_id(ParamId(204), "echo_drive"),
            ),
            5 => Some(
                ParamDescriptor::knob("Q_HP", "Q HP", ParamUnit::None, 0.5, 2.0, 0.707)
                    .with_mid_point(1.0)
                    .secondary()
                    .with_id(ParamId(205), "echo_q_hp"),
            ),
            6 => Some(
                ParamDescriptor::knob("Q_LP", "Q LP", ParamUnit::None, 0.5, 2.0, 0.707)
                    .with_mid_point(1.0)
                    .secondary()
                    .with_id(ParamId(206), "echo_q_lp"),
            ),
            7 => Some(
                ParamDescriptor::frequency_hz("Mod_Frequency", "Mod Hz", 0.1, 10.0, 1.0)
                    .secondary()
                    .with_id(ParamId(207), "echo_mod_freq"),
            ),
            8 => Some(
                ParamDescriptor::knob("Mod_Depth", "Depth", ParamUnit::Percent, 0.1, 10.0, 0.1)
                    .with_scale(ParamScale::Logarithmic)
                    .secondary()
                    .with_id(ParamId(208), "echo_mod_depth"),
            ),
            9 => Some(
                ParamDescriptor::knob("Mod_Phase", "Phase", ParamUnit::Degrees, 0.0, 180.0, 0.0)
                    .with_step(1.0)
                    .secondary()
                    .with_id(ParamId(209), "echo_mod_phase"),
            ),
            10 => Some(
                ParamDescriptor::time_ms("Offset", "Offset", 0.0, MAX_OFFSET_MS, 0.0)
                    .secondary()
                    .with_id(ParamId(210), "echo_offset"),
            ),
            11 => Some(ParamDescriptor {
                name: "Dry_Mix",
                short_name: "Mix",
                ..ParamDescriptor::mix()
            }
            .secondary()
            .with_id(ParamId(211), "echo_mix")),
            12 => Some(
                ParamDescriptor::dropdown(
                    "Subdivision",
                    "Subdiv",
                    SUBDIVISION_LABELS,
                    Subdivision::Fourth.index(),
                )
                .with_id(ParamId(212), "echo_subdivision"),
            ),
            13 => Some(
                ParamDescriptor::toggle("Sync", "Sync", false).with_id(ParamId(213), "echo_sync"),
            ),
            _ => None,
        }
    }

    fn get_param(&self, index: usize) -> f32 {
        match index {
            0 => self.time_s,
            1 => self.feedback,
            2 => self.hpf_settings.fc,
            3 => self.lpf_settings.fc,
            4 => self.drive_db,
            5 => self.hpf_settings.q,
            6 => self.lpf_settings.q,
            7 => self.mod_freq_hz,
            8 => self.mod_depth_percent,
            9 => self.mod_phase_deg,
            10 => self.offset_ms,
            11 => self.mix_percent,
            12 => self.subdivision.index() as f32,
            13 => {
                if self.sync {
                    1.0
                } else {
                    0.0
                }
            }
            _ => 0.0,
        }
    }

    fn set_param(&mut self, index: usize, value: f32) {
        let Some(desc) = self.param_info(index) else {
            return;
        };
        let v = desc.quantize(value);
        match index {
            0 => self.time_s = v,
            1 => self.feedback = v,
            2 => self.hpf_settings.fc = v,
            3 => self.lpf_settings.fc = v,
            4 => self.drive_db = v,
            5 => self.hpf_settings.q = v,
            6 => self.lpf_settings.q = v,
            7 => self.mod_freq_hz = v,
            8 => self.mod_depth_percent = v,
            9 => self.mod_phase_deg = v,
            10 => self.offset_ms = v,
            11 => self.mix_percent = v,
            12 => {
                if let Some(sub) = Subdivision::from_index(v as usize) {
                    self.subdivision = sub;
                }
            }
            13 => self.sync = v >= 0.5,
            _ => return,
        }
        self.update_coeffs();
    }
}
