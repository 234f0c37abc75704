//! Polyphase FIR oversampling around any [`StereoProcessor`].
//!
//! Nonlinear stages (the output soft clipper, a fast-attack gain computer)
//! generate harmonics above Nyquist that fold back into the audible band.
//! The oversampler runs the wrapped unit at `os × fs`:
//!
//! 1. **Interpolate**: each base-rate input is pushed into a mirrored delay
//!    line; for each of the `os` sub-ticks a phase-offset sub-filter
//!    `b[j·os + i]` is convolved against it and scaled by `os` to make up
//!    for the zero-stuffing.
//! 2. **Process**: the wrapped unit runs once per sub-tick.
//! 3. **Decimate**: sub-tick outputs go into a second mirrored delay line
//!    and the full `n`-tap filter is evaluated once per base-rate sample.
//!
//! The same taps serve both stages. They are designed with
//! [`window_method`](crate::window_method) for a 22 kHz cut-off at the
//! oversampled rate, so redesign happens on mode or sample-rate change only,
//! never per sample.
//!
//! Both delay lines are twice [`SRC_DELAY_LINE`] long and every write goes
//! to `i` and `i + SRC_DELAY_LINE`, so each convolution window is one
//! contiguous slice and the inner loops never wrap.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use dynamo_core::{Oversampler, OversamplingMode, StereoProcessor};
//! use dynamo_effects::Compressor;
//!
//! let mut os = Oversampler::new(Compressor::new());
//! os.set_mode(OversamplingMode::Fir4xHq, 48000.0);
//! let y = os.process_sample(x);
//! ```

use crate::processor::StereoProcessor;
use crate::stereo::Stereo;

/// Length of each (un-mirrored) oversampler delay line, and the tap capacity.
pub const SRC_DELAY_LINE: usize = 192;

/// Taps per oversampling factor in high-quality modes.
pub const FIR_MULT_HQ: usize = 24;

/// Taps per oversampling factor in low-quality modes.
pub const FIR_MULT_LQ: usize = 12;

/// Cut-off of the anti-imaging / anti-aliasing filter in Hz.
pub const DESIGN_CUTOFF_HZ: f32 = 22_000.0;

/// Oversampling factor and filter length selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OversamplingMode {
    /// No oversampling; the wrapped unit is called directly.
    #[default]
    Disabled,
    /// 2×, 24 taps.
    Fir2xLq,
    /// 4×, 48 taps.
    Fir4xLq,
    /// 8×, 96 taps.
    Fir8xLq,
    /// 2×, 48 taps.
    Fir2xHq,
    /// 4×, 96 taps.
    Fir4xHq,
    /// 8×, 192 taps.
    Fir8xHq,
}

impl OversamplingMode {
    /// Every mode, in drop-down order.
    pub const ALL: [OversamplingMode; 7] = [
        OversamplingMode::Disabled,
        OversamplingMode::Fir2xLq,
        OversamplingMode::Fir4xLq,
        OversamplingMode::Fir8xLq,
        OversamplingMode::Fir2xHq,
        OversamplingMode::Fir4xHq,
        OversamplingMode::Fir8xHq,
    ];

    /// Oversampling factor (1 when disabled).
    pub const fn factor(self) -> usize {
        match self {
            OversamplingMode::Disabled => 1,
            OversamplingMode::Fir2xLq | OversamplingMode::Fir2xHq => 2,
            OversamplingMode::Fir4xLq | OversamplingMode::Fir4xHq => 4,
            OversamplingMode::Fir8xLq | OversamplingMode::Fir8xHq => 8,
        }
    }

    /// Taps per unit of oversampling factor (1 when disabled).
    pub const fn fir_len_mult(self) -> usize {
        match self {
            OversamplingMode::Disabled => 1,
            OversamplingMode::Fir2xLq | OversamplingMode::Fir4xLq | OversamplingMode::Fir8xLq => {
                FIR_MULT_LQ
            }
            OversamplingMode::Fir2xHq | OversamplingMode::Fir4xHq | OversamplingMode::Fir8xHq => {
                FIR_MULT_HQ
            }
        }
    }

    /// Stable identifier used in presets and on the command line.
    pub const fn label(self) -> &'static str {
        match self {
            OversamplingMode::Disabled => "disable",
            OversamplingMode::Fir2xLq => "fir_2x_lq",
            OversamplingMode::Fir4xLq => "fir_4x_lq",
            OversamplingMode::Fir8xLq => "fir_8x_lq",
            OversamplingMode::Fir2xHq => "fir_2x_hq",
            OversamplingMode::Fir4xHq => "fir_4x_hq",
            OversamplingMode::Fir8xHq => "fir_8x_hq",
        }
    }

    /// Parse a [`label`](Self::label). Case-insensitive; `-` and `_` are
    /// interchangeable and `"off"`/`"disabled"` are accepted for [`Disabled`](Self::Disabled).
    pub fn from_label(s: &str) -> Option<Self> {
        let matches = |label: &str| {
            s.len() == label.len()
                && s.bytes().zip(label.bytes()).all(|(a, b)| {
                    let a = if a == b'-' { b'_' } else { a.to_ascii_lowercase() };
                    a == b
                })
        };
        if matches("off") || matches("disabled") {
            return Some(OversamplingMode::Disabled);
        }
        Self::ALL.into_iter().find(|m| matches(m.label()))
    }
}

impl core::fmt::Display for OversamplingMode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

/// Derived oversampler configuration: factor, filter length and taps.
#[derive(Debug, Clone, PartialEq)]
pub struct SrcCoeffs {
    /// Bypass the whole interpolate/decimate path.
    pub disable: bool,
    /// Oversampling factor.
    pub os_factor: usize,
    /// Taps per unit of factor.
    pub fir_len_mult: usize,
    /// Active taps, `os_factor * fir_len_mult`.
    pub n: usize,
    /// Oversampled rate in Hz.
    pub fs_hi: f32,
    /// Filter taps; entries at `n..` are zero.
    pub b: [f32; SRC_DELAY_LINE],
}

impl Default for SrcCoeffs {
    fn default() -> Self {
        Self::disabled(48000.0)
    }
}

impl SrcCoeffs {
    /// Coefficients for the pass-through path at base rate `fs`.
    pub fn disabled(fs: f32) -> Self {
        Self {
            disable: true,
            os_factor: 1,
            fir_len_mult: 1,
            n: 1,
            fs_hi: fs,
            b: [0.0; SRC_DELAY_LINE],
        }
    }

    /// Build coefficients for `mode` at base rate `fs` from precomputed taps.
    ///
    /// `taps` is truncated or zero-padded to the mode's filter length. Use
    /// this on targets without `std`, where [`update`] is unavailable.
    pub fn with_taps(mode: OversamplingMode, fs: f32, taps: &[f32]) -> Self {
        if mode == OversamplingMode::Disabled {
            return Self::disabled(fs);
        }
        let os_factor = mode.factor();
        let fir_len_mult = mode.fir_len_mult();
        let n = os_factor * fir_len_mult;
        let mut b = [0.0; SRC_DELAY_LINE];
        for (dst, src) in b[..n].iter_mut().zip(taps) {
            *dst = *src;
        }
        Self {
            disable: false,
            os_factor,
            fir_len_mult,
            n,
            fs_hi: fs * os_factor as f32,
            b,
        }
    }

    /// Active taps.
    pub fn taps(&self) -> &[f32] {
        &self.b[..self.n]
    }

    /// Round-trip group delay in base-rate samples (0 when disabled).
    ///
    /// Both filters are centred on tap `n/2`, giving `n - 1` samples of delay
    /// at the oversampled rate; the last sub-tick of each base sample absorbs
    /// one base-rate sample of that.
    pub fn latency_samples(&self) -> usize {
        if self.disable {
            0
        } else {
            self.fir_len_mult - 1
        }
    }
}

/// Oversampler delay lines and write positions.
#[derive(Debug, Clone)]
pub struct SrcState {
    i_store_in: usize,
    i_store_out: usize,
    dl_interpolation: [Stereo<f32>; 2 * SRC_DELAY_LINE],
    dl_antialiasing: [Stereo<f32>; 2 * SRC_DELAY_LINE],
}

impl Default for SrcState {
    fn default() -> Self {
        Self::new()
    }
}

impl SrcState {
    /// Zeroed state.
    pub const fn new() -> Self {
        Self {
            i_store_in: 0,
            i_store_out: 0,
            dl_interpolation: [Stereo::ZERO; 2 * SRC_DELAY_LINE],
            dl_antialiasing: [Stereo::ZERO; 2 * SRC_DELAY_LINE],
        }
    }
}

/// Run one base-rate sample through `plugin` with oversampling.
///
/// With `coeffs.disable` this is exactly `plugin.process_sample(x)`.
#[inline]
pub fn process_sample<P: StereoProcessor + ?Sized>(
    plugin: &mut P,
    state: &mut SrcState,
    coeffs: &SrcCoeffs,
    x: Stereo<f32>,
) -> Stereo<f32> {
    if coeffs.disable {
        return plugin.process_sample(x);
    }

    let os = coeffs.os_factor;
    let mult = coeffs.fir_len_mult;
    let n = coeffs.n;

    state.dl_interpolation[state.i_store_in] = x;
    state.dl_interpolation[state.i_store_in + SRC_DELAY_LINE] = x;
    let i_read_in = state.i_store_in + SRC_DELAY_LINE;
    state.i_store_in += 1;
    if state.i_store_in >= SRC_DELAY_LINE {
        state.i_store_in = 0;
    }

    let os_gain = os as f32;
    for i in 0..os {
        let mut accum = Stereo::ZERO;
        for j in 0..mult {
            accum += coeffs.b[j * os + i] * state.dl_interpolation[i_read_in - j];
        }
        let y = plugin.process_sample(accum * os_gain);
        state.dl_antialiasing[state.i_store_out] = y;
        state.dl_antialiasing[state.i_store_out + SRC_DELAY_LINE] = y;
        state.i_store_out += 1;
        if state.i_store_out >= SRC_DELAY_LINE {
            state.i_store_out = 0;
        }
    }

    let i_read_out = state.i_store_out + SRC_DELAY_LINE - n;
    let mut accum = Stereo::ZERO;
    for (b, y) in coeffs.b[..n]
        .iter()
        .zip(&state.dl_antialiasing[i_read_out..i_read_out + n])
    {
        accum += *b * *y;
    }
    accum
}

/// Reconfigure `coeffs` for `mode` at base rate `fs`, redesigning the taps.
///
/// Runs an FFT and allocates; call from the control thread only.
#[cfg(feature = "std")]
pub fn update(mode: OversamplingMode, fs: f32, coeffs: &mut SrcCoeffs) {
    *coeffs = if mode == OversamplingMode::Disabled {
        SrcCoeffs::disabled(fs)
    } else {
        let n = mode.factor() * mode.fir_len_mult();
        let fs_hi = fs * mode.factor() as f32;
        let taps = crate::window::window_method(DESIGN_CUTOFF_HZ, n, fs_hi);
        SrcCoeffs::with_taps(mode, fs, &taps)
    };

    #[cfg(feature = "tracing")]
    tracing::debug!(
        mode = mode.label(),
        fs,
        fs_hi = coeffs.fs_hi,
        taps = coeffs.n,
        "oversampler redesigned"
    );
}

/// Clear both delay lines and their write positions.
pub fn reset(state: &mut SrcState) {
    *state = SrcState::new();
}

/// A processing unit wrapped with selectable oversampling.
///
/// Owns the unit, the oversampler state and its coefficients. The wrapped
/// unit always sees the oversampled rate through its own
/// [`reset`](StereoProcessor::reset).
pub struct Oversampler<P> {
    plugin: P,
    state: SrcState,
    coeffs: SrcCoeffs,
    mode: OversamplingMode,
    sample_rate: f32,
}

impl<P: StereoProcessor> Oversampler<P> {
    /// Wrap `plugin` with oversampling disabled.
    pub fn new(plugin: P) -> Self {
        Self {
            plugin,
            state: SrcState::new(),
            coeffs: SrcCoeffs::default(),
            mode: OversamplingMode::Disabled,
            sample_rate: 48000.0,
        }
    }

    /// Wrap `plugin` with precomputed coefficients.
    ///
    /// The wrapped unit is reset to `coeffs.fs_hi`.
    pub fn with_coeffs(mut plugin: P, mode: OversamplingMode, fs: f32, coeffs: SrcCoeffs) -> Self {
        plugin.reset(coeffs.fs_hi);
        Self {
            plugin,
            state: SrcState::new(),
            coeffs,
            mode,
            sample_rate: fs,
        }
    }

    /// Switch mode and base rate.
    ///
    /// Redesigns the taps, clears the delay lines and resets the wrapped
    /// unit to the new oversampled rate.
    #[cfg(feature = "std")]
    pub fn set_mode(&mut self, mode: OversamplingMode, fs: f32) {
        self.mode = mode;
        self.sample_rate = fs;
        update(mode, fs, &mut self.coeffs);
        reset(&mut self.state);
        self.plugin.reset(self.coeffs.fs_hi);
    }

    /// Current mode.
    pub fn mode(&self) -> OversamplingMode {
        self.mode
    }

    /// Base sample rate in Hz.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Current coefficients.
    pub fn coeffs(&self) -> &SrcCoeffs {
        &self.coeffs
    }

    /// Get a reference to the wrapped unit.
    pub fn inner(&self) -> &P {
        &self.plugin
    }

    /// Get a mutable reference to the wrapped unit.
    ///
    /// Parameter writes through `ParameterInfo::set_param` already call
    /// `update_coeffs`; direct field writes must call it themselves.
    pub fn inner_mut(&mut self) -> &mut P {
        &mut self.plugin
    }

    /// Unwrap and return the inner unit.
    pub fn into_inner(self) -> P {
        self.plugin
    }
}

impl<P: StereoProcessor> StereoProcessor for Oversampler<P> {
    #[inline]
    fn process_sample(&mut self, x: Stereo<f32>) -> Stereo<f32> {
        process_sample(&mut self.plugin, &mut self.state, &self.coeffs, x)
    }

    fn update_coeffs(&mut self) {
        self.plugin.update_coeffs();
    }

    fn reset(&mut self, sample_rate: f32) {
        #[cfg(feature = "std")]
        {
            if sample_rate != self.sample_rate {
                self.set_mode(self.mode, sample_rate);
                return;
            }
        }
        #[cfg(not(feature = "std"))]
        {
            self.coeffs.fs_hi = sample_rate * self.coeffs.os_factor as f32;
        }
        self.sample_rate = sample_rate;
        reset(&mut self.state);
        self.plugin.reset(self.coeffs.fs_hi);
    }

    fn set_tempo(&mut self, bpm: f32) {
        self.plugin.set_tempo(bpm);
    }

    fn latency_samples(&self) -> usize {
        self.coeffs.latency_samples() + self.plugin.latency_samples() / self.coeffs.os_factor
    }
}
