//! Side-chain gain computer for dynamics processors.
//!
//! One side-chain instance turns a detector signal into a multiplicative
//! gain. Per sample it runs three stages:
//!
//! 1. **Level sensing**: `|x|` or a windowed RMS, followed by a
//!    fast-attack peak detector whose release uses a fixed time constant.
//! 2. **Gain curve**: threshold/ratio/knee in either the linear domain
//!    ([`side_chain_lin`]) or the dB domain ([`side_chain_db`]). The result
//!    is a gain-reduction *target*.
//! 3. **Smoothing**: a one-pole filter on the target that uses the attack
//!    constant while reduction is increasing and the release constant while
//!    it is decreasing.
//!
//! Settings become coefficients through [`calc_coeffs`], which is pure and
//! only needs to run when a setting or the sample rate changes.
//!
//! # Example
//!
//! ```rust
//! use dynamo_core::sidechain::{ScSettings, ScState, calc_coeffs, side_chain_db};
//!
//! let settings = ScSettings { thresh_db: -12.0, ratio: 4.0, knee_db: 0.0, ..ScSettings::default() };
//! let coeffs = calc_coeffs(48000.0, &settings);
//! let mut state = ScState::new();
//!
//! let mut gain = 1.0;
//! for _ in 0..48000 {
//!     gain = side_chain_db(&coeffs, &mut state, 0.5);
//! }
//! assert!(gain < 1.0);
//! ```

use core::f32::consts::FRAC_1_SQRT_2;
use libm::{expf, floorf, powf};

use crate::math::{amplitude_to_db, db_to_linear, sanitize};
use crate::rms::{RMS_MAX_WINDOW, RmsSensor};

/// Numerator of the one-pole time-constant formula `exp(-2200 / (t_ms * fs))`.
///
/// 2200 = 1000 ms/s × ln(9): `t_ms` is the 10 %–90 % rise time.
const TIME_CONSTANT_SCALE: f32 = 2200.0;

/// Which gain curve a side-chain runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SideChainCurve {
    /// Threshold/ratio/knee evaluated on dB values.
    #[default]
    Decibel,
    /// Linear-amplitude approximation of the dB curve.
    Linear,
}

/// User-facing side-chain targets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScSettings {
    /// Threshold in dB.
    pub thresh_db: f32,
    /// Compression ratio (n:1).
    pub ratio: f32,
    /// Knee width in dB.
    pub knee_db: f32,
    /// Attack time in ms.
    pub t_att_ms: f32,
    /// Release time in ms.
    pub t_rel_ms: f32,
    /// RMS window in ms.
    pub t_rms_ms: f32,
    /// Sense RMS instead of the rectified signal.
    pub rms_enable: bool,
    /// Release of the peak detector in ms.
    pub t_peak_ms: f32,
}

impl Default for ScSettings {
    fn default() -> Self {
        Self {
            thresh_db: 0.0,
            ratio: 2.0,
            knee_db: 12.0,
            t_att_ms: 1.0,
            t_rel_ms: 100.0,
            t_rms_ms: 80.0,
            rms_enable: false,
            t_peak_ms: 20.0,
        }
    }
}

/// Sample-rate dependent values derived from [`ScSettings`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScCoeffs {
    /// Threshold in dB.
    pub thresh_db: f32,
    /// Ratio.
    pub ratio: f32,
    /// Knee width in dB.
    pub knee_db: f32,
    /// Threshold as linear amplitude.
    pub thresh_lin: f32,
    /// Knee as a linear amplitude factor.
    pub knee_lin: f32,
    /// Ratio transformed for the linear-domain curve.
    pub ratio_lin: f32,
    /// Attack smoothing pole.
    pub alpha_att: f32,
    /// Release smoothing pole, never below `alpha_att`.
    pub alpha_rel: f32,
    /// Peak detector release pole.
    pub alpha_peak: f32,
    /// RMS window in samples, at most [`RMS_MAX_WINDOW`].
    pub n_rms: usize,
    /// Sense RMS instead of the rectified signal.
    pub rms_enable: bool,
}

impl Default for ScCoeffs {
    fn default() -> Self {
        Self {
            thresh_db: 0.0,
            ratio: 1.0,
            knee_db: 0.0,
            thresh_lin: 1.0,
            knee_lin: 1.0,
            ratio_lin: 1.0,
            alpha_att: 0.0,
            alpha_rel: 0.0,
            alpha_peak: 0.0,
            n_rms: 1,
            rms_enable: false,
        }
    }
}

/// Per-channel side-chain memory.
#[derive(Debug, Clone, Default)]
pub struct ScState {
    /// Last output of the peak detector.
    pub y_sens_last: f32,
    /// Last smoothed gain-reduction value.
    pub y_filter_last: f32,
    rms: RmsSensor,
}

impl ScState {
    /// Fresh zeroed state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Zeroes detector, smoother and RMS buffer.
    pub fn reset(&mut self) {
        self.y_sens_last = 0.0;
        self.y_filter_last = 0.0;
        self.rms.reset();
    }
}

/// One-pole coefficient for a time constant in milliseconds.
#[inline]
fn pole(t_ms: f32, fs: f32) -> f32 {
    expf(-TIME_CONSTANT_SCALE / (t_ms * fs))
}

/// Derives coefficients from settings at sample rate `fs`.
///
/// Pure; call it whenever a setting or the sample rate changes.
pub fn calc_coeffs(fs: f32, settings: &ScSettings) -> ScCoeffs {
    let alpha_att = pole(settings.t_att_ms, fs);
    let alpha_rel = pole(settings.t_rel_ms, fs).max(alpha_att);
    let r = settings.ratio;
    let ratio_lin = (1.0 - 1.0 / r) * (FRAC_1_SQRT_2 - powf(FRAC_1_SQRT_2 - (r - 3.0) / 18.0, 5.0));

    ScCoeffs {
        thresh_db: settings.thresh_db,
        ratio: settings.ratio,
        knee_db: settings.knee_db,
        thresh_lin: db_to_linear(settings.thresh_db),
        knee_lin: db_to_linear(settings.knee_db),
        ratio_lin,
        alpha_att,
        alpha_rel,
        alpha_peak: pole(settings.t_peak_ms, fs),
        n_rms: (floorf(settings.t_rms_ms * fs * 0.001) as usize).min(RMS_MAX_WINDOW),
        rms_enable: settings.rms_enable,
    }
}

/// Level sensing shared by both curves: rectify or RMS, then peak-hold with release.
#[inline]
fn sense(coeffs: &ScCoeffs, state: &mut ScState, x: f32) -> f32 {
    let x_abs = if coeffs.rms_enable {
        state.rms.process(coeffs.n_rms, x)
    } else {
        x.abs()
    };
    let released = coeffs.alpha_peak * state.y_sens_last + (1.0 - coeffs.alpha_peak) * x_abs;
    let y_sens = sanitize(x_abs.max(released), 0.0);
    state.y_sens_last = y_sens;
    y_sens
}

/// Attack/release smoothing of a gain-reduction target.
#[inline]
fn smooth(coeffs: &ScCoeffs, state: &mut ScState, target: f32) -> f32 {
    let alpha = if target > state.y_filter_last {
        coeffs.alpha_att
    } else {
        coeffs.alpha_rel
    };
    let y_filter = sanitize(state.y_filter_last * alpha + target * (1.0 - alpha), 0.0);
    state.y_filter_last = y_filter;
    y_filter
}

/// Static dB-domain gain curve: input level in dB to output level in dB.
///
/// Hard knee when `knee_db` is zero, quadratic interpolation across
/// `thresh ± knee/2` otherwise.
#[inline]
pub fn db_curve(coeffs: &ScCoeffs, x_db: f32) -> f32 {
    let over = x_db - coeffs.thresh_db;
    let half_knee = coeffs.knee_db / 2.0;
    if over > half_knee {
        coeffs.thresh_db + over / coeffs.ratio
    } else if over < -half_knee || coeffs.knee_db <= 0.0 {
        x_db
    } else {
        let tmp = over + half_knee;
        x_db + (1.0 / coeffs.ratio - 1.0) * tmp * tmp / (2.0 * coeffs.knee_db)
    }
}

/// Linear-domain side-chain. Returns a multiplicative gain `1/(y + 1)`.
///
/// The target steps from 0 to `ratio_lin / knee_lin` at the lower knee edge
/// `thresh_lin / knee_lin`. Unlike [`db_curve`] this curve is not continuous
/// there; the smoothing filter absorbs the step.
#[inline]
pub fn side_chain_lin(coeffs: &ScCoeffs, state: &mut ScState, x: f32) -> f32 {
    let y_sens = sense(coeffs, state, x);
    let t = coeffs.thresh_lin;

    let target = if y_sens < t / coeffs.knee_lin {
        0.0
    } else if y_sens < t {
        (y_sens / t) * coeffs.ratio_lin * t / (coeffs.knee_lin * y_sens)
    } else {
        (y_sens / t) * coeffs.ratio_lin
    };

    let y_filter = smooth(coeffs, state, target);
    1.0 / (y_filter + 1.0)
}

/// dB-domain side-chain. Returns a multiplicative gain `10^(-y/20)`.
#[inline]
pub fn side_chain_db(coeffs: &ScCoeffs, state: &mut ScState, x: f32) -> f32 {
    let y_sens = sense(coeffs, state, x);
    let x_db = amplitude_to_db(y_sens);
    // Silence gives -inf - -inf; treat it as no reduction
    let target = sanitize(x_db - db_curve(coeffs, x_db), 0.0);

    let y_filter = smooth(coeffs, state, target);
    db_to_linear(-y_filter)
}

/// Runs the side-chain with the selected curve.
#[inline]
pub fn side_chain(curve: SideChainCurve, coeffs: &ScCoeffs, state: &mut ScState, x: f32) -> f32 {
    match curve {
        SideChainCurve::Decibel => side_chain_db(coeffs, state, x),
        SideChainCurve::Linear => side_chain_lin(coeffs, state, x),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FS: f32 = 48000.0;

    #[test]
    fn test_default_coeffs() {
        let c = calc_coeffs(FS, &ScSettings::default());
        assert_eq!(c.n_rms, 3840);
        assert!((c.thresh_lin - 1.0).abs() < 1e-6);
        assert!((c.knee_lin - db_to_linear(12.0)).abs() < 1e-4);
        assert!(c.alpha_att > 0.0 && c.alpha_att < 1.0);
        assert!(c.alpha_rel > c.alpha_att);
    }

    #[test]
    fn test_rms_window_clamped_to_sensor_capacity() {
        let settings = ScSettings::default();
        let c = calc_coeffs(48000.0 * 8.0, &settings);
        assert_eq!(c.n_rms, 30_720);
        let c = calc_coeffs(1_000_000_000.0, &settings);
        assert_eq!(c.n_rms, RMS_MAX_WINDOW);
    }

    #[test]
    fn test_release_clamped_to_attack() {
        let settings = ScSettings {
            t_att_ms: 50.0,
            t_rel_ms: 10.0,
            ..ScSettings::default()
        };
        let c = calc_coeffs(FS, &settings);
        assert_eq!(c.alpha_rel, c.alpha_att);
    }

    #[test]
    fn test_ratio_lin_at_unity_ratio_is_zero() {
        let c = calc_coeffs(FS, &ScSettings { ratio: 1.0, ..ScSettings::default() });
        assert!(c.ratio_lin.abs() < 1e-6);
    }

    #[test]
    fn test_db_curve_hard_knee() {
        let c = calc_coeffs(FS, &ScSettings { thresh_db: -12.0, ratio: 4.0, knee_db: 0.0, ..ScSettings::default() });
        assert!((db_curve(&c, -6.0) - (-10.5)).abs() < 1e-5);
        assert_eq!(db_curve(&c, -20.0), -20.0);
        assert_eq!(db_curve(&c, -12.0), -12.0);
    }

    #[test]
    fn test_db_curve_knee_continuity() {
        let c = calc_coeffs(FS, &ScSettings { thresh_db: -20.0, ratio: 4.0, knee_db: 10.0, ..ScSettings::default() });
        for edge in [-25.0_f32, -15.0] {
            let below = db_curve(&c, edge - 1e-3);
            let above = db_curve(&c, edge + 1e-3);
            assert!((below - above).abs() < 1e-2, "jump at {edge}: {below} vs {above}");
        }
    }

    #[test]
    fn test_silence_gives_unity_gain() {
        let c = calc_coeffs(FS, &ScSettings::default());
        let mut s = ScState::new();
        for _ in 0..100 {
            assert_eq!(side_chain_db(&c, &mut s, 0.0), 1.0);
            assert_eq!(side_chain_lin(&c, &mut s, 0.0), 1.0);
        }
    }

    #[test]
    fn test_lin_reduces_above_threshold() {
        let c = calc_coeffs(FS, &ScSettings { thresh_db: -20.0, ratio: 4.0, knee_db: 6.0, ..ScSettings::default() });
        let mut s = ScState::new();
        let mut g = 1.0;
        for _ in 0..48000 {
            g = side_chain_lin(&c, &mut s, 0.5);
        }
        assert!(g < 0.9 && g > 0.0, "gain {g}");
    }

    #[test]
    fn test_rms_sensing_path() {
        let c = calc_coeffs(
            FS,
            &ScSettings { thresh_db: -30.0, ratio: 8.0, rms_enable: true, t_rms_ms: 10.0, ..ScSettings::default() },
        );
        let mut s = ScState::new();
        let mut g = 1.0;
        for i in 0..9600 {
            let x = 0.5 * libm::sinf(i as f32 * 0.2);
            g = side_chain_db(&c, &mut s, x);
        }
        assert!(g < 0.5, "gain {g}");
    }

    #[test]
    fn test_nan_input_heals() {
        let c = calc_coeffs(FS, &ScSettings::default());
        let mut s = ScState::new();
        let g = side_chain_db(&c, &mut s, f32::NAN);
        assert!(!g.is_nan());
        assert!(!s.y_filter_last.is_nan());
        assert!(!s.y_sens_last.is_nan());
    }

    #[test]
    fn test_curve_dispatch() {
        let c = calc_coeffs(FS, &ScSettings { thresh_db: -20.0, ..ScSettings::default() });
        let mut a = ScState::new();
        let mut b = ScState::new();
        assert_eq!(side_chain(SideChainCurve::Linear, &c, &mut a, 0.3), side_chain_lin(&c, &mut b, 0.3));
    }
}
