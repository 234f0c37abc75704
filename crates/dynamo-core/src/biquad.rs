//! Biquad (bi-quadratic) filter bank.
//!
//! Second-order IIR sections configured from a shape, a center/corner
//! frequency, a Q and (for bell and shelf shapes) a gain. Coefficient
//! calculation uses the RBJ Audio EQ Cookbook formulas.
//!
//! Coefficients and state are kept apart so one coefficient set can drive
//! both channels of a [`StereoBiquad`].

use core::f32::consts::PI;
use libm::{cosf, powf, sinf, sqrtf};

use crate::math::flush_denormal;
use crate::stereo::Stereo;

/// Highest corner frequency as a fraction of the sample rate.
const NYQUIST_GUARD: f32 = 0.49;

/// Filter response shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BiquadShape {
    /// Peaking EQ.
    #[default]
    Bell,
    /// High shelf.
    HiShelf,
    /// Low shelf.
    LoShelf,
    /// Band-reject.
    Notch,
    /// High-pass.
    Hpf,
    /// Low-pass.
    Lpf,
    /// All-pass.
    Apf,
    /// Identity (`y = x`).
    None,
}

/// User-facing filter settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiquadSettings {
    /// Response shape.
    pub shape: BiquadShape,
    /// Center or corner frequency in Hz.
    pub fc: f32,
    /// Gain in dB (bell and shelves only).
    pub gain_db: f32,
    /// Quality factor.
    pub q: f32,
    /// When false the filter is an identity regardless of shape.
    pub enable: bool,
}

impl Default for BiquadSettings {
    fn default() -> Self {
        Self {
            shape: BiquadShape::Bell,
            fc: 1000.0,
            gain_db: 0.0,
            q: 0.707,
            enable: true,
        }
    }
}

impl BiquadSettings {
    /// Settings for the given shape and frequency, other fields default.
    pub fn new(shape: BiquadShape, fc: f32) -> Self {
        Self {
            shape,
            fc,
            ..Self::default()
        }
    }

    /// Effective shape, `None` when disabled.
    #[inline]
    pub fn effective_shape(&self) -> BiquadShape {
        if self.enable { self.shape } else { BiquadShape::None }
    }
}

/// Raw (un-normalized) RBJ coefficients `b0..b2`, `a0..a2`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiquadCoeffs6 {
    /// Feedforward coefficients.
    pub b: [f32; 3],
    /// Feedback coefficients, `a[0]` is the normalizer.
    pub a: [f32; 3],
}

impl Default for BiquadCoeffs6 {
    fn default() -> Self {
        Self {
            b: [1.0, 0.0, 0.0],
            a: [1.0, 0.0, 0.0],
        }
    }
}

impl BiquadCoeffs6 {
    /// Computes raw coefficients for a shape.
    ///
    /// `amp` is the RBJ amplitude `A = 10^(gain_db/40)`; ignored by shapes
    /// without gain.
    pub fn calc(shape: BiquadShape, fs: f32, fc: f32, q: f32, amp: f32) -> Self {
        let w0 = 2.0 * PI * fc / fs;
        let cos_w0 = cosf(w0);
        let alpha = sinf(w0) / (2.0 * q);
        let a = amp;

        match shape {
            BiquadShape::Bell => Self {
                b: [1.0 + alpha * a, -2.0 * cos_w0, 1.0 - alpha * a],
                a: [1.0 + alpha / a, -2.0 * cos_w0, 1.0 - alpha / a],
            },
            BiquadShape::LoShelf => {
                let two_sqrt_a_alpha = 2.0 * sqrtf(a) * alpha;
                Self {
                    b: [
                        a * ((a + 1.0) - (a - 1.0) * cos_w0 + two_sqrt_a_alpha),
                        2.0 * a * ((a - 1.0) - (a + 1.0) * cos_w0),
                        a * ((a + 1.0) - (a - 1.0) * cos_w0 - two_sqrt_a_alpha),
                    ],
                    a: [
                        (a + 1.0) + (a - 1.0) * cos_w0 + two_sqrt_a_alpha,
                        -2.0 * ((a - 1.0) + (a + 1.0) * cos_w0),
                        (a + 1.0) + (a - 1.0) * cos_w0 - two_sqrt_a_alpha,
                    ],
                }
            }
            BiquadShape::HiShelf => {
                let two_sqrt_a_alpha = 2.0 * sqrtf(a) * alpha;
                Self {
                    b: [
                        a * ((a + 1.0) + (a - 1.0) * cos_w0 + two_sqrt_a_alpha),
                        -2.0 * a * ((a - 1.0) + (a + 1.0) * cos_w0),
                        a * ((a + 1.0) + (a - 1.0) * cos_w0 - two_sqrt_a_alpha),
                    ],
                    a: [
                        (a + 1.0) - (a - 1.0) * cos_w0 + two_sqrt_a_alpha,
                        2.0 * ((a - 1.0) - (a + 1.0) * cos_w0),
                        (a + 1.0) - (a - 1.0) * cos_w0 - two_sqrt_a_alpha,
                    ],
                }
            }
            BiquadShape::Hpf => Self {
                b: [(1.0 + cos_w0) / 2.0, -(1.0 + cos_w0), (1.0 + cos_w0) / 2.0],
                a: [1.0 + alpha, -2.0 * cos_w0, 1.0 - alpha],
            },
            BiquadShape::Lpf => Self {
                b: [(1.0 - cos_w0) / 2.0, 1.0 - cos_w0, (1.0 - cos_w0) / 2.0],
                a: [1.0 + alpha, -2.0 * cos_w0, 1.0 - alpha],
            },
            BiquadShape::Apf => Self {
                b: [1.0 - alpha, -2.0 * cos_w0, 1.0 + alpha],
                a: [1.0 + alpha, -2.0 * cos_w0, 1.0 - alpha],
            },
            BiquadShape::Notch => Self {
                b: [1.0, -2.0 * cos_w0, 1.0],
                a: [1.0 + alpha, -2.0 * cos_w0, 1.0 - alpha],
            },
            BiquadShape::None => Self::default(),
        }
    }

    /// Divides everything by `a0`.
    pub fn normalize(&self) -> BiquadCoeffs {
        let a0_inv = 1.0 / self.a[0];
        BiquadCoeffs {
            b0: self.b[0] * a0_inv,
            b1: self.b[1] * a0_inv,
            b2: self.b[2] * a0_inv,
            a1: self.a[1] * a0_inv,
            a2: self.a[2] * a0_inv,
        }
    }
}

/// Normalized coefficients (`a0 == 1`).
///
/// Implements the Direct Form I structure:
/// ```text
/// y[n] = b0*x[n] + b1*x[n-1] + b2*x[n-2]
///                - a1*y[n-1] - a2*y[n-2]
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiquadCoeffs {
    /// Feedforward coefficients
    pub b0: f32,
    /// Feedforward coefficient for `x[n-1]`
    pub b1: f32,
    /// Feedforward coefficient for `x[n-2]`
    pub b2: f32,
    /// Feedback coefficient for `y[n-1]`
    pub a1: f32,
    /// Feedback coefficient for `y[n-2]`
    pub a2: f32,
}

impl Default for BiquadCoeffs {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl BiquadCoeffs {
    /// Passthrough coefficients.
    pub const IDENTITY: Self = Self {
        b0: 1.0,
        b1: 0.0,
        b2: 0.0,
        a1: 0.0,
        a2: 0.0,
    };

    /// Computes normalized coefficients from settings.
    ///
    /// Disabled settings produce [`BiquadCoeffs::IDENTITY`]. Corner
    /// frequencies above `0.49 * fs` are pulled below Nyquist.
    pub fn from_settings(settings: &BiquadSettings, fs: f32) -> Self {
        let amp = powf(10.0, settings.gain_db / 40.0);
        let fc = settings.fc.min(NYQUIST_GUARD * fs);
        BiquadCoeffs6::calc(settings.effective_shape(), fs, fc, settings.q, amp).normalize()
    }

    /// Runs one sample through `state`.
    #[inline]
    pub fn process(&self, state: &mut BiquadState, x: f32) -> f32 {
        let y = self.b0 * x + self.b1 * state.x1 + self.b2 * state.x2
                            - self.a1 * state.y1 - self.a2 * state.y2;
        state.x2 = state.x1;
        state.x1 = x;
        state.y2 = state.y1;
        state.y1 = flush_denormal(y);
        y
    }

    /// Magnitude response at `freq` Hz, evaluated on the unit circle.
    pub fn magnitude_at(&self, freq: f32, fs: f32) -> f32 {
        let w = 2.0 * PI * freq / fs;
        let (c1, s1) = (cosf(w), sinf(w));
        let (c2, s2) = (cosf(2.0 * w), sinf(2.0 * w));
        let num_re = self.b0 + self.b1 * c1 + self.b2 * c2;
        let num_im = -(self.b1 * s1 + self.b2 * s2);
        let den_re = 1.0 + self.a1 * c1 + self.a2 * c2;
        let den_im = -(self.a1 * s1 + self.a2 * s2);
        sqrtf((num_re * num_re + num_im * num_im) / (den_re * den_re + den_im * den_im))
    }
}

/// Two-sample input/output history of one channel.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BiquadState {
    x1: f32,
    x2: f32,
    y1: f32,
    y2: f32,
}

impl BiquadState {
    /// Clears the history.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// A biquad section running on both channels with shared coefficients.
#[derive(Debug, Clone, Default)]
pub struct StereoBiquad {
    coeffs: BiquadCoeffs,
    left: BiquadState,
    right: BiquadState,
}

impl StereoBiquad {
    /// Creates a passthrough filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the coefficients, keeping the history.
    pub fn set_coeffs(&mut self, coeffs: BiquadCoeffs) {
        self.coeffs = coeffs;
    }

    /// Recomputes coefficients from settings.
    pub fn update(&mut self, settings: &BiquadSettings, fs: f32) {
        self.coeffs = BiquadCoeffs::from_settings(settings, fs);
    }

    /// Current coefficients.
    pub fn coeffs(&self) -> &BiquadCoeffs {
        &self.coeffs
    }

    /// Filters one stereo sample.
    #[inline]
    pub fn process(&mut self, x: Stereo<f32>) -> Stereo<f32> {
        Stereo::new(
            self.coeffs.process(&mut self.left, x.l),
            self.coeffs.process(&mut self.right, x.r),
        )
    }

    /// Clears both channel histories.
    pub fn clear(&mut self) {
        self.left.clear();
        self.right.clear();
    }
}
