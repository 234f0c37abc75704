//! Window functions and window-method FIR design.
//!
//! Only available with the `std` feature: design allocates and runs an FFT,
//! so it belongs on the control thread (oversampling mode or sample-rate
//! change), never on the audio path.
//!
//! Cosine-sum windows take a `symmetric` flag. Symmetric windows divide the
//! phase by `n - 1` and are what filter design uses for a linear-phase kernel;
//! periodic windows divide by `n` and tile seamlessly for spectral analysis.

use std::f64::consts::PI;
use std::vec;
use std::vec::Vec;

use rustfft::{FftPlanner, num_complex::Complex};

const HANN: [f64; 2] = [0.5, -0.5];
const HAMMING: [f64; 2] = [0.54, -0.46];
const BLACKMAN: [f64; 3] = [0.42, -0.5, 0.08];
const BLACKMAN_HARRIS: [f64; 4] = [0.35875, -0.48829, 0.14128, -0.01168];
const NUTTALL: [f64; 4] = [0.363_581_9, -0.489_177_5, 0.136_599_5, -0.010_641_1];
const FLAT_TOP: [f64; 5] = [
    0.215_578_95,
    -0.416_631_58,
    0.277_263_158,
    -0.083_578_947,
    0.006_947_368,
];

/// Window shapes available to [`Window::coefficients`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Window {
    /// All ones.
    Rectangular,
    /// Raised cosine.
    Hann,
    /// Hamming.
    Hamming,
    /// Three-term Blackman.
    Blackman,
    /// Four-term Blackman-Harris.
    BlackmanHarris,
    /// Four-term Nuttall.
    Nuttall,
    /// Five-term flat top (amplitude-accurate).
    FlatTop,
    /// Triangle that does not reach zero at the ends.
    Triangular,
    /// Triangle with zero end points.
    Bartlett,
    /// Gaussian with width parameter `alpha` (larger is narrower).
    Gaussian(f64),
    /// Tapered cosine; `0` is rectangular, `1` is Hann.
    Tukey(f64),
}

impl Window {
    /// Generate `n` window coefficients.
    ///
    /// `symmetric` only affects the cosine-sum family.
    pub fn coefficients(self, n: usize, symmetric: bool) -> Vec<f32> {
        let w = match self {
            Window::Rectangular => vec![1.0; n],
            Window::Hann => cosine_window(n, &HANN, symmetric),
            Window::Hamming => cosine_window(n, &HAMMING, symmetric),
            Window::Blackman => cosine_window(n, &BLACKMAN, symmetric),
            Window::BlackmanHarris => cosine_window(n, &BLACKMAN_HARRIS, symmetric),
            Window::Nuttall => cosine_window(n, &NUTTALL, symmetric),
            Window::FlatTop => cosine_window(n, &FLAT_TOP, symmetric),
            Window::Triangular => triangular(n),
            Window::Bartlett => bartlett(n),
            Window::Gaussian(alpha) => gaussian(n, alpha),
            Window::Tukey(r) => tukey(n, r),
        };
        w.into_iter().map(|v| v as f32).collect()
    }
}

/// Generic cosine-sum window: `w[i] = Σ a[j]·cos(2π·i·j / L)` with
/// `L = n - 1` (symmetric) or `L = n` (periodic).
fn cosine_window(n: usize, coeffs: &[f64], symmetric: bool) -> Vec<f64> {
    if n == 1 {
        return vec![1.0];
    }
    let len = (if symmetric { n - 1 } else { n }) as f64;
    (0..n)
        .map(|i| {
            coeffs
                .iter()
                .enumerate()
                .map(|(j, a)| a * (2.0 * PI * (i * j) as f64 / len).cos())
                .sum()
        })
        .collect()
}

fn triangular(n: usize) -> Vec<f64> {
    let denom = (if n % 2 == 1 { n + 1 } else { n }) as f64;
    (0..n)
        .map(|i| 1.0 - (2.0 * i as f64 - (n as f64 - 1.0)).abs() / denom)
        .collect()
}

fn bartlett(n: usize) -> Vec<f64> {
    if n == 1 {
        return vec![1.0];
    }
    let denom = (n - 1) as f64;
    (0..n)
        .map(|i| 1.0 - (2.0 * i as f64 - denom).abs() / denom)
        .collect()
}

fn gaussian(n: usize, alpha: f64) -> Vec<f64> {
    if n == 1 {
        return vec![1.0];
    }
    let half = (n - 1) as f64;
    (0..n)
        .map(|i| {
            let ax = alpha * (2.0 * i as f64 - half).abs() / half;
            (-0.5 * ax * ax).exp()
        })
        .collect()
}

fn tukey(n: usize, r: f64) -> Vec<f64> {
    if n == 1 {
        return vec![1.0];
    }
    let r = r.clamp(0.0, 1.0);
    if r == 0.0 {
        return vec![1.0; n];
    }
    let half = (n - 1) as f64;
    (0..n)
        .map(|i| {
            let x = (i as f64 - half / 2.0).abs() * (2.0 / half / r) - (1.0 / r - 1.0);
            ((x.max(0.0) * PI).cos() + 1.0) / 2.0
        })
        .collect()
}

/// Ideal low-pass magnitude response on an `n`-bin FFT grid.
///
/// Bins below `ceil(fc / Δf)` and from `ceil((fs - fc) / Δf)` upward are 1,
/// everything else 0, with `Δf = fs / n`.
pub fn brick_wall_response(fc: f32, n: usize, fs: f32) -> Vec<f32> {
    let hz_per_bin = f64::from(fs) / n as f64;
    let fc = f64::from(fc);
    let pass_end = ((fc / hz_per_bin).ceil() as usize).min(n);
    let image_start = (((f64::from(fs) - fc) / hz_per_bin).ceil().max(0.0) as usize).min(n);

    let mut resp = vec![0.0; n];
    resp[..pass_end].fill(1.0);
    resp[image_start..].fill(1.0);
    resp
}

/// Design an `n`-tap low-pass FIR by the frequency-sampling window method.
///
/// The brick-wall response from [`brick_wall_response`] is inverse
/// transformed, circularly shifted by `n / 2` to centre the impulse, and
/// tapered with a periodic Hann window. The result has unity DC gain
/// whenever the pass band covers at least bin 1.
///
/// Returns an empty vector for `n == 0`.
pub fn window_method(fc: f32, n: usize, fs: f32) -> Vec<f32> {
    if n == 0 {
        return Vec::new();
    }

    let mut spectrum: Vec<Complex<f64>> = brick_wall_response(fc, n, fs)
        .into_iter()
        .map(|v| Complex::new(f64::from(v), 0.0))
        .collect();

    let mut planner = FftPlanner::<f64>::new();
    planner.plan_fft_inverse(n).process(&mut spectrum);

    let scale = 1.0 / n as f64;
    let mut taps: Vec<f64> = spectrum.iter().map(|c| c.re * scale).collect();
    taps.rotate_left(n / 2);

    let hann = cosine_window(n, &HANN, false);
    taps.iter()
        .zip(hann)
        .map(|(t, w)| (t * w) as f32)
        .collect()
}
