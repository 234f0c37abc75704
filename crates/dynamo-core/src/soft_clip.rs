//! Odd-order polynomial soft clipper.
//!
//! The polynomial of order `2N+1` with coefficients
//!
//! ```text
//! a_n = (-1)^n (2N+1)! / (4^N N! (2n+1) n! (N-n)!)
//! ```
//!
//! is the integral of `(1 - u²)^N`, normalized so that it reaches exactly 1
//! at `u = 1` with all its first `N` derivatives zero there. The input is
//! scaled by `1/a0` so the curve has unity slope at the origin, and anything
//! beyond the knee is hard-limited to ±1.
//!
//! | Type | Order | Coefficients |
//! |------|-------|--------------|
//! | [`SoftClip3`] | 3rd | `[1.5, -0.5]` |
//! | [`SoftClip5`] | 5th | `[1.875, -1.25, 0.375]` |

use crate::stereo::Stereo;

/// Soft clipper with `M` polynomial coefficients (order `2M - 1`).
///
/// Coefficients are computed once at construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoftClip<const M: usize> {
    coeffs: [f32; M],
}

/// Third-order soft clipper.
pub type SoftClip3 = SoftClip<2>;

/// Fifth-order soft clipper.
pub type SoftClip5 = SoftClip<3>;

impl<const M: usize> SoftClip<M> {
    /// Computes the coefficients for order `2M - 1`.
    pub fn new() -> Self {
        let big_n = M.saturating_sub(1);
        let mut coeffs = [0.0_f32; M];
        let numerator = factorial(2 * big_n + 1);
        let four_pow = libm::pow(4.0, big_n as f64);
        for (n, c) in coeffs.iter_mut().enumerate() {
            let sign = if n % 2 == 0 { 1.0 } else { -1.0 };
            let denom = four_pow
                * factorial(big_n)
                * (2 * n + 1) as f64
                * factorial(n)
                * factorial(big_n - n);
            *c = (sign * numerator / denom) as f32;
        }
        Self { coeffs }
    }

    /// The polynomial coefficients, lowest order first.
    pub fn coeffs(&self) -> &[f32; M] {
        &self.coeffs
    }

    /// Clips one sample.
    #[inline]
    pub fn process(&self, x: f32) -> f32 {
        let u = x / self.coeffs[0];
        if u > 1.0 {
            return 1.0;
        }
        if u < -1.0 {
            return -1.0;
        }
        let u2 = u * u;
        // Horner in u², then one final multiply by u
        let mut acc = 0.0;
        for &c in self.coeffs.iter().rev() {
            acc = acc * u2 + c;
        }
        acc * u
    }

    /// Clips both channels.
    #[inline]
    pub fn process_stereo(&self, x: Stereo<f32>) -> Stereo<f32> {
        Stereo::new(self.process(x.l), self.process(x.r))
    }
}

impl<const M: usize> Default for SoftClip<M> {
    fn default() -> Self {
        Self::new()
    }
}

fn factorial(n: usize) -> f64 {
    (1..=n).fold(1.0, |acc, k| acc * k as f64)
}
