//! Stereo modulation oscillator for tape wow and flutter.
//!
//! A deterministic phase accumulator feeds a closed-form triangle, so the
//! modulation is reproducible sample for sample and needs no wavetable. The
//! right channel runs at a fixed phase offset from the left for stereo width.

use core::f32::consts::{PI, TAU};
use libm::{asinf, fmodf, sinf};

use crate::math::hz_to_omega;

/// Closed-form triangle with period `2π` and range `[-1, 1]`.
///
/// `saw(0) = 0`, peaks at `π/2` and troughs at `3π/2`.
#[inline]
pub fn saw(theta: f32) -> f32 {
    (2.0 / PI) * asinf(sinf(theta))
}

/// Phase accumulator producing a left/right pair of [`saw`] values.
///
/// # Example
///
/// ```rust
/// use dynamo_core::ModOscillator;
///
/// let mut osc = ModOscillator::new();
/// osc.set_frequency(1.0, 48000.0);
/// osc.set_phase_offset_deg(90.0);
/// let (l, r) = osc.next();
/// assert_eq!(l, 0.0);
/// assert!((r - 1.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ModOscillator {
    /// Current phase in `[0, 2π)`
    phase: f32,
    /// Phase increment per sample in radians
    phase_inc: f32,
    /// Right-channel phase offset in radians
    offset: f32,
}

impl ModOscillator {
    /// Oscillator at rest (zero frequency, zero offset).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the rate in Hz at `sample_rate`.
    pub fn set_frequency(&mut self, freq_hz: f32, sample_rate: f32) {
        self.phase_inc = if sample_rate > 0.0 {
            hz_to_omega(freq_hz, sample_rate)
        } else {
            0.0
        };
    }

    /// Set the right-channel phase offset in degrees.
    pub fn set_phase_offset_deg(&mut self, deg: f32) {
        self.offset = deg * PI / 180.0;
    }

    /// Phase increment per sample in radians.
    pub fn phase_inc(&self) -> f32 {
        self.phase_inc
    }

    /// Current phase in radians.
    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Rewind to phase 0.
    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    /// Return `(saw(θ), saw(θ + offset))` for the current phase, then advance.
    #[inline]
    pub fn next(&mut self) -> (f32, f32) {
        let out = (saw(self.phase), saw(self.phase + self.offset));
        self.phase += self.phase_inc;
        if self.phase >= TAU {
            self.phase = fmodf(self.phase, TAU);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_saw_shape() {
        assert_eq!(saw(0.0), 0.0);
        assert!((saw(PI / 2.0) - 1.0).abs() < 1e-6);
        assert!((saw(3.0 * PI / 2.0) + 1.0).abs() < 1e-6);
        assert!((saw(PI / 4.0) - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_saw_bounded() {
        for i in 0..1000 {
            let v = saw(i as f32 * 0.037);
            assert!((-1.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn test_phase_wraps() {
        let mut osc = ModOscillator::new();
        osc.set_frequency(1000.0, 48000.0);
        for _ in 0..100_000 {
            osc.next();
            assert!(osc.phase() >= 0.0 && osc.phase() < TAU);
        }
    }

    #[test]
    fn test_period() {
        let mut osc = ModOscillator::new();
        osc.set_frequency(1.0, 100.0);
        let first: Vec<f32> = (0..100).map(|_| osc.next().0).collect();
        let second: Vec<f32> = (0..100).map(|_| osc.next().0).collect();
        for (a, b) in first.iter().zip(&second) {
            assert!((a - b).abs() < 1e-3);
        }
    }

    #[test]
    fn test_offset_applies_to_right_only() {
        let mut osc = ModOscillator::new();
        osc.set_phase_offset_deg(180.0);
        osc.set_frequency(1.0, 4.0);
        osc.next();
        let (l, r) = osc.next();
        assert!((l - 1.0).abs() < 1e-6);
        assert!((r + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_rate_is_static() {
        let mut osc = ModOscillator::new();
        osc.set_frequency(2.0, 0.0);
        assert_eq!(osc.next(), (0.0, 0.0));
        assert_eq!(osc.next(), (0.0, 0.0));
    }
}
