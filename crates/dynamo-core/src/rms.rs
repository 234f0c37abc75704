//! Running-sum RMS level sensor.
//!
//! Keeps the last `n` squared samples in a circular buffer and a running
//! sum of them, so each new sample costs one add and one subtract no matter
//! how long the window is. The window length can change at any time up to
//! [`RMS_MAX_WINDOW`] samples without reallocating.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec;
use alloc::vec::Vec;

use crate::delay::{MAX_OVERSAMPLING, MAX_SAMPLE_RATE};
use crate::math::sanitize;

/// Longest RMS window in milliseconds.
pub const RMS_MAX_TIME_MS: f32 = 80.0;

/// Capacity of the sensor's circular buffer in samples.
///
/// Covers [`RMS_MAX_TIME_MS`] at the highest oversampled rate a unit can
/// run at.
pub const RMS_MAX_WINDOW: usize =
    RMS_MAX_TIME_MS as usize * MAX_SAMPLE_RATE as usize / 1000 * MAX_OVERSAMPLING;

/// Circular-buffer RMS estimator.
///
/// The output is scaled by `sqrt(2)` so a full-scale sine reads as 1.0,
/// matching a peak detector on the same signal.
///
/// # Example
///
/// ```rust
/// use dynamo_core::RmsSensor;
///
/// let mut rms = RmsSensor::new();
/// let mut level = 0.0;
/// for i in 0..4800 {
///     let x = libm::sinf(i as f32 * 0.1);
///     level = rms.process(480, x);
/// }
/// assert!((level - 1.0).abs() < 0.05);
/// ```
#[derive(Debug, Clone)]
pub struct RmsSensor {
    buffer: Vec<f32>,
    accum: f32,
    index: usize,
}

impl RmsSensor {
    /// Creates a sensor with a zeroed buffer of [`RMS_MAX_WINDOW`] samples.
    pub fn new() -> Self {
        Self {
            buffer: vec![0.0; RMS_MAX_WINDOW],
            accum: 0.0,
            index: 0,
        }
    }

    /// Feeds one sample and returns the RMS level over the last `n_rms` samples.
    ///
    /// Returns 0.0 when `n_rms` is zero or larger than [`RMS_MAX_WINDOW`].
    #[inline]
    pub fn process(&mut self, n_rms: usize, x: f32) -> f32 {
        if n_rms == 0 || n_rms > RMS_MAX_WINDOW {
            return 0.0;
        }
        let sq = sanitize(x * x, 0.0);
        // index can sit beyond a window that was just shortened
        let i = self.index.min(RMS_MAX_WINDOW - 1);
        self.accum += sq - self.buffer[i];
        self.buffer[i] = sq;
        self.index = i + 1;
        if self.index >= n_rms {
            self.index = 0;
        }
        let y = libm::sqrtf(2.0 * self.accum / n_rms as f32);
        sanitize(y, 0.0)
    }

    /// Zeroes the buffer and the running sum.
    pub fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.accum = 0.0;
        self.index = 0;
    }
}

impl Default for RmsSensor {
    fn default() -> Self {
        Self::new()
    }
}
