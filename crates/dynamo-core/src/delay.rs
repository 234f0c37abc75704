//! Stereo circular delay line for the tape echo.
//!
//! The buffer is sized once in the constructor for the worst case the owner
//! will ever ask for and is never reallocated, so the audio path only moves
//! indices. Reads are whole-sample: the tape echo's wow and flutter comes
//! from stepping the integer read offset, not from fractional reads.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec;
use alloc::vec::Vec;

use crate::stereo::Stereo;

/// Highest base sample rate the tape echo is sized for.
pub const MAX_SAMPLE_RATE: f32 = 192_000.0;

/// Highest oversampling factor the tape echo is sized for.
pub const MAX_OVERSAMPLING: usize = 8;

/// Longest delay time in seconds.
pub const MAX_DELAY_SECONDS: f32 = 2.0;

/// Fixed-capacity circular buffer of stereo samples.
///
/// # Invariants
///
/// - The write index is always `< capacity`.
/// - A read `d` samples back addresses `(write - d) mod capacity`; `d = 0`
///   returns the sample just written.
///
/// # Example
///
/// ```rust
/// use dynamo_core::{Stereo, StereoDelayLine};
///
/// let mut dl = StereoDelayLine::new(8);
/// dl.push(Stereo::splat(1.0));
/// dl.push(Stereo::splat(2.0));
/// assert_eq!(dl.read(0), Stereo::splat(2.0));
/// assert_eq!(dl.read(1), Stereo::splat(1.0));
/// ```
#[derive(Debug, Clone)]
pub struct StereoDelayLine {
    buffer: Vec<Stereo<f32>>,
    write_pos: usize,
}

impl StereoDelayLine {
    /// Create a delay line holding `capacity` samples (at least one).
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: vec![Stereo::ZERO; capacity.max(1)],
            write_pos: 0,
        }
    }

    /// Capacity for `max_seconds` of delay at `sample_rate`, plus `headroom`
    /// extra samples.
    pub fn capacity_for(sample_rate: f32, max_seconds: f32, headroom: usize) -> usize {
        libm::ceilf(sample_rate * max_seconds) as usize + headroom + 1
    }

    /// Number of samples the line holds.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Largest delay that can be read back without aliasing the write.
    pub fn max_delay(&self) -> usize {
        self.buffer.len() - 1
    }

    /// Advance the write index, then store `x` there.
    #[inline]
    pub fn push(&mut self, x: Stereo<f32>) {
        self.write_pos += 1;
        if self.write_pos >= self.buffer.len() {
            self.write_pos = 0;
        }
        self.buffer[self.write_pos] = x;
    }

    #[inline]
    fn index(&self, delay: usize) -> usize {
        let len = self.buffer.len();
        let d = delay % len;
        if d > self.write_pos {
            self.write_pos + len - d
        } else {
            self.write_pos - d
        }
    }

    /// Read both channels `delay` samples back.
    #[inline]
    pub fn read(&self, delay: usize) -> Stereo<f32> {
        self.buffer[self.index(delay)]
    }

    /// Read the left channel `delay_l` and the right channel `delay_r` back.
    #[inline]
    pub fn read_split(&self, delay_l: usize, delay_r: usize) -> Stereo<f32> {
        Stereo::new(
            self.buffer[self.index(delay_l)].l,
            self.buffer[self.index(delay_r)].r,
        )
    }

    /// Zero the buffer and rewind the write index.
    pub fn clear(&mut self) {
        self.buffer.fill(Stereo::ZERO);
        self.write_pos = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_back() {
        let mut dl = StereoDelayLine::new(16);
        for i in 0..10 {
            dl.push(Stereo::splat(i as f32));
        }
        assert_eq!(dl.read(0), Stereo::splat(9.0));
        assert_eq!(dl.read(3), Stereo::splat(6.0));
        assert_eq!(dl.read(9), Stereo::splat(0.0));
    }

    #[test]
    fn test_wraps() {
        let mut dl = StereoDelayLine::new(4);
        for i in 0..11 {
            dl.push(Stereo::splat(i as f32));
        }
        assert_eq!(dl.read(0), Stereo::splat(10.0));
        assert_eq!(dl.read(3), Stereo::splat(7.0));
        // A delay of a full capacity reads the current slot
        assert_eq!(dl.read(4), Stereo::splat(10.0));
    }

    #[test]
    fn test_split_read() {
        let mut dl = StereoDelayLine::new(8);
        dl.push(Stereo::new(1.0, -1.0));
        dl.push(Stereo::new(2.0, -2.0));
        dl.push(Stereo::new(3.0, -3.0));
        assert_eq!(dl.read_split(0, 2), Stereo::new(3.0, -1.0));
    }

    #[test]
    fn test_clear() {
        let mut dl = StereoDelayLine::new(8);
        dl.push(Stereo::splat(1.0));
        dl.clear();
        for d in 0..8 {
            assert_eq!(dl.read(d), Stereo::ZERO);
        }
    }

    #[test]
    fn test_zero_capacity_clamped() {
        let mut dl = StereoDelayLine::new(0);
        assert_eq!(dl.capacity(), 1);
        dl.push(Stereo::splat(0.5));
        assert_eq!(dl.read(0), Stereo::splat(0.5));
    }

    #[test]
    fn test_capacity_for() {
        assert_eq!(StereoDelayLine::capacity_for(48000.0, 2.0, 10), 96011);
    }
}
