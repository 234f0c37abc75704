//! Peak meters and display ballistics.
//!
//! The audio side accumulates peaks in [`PeakMeters`]; a display polls them
//! through [`Metered::get_and_reset_peak_level`] at its own refresh rate
//! (typically 20–30 Hz) and feeds the drained value into a
//! [`MeterBallistics`], which adds decay and peak hold.
//!
//! Inverted meters track the *quietest* value instead of the loudest. They
//! are used for gain reduction, where 1.0 means "no reduction" and smaller
//! is more.

use crate::math::linear_to_db;
use crate::stereo::Stereo;

/// Static description of one meter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeterSpec {
    /// Display label, e.g. `"IN"`.
    pub label: &'static str,
    /// Tracks the minimum instead of the maximum.
    pub inverted: bool,
    /// The display should draw a dB scale next to it.
    pub has_scale: bool,
}

impl MeterSpec {
    /// A normal (peak-tracking) meter.
    pub const fn peak(label: &'static str) -> Self {
        Self {
            label,
            inverted: false,
            has_scale: false,
        }
    }

    /// An inverted (minimum-tracking) meter.
    pub const fn inverted(label: &'static str) -> Self {
        Self {
            label,
            inverted: true,
            has_scale: true,
        }
    }

    /// Marks the meter as carrying a dB scale.
    pub const fn with_scale(mut self) -> Self {
        self.has_scale = true;
        self
    }

    /// Value a drained meter restarts from.
    #[inline]
    pub const fn rest_value(&self) -> f32 {
        if self.inverted { 1.0 } else { 0.0 }
    }
}

/// Fixed set of `M` stereo peak accumulators.
#[derive(Debug, Clone)]
pub struct PeakMeters<const M: usize> {
    specs: [MeterSpec; M],
    levels: [Stereo<f32>; M],
}

impl<const M: usize> PeakMeters<M> {
    /// Creates meters at their rest values.
    pub fn new(specs: [MeterSpec; M]) -> Self {
        let levels = specs.map(|s| Stereo::splat(s.rest_value()));
        Self { specs, levels }
    }

    /// Meter descriptions.
    pub fn specs(&self) -> &[MeterSpec; M] {
        &self.specs
    }

    /// Offers a new value to meter `idx`.
    ///
    /// Normal meters keep it when it is louder than the held value,
    /// inverted meters when it is quieter. Out-of-range indices are ignored.
    #[inline]
    pub fn update(&mut self, idx: usize, value: Stereo<f32>) {
        let (Some(spec), Some(held)) = (self.specs.get(idx), self.levels.get_mut(idx)) else {
            return;
        };
        let replace = if spec.inverted {
            value.mag_lt(*held)
        } else {
            value.mag_gt(*held)
        };
        if replace {
            *held = value;
        }
    }

    /// Returns the held value of meter `idx` and restarts it.
    ///
    /// NaN channels in the held value come back as the rest value. Unknown
    /// indices return silence.
    pub fn get_and_reset(&mut self, idx: usize) -> Stereo<f32> {
        let (Some(spec), Some(held)) = (self.specs.get(idx), self.levels.get_mut(idx)) else {
            return Stereo::ZERO;
        };
        let rest = spec.rest_value();
        let value = *held;
        *held = Stereo::splat(rest);
        value.sanitize(rest)
    }

    /// Restarts every meter.
    pub fn reset(&mut self) {
        for (level, spec) in self.levels.iter_mut().zip(self.specs.iter()) {
            *level = Stereo::splat(spec.rest_value());
        }
    }

    /// Held value without draining, for diagnostics.
    pub fn peek(&self, idx: usize) -> Option<Stereo<f32>> {
        self.levels.get(idx).copied()
    }

    /// Overwrites the held value, bypassing the peak rule.
    pub fn force(&mut self, idx: usize, value: Stereo<f32>) {
        if let Some(held) = self.levels.get_mut(idx) {
            *held = value;
        }
    }
}

/// Meter pull API exposed by every processing unit.
pub trait Metered {
    /// Number of meters.
    fn meter_count(&self) -> usize;

    /// Description of meter `idx`.
    fn meter_spec(&self, idx: usize) -> Option<MeterSpec>;

    /// Drains meter `idx`, returning the level since the last call.
    fn get_and_reset_peak_level(&mut self, idx: usize) -> Stereo<f32>;
}

/// Display-side meter ballistics.
///
/// Converts drained linear peaks into a decaying dB level with peak hold,
/// quantized into dots. Runs at the display refresh rate, not per sample.
///
/// # Example
///
/// ```rust
/// use dynamo_core::MeterBallistics;
///
/// let mut m = MeterBallistics::new(-45.0, 0.0, 15);
/// m.set_decay(1.5, 30.0);
/// m.refresh(1.0);
/// assert_eq!(m.level_db(), 0.0);
/// m.refresh(0.0);
/// assert!(m.level_db() < 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct MeterBallistics {
    min_db: f32,
    max_db: f32,
    n_dots: usize,
    inverted: bool,
    decay_db: f32,
    hold_frames: u32,
    hold_counter: u32,
    level_db: f32,
    hold_db: f32,
    active_dots: usize,
}

impl MeterBallistics {
    /// A meter spanning `[min_db, max_db]` drawn with `n_dots` dots.
    pub fn new(min_db: f32, max_db: f32, n_dots: usize) -> Self {
        Self {
            min_db,
            max_db,
            n_dots: n_dots.max(1),
            inverted: false,
            decay_db: 0.0,
            hold_frames: 0,
            hold_counter: 0,
            level_db: max_db,
            hold_db: min_db,
            active_dots: 0,
        }
    }

    /// Switches between peak and inverted (gain-reduction) behavior.
    pub fn set_inverted(&mut self, inverted: bool) {
        self.inverted = inverted;
        self.level_db = if inverted { self.min_db } else { self.max_db };
        self.hold_db = if inverted { self.max_db } else { self.min_db };
    }

    /// Full-range fall time `t_decay_s` at `refresh_hz` refreshes per second.
    pub fn set_decay(&mut self, t_decay_s: f32, refresh_hz: f32) {
        let db_per_second = (self.max_db - self.min_db) / t_decay_s;
        self.decay_db = db_per_second / refresh_hz;
    }

    /// Peak hold duration in seconds at `refresh_hz`.
    pub fn set_peak_hold(&mut self, t_hold_s: f32, refresh_hz: f32) {
        self.hold_frames = (t_hold_s * refresh_hz) as u32;
    }

    /// Advances one display frame with the latest drained linear level.
    pub fn refresh(&mut self, level_lin: f32) {
        let mut peak_db = if level_lin > 0.0 {
            linear_to_db(level_lin)
        } else {
            -100.0
        };

        if self.inverted {
            if peak_db > self.level_db {
                peak_db = self.level_db + self.decay_db;
            }
        } else if peak_db < self.level_db {
            peak_db = self.level_db - self.decay_db;
        }
        peak_db = peak_db.clamp(self.min_db, self.max_db);
        self.level_db = peak_db;

        let db_per_dot = self.db_per_dot();
        let dots = (peak_db + self.max_db - self.min_db) / db_per_dot - 1.0;
        self.active_dots = if dots > 0.0 { dots as usize } else { 0 };

        let new_hold = if self.inverted {
            peak_db < self.hold_db
        } else {
            peak_db > self.hold_db
        };
        if new_hold {
            self.hold_db = peak_db;
            self.hold_counter = 0;
        } else {
            self.hold_counter += 1;
            if self.hold_counter > self.hold_frames {
                self.hold_counter = 0;
                self.hold_db = if self.inverted { self.max_db } else { self.min_db };
            }
        }
    }

    /// Current displayed level in dB.
    pub fn level_db(&self) -> f32 {
        self.level_db
    }

    /// Current held peak in dB.
    pub fn hold_db(&self) -> f32 {
        self.hold_db
    }

    /// Number of lit dots.
    pub fn active_dots(&self) -> usize {
        self.active_dots
    }

    /// dB covered by one dot.
    pub fn db_per_dot(&self) -> f32 {
        (self.max_db - self.min_db) / self.n_dots as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meters() -> PeakMeters<3> {
        PeakMeters::new([
            MeterSpec::peak("IN"),
            MeterSpec::peak("OUT").with_scale(),
            MeterSpec::inverted("GR"),
        ])
    }

    #[test]
    fn test_peak_tracks_loudest() {
        let mut m = meters();
        m.update(0, Stereo::new(0.2, 0.1));
        m.update(0, Stereo::new(-0.7, 0.0));
        m.update(0, Stereo::new(0.3, 0.3));
        assert_eq!(m.get_and_reset(0), Stereo::new(-0.7, 0.0));
        assert_eq!(m.get_and_reset(0), Stereo::ZERO);
    }

    #[test]
    fn test_inverted_tracks_quietest() {
        let mut m = meters();
        assert_eq!(m.peek(2), Some(Stereo::ONE));
        m.update(2, Stereo::new(0.8, 0.9));
        m.update(2, Stereo::new(0.95, 0.5));
        m.update(2, Stereo::new(0.99, 0.99));
        assert_eq!(m.get_and_reset(2), Stereo::new(0.95, 0.5));
        assert_eq!(m.get_and_reset(2), Stereo::ONE);
    }

    #[test]
    fn test_out_of_range_index() {
        let mut m = meters();
        m.update(7, Stereo::ONE);
        assert_eq!(m.get_and_reset(7), Stereo::ZERO);
    }

    #[test]
    fn test_nan_drains_to_rest_value() {
        let mut m = meters();
        m.force(2, Stereo::new(f32::NAN, 0.5));
        assert_eq!(m.get_and_reset(2), Stereo::new(1.0, 0.5));
    }

    #[test]
    fn test_reset_restores_rest_values() {
        let mut m = meters();
        m.update(0, Stereo::ONE);
        m.update(2, Stereo::ZERO);
        m.reset();
        assert_eq!(m.peek(0), Some(Stereo::ZERO));
        assert_eq!(m.peek(2), Some(Stereo::ONE));
    }

    #[test]
    fn test_ballistics_decay_rate() {
        let mut b = MeterBallistics::new(-45.0, 0.0, 15);
        b.set_decay(1.5, 30.0);
        b.refresh(1.0);
        b.refresh(0.0);
        // 45 dB over 1.5 s at 30 Hz = 1 dB per frame
        assert!((b.level_db() + 1.0).abs() < 1e-4);
        for _ in 0..100 {
            b.refresh(0.0);
        }
        assert_eq!(b.level_db(), -45.0);
        assert_eq!(b.active_dots(), 0);
    }

    #[test]
    fn test_ballistics_jumps_up_immediately() {
        let mut b = MeterBallistics::new(-45.0, 0.0, 15);
        b.set_decay(1.5, 30.0);
        for _ in 0..100 {
            b.refresh(0.0);
        }
        b.refresh(0.5);
        assert!((b.level_db() - linear_to_db(0.5)).abs() < 1e-4);
    }

    #[test]
    fn test_ballistics_hold() {
        let mut b = MeterBallistics::new(-45.0, 0.0, 15);
        b.set_decay(1.5, 30.0);
        b.set_peak_hold(0.1, 30.0);
        b.refresh(1.0);
        assert_eq!(b.hold_db(), 0.0);
        for _ in 0..3 {
            b.refresh(0.0);
            assert_eq!(b.hold_db(), 0.0);
        }
        b.refresh(0.0);
        assert_eq!(b.hold_db(), -45.0);
    }

    #[test]
    fn test_ballistics_inverted() {
        let mut b = MeterBallistics::new(-24.0, 0.0, 12);
        b.set_inverted(true);
        b.set_decay(1.0, 24.0);
        // Starts at full scale reduction and recovers at the decay rate
        b.refresh(1.0);
        assert!((b.level_db() + 23.0).abs() < 1e-3);
        for _ in 0..30 {
            b.refresh(1.0);
        }
        assert_eq!(b.level_db(), 0.0);

        // More reduction shows immediately
        b.refresh(crate::math::db_to_linear(-12.0));
        assert!((b.level_db() + 12.0).abs() < 1e-3);
        // Recovery back toward 0 dB is rate limited
        b.refresh(1.0);
        assert!((b.level_db() + 11.0).abs() < 1e-3);
    }
}
