//! Clean gain stage.
//!
//! Scales both channels by a single decibel setting. No clipping, no
//! smoothing: the new gain applies from the next sample.

use dynamo_core::{
    DiagnosticChannel, MeterSpec, Metered, NonFiniteTag, ParamDescriptor, ParamId, ParameterInfo,
    PeakMeters, Stereo, StereoProcessor, db_to_linear,
};

const METERS: [MeterSpec; 2] = [MeterSpec::peak("IN"), MeterSpec::peak("OUT").with_scale()];

/// Meter index of the input meter.
pub const METER_IN: usize = 0;
/// Meter index of the output meter.
pub const METER_OUT: usize = 1;

/// Stereo gain stage.
///
/// ## Parameter Indices (`ParameterInfo`)
///
/// | Index | Name | Range | Default |
/// |-------|------|-------|---------|
/// | 0 | Gain | -24.0–24.0 dB | 0.0 |
///
/// # Example
///
/// ```rust
/// use dynamo_core::{Stereo, StereoProcessor};
/// use dynamo_effects::Gain;
///
/// let mut gain = Gain::new(48000.0);
/// gain.set_gain_db(-6.0);
/// let y = gain.process_sample(Stereo::splat(1.0));
/// assert!((y.l - 0.501).abs() < 1e-3);
/// ```
#[derive(Debug, Clone)]
pub struct Gain {
    gain_db: f32,
    gain_lin: f32,
    meters: PeakMeters<2>,
    diagnostics: DiagnosticChannel,
}

impl Gain {
    /// Create a unity gain stage.
    ///
    /// The sample rate is accepted for a uniform constructor; gain does not
    /// depend on it.
    pub fn new(_sample_rate: f32) -> Self {
        Self {
            gain_db: 0.0,
            gain_lin: 1.0,
            meters: PeakMeters::new(METERS),
            diagnostics: DiagnosticChannel::new(),
        }
    }

    /// Set gain in dB.
    pub fn set_gain_db(&mut self, gain_db: f32) {
        self.set_param(0, gain_db);
    }

    /// Current gain in dB.
    pub fn gain_db(&self) -> f32 {
        self.gain_db
    }

    /// Non-finite diagnostics for this unit.
    pub fn diagnostics_mut(&mut self) -> &mut DiagnosticChannel {
        &mut self.diagnostics
    }
}

impl Default for Gain {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

impl StereoProcessor for Gain {
    #[inline]
    fn process_sample(&mut self, x: Stereo<f32>) -> Stereo<f32> {
        self.diagnostics.check(NonFiniteTag::InputLeft, x.l);
        self.diagnostics.check(NonFiniteTag::InputRight, x.r);
        let x = x.sanitize(0.0);
        let y = x * self.gain_lin;
        self.meters.update(METER_IN, x);
        self.meters.update(METER_OUT, y);
        y
    }

    fn update_coeffs(&mut self) {
        self.gain_lin = db_to_linear(self.gain_db);
    }

    fn reset(&mut self, _sample_rate: f32) {
        self.meters.reset();
        self.update_coeffs();
    }
}

impl Metered for Gain {
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

impl ParameterInfo for Gain {
    fn param_count(&self) -> usize {
        1
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        match index {
            0 => Some(
                ParamDescriptor::gain_db("Gain", "Gain", -24.0, 24.0, 0.0)
                    .with_step(0.1)
                    .with_id(ParamId(300), "gain_db"),
            ),
            _ => None,
        }
    }

    fn get_param(&self, index: usize) -> f32 {
        match index {
            0 => self.gain_db,
            _ => 0.0,
        }
    }

    fn set_param(&mut self, index: usize, value: f32) {
        let Some(desc) = self.param_info(index) else {
            return;
        };
        self.gain_db = desc.quantize(value);
        self.update_coeffs();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unity_by_default() {
        let mut gain = Gain::new(48000.0);
        let x = Stereo::new(0.3, -0.7);
        assert_eq!(gain.process_sample(x), x);
    }

    #[test]
    fn test_gain_applies() {
        let mut gain = Gain::new(48000.0);
        gain.set_gain_db(6.0);
        let y = gain.process_sample(Stereo::new(0.25, -0.25));
        assert!((y.l - 0.25 * db_to_linear(6.0)).abs() < 1e-6);
        assert!((y.r + 0.25 * db_to_linear(6.0)).abs() < 1e-6);
    }

    #[test]
    fn test_clamped_to_range() {
        let mut gain = Gain::new(48000.0);
        gain.set_param(0, 60.0);
        assert_eq!(gain.gain_db(), 24.0);
        gain.set_param(0, -60.0);
        assert_eq!(gain.gain_db(), -24.0);
    }

    #[test]
    fn test_lookup_by_string_id() {
        let gain = Gain::new(48000.0);
        assert_eq!(gain.find_param_by_name("gain_db"), Some(0));
        assert_eq!(gain.find_param_by_name("GAIN"), Some(0));
        assert_eq!(gain.param_info(1), None);
    }

    #[test]
    fn test_meters_track_in_and_out() {
        let mut gain = Gain::new(48000.0);
        gain.set_gain_db(-6.0);
        gain.process_sample(Stereo::splat(0.8));
        let held_in = gain.get_and_reset_peak_level(METER_IN);
        let held_out = gain.get_and_reset_peak_level(METER_OUT);
        assert_eq!(held_in, Stereo::splat(0.8));
        assert!(held_out.l < held_in.l);
        assert_eq!(gain.get_and_reset_peak_level(METER_OUT), Stereo::ZERO);
    }

    #[test]
    fn test_nan_input_is_silenced() {
        let mut gain = Gain::new(48000.0);
        gain.diagnostics_mut().set_enabled(true);
        let y = gain.process_sample(Stereo::new(f32::NAN, 0.5));
        assert_eq!(y, Stereo::new(0.0, 0.5));
        assert_eq!(gain.diagnostics_mut().take(), Some(NonFiniteTag::InputLeft));
    }
}
