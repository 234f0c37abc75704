//! Processing chain built from presets.
//!
//! [`EffectChain`] runs a list of [`EffectUnit`]s in series with per-entry
//! bypass. It is itself a [`StereoProcessor`], so the whole chain sits
//! inside one [`Oversampler`]; [`build_processor`] does that from a preset.
//!
//! # Example
//!
//! ```rust
//! use dynamo_config::{EffectConfig, Preset, build_processor};
//! use dynamo_core::{OversamplingMode, Stereo, StereoProcessor};
//!
//! let preset = Preset::new("Leveler")
//!     .with_oversampling(OversamplingMode::Fir2xHq)
//!     .with_effect(EffectConfig::new("compressor").with_param("threshold", "-18dB"))
//!     .with_effect(EffectConfig::new("gain").with_param("gain", "-3dB"));
//!
//! let mut processor = build_processor(&preset, 48000.0).unwrap();
//! let y = processor.process_sample(Stereo::splat(0.5));
//! assert!(y.l.is_finite());
//! ```

use dynamo_core::{Oversampler, Stereo, StereoProcessor};
use dynamo_effects::{EffectKind, EffectUnit};

use crate::effect_config::EffectConfig;
use crate::error::ConfigError;
use crate::preset::Preset;
use crate::validation::{apply_params, validate_effect};

/// An entry in the chain.
#[derive(Debug, Clone)]
struct ChainEntry {
    unit: EffectUnit,
    bypassed: bool,
}

/// Units processed in series, each optionally bypassed.
///
/// Bypassed units are skipped entirely and contribute no latency, but still
/// follow tempo and reset so they come back in a clean state.
#[derive(Debug, Clone)]
pub struct EffectChain {
    entries: Vec<ChainEntry>,
    sample_rate: f32,
    max_sample_rate: f32,
}

impl EffectChain {
    /// Create an empty chain.
    ///
    /// Units added later run at `sample_rate` and have buffers sized for
    /// `max_sample_rate`.
    pub fn new(sample_rate: f32, max_sample_rate: f32) -> Self {
        Self {
            entries: Vec::new(),
            sample_rate,
            max_sample_rate: max_sample_rate.max(sample_rate),
        }
    }

    /// Create a chain from the units of a preset.
    ///
    /// Units are sized for the preset's oversampled rate, `sample_rate`
    /// times the oversampling factor. All problems are reported together.
    pub fn from_preset(preset: &Preset, sample_rate: f32) -> Result<Self, ConfigError> {
        let mode = preset.oversampling_mode()?;
        let inner_rate = sample_rate * mode.factor() as f32;
        let mut chain = Self::new(inner_rate, inner_rate);

        let mut errors = Vec::new();
        for config in &preset.effects {
            match chain.add_effect_config(config) {
                Ok(()) => {}
                Err(ConfigError::Multiple(inner)) => errors.extend(inner),
                Err(e) => errors.push(e),
            }
        }
        match ConfigError::collect(errors) {
            None => Ok(chain),
            Some(e) => Err(e),
        }
    }

    /// Append a unit configured from `config`.
    ///
    /// Nothing is appended if the type or any parameter is invalid.
    pub fn add_effect_config(&mut self, config: &EffectConfig) -> Result<(), ConfigError> {
        let kind = validate_effect(&config.effect_type)?;
        let mut unit = kind.create_for(self.sample_rate, self.max_sample_rate);
        apply_params(&mut unit, config)?;
        #[cfg(feature = "tracing")]
        tracing::debug!(
            effect = kind.id(),
            params = config.params.len(),
            bypassed = config.bypassed,
            "added unit to chain"
        );
        self.entries.push(ChainEntry {
            unit,
            bypassed: config.bypassed,
        });
        Ok(())
    }

    /// Append a unit with default parameters.
    pub fn add_effect(&mut self, kind: EffectKind) {
        self.entries.push(ChainEntry {
            unit: kind.create_for(self.sample_rate, self.max_sample_rate),
            bypassed: false,
        });
    }

    /// Current sample rate of the units.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Get the number of units in the chain.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the chain is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Unit types for display, with `!` on bypassed entries.
    pub fn effect_types(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|e| {
                let id = e.unit.kind().id();
                if e.bypassed { format!("!{id}") } else { id.to_string() }
            })
            .collect()
    }

    /// Check if the unit at `index` is bypassed.
    pub fn is_bypassed(&self, index: usize) -> Option<bool> {
        self.entries.get(index).map(|e| e.bypassed)
    }

    /// Set the bypass state of the unit at `index`.
    ///
    /// Returns `false` if the index is out of range.
    pub fn set_bypassed(&mut self, index: usize, bypassed: bool) -> bool {
        match self.entries.get_mut(index) {
            Some(entry) => {
                entry.bypassed = bypassed;
                true
            }
            None => false,
        }
    }

    /// Get the unit at `index`.
    pub fn get(&self, index: usize) -> Option<&EffectUnit> {
        self.entries.get(index).map(|e| &e.unit)
    }

    /// Get the unit at `index` mutably, for parameter writes and meters.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut EffectUnit> {
        self.entries.get_mut(index).map(|e| &mut e.unit)
    }

    /// Iterate over the units, bypassed or not.
    pub fn units_mut(&mut self) -> impl Iterator<Item = &mut EffectUnit> {
        self.entries.iter_mut().map(|e| &mut e.unit)
    }
}

impl StereoProcessor for EffectChain {
    fn process_sample(&mut self, x: Stereo<f32>) -> Stereo<f32> {
        let mut y = x;
        for entry in &mut self.entries {
            if !entry.bypassed {
                y = entry.unit.process_sample(y);
            }
        }
        y
    }

    fn update_coeffs(&mut self) {
        for entry in &mut self.entries {
            entry.unit.update_coeffs();
        }
    }

    fn reset(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        for entry in &mut self.entries {
            entry.unit.reset(sample_rate);
        }
    }

    fn set_tempo(&mut self, bpm: f32) {
        for entry in &mut self.entries {
            entry.unit.set_tempo(bpm);
        }
    }

    fn latency_samples(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| !e.bypassed)
            .map(|e| e.unit.latency_samples())
            .sum()
    }
}

/// Build the complete processor for a preset: its chain inside an
/// oversampler set to the preset's mode, with the preset tempo applied.
///
/// `sample_rate` is the host (file) rate.
pub fn build_processor(
    preset: &Preset,
    sample_rate: f32,
) -> Result<Oversampler<EffectChain>, ConfigError> {
    let mode = preset.oversampling_mode()?;
    let chain = EffectChain::from_preset(preset, sample_rate)?;
    let mut processor = Oversampler::new(chain);
    processor.set_mode(mode, sample_rate);
    if let Some(bpm) = preset.tempo {
        processor.set_tempo(bpm);
    }
    Ok(processor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dynamo_core::{OversamplingMode, ParameterInfo, db_to_linear};

    const SAMPLE_RATE: f32 = 48000.0;

    #[test]
    fn test_empty_chain_passes_through() {
        let mut chain = EffectChain::new(SAMPLE_RATE, SAMPLE_RATE);
        assert!(chain.is_empty());
        let x = Stereo::new(0.5, -0.25);
        assert_eq!(chain.process_sample(x), x);
        assert_eq!(chain.latency_samples(), 0);
    }

    #[test]
    fn test_gain_entries_multiply() {
        let preset = Preset::new("Two gains")
            .with_effect(EffectConfig::new("gain").with_param("gain", "-6"))
            .with_effect(EffectConfig::new("gain").with_param("gain", "-6"));
        let mut chain = EffectChain::from_preset(&preset, SAMPLE_RATE).unwrap();
        assert_eq!(chain.len(), 2);

        let y = chain.process_sample(Stereo::splat(0.5));
        assert!((y.l - 0.5 * db_to_linear(-12.0)).abs() < 1e-6);
    }

    #[test]
    fn test_bypass_skips_unit() {
        let preset = Preset::new("Bypass")
            .with_effect(EffectConfig::new("gain").with_param("gain", "-6"))
            .with_effect(EffectConfig::new("!gain").with_param("gain", "-6"));
        let mut chain = EffectChain::from_preset(&preset, SAMPLE_RATE).unwrap();
        assert_eq!(chain.effect_types(), vec!["gain", "!gain"]);
        assert_eq!(chain.is_bypassed(1), Some(true));

        let y = chain.process_sample(Stereo::splat(0.5));
        assert!((y.l - 0.5 * db_to_linear(-6.0)).abs() < 1e-6);

        assert!(chain.set_bypassed(1, false));
        let y = chain.process_sample(Stereo::splat(0.5));
        assert!((y.l - 0.5 * db_to_linear(-12.0)).abs() < 1e-6);

        assert!(!chain.set_bypassed(99, true));
        assert_eq!(chain.is_bypassed(99), None);
    }

    #[test]
    fn test_from_preset_reports_every_problem() {
        let preset = Preset::new("Broken")
            .with_effect(EffectConfig::new("reverb"))
            .with_effect(EffectConfig::new("compressor").with_param("ratio", "0.5"));
        let Err(ConfigError::Multiple(errors)) = EffectChain::from_preset(&preset, SAMPLE_RATE) else {
            panic!("expected multiple errors");
        };
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_from_preset_uses_oversampled_rate() {
        let preset = Preset::new("4x")
            .with_oversampling(OversamplingMode::Fir4xLq)
            .with_effect(EffectConfig::new("compressor"));
        let chain = EffectChain::from_preset(&preset, SAMPLE_RATE).unwrap();
        assert_eq!(chain.sample_rate(), 4.0 * SAMPLE_RATE);
    }

    #[test]
    fn test_params_applied_from_config() {
        let preset = Preset::new("Params").with_effect(
            EffectConfig::new("compressor")
                .with_param("threshold", "-24dB")
                .with_param("link", "on"),
        );
        let chain = EffectChain::from_preset(&preset, SAMPLE_RATE).unwrap();
        let comp = chain.get(0).unwrap();
        assert_eq!(comp.get_param(0), -24.0);
        assert_eq!(comp.get_param(13), 1.0);
    }

    #[test]
    fn test_build_processor_applies_mode_and_tempo() {
        let preset = Preset::new("Synced")
            .with_oversampling(OversamplingMode::Fir2xHq)
            .with_tempo(120.0)
            .with_effect(EffectConfig::new("tape-echo").with_param("sync", "on"));
        let processor = build_processor(&preset, SAMPLE_RATE).unwrap();
        assert_eq!(processor.mode(), OversamplingMode::Fir2xHq);
        assert!(processor.latency_samples() > 0);

        let EffectUnit::TapeEcho(echo) = processor.inner().get(0).unwrap() else {
            panic!("expected tape echo");
        };
        assert!((echo.time_seconds() - 0.5).abs() < 1e-6);
        assert_eq!(echo.target_delay_samples(), (0.5 * 2.0 * SAMPLE_RATE) as usize);
    }

    #[test]
    fn test_build_processor_rejects_unknown_mode() {
        let mut preset = Preset::new("Bad mode");
        preset.oversampling = "fir_3x".to_string();
        assert!(matches!(
            build_processor(&preset, SAMPLE_RATE),
            Err(ConfigError::UnknownOversampling(_))
        ));
    }

    #[test]
    fn test_reset_reaches_units() {
        let mut chain = EffectChain::new(SAMPLE_RATE, SAMPLE_RATE);
        chain.add_effect(EffectKind::TapeEcho);
        chain.process_sample(Stereo::splat(0.5));
        chain.reset(SAMPLE_RATE);
        for _ in 0..48000 {
            let y = chain.process_sample(Stereo::ZERO);
            assert_eq!(y, Stereo::ZERO);
        }
    }
}
