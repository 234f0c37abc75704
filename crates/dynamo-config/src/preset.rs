//! Preset file format and operations.

use dynamo_core::OversamplingMode;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::effect_config::EffectConfig;
use crate::error::ConfigError;

/// Preset file format for processing chains.
///
/// Presets are stored as TOML files containing the host settings
/// (oversampling, tempo) and a list of units with their parameters.
///
/// # TOML Format
///
/// ```toml
/// name = "Vocal leveler"
/// description = "Gentle RMS leveling"
/// sample_rate = 48000
/// oversampling = "fir_4x_hq"
/// tempo = 120.0
///
/// [[effects]]
/// type = "compressor"
/// bypassed = false
/// [effects.params]
/// threshold = "-18"
/// ratio = "4"
///
/// [[effects]]
/// type = "tape-echo"
/// [effects.params]
/// sync = "on"
/// subdivision = "eighth_dot"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Preset {
    /// Name of the preset.
    pub name: String,

    /// Optional description of the preset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Sample rate hint (defaults to 48000).
    /// The input file's rate wins when processing.
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Oversampling mode label (see [`OversamplingMode::label`]).
    #[serde(default = "default_oversampling")]
    pub oversampling: String,

    /// Host tempo in BPM for tempo-synced units.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tempo: Option<f32>,

    /// Units in processing order.
    #[serde(default)]
    pub effects: Vec<EffectConfig>,
}

fn default_sample_rate() -> u32 {
    48000
}

fn default_oversampling() -> String {
    OversamplingMode::Disabled.label().to_string()
}

/// Comma-separated list of every oversampling label.
pub(crate) fn oversampling_labels() -> String {
    OversamplingMode::ALL
        .iter()
        .map(|m| m.label())
        .collect::<Vec<_>>()
        .join(", ")
}

impl Preset {
    /// Create a new empty preset.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            sample_rate: default_sample_rate(),
            oversampling: default_oversampling(),
            tempo: None,
            effects: Vec::new(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the sample rate hint.
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Set the oversampling mode.
    pub fn with_oversampling(mut self, mode: OversamplingMode) -> Self {
        self.oversampling = mode.label().to_string();
        self
    }

    /// Set the host tempo.
    pub fn with_tempo(mut self, bpm: f32) -> Self {
        self.tempo = Some(bpm);
        self
    }

    /// Add a unit to the chain.
    pub fn with_effect(mut self, effect: EffectConfig) -> Self {
        self.effects.push(effect);
        self
    }

    /// Add multiple units to the chain.
    pub fn with_effects(mut self, effects: impl IntoIterator<Item = EffectConfig>) -> Self {
        self.effects.extend(effects);
        self
    }

    /// Parsed oversampling mode.
    pub fn oversampling_mode(&self) -> Result<OversamplingMode, ConfigError> {
        OversamplingMode::from_label(&self.oversampling)
            .ok_or_else(|| ConfigError::UnknownOversampling(self.oversampling.clone()))
    }

    /// Load a preset from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let preset: Preset = toml::from_str(&content)?;
        Ok(preset)
    }

    /// Load a preset from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the preset to a TOML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the preset to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Get the number of units in the preset.
    pub fn len(&self) -> usize {
        self.effects.len()
    }

    /// Check if the preset has no units.
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Iterate over the unit configurations.
    pub fn iter(&self) -> impl Iterator<Item = &EffectConfig> {
        self.effects.iter()
    }

    /// Unit types for display, with `!` on bypassed entries.
    pub fn effect_types(&self) -> Vec<String> {
        self.effects.iter().map(|e| e.display_type()).collect()
    }
}

impl Default for Preset {
    fn default() -> Self {
        Self::new("Untitled")
    }
}
