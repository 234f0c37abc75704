//! Unit and preset validation.
//!
//! Resolves unit types through the [`EffectKind`] registry and checks every
//! parameter assignment against the unit's own parameter table: the name
//! must exist, the value must parse for the parameter's unit and land inside
//! its range.
//!
//! # Example
//!
//! ```rust
//! use dynamo_config::{EffectConfig, validate_effect, validate_effect_config};
//!
//! validate_effect("compressor").expect("compressor should exist");
//! assert!(validate_effect("reverb").is_err());
//!
//! let config = EffectConfig::new("compressor").with_param("ratio", "40");
//! assert!(validate_effect_config(&config).is_err());
//! ```

use dynamo_core::ParameterInfo;
use dynamo_effects::{EffectKind, EffectUnit};

use crate::effect_config::{EffectConfig, parse_param_value};
use crate::error::ConfigError;
use crate::preset::Preset;

/// Sample rate used to build throwaway units for validation.
const VALIDATION_SAMPLE_RATE: f32 = 48000.0;

/// Resolve a unit type identifier.
pub fn validate_effect(effect_type: &str) -> Result<EffectKind, ConfigError> {
    EffectKind::from_id(effect_type).ok_or_else(|| ConfigError::UnknownEffect(effect_type.to_string()))
}

/// Resolve one `key = value` assignment against a unit's parameter table.
///
/// Keys match the parameter name, short name or string id, ignoring case;
/// `-` stands in for `_`. Returns the parameter index and the value in the
/// parameter's unit.
pub fn resolve_param<P: ParameterInfo + ?Sized>(
    unit: &P,
    effect: &str,
    key: &str,
    value: &str,
) -> Result<(usize, f32), ConfigError> {
    let lookup = key.replace('-', "_");
    let index = unit
        .find_param_by_name(&lookup)
        .or_else(|| unit.find_param_by_name(key))
        .ok_or_else(|| ConfigError::UnknownParameter {
            effect: effect.to_string(),
            param: key.to_string(),
        })?;
    let Some(desc) = unit.param_info(index) else {
        return Err(ConfigError::UnknownParameter {
            effect: effect.to_string(),
            param: key.to_string(),
        });
    };

    let parsed =
        parse_param_value(value, &desc).map_err(|reason| ConfigError::invalid_value(key, value, reason))?;
    if parsed < desc.min || parsed > desc.max {
        return Err(ConfigError::OutOfRange {
            param: key.to_string(),
            value: parsed,
            min: desc.min,
            max: desc.max,
        });
    }
    Ok((index, parsed))
}

/// Apply every parameter of `config` to `unit`.
///
/// Valid assignments are written even when others fail; all failures are
/// reported together.
pub fn apply_params(unit: &mut EffectUnit, config: &EffectConfig) -> Result<(), ConfigError> {
    let effect = unit.kind().id();
    let mut errors = Vec::new();
    for (key, value) in &config.params {
        match resolve_param(unit, effect, key, value) {
            Ok((index, v)) => unit.set_param(index, v),
            Err(e) => errors.push(e),
        }
    }
    match ConfigError::collect(errors) {
        None => Ok(()),
        Some(e) => Err(e),
    }
}

/// Validate a single unit configuration: type and every parameter.
pub fn validate_effect_config(config: &EffectConfig) -> Result<(), ConfigError> {
    let kind = validate_effect(&config.effect_type)?;
    let mut unit = kind.create_for(VALIDATION_SAMPLE_RATE, VALIDATION_SAMPLE_RATE);
    apply_params(&mut unit, config)
}

/// Validate a whole preset: host settings and every unit.
pub fn validate_preset(preset: &Preset) -> Result<(), ConfigError> {
    let mut errors = Vec::new();

    if preset.sample_rate == 0 {
        errors.push(ConfigError::InvalidSetting {
            field: "sample_rate",
            reason: "must be positive".to_string(),
        });
    }
    if let Err(e) = preset.oversampling_mode() {
        errors.push(e);
    }
    if let Some(bpm) = preset.tempo
        && !(bpm.is_finite() && bpm > 0.0)
    {
        errors.push(ConfigError::InvalidSetting {
            field: "tempo",
            reason: format!("{bpm} is not a positive tempo"),
        });
    }

    for config in &preset.effects {
        match validate_effect_config(config) {
            Ok(()) => {}
            Err(ConfigError::Multiple(inner)) => errors.extend(inner),
            Err(e) => errors.push(e),
        }
    }

    match ConfigError::collect(errors) {
        None => Ok(()),
        Some(e) => Err(e),
    }
}
