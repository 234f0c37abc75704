//! Shared CLI helpers used across multiple commands.

use anyhow::Context;
use dynamo_config::{EffectConfig, Preset, get_factory_preset};
use dynamo_core::{ParamDescriptor, ParamKind};
use dynamo_effects::EffectKind;
use std::path::Path;

/// Load a preset by factory name or path.
///
/// Factory presets are tried first, then the argument as a TOML file.
pub fn load_preset(name: &str) -> anyhow::Result<Preset> {
    if let Some(preset) = get_factory_preset(name) {
        return Ok(preset);
    }

    let path = Path::new(name);
    if path.exists() {
        return Preset::load(path).with_context(|| format!("loading preset {}", path.display()));
    }

    anyhow::bail!(
        "preset '{}' not found; use 'dynamo presets' to list factory presets",
        name
    )
}

/// Apply a command-line `[EFFECT:]KEY=VALUE` assignment to a preset.
///
/// Without an `EFFECT:` prefix the value goes to the last unit; with one,
/// to the last unit of that type.
pub fn apply_assignment(preset: &mut Preset, assignment: &str) -> anyhow::Result<()> {
    let (target, value) = EffectConfig::parse_assignment(assignment)
        .with_context(|| format!("invalid parameter '{assignment}' (expected [effect:]key=value)"))?;
    let (effect, key) = match target.split_once(':') {
        Some((effect, key)) => (Some(effect.trim()), key.trim()),
        None => (None, target),
    };

    let entry = match effect {
        None => preset.effects.last_mut(),
        Some(effect) => {
            let kind = EffectKind::from_id(effect)
                .with_context(|| format!("unknown effect '{effect}' in '{assignment}'"))?;
            preset
                .effects
                .iter_mut()
                .rev()
                .find(|e| EffectKind::from_id(&e.effect_type) == Some(kind))
        }
    };
    let entry = entry.with_context(|| format!("no unit in the chain for '{assignment}'"))?;
    entry.set_param(key, value);
    Ok(())
}

/// Render a parameter value with its unit, option label or on/off state.
pub fn format_value(desc: &ParamDescriptor, value: f32) -> String {
    match desc.kind {
        ParamKind::Toggle => (if value >= 0.5 { "on" } else { "off" }).to_string(),
        ParamKind::Dropdown(_) => desc.option_label(value).unwrap_or("?").to_string(),
        ParamKind::Knob => {
            let precision = if desc.step >= 1.0 {
                0
            } else if desc.step >= 0.1 {
                1
            } else if desc.step >= 0.01 {
                2
            } else {
                3
            };
            format!("{:.*}{}", precision, value, desc.unit.suffix())
        }
    }
}
