//! Factory presets bundled with the library.
//!
//! Built-in presets that are always available without external files.
//! They double as worked examples of the preset format.

use crate::Preset;

/// TOML content for factory presets, keyed by identifier.
///
/// These are embedded at compile time and always available.
static FACTORY_PRESETS_TOML: &[(&str, &str)] = &[
    ("init", INIT_PRESET),
    ("vocal_leveler", VOCAL_LEVELER_PRESET),
    ("drum_bus", DRUM_BUS_PRESET),
    ("slapback", SLAPBACK_PRESET),
    ("dub_echo", DUB_ECHO_PRESET),
];

/// Every unit present, all bypassed.
const INIT_PRESET: &str = r#"
name = "Init"
description = "Clean signal path - all units bypassed"
sample_rate = 48000

[[effects]]
type = "compressor"
bypassed = true

[[effects]]
type = "tape-echo"
bypassed = true

[[effects]]
type = "gain"
bypassed = true
"#;

const VOCAL_LEVELER_PRESET: &str = r#"
name = "Vocal Leveler"
description = "Slow RMS leveling with a soft knee and low-end ignored by the detector"
sample_rate = 48000
oversampling = "fir_2x_hq"

[[effects]]
type = "compressor"
[effects.params]
threshold = "-18dB"
ratio = "3:1"
attack = "10ms"
release = "250ms"
knee = "12dB"
rms = "on"
rms_time = "40ms"
sc_hpf = "120Hz"
makeup = "4dB"
link = "on"
"#;

const DRUM_BUS_PRESET: &str = r#"
name = "Drum Bus"
description = "Fast peak glue with parallel mix and hard knee"
sample_rate = 48000
oversampling = "fir_4x_hq"

[[effects]]
type = "compressor"
[effects.params]
threshold = "-24dB"
ratio = "6:1"
attack = "0.5ms"
release = "80ms"
knee = "0dB"
mix = "60%"
makeup = "6dB"

[[effects]]
type = "gain"
[effects.params]
gain = "-2dB"
"#;

const SLAPBACK_PRESET: &str = r#"
name = "Slapback"
description = "Single short tape repeat with a little wobble"
sample_rate = 48000

[[effects]]
type = "tape-echo"
[effects.params]
time = "120ms"
feedback = "0.1"
lpf = "6kHz"
drive = "3dB"
mod_frequency = "0.8Hz"
mod_depth = "0.3%"
dry_mix = "35%"
"#;

const DUB_ECHO_PRESET: &str = r#"
name = "Dub Echo"
description = "Tempo-synced dotted eighths, dark and saturated feedback, wide stereo"
sample_rate = 48000
oversampling = "fir_2x_lq"
tempo = 120.0

[[effects]]
type = "tape-echo"
[effects.params]
sync = "on"
subdivision = "eighth_dot"
feedback = "0.7"
hpf = "150Hz"
lpf = "2.5kHz"
drive = "8dB"
mod_phase = "90deg"
offset = "15ms"
dry_mix = "45%"

[[effects]]
type = "gain"
[effects.params]
gain = "-4dB"
"#;

/// Get all factory presets.
///
/// # Example
///
/// ```rust
/// use dynamo_config::factory_presets;
///
/// for preset in &factory_presets() {
///     println!("  - {}: {}", preset.name, preset.description.as_deref().unwrap_or(""));
/// }
/// ```
pub fn factory_presets() -> Vec<Preset> {
    FACTORY_PRESETS_TOML
        .iter()
        .filter_map(|(_, toml)| Preset::from_toml(toml).ok())
        .collect()
}

/// Get a factory preset by identifier or display name (case-insensitive).
///
/// # Example
///
/// ```rust
/// use dynamo_config::get_factory_preset;
///
/// let preset = get_factory_preset("dub_echo").unwrap();
/// assert_eq!(preset.name, "Dub Echo");
/// assert!(get_factory_preset("Dub Echo").is_some());
/// ```
pub fn get_factory_preset(name: &str) -> Option<Preset> {
    if let Some((_, toml)) = FACTORY_PRESETS_TOML
        .iter()
        .find(|(id, _)| id.eq_ignore_ascii_case(name))
    {
        return Preset::from_toml(toml).ok();
    }

    factory_presets()
        .into_iter()
        .find(|preset| preset.name.eq_ignore_ascii_case(name))
}

/// Identifiers of all factory presets.
pub fn factory_preset_names() -> Vec<&'static str> {
    FACTORY_PRESETS_TOML.iter().map(|(name, _)| *name).collect()
}

/// Check if a name matches a factory preset (case-insensitive).
pub fn is_factory_preset(name: &str) -> bool {
    get_factory_preset(name).is_some()
}
