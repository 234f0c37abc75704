//! Configuration and preset management for dynamo processing chains.
//!
//! This crate turns TOML presets and `key=value` parameter strings into
//! ready-to-run processors:
//!
//! - **Presets**: [`Preset`] and [`EffectConfig`] load and save TOML files
//!   carrying the unit list, oversampling mode and tempo
//! - **Parameter parsing**: [`parse_param_value`] reads values with units
//!   (`"-18dB"`, `"350ms"`, `"4:1"`, `"on"`, `"eighth_dot"`) against the
//!   unit's parameter descriptor
//! - **Validation**: unit types, parameter names, values and ranges, with
//!   every problem reported at once
//! - **Chains**: [`EffectChain`] runs units in series; [`build_processor`]
//!   wraps it in the preset's [`Oversampler`](dynamo_core::Oversampler)
//! - **Factory presets**: built-in starting points
//!
//! # Example
//!
//! ```rust,no_run
//! use dynamo_config::{EffectConfig, Preset, validate_preset};
//! use dynamo_core::OversamplingMode;
//!
//! let preset = Preset::load("leveler.toml").unwrap();
//! validate_preset(&preset).unwrap();
//!
//! let preset = Preset::new("Bus")
//!     .with_description("Glue and trim")
//!     .with_oversampling(OversamplingMode::Fir4xHq)
//!     .with_effect(
//!         EffectConfig::new("compressor")
//!             .with_param("threshold", "-24dB")
//!             .with_param("ratio", "4:1"),
//!     )
//!     .with_effect(EffectConfig::new("gain").with_param("gain", "-2dB"));
//! preset.save("presets/bus.toml").unwrap();
//! ```

mod chain;
mod effect_config;
mod error;
mod preset;

/// Unit and preset validation.
pub mod validation;

/// Factory presets bundled with the library.
pub mod factory_presets;

pub use chain::{EffectChain, build_processor};
pub use effect_config::{EffectConfig, parse_param_value};
pub use error::ConfigError;
pub use factory_presets::{factory_presets, get_factory_preset, is_factory_preset};
pub use preset::Preset;
pub use validation::{
    apply_params, resolve_param, validate_effect, validate_effect_config, validate_preset,
};
