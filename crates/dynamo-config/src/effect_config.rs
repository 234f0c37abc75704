//! Effect configuration types and parameter value parsing.

use dynamo_core::{ParamDescriptor, ParamKind, ParamUnit, db_to_linear};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Configuration for a single processing unit in a preset.
///
/// Each entry has a type identifier and optional parameters. Units can be
/// bypassed by prefixing the type with `!` (e.g., `!tape-echo`).
///
/// # Example
///
/// ```rust
/// use dynamo_config::EffectConfig;
///
/// let config = EffectConfig::new("compressor")
///     .with_param("threshold", "-18dB")
///     .with_param("ratio", "4:1");
///
/// assert_eq!(config.effect_type, "compressor");
/// assert!(!config.bypassed);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EffectConfig {
    /// Unit type identifier (e.g., "compressor", "tape-echo").
    /// Use `!` prefix to bypass (e.g., "!gain").
    #[serde(rename = "type")]
    pub effect_type: String,

    /// Whether the unit is bypassed.
    #[serde(default)]
    pub bypassed: bool,

    /// Parameters as key-value pairs, keyed by parameter name.
    /// Values are strings so they can carry units ("-18dB", "350ms", "4:1").
    #[serde(default)]
    pub params: BTreeMap<String, String>,
}

impl EffectConfig {
    /// Create a new configuration.
    ///
    /// If the type starts with `!`, the unit will be marked as bypassed.
    pub fn new(effect_type: impl Into<String>) -> Self {
        let type_str = effect_type.into();
        let (effect_type, bypassed) = if let Some(stripped) = type_str.strip_prefix('!') {
            (stripped.to_string(), true)
        } else {
            (type_str, false)
        };

        Self {
            effect_type,
            bypassed,
            params: BTreeMap::new(),
        }
    }

    /// Add a parameter to the configuration.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Set whether the unit is bypassed.
    pub fn with_bypass(mut self, bypassed: bool) -> Self {
        self.bypassed = bypassed;
        self
    }

    /// Get a parameter value.
    pub fn get_param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(|s| s.as_str())
    }

    /// Set a parameter value.
    pub fn set_param(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.params.insert(key.into(), value.into());
    }

    /// Parse a `key=value` pair as written on the command line.
    ///
    /// Returns `None` when there is no `=` or the key is empty.
    pub fn parse_assignment(assignment: &str) -> Option<(&str, &str)> {
        let (key, value) = assignment.split_once('=')?;
        let key = key.trim();
        if key.is_empty() {
            return None;
        }
        Some((key, value.trim()))
    }

    /// Get the unit type string for display (with ! prefix if bypassed).
    pub fn display_type(&self) -> String {
        if self.bypassed {
            format!("!{}", self.effect_type)
        } else {
            self.effect_type.clone()
        }
    }
}

/// Parse a parameter value string into the parameter's own unit.
///
/// The descriptor decides what a value means:
/// - Toggles: `on`/`off`, `true`/`false`, `yes`/`no`, `1`/`0`
/// - Drop-downs: an option label (case-insensitive) or its index
/// - Decibels: `"-6dB"`; on a multiplier parameter this converts to linear
/// - Times: `"350ms"` and `"0.35s"` convert to whichever of the two the
///   parameter uses
/// - Frequencies: `"440Hz"`, `"1.2kHz"`
/// - Percentages: `"50%"` stays as-is on a percent parameter and is divided
///   by 100 on a multiplier or unitless one
/// - Ratios: `"4:1"`
/// - Degrees: `"90deg"`, `"90°"`
/// - Plain numbers are taken in the parameter's unit.
///
/// The result is not range-checked. The error is a human-readable reason.
pub fn parse_param_value(value: &str, desc: &ParamDescriptor) -> Result<f32, String> {
    let value = value.trim().to_ascii_lowercase();
    if value.is_empty() {
        return Err("empty value".to_string());
    }

    match desc.kind {
        ParamKind::Toggle => {
            return match value.as_str() {
                "on" | "true" | "yes" | "1" => Ok(1.0),
                "off" | "false" | "no" | "0" => Ok(0.0),
                _ => Err("expected on/off".to_string()),
            };
        }
        ParamKind::Dropdown(options) => {
            if let Some(index) = desc.option_index(&value) {
                return Ok(index as f32);
            }
            return match value.parse::<usize>() {
                Ok(index) if index < options.len() => Ok(index as f32),
                _ => Err(format!("expected one of: {}", options.join(", "))),
            };
        }
        ParamKind::Knob => {}
    }

    let (number, suffix) = split_suffix(&value);
    let v: f32 = number
        .trim()
        .parse()
        .map_err(|_| format!("'{number}' is not a number"))?;
    if !v.is_finite() {
        return Err("value must be finite".to_string());
    }

    let unit = desc.unit;
    let mismatch = || format!("unit '{suffix}' does not apply to a{} parameter", unit_name(unit));
    match suffix {
        "" => Ok(v),
        "db" => match unit {
            ParamUnit::Decibels => Ok(v),
            ParamUnit::Multiplier => Ok(db_to_linear(v)),
            _ => Err(mismatch()),
        },
        "ms" => match unit {
            ParamUnit::Milliseconds => Ok(v),
            ParamUnit::Seconds => Ok(v / 1000.0),
            _ => Err(mismatch()),
        },
        "s" => match unit {
            ParamUnit::Seconds => Ok(v),
            ParamUnit::Milliseconds => Ok(v * 1000.0),
            _ => Err(mismatch()),
        },
        "hz" => match unit {
            ParamUnit::Hertz => Ok(v),
            _ => Err(mismatch()),
        },
        "khz" => match unit {
            ParamUnit::Hertz => Ok(v * 1000.0),
            _ => Err(mismatch()),
        },
        "%" => match unit {
            ParamUnit::Percent => Ok(v),
            ParamUnit::Multiplier | ParamUnit::None => Ok(v / 100.0),
            _ => Err(mismatch()),
        },
        ":1" => match unit {
            ParamUnit::Ratio => Ok(v),
            _ => Err(mismatch()),
        },
        "deg" | "°" => match unit {
            ParamUnit::Degrees => Ok(v),
            _ => Err(mismatch()),
        },
        "x" => match unit {
            ParamUnit::Multiplier | ParamUnit::None => Ok(v),
            _ => Err(mismatch()),
        },
        _ => Err(format!("unknown unit '{suffix}'")),
    }
}

/// Longest suffixes first so `ms` wins over `s` and `khz` over `hz`.
const SUFFIXES: [&str; 10] = ["khz", "hz", "ms", "db", "deg", "°", "%", ":1", "x", "s"];

fn split_suffix(value: &str) -> (&str, &str) {
    for suffix in SUFFIXES {
        if let Some(number) = value.strip_suffix(suffix) {
            return (number, suffix);
        }
    }
    (value, "")
}

fn unit_name(unit: ParamUnit) -> &'static str {
    match unit {
        ParamUnit::Decibels => " decibel",
        ParamUnit::Hertz => " frequency",
        ParamUnit::Milliseconds | ParamUnit::Seconds => " time",
        ParamUnit::Percent => " percent",
        ParamUnit::Ratio => " ratio",
        ParamUnit::Multiplier => " multiplier",
        ParamUnit::Degrees => "n angle",
        ParamUnit::None => " unitless",
    }
}
