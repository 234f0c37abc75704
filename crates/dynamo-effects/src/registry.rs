//! Effect registry and factory.
//!
//! Names, describes and constructs the built-in processing units. Units are
//! created as [`EffectUnit`], an enum over the concrete types, so a host can
//! hold any of them without boxing and every call dispatches statically.
//!
//! # Example
//!
//! ```rust
//! use dynamo_core::{ParameterInfo, Stereo, StereoProcessor};
//! use dynamo_effects::{EffectCategory, EffectKind};
//!
//! for kind in EffectKind::ALL {
//!     println!("{}: {}", kind.name(), kind.description());
//! }
//!
//! let kind = EffectKind::from_id("tape_echo").unwrap();
//! assert_eq!(kind, EffectKind::TapeEcho);
//! assert_eq!(kind.category(), EffectCategory::TimeBased);
//!
//! let mut unit = EffectKind::Gain.create(48000.0);
//! unit.set_param(0, -6.0);
//! let y = unit.process_sample(Stereo::splat(0.5));
//! assert!(y.l < 0.5);
//! ```

use core::fmt;

use dynamo_core::{MeterSpec, Metered, ParamDescriptor, ParameterInfo, Stereo, StereoProcessor};

use crate::{Compressor, Gain, TapeEcho};

/// Category of processing unit, for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectCategory {
    /// Compressors and other level-dependent gain
    Dynamics,
    /// Delays and echoes
    TimeBased,
    /// Plain gain stages
    Utility,
}

impl EffectCategory {
    /// Returns a human-readable name for the category.
    pub const fn name(&self) -> &'static str {
        match self {
            EffectCategory::Dynamics => "Dynamics",
            EffectCategory::TimeBased => "Time-Based",
            EffectCategory::Utility => "Utility",
        }
    }
}

/// Built-in processing unit types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectKind {
    /// [`Compressor`]
    Compressor,
    /// [`TapeEcho`]
    TapeEcho,
    /// [`Gain`]
    Gain,
}

/// Static description of a unit type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectDescriptor {
    /// Unique identifier (lowercase, hyphenated).
    pub id: &'static str,
    /// Human-readable name.
    pub name: &'static str,
    /// Brief description.
    pub description: &'static str,
    /// Category for organization.
    pub category: EffectCategory,
}

impl EffectKind {
    /// Every built-in unit, in listing order.
    pub const ALL: [EffectKind; 3] = [EffectKind::Compressor, EffectKind::TapeEcho, EffectKind::Gain];

    /// Stable identifier used on the command line and in presets.
    pub const fn id(self) -> &'static str {
        self.descriptor().id
    }

    /// Human-readable name.
    pub const fn name(self) -> &'static str {
        self.descriptor().name
    }

    /// Brief description.
    pub const fn description(self) -> &'static str {
        self.descriptor().description
    }

    /// Category for listings.
    pub const fn category(self) -> EffectCategory {
        self.descriptor().category
    }

    /// Full static description.
    pub const fn descriptor(self) -> EffectDescriptor {
        match self {
            EffectKind::Compressor => EffectDescriptor {
                id: "compressor",
                name: "Compressor",
                description: "Stereo compressor with side-chain EQ, feedback mode and soft-clipped makeup",
                category: EffectCategory::Dynamics,
            },
            EffectKind::TapeEcho => EffectDescriptor {
                id: "tape-echo",
                name: "Tape Echo",
                description: "Modulated tape delay with drive, filtered feedback and tempo sync",
                category: EffectCategory::TimeBased,
            },
            EffectKind::Gain => EffectDescriptor {
                id: "gain",
                name: "Gain",
                description: "Clean stereo gain stage",
                category: EffectCategory::Utility,
            },
        }
    }

    /// Looks a unit up by identifier.
    ///
    /// Case-insensitive; `_` and `-` are interchangeable.
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| {
            let known = kind.id().as_bytes();
            let given = id.as_bytes();
            known.len() == given.len()
                && known.iter().zip(given).all(|(&a, &b)| {
                    let b = if b == b'_' { b'-' } else { b };
                    a.eq_ignore_ascii_case(&b)
                })
        })
    }

    /// Creates a unit of this type, reset to `sample_rate`.
    ///
    /// Buffers are sized for the highest supported rate, so the unit can
    /// later run under any oversampling mode.
    pub fn create(self, sample_rate: f32) -> EffectUnit {
        match self {
            EffectKind::Compressor => EffectUnit::Compressor(Compressor::new(sample_rate)),
            EffectKind::TapeEcho => EffectUnit::TapeEcho(TapeEcho::new(sample_rate)),
            EffectKind::Gain => EffectUnit::Gain(Gain::new(sample_rate)),
        }
    }

    /// Creates a unit whose buffers only cover rates up to `max_sample_rate`.
    ///
    /// For hosts that know their oversampled rate up front.
    pub fn create_for(self, sample_rate: f32, max_sample_rate: f32) -> EffectUnit {
        match self {
            EffectKind::TapeEcho => {
                EffectUnit::TapeEcho(TapeEcho::with_max_sample_rate(sample_rate, max_sample_rate))
            }
            _ => self.create(sample_rate),
        }
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Any built-in processing unit.
#[derive(Debug, Clone)]
#[allow(clippy::large_enum_variant)]
pub enum EffectUnit {
    /// Compressor unit
    Compressor(Compressor),
    /// Tape echo unit
    TapeEcho(TapeEcho),
    /// Gain unit
    Gain(Gain),
}

macro_rules! dispatch {
    ($self:expr, $unit:ident => $body:expr) => {
        match $self {
            EffectUnit::Compressor($unit) => $body,
            EffectUnit::TapeEcho($unit) => $body,
            EffectUnit::Gain($unit) => $body,
        }
    };
}

impl EffectUnit {
    /// Type of the wrapped unit.
    pub fn kind(&self) -> EffectKind {
        match self {
            EffectUnit::Compressor(_) => EffectKind::Compressor,
            EffectUnit::TapeEcho(_) => EffectKind::TapeEcho,
            EffectUnit::Gain(_) => EffectKind::Gain,
        }
    }

    /// Turns the non-finite diagnostic channel on or off.
    pub fn set_diagnostics(&mut self, enabled: bool) {
        dispatch!(self, u => u.diagnostics_mut().set_enabled(enabled));
    }

    /// Takes the last recorded non-finite tag, if any.
    pub fn take_diagnostic(&mut self) -> Option<dynamo_core::NonFiniteTag> {
        dispatch!(self, u => u.diagnostics_mut().take())
    }
}

impl StereoProcessor for EffectUnit {
    #[inline]
    fn process_sample(&mut self, x: Stereo<f32>) -> Stereo<f32> {
        dispatch!(self, u => u.process_sample(x))
    }

    fn update_coeffs(&mut self) {
        dispatch!(self, u => u.update_coeffs());
    }

    fn reset(&mut self, sample_rate: f32) {
        dispatch!(self, u => u.reset(sample_rate));
    }

    fn set_tempo(&mut self, bpm: f32) {
        dispatch!(self, u => u.set_tempo(bpm));
    }

    fn latency_samples(&self) -> usize {
        dispatch!(self, u => u.latency_samples())
    }
}

impl ParameterInfo for EffectUnit {
    fn param_count(&self) -> usize {
        dispatch!(self, u => u.param_count())
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        dispatch!(self, u => u.param_info(index))
    }

    fn get_param(&self, index: usize) -> f32 {
        dispatch!(self, u => u.get_param(index))
    }

    fn set_param(&mut self, index: usize, value: f32) {
        dispatch!(self, u => u.set_param(index, value));
    }
}

impl Metered for EffectUnit {
    fn meter_count(&self) -> usize {
        dispatch!(self, u => u.meter_count())
    }

    fn meter_spec(&self, idx: usize) -> Option<MeterSpec> {
        dispatch!(self, u => u.meter_spec(idx))
    }

    fn get_and_reset_peak_level(&mut self, idx: usize) -> Stereo<f32> {
        dispatch!(self, u => u.get_and_reset_peak_level(idx))
    }
}
