//! Parameter table for discoverable, host-addressable processing units.
//!
//! Every processing unit exposes its plain fields through the
//! [`ParameterInfo`] trait. A host (the CLI, a preset loader, a GUI) lists
//! descriptors, reads values and writes them back by index; the unit's
//! `set_param` clamps the value, stores it and recomputes its derived
//! coefficients before returning, so a write can never leave stale
//! coefficients behind.
//!
//! # Design
//!
//! Each parameter is described by a [`ParamDescriptor`] carrying:
//!
//! - [`ParamKind`]: continuous knob, on/off toggle or drop-down with labels
//! - [`ParamScale`]: knob travel curve (linear, logarithmic, or skewed so a
//!   chosen mid point sits at half travel)
//! - [`ParamGroup`]: primary or secondary control row
//! - [`ParamId`] and `string_id`: stable identifiers for presets
//! - [`ParamFlags`]: stepped / inactive markers
//!
//! Toggles are encoded as `0.0` / `1.0` and drop-downs as the option index,
//! so the whole table travels as `f32`.
//!
//! # Example
//!
//! ```rust
//! use dynamo_core::{ParameterInfo, ParamDescriptor, ParamId};
//!
//! struct SimpleGain {
//!     gain_db: f32,
//! }
//!
//! impl ParameterInfo for SimpleGain {
//!     fn param_count(&self) -> usize { 1 }
//!
//!     fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
//!         match index {
//!             0 => Some(ParamDescriptor::gain_db("Gain", "Gain", -24.0, 24.0, 0.0)
//!                 .with_id(ParamId(100), "gain_level")),
//!             _ => None,
//!         }
//!     }
//!
//!     fn get_param(&self, index: usize) -> f32 {
//!         match index {
//!             0 => self.gain_db,
//!             _ => 0.0,
//!         }
//!     }
//!
//!     fn set_param(&mut self, index: usize, value: f32) {
//!         if let Some(desc) = self.param_info(index) {
//!             self.gain_db = desc.quantize(value);
//!         }
//!     }
//! }
//!
//! let mut g = SimpleGain { gain_db: 0.0 };
//! g.set_param(0, 40.0);
//! assert_eq!(g.get_param(0), 24.0);
//! assert_eq!(g.find_param_by_name("gain_level"), Some(0));
//! ```

/// Knob travel curve.
///
/// Maps a plain value to normalized `[0.0, 1.0]` knob position.
///
/// - **Linear**: `(value - min) / (max - min)`
/// - **Logarithmic**: `ln(value/min) / ln(max/min)`; requires `min > 0`
/// - **MidPoint(mid)**: linear position raised to a skew chosen so that
///   `mid` lands at exactly `0.5`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ParamScale {
    /// Equal resolution across the range.
    #[default]
    Linear,
    /// Equal resolution per octave. For frequencies and modulation rates.
    Logarithmic,
    /// Power curve anchored at a mid point (e.g. ratio 1..20 with 2 at centre).
    MidPoint(f32),
}

/// Stable parameter identifier that survives reordering.
///
/// Each unit gets a base ID and numbers its parameters from there:
/// compressor 100.., tape echo 200.., gain 300...
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParamId(pub u32);

/// Parameter marker flags. Combine with [`union`](Self::union).
///
/// # Example
///
/// ```rust
/// use dynamo_core::ParamFlags;
///
/// let flags = ParamFlags::AUTOMATABLE.union(ParamFlags::STEPPED);
/// assert!(flags.contains(ParamFlags::STEPPED));
/// assert!(!flags.contains(ParamFlags::INACTIVE));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamFlags(u8);

impl ParamFlags {
    /// No flags set.
    pub const NONE: Self = Self(0);
    /// Host can automate this parameter (default for all params).
    pub const AUTOMATABLE: Self = Self(1 << 0);
    /// Discrete values only (toggles, drop-downs).
    pub const STEPPED: Self = Self(1 << 1);
    /// Value is currently overridden by the unit (e.g. delay time while
    /// tempo sync is on). Writes are still accepted and stored.
    pub const INACTIVE: Self = Self(1 << 2);

    /// Returns `true` if all bits in `other` are set in `self`.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns the union of two flag sets.
    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Returns `self` with the bits of `other` cleared.
    #[inline]
    pub const fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }
}

impl Default for ParamFlags {
    fn default() -> Self {
        Self::AUTOMATABLE
    }
}

/// Control type of a parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamKind {
    /// Continuous value in `[min, max]`.
    Knob,
    /// Boolean, `0.0` or `1.0`.
    Toggle,
    /// Index into the option labels.
    Dropdown(&'static [&'static str]),
}

/// Which control row a parameter belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ParamGroup {
    /// Main controls.
    #[default]
    Primary,
    /// Detail controls.
    Secondary,
}

/// Trait for processing units that expose introspectable parameters.
///
/// Parameters are accessed by zero-based index, stable for the lifetime of
/// the unit. Implementations must clamp in `set_param` and recompute their
/// derived coefficients before returning.
pub trait ParameterInfo {
    /// Returns the number of parameters this unit exposes.
    fn param_count(&self) -> usize;

    /// Returns the descriptor for the parameter at `index`, or `None` if out
    /// of range. Descriptors may change at runtime (see [`ParamFlags::INACTIVE`]).
    fn param_info(&self, index: usize) -> Option<ParamDescriptor>;

    /// Current plain value of the parameter at `index`; `0.0` when out of range.
    fn get_param(&self, index: usize) -> f32;

    /// Clamp `value`, store it, and recompute coefficients. Out-of-range
    /// indices are ignored.
    fn set_param(&mut self, index: usize, value: f32);

    /// Find a parameter index by name (case-insensitive).
    ///
    /// Matches against [`ParamDescriptor::name`],
    /// [`ParamDescriptor::short_name`] and [`ParamDescriptor::string_id`].
    fn find_param_by_name(&self, name: &str) -> Option<usize> {
        (0..self.param_count()).find(|&i| {
            self.param_info(i).is_some_and(|desc| {
                desc.name.eq_ignore_ascii_case(name)
                    || desc.short_name.eq_ignore_ascii_case(name)
                    || (!desc.string_id.is_empty() && desc.string_id.eq_ignore_ascii_case(name))
            })
        })
    }

    /// Returns the stable [`ParamId`] for the parameter at `index`.
    fn param_id(&self, index: usize) -> Option<ParamId> {
        self.param_info(index).map(|d| d.id)
    }

    /// Finds a parameter index by its stable [`ParamId`].
    ///
    /// Scans all parameters (O(n)); for setup paths, not audio.
    fn param_index_by_id(&self, id: ParamId) -> Option<usize> {
        (0..self.param_count()).find(|&i| self.param_info(i).is_some_and(|d| d.id == id))
    }

    /// Write every parameter back to its descriptor default.
    fn reset_params_to_default(&mut self) {
        for i in 0..self.param_count() {
            if let Some(desc) = self.param_info(i) {
                self.set_param(i, desc.default);
            }
        }
    }
}

/// Describes a single parameter for display, validation and persistence.
///
/// # Example
///
/// ```rust
/// use dynamo_core::{ParamDescriptor, ParamId, ParamUnit};
///
/// let hpf = ParamDescriptor::frequency_hz("SC HPF", "SC_HPF", 20.0, 2000.0, 20.0)
///     .with_mid_point(200.0)
///     .with_id(ParamId(108), "comp_sc_hpf");
/// assert_eq!(hpf.unit, ParamUnit::Hertz);
/// assert!((hpf.normalize(200.0) - 0.5).abs() < 1e-5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamDescriptor {
    /// Full parameter name for display (e.g. "Threshold").
    pub name: &'static str,

    /// Compact identifier; underscores instead of spaces (e.g. "SC_HPF").
    pub short_name: &'static str,

    /// Unit type for formatting the parameter value.
    pub unit: ParamUnit,

    /// Minimum allowed value.
    pub min: f32,

    /// Maximum allowed value.
    pub max: f32,

    /// Value on construction and on [`ParameterInfo::reset_params_to_default`].
    pub default: f32,

    /// Recommended step increment for keyboard or encoder control.
    pub step: f32,

    /// Control type.
    pub kind: ParamKind,

    /// Stable numeric ID. Default: `ParamId(0)` (unassigned).
    pub id: ParamId,

    /// Stable string ID used as the preset key (e.g. `"comp_thresh"`).
    pub string_id: &'static str,

    /// Knob travel curve.
    pub scale: ParamScale,

    /// Marker flags. Default: [`ParamFlags::AUTOMATABLE`].
    pub flags: ParamFlags,

    /// Control row.
    pub group: ParamGroup,
}

impl ParamDescriptor {
    /// Continuous knob with an explicit unit.
    pub const fn knob(
        name: &'static str,
        short_name: &'static str,
        unit: ParamUnit,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self {
            name,
            short_name,
            unit,
            min,
            max,
            default,
            step: 0.01,
            kind: ParamKind::Knob,
            id: ParamId(0),
            string_id: "",
            scale: ParamScale::Linear,
            flags: ParamFlags::AUTOMATABLE,
            group: ParamGroup::Primary,
        }
    }

    /// Standard mix parameter (0–100 %, default 100 %).
    pub const fn mix() -> Self {
        Self::knob("Mix", "Mix", ParamUnit::Percent, 0.0, 100.0, 100.0).with_step(1.0)
    }

    /// Time parameter in milliseconds.
    pub const fn time_ms(
        name: &'static str,
        short_name: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self::knob(name, short_name, ParamUnit::Milliseconds, min, max, default).with_step(0.1)
    }

    /// Gain or level parameter in decibels.
    pub const fn gain_db(
        name: &'static str,
        short_name: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self::knob(name, short_name, ParamUnit::Decibels, min, max, default).with_step(0.5)
    }

    /// Frequency parameter in Hz with logarithmic travel.
    pub const fn frequency_hz(
        name: &'static str,
        short_name: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self::knob(name, short_name, ParamUnit::Hertz, min, max, default)
            .with_scale(ParamScale::Logarithmic)
    }

    /// On/off toggle.
    pub const fn toggle(name: &'static str, short_name: &'static str, default_on: bool) -> Self {
        let default = if default_on { 1.0 } else { 0.0 };
        Self {
            kind: ParamKind::Toggle,
            step: 1.0,
            flags: ParamFlags::AUTOMATABLE.union(ParamFlags::STEPPED),
            ..Self::knob(name, short_name, ParamUnit::None, 0.0, 1.0, default)
        }
    }

    /// Drop-down over `options`, valued by index.
    pub const fn dropdown(
        name: &'static str,
        short_name: &'static str,
        options: &'static [&'static str],
        default_index: usize,
    ) -> Self {
        let max = if options.is_empty() {
            0.0
        } else {
            (options.len() - 1) as f32
        };
        Self {
            kind: ParamKind::Dropdown(options),
            step: 1.0,
            flags: ParamFlags::AUTOMATABLE.union(ParamFlags::STEPPED),
            ..Self::knob(name, short_name, ParamUnit::None, 0.0, max, default_index as f32)
        }
    }

    /// Sets the stable parameter ID and string ID.
    ///
    /// # Example
    ///
    /// ```rust
    /// use dynamo_core::{ParamDescriptor, ParamId};
    ///
    /// let desc = ParamDescriptor::mix().with_id(ParamId(207), "echo_mix");
    /// assert_eq!(desc.id, ParamId(207));
    /// assert_eq!(desc.string_id, "echo_mix");
    /// ```
    pub const fn with_id(mut self, id: ParamId, string_id: &'static str) -> Self {
        self.id = id;
        self.string_id = string_id;
        self
    }

    /// Sets the knob travel curve.
    pub const fn with_scale(mut self, scale: ParamScale) -> Self {
        self.scale = scale;
        self
    }

    /// Skews travel so that `mid` sits at half travel.
    pub const fn with_mid_point(self, mid: f32) -> Self {
        self.with_scale(ParamScale::MidPoint(mid))
    }

    /// Sets the marker flags.
    pub const fn with_flags(mut self, flags: ParamFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Sets the control row.
    pub const fn with_group(mut self, group: ParamGroup) -> Self {
        self.group = group;
        self
    }

    /// Moves the parameter to the secondary row.
    pub const fn secondary(self) -> Self {
        self.with_group(ParamGroup::Secondary)
    }

    /// Sets the step increment.
    pub const fn with_step(mut self, step: f32) -> Self {
        self.step = step;
        self
    }

    /// Marks the parameter active or inactive.
    pub const fn with_active(mut self, active: bool) -> Self {
        self.flags = if active {
            self.flags.difference(ParamFlags::INACTIVE)
        } else {
            self.flags.union(ParamFlags::INACTIVE)
        };
        self
    }

    /// Whether the stored value currently takes effect.
    pub const fn is_active(&self) -> bool {
        !self.flags.contains(ParamFlags::INACTIVE)
    }

    /// Drop-down option labels; empty for knobs and toggles.
    pub const fn options(&self) -> &'static [&'static str] {
        match self.kind {
            ParamKind::Dropdown(options) => options,
            _ => &[],
        }
    }

    /// Label for a drop-down value.
    pub fn option_label(&self, value: f32) -> Option<&'static str> {
        let idx = self.quantize(value) as usize;
        self.options().get(idx).copied()
    }

    /// Drop-down index of `label` (case-insensitive).
    pub fn option_index(&self, label: &str) -> Option<usize> {
        self.options()
            .iter()
            .position(|o| o.eq_ignore_ascii_case(label))
    }

    /// Clamps a value to this parameter's valid range.
    ///
    /// NaN maps to the default.
    ///
    /// # Example
    ///
    /// ```rust
    /// use dynamo_core::ParamDescriptor;
    ///
    /// let desc = ParamDescriptor::gain_db("Makeup", "Makeup", 0.0, 24.0, 0.0);
    /// assert_eq!(desc.clamp(6.0), 6.0);
    /// assert_eq!(desc.clamp(-3.0), 0.0);
    /// assert_eq!(desc.clamp(30.0), 24.0);
    /// ```
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            self.default
        } else if value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else {
            value
        }
    }

    /// Clamps, and rounds stepped parameters to the nearest whole value.
    #[inline]
    pub fn quantize(&self, value: f32) -> f32 {
        let v = self.clamp(value);
        if self.flags.contains(ParamFlags::STEPPED) {
            libm::roundf(v)
        } else {
            v
        }
    }

    /// Converts a plain value to knob position (0.0 to 1.0).
    ///
    /// # Example
    ///
    /// ```rust
    /// use dynamo_core::ParamDescriptor;
    ///
    /// let desc = ParamDescriptor::mix();
    /// assert_eq!(desc.normalize(0.0), 0.0);
    /// assert_eq!(desc.normalize(50.0), 0.5);
    /// assert_eq!(desc.normalize(100.0), 1.0);
    /// ```
    #[inline]
    pub fn normalize(&self, value: f32) -> f32 {
        let range = self.max - self.min;
        if range == 0.0 {
            return 0.0;
        }
        let linear = (self.clamp(value) - self.min) / range;
        match self.scale {
            ParamScale::Linear => linear,
            ParamScale::Logarithmic => {
                if self.min <= 0.0 {
                    return linear;
                }
                libm::logf(self.clamp(value) / self.min) / libm::logf(self.max / self.min)
            }
            ParamScale::MidPoint(mid) => match self.skew(mid) {
                Some(skew) => libm::powf(linear, skew),
                None => linear,
            },
        }
    }

    /// Converts a knob position (0.0 to 1.0) to a plain value.
    ///
    /// Inverse of [`normalize`](Self::normalize).
    #[inline]
    pub fn denormalize(&self, normalized: f32) -> f32 {
        let n = normalized.clamp(0.0, 1.0);
        let range = self.max - self.min;
        match self.scale {
            ParamScale::Linear => self.min + n * range,
            ParamScale::Logarithmic => {
                if self.min <= 0.0 {
                    return self.min + n * range;
                }
                self.min * libm::powf(self.max / self.min, n)
            }
            ParamScale::MidPoint(mid) => match self.skew(mid) {
                Some(skew) => self.min + libm::powf(n, 1.0 / skew) * range,
                None => self.min + n * range,
            },
        }
    }

    /// Exponent that puts `mid` at half travel, or `None` if `mid` is not
    /// strictly inside the range.
    fn skew(&self, mid: f32) -> Option<f32> {
        let range = self.max - self.min;
        let pos = (mid - self.min) / range;
        if pos > 0.0 && pos < 1.0 {
            Some(libm::logf(0.5) / libm::logf(pos))
        } else {
            None
        }
    }
}

/// Unit type for parameter display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamUnit {
    /// Decibels (dB) - gain, threshold, knee.
    Decibels,

    /// Hertz (Hz) - filter cut-off, modulation rate.
    Hertz,

    /// Milliseconds (ms) - attack, release, offset.
    Milliseconds,

    /// Seconds (s) - delay time.
    Seconds,

    /// Percentage (%) - mix, depth.
    Percent,

    /// Ratio (n:1) - compressor ratio.
    Ratio,

    /// Plain multiplier (x) - feedback amount.
    Multiplier,

    /// Degrees (deg) - modulation phase.
    Degrees,

    /// No unit.
    None,
}

impl ParamUnit {
    /// Returns the unit suffix string for display.
    ///
    /// # Example
    ///
    /// ```rust
    /// use dynamo_core::ParamUnit;
    ///
    /// assert_eq!(ParamUnit::Decibels.suffix(), " dB");
    /// assert_eq!(ParamUnit::Seconds.suffix(), " s");
    /// assert_eq!(ParamUnit::None.suffix(), "");
    /// ```
    pub const fn suffix(&self) -> &'static str {
        match self {
            ParamUnit::Decibels => " dB",
            ParamUnit::Hertz => " Hz",
            ParamUnit::Milliseconds => " ms",
            ParamUnit::Seconds => " s",
            ParamUnit::Percent => " %",
            ParamUnit::Ratio => ":1",
            ParamUnit::Multiplier => " x",
            ParamUnit::Degrees => " deg",
            ParamUnit::None => "",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(not(feature = "std"))]
    extern crate alloc;
    #[cfg(not(feature = "std"))]
    use alloc::format;

    const MODES: &[&str] = &["slow", "medium", "fast"];

    struct TestUnit {
        gain: f32,
        ratio: f32,
        hold: f32,
        mode: f32,
        updates: usize,
    }

    impl TestUnit {
        fn new() -> Self {
            Self {
                gain: 0.0,
                ratio: 2.0,
                hold: 0.0,
                mode: 1.0,
                updates: 0,
            }
        }
    }

    impl ParameterInfo for TestUnit {
        fn param_count(&self) -> usize {
            4
        }

        fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
            match index {
                0 => Some(
                    ParamDescriptor::gain_db("Gain", "Gain", -24.0, 24.0, 0.0)
                        .with_id(ParamId(100), "test_gain"),
                ),
                1 => Some(
                    ParamDescriptor::knob("Ratio", "Ratio", ParamUnit::Ratio, 1.0, 20.0, 2.0)
                        .with_mid_point(2.0)
                        .with_id(ParamId(101), "test_ratio"),
                ),
                2 => Some(
                    ParamDescriptor::toggle("Hold", "Hold", false)
                        .with_id(ParamId(102), "test_hold")
                        .with_active(self.mode != 0.0),
                ),
                3 => Some(
                    ParamDescriptor::dropdown("Mode", "Mode", MODES, 1)
                        .with_id(ParamId(103), "test_mode")
                        .secondary(),
                ),
                _ => None,
            }
        }

        fn get_param(&self, index: usize) -> f32 {
            match index {
                0 => self.gain,
                1 => self.ratio,
                2 => self.hold,
                3 => self.mode,
                _ => 0.0,
            }
        }

        fn set_param(&mut self, index: usize, value: f32) {
            let Some(desc) = self.param_info(index) else {
                return;
            };
            let v = desc.quantize(value);
            match index {
                0 => self.gain = v,
                1 => self.ratio = v,
                2 => self.hold = v,
                3 => self.mode = v,
                _ => return,
            }
            self.updates += 1;
        }
    }

    #[test]
    fn test_param_info() {
        let unit = TestUnit::new();
        assert_eq!(unit.param_count(), 4);

        let gain = unit.param_info(0).expect("gain");
        assert_eq!(gain.unit, ParamUnit::Decibels);
        assert_eq!(gain.kind, ParamKind::Knob);
        assert_eq!(gain.group, ParamGroup::Primary);

        let hold = unit.param_info(2).expect("hold");
        assert_eq!(hold.kind, ParamKind::Toggle);
        assert!(hold.flags.contains(ParamFlags::STEPPED));

        let mode = unit.param_info(3).expect("mode");
        assert_eq!(mode.max, 2.0);
        assert_eq!(mode.options(), MODES);
        assert_eq!(mode.group, ParamGroup::Secondary);

        assert!(unit.param_info(4).is_none());
    }

    #[test]
    fn test_set_clamps_and_counts_updates() {
        let mut unit = TestUnit::new();
        unit.set_param(0, 100.0);
        assert_eq!(unit.get_param(0), 24.0);
        unit.set_param(0, -100.0);
        assert_eq!(unit.get_param(0), -24.0);
        unit.set_param(99, 1.0);
        assert_eq!(unit.updates, 2);
    }

    #[test]
    fn test_stepped_rounding() {
        let mut unit = TestUnit::new();
        unit.set_param(2, 0.7);
        assert_eq!(unit.get_param(2), 1.0);
        unit.set_param(3, 1.6);
        assert_eq!(unit.get_param(3), 2.0);
        unit.set_param(3, 9.0);
        assert_eq!(unit.get_param(3), 2.0);
    }

    #[test]
    fn test_find_by_name_short_and_string_id() {
        let unit = TestUnit::new();
        assert_eq!(unit.find_param_by_name("gain"), Some(0));
        assert_eq!(unit.find_param_by_name("TEST_RATIO"), Some(1));
        assert_eq!(unit.find_param_by_name("Mode"), Some(3));
        assert_eq!(unit.find_param_by_name("missing"), None);
    }

    #[test]
    fn test_param_id_lookup() {
        let unit = TestUnit::new();
        assert_eq!(unit.param_id(1), Some(ParamId(101)));
        assert_eq!(unit.param_id(4), None);
        assert_eq!(unit.param_index_by_id(ParamId(103)), Some(3));
        assert_eq!(unit.param_index_by_id(ParamId(999)), None);
    }

    #[test]
    fn test_reset_to_default() {
        let mut unit = TestUnit::new();
        unit.set_param(0, 12.0);
        unit.set_param(3, 0.0);
        unit.reset_params_to_default();
        assert_eq!(unit.get_param(0), 0.0);
        assert_eq!(unit.get_param(1), 2.0);
        assert_eq!(unit.get_param(3), 1.0);
    }

    #[test]
    fn test_runtime_inactive_flag() {
        let mut unit = TestUnit::new();
        assert!(unit.param_info(2).is_some_and(|d| d.is_active()));
        unit.set_param(3, 0.0);
        assert!(unit.param_info(2).is_some_and(|d| !d.is_active()));
    }

    #[test]
    fn test_with_active_round_trip() {
        let desc = ParamDescriptor::mix().with_active(false);
        assert!(!desc.is_active());
        let desc = desc.with_active(true);
        assert!(desc.is_active());
        assert!(desc.flags.contains(ParamFlags::AUTOMATABLE));
    }

    #[test]
    fn test_clamp_nan_to_default() {
        let desc = ParamDescriptor::mix();
        assert_eq!(desc.clamp(f32::NAN), 100.0);
    }

    #[test]
    fn test_normalize_linear() {
        let desc = ParamDescriptor::mix();
        assert_eq!(desc.normalize(50.0), 0.5);
        assert_eq!(desc.denormalize(0.5), 50.0);
        assert_eq!(desc.denormalize(2.0), 100.0);
    }

    #[test]
    fn test_normalize_logarithmic() {
        let desc = ParamDescriptor::frequency_hz("LPF", "LPF", 200.0, 20000.0, 20000.0);
        assert!(desc.normalize(200.0).abs() < 1e-6);
        assert!((desc.normalize(20000.0) - 1.0).abs() < 1e-6);
        let mid = desc.denormalize(0.5);
        assert!((mid - 2000.0).abs() < 1.0, "log midpoint {mid}");
        for &val in &[200.0, 700.0, 5000.0, 20000.0] {
            let rt = desc.denormalize(desc.normalize(val));
            assert!((rt - val).abs() / val < 1e-4, "{val} -> {rt}");
        }
    }

    #[test]
    fn test_normalize_mid_point() {
        let desc =
            ParamDescriptor::knob("Ratio", "Ratio", ParamUnit::Ratio, 1.0, 20.0, 2.0).with_mid_point(2.0);
        assert!((desc.normalize(2.0) - 0.5).abs() < 1e-5);
        assert!((desc.denormalize(0.5) - 2.0).abs() < 1e-4);
        assert_eq!(desc.normalize(1.0), 0.0);
        assert!((desc.normalize(20.0) - 1.0).abs() < 1e-6);
        for &val in &[1.5, 4.0, 10.0, 18.0] {
            let rt = desc.denormalize(desc.normalize(val));
            assert!((rt - val).abs() < 1e-3, "{val} -> {rt}");
        }
    }

    #[test]
    fn test_mid_point_outside_range_is_linear() {
        let desc = ParamDescriptor::mix().with_mid_point(150.0);
        assert_eq!(desc.normalize(25.0), 0.25);
    }

    #[test]
    fn test_normalize_zero_range() {
        let desc = ParamDescriptor::gain_db("Fixed", "Fixed", 3.0, 3.0, 3.0);
        assert_eq!(desc.normalize(3.0), 0.0);
    }

    #[test]
    fn test_dropdown_labels() {
        let desc = ParamDescriptor::dropdown("Mode", "Mode", MODES, 0);
        assert_eq!(desc.option_label(2.0), Some("fast"));
        assert_eq!(desc.option_label(0.4), Some("slow"));
        assert_eq!(desc.option_index("MEDIUM"), Some(1));
        assert_eq!(desc.option_index("turbo"), None);
        assert!(ParamDescriptor::mix().options().is_empty());
    }

    #[test]
    fn test_toggle_defaults() {
        let on = ParamDescriptor::toggle("Sync", "Sync", true);
        assert_eq!(on.default, 1.0);
        assert_eq!(on.min, 0.0);
        assert_eq!(on.max, 1.0);
        assert_eq!(on.unit, ParamUnit::None);
    }

    #[test]
    fn test_param_unit_suffix() {
        assert_eq!(ParamUnit::Hertz.suffix(), " Hz");
        assert_eq!(ParamUnit::Milliseconds.suffix(), " ms");
        assert_eq!(ParamUnit::Percent.suffix(), " %");
        assert_eq!(ParamUnit::Ratio.suffix(), ":1");
        assert_eq!(ParamUnit::Multiplier.suffix(), " x");
        assert_eq!(ParamUnit::Degrees.suffix(), " deg");
    }

    #[test]
    fn test_descriptor_debug_clone() {
        let desc = ParamDescriptor::time_ms("Attack", "Attack", 0.01, 50.0, 1.0);
        let _ = format!("{:?}", desc);
        let cloned = desc;
        assert_eq!(desc, cloned);
    }

    #[test]
    fn test_flags_difference() {
        let f = ParamFlags::AUTOMATABLE.union(ParamFlags::INACTIVE);
        assert_eq!(f.difference(ParamFlags::INACTIVE), ParamFlags::AUTOMATABLE);
    }
}
