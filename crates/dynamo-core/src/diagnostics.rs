//! Non-finite state reporting.
//!
//! Processing units heal NaN locally (see [`sanitize`](crate::sanitize)), so
//! audio never depends on this module. It only answers "which variable went
//! bad?" for a debugging popup or a log line. Reporting is off by default;
//! when off, [`DiagnosticChannel::check`] is a plain NaN test.

use crate::stereo::Stereo;

/// Identifies the internal variable that was found non-finite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum NonFiniteTag {
    /// Left input sample.
    InputLeft = 1,
    /// Right input sample.
    InputRight = 2,
    /// Feedback state carried between samples.
    FeedbackState = 3,
    /// Gain reduction from the side-chain.
    GainReduction = 4,
    /// Delay line read-back.
    DelayLine = 5,
    /// A drained meter value.
    Meter = 6,
}

impl NonFiniteTag {
    /// Numeric code shown to users.
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Short description of the variable.
    pub const fn describe(self) -> &'static str {
        match self {
            NonFiniteTag::InputLeft => "left input",
            NonFiniteTag::InputRight => "right input",
            NonFiniteTag::FeedbackState => "feedback state",
            NonFiniteTag::GainReduction => "gain reduction",
            NonFiniteTag::DelayLine => "delay line",
            NonFiniteTag::Meter => "meter",
        }
    }
}

impl core::fmt::Display for NonFiniteTag {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} ({})", self.describe(), self.code())
    }
}

/// Latching record of the most recent non-finite variable.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiagnosticChannel {
    enabled: bool,
    last: Option<NonFiniteTag>,
}

impl DiagnosticChannel {
    /// A disabled channel.
    pub const fn new() -> Self {
        Self {
            enabled: false,
            last: None,
        }
    }

    /// Turns reporting on or off. Turning it off clears any pending tag.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.last = None;
        }
    }

    /// Whether reporting is on.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Records `tag` if `x` is NaN and reporting is on. Returns whether `x` was NaN.
    #[inline]
    pub fn check(&mut self, tag: NonFiniteTag, x: f32) -> bool {
        let bad = x.is_nan();
        if bad && self.enabled {
            self.last = Some(tag);
        }
        bad
    }

    /// Checks both channels of `x` under one tag.
    #[inline]
    pub fn check_stereo(&mut self, tag: NonFiniteTag, x: Stereo<f32>) -> bool {
        self.check(tag, x.l) | self.check(tag, x.r)
    }

    /// Returns and clears the last recorded tag.
    pub fn take(&mut self) -> Option<NonFiniteTag> {
        let tag = self.last.take();
        #[cfg(feature = "tracing")]
        if let Some(t) = tag {
            tracing::warn!(variable = t.describe(), code = t.code(), "non-finite state healed");
        }
        tag
    }
}
