//! Musical subdivisions for tempo-synced delay times.

/// Note length a tempo-synced delay locks to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Subdivision {
    /// Half note (2 beats)
    Half,
    /// Quarter note (1 beat)
    #[default]
    Fourth,
    /// Dotted eighth (3/4 beat)
    EighthDot,
    /// Eighth note (1/2 beat)
    Eighth,
    /// Dotted sixteenth (3/8 beat)
    SixteenthDot,
    /// Sixteenth note (1/4 beat)
    Sixteenth,
}

impl Subdivision {
    /// Every subdivision, in drop-down order.
    pub const ALL: [Subdivision; 6] = [
        Subdivision::Half,
        Subdivision::Fourth,
        Subdivision::EighthDot,
        Subdivision::Eighth,
        Subdivision::SixteenthDot,
        Subdivision::Sixteenth,
    ];

    /// Length in beats (quarter notes).
    pub const fn beats(self) -> f32 {
        match self {
            Subdivision::Half => 2.0,
            Subdivision::Fourth => 1.0,
            Subdivision::EighthDot => 0.5 * 1.5,
            Subdivision::Eighth => 0.5,
            Subdivision::SixteenthDot => 0.25 * 1.5,
            Subdivision::Sixteenth => 0.25,
        }
    }

    /// Drop-down label.
    pub const fn label(self) -> &'static str {
        match self {
            Subdivision::Half => "half",
            Subdivision::Fourth => "fourth",
            Subdivision::EighthDot => "eighth_dot",
            Subdivision::Eighth => "eighth",
            Subdivision::SixteenthDot => "sixteenth_dot",
            Subdivision::Sixteenth => "sixteenth",
        }
    }

    /// Position in [`ALL`](Self::ALL).
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Subdivision at drop-down position `idx`.
    pub fn from_index(idx: usize) -> Option<Self> {
        Self::ALL.get(idx).copied()
    }

    /// Parse a [`label`](Self::label).
    pub fn from_label(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.label().eq_ignore_ascii_case(s))
    }

    /// Length in seconds at `bpm`. Returns `None` for a non-positive tempo.
    ///
    /// # Example
    ///
    /// ```rust
    /// use dynamo_core::Subdivision;
    ///
    /// // At 120 BPM a dotted eighth lasts 375 ms
    /// let t = Subdivision::EighthDot.seconds(120.0).unwrap();
    /// assert!((t - 0.375).abs() < 1e-6);
    /// ```
    pub fn seconds(self, bpm: f32) -> Option<f32> {
        if bpm > 0.0 {
            Some(60.0 / bpm * self.beats())
        } else {
            None
        }
    }
}
