//! Core processing-unit trait and related types.
//!
//! The [`StereoProcessor`] trait is the contract every effect in the
//! workspace implements and the oversampler wraps. A unit is driven through
//! three hooks:
//!
//! - [`process_sample`](StereoProcessor::process_sample) once per sample
//!   (once per *oversampled* sample when wrapped in an
//!   [`Oversampler`](crate::Oversampler))
//! - [`update_coeffs`](StereoProcessor::update_coeffs) after any parameter
//!   write
//! - [`reset`](StereoProcessor::reset) on stream start or sample-rate change
//!
//! ## Design Decisions
//!
//! - **Stereo samples**: Every unit sees both channels at once so it can
//!   link gain reduction or offset modulation between channels.
//!
//! - **Static dispatch**: The active effect is chosen when the host is
//!   built, so the hot path is generic over `P: StereoProcessor` rather than
//!   going through a vtable. The trait stays object-safe for setup code
//!   that wants `Box<dyn StereoProcessor>`.
//!
//! - **No allocations**: `process_sample` and `update_coeffs` never
//!   allocate. Buffers are sized in constructors.

use crate::stereo::Stereo;

/// Core trait for all stereo processing units.
///
/// # Example
///
/// ```rust
/// use dynamo_core::{Stereo, StereoProcessor};
///
/// struct Invert;
///
/// impl StereoProcessor for Invert {
///     fn process_sample(&mut self, x: Stereo<f32>) -> Stereo<f32> {
///         -x
///     }
///
///     fn update_coeffs(&mut self) {
///         // Nothing derived from parameters
///     }
///
///     fn reset(&mut self, _sample_rate: f32) {
///         // No internal state
///     }
/// }
///
/// let mut inv = Invert;
/// assert_eq!(inv.process_sample(Stereo::new(1.0, -0.5)), Stereo::new(-1.0, 0.5));
/// ```
pub trait StereoProcessor {
    /// Process a single stereo sample.
    ///
    /// Advances all internal state by one sample. Must not allocate, block
    /// or fail; non-finite intermediate values are healed locally.
    fn process_sample(&mut self, x: Stereo<f32>) -> Stereo<f32>;

    /// Recompute every coefficient derived from parameters and sample rate.
    ///
    /// Called after any parameter write. Not called per sample.
    fn update_coeffs(&mut self);

    /// Clear internal state and adopt a new sample rate.
    ///
    /// Implementations store `sample_rate`, clear histories and meters,
    /// then call [`update_coeffs`](Self::update_coeffs).
    fn reset(&mut self, sample_rate: f32);

    /// Host tempo in beats per minute.
    ///
    /// Default ignores the tempo. Tempo-synced units store it and recompute
    /// their synced times.
    fn set_tempo(&mut self, _bpm: f32) {}

    /// Report processing latency in samples.
    ///
    /// Default returns 0 (no latency).
    fn latency_samples(&self) -> usize {
        0
    }

    /// Process a block of samples in place.
    ///
    /// Default implementation calls `process_sample()` for each sample.
    fn process_block(&mut self, buffer: &mut [Stereo<f32>]) {
        for sample in buffer.iter_mut() {
            *sample = self.process_sample(*sample);
        }
    }

    /// Process separate left/right buffers in place.
    ///
    /// # Panics
    /// Debug builds panic if the buffers differ in length.
    fn process_block_split(&mut self, left: &mut [f32], right: &mut [f32]) {
        debug_assert_eq!(
            left.len(),
            right.len(),
            "Left and right buffers must have same length"
        );
        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            let y = self.process_sample(Stereo::new(*l, *r));
            *l = y.l;
            *r = y.r;
        }
    }
}

/// Extension trait for chaining processing units.
///
/// Provides a fluent interface for building chains with static dispatch.
pub trait ProcessorExt: StereoProcessor + Sized {
    /// Chain this unit with another, creating a composite unit.
    ///
    /// The output of `self` feeds into the input of `next`.
    ///
    /// # Example
    /// ```rust,ignore
    /// let chain = compressor.chain(tape_echo);
    /// ```
    fn chain<P: StereoProcessor>(self, next: P) -> Chain<Self, P> {
        Chain {
            first: self,
            second: next,
        }
    }
}

// Blanket implementation for all processors
impl<T: StereoProcessor> ProcessorExt for T {}

/// Two processing units in series.
///
/// Created by [`ProcessorExt::chain`].
pub struct Chain<A, B> {
    first: A,
    second: B,
}

impl<A: StereoProcessor, B: StereoProcessor> StereoProcessor for Chain<A, B> {
    #[inline]
    fn process_sample(&mut self, x: Stereo<f32>) -> Stereo<f32> {
        let mid = self.first.process_sample(x);
        self.second.process_sample(mid)
    }

    fn update_coeffs(&mut self) {
        self.first.update_coeffs();
        self.second.update_coeffs();
    }

    fn reset(&mut self, sample_rate: f32) {
        self.first.reset(sample_rate);
        self.second.reset(sample_rate);
    }

    fn set_tempo(&mut self, bpm: f32) {
        self.first.set_tempo(bpm);
        self.second.set_tempo(bpm);
    }

    fn latency_samples(&self) -> usize {
        self.first.latency_samples() + self.second.latency_samples()
    }
}

impl<A, B> Chain<A, B> {
    /// Get a reference to the first unit in the chain.
    pub fn first(&self) -> &A {
        &self.first
    }

    /// Get a mutable reference to the first unit in the chain.
    pub fn first_mut(&mut self) -> &mut A {
        &mut self.first
    }

    /// Get a reference to the second unit in the chain.
    pub fn second(&self) -> &B {
        &self.second
    }

    /// Get a mutable reference to the second unit in the chain.
    pub fn second_mut(&mut self) -> &mut B {
        &mut self.second
    }
}

impl<P: StereoProcessor + ?Sized> StereoProcessor for &mut P {
    #[inline]
    fn process_sample(&mut self, x: Stereo<f32>) -> Stereo<f32> {
        (**self).process_sample(x)
    }

    fn update_coeffs(&mut self) {
        (**self).update_coeffs();
    }

    fn reset(&mut self, sample_rate: f32) {
        (**self).reset(sample_rate);
    }

    fn set_tempo(&mut self, bpm: f32) {
        (**self).set_tempo(bpm);
    }

    fn latency_samples(&self) -> usize {
        (**self).latency_samples()
    }
}
