//! Dynamo Core - per-sample DSP primitives for stereo dynamics processing
//!
//! This crate provides the building blocks the `dynamo` processing units are
//! made of, designed for real-time audio with zero allocation in the audio
//! path and local recovery from non-finite numerical states.
//!
//! # Core Abstractions
//!
//! ## Processing Units
//!
//! - [`StereoProcessor`] - Lifecycle contract: `process_sample`, `update_coeffs`, `reset`
//! - [`ProcessorExt`] - Extension trait for chaining units
//! - [`Chain`] - Zero-cost two-unit chain combinator
//! - [`ParameterInfo`] - Parameter table (descriptors, clamped writes)
//! - [`Metered`] - Meter pull API (`get_and_reset_peak_level`)
//!
//! ## Signal Types
//!
//! - [`Stereo`] - Two-channel sample with elementwise arithmetic and
//!   magnitude comparisons
//! - [`sanitize`] - The single NaN-healing helper every unit funnels through
//!
//! ## Dynamics
//!
//! - [`sidechain`] - Threshold/ratio/knee gain computer with attack/release
//!   smoothing, in dB or linear domain
//! - [`RmsSensor`] - Running-sum RMS level detector
//!
//! ## Filters and Shapers
//!
//! - [`StereoBiquad`] - RBJ biquad (bell, shelves, notch, pass filters)
//! - [`SoftClip5`] / [`SoftClip3`] - Odd-polynomial soft clippers with flat tangent at the knee
//!
//! ## Anti-Aliasing
//!
//! - [`Oversampler`] - Polyphase FIR oversampling around any unit
//! - [`window_method`] - Window-method FIR design (requires `std`)
//!
//! ## Time-Based
//!
//! - [`StereoDelayLine`] - Fixed-capacity circular buffer
//! - [`ModOscillator`] - Deterministic triangle LFO with stereo phase offset
//! - [`Subdivision`] - Musical note lengths for tempo sync
//!
//! ## Metering and Diagnostics
//!
//! - [`PeakMeters`] - Peak (or inverted minimum) accumulators
//! - [`MeterBallistics`] - Display-side decay and peak hold
//! - [`DiagnosticChannel`] - Optional record of which variable went non-finite
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible. Disable the default `std` feature in
//! your `Cargo.toml`; everything except FIR design stays available:
//!
//! ```toml
//! [dependencies]
//! dynamo-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use dynamo_core::{Oversampler, OversamplingMode, Stereo, StereoProcessor};
//!
//! let mut unit = Oversampler::new(compressor);
//! unit.set_mode(OversamplingMode::Fir4xHq, 48000.0);
//!
//! for frame in buffer.iter_mut() {
//!     *frame = unit.process_sample(*frame);
//! }
//! ```
//!
//! # Design Principles
//!
//! - **Real-time safe**: No allocations, locks or fallible calls per sample
//! - **Edge-triggered coefficients**: Derived values are recomputed on
//!   parameter writes, never per sample
//! - **Self-healing**: NaN state is replaced locally and never propagates

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod biquad;
pub mod delay;
pub mod diagnostics;
pub mod lfo;
pub mod math;
pub mod meter;
pub mod oversample;
pub mod param_info;
pub mod processor;
pub mod rms;
pub mod sidechain;
pub mod soft_clip;
pub mod stereo;
pub mod tempo;
#[cfg(feature = "std")]
pub mod window;

// Re-export main types at crate root
pub use biquad::{BiquadCoeffs, BiquadCoeffs6, BiquadSettings, BiquadShape, BiquadState, StereoBiquad};
pub use delay::StereoDelayLine;
pub use diagnostics::{DiagnosticChannel, NonFiniteTag};
pub use lfo::{ModOscillator, saw};
pub use math::{
    amplitude_to_db, db_to_linear, flush_denormal, hz_to_omega, linear_to_db, ms_to_samples,
    sanitize, wet_dry_mix,
};
pub use meter::{MeterBallistics, MeterSpec, Metered, PeakMeters};
pub use oversample::{OversamplingMode, Oversampler, SrcCoeffs, SrcState};
pub use param_info::{
    ParamDescriptor, ParamFlags, ParamGroup, ParamId, ParamKind, ParamScale, ParamUnit,
    ParameterInfo,
};
pub use processor::{Chain, ProcessorExt, StereoProcessor};
pub use rms::{RMS_MAX_TIME_MS, RMS_MAX_WINDOW, RmsSensor};
pub use sidechain::{ScCoeffs, ScSettings, ScState, SideChainCurve};
pub use soft_clip::{SoftClip, SoftClip3, SoftClip5};
pub use stereo::{Sample, Stereo};
pub use tempo::Subdivision;
#[cfg(feature = "std")]
pub use window::{Window, brick_wall_response, window_method};
