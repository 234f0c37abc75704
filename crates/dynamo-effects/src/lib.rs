//! Dynamo Effects - stereo processing units built on dynamo-core
//!
//! - [`Compressor`] - Feed-forward/feedback compressor with side-chain EQ,
//!   stereo link, listen mode and soft-clipped makeup
//! - [`TapeEcho`] - Modulated tape delay with drive, filtered feedback,
//!   delay-time glide and tempo sync
//! - [`Gain`] - Clean gain stage
//!
//! Every unit implements [`StereoProcessor`](dynamo_core::StereoProcessor),
//! [`ParameterInfo`](dynamo_core::ParameterInfo) and
//! [`Metered`](dynamo_core::Metered). The [`registry`] names them and builds
//! them by identifier as [`EffectUnit`].
//!
//! ## Example
//!
//! ```rust
//! use dynamo_core::{Oversampler, OversamplingMode, ProcessorExt, Stereo, StereoProcessor};
//! use dynamo_effects::{Compressor, Gain};
//!
//! let mut comp = Compressor::new(96000.0);
//! comp.set_threshold_db(-18.0);
//! comp.set_ratio(4.0);
//!
//! let mut trim = Gain::new(96000.0);
//! trim.set_gain_db(-3.0);
//!
//! let mut chain = Oversampler::new(comp.chain(trim));
//! chain.set_mode(OversamplingMode::Fir2xHq, 48000.0);
//! let y = chain.process_sample(Stereo::splat(0.5));
//! assert!(y.l.is_finite());
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod compressor;
pub mod gain;
pub mod registry;
pub mod tape_echo;

// Re-export main types at crate root
pub use compressor::Compressor;
pub use gain::Gain;
pub use registry::{EffectCategory, EffectDescriptor, EffectKind, EffectUnit};
pub use tape_echo::TapeEcho;
