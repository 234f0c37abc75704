//! Mathematical utility functions for DSP.
//!
//! Provides common DSP math operations for real-time audio processing.
//! All functions are allocation-free and suitable for `no_std`.
//!
//! # Level Conversions
//!
//! - [`db_to_linear`] / [`linear_to_db`] - Convert between dB and linear gain
//! - [`amplitude_to_db`] - Unfloored conversion (silence maps to `-inf`)
//!
//! # Non-finite Guards
//!
//! - [`sanitize`] - Replace NaN with a fallback at feedback re-entry points
//!
//! # Utilities
//!
//! - [`hz_to_omega`] - Frequency to angular frequency
//! - [`ms_to_samples`] - Time conversions
//! - [`flush_denormal`] / [`wet_dry_mix`]

use libm::{expf, logf};

/// Convert decibels to linear gain.
///
/// # Arguments
/// * `db` - Value in decibels
///
/// # Returns
/// Linear gain value (e.g., 0 dB → 1.0, -6 dB → 0.5, +6 dB → 2.0)
///
/// # Example
/// ```rust
/// use dynamo_core::db_to_linear;
///
/// assert!((db_to_linear(0.0) - 1.0).abs() < 0.001);
/// assert!((db_to_linear(-6.02) - 0.5).abs() < 0.01);
/// ```
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    // 10^(dB/20) = e^(dB * ln(10)/20)
    const FACTOR: f32 = core::f32::consts::LN_10 / 20.0;
    expf(db * FACTOR)
}

/// Convert linear gain to decibels, floored at -200 dB.
///
/// Intended for display and metering where `-inf` is unwelcome.
///
/// # Example
/// ```rust
/// use dynamo_core::linear_to_db;
///
/// assert!((linear_to_db(1.0) - 0.0).abs() < 0.001);
/// assert!((linear_to_db(0.5) - (-6.02)).abs() < 0.01);
/// ```
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    // 20 * log10(linear) = 20 * ln(linear) / ln(10)
    const FACTOR: f32 = 20.0 / core::f32::consts::LN_10;
    logf(linear.max(1e-10)) * FACTOR
}

/// Convert an amplitude to decibels without a floor.
///
/// `0.0` maps to `-inf` and negative inputs to NaN. The side-chain gain
/// computer relies on this and cleans up with [`sanitize`].
#[inline]
pub fn amplitude_to_db(x: f32) -> f32 {
    20.0 * libm::log10f(x)
}

/// Replace NaN with `fallback`.
///
/// The single non-finite guard used at every feedback re-entry point.
/// Infinities pass through unchanged.
///
/// ```rust
/// use dynamo_core::sanitize;
///
/// assert_eq!(sanitize(f32::NAN, 1.0), 1.0);
/// assert_eq!(sanitize(0.25, 1.0), 0.25);
/// ```
#[allow(clippy::inline_always)]
#[inline(always)]
pub fn sanitize(x: f32, fallback: f32) -> f32 {
    if x.is_nan() { fallback } else { x }
}

/// Convert frequency in Hz to angular frequency (radians/sample).
#[inline]
pub fn hz_to_omega(freq_hz: f32, sample_rate: f32) -> f32 {
    core::f32::consts::TAU * freq_hz / sample_rate
}

/// Convert milliseconds to samples.
///
/// # Arguments
/// * `ms` - Time in milliseconds
/// * `sample_rate` - Sample rate in Hz
///
/// # Returns
/// Time in samples
#[inline]
pub fn ms_to_samples(ms: f32, sample_rate: f32) -> f32 {
    ms * sample_rate / 1000.0
}

/// Flush denormal (subnormal) floating-point values to zero.
///
/// Subnormal floats (magnitudes below ~1.2e-38 for f32) cause severe CPU
/// slowdowns on most architectures. Values below 1e-20 are replaced with
/// zero, providing margin before the IEEE 754 subnormal range begins.
///
/// Use this in feedback loops (delay lines, biquad histories) where a
/// signal can decay indefinitely toward zero.
#[allow(clippy::inline_always)]
#[inline(always)]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < 1e-20 { 0.0 } else { x }
}

/// Crossfade between dry and wet signals.
///
/// Equivalent to `dry * (1 - mix) + wet * mix` but uses one fewer multiply:
/// `dry + (wet - dry) * mix`.
///
/// # Arguments
///
/// * `dry` - Unprocessed signal
/// * `wet` - Processed signal
/// * `mix` - Blend factor in \[0.0, 1.0\]: 0.0 = all dry, 1.0 = all wet
#[inline]
pub fn wet_dry_mix(dry: f32, wet: f32, mix: f32) -> f32 {
    dry + (wet - dry) * mix
}
