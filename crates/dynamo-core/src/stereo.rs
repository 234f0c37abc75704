//! Two-channel sample container.
//!
//! [`Stereo`] is the value type that flows through every processing unit in
//! this crate. Arithmetic is elementwise, with a scalar allowed on either
//! side. Channel *selection* is magnitude based: [`Stereo::abs_max`] and
//! [`Stereo::abs_min`] return the signed value of the louder or quieter
//! channel, and the `mag_*` comparisons rank two stereo values by those
//! magnitudes.
//!
//! The magnitude comparisons are deliberately not `PartialOrd`: "greater"
//! looks at the louder channel while "less" looks at the quieter one, which
//! is not a consistent ordering. They are what the peak meters and the
//! linked gain reduction need.
//!
//! ```rust
//! use dynamo_core::Stereo;
//!
//! let a = Stereo::new(0.5_f32, -0.8);
//! assert_eq!(a.abs_max(), -0.8);
//! assert_eq!(a.abs_min(), 0.5);
//! assert!(a.mag_gt(Stereo::splat(0.7)));
//! assert_eq!(a * 2.0, Stereo::new(1.0, -1.6));
//! ```

use core::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

/// Scalar types a [`Stereo`] can carry.
///
/// Implemented for `f32` and `f64`. Kept minimal so the container stays
/// usable in `no_std` builds without pulling in a numeric-traits crate.
pub trait Sample:
    Copy
    + PartialEq
    + PartialOrd
    + Default
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
{
    /// Additive identity.
    const ZERO: Self;
    /// Multiplicative identity.
    const ONE: Self;

    /// Absolute value.
    fn abs(self) -> Self;

    /// True when the value is NaN.
    fn is_nan(self) -> bool;
}

macro_rules! impl_sample {
    ($t:ty) => {
        impl Sample for $t {
            const ZERO: Self = 0.0;
            const ONE: Self = 1.0;

            #[inline]
            fn abs(self) -> Self {
                <$t>::abs(self)
            }

            #[inline]
            fn is_nan(self) -> bool {
                <$t>::is_nan(self)
            }
        }
    };
}

impl_sample!(f32);
impl_sample!(f64);

/// A left/right pair of samples.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Stereo<T> {
    /// Left channel.
    pub l: T,
    /// Right channel.
    pub r: T,
}

impl<T: Sample> Stereo<T> {
    /// Silence on both channels.
    pub const ZERO: Self = Self {
        l: T::ZERO,
        r: T::ZERO,
    };

    /// Unity on both channels. Used as the "no reduction" gain.
    pub const ONE: Self = Self {
        l: T::ONE,
        r: T::ONE,
    };

    /// Builds a stereo value from its two channels.
    #[inline]
    pub const fn new(l: T, r: T) -> Self {
        Self { l, r }
    }

    /// Builds a stereo value with the same sample on both channels.
    #[inline]
    pub const fn splat(x: T) -> Self {
        Self { l: x, r: x }
    }

    /// The channel value whose magnitude is larger (ties pick right).
    #[inline]
    pub fn abs_max(self) -> T {
        if self.l.abs() > self.r.abs() {
            self.l
        } else {
            self.r
        }
    }

    /// The channel value whose magnitude is smaller (ties pick right).
    #[inline]
    pub fn abs_min(self) -> T {
        if self.l.abs() < self.r.abs() {
            self.l
        } else {
            self.r
        }
    }

    /// Mean of the squared channels.
    #[inline]
    pub fn avg_squared(self) -> T {
        (self.l * self.l + self.r * self.r) / (T::ONE + T::ONE)
    }

    /// Applies `f` to both channels.
    #[inline]
    pub fn map(self, mut f: impl FnMut(T) -> T) -> Self {
        Self {
            l: f(self.l),
            r: f(self.r),
        }
    }

    /// Replaces NaN channels with `fallback`.
    #[inline]
    pub fn sanitize(self, fallback: T) -> Self {
        self.map(|x| if x.is_nan() { fallback } else { x })
    }

    /// True when either channel is NaN.
    #[inline]
    pub fn has_nan(self) -> bool {
        self.l.is_nan() || self.r.is_nan()
    }

    /// Louder-than: compares the magnitudes of the louder channels.
    #[inline]
    pub fn mag_gt(self, other: impl Into<Self>) -> bool {
        self.abs_max().abs() > other.into().abs_max().abs()
    }

    /// Louder-or-equal: compares the magnitudes of the louder channels.
    #[inline]
    pub fn mag_ge(self, other: impl Into<Self>) -> bool {
        self.abs_max().abs() >= other.into().abs_max().abs()
    }

    /// Quieter-than: compares the magnitudes of the quieter channels.
    #[inline]
    pub fn mag_lt(self, other: impl Into<Self>) -> bool {
        self.abs_min().abs() < other.into().abs_min().abs()
    }

    /// Quieter-or-equal: compares the magnitudes of the quieter channels.
    #[inline]
    pub fn mag_le(self, other: impl Into<Self>) -> bool {
        self.abs_min().abs() <= other.into().abs_min().abs()
    }
}

impl<T: Sample> From<T> for Stereo<T> {
    #[inline]
    fn from(x: T) -> Self {
        Self::splat(x)
    }
}

impl<T> From<(T, T)> for Stereo<T> {
    #[inline]
    fn from((l, r): (T, T)) -> Self {
        Self { l, r }
    }
}

impl<T> Stereo<T> {
    /// Splits into a `(left, right)` tuple.
    #[inline]
    pub fn into_tuple(self) -> (T, T) {
        (self.l, self.r)
    }
}

macro_rules! impl_binop {
    ($trait:ident, $method:ident, $assign_trait:ident, $assign_method:ident, $op:tt) => {
        impl<T: Sample> $trait for Stereo<T> {
            type Output = Self;

            #[inline]
            fn $method(self, rhs: Self) -> Self {
                Self {
                    l: self.l $op rhs.l,
                    r: self.r $op rhs.r,
                }
            }
        }

        impl<T: Sample> $trait<T> for Stereo<T> {
            type Output = Self;

            #[inline]
            fn $method(self, rhs: T) -> Self {
                Self {
                    l: self.l $op rhs,
                    r: self.r $op rhs,
                }
            }
        }

        impl<T: Sample> $assign_trait for Stereo<T> {
            #[inline]
            fn $assign_method(&mut self, rhs: Self) {
                *self = *self $op rhs;
            }
        }

        impl<T: Sample> $assign_trait<T> for Stereo<T> {
            #[inline]
            fn $assign_method(&mut self, rhs: T) {
                *self = *self $op rhs;
            }
        }

        impl $trait<Stereo<f32>> for f32 {
            type Output = Stereo<f32>;

            #[inline]
            fn $method(self, rhs: Stereo<f32>) -> Stereo<f32> {
                Stereo {
                    l: self $op rhs.l,
                    r: self $op rhs.r,
                }
            }
        }

        impl $trait<Stereo<f64>> for f64 {
            type Output = Stereo<f64>;

            #[inline]
            fn $method(self, rhs: Stereo<f64>) -> Stereo<f64> {
                Stereo {
                    l: self $op rhs.l,
                    r: self $op rhs.r,
                }
            }
        }
    };
}

impl_binop!(Add, add, AddAssign, add_assign, +);
impl_binop!(Sub, sub, SubAssign, sub_assign, -);
impl_binop!(Mul, mul, MulAssign, mul_assign, *);
impl_binop!(Div, div, DivAssign, div_assign, /);

impl<T: Sample> Neg for Stereo<T> {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self {
            l: -self.l,
            r: -self.r,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elementwise_ops() {
        let a = Stereo::new(1.0_f32, 2.0);
        let b = Stereo::new(3.0_f32, -4.0);
        assert_eq!(a + b, Stereo::new(4.0, -2.0));
        assert_eq!(a - b, Stereo::new(-2.0, 6.0));
        assert_eq!(a * b, Stereo::new(3.0, -8.0));
        assert_eq!(b / a, Stereo::new(3.0, -2.0));
        assert_eq!(-a, Stereo::new(-1.0, -2.0));
    }

    #[test]
    fn test_scalar_on_both_sides() {
        let a = Stereo::new(1.0_f32, -2.0);
        assert_eq!(a * 0.5, Stereo::new(0.5, -1.0));
        assert_eq!(0.5 * a, Stereo::new(0.5, -1.0));
        assert_eq!(1.0 - a, Stereo::new(0.0, 3.0));
        assert_eq!(a + 1.0, Stereo::new(2.0, -1.0));
        assert_eq!(2.0 / Stereo::new(4.0_f32, -1.0), Stereo::new(0.5, -2.0));
    }

    #[test]
    fn test_assign_ops() {
        let mut a = Stereo::new(1.0_f64, 2.0);
        a += Stereo::splat(1.0);
        a *= 2.0;
        a -= 1.0;
        a /= Stereo::new(3.0, 5.0);
        assert_eq!(a, Stereo::new(1.0, 1.0));
    }

    #[test]
    fn test_abs_max_min_keep_sign() {
        let a = Stereo::new(-0.9_f32, 0.3);
        assert_eq!(a.abs_max(), -0.9);
        assert_eq!(a.abs_min(), 0.3);
    }

    #[test]
    fn test_magnitude_comparisons() {
        let loud = Stereo::new(-0.9_f32, 0.1);
        let quiet = Stereo::new(0.5_f32, 0.4);

        // Louder channel decides "greater"
        assert!(loud.mag_gt(quiet));
        // Quieter channel decides "less"
        assert!(loud.mag_lt(quiet));
        assert!(loud.mag_ge(loud));
        assert!(loud.mag_le(loud));
        assert!(quiet.mag_gt(0.45_f32));
        assert!(!quiet.mag_lt(0.3_f32));
    }

    #[test]
    fn test_sanitize() {
        let a = Stereo::new(f32::NAN, 0.25);
        assert!(a.has_nan());
        let b = a.sanitize(1.0);
        assert_eq!(b, Stereo::new(1.0, 0.25));
        assert!(!b.has_nan());
    }

    #[test]
    fn test_avg_squared() {
        let a = Stereo::new(1.0_f32, 3.0);
        assert_eq!(a.avg_squared(), 5.0);
    }

    #[test]
    fn test_tuple_conversion() {
        let s: Stereo<f32> = (0.1, 0.2).into();
        assert_eq!(s.into_tuple(), (0.1, 0.2));
    }
}
