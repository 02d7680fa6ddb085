use std::cmp::Ordering;
use std::fmt::Debug;
use std::ops::Add;
use std::ops::Mul;
use std::ops::Neg;
use std::ops::Sub;

use num::traits::Bounded;
use num::traits::NumCast;
use num::traits::One;
use num::traits::Zero;

/// The value model shared by all scalar domains.
///
/// Implemented for `i32`, `i64`, `f32` and `f64`. Floating point types compare
/// equal within a configurable tolerance; this tolerance is honoured
/// consistently by every arithmetic arc, otherwise floating constraints would
/// oscillate around the fixpoint instead of converging. Integral types ignore
/// the tolerance.
///
/// Bound arithmetic saturates at [`Bounded::min_value`]/[`Bounded::max_value`]
/// rather than wrapping, so arcs over full-range intermediate variables stay
/// sound.
pub trait DomainValue:
    Copy
    + PartialOrd
    + Debug
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Neg<Output = Self>
    + Zero
    + One
    + Bounded
    + NumCast
    + 'static
{
    /// Whether the type has integral semantics: exact comparisons and unit
    /// steps between adjacent values.
    const INTEGRAL: bool;

    /// The equality tolerance used when none is configured explicitly. Zero
    /// for integral types.
    fn default_tolerance() -> Self;

    /// A total order over domain values. Domains never contain NaN, so for
    /// floating point types this is `total_cmp`.
    fn total_cmp(self, other: Self) -> Ordering;

    fn eq_within(self, other: Self, tolerance: Self) -> bool;

    /// The next distinguishable value above `self` under the tolerance.
    fn succ(self, tolerance: Self) -> Self;

    /// The next distinguishable value below `self` under the tolerance.
    fn pred(self, tolerance: Self) -> Self;

    fn add_sat(self, rhs: Self) -> Self;
    fn sub_sat(self, rhs: Self) -> Self;
    fn mul_sat(self, rhs: Self) -> Self;

    /// Division rounded towards negative infinity. `rhs` must be non-zero.
    fn div_down(self, rhs: Self) -> Self;

    /// Division rounded towards positive infinity. `rhs` must be non-zero.
    fn div_up(self, rhs: Self) -> Self;

    fn to_f64(self) -> f64;

    /// The largest representable value that is at most `value`.
    fn from_f64_down(value: f64) -> Self;

    /// The smallest representable value that is at least `value`.
    fn from_f64_up(value: f64) -> Self;

    fn neg_sat(self) -> Self {
        Self::zero().sub_sat(self)
    }

    fn abs_sat(self) -> Self {
        if self.total_cmp(Self::zero()) == Ordering::Less {
            self.neg_sat()
        } else {
            self
        }
    }

    /// Strictly-less under the tolerance: less in the total order and not
    /// within tolerance of `other`.
    fn lt_within(self, other: Self, tolerance: Self) -> bool {
        self.total_cmp(other) == Ordering::Less && !self.eq_within(other, tolerance)
    }

    fn leq_within(self, other: Self, tolerance: Self) -> bool {
        self.total_cmp(other) != Ordering::Greater || self.eq_within(other, tolerance)
    }

    fn min_by_order(self, other: Self) -> Self {
        if other.total_cmp(self) == Ordering::Less {
            other
        } else {
            self
        }
    }

    fn max_by_order(self, other: Self) -> Self {
        if other.total_cmp(self) == Ordering::Greater {
            other
        } else {
            self
        }
    }
}

macro_rules! integral_domain_value {
    ($target:ty) => {
        impl DomainValue for $target {
            const INTEGRAL: bool = true;

            fn default_tolerance() -> Self {
                0
            }

            fn total_cmp(self, other: Self) -> Ordering {
                Ord::cmp(&self, &other)
            }

            fn eq_within(self, other: Self, _tolerance: Self) -> bool {
                self == other
            }

            fn succ(self, _tolerance: Self) -> Self {
                self.saturating_add(1)
            }

            fn pred(self, _tolerance: Self) -> Self {
                self.saturating_sub(1)
            }

            fn add_sat(self, rhs: Self) -> Self {
                self.saturating_add(rhs)
            }

            fn sub_sat(self, rhs: Self) -> Self {
                self.saturating_sub(rhs)
            }

            fn mul_sat(self, rhs: Self) -> Self {
                self.saturating_mul(rhs)
            }

            fn div_down(self, rhs: Self) -> Self {
                let quotient = self / rhs;
                if self % rhs != 0 && ((self < 0) != (rhs < 0)) {
                    quotient - 1
                } else {
                    quotient
                }
            }

            fn div_up(self, rhs: Self) -> Self {
                let quotient = self / rhs;
                if self % rhs != 0 && ((self < 0) == (rhs < 0)) {
                    quotient + 1
                } else {
                    quotient
                }
            }

            fn to_f64(self) -> f64 {
                self as f64
            }

            fn from_f64_down(value: f64) -> Self {
                if value.is_nan() {
                    0
                } else if value >= Self::MAX as f64 {
                    Self::MAX
                } else if value <= Self::MIN as f64 {
                    Self::MIN
                } else {
                    <Self as NumCast>::from(value.floor()).unwrap_or(Self::MAX)
                }
            }

            fn from_f64_up(value: f64) -> Self {
                if value.is_nan() {
                    0
                } else if value >= Self::MAX as f64 {
                    Self::MAX
                } else if value <= Self::MIN as f64 {
                    Self::MIN
                } else {
                    <Self as NumCast>::from(value.ceil()).unwrap_or(Self::MIN)
                }
            }
        }
    };
}

macro_rules! fractional_domain_value {
    ($target:ty, $tolerance:expr) => {
        impl DomainValue for $target {
            const INTEGRAL: bool = false;

            fn default_tolerance() -> Self {
                $tolerance
            }

            fn total_cmp(self, other: Self) -> Ordering {
                <$target>::total_cmp(&self, &other)
            }

            fn eq_within(self, other: Self, tolerance: Self) -> bool {
                (self - other).abs() <= tolerance
            }

            fn succ(self, tolerance: Self) -> Self {
                (self + Self::step(tolerance)).clamp(Self::MIN, Self::MAX)
            }

            fn pred(self, tolerance: Self) -> Self {
                (self - Self::step(tolerance)).clamp(Self::MIN, Self::MAX)
            }

            fn add_sat(self, rhs: Self) -> Self {
                (self + rhs).clamp(Self::MIN, Self::MAX)
            }

            fn sub_sat(self, rhs: Self) -> Self {
                (self - rhs).clamp(Self::MIN, Self::MAX)
            }

            fn mul_sat(self, rhs: Self) -> Self {
                (self * rhs).clamp(Self::MIN, Self::MAX)
            }

            fn div_down(self, rhs: Self) -> Self {
                (self / rhs).clamp(Self::MIN, Self::MAX)
            }

            fn div_up(self, rhs: Self) -> Self {
                (self / rhs).clamp(Self::MIN, Self::MAX)
            }

            fn to_f64(self) -> f64 {
                self as f64
            }

            fn from_f64_down(value: f64) -> Self {
                (value as $target).clamp(Self::MIN, Self::MAX)
            }

            fn from_f64_up(value: f64) -> Self {
                (value as $target).clamp(Self::MIN, Self::MAX)
            }
        }

        impl Step for $target {
            fn step(tolerance: Self) -> Self {
                if tolerance > 0.0 {
                    tolerance
                } else {
                    <$target>::EPSILON
                }
            }
        }
    };
}

/// The smallest increment considered distinguishable for a fractional type.
trait Step {
    fn step(tolerance: Self) -> Self;
}

integral_domain_value!(i32);
integral_domain_value!(i64);
fractional_domain_value!(f32, 1e-4);
fractional_domain_value!(f64, 1e-9);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_directed_division_rounds_outward() {
        assert_eq!(7_i32.div_down(2), 3);
        assert_eq!(7_i32.div_up(2), 4);
        assert_eq!((-7_i32).div_down(2), -4);
        assert_eq!((-7_i32).div_up(2), -3);
        assert_eq!(7_i32.div_down(-2), -4);
        assert_eq!(7_i32.div_up(-2), -3);
        assert_eq!((-7_i32).div_down(-2), 3);
        assert_eq!((-7_i32).div_up(-2), 4);
        assert_eq!(6_i32.div_down(2), 3);
        assert_eq!(6_i32.div_up(2), 3);
    }

    #[test]
    fn integral_steps_saturate() {
        assert_eq!(i32::MAX.succ(0), i32::MAX);
        assert_eq!(i32::MIN.pred(0), i32::MIN);
        assert_eq!(5_i32.succ(0), 6);
        assert_eq!(5_i32.pred(0), 4);
    }

    #[test]
    fn fractional_equality_uses_tolerance() {
        assert!(1.0_f64.eq_within(1.0 + 1e-10, 1e-9));
        assert!(!1.0_f64.eq_within(1.0 + 1e-8, 1e-9));
        assert!(1.0_f64.lt_within(2.0, 1e-9));
        assert!(!(1.0_f64).lt_within(1.0 + 1e-10, 1e-9));
    }

    #[test]
    fn saturating_arithmetic_stays_finite() {
        assert_eq!(f64::MAX.add_sat(f64::MAX), f64::MAX);
        assert_eq!(f64::MIN.sub_sat(f64::MAX), f64::MIN);
        assert_eq!(i64::MAX.mul_sat(2), i64::MAX);
        assert_eq!(i32::MIN.neg_sat(), i32::MAX);
    }

    #[test]
    fn directed_f64_conversion() {
        assert_eq!(i32::from_f64_down(2.7), 2);
        assert_eq!(i32::from_f64_up(2.3), 3);
        assert_eq!(i32::from_f64_down(-2.3), -3);
        assert_eq!(i32::from_f64_up(-2.7), -2);
        assert_eq!(i32::from_f64_up(1e300), i32::MAX);
        assert_eq!(i32::from_f64_down(-1e300), i32::MIN);
    }
}
