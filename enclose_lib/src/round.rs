//! Directed rounding primitives.
//!
//! Every arithmetic step in this crate computes either the lower or the
//! upper endpoint of a result.  A lower endpoint must never round above
//! the exact mathematical value, an upper endpoint must never round
//! below it.  The [`Round`] strategy is threaded explicitly through every
//! primitive call; there is no ambient floating-point mode anywhere, so
//! all operations stay pure and thread-safe.
//!
//! For `f64` the primitives are exact directed roundings: the two-sum
//! residual (addition, subtraction) and the FMA residual (multiplication,
//! division) reveal which side of the exact value the IEEE
//! round-to-nearest result landed on, and the result is nudged one ULP
//! outward only when needed.  `2.0 + 2.0` stays `4.0`.

/// Rounding direction for a single primitive evaluation.
///
/// `Down` rounds toward negative infinity and is used when computing
/// lower endpoints; `Up` rounds toward positive infinity and is used for
/// upper endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Round {
    Down,
    Up,
}

impl Round {
    /// The opposite direction.  Used when a monotone-decreasing step
    /// swaps which endpoint it is computing.
    pub fn flip(self) -> Self {
        match self {
            Round::Down => Round::Up,
            Round::Up => Round::Down,
        }
    }
}

/// The capabilities a bound representation must provide.
///
/// The interval engine needs nothing from its numeric type beyond a
/// total order over the non-NaN values, the signed infinities, and
/// round-toward-direction versions of the field operations.  Any
/// representation satisfying this trait can be used as the bound type;
/// `f64` is provided.
pub trait RoundedNumeric:
    Copy + PartialOrd + std::fmt::Debug + std::fmt::Display
{
    fn zero() -> Self;
    fn one() -> Self;
    fn infinity() -> Self;
    fn neg_infinity() -> Self;

    /// A small positive count (piece indices for splitting).
    fn from_count(n: u32) -> Self;

    fn is_finite(self) -> bool;
    fn is_nan(self) -> bool;

    /// Exact negation.
    fn neg(self) -> Self;

    /// `self + rhs`, rounded in the given direction.
    fn add_rounded(self, rhs: Self, round: Round) -> Self;

    /// `self - rhs`, rounded in the given direction.
    fn sub_rounded(self, rhs: Self, round: Round) -> Self;

    /// `self * rhs`, rounded in the given direction.
    ///
    /// Zero times anything, including an infinity, is zero.  This is the
    /// interval-arithmetic convention (the zero factor pins the product)
    /// and deliberately diverges from IEEE 754, where `0.0 * INFINITY`
    /// is NaN.
    fn mul_rounded(self, rhs: Self, round: Round) -> Self;

    /// `self / rhs`, rounded in the given direction.  `rhs` must not be
    /// zero; the arithmetic engine splits zero divisors out beforehand.
    ///
    /// A quotient of two same-signed infinities can be anywhere in
    /// `(0, +inf)`, so it rounds to the sound end for the requested
    /// direction (and symmetrically for opposite signs).
    fn div_rounded(self, rhs: Self, round: Round) -> Self;

    /// `self ^ n` for a non-negative base, rounded in the given
    /// direction.  `n == 0` gives one.
    fn pow_rounded(self, n: u32, round: Round) -> Self;

    /// One representable step outward.  Identity on infinities, which
    /// must never shrink.
    fn round_outward(self, round: Round) -> Self;
}

/// An operation overflowed to an infinity even though the exact result
/// is finite.  Toward the overflow the infinity is the correct directed
/// rounding; away from it the largest finite value is.
fn saturate(overflowed: f64, round: Round) -> f64 {
    match (overflowed > 0.0, round) {
        (true, Round::Up) => f64::INFINITY,
        (true, Round::Down) => f64::MAX,
        (false, Round::Down) => f64::NEG_INFINITY,
        (false, Round::Up) => f64::MIN,
    }
}

/// Correct a round-to-nearest result given the sign of the residual
/// `exact - value`.
fn nudge(value: f64, residual: f64, round: Round) -> f64 {
    match round {
        Round::Down if residual < 0.0 => value.next_down(),
        Round::Up if residual > 0.0 => value.next_up(),
        Round::Down | Round::Up => value,
    }
}

/// The residual is not available (underflow); step outward
/// unconditionally.
fn widen(value: f64, round: Round) -> f64 {
    match round {
        Round::Down => value.next_down(),
        Round::Up => value.next_up(),
    }
}

impl RoundedNumeric for f64 {
    fn zero() -> Self {
        0.0
    }

    fn one() -> Self {
        1.0
    }

    fn infinity() -> Self {
        f64::INFINITY
    }

    fn neg_infinity() -> Self {
        f64::NEG_INFINITY
    }

    fn from_count(n: u32) -> Self {
        f64::from(n)
    }

    fn is_finite(self) -> bool {
        f64::is_finite(self)
    }

    fn is_nan(self) -> bool {
        f64::is_nan(self)
    }

    fn neg(self) -> Self {
        -self
    }

    fn add_rounded(self, rhs: Self, round: Round) -> Self {
        debug_assert!(!self.is_nan() && !rhs.is_nan());
        if self.is_infinite() || rhs.is_infinite() {
            // Opposite infinities cannot meet here: a bound pair never
            // mixes them in a single endpoint computation.
            return self + rhs;
        }
        let sum = self + rhs;
        if sum.is_infinite() {
            return saturate(sum, round);
        }
        // Knuth two-sum: `sum + residual` equals the exact sum.
        let rhs_part = sum - self;
        let residual = (self - (sum - rhs_part)) + (rhs - rhs_part);
        nudge(sum, residual, round)
    }

    fn sub_rounded(self, rhs: Self, round: Round) -> Self {
        self.add_rounded(-rhs, round)
    }

    fn mul_rounded(self, rhs: Self, round: Round) -> Self {
        debug_assert!(!self.is_nan() && !rhs.is_nan());
        if self == 0.0 || rhs == 0.0 {
            // Interval convention: the zero factor pins the product,
            // even against an infinity.
            return 0.0;
        }
        if self.is_infinite() || rhs.is_infinite() {
            return if (self > 0.0) == (rhs > 0.0) {
                f64::INFINITY
            } else {
                f64::NEG_INFINITY
            };
        }
        let product = self * rhs;
        if product.is_infinite() {
            return saturate(product, round);
        }
        if product == 0.0 || product.is_subnormal() {
            // The FMA residual is no longer exact near the underflow
            // threshold; one step outward is always sound.
            return widen(product, round);
        }
        let residual = self.mul_add(rhs, -product);
        nudge(product, residual, round)
    }

    fn div_rounded(self, rhs: Self, round: Round) -> Self {
        debug_assert!(!self.is_nan() && !rhs.is_nan());
        debug_assert!(rhs != 0.0);
        if self == 0.0 {
            return 0.0;
        }
        if self.is_infinite() && rhs.is_infinite() {
            match ((self > 0.0) == (rhs > 0.0), round) {
                (true, Round::Down) => return 0.0,
                (true, Round::Up) => return f64::INFINITY,
                (false, Round::Down) => return f64::NEG_INFINITY,
                (false, Round::Up) => return 0.0,
            }
        }
        if self.is_infinite() {
            return if (self > 0.0) == (rhs > 0.0) {
                f64::INFINITY
            } else {
                f64::NEG_INFINITY
            };
        }
        if rhs.is_infinite() {
            // Finite over infinite is exactly zero on the extended reals.
            return 0.0;
        }
        let quotient = self / rhs;
        if quotient.is_infinite() {
            return saturate(quotient, round);
        }
        if quotient == 0.0 || quotient.is_subnormal() {
            return widen(quotient, round);
        }
        // `self - quotient * rhs` is exact here; the true quotient
        // differs from `quotient` by `remainder / rhs`.
        let remainder = (-quotient).mul_add(rhs, self);
        let residual = if rhs > 0.0 { remainder } else { -remainder };
        nudge(quotient, residual, round)
    }

    fn pow_rounded(self, n: u32, round: Round) -> Self {
        debug_assert!(self >= 0.0);
        if n == 0 {
            return 1.0;
        }
        // Exponentiation by squaring.  Every factor is non-negative, so
        // multiplication is monotone in both operands and the rounding
        // direction carries through every partial product.
        let mut base = self;
        let mut exp = n;
        let mut acc = 1.0;
        loop {
            if exp & 1 == 1 {
                acc = acc.mul_rounded(base, round);
            }
            exp >>= 1;
            if exp == 0 {
                return acc;
            }
            base = base.mul_rounded(base, round);
        }
    }

    fn round_outward(self, round: Round) -> Self {
        if self.is_infinite() {
            return self;
        }
        widen(self, round)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_add_exact() {
        assert_eq!(1.0.add_rounded(2.0, Round::Down), 3.0);
        assert_eq!(1.0.add_rounded(2.0, Round::Up), 3.0);
        assert_eq!(0.5.add_rounded(0.25, Round::Down), 0.75);
        assert_eq!(0.5.add_rounded(0.25, Round::Up), 0.75);
    }

    #[test]
    fn test_add_brackets_exact_sum() {
        // 0.1 + 0.2 is inexact in binary; the two directions must
        // bracket the exact value, one ULP apart.
        let down = 0.1.add_rounded(0.2, Round::Down);
        let up = 0.1.add_rounded(0.2, Round::Up);
        assert!(down < up);
        assert_eq!(down.next_up(), up);
        assert!(down <= 0.1 + 0.2 && 0.1 + 0.2 <= up);
    }

    #[test]
    fn test_add_overflow() {
        assert_eq!(f64::MAX.add_rounded(f64::MAX, Round::Up), f64::INFINITY);
        assert_eq!(f64::MAX.add_rounded(f64::MAX, Round::Down), f64::MAX);
        assert_eq!(
            (-f64::MAX).add_rounded(-f64::MAX, Round::Down),
            f64::NEG_INFINITY
        );
        assert_eq!((-f64::MAX).add_rounded(-f64::MAX, Round::Up), f64::MIN);
    }

    #[test]
    fn test_add_infinite_operand() {
        assert_eq!(
            f64::INFINITY.add_rounded(-1.0e300, Round::Down),
            f64::INFINITY
        );
        assert_eq!(
            f64::NEG_INFINITY.add_rounded(1.0e300, Round::Up),
            f64::NEG_INFINITY
        );
    }

    #[test]
    fn test_sub() {
        assert_eq!(4.0.sub_rounded(1.0, Round::Down), 3.0);
        let down = 0.3.sub_rounded(0.1, Round::Down);
        let up = 0.3.sub_rounded(0.1, Round::Up);
        assert!(down <= 0.2 && 0.2 <= up);
    }

    #[test]
    fn test_mul_exact() {
        assert_eq!(3.0.mul_rounded(4.0, Round::Down), 12.0);
        assert_eq!(3.0.mul_rounded(4.0, Round::Up), 12.0);
        assert_eq!((-2.0).mul_rounded(1.5, Round::Down), -3.0);
        assert_eq!((-2.0).mul_rounded(1.5, Round::Up), -3.0);
    }

    #[test]
    fn test_mul_inexact() {
        let down = 0.1.mul_rounded(0.1, Round::Down);
        let up = 0.1.mul_rounded(0.1, Round::Up);
        assert!(down < up);
        assert!(down <= 0.1 * 0.1 && 0.1 * 0.1 <= up);
    }

    #[test]
    fn test_mul_zero_times_infinity() {
        assert_eq!(0.0.mul_rounded(f64::INFINITY, Round::Down), 0.0);
        assert_eq!(0.0.mul_rounded(f64::NEG_INFINITY, Round::Up), 0.0);
        assert_eq!(f64::INFINITY.mul_rounded(0.0, Round::Up), 0.0);
    }

    #[test]
    fn test_mul_signed_infinities() {
        assert_eq!(
            f64::INFINITY.mul_rounded(-2.0, Round::Down),
            f64::NEG_INFINITY
        );
        assert_eq!(
            f64::NEG_INFINITY.mul_rounded(f64::NEG_INFINITY, Round::Up),
            f64::INFINITY
        );
    }

    #[test]
    fn test_mul_overflow_and_underflow() {
        assert_eq!(1.0e200.mul_rounded(1.0e200, Round::Down), f64::MAX);
        assert_eq!(1.0e200.mul_rounded(1.0e200, Round::Up), f64::INFINITY);
        let tiny_down = 1.0e-200.mul_rounded(1.0e-200, Round::Down);
        let tiny_up = 1.0e-200.mul_rounded(1.0e-200, Round::Up);
        assert!(tiny_down < tiny_up);
        assert!(tiny_down < 1.0e-300 && tiny_up > 0.0);
    }

    #[test]
    fn test_div_exact() {
        assert_eq!(6.0.div_rounded(2.0, Round::Down), 3.0);
        assert_eq!(6.0.div_rounded(2.0, Round::Up), 3.0);
        assert_eq!(1.0.div_rounded(-4.0, Round::Down), -0.25);
    }

    #[test]
    fn test_div_inexact() {
        let down = 1.0.div_rounded(3.0, Round::Down);
        let up = 1.0.div_rounded(3.0, Round::Up);
        assert!(down < up);
        assert_eq!(down.next_up(), up);
        assert!(down < 1.0 / 3.0 + 1e-18 && up > 1.0 / 3.0 - 1e-18);
    }

    #[test]
    fn test_div_infinities() {
        assert_eq!(1.0.div_rounded(f64::INFINITY, Round::Down), 0.0);
        assert_eq!(
            f64::INFINITY.div_rounded(2.0, Round::Up),
            f64::INFINITY
        );
        assert_eq!(
            f64::INFINITY.div_rounded(f64::INFINITY, Round::Down),
            0.0
        );
        assert_eq!(
            f64::INFINITY.div_rounded(f64::INFINITY, Round::Up),
            f64::INFINITY
        );
        assert_eq!(
            f64::INFINITY.div_rounded(f64::NEG_INFINITY, Round::Down),
            f64::NEG_INFINITY
        );
        assert_eq!(
            f64::INFINITY.div_rounded(f64::NEG_INFINITY, Round::Up),
            0.0
        );
    }

    #[test]
    fn test_pow() {
        assert_eq!(2.0.pow_rounded(10, Round::Down), 1024.0);
        assert_eq!(2.0.pow_rounded(10, Round::Up), 1024.0);
        assert_eq!(5.0.pow_rounded(0, Round::Down), 1.0);
        let down = 0.1.pow_rounded(3, Round::Down);
        let up = 0.1.pow_rounded(3, Round::Up);
        assert!(down <= 0.001 && 0.001 <= up);
    }

    #[test]
    fn test_round_outward() {
        assert_eq!(f64::INFINITY.round_outward(Round::Up), f64::INFINITY);
        assert_eq!(
            f64::NEG_INFINITY.round_outward(Round::Down),
            f64::NEG_INFINITY
        );
        assert!(1.0.round_outward(Round::Down) < 1.0);
        assert!(1.0.round_outward(Round::Up) > 1.0);
    }
}
