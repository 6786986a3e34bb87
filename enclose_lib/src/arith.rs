//! The arithmetic engine: `+ - * /`, powers, and tri-state comparisons.
//!
//! Every operation here is value-producing and total over well-formed
//! intervals.  The one soundness rule is that a result must contain
//! every exact value reachable from the operands; the case splits below
//! may widen (zero-straddling division returns [`Interval::Universe`])
//! but never narrow.

use crate::bound::{cmp_values, Bound};
use crate::interval::Interval;
use crate::round::{Round, RoundedNumeric};
use crate::set::MultiInterval;
use log::debug;
use std::cmp::Ordering;

/// The outcome of an interval comparison.  Overlapping operands make
/// strict ordering undecidable, so predicates return three states
/// instead of a boolean.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Truth {
    /// The relation holds for every pair of values.
    True,
    /// The relation holds for no pair of values.
    False,
    /// The relation holds for some pairs and fails for others.
    Unknown,
}

impl Truth {
    pub fn is_true(self) -> bool {
        matches!(self, Truth::True)
    }

    pub fn is_false(self) -> bool {
        matches!(self, Truth::False)
    }

    pub fn is_unknown(self) -> bool {
        matches!(self, Truth::Unknown)
    }
}

/// Where an interval sits relative to zero.  A zero endpoint counts as
/// either side; `[0, 0]` classifies as `NonPositive` first.
enum SignClass {
    NonPositive,
    Straddling,
    NonNegative,
}

fn classify<T: RoundedNumeric>(lower: &Bound<T>, upper: &Bound<T>) -> SignClass {
    let (lv, _) = lower.raw();
    let (uv, _) = upper.raw();
    if uv <= T::zero() {
        SignClass::NonPositive
    } else if lv >= T::zero() {
        SignClass::NonNegative
    } else {
        SignClass::Straddling
    }
}

fn bound_add<T: RoundedNumeric>(
    a: &Bound<T>,
    b: &Bound<T>,
    round: Round,
) -> Bound<T> {
    let (va, ca) = a.raw();
    let (vb, cb) = b.raw();
    // Opposite infinities never meet in a single endpoint computation:
    // a lower bound only adds lower bounds, and +inf cannot be one.
    Bound::from_value(va.add_rounded(vb, round), ca && cb)
}

fn bound_mul<T: RoundedNumeric>(
    a: &Bound<T>,
    b: &Bound<T>,
    round: Round,
) -> Bound<T> {
    let (va, ca) = a.raw();
    let (vb, cb) = b.raw();
    // A zero factor pins the product to an attained zero on its own,
    // even against an unattained infinity.
    let closed = if va == T::zero() || vb == T::zero() {
        (va == T::zero() && ca) || (vb == T::zero() && cb)
    } else {
        ca && cb
    };
    Bound::from_value(va.mul_rounded(vb, round), closed)
}

/// One corner quotient.  `y_positive` tells which side of zero the
/// divisor lives on, so that an open zero endpoint of the divisor turns
/// into the correctly signed infinity.
fn bound_div<T: RoundedNumeric>(
    x: &Bound<T>,
    y: &Bound<T>,
    y_positive: bool,
    round: Round,
) -> Bound<T> {
    let (vx, cx) = x.raw();
    let (vy, cy) = y.raw();
    if vx == T::zero() {
        return Bound::Finite {
            value: T::zero(),
            closed: cx,
        };
    }
    if vy == T::zero() {
        // The divisor only approaches zero (0 in Y is handled before
        // the corners): the quotient grows without bound.
        let toward_pos = (vx > T::zero()) == y_positive;
        return if toward_pos {
            Bound::PosInfinity
        } else {
            Bound::NegInfinity
        };
    }
    Bound::from_value(vx.div_rounded(vy, round), cx && cy)
}

/// `x ^ n` for a single endpoint, any sign, `n >= 1`.
fn bound_pow<T: RoundedNumeric>(b: &Bound<T>, n: u32, round: Round) -> Bound<T> {
    let (v, c) = b.raw();
    if v >= T::zero() {
        Bound::from_value(v.pow_rounded(n, round), c)
    } else if n & 1 == 1 {
        Bound::from_value(v.neg().pow_rounded(n, round.flip()).neg(), c)
    } else {
        Bound::from_value(v.neg().pow_rounded(n, round), c)
    }
}

fn min_lower<T: RoundedNumeric>(a: Bound<T>, b: Bound<T>) -> Bound<T> {
    match a.cmp_lower(&b) {
        Ordering::Greater => b,
        Ordering::Equal | Ordering::Less => a,
    }
}

fn max_upper<T: RoundedNumeric>(a: Bound<T>, b: Bound<T>) -> Bound<T> {
    match a.cmp_upper(&b) {
        Ordering::Less => b,
        Ordering::Equal | Ordering::Greater => a,
    }
}

/// Every value below `upper` is strictly less than every value above
/// `lower`.
fn surely_before<T: RoundedNumeric>(upper: &Bound<T>, lower: &Bound<T>) -> bool {
    let (u, cu) = upper.raw();
    let (l, cl) = lower.raw();
    match cmp_values(&u, &l) {
        Ordering::Less => true,
        // At a shared endpoint value the pair x == y needs both sides
        // to attain it.
        Ordering::Equal => !(cu && cl),
        Ordering::Greater => false,
    }
}

/// Some value above `x_lower` is strictly less than some value below
/// `y_upper`.
fn possibly_less<T: RoundedNumeric>(
    x_lower: &Bound<T>,
    y_upper: &Bound<T>,
) -> bool {
    let (l, _) = x_lower.raw();
    let (u, _) = y_upper.raw();
    matches!(cmp_values(&l, &u), Ordering::Less)
}

impl<T: RoundedNumeric> Interval<T> {
    /// The negation `{-x : x in X}`.  Exact.
    pub fn neg(&self) -> Self {
        match self.bounds() {
            None => Interval::Empty,
            Some((lower, upper)) => Self::make(upper.neg(), lower.neg()),
        }
    }

    /// The absolute values `{|x| : x in X}`.
    pub fn abs(&self) -> Self {
        let Some((lower, upper)) = self.bounds() else {
            return Interval::Empty;
        };
        match classify(&lower, &upper) {
            SignClass::NonNegative => *self,
            SignClass::NonPositive => self.neg(),
            // Zero is interior, hence attained.
            SignClass::Straddling => Self::make(
                Bound::closed(T::zero()),
                max_upper(lower.neg(), upper),
            ),
        }
    }

    /// `{x + y}`.  Lower bounds add rounded down, upper bounds add
    /// rounded up.
    pub fn add(&self, other: &Self) -> Self {
        match (self.bounds(), other.bounds()) {
            (None, _) | (_, None) => Interval::Empty,
            (Some((xl, xu)), Some((yl, yu))) => Self::make(
                bound_add(&xl, &yl, Round::Down),
                bound_add(&xu, &yu, Round::Up),
            ),
        }
    }

    /// `{x - y}`.
    pub fn sub(&self, other: &Self) -> Self {
        self.add(&other.neg())
    }

    /// `{x * y}`, split on the sign pattern of the operands; each of the
    /// nine combinations knows which corner products realize the
    /// extrema.
    pub fn mul(&self, other: &Self) -> Self {
        let (Some((xl, xu)), Some((yl, yu))) = (self.bounds(), other.bounds())
        else {
            return Interval::Empty;
        };
        let (lower, upper) = match (classify(&xl, &xu), classify(&yl, &yu)) {
            (SignClass::NonNegative, SignClass::NonNegative) => (
                bound_mul(&xl, &yl, Round::Down),
                bound_mul(&xu, &yu, Round::Up),
            ),
            (SignClass::NonNegative, SignClass::NonPositive) => (
                bound_mul(&xu, &yl, Round::Down),
                bound_mul(&xl, &yu, Round::Up),
            ),
            (SignClass::NonNegative, SignClass::Straddling) => (
                bound_mul(&xu, &yl, Round::Down),
                bound_mul(&xu, &yu, Round::Up),
            ),
            (SignClass::NonPositive, SignClass::NonNegative) => (
                bound_mul(&xl, &yu, Round::Down),
                bound_mul(&xu, &yl, Round::Up),
            ),
            (SignClass::NonPositive, SignClass::NonPositive) => (
                bound_mul(&xu, &yu, Round::Down),
                bound_mul(&xl, &yl, Round::Up),
            ),
            (SignClass::NonPositive, SignClass::Straddling) => (
                bound_mul(&xl, &yu, Round::Down),
                bound_mul(&xl, &yl, Round::Up),
            ),
            (SignClass::Straddling, SignClass::NonNegative) => (
                bound_mul(&xl, &yu, Round::Down),
                bound_mul(&xu, &yu, Round::Up),
            ),
            (SignClass::Straddling, SignClass::NonPositive) => (
                bound_mul(&xu, &yl, Round::Down),
                bound_mul(&xl, &yl, Round::Up),
            ),
            (SignClass::Straddling, SignClass::Straddling) => (
                min_lower(
                    bound_mul(&xl, &yu, Round::Down),
                    bound_mul(&xu, &yl, Round::Down),
                ),
                max_upper(
                    bound_mul(&xl, &yl, Round::Up),
                    bound_mul(&xu, &yu, Round::Up),
                ),
            ),
        };
        Self::make(lower, upper)
    }

    /// `{x / y}` as a single interval.
    ///
    /// When the divisor contains zero the exact result is unbounded
    /// (two rays, or everything when zero is also in the dividend), and
    /// this returns the conservative [`Interval::Universe`].  Callers
    /// who want the tighter one- or two-ray answer use
    /// [`Interval::div_pair`].
    pub fn div(&self, other: &Self) -> Self {
        if self.is_empty() || other.is_empty() {
            return Interval::Empty;
        }
        if other.contains(T::zero()) {
            debug!("division by zero-straddling {other}: widening to (,)");
            return Interval::Universe;
        }
        let (Some((xl, xu)), Some((yl, yu))) = (self.bounds(), other.bounds())
        else {
            return Interval::Empty;
        };
        let y_positive = {
            let (uv, _) = yu.raw();
            uv > T::zero()
        };
        let corners = [(&xl, &yl), (&xl, &yu), (&xu, &yl), (&xu, &yu)];
        let mut lower = Bound::PosInfinity;
        let mut upper = Bound::NegInfinity;
        for (x, y) in corners {
            lower = min_lower(lower, bound_div(x, y, y_positive, Round::Down));
            upper = max_upper(upper, bound_div(x, y, y_positive, Round::Up));
        }
        Self::make(lower, upper)
    }

    /// `{x / y}` as one or two pieces: the tight form of extended
    /// division.  With zero inside the divisor but not the dividend the
    /// result is one or two unbounded rays instead of the whole line.
    pub fn div_pair(&self, other: &Self) -> MultiInterval<T> {
        if self.is_empty() || other.is_empty() {
            return MultiInterval::One(Interval::Empty);
        }
        if !other.contains(T::zero()) {
            return MultiInterval::One(self.div(other));
        }
        if self.contains(T::zero()) {
            return MultiInterval::One(Interval::Universe);
        }
        let (Some((xl, xu)), Some((yl, yu))) = (self.bounds(), other.bounds())
        else {
            return MultiInterval::One(Interval::Empty);
        };
        let y_has_neg = {
            let (lv, _) = yl.raw();
            lv < T::zero()
        };
        let y_has_pos = {
            let (uv, _) = yu.raw();
            uv > T::zero()
        };
        let x_positive = {
            let (lv, _) = xl.raw();
            lv >= T::zero()
        };
        // For a positive dividend the extreme finite quotients are both
        // reached at the dividend value closest to zero; symmetrically
        // for a negative dividend.
        let (neg_ray, pos_ray) = if x_positive {
            (
                y_has_neg.then(|| {
                    Interval::make(
                        Bound::NegInfinity,
                        bound_div(&xl, &yl, false, Round::Up),
                    )
                }),
                y_has_pos.then(|| {
                    Interval::make(
                        bound_div(&xl, &yu, true, Round::Down),
                        Bound::PosInfinity,
                    )
                }),
            )
        } else {
            (
                y_has_pos.then(|| {
                    Interval::make(
                        Bound::NegInfinity,
                        bound_div(&xu, &yu, true, Round::Up),
                    )
                }),
                y_has_neg.then(|| {
                    Interval::make(
                        bound_div(&xu, &yl, false, Round::Down),
                        Bound::PosInfinity,
                    )
                }),
            )
        };
        MultiInterval::from_two(
            neg_ray.unwrap_or(Interval::Empty),
            pos_ray.unwrap_or(Interval::Empty),
        )
    }

    /// `{1 / y}`.
    pub fn reciprocal(&self) -> Self {
        let one =
            Self::make(Bound::closed(T::one()), Bound::closed(T::one()));
        one.div(self)
    }

    /// `{x ^ n}` for an integer exponent.  `n == 0` gives `[1, 1]` for
    /// any non-empty operand (including zero: the 0^0 = 1 convention);
    /// negative exponents go through [`Interval::reciprocal`], so a
    /// zero-containing base widens to the universe.
    pub fn pow_int(&self, n: i32) -> Self {
        let Some((lower, upper)) = self.bounds() else {
            return Interval::Empty;
        };
        if n == 0 {
            return Self::make(
                Bound::closed(T::one()),
                Bound::closed(T::one()),
            );
        }
        if n < 0 {
            return self.pow_positive(lower, upper, n.unsigned_abs()).reciprocal();
        }
        self.pow_positive(lower, upper, n.unsigned_abs())
    }

    fn pow_positive(&self, lower: Bound<T>, upper: Bound<T>, n: u32) -> Self {
        if n & 1 == 1 {
            // Odd powers are monotone over the whole line.
            return Self::make(
                bound_pow(&lower, n, Round::Down),
                bound_pow(&upper, n, Round::Up),
            );
        }
        match classify(&lower, &upper) {
            SignClass::NonNegative => Self::make(
                bound_pow(&lower, n, Round::Down),
                bound_pow(&upper, n, Round::Up),
            ),
            SignClass::NonPositive => Self::make(
                bound_pow(&upper, n, Round::Down),
                bound_pow(&lower, n, Round::Up),
            ),
            SignClass::Straddling => Self::make(
                // Zero is interior, so the even power attains it.
                Bound::closed(T::zero()),
                max_upper(
                    bound_pow(&lower, n, Round::Up),
                    bound_pow(&upper, n, Round::Up),
                ),
            ),
        }
    }

    /// Whether every x in self is strictly below every y in `other`.
    /// Vacuously [`Truth::True`] when either side is empty.
    pub fn definitely_lt(&self, other: &Self) -> Truth {
        match (self.bounds(), other.bounds()) {
            (None, _) | (_, None) => Truth::True,
            (Some((xl, xu)), Some((yl, yu))) => {
                if surely_before(&xu, &yl) {
                    Truth::True
                } else if !possibly_less(&xl, &yu) {
                    Truth::False
                } else {
                    Truth::Unknown
                }
            }
        }
    }

    /// Whether every x in self is less than or equal to every y in
    /// `other`.
    pub fn definitely_le(&self, other: &Self) -> Truth {
        match (self.bounds(), other.bounds()) {
            (None, _) | (_, None) => Truth::True,
            (Some((xl, xu)), Some((yl, yu))) => {
                if !possibly_less(&yl, &xu) {
                    // No y can sit strictly below an x.
                    Truth::True
                } else if surely_before(&yu, &xl) {
                    Truth::False
                } else {
                    Truth::Unknown
                }
            }
        }
    }

    pub fn definitely_gt(&self, other: &Self) -> Truth {
        other.definitely_lt(self)
    }

    pub fn definitely_ge(&self, other: &Self) -> Truth {
        other.definitely_le(self)
    }

    /// Whether some x in self can equal some y in `other`:
    /// [`Truth::True`] only when both are the same single point,
    /// [`Truth::False`] when the operands are disjoint.  Unlike the
    /// universal ordering predicates this one is existential, so an
    /// empty operand offers no candidate pair and is always
    /// [`Truth::False`].
    pub fn possibly_eq(&self, other: &Self) -> Truth {
        if self.is_empty() || other.is_empty() {
            return Truth::False;
        }
        if self.is_point() && other.is_point() && self == other {
            return Truth::True;
        }
        if self.intersects(other) {
            Truth::Unknown
        } else {
            Truth::False
        }
    }
}

///  Interval + Interval
impl<T: RoundedNumeric> std::ops::Add<Interval<T>> for Interval<T> {
    type Output = Interval<T>;

    fn add(self, rhs: Interval<T>) -> Self::Output {
        Interval::add(&self, &rhs)
    }
}

///  &Interval + &Interval
impl<T: RoundedNumeric> std::ops::Add<&Interval<T>> for &Interval<T> {
    type Output = Interval<T>;

    fn add(self, rhs: &Interval<T>) -> Self::Output {
        Interval::add(self, rhs)
    }
}

///  Interval - Interval
impl<T: RoundedNumeric> std::ops::Sub<Interval<T>> for Interval<T> {
    type Output = Interval<T>;

    fn sub(self, rhs: Interval<T>) -> Self::Output {
        Interval::sub(&self, &rhs)
    }
}

///  &Interval - &Interval
impl<T: RoundedNumeric> std::ops::Sub<&Interval<T>> for &Interval<T> {
    type Output = Interval<T>;

    fn sub(self, rhs: &Interval<T>) -> Self::Output {
        Interval::sub(self, rhs)
    }
}

///  Interval * Interval
impl<T: RoundedNumeric> std::ops::Mul<Interval<T>> for Interval<T> {
    type Output = Interval<T>;

    fn mul(self, rhs: Interval<T>) -> Self::Output {
        Interval::mul(&self, &rhs)
    }
}

///  &Interval * &Interval
impl<T: RoundedNumeric> std::ops::Mul<&Interval<T>> for &Interval<T> {
    type Output = Interval<T>;

    fn mul(self, rhs: &Interval<T>) -> Self::Output {
        Interval::mul(self, rhs)
    }
}

///  Interval / Interval
impl<T: RoundedNumeric> std::ops::Div<Interval<T>> for Interval<T> {
    type Output = Interval<T>;

    fn div(self, rhs: Interval<T>) -> Self::Output {
        Interval::div(&self, &rhs)
    }
}

///  &Interval / &Interval
impl<T: RoundedNumeric> std::ops::Div<&Interval<T>> for &Interval<T> {
    type Output = Interval<T>;

    fn div(self, rhs: &Interval<T>) -> Self::Output {
        Interval::div(self, rhs)
    }
}

///  -Interval
impl<T: RoundedNumeric> std::ops::Neg for Interval<T> {
    type Output = Interval<T>;

    fn neg(self) -> Self::Output {
        Interval::neg(&self)
    }
}

///  -&Interval
impl<T: RoundedNumeric> std::ops::Neg for &Interval<T> {
    type Output = Interval<T>;

    fn neg(self) -> Self::Output {
        Interval::neg(self)
    }
}
