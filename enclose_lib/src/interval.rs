//! The interval data model and its construction API.

use crate::bound::{cmp_values, Bound};
use crate::errors::Error;
use crate::round::{Round, RoundedNumeric};
use std::cmp::Ordering;

/// A convex subset of the extended real line.
///
/// The three variants are normalized at construction: a bound pair with
/// equal values that are not both closed collapses to `Empty`, and a
/// doubly infinite pair collapses to `Universe`.  `Bounded` therefore
/// always satisfies `lower <= upper`, with equality only for a single
/// attained point.
///
/// Values are immutable: every operation in this crate consumes
/// intervals by reference and returns a freshly built one, so sharing
/// across threads needs no locking.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Interval<T> {
    /// The empty set.
    Empty,
    /// All values between the two bounds.
    Bounded { lower: Bound<T>, upper: Bound<T> },
    /// The whole extended real line.
    Universe,
}

impl<T> Default for Interval<T> {
    /// Returns an empty interval.
    fn default() -> Self {
        Interval::Empty
    }
}

impl<T: RoundedNumeric> Interval<T> {
    /// Internal constructor for results of arithmetic: normalizes
    /// degenerate bound pairs instead of failing, since the case splits
    /// upstream can only produce ordered pairs.
    pub(crate) fn make(lower: Bound<T>, upper: Bound<T>) -> Self {
        if matches!(lower, Bound::NegInfinity)
            && matches!(upper, Bound::PosInfinity)
        {
            return Interval::Universe;
        }
        let (lv, lc) = lower.raw();
        let (uv, uc) = upper.raw();
        match cmp_values(&lv, &uv) {
            Ordering::Greater => Interval::Empty,
            // Equal infinite values mean a bound pair like [+inf, +inf),
            // which contains no real.
            Ordering::Equal => {
                if lc && uc {
                    Interval::Bounded { lower, upper }
                } else {
                    Interval::Empty
                }
            }
            Ordering::Less => Interval::Bounded { lower, upper },
        }
    }

    fn check(value: T) -> Result<T, Error> {
        if value.is_nan() {
            Err(Error::InvalidBounds(format!(
                "could not interpret {value} as a real value"
            )))
        } else {
            Ok(value)
        }
    }

    fn ordered(lo: T, hi: T) -> Result<(T, T), Error> {
        let lo = Self::check(lo)?;
        let hi = Self::check(hi)?;
        if matches!(cmp_values(&lo, &hi), Ordering::Greater) {
            Err(Error::InvalidBounds(format!(
                "lower bound {lo} is above upper bound {hi}"
            )))
        } else {
            Ok((lo, hi))
        }
    }

    /// `[lo, hi]`, both endpoints attained.
    pub fn closed(lo: T, hi: T) -> Result<Self, Error> {
        let (lo, hi) = Self::ordered(lo, hi)?;
        Ok(Self::make(Bound::closed(lo), Bound::closed(hi)))
    }

    /// `(lo, hi)`, both endpoints excluded.  `lo == hi` gives `Empty`.
    pub fn open(lo: T, hi: T) -> Result<Self, Error> {
        let (lo, hi) = Self::ordered(lo, hi)?;
        Ok(Self::make(Bound::open(lo), Bound::open(hi)))
    }

    /// `[lo, hi)`.
    pub fn closed_open(lo: T, hi: T) -> Result<Self, Error> {
        let (lo, hi) = Self::ordered(lo, hi)?;
        Ok(Self::make(Bound::closed(lo), Bound::open(hi)))
    }

    /// `(lo, hi]`.
    pub fn open_closed(lo: T, hi: T) -> Result<Self, Error> {
        let (lo, hi) = Self::ordered(lo, hi)?;
        Ok(Self::make(Bound::open(lo), Bound::closed(hi)))
    }

    /// The single value `v`, i.e. `[v, v]`.
    pub fn point(v: T) -> Result<Self, Error> {
        let v = Self::check(v)?;
        Ok(Self::make(Bound::closed(v), Bound::closed(v)))
    }

    /// `[lo, +inf)`.
    pub fn unbounded_above(lo: T) -> Result<Self, Error> {
        let lo = Self::check(lo)?;
        Ok(Self::make(Bound::closed(lo), Bound::PosInfinity))
    }

    /// `(lo, +inf)`.
    pub fn unbounded_above_open(lo: T) -> Result<Self, Error> {
        let lo = Self::check(lo)?;
        Ok(Self::make(Bound::open(lo), Bound::PosInfinity))
    }

    /// `(-inf, hi]`.
    pub fn unbounded_below(hi: T) -> Result<Self, Error> {
        let hi = Self::check(hi)?;
        Ok(Self::make(Bound::NegInfinity, Bound::closed(hi)))
    }

    /// `(-inf, hi)`.
    pub fn unbounded_below_open(hi: T) -> Result<Self, Error> {
        let hi = Self::check(hi)?;
        Ok(Self::make(Bound::NegInfinity, Bound::open(hi)))
    }

    /// The whole extended real line.
    pub fn universe() -> Self {
        Interval::Universe
    }

    /// The empty set.
    pub fn empty() -> Self {
        Interval::Empty
    }

    /// The bound pair, with `Universe` seen as `(-inf, +inf)`.  `None`
    /// for the empty interval.
    pub fn bounds(&self) -> Option<(Bound<T>, Bound<T>)> {
        match self {
            Interval::Empty => None,
            Interval::Universe => Some((Bound::NegInfinity, Bound::PosInfinity)),
            Interval::Bounded { lower, upper } => Some((*lower, *upper)),
        }
    }

    /// The finite lower endpoint value, if there is one.
    pub fn lower(&self) -> Option<T> {
        self.bounds().and_then(|(lo, _)| lo.value().copied())
    }

    /// The finite upper endpoint value, if there is one.
    pub fn upper(&self) -> Option<T> {
        self.bounds().and_then(|(_, hi)| hi.value().copied())
    }

    /// Whether the lower endpoint is attained.
    pub fn lower_closed(&self) -> bool {
        self.bounds().is_some_and(|(lo, _)| lo.is_closed())
    }

    /// Whether the upper endpoint is attained.
    pub fn upper_closed(&self) -> bool {
        self.bounds().is_some_and(|(_, hi)| hi.is_closed())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Interval::Empty)
    }

    pub fn is_universe(&self) -> bool {
        matches!(self, Interval::Universe)
    }

    /// True for `[v, v]`.
    pub fn is_point(&self) -> bool {
        match self {
            Interval::Empty | Interval::Universe => false,
            Interval::Bounded { lower, upper } => {
                match (lower.value(), upper.value()) {
                    (Some(a), Some(b)) => {
                        matches!(cmp_values(a, b), Ordering::Equal)
                    }
                    (None, _) | (_, None) => false,
                }
            }
        }
    }

    /// The diameter of the interval, rounded up.  Zero for the empty
    /// interval and for points, infinite when either side is unbounded.
    pub fn width(&self) -> T {
        match self {
            Interval::Empty => T::zero(),
            Interval::Universe => T::infinity(),
            Interval::Bounded { lower, upper } => {
                let (lv, _) = lower.raw();
                let (uv, _) = upper.raw();
                if !lv.is_finite() || !uv.is_finite() {
                    T::infinity()
                } else {
                    uv.sub_rounded(lv, Round::Up)
                }
            }
        }
    }
}

impl<T: RoundedNumeric> std::fmt::Display for Interval<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Interval::Empty => write!(f, "empty"),
            Interval::Universe => write!(f, "(,)"),
            Interval::Bounded { lower, upper } => {
                match lower {
                    Bound::NegInfinity => write!(f, "(")?,
                    Bound::Finite {
                        value,
                        closed: true,
                    } => write!(f, "[{value}")?,
                    Bound::Finite {
                        value,
                        closed: false,
                    } => write!(f, "({value}")?,
                    // A lower bound of +inf cannot survive `make`.
                    Bound::PosInfinity => write!(f, "(+inf")?,
                }
                match upper {
                    Bound::PosInfinity => write!(f, ",)"),
                    Bound::Finite {
                        value,
                        closed: true,
                    } => write!(f, ", {value}]"),
                    Bound::Finite {
                        value,
                        closed: false,
                    } => write!(f, ", {value})"),
                    Bound::NegInfinity => write!(f, ", -inf)"),
                }
            }
        }
    }
}
