//! Set operations: hull, intersection, membership, splitting.

use crate::bound::Bound;
use crate::interval::Interval;
use crate::round::{Round, RoundedNumeric};
use std::cmp::Ordering;

/// One or two disjoint intervals, for the operations whose exact result
/// is not convex (extended division).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MultiInterval<T> {
    One(Interval<T>),
    Two(Interval<T>, Interval<T>),
}

impl<T: RoundedNumeric> MultiInterval<T> {
    /// Collapses empty pieces so `Two` always holds two non-empty
    /// intervals.
    pub(crate) fn from_two(a: Interval<T>, b: Interval<T>) -> Self {
        if a.is_empty() {
            MultiInterval::One(b)
        } else if b.is_empty() {
            MultiInterval::One(a)
        } else {
            MultiInterval::Two(a, b)
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Interval<T>> {
        let (first, second) = match self {
            MultiInterval::One(a) => (a, None),
            MultiInterval::Two(a, b) => (a, Some(b)),
        };
        std::iter::once(first).chain(second)
    }

    /// Whether some piece contains the value.
    pub fn contains(&self, v: T) -> bool {
        self.iter().any(|piece| piece.contains(v))
    }
}

impl<T: RoundedNumeric> Interval<T> {
    /// Whether the value lies within the bounds, respecting openness.
    pub fn contains(&self, v: T) -> bool {
        if v.is_nan() {
            return false;
        }
        match self.bounds() {
            None => false,
            Some((lower, upper)) => {
                lower.admits_from_below(&v) && upper.admits_from_above(&v)
            }
        }
    }

    /// Whether self contains every value of `other` (and possibly more).
    pub fn contains_interval(&self, other: &Self) -> bool {
        match (other.bounds(), self.bounds()) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some((ol, ou)), Some((sl, su))) => {
                sl.cmp_lower(&ol) != Ordering::Greater
                    && su.cmp_upper(&ou) != Ordering::Less
            }
        }
    }

    /// The values present in both intervals.  Empty absorbs; `Universe`
    /// is the identity.
    pub fn intersection(&self, other: &Self) -> Self {
        match (self.bounds(), other.bounds()) {
            (None, _) | (_, None) => Interval::Empty,
            (Some((sl, su)), Some((ol, ou))) => {
                let lower = match sl.cmp_lower(&ol) {
                    Ordering::Less => ol,
                    Ordering::Equal | Ordering::Greater => sl,
                };
                let upper = match su.cmp_upper(&ou) {
                    Ordering::Greater => ou,
                    Ordering::Equal | Ordering::Less => su,
                };
                Self::make(lower, upper)
            }
        }
    }

    /// Whether the two intervals share at least one value.
    pub fn intersects(&self, other: &Self) -> bool {
        !self.intersection(other).is_empty()
    }

    /// The smallest interval containing both operands (convex hull).
    /// For non-overlapping operands this also covers the gap between
    /// them; a single convex interval cannot do better.  `Universe`
    /// absorbs; empty is the identity.
    pub fn union(&self, other: &Self) -> Self {
        match (self.bounds(), other.bounds()) {
            (None, None) => Interval::Empty,
            (None, Some(_)) => *other,
            (Some(_), None) => *self,
            (Some((sl, su)), Some((ol, ou))) => {
                let lower = match sl.cmp_lower(&ol) {
                    Ordering::Greater => ol,
                    Ordering::Equal | Ordering::Less => sl,
                };
                let upper = match su.cmp_upper(&ou) {
                    Ordering::Less => ou,
                    Ordering::Equal | Ordering::Greater => su,
                };
                Self::make(lower, upper)
            }
        }
    }

    /// A lazy sequence of `n` sub-intervals covering self, cut at evenly
    /// spaced points.  The cuts are rounded outward, so adjacent pieces
    /// may overlap by one representable step; their union is exactly
    /// self.  An interval with an infinite endpoint comes back whole as
    /// a single piece; the empty interval yields nothing.  The iterator
    /// is restartable by cloning it before use.
    pub fn split(&self, n: u32) -> Split<T> {
        let pieces = match self {
            Interval::Empty => 0,
            Interval::Universe => n.min(1),
            Interval::Bounded { lower, upper } => {
                if n == 0 {
                    0
                } else if lower.is_finite() && upper.is_finite() {
                    n
                } else {
                    1
                }
            }
        };
        Split {
            interval: *self,
            pieces,
            index: 0,
        }
    }
}

/// Iterator over the pieces of [`Interval::split`].
#[derive(Clone, Debug)]
pub struct Split<T> {
    interval: Interval<T>,
    pieces: u32,
    index: u32,
}

impl<T: RoundedNumeric> Split<T> {
    /// The k-th cut point, rounded in the given direction and kept
    /// inside the interval.
    fn cut(&self, k: u32, round: Round) -> T {
        let (lo, hi) = match self.interval.bounds() {
            Some((lower, upper)) => (lower.raw().0, upper.raw().0),
            None => return T::zero(),
        };
        let span = hi.sub_rounded(lo, round);
        let frac =
            T::from_count(k).div_rounded(T::from_count(self.pieces), round);
        let cut = lo.add_rounded(span.mul_rounded(frac, round), round);
        if cut < lo {
            lo
        } else if cut > hi {
            hi
        } else {
            cut
        }
    }
}

impl<T: RoundedNumeric> Iterator for Split<T> {
    type Item = Interval<T>;

    fn next(&mut self) -> Option<Interval<T>> {
        if self.index >= self.pieces {
            return None;
        }
        let i = self.index;
        self.index += 1;
        if self.pieces == 1 {
            return Some(self.interval);
        }
        let (lower, upper) = self.interval.bounds()?;
        let lower = if i == 0 {
            lower
        } else {
            Bound::closed(self.cut(i, Round::Down))
        };
        let upper = if i + 1 == self.pieces {
            upper
        } else {
            Bound::closed(self.cut(i + 1, Round::Up))
        };
        Some(Interval::make(lower, upper))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = (self.pieces - self.index) as usize;
        (left, Some(left))
    }
}

impl<T: RoundedNumeric> ExactSizeIterator for Split<T> {}

///  &Interval & &Interval
impl<T: RoundedNumeric> std::ops::BitAnd<&Interval<T>> for &Interval<T> {
    type Output = Interval<T>;

    fn bitand(self, rhs: &Interval<T>) -> Self::Output {
        self.intersection(rhs)
    }
}

///  Interval & Interval
impl<T: RoundedNumeric> std::ops::BitAnd<Interval<T>> for Interval<T> {
    type Output = Interval<T>;

    fn bitand(self, rhs: Interval<T>) -> Self::Output {
        self.intersection(&rhs)
    }
}

///  &Interval | &Interval
impl<T: RoundedNumeric> std::ops::BitOr<&Interval<T>> for &Interval<T> {
    type Output = Interval<T>;

    fn bitor(self, rhs: &Interval<T>) -> Self::Output {
        self.union(rhs)
    }
}

///  Interval | Interval
impl<T: RoundedNumeric> std::ops::BitOr<Interval<T>> for Interval<T> {
    type Output = Interval<T>;

    fn bitor(self, rhs: Interval<T>) -> Self::Output {
        self.union(&rhs)
    }
}
