//! A single interval endpoint.

use crate::round::RoundedNumeric;
use std::cmp::Ordering;

/// One endpoint of an interval: a finite value that is either attained
/// (closed) or approached (open), or a signed infinity.
///
/// An infinite endpoint is never attained, so there is no closed flag on
/// the infinite variants; this enforces the invariant from the data
/// model rather than documenting it.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Bound<T> {
    NegInfinity,
    Finite { value: T, closed: bool },
    PosInfinity,
}

impl<T> Bound<T> {
    /// A finite, attained endpoint.
    pub fn closed(value: T) -> Self {
        Bound::Finite {
            value,
            closed: true,
        }
    }

    /// A finite, approached-but-excluded endpoint.
    pub fn open(value: T) -> Self {
        Bound::Finite {
            value,
            closed: false,
        }
    }

    /// Whether the endpoint value belongs to the interval.  False for
    /// infinities.
    pub fn is_closed(&self) -> bool {
        match self {
            Bound::Finite { closed, .. } => *closed,
            Bound::NegInfinity | Bound::PosInfinity => false,
        }
    }

    pub fn is_finite(&self) -> bool {
        match self {
            Bound::Finite { .. } => true,
            Bound::NegInfinity | Bound::PosInfinity => false,
        }
    }

    /// The finite endpoint value, if there is one.
    pub fn value(&self) -> Option<&T> {
        match self {
            Bound::Finite { value, .. } => Some(value),
            Bound::NegInfinity | Bound::PosInfinity => None,
        }
    }
}

impl<T: RoundedNumeric> Bound<T> {
    /// Wrap a computed value: infinities collapse onto the infinite
    /// variants (which are always open), finite values keep the flag.
    pub(crate) fn from_value(value: T, closed: bool) -> Self {
        if value.is_finite() {
            Bound::Finite { value, closed }
        } else if value > T::zero() {
            Bound::PosInfinity
        } else {
            Bound::NegInfinity
        }
    }

    /// The endpoint as an extended-real value plus its attained flag.
    /// Infinities come back as the signed infinite value, open.
    pub(crate) fn raw(&self) -> (T, bool) {
        match self {
            Bound::NegInfinity => (T::neg_infinity(), false),
            Bound::Finite { value, closed } => (*value, *closed),
            Bound::PosInfinity => (T::infinity(), false),
        }
    }

    /// Exact negation; `[a` becomes `a]` on the other side of zero.
    pub(crate) fn neg(&self) -> Self {
        match self {
            Bound::NegInfinity => Bound::PosInfinity,
            Bound::PosInfinity => Bound::NegInfinity,
            Bound::Finite { value, closed } => Bound::Finite {
                value: value.neg(),
                closed: *closed,
            },
        }
    }

    /// Ordering of two endpoints both used as lower bounds.  At equal
    /// values the closed bound starts earlier: `[1, ...` covers more
    /// than `(1, ...`.
    pub(crate) fn cmp_lower(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Bound::NegInfinity, Bound::NegInfinity) => Ordering::Equal,
            (Bound::NegInfinity, Bound::Finite { .. } | Bound::PosInfinity) => {
                Ordering::Less
            }
            (Bound::Finite { .. } | Bound::PosInfinity, Bound::NegInfinity) => {
                Ordering::Greater
            }
            (Bound::PosInfinity, Bound::PosInfinity) => Ordering::Equal,
            (Bound::PosInfinity, Bound::Finite { .. }) => Ordering::Greater,
            (Bound::Finite { .. }, Bound::PosInfinity) => Ordering::Less,
            (
                Bound::Finite {
                    value: a,
                    closed: ca,
                },
                Bound::Finite {
                    value: b,
                    closed: cb,
                },
            ) => match cmp_values(a, b) {
                Ordering::Equal => match (ca, cb) {
                    (true, false) => Ordering::Less,
                    (false, true) => Ordering::Greater,
                    (true, true) | (false, false) => Ordering::Equal,
                },
                ord => ord,
            },
        }
    }

    /// Ordering of two endpoints both used as upper bounds.  At equal
    /// values the open bound stops earlier: `..., 1)` covers less than
    /// `..., 1]`.
    pub(crate) fn cmp_upper(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Bound::NegInfinity, Bound::NegInfinity) => Ordering::Equal,
            (Bound::NegInfinity, Bound::Finite { .. } | Bound::PosInfinity) => {
                Ordering::Less
            }
            (Bound::Finite { .. } | Bound::PosInfinity, Bound::NegInfinity) => {
                Ordering::Greater
            }
            (Bound::PosInfinity, Bound::PosInfinity) => Ordering::Equal,
            (Bound::PosInfinity, Bound::Finite { .. }) => Ordering::Greater,
            (Bound::Finite { .. }, Bound::PosInfinity) => Ordering::Less,
            (
                Bound::Finite {
                    value: a,
                    closed: ca,
                },
                Bound::Finite {
                    value: b,
                    closed: cb,
                },
            ) => match cmp_values(a, b) {
                Ordering::Equal => match (ca, cb) {
                    (true, false) => Ordering::Greater,
                    (false, true) => Ordering::Less,
                    (true, true) | (false, false) => Ordering::Equal,
                },
                ord => ord,
            },
        }
    }

    /// Whether `v`, seen from this endpoint used as a lower bound, lies
    /// inside the interval.
    pub(crate) fn admits_from_below(&self, v: &T) -> bool {
        match self {
            Bound::NegInfinity => true,
            Bound::PosInfinity => false,
            Bound::Finite { value, closed } => {
                if *closed {
                    *v >= *value
                } else {
                    *v > *value
                }
            }
        }
    }

    /// Whether `v`, seen from this endpoint used as an upper bound, lies
    /// inside the interval.
    pub(crate) fn admits_from_above(&self, v: &T) -> bool {
        match self {
            Bound::PosInfinity => true,
            Bound::NegInfinity => false,
            Bound::Finite { value, closed } => {
                if *closed {
                    *v <= *value
                } else {
                    *v < *value
                }
            }
        }
    }
}

/// Endpoint values are never NaN (rejected at construction), so the
/// partial order is total here.
pub(crate) fn cmp_values<T: RoundedNumeric>(a: &T, b: &T) -> Ordering {
    match a.partial_cmp(b) {
        Some(ord) => ord,
        None => Ordering::Equal,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_raw_and_from_value() {
        let b = Bound::closed(2.0);
        assert_eq!(b.raw(), (2.0, true));
        assert_eq!(Bound::<f64>::NegInfinity.raw(), (f64::NEG_INFINITY, false));
        assert_eq!(
            Bound::from_value(f64::INFINITY, true),
            Bound::<f64>::PosInfinity
        );
        assert_eq!(Bound::from_value(1.5, false), Bound::open(1.5));
    }

    #[test]
    fn test_cmp_lower() {
        let closed = Bound::closed(1.0);
        let open = Bound::open(1.0);
        assert_eq!(closed.cmp_lower(&open), Ordering::Less);
        assert_eq!(open.cmp_lower(&closed), Ordering::Greater);
        assert_eq!(closed.cmp_lower(&closed), Ordering::Equal);
        assert_eq!(
            Bound::<f64>::NegInfinity.cmp_lower(&closed),
            Ordering::Less
        );
        assert_eq!(
            Bound::closed(0.5).cmp_lower(&open),
            Ordering::Less
        );
    }

    #[test]
    fn test_cmp_upper() {
        let closed = Bound::closed(1.0);
        let open = Bound::open(1.0);
        assert_eq!(closed.cmp_upper(&open), Ordering::Greater);
        assert_eq!(open.cmp_upper(&closed), Ordering::Less);
        assert_eq!(
            Bound::<f64>::PosInfinity.cmp_upper(&closed),
            Ordering::Greater
        );
    }

    #[test]
    fn test_admits() {
        let lower = Bound::open(1.0);
        assert!(!lower.admits_from_below(&1.0));
        assert!(lower.admits_from_below(&1.0000001));
        let upper = Bound::closed(2.0);
        assert!(upper.admits_from_above(&2.0));
        assert!(!upper.admits_from_above(&2.0000001));
        assert!(Bound::<f64>::NegInfinity.admits_from_below(&-1.0e300));
        assert!(!Bound::<f64>::NegInfinity.admits_from_above(&-1.0e300));
    }

    #[test]
    fn test_neg() {
        assert_eq!(Bound::closed(2.0).neg(), Bound::closed(-2.0));
        assert_eq!(Bound::<f64>::NegInfinity.neg(), Bound::PosInfinity);
    }
}
