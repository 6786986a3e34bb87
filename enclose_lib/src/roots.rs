//! Root isolation by branch-and-prune bisection.

use crate::bound::Bound;
use crate::interval::Interval;
use itertools::Itertools;
use log::debug;

/// Overflow-safe midpoint: same-sign endpoints go through the
/// difference, mixed signs through the plain average.
fn mean(lo: f64, hi: f64) -> f64 {
    if (lo < 0.0) == (hi < 0.0) {
        0.5f64.mul_add(hi - lo, lo)
    } else {
        0.5 * (lo + hi)
    }
}

/// Encloses every zero of `f` on `domain` in a list of disjoint closed
/// intervals, sorted in increasing order.
///
/// `f` must be an interval extension of the target function: its result
/// on a box has to contain the exact image of that box.  Boxes whose
/// image excludes zero are pruned; the rest are bisected until their
/// width drops below `tol` or `max_depth` splits have happened.  Touching
/// enclosures (the shared endpoint of a split, or neighbors the
/// extension could not separate) are merged before returning.
///
/// The list is an enclosure, not a certificate: an interval in it may
/// still contain no root if `f` overestimates, but no root of the exact
/// function is ever outside all of them.
pub fn bisect<F>(
    f: F,
    domain: &Interval<f64>,
    tol: f64,
    max_depth: u32,
) -> Vec<Interval<f64>>
where
    F: Fn(&Interval<f64>) -> Interval<f64>,
{
    let Some((lower, upper)) = domain.bounds() else {
        return vec![];
    };
    let (lv, _) = lower.raw();
    let (uv, _) = upper.raw();
    // The search itself only walks finite boxes.
    let lo = if lv.is_finite() { lv } else { f64::MIN };
    let hi = if uv.is_finite() { uv } else { f64::MAX };
    if lo != lv || hi != uv {
        debug!("bisect: restricting {domain} to [{lo}, {hi}]");
    }

    let mut pending = vec![(lo, hi, 0u32)];
    let mut found: Vec<(f64, f64)> = vec![];
    while let Some((lo, hi, depth)) = pending.pop() {
        let along =
            Interval::make(Bound::closed(lo), Bound::closed(hi));
        if !f(&along).contains(0.0) {
            continue;
        }
        let m = mean(lo, hi);
        if depth >= max_depth || along.width() <= tol || m <= lo || m >= hi {
            found.push((lo, hi));
            continue;
        }
        // Both halves keep the midpoint: a root sitting exactly on the
        // cut stays covered.
        pending.push((lo, m, depth + 1));
        pending.push((m, hi, depth + 1));
    }

    found.sort_by(|a, b| a.0.total_cmp(&b.0));
    found
        .into_iter()
        .coalesce(|a, b| {
            if b.0 <= a.1 {
                Ok((a.0, a.1.max(b.1)))
            } else {
                Err((a, b))
            }
        })
        .map(|(lo, hi)| Interval::make(Bound::closed(lo), Bound::closed(hi)))
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    fn closed(lo: f64, hi: f64) -> Interval<f64> {
        Interval::closed(lo, hi).unwrap()
    }

    fn assert_covers(enclosures: &[Interval<f64>], roots: &[f64], near: f64) {
        for &r in roots {
            assert!(
                enclosures.iter().any(|e| e.contains(r)),
                "root {r} not covered by {enclosures:?}"
            );
        }
        for e in enclosures {
            let lo = e.lower().unwrap();
            let hi = e.upper().unwrap();
            assert!(
                roots.iter().any(|r| lo - near <= *r && *r <= hi + near),
                "{e} is not near any true root"
            );
        }
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(2.0, 4.0), 3.0);
        assert_eq!(mean(-4.0, -2.0), -3.0);
        assert_eq!(mean(-2.0, 2.0), 0.0);
        // No overflow on a huge same-sign box.
        let m = mean(1.0e300, f64::MAX);
        assert!(m.is_finite() && m > 1.0e300);
        assert!(mean(f64::MIN, f64::MAX).is_finite());
    }

    #[test]
    fn test_sqrt_two() {
        let two = Interval::point(2.0).unwrap();
        let enclosures =
            bisect(|x| x.mul(x).sub(&two), &closed(0.0, 5.0), 1.0e-9, 60);
        assert_eq!(enclosures.len(), 1);
        assert!(enclosures.first().unwrap().contains(std::f64::consts::SQRT_2));
        assert!(enclosures.first().unwrap().width() < 1.0e-6);
    }

    #[test]
    fn test_sin_roots() {
        let enclosures =
            bisect(|x| x.sin(), &closed(-1.0, 7.0), 1.0e-9, 60);
        assert_covers(
            &enclosures,
            &[0.0, std::f64::consts::PI, std::f64::consts::TAU],
            1.0e-6,
        );
    }

    #[test]
    fn test_no_roots() {
        let one = Interval::point(1.0).unwrap();
        let enclosures =
            bisect(|x| x.mul(x).add(&one), &closed(-3.0, 3.0), 1.0e-9, 40);
        assert!(enclosures.is_empty());
    }

    #[test]
    fn test_root_on_cut() {
        // Zero is the exact midpoint of the starting box.
        let enclosures = bisect(|x| *x, &closed(-2.0, 2.0), 1.0e-9, 60);
        assert_eq!(enclosures.len(), 1);
        assert!(enclosures.first().unwrap().contains(0.0));
    }

    #[test]
    fn test_unbounded_domain_is_clipped() {
        let two = Interval::point(2.0).unwrap();
        // Narrowing from the full finite line down to the tolerance
        // takes on the order of a thousand splits.
        let enclosures = bisect(
            |x| x.mul(x).sub(&two),
            &Interval::universe(),
            1.0e-9,
            1200,
        );
        assert_covers(
            &enclosures,
            &[-std::f64::consts::SQRT_2, std::f64::consts::SQRT_2],
            1.0e-6,
        );
    }
}
