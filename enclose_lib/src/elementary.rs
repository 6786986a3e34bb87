//! Elementary functions over `Interval<f64>`.
//!
//! The endpoint values come from the platform libm, which promises
//! faithful rounding at best, so every computed endpoint is pushed two
//! units in the last place outward before use.  Partial domain overlap
//! restricts the input silently; only an input entirely outside the
//! domain raises [`Error::DomainError`].

use crate::bound::Bound;
use crate::errors::Error;
use crate::interval::Interval;
use log::debug;
use std::f64::consts::{FRAC_PI_2, PI, TAU};

/// Beyond this magnitude the phase of a trig argument can no longer be
/// pinned down reliably, so the periodic functions give up and return
/// their full range.
const PHASE_LIMIT: f64 = 1.0e12;

/// Two steps down: covers the worst case of a faithfully rounded libm.
fn lib_down(x: f64) -> f64 {
    if x.is_finite() {
        x.next_down().next_down()
    } else {
        x
    }
}

fn lib_up(x: f64) -> f64 {
    if x.is_finite() {
        x.next_up().next_up()
    } else {
        x
    }
}

fn sqrt_down(v: f64) -> f64 {
    let s = v.sqrt();
    // The residual v - s*s has the sign of sqrt(v) - s, and the fused
    // multiply computes it without intermediate rounding, so exact
    // square roots stay exact.
    if (-s).mul_add(s, v) < 0.0 {
        s.next_down()
    } else {
        s
    }
}

fn sqrt_up(v: f64) -> f64 {
    if v == f64::INFINITY {
        return v;
    }
    let s = v.sqrt();
    if (-s).mul_add(s, v) > 0.0 {
        s.next_up()
    } else {
        s
    }
}

/// Whether `[lo, hi]` contains a point congruent to `phase` modulo
/// `period`.  The check errs toward `true`: claiming an extremum that is
/// just outside only widens the result.
fn contains_phase(lo: f64, hi: f64, phase: f64, period: f64) -> bool {
    let k = ((lo - phase) / period).ceil();
    let slack = 4.0 * f64::EPSILON * (1.0 + lo.abs().max(hi.abs()));
    for j in [-1.0, 0.0, 1.0] {
        let candidate = (k + j).mul_add(period, phase);
        if candidate >= lo - slack && candidate <= hi + slack {
            return true;
        }
    }
    false
}

fn full_range() -> Interval<f64> {
    Interval::make(Bound::closed(-1.0), Bound::closed(1.0))
}

impl Interval<f64> {
    /// `{e^x}`.  The infimum never reaches zero, so a lower bound of
    /// negative infinity maps to an open zero.
    pub fn exp(&self) -> Self {
        let Some((lower, upper)) = self.bounds() else {
            return Interval::Empty;
        };
        let (lv, lc) = lower.raw();
        let (uv, uc) = upper.raw();
        let lo = if lv == f64::NEG_INFINITY {
            Bound::open(0.0)
        } else {
            let v = lv.exp();
            if v == f64::INFINITY {
                // Overflow: the exact value is finite, so rounding down
                // lands on the largest finite value.
                Bound::from_value(f64::MAX, lc)
            } else {
                let down = lib_down(v);
                if down <= 0.0 {
                    // Deep underflow; the infimum never reaches zero.
                    Bound::open(0.0)
                } else {
                    Bound::from_value(down, lc)
                }
            }
        };
        let hi = if uv == f64::INFINITY {
            Bound::PosInfinity
        } else {
            Bound::from_value(lib_up(uv.exp()), uc)
        };
        Self::make(lo, hi)
    }

    fn log_base(
        &self,
        func: &'static str,
        f: fn(f64) -> f64,
    ) -> Result<Self, Error> {
        if self.is_empty() {
            return Ok(Interval::Empty);
        }
        let positive = Self::make(Bound::open(0.0), Bound::PosInfinity);
        let clipped = self.intersection(&positive);
        if clipped.is_empty() {
            return Err(Error::DomainError {
                func,
                input: self.to_string(),
            });
        }
        if clipped != *self {
            debug!("{func}: restricting {self} to {clipped}");
        }
        let Some((lower, upper)) = clipped.bounds() else {
            return Ok(Interval::Empty);
        };
        let (lv, lc) = lower.raw();
        let (uv, uc) = upper.raw();
        let lo = if lv == 0.0 {
            Bound::NegInfinity
        } else {
            Bound::from_value(lib_down(f(lv)), lc)
        };
        let hi = if uv == f64::INFINITY {
            Bound::PosInfinity
        } else {
            Bound::from_value(lib_up(f(uv)), uc)
        };
        Ok(Self::make(lo, hi))
    }

    /// `{ln x}` over the positive part of the input.
    pub fn ln(&self) -> Result<Self, Error> {
        self.log_base("ln", f64::ln)
    }

    /// `{log2 x}` over the positive part of the input.
    pub fn log2(&self) -> Result<Self, Error> {
        self.log_base("log2", f64::log2)
    }

    /// `{log10 x}` over the positive part of the input.
    pub fn log10(&self) -> Result<Self, Error> {
        self.log_base("log10", f64::log10)
    }

    /// `{sqrt x}` over the non-negative part of the input.  Exact
    /// square roots of exact endpoints stay exact.
    pub fn sqrt(&self) -> Result<Self, Error> {
        if self.is_empty() {
            return Ok(Interval::Empty);
        }
        let non_negative = Self::make(Bound::closed(0.0), Bound::PosInfinity);
        let clipped = self.intersection(&non_negative);
        if clipped.is_empty() {
            return Err(Error::DomainError {
                func: "sqrt",
                input: self.to_string(),
            });
        }
        if clipped != *self {
            debug!("sqrt: restricting {self} to {clipped}");
        }
        let Some((lower, upper)) = clipped.bounds() else {
            return Ok(Interval::Empty);
        };
        let (lv, lc) = lower.raw();
        let (uv, uc) = upper.raw();
        let lo = Bound::from_value(sqrt_down(lv).max(0.0), lc);
        let hi = if uv == f64::INFINITY {
            Bound::PosInfinity
        } else {
            Bound::from_value(sqrt_up(uv), uc)
        };
        Ok(Self::make(lo, hi))
    }

    /// `{sin x}`.
    pub fn sin(&self) -> Self {
        let Some((lower, upper)) = self.bounds() else {
            return Interval::Empty;
        };
        let (lv, _) = lower.raw();
        let (uv, _) = upper.raw();
        if !lv.is_finite()
            || !uv.is_finite()
            || uv - lv >= TAU
            || lv.abs() >= PHASE_LIMIT
            || uv.abs() >= PHASE_LIMIT
        {
            return full_range();
        }
        let mut lo = lib_down(lv.sin().min(uv.sin())).max(-1.0);
        let mut hi = lib_up(lv.sin().max(uv.sin())).min(1.0);
        if contains_phase(lv, uv, FRAC_PI_2, TAU) {
            hi = 1.0;
        }
        if contains_phase(lv, uv, -FRAC_PI_2, TAU) {
            lo = -1.0;
        }
        Self::make(Bound::closed(lo), Bound::closed(hi))
    }

    /// `{cos x}`.
    pub fn cos(&self) -> Self {
        let Some((lower, upper)) = self.bounds() else {
            return Interval::Empty;
        };
        let (lv, _) = lower.raw();
        let (uv, _) = upper.raw();
        if !lv.is_finite()
            || !uv.is_finite()
            || uv - lv >= TAU
            || lv.abs() >= PHASE_LIMIT
            || uv.abs() >= PHASE_LIMIT
        {
            return full_range();
        }
        let mut lo = lib_down(lv.cos().min(uv.cos())).max(-1.0);
        let mut hi = lib_up(lv.cos().max(uv.cos())).min(1.0);
        if contains_phase(lv, uv, 0.0, TAU) {
            hi = 1.0;
        }
        if contains_phase(lv, uv, PI, TAU) {
            lo = -1.0;
        }
        Self::make(Bound::closed(lo), Bound::closed(hi))
    }

    /// `{tan x}`.  An input reaching across a pole yields the whole
    /// line instead of an error: the exact range there is unbounded on
    /// both sides.
    pub fn tan(&self) -> Self {
        let Some((lower, upper)) = self.bounds() else {
            return Interval::Empty;
        };
        let (lv, lc) = lower.raw();
        let (uv, uc) = upper.raw();
        if !lv.is_finite()
            || !uv.is_finite()
            || uv - lv >= PI
            || lv.abs() >= PHASE_LIMIT
            || uv.abs() >= PHASE_LIMIT
        {
            return Interval::Universe;
        }
        if contains_phase(lv, uv, FRAC_PI_2, PI) {
            return Interval::Universe;
        }
        // Strictly increasing between two consecutive poles.
        Self::make(
            Bound::from_value(lib_down(lv.tan()), lc),
            Bound::from_value(lib_up(uv.tan()), uc),
        )
    }

    /// `{atan x}`.  Total; infinite endpoints map just outside the open
    /// limits at plus and minus pi over two.
    pub fn atan(&self) -> Self {
        let Some((lower, upper)) = self.bounds() else {
            return Interval::Empty;
        };
        let (lv, lc) = lower.raw();
        let (uv, uc) = upper.raw();
        Self::make(
            Bound::from_value(lib_down(lv.atan()), lc && lv.is_finite()),
            Bound::from_value(lib_up(uv.atan()), uc && uv.is_finite()),
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn closed(lo: f64, hi: f64) -> Interval<f64> {
        Interval::closed(lo, hi).unwrap()
    }

    #[test]
    fn test_sqrt_exact() {
        assert_eq!(closed(-4.0, 9.0).sqrt().unwrap(), closed(0.0, 3.0));
        assert_eq!(closed(4.0, 16.0).sqrt().unwrap(), closed(2.0, 4.0));
        assert_eq!(
            Interval::unbounded_above(25.0).unwrap().sqrt().unwrap(),
            Interval::unbounded_above(5.0).unwrap()
        );
    }

    #[test]
    fn test_sqrt_domain() {
        assert!(matches!(
            closed(-9.0, -4.0).sqrt(),
            Err(Error::DomainError { func: "sqrt", .. })
        ));
        assert_eq!(
            Interval::<f64>::empty().sqrt().unwrap(),
            Interval::Empty
        );
        // Touching zero from below is enough to stay in the domain.
        assert_eq!(closed(-1.0, 0.0).sqrt().unwrap(), closed(0.0, 0.0));
    }

    #[test]
    fn test_sqrt_inexact_brackets() {
        let r = closed(2.0, 2.0).sqrt().unwrap();
        let s = std::f64::consts::SQRT_2;
        assert!(r.contains(s));
        assert!(r.width() < 1.0e-15);
    }

    #[test]
    fn test_ln() {
        assert!(matches!(
            closed(-3.0, -2.0).ln(),
            Err(Error::DomainError { func: "ln", .. })
        ));
        assert!(matches!(
            Interval::point(0.0).unwrap().ln(),
            Err(Error::DomainError { .. })
        ));
        assert_eq!(Interval::<f64>::empty().ln().unwrap(), Interval::Empty);

        let r = closed(1.0, std::f64::consts::E).ln().unwrap();
        assert!(r.contains(0.0));
        assert!(r.contains(1.0));
        assert!(!r.contains(1.1));

        // Partial overlap clips to the positive part: the zero edge of
        // the domain pulls the lower bound to -inf.
        let r = closed(-1.0, 1.0).ln().unwrap();
        assert_eq!(r.lower(), None);
        assert!(r.contains(-100.0));
        assert!(r.contains(0.0));
        assert!(!r.contains(0.1));
    }

    #[test]
    fn test_log_bases() {
        let r = closed(8.0, 8.0).log2().unwrap();
        assert!(r.contains(3.0));
        assert!(r.width() < 1.0e-14);
        let r = closed(100.0, 1000.0).log10().unwrap();
        assert!(r.contains(2.0));
        assert!(r.contains(3.0));
        assert!(!r.contains(3.1));
    }

    #[test]
    fn test_exp() {
        let r = Interval::point(0.0).unwrap().exp();
        assert!(r.contains(1.0));
        assert!(r.width() < 1.0e-15);

        let r = Interval::unbounded_below(0.0).unwrap().exp();
        assert_eq!(r.lower(), Some(0.0));
        assert!(!r.lower_closed());
        assert!(r.contains(1.0));
        assert!(!r.contains(1.1));
        assert!(!r.contains(-0.1));

        let r = Interval::<f64>::universe().exp();
        assert!(!r.contains(0.0));
        assert!(r.contains(1.0e300));
    }

    #[test]
    fn test_exp_overflow_and_underflow() {
        // Both endpoints overflow; the exact range is still a non-empty
        // set of (huge) reals.
        let r = closed(710.0, 720.0).exp();
        assert!(!r.is_empty());
        assert_eq!(r.lower(), Some(f64::MAX));
        assert_eq!(r.upper(), None);
        assert!(r.contains(f64::MAX));

        // Only the upper endpoint overflows.
        let r = closed(1.0, 720.0).exp();
        assert!(r.contains(std::f64::consts::E));
        assert_eq!(r.upper(), None);

        // Deep underflow stays positive: zero is never attained.
        let r = Interval::point(-800.0).unwrap().exp();
        assert!(!r.is_empty());
        assert_eq!(r.lower(), Some(0.0));
        assert!(!r.lower_closed());
    }

    #[test]
    fn test_exp_ln_inverse() {
        let x = closed(0.5, 2.0);
        assert!(x.exp().ln().unwrap().contains_interval(&x));
    }

    #[test]
    fn test_sin() {
        assert_eq!(closed(0.0, TAU).sin(), closed(-1.0, 1.0));
        assert_eq!(closed(-1.0e15, 7.0).sin(), closed(-1.0, 1.0));
        assert_eq!(Interval::<f64>::universe().sin(), closed(-1.0, 1.0));

        // [0, pi] covers the maximum but not the minimum.
        let r = closed(0.0, PI).sin();
        assert!(r.contains(1.0));
        assert!(r.contains(0.0));
        assert!(!r.contains(-0.5));

        // A slice with no extremum stays between its endpoint values.
        let r = closed(0.1, 0.2).sin();
        assert!(r.contains(0.15f64.sin()));
        assert!(!r.contains(0.0));
        assert!(!r.contains(0.25));
    }

    #[test]
    fn test_sin_far_from_origin() {
        // Same phase window, shifted by many periods.
        let r = closed(1000.0 * TAU, 1000.0f64.mul_add(TAU, PI)).sin();
        assert!(r.contains(1.0));
        assert!(!r.contains(-0.5));
    }

    #[test]
    fn test_cos() {
        let r = closed(0.0, PI).cos();
        assert_eq!(r, closed(-1.0, 1.0));
        let r = closed(FRAC_PI_2, PI).cos();
        assert!(r.contains(-1.0));
        assert!(r.contains(0.0));
        assert!(!r.contains(0.5));
    }

    #[test]
    fn test_tan() {
        // A pole inside the input gives the whole line.
        assert_eq!(closed(1.0, 2.0).tan(), Interval::Universe);
        assert_eq!(closed(0.0, PI).tan(), Interval::Universe);

        let r = closed(-0.5, 0.5).tan();
        assert!(r.contains(0.4f64.tan()));
        assert!(r.contains(0.0));
        assert!(!r.contains(1.0));
        assert!(!r.contains(-1.0));
    }

    #[test]
    fn test_atan() {
        let r = Interval::<f64>::universe().atan();
        assert!(r.contains(0.0));
        assert!(r.contains(1.5));
        assert!(!r.contains(1.6));
        assert!(!r.contains(-1.6));

        let r = Interval::point(1.0).unwrap().atan();
        assert!(r.contains(std::f64::consts::FRAC_PI_4));
        assert!(r.width() < 1.0e-15);
    }

    #[test]
    fn test_empty_propagates() {
        let empty = Interval::<f64>::empty();
        assert!(empty.exp().is_empty());
        assert!(empty.sin().is_empty());
        assert!(empty.cos().is_empty());
        assert!(empty.tan().is_empty());
        assert!(empty.atan().is_empty());
    }

    #[test]
    fn test_soundness_sampling() {
        let inputs = [
            closed(0.25, 4.0),
            closed(-3.0, 2.0),
            closed(-0.5, 0.5),
            closed(10.0, 12.5),
        ];
        for x in inputs {
            let Some((lower, upper)) = x.bounds() else {
                continue;
            };
            let (lo, _) = lower.raw();
            let (hi, _) = upper.raw();
            let mut p = lo;
            while p <= hi {
                assert!(x.exp().contains(p.exp()), "exp({p}) escaped {x}");
                assert!(x.sin().contains(p.sin()), "sin({p}) escaped {x}");
                assert!(x.cos().contains(p.cos()), "cos({p}) escaped {x}");
                assert!(x.atan().contains(p.atan()), "atan({p}) escaped {x}");
                if p > 0.0 {
                    assert!(
                        x.ln().unwrap().contains(p.ln()),
                        "ln({p}) escaped {x}"
                    );
                }
                if p >= 0.0 {
                    assert!(
                        x.sqrt().unwrap().contains(p.sqrt()),
                        "sqrt({p}) escaped {x}"
                    );
                }
                p += 0.125;
            }
        }
    }
}
