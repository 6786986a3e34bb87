//! Sound interval arithmetic with outward rounding.
//!
//! An [`Interval`] stands for every real value between its two bounds,
//! and each operation returns an interval guaranteed to contain every
//! exact result reachable from its operands.  Finite-precision error is
//! absorbed by rounding the lower bound down and the upper bound up, so
//! a chain of operations can over-approximate but never lose a value.
//!
//!  |Interval|Constructor                         |Description
//!  |--------|------------------------------------|--------------
//!  | `[A,B]`|[`Interval::closed`]                |both endpoints attained
//!  | `(A,B)`|[`Interval::open`]                  |both endpoints excluded
//!  | `[A,B)`|[`Interval::closed_open`]           |left-closed, right-open
//!  | `(A,B]`|[`Interval::open_closed`]           |left-open, right-closed
//!  | `[A,A]`|[`Interval::point`]                 |a single value
//!  | `[A,)` |[`Interval::unbounded_above`]       |right-unbounded
//!  | `(A,)` |[`Interval::unbounded_above_open`]  |right-unbounded, left-open
//!  | `(,B]` |[`Interval::unbounded_below`]       |left-unbounded
//!  | `(,B)` |[`Interval::unbounded_below_open`]  |left-unbounded, right-open
//!  | `(,)`  |[`Interval::universe`]              |the whole line
//!  | `empty`|[`Interval::empty`]                 |no values
//!
//! Construction validates its inputs (no NaN bounds, lower at or below
//! upper) and returns [`Error::InvalidBounds`] otherwise; arithmetic
//! itself never fails.  Comparisons come back as a three-valued
//! [`Truth`], since overlapping operands leave an ordering undecided:
//!
//! ```
//! use enclose_lib::{Interval, Truth};
//!
//! let a = Interval::closed(1.0, 2.0)?;
//! let b = Interval::closed(3.0, 4.0)?;
//! assert_eq!((a + b), Interval::closed(4.0, 6.0)?);
//! assert_eq!(a.definitely_lt(&b), Truth::True);
//! # Ok::<(), enclose_lib::Error>(())
//! ```
//!
//! The numeric behavior is pluggable through [`RoundedNumeric`], the
//! capability trait bundling directed arithmetic for a bound type; the
//! crate implements it for `f64`.  Elementary functions (`exp`, `ln`,
//! `sqrt`, the trig family) are provided on `Interval<f64>` directly,
//! on top of the platform libm with outward nudging.

mod arith;
mod bound;
mod elementary;
mod errors;
mod interval;
mod roots;
mod round;
mod set;

pub use crate::arith::Truth;
pub use crate::bound::Bound;
pub use crate::errors::Error;
pub use crate::interval::Interval;
pub use crate::roots::bisect;
pub use crate::round::{Round, RoundedNumeric};
pub use crate::set::{MultiInterval, Split};
