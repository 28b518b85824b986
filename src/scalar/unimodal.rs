//! Bracketing a minimum of a univariate function.
//!
//! Starting from `x0`, the three points `x0 - h`, `x0`, `x0 + h` are compared. If the middle
//! one is the lowest, the bracket is already found. Otherwise the window walks downhill, its
//! step doubling every move, until the function turns upward again:
//!
//! ```text
//!          l    m    r
//! step 1   +----+----+
//! step 2        l    m---------r
//! step 3             l         m-------------------r
//! ```
use crate::error::Result;
use crate::function::ScalarObjective;
use crate::utils::Interval;

/// Returns an interval around `x0` that contains a local minimum of `function`.
pub fn unimodal_interval<F>(function: &F, h: f64, x0: f64) -> Result<Interval>
where
    F: ScalarObjective + ?Sized,
{
    let mut l = x0 - h;
    let mut m = x0;
    let mut r = x0 + h;
    let mut fl = function.value_at(l);
    let mut fm = function.value_at(m);
    let mut fr = function.value_at(r);
    let mut step = 1.0;

    if fm < fr && fm < fl {
        return Interval::new(l, r);
    } else if fm > fr {
        while fm > fr {
            l = m;
            m = r;
            fm = fr;
            step *= 2.0;
            r = x0 + h * step;
            fr = function.value_at(r);
        }
    } else {
        while fm > fl {
            r = m;
            m = l;
            fm = fl;
            step *= 2.0;
            l = x0 - h * step;
            fl = function.value_at(l);
        }
    }
    trace!("unimodal interval around {}: [{}, {}]", x0, l, r);
    Interval::new(l, r)
}
