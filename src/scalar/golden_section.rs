//! Golden section is to minimization what bisection is to root finding.
//! GoldenSection searches within an interval for a local minimum. At
//! every iteration, the interval is decreased in size by a constant
//! factor, until the desired precision is obtained.
//!
//! The search first brackets a minimum around the starting point (see
//! [`unimodal_interval`]) and then narrows that bracket.
//!
//! In an iteration, the target function is known at 4 points:
//!         +---------+----+---------+
//! iter 1  a         c    d         b
//! The interval for the next iteration is chosen to be [a,d] if c<d,
//! and [c,b] if d<=c. The distances c-a, d-c, and b-d are chosen in such
//! a way that 3 out of 4 points can be reused, and only 1 new function
//! evaluation is required in the next iteration. If c<d this looks like:
//!         +---------+----+---------+
//! iter 1  a         c    d         b
//!         +----+----+----+
//! iter 2  a    c    d    b

use super::unimodal::unimodal_interval;
use crate::error::Result;
use crate::function::ScalarObjective;
use crate::utils::Interval;

/// `(sqrt(5) - 1) / 2`
pub const K: f64 = 0.618_033_988_749_894_9;

#[derive(Builder, Debug, Clone, PartialEq)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct GoldenSection {
    /// The width of the interval at which convergence is satisfactory.
    /// Smaller is more precise.
    #[builder(default = "1e-6")]
    pub epsilon: f64,

    /// Initial step of the bracketing stage.
    #[builder(default = "1.0")]
    pub h: f64,
}

impl GoldenSectionBuilder {
    fn validate(&self) -> std::result::Result<(), String> {
        if let Some(epsilon) = self.epsilon {
            if !(epsilon > 0.0) {
                return Err(format!("epsilon must be positive, got {}", epsilon));
            }
        }
        if let Some(h) = self.h {
            if !(h > 0.0) {
                return Err(format!("h must be positive, got {}", h));
            }
        }
        Ok(())
    }
}

impl Default for GoldenSection {
    fn default() -> Self {
        GoldenSection {
            epsilon: 1e-6,
            h: 1.0,
        }
    }
}

impl GoldenSection {
    /// Searches for a minimum of `function` near `x0`.
    pub fn search<F>(&self, function: &F, x0: f64) -> Result<f64>
    where
        F: ScalarObjective + ?Sized,
    {
        let interval = unimodal_interval(function, self.h, x0)?;
        Ok(self.refine(function, interval)?.midpoint())
    }

    /// Narrows `interval` until its width drops to `epsilon`.
    pub fn refine<F>(&self, function: &F, interval: Interval) -> Result<Interval>
    where
        F: ScalarObjective + ?Sized,
    {
        let mut a = interval.start();
        let mut b = interval.end();
        let mut c = b - K * (b - a);
        let mut d = a + K * (b - a);
        let mut fc = function.value_at(c);
        let mut fd = function.value_at(d);

        while (b - a).abs() > self.epsilon {
            if fc < fd {
                b = d;
                d = c;
                c = b - K * (b - a);
                fd = fc;
                fc = function.value_at(c);
            } else {
                a = c;
                c = d;
                d = a + K * (b - a);
                fc = fd;
                fd = function.value_at(d);
            }
        }
        debug!("golden section converged to [{}, {}]", a, b);
        Interval::new(a, b)
    }
}
