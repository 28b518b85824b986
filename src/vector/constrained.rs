//! Constrained minimization by a sequence of unconstrained searches.
//!
//! The objective is wrapped in a [`ConstrainedFunction`], which adds a logarithmic barrier
//! for the inequality constraints and a quadratic penalty for the equality constraints,
//! both weighted by a coefficient `t`. Each round minimizes the wrapped function with an
//! ordinary minimizer starting from the previous result, then multiplies `t` by `growth`.
//! The rounds stop once a round moves the point by less than `epsilon`.
//!
//! A starting point that violates an inequality constraint is first moved into the
//! feasible region by minimizing the total constraint violation.
use ndarray::{Array1, ArrayView1};

use super::HookeJeeves;
use crate::constraints::{test_all, violation_sum};
use crate::error::{Error, Result};
use crate::function::{ConstrainedFunction, Objective};
use crate::linalg::vector::{norm, subtract_to_copy};
use crate::minimizer::Minimizer;

#[derive(Debug, Clone, PartialEq)]
pub struct ConstrainedOptimizer<M = HookeJeeves> {
    /// Runs the unconstrained searches.
    pub minimizer: M,
    pub epsilon: f64,
    /// Initial barrier/penalty coefficient.
    pub coefficient: f64,
    pub divergence_limit: usize,
    /// Factor applied to the coefficient after every round.
    pub growth: f64,
}

impl<M: Minimizer> ConstrainedOptimizer<M> {
    pub fn new(minimizer: M) -> Self {
        ConstrainedOptimizer {
            minimizer,
            epsilon: 1e-6,
            coefficient: 1.0,
            divergence_limit: 100,
            growth: 10.0,
        }
    }

    pub fn name(&self) -> &'static str {
        "constrained optimizer"
    }

    /// Searches for a constrained minimum of `function` from `x0`.
    ///
    /// The coefficient of `function` is overwritten as the rounds progress and is left at
    /// its final value.
    pub fn search<O: Objective>(
        &self,
        function: &mut ConstrainedFunction<O>,
        x0: ArrayView1<f64>,
    ) -> Result<Array1<f64>> {
        let mut x = if test_all(x0, function.inequality_constraints()) {
            x0.to_owned()
        } else {
            self.interior_point(function, x0)?
        };

        let mut t = self.coefficient;
        let mut best_value = f64::INFINITY;
        let mut best_point = x.clone();
        let mut count = 0;
        let mut rounds = 0;

        loop {
            if count > self.divergence_limit {
                warn!(
                    "{}: no improvement in {} rounds, giving up at {}",
                    self.name(),
                    count,
                    best_point
                );
                return Err(Error::DivergenceLimitReached {
                    limit: self.divergence_limit,
                    point: best_point,
                });
            }

            function.set_coefficient(t);
            let next = self.minimizer.search(&*function, x.view())?;
            let value = function.value_at(next.view());
            rounds += 1;
            trace!("{}: round {}, t = {}, f({}) = {}", self.name(), rounds, t, next, value);
            if value < best_value {
                best_value = value;
                best_point = next.clone();
                count = 0;
            } else {
                count += 1;
            }

            let moved = norm(&subtract_to_copy(&x, &next)?);
            x = next;
            if moved < self.epsilon {
                debug!("{}: converged after {} rounds, t = {}", self.name(), rounds, t);
                return Ok(x);
            }
            t *= self.growth;
        }
    }

    /// Minimizes the total inequality violation from `x0`.
    fn interior_point<O: Objective>(
        &self,
        function: &ConstrainedFunction<O>,
        x0: ArrayView1<f64>,
    ) -> Result<Array1<f64>> {
        debug!(
            "{}: {} is infeasible, searching for an interior point with {}",
            self.name(),
            x0,
            self.minimizer.name()
        );
        let violation = violation_sum(function.inequality_constraints());
        self.minimizer.search(&violation, x0)
    }
}

impl Default for ConstrainedOptimizer<HookeJeeves> {
    fn default() -> Self {
        ConstrainedOptimizer::new(HookeJeeves::default())
    }
}
