//! The iteration shared by the derivative based minimizers.
//!
//! Each step asks a direction rule for a search direction, normalizes it, optionally picks
//! the step length with a [`LineSearch`], and moves. The search stops once the direction is
//! shorter than `epsilon` before normalization. The point with the lowest value is tracked,
//! and after `divergence_limit` consecutive steps without improving on it the search gives up
//! with that point.
use ndarray::{Array1, ArrayView1};

use super::LineSearch;
use crate::error::{Error, Result};
use crate::function::Differentiable;
use crate::linalg::vector::{add_in_place, check_same_dimension, norm, scale_in_place};

#[derive(Debug, Clone)]
pub(crate) struct DescentParameters {
    pub epsilon: f64,
    pub divergence_limit: usize,
    pub line_search: Option<LineSearch>,
}

impl DescentParameters {
    /// Parameters with a line search of precision `line_search_epsilon` when `line_search`
    /// is set.
    pub fn new(
        epsilon: f64,
        divergence_limit: usize,
        line_search: bool,
        line_search_epsilon: f64,
    ) -> Self {
        DescentParameters {
            epsilon,
            divergence_limit,
            line_search: if line_search {
                Some(LineSearch::new(line_search_epsilon))
            } else {
                None
            },
        }
    }
}

/// Runs the descent loop from `x0`.
///
/// `direction` receives the function, the current point and the gradient there.
pub(crate) fn descend<D, F>(
    function: &D,
    x0: ArrayView1<f64>,
    parameters: &DescentParameters,
    name: &'static str,
    direction: F,
) -> Result<Array1<f64>>
where
    D: Differentiable + ?Sized,
    F: Fn(&D, ArrayView1<f64>, Array1<f64>) -> Result<Array1<f64>>,
{
    let mut x = x0.to_owned();
    let mut best_point = x.clone();
    let mut best_value = function.value_at(x.view());
    let mut count = 0;
    let mut iterations = 0;

    loop {
        if count > parameters.divergence_limit {
            warn!(
                "{}: no improvement in {} steps, giving up at {}",
                name, count, best_point
            );
            return Err(Error::DivergenceLimitReached {
                limit: parameters.divergence_limit,
                point: best_point,
            });
        }

        let gradient = function.gradient(x.view());
        check_same_dimension(&x, &gradient)?;
        let mut step = direction(function, x.view(), gradient)?;
        let length = norm(&step);
        if length < parameters.epsilon {
            debug!("{}: converged after {} iterations", name, iterations);
            return Ok(x);
        }
        scale_in_place(&mut step, 1.0 / length);
        if let Some(line_search) = &parameters.line_search {
            let lambda = line_search.step(function, x.view(), step.view())?;
            scale_in_place(&mut step, lambda);
        }
        add_in_place(&mut x, &step)?;
        iterations += 1;

        let value = function.value_at(x.view());
        trace!("{}: iteration {}, f({}) = {}", name, iterations, x, value);
        if value < best_value {
            best_value = value;
            best_point.assign(&x);
            count = 0;
        } else {
            count += 1;
        }
    }
}
