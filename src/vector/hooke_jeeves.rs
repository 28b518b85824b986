//! Hooke-Jeeves pattern search.
//!
//! The search alternates two kinds of moves. An exploratory move probes every coordinate
//! of a point by `+dx` and `-dx` and keeps whatever lowers the function. If exploring from
//! the pattern point beats the current base, the base moves there and the next pattern
//! point is extrapolated along the same direction (`2 * new - old`). Otherwise `dx` is
//! halved and the pattern restarts at the base. The search ends when `dx < epsilon`.
//!
//! Only function values are compared, so the function need not be smooth or even finite
//! everywhere.
use ndarray::{Array1, ArrayView1};

use crate::error::Result;
use crate::function::Objective;
use crate::minimizer::Minimizer;

#[derive(Builder, Debug, Clone, PartialEq)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct HookeJeeves {
    /// Initial exploration step.
    #[builder(default = "0.5")]
    pub delta: f64,

    /// The search stops once the exploration step is smaller than this value.
    #[builder(default = "1e-6")]
    pub epsilon: f64,
}

impl HookeJeevesBuilder {
    fn validate(&self) -> std::result::Result<(), String> {
        match (self.delta, self.epsilon) {
            (Some(d), _) if !(d > 0.0) => Err(format!("delta must be positive, got {}", d)),
            (_, Some(e)) if !(e > 0.0) => Err(format!("epsilon must be positive, got {}", e)),
            _ => Ok(()),
        }
    }
}

impl Default for HookeJeeves {
    fn default() -> Self {
        HookeJeeves {
            delta: 0.5,
            epsilon: 1e-6,
        }
    }
}

impl HookeJeeves {
    /// Probes each coordinate of `x` by `+dx`, then `-dx`, keeping a probe only when it is a
    /// strict improvement. Returns the explored point and its value.
    fn explore<O>(&self, function: &O, mut x: Array1<f64>, dx: f64) -> (Array1<f64>, f64)
    where
        O: Objective + ?Sized,
    {
        let mut value = function.value_at(x.view());
        for i in 0..x.len() {
            let original = x[i];
            x[i] = original + dx;
            let forward = function.value_at(x.view());
            if forward < value {
                value = forward;
                continue;
            }
            x[i] = original - dx;
            let backward = function.value_at(x.view());
            if backward < value {
                value = backward;
                continue;
            }
            x[i] = original;
        }
        (x, value)
    }
}

impl Minimizer for HookeJeeves {
    fn search<O: Objective + ?Sized>(
        &self,
        function: &O,
        x0: ArrayView1<f64>,
    ) -> Result<Array1<f64>> {
        let mut base = x0.to_owned();
        let mut base_value = function.value_at(base.view());
        let mut pattern = base.clone();
        let mut dx = self.delta;
        let mut iterations = 0;

        while dx >= self.epsilon {
            iterations += 1;
            let (explored, value) = self.explore(function, pattern, dx);
            if value < base_value {
                pattern = 2.0 * &explored - &base;
                base = explored;
                base_value = value;
            } else {
                dx /= 2.0;
                pattern = base.clone();
            }
            trace!(
                "{}: iteration {}, dx = {}, f({}) = {}",
                self.name(),
                iterations,
                dx,
                base,
                base_value
            );
        }
        debug!("{}: converged after {} iterations", self.name(), iterations);
        Ok(base)
    }

    fn name(&self) -> &'static str {
        "hooke-jeeves"
    }
}
