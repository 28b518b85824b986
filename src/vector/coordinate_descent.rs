//! Cyclic coordinate descent.
//!
//! Every cycle minimizes the function along each axis in turn with a golden section search.
//! Cycles repeat until none of the coordinates moves by more than `epsilon`. No derivatives
//! are needed, but the search can crawl along narrow valleys that are not aligned with the
//! axes.
use ndarray::{Array1, ArrayView1};

use crate::error::{Error, Result};
use crate::function::Objective;
use crate::minimizer::Minimizer;
use crate::scalar::GoldenSection;

#[derive(Builder, Debug, Clone, PartialEq)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct CoordinateDescent {
    /// Largest coordinate move in a cycle that still counts as converged.
    #[builder(default = "1e-6")]
    pub epsilon: f64,

    /// Initial bracketing step of the per-axis searches.
    #[builder(default = "1.0")]
    pub h: f64,

    /// Number of consecutive cycles without improvement before giving up.
    #[builder(default = "100")]
    pub divergence_limit: usize,
}

impl CoordinateDescentBuilder {
    fn validate(&self) -> std::result::Result<(), String> {
        match (self.epsilon, self.h) {
            (Some(e), _) if !(e > 0.0) => Err(format!("epsilon must be positive, got {}", e)),
            (_, Some(h)) if !(h > 0.0) => Err(format!("h must be positive, got {}", h)),
            _ => Ok(()),
        }
    }
}

impl Default for CoordinateDescent {
    fn default() -> Self {
        CoordinateDescent {
            epsilon: 1e-6,
            h: 1.0,
            divergence_limit: 100,
        }
    }
}

impl Minimizer for CoordinateDescent {
    fn search<O: Objective + ?Sized>(
        &self,
        function: &O,
        x0: ArrayView1<f64>,
    ) -> Result<Array1<f64>> {
        let golden_section = GoldenSection {
            epsilon: self.epsilon,
            h: self.h,
        };
        let mut x = x0.to_owned();
        let mut best_value = function.value_at(x.view());
        let mut best_point = x.clone();
        let mut count = 0;
        let mut cycles = 0;

        loop {
            let mut largest_move: f64 = 0.0;
            for i in 0..x.len() {
                let along_axis = |offset: f64| {
                    let mut moved = x.clone();
                    moved[i] += offset;
                    function.value_at(moved.view())
                };
                let offset = golden_section.search(&along_axis, 0.0)?;
                x[i] += offset;
                largest_move = largest_move.max(offset.abs());
            }
            cycles += 1;

            let value = function.value_at(x.view());
            trace!("{}: cycle {}, f({}) = {}", self.name(), cycles, x, value);
            if largest_move <= self.epsilon {
                debug!("{}: converged after {} cycles", self.name(), cycles);
                return Ok(x);
            }

            if value < best_value {
                best_value = value;
                best_point = x.clone();
                count = 0;
            } else {
                count += 1;
                if count > self.divergence_limit {
                    warn!("{}: no improvement in {} cycles", self.name(), count);
                    return Err(Error::DivergenceLimitReached {
                        limit: self.divergence_limit,
                        point: best_point,
                    });
                }
            }
        }
    }

    fn name(&self) -> &'static str {
        "coordinate descent"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function::CostFunction;
    use float_cmp::ApproxEq;
    use ndarray::arr1;

    #[test]
    fn separable_function() {
        let f = |x: ArrayView1<f64>| (x[0] - 4.0).powi(2) + 4.0 * (x[1] - 2.0).powi(2);
        let minimizer = CoordinateDescentBuilder::default().build().unwrap();
        let res = minimizer.search(&f, arr1(&[0.0, 0.0]).view()).unwrap();

        assert!(res[0].approx_eq(4.0, (1e-6, 10)));
        assert!(res[1].approx_eq(2.0, (1e-6, 10)));
    }

    #[test]
    fn coupled_function() {
        let f = CostFunction::new(|x: ArrayView1<f64>| {
            (x[0] - 1.0).powi(2) + (x[1] + 2.0).powi(2) + 0.5 * x[0] * x[1]
        });
        let minimizer = CoordinateDescent::default();
        let res = minimizer.search(&f, arr1(&[5.0, 5.0]).view()).unwrap();

        // 2(x0 - 1) + x1 / 2 = 0 and 2(x1 + 2) + x0 / 2 = 0
        assert!(res[0].approx_eq(1.6, (1e-5, 10)));
        assert!(res[1].approx_eq(-2.4, (1e-5, 10)));
        assert!(f.evaluations() > 0);
    }

    #[test]
    fn gives_up_on_a_flat_function() {
        // every axis search drifts to the end of its bracket without lowering the value
        let f = |_: ArrayView1<f64>| 1.0;
        let minimizer = CoordinateDescentBuilder::default()
            .divergence_limit(0)
            .build()
            .unwrap();
        assert_eq!(
            minimizer.search(&f, arr1(&[0.0, 0.0]).view()),
            Err(Error::DivergenceLimitReached {
                limit: 0,
                point: arr1(&[0.0, 0.0]),
            })
        );
    }
}
