//! The Nelder-Mead downhill simplex method.
//!
//! The simplex starts as `x0` plus one vertex per coordinate, each offset from `x0` by
//! `step` along its axis. Every iteration reflects the worst vertex through the centroid
//! of the others and then, depending on how the reflection ranks, expands it, accepts it,
//! contracts it or shrinks the whole simplex towards its best vertex.
//!
//! # Use case
//!
//! The Nelder-Mead algorithm does not require a gradient or a hessian.
//! As a tradeoff it typically requires a lot of function evaluations to
//! find a minimum. Further, there are few theoretical results on the
//! convergence of Nelder-Mead iterations.
//!
//! # Examples
//!
//! ```
//! use localopt::vector::NelderMeadBuilder;
//! use localopt::Minimizer;
//! use ndarray::{array, ArrayView1};
//!
//! let function =
//!     |x: ArrayView1<f64>| (1.0 - x[0]).powi(2) + 100.0 * (x[1] - x[0].powi(2)).powi(2);
//! let minimizer = NelderMeadBuilder::default()
//!     .epsilon(1e-8)
//!     .build()
//!     .unwrap();
//! let args = array![3.0, -8.3];
//! let res = minimizer.search(&function, args.view());
//! println!("res: {:?}", res);
//! ```
use ndarray::{Array1, ArrayView1};

use super::simplex::{check_not_empty, contraction, expansion, reflection, Simplex};
use crate::error::{Error, Result};
use crate::function::Objective;
use crate::minimizer::Minimizer;

#[derive(Builder, Debug, Clone, PartialEq)]
#[builder(build_fn(validate = "Self::validate"))]
/// A minimizer for a scalar function of one or more variables using the Nelder-Mead algorithm.
pub struct NelderMead {
    /// The search stops once the standard deviation of the vertex values about the
    /// centroid value drops to this.
    #[builder(default = "1e-6")]
    pub epsilon: f64,

    /// Reflection coefficient.
    #[builder(default = "1.0")]
    pub alpha: f64,

    /// Contraction coefficient.
    #[builder(default = "0.5")]
    pub beta: f64,

    /// Expansion coefficient.
    #[builder(default = "2.0")]
    pub gamma: f64,

    /// Shrink coefficient.
    #[builder(default = "0.5")]
    pub sigma: f64,

    /// Edge length of the initial simplex.
    #[builder(default = "1.0")]
    pub step: f64,

    /// Number of consecutive iterations in which the simplex does not improve before
    /// giving up.
    #[builder(default = "100")]
    pub divergence_limit: usize,
}

impl NelderMeadBuilder {
    fn validate(&self) -> std::result::Result<(), String> {
        if let Some(epsilon) = self.epsilon {
            if !(epsilon > 0.0) {
                return Err(format!("epsilon must be positive, got {}", epsilon));
            }
        }
        if let Some(alpha) = self.alpha {
            if !(alpha > 0.0) {
                return Err(format!("alpha must be positive, got {}", alpha));
            }
        }
        if let Some(beta) = self.beta {
            if !(beta > 0.0 && beta < 1.0) {
                return Err(format!("beta must lie in (0, 1), got {}", beta));
            }
        }
        if let Some(gamma) = self.gamma {
            if !(gamma > 1.0) {
                return Err(format!("gamma must be greater than 1, got {}", gamma));
            }
        }
        if let Some(sigma) = self.sigma {
            if !(sigma > 0.0 && sigma < 1.0) {
                return Err(format!("sigma must lie in (0, 1), got {}", sigma));
            }
        }
        if let Some(step) = self.step {
            if step == 0.0 || !step.is_finite() {
                return Err(format!("step must be finite and non-zero, got {}", step));
            }
        }
        Ok(())
    }
}

impl Default for NelderMead {
    fn default() -> Self {
        NelderMead {
            epsilon: 1e-6,
            alpha: 1.0,
            beta: 0.5,
            gamma: 2.0,
            sigma: 0.5,
            step: 1.0,
            divergence_limit: 100,
        }
    }
}

impl NelderMead {
    fn initial_simplex(&self, x0: ArrayView1<f64>) -> Vec<Array1<f64>> {
        let mut points = Vec::with_capacity(x0.len() + 1);
        points.push(x0.to_owned());
        for i in 0..x0.len() {
            let mut vertex = x0.to_owned();
            vertex[i] += self.step;
            points.push(vertex);
        }
        points
    }

    /// One reflect / expand / contract / shrink round for the worst vertex `h`.
    fn transform<O>(
        &self,
        function: &O,
        simplex: &mut Simplex,
        h: usize,
        l: usize,
        centroid: ArrayView1<f64>,
    ) where
        O: Objective + ?Sized,
    {
        let reflected = reflection(centroid, simplex.points[h].view(), self.alpha);
        let f_reflected = function.value_at(reflected.view());

        if f_reflected < simplex.values[l] {
            // try expanding beyond the reflection
            let expanded = expansion(centroid, reflected.view(), self.gamma);
            let f_expanded = function.value_at(expanded.view());
            if f_expanded < simplex.values[l] {
                simplex.replace(h, expanded, f_expanded);
            } else {
                simplex.replace(h, reflected, f_reflected);
            }
        } else if (0..simplex.len())
            .filter(|&j| j != h)
            .all(|j| f_reflected >= simplex.values[j])
        {
            if f_reflected < simplex.values[h] {
                simplex.replace(h, reflected, f_reflected);
            }
            let contracted = contraction(centroid, simplex.points[h].view(), self.beta);
            let f_contracted = function.value_at(contracted.view());
            if f_contracted < simplex.values[h] {
                simplex.replace(h, contracted, f_contracted);
            } else {
                simplex.shrink(function, l, self.sigma);
            }
        } else {
            simplex.replace(h, reflected, f_reflected);
        }
    }
}

impl Minimizer for NelderMead {
    /// Search for the value minimizing `function` given an initial guess
    /// in the form of a point. The algorithm will explore the variable
    /// space without constraints.
    fn search<O: Objective + ?Sized>(
        &self,
        function: &O,
        x0: ArrayView1<f64>,
    ) -> Result<Array1<f64>> {
        check_not_empty(x0)?;
        let mut simplex = Simplex::new(function, self.initial_simplex(x0));
        let mut best_total = f64::INFINITY;
        let mut count = 0;
        let mut iterations = 0;

        loop {
            let (h, l) = simplex.worst_and_best();
            let centroid = simplex.centroid(h);
            let f_centroid = function.value_at(centroid.view());
            if simplex.spread(f_centroid) <= self.epsilon {
                debug!("{}: converged after {} iterations", self.name(), iterations);
                return Ok(simplex.points[l].clone());
            }

            self.transform(function, &mut simplex, h, l, centroid.view());
            iterations += 1;

            let total: f64 = simplex.values.iter().sum();
            trace!(
                "{}: iteration {}, best f = {}",
                self.name(),
                iterations,
                simplex.values[simplex.best()]
            );
            if total < best_total {
                best_total = total;
                count = 0;
            } else {
                count += 1;
                if count > self.divergence_limit {
                    warn!("{}: simplex stopped improving", self.name());
                    return Err(Error::DivergenceLimitReached {
                        limit: self.divergence_limit,
                        point: simplex.points[simplex.best()].clone(),
                    });
                }
            }
        }
    }

    fn name(&self) -> &'static str {
        "nelder-mead"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function::CostFunction;
    use float_cmp::ApproxEq;
    use ndarray::arr1;

    #[test]
    fn rosenbrock() {
        let function =
            |x: ArrayView1<f64>| (1.0 - x[0]).powi(2) + 100.0 * (x[1] - x[0].powi(2)).powi(2);
        let minimizer = NelderMeadBuilder::default().epsilon(1e-10).build().unwrap();
        let x0 = arr1(&[-1.9, 2.0]);
        let res = minimizer.search(&function, x0.view()).unwrap();

        assert!((res[0] - 1.0).abs() < 1e-2);
        assert!((res[1] - 1.0).abs() < 1e-2);
        assert!(function(res.view()) < function(x0.view()));
    }

    #[test]
    fn quadratic_bowl() {
        let f = CostFunction::new(|x: ArrayView1<f64>| {
            (x[0] - 4.0).powi(2) + 4.0 * (x[1] - 2.0).powi(2)
        });
        let minimizer = NelderMead::default();
        let res = minimizer.search(&f, arr1(&[0.0, 0.0]).view()).unwrap();

        assert!(res[0].approx_eq(4.0, (1e-2, 10)));
        assert!(res[1].approx_eq(2.0, (1e-2, 10)));
        assert!(f.evaluations() > 3);
    }

    #[test]
    fn initial_simplex_offsets_each_axis() {
        let minimizer = NelderMeadBuilder::default().step(0.5).build().unwrap();
        let points = minimizer.initial_simplex(arr1(&[1.0, 2.0]).view());
        assert_eq!(
            points,
            vec![arr1(&[1.0, 2.0]), arr1(&[1.5, 2.0]), arr1(&[1.0, 2.5])]
        );
    }

    #[test]
    fn best_value_never_increases() {
        let function =
            |x: ArrayView1<f64>| (1.0 - x[0]).powi(2) + 100.0 * (x[1] - x[0].powi(2)).powi(2);
        let minimizer = NelderMead::default();
        let x0 = arr1(&[-1.9, 2.0]);
        let mut simplex = Simplex::new(&function, minimizer.initial_simplex(x0.view()));
        let start = simplex.values[simplex.best()];
        let mut best = Vec::new();
        for _ in 0..200 {
            let (h, l) = simplex.worst_and_best();
            let centroid = simplex.centroid(h);
            minimizer.transform(&function, &mut simplex, h, l, centroid.view());
            best.push(simplex.values[simplex.best()]);
        }

        assert!(best.windows(2).all(|w| w[1] <= w[0]));
        assert!(best[best.len() - 1] < start);
    }

    #[test]
    fn gives_up_on_an_infinite_plateau() {
        // finite only at the start, so no transformation can lower the simplex
        let function = |x: ArrayView1<f64>| {
            if x[0] == 0.0 && x[1] == 0.0 {
                0.0
            } else {
                f64::INFINITY
            }
        };
        let minimizer = NelderMeadBuilder::default()
            .divergence_limit(0)
            .build()
            .unwrap();
        assert_eq!(
            minimizer.search(&function, arr1(&[0.0, 0.0]).view()),
            Err(Error::DivergenceLimitReached {
                limit: 0,
                point: arr1(&[0.0, 0.0]),
            })
        );
    }

    #[test]
    fn empty_start_is_rejected() {
        let function = |x: ArrayView1<f64>| x.sum();
        assert_eq!(
            NelderMead::default().search(&function, Array1::<f64>::zeros(0).view()),
            Err(Error::DimensionMismatch {
                expected: 1,
                actual: 0
            })
        );
    }

    #[test]
    fn rejects_bad_coefficients() {
        assert!(NelderMeadBuilder::default().beta(1.5).build().is_err());
        assert!(NelderMeadBuilder::default().gamma(0.5).build().is_err());
        assert!(NelderMeadBuilder::default().step(0.0).build().is_err());
    }
}
