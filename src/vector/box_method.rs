//! Box's complex method for problems with explicit and implicit constraints.
//!
//! The complex holds `2n` vertices: the starting point plus random points drawn uniformly
//! inside the explicit bounds. A drawn point that violates an implicit constraint is moved
//! halfway towards the centroid of the points accepted so far, repeatedly, until it
//! complies. Every iteration over-reflects the worst vertex through the centroid of the
//! rest, clamps the result to the explicit bounds, repairs it against the implicit
//! constraints the same way, and pulls it halfway back to the centroid when it is still
//! worse than the second worst vertex.
//!
//! Sampling draws from an injected random generator, see [`BoxMethod::search_with_rng`].
use ndarray::{Array1, ArrayView1};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::simplex::{check_not_empty, reflection, Simplex};
use crate::constraints::{test_all, test_explicit, ExplicitConstraint, ImplicitConstraint};
use crate::error::{Error, Result};
use crate::function::Objective;
use crate::minimizer::Minimizer;

#[derive(Builder, Debug, Clone)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct BoxMethod {
    /// Bounds on each coordinate, one per dimension of the starting point.
    pub explicit: Vec<ExplicitConstraint>,

    /// Constraints on the point as a whole.
    #[builder(default)]
    pub implicit: Vec<ImplicitConstraint>,

    /// The search stops once the standard deviation of the vertex values about the
    /// centroid value drops to this.
    #[builder(default = "1e-6")]
    pub epsilon: f64,

    /// Reflection coefficient. Values above one keep the complex from collapsing.
    #[builder(default = "1.3")]
    pub alpha: f64,

    /// Number of consecutive iterations without a new best vertex before giving up. Also
    /// bounds the number of halvings spent repairing a single point.
    #[builder(default = "200")]
    pub divergence_limit: usize,

    /// Seed of the random generator used by [`Minimizer::search`]. Drawn from the
    /// operating system when unset.
    #[builder(default, setter(strip_option))]
    pub seed: Option<u64>,
}

impl BoxMethodBuilder {
    fn validate(&self) -> std::result::Result<(), String> {
        match (self.epsilon, self.alpha) {
            (Some(e), _) if !(e > 0.0) => Err(format!("epsilon must be positive, got {}", e)),
            (_, Some(a)) if !(a > 0.0) => Err(format!("alpha must be positive, got {}", a)),
            _ => Ok(()),
        }
    }
}

fn shift(point: ArrayView1<f64>, centroid: ArrayView1<f64>) -> Array1<f64> {
    0.5 * &(&point + &centroid)
}

impl BoxMethod {
    pub fn new(explicit: Vec<ExplicitConstraint>, implicit: Vec<ImplicitConstraint>) -> Self {
        BoxMethod {
            explicit,
            implicit,
            epsilon: 1e-6,
            alpha: 1.3,
            divergence_limit: 200,
            seed: None,
        }
    }

    /// Runs the search drawing the initial complex from `rng`.
    pub fn search_with_rng<O, R>(
        &self,
        function: &O,
        x0: ArrayView1<f64>,
        rng: &mut R,
    ) -> Result<Array1<f64>>
    where
        O: Objective + ?Sized,
        R: Rng + ?Sized,
    {
        self.validate(x0)?;
        let mut simplex = Simplex::new(function, self.initial_simplex(x0, rng)?);
        let mut best_value = simplex.values[simplex.best()];
        let mut count = 0;
        let mut iterations = 0;

        loop {
            if count > self.divergence_limit {
                let best = simplex.points[simplex.best()].clone();
                warn!(
                    "{}: no improvement in {} iterations, giving up at {}",
                    self.name(),
                    count,
                    best
                );
                return Err(Error::DivergenceLimitReached {
                    limit: self.divergence_limit,
                    point: best,
                });
            }

            let (h, h2) = simplex.worst_two();
            let centroid = simplex.centroid(h);
            if simplex.spread(function.value_at(centroid.view())) <= self.epsilon {
                debug!("{}: converged after {} iterations", self.name(), iterations);
                return Ok(simplex.points[simplex.best()].clone());
            }

            let mut reflected = reflection(centroid.view(), simplex.points[h].view(), self.alpha);
            self.clamp(&mut reflected);
            let mut reflected = self.repair(reflected, centroid.view())?;
            if function.value_at(reflected.view()) > simplex.values[h2] {
                reflected = shift(reflected.view(), centroid.view());
            }
            let value = function.value_at(reflected.view());
            simplex.replace(h, reflected, value);
            iterations += 1;

            let current = simplex.values[simplex.best()];
            trace!("{}: iteration {}, best f = {}", self.name(), iterations, current);
            if current < best_value {
                best_value = current;
                count = 0;
            } else {
                count += 1;
            }
        }
    }

    fn validate(&self, x0: ArrayView1<f64>) -> Result<()> {
        check_not_empty(x0)?;
        if !test_explicit(x0, &self.explicit)? {
            return Err(Error::ExplicitConstraintsNotMet);
        }
        if !test_all(x0, &self.implicit) {
            return Err(Error::ImplicitConstraintsNotMet);
        }
        Ok(())
    }

    fn initial_simplex<R: Rng + ?Sized>(
        &self,
        x0: ArrayView1<f64>,
        rng: &mut R,
    ) -> Result<Vec<Array1<f64>>> {
        let size = 2 * x0.len();
        let mut points = Vec::with_capacity(size);
        points.push(x0.to_owned());
        let mut centroid = x0.to_owned();
        for i in 1..size {
            let candidate = self.repair(self.sample(rng)?, centroid.view())?;
            centroid += &((&candidate - &centroid) / (i + 1) as f64);
            points.push(candidate);
        }
        Ok(points)
    }

    /// A point drawn uniformly from the explicit bounds.
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Array1<f64>> {
        self.explicit
            .iter()
            .enumerate()
            .map(|(index, c)| {
                if !c.is_bounded() {
                    return Err(Error::UnboundedConstraint { index });
                }
                Ok(c.lower + rng.gen::<f64>() * (c.upper - c.lower))
            })
            .collect()
    }

    fn clamp(&self, point: &mut Array1<f64>) {
        for (x, c) in point.iter_mut().zip(&self.explicit) {
            *x = c.clamp(*x);
        }
    }

    /// Halves the distance to `centroid` until every implicit constraint holds.
    fn repair(&self, mut point: Array1<f64>, centroid: ArrayView1<f64>) -> Result<Array1<f64>> {
        let mut count = 0;
        while !test_all(point.view(), &self.implicit) {
            if count > self.divergence_limit {
                warn!("{}: could not repair {}", self.name(), point);
                return Err(Error::DivergenceLimitReached {
                    limit: self.divergence_limit,
                    point,
                });
            }
            point = shift(point.view(), centroid);
            count += 1;
        }
        Ok(point)
    }
}

impl Minimizer for BoxMethod {
    fn search<O: Objective + ?Sized>(
        &self,
        function: &O,
        x0: ArrayView1<f64>,
    ) -> Result<Array1<f64>> {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.search_with_rng(function, x0, &mut rng)
    }

    fn name(&self) -> &'static str {
        "box method"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::{explicit, inequality};
    use ndarray::arr1;

    fn constraints() -> Vec<ImplicitConstraint> {
        vec![
            inequality(|x| x[1] - x[0]).into(),
            inequality(|x| 2.0 - x[0]).into(),
        ]
    }

    fn minimizer() -> BoxMethod {
        BoxMethodBuilder::default()
            .explicit(vec![explicit(-10.0, 10.0).unwrap(); 2])
            .implicit(constraints())
            .seed(42)
            .build()
            .unwrap()
    }

    fn feasible(x: &Array1<f64>) -> bool {
        x[1] - x[0] >= -1e-9 && 2.0 - x[0] >= -1e-9 && x.iter().all(|v| v.abs() <= 10.0)
    }

    #[test]
    fn interior_minimum() {
        let f = |x: ArrayView1<f64>| (x[0] - 1.0).powi(2) + (x[1] - 3.0).powi(2);
        let res = minimizer().search(&f, arr1(&[0.1, 0.3]).view()).unwrap();

        assert!(feasible(&res));
        assert!((res[0] - 1.0).abs() < 1e-2);
        assert!((res[1] - 3.0).abs() < 1e-2);
    }

    #[test]
    fn minimum_on_the_boundary() {
        // unconstrained minimum (3, 0) projects onto x1 = x0 at (1.5, 1.5)
        let f = |x: ArrayView1<f64>| (x[0] - 3.0).powi(2) + x[1].powi(2);
        let res = minimizer().search(&f, arr1(&[0.1, 0.3]).view()).unwrap();

        assert!(feasible(&res));
        assert!((res[0] - 1.5).abs() < 1e-2);
        assert!((res[1] - 1.5).abs() < 1e-2);
    }

    #[test]
    fn converges_for_other_seeds() {
        let f = |x: ArrayView1<f64>| (x[0] - 1.0).powi(2) + (x[1] - 3.0).powi(2);
        for seed in 0..10 {
            let mut rng = StdRng::seed_from_u64(seed);
            let res = minimizer()
                .search_with_rng(&f, arr1(&[0.1, 0.3]).view(), &mut rng)
                .unwrap();
            assert!(feasible(&res));
        }
    }

    #[test]
    fn gives_up_with_the_best_vertex() {
        // only the starting point scores, every other vertex is stuck at 1
        let f = |x: ArrayView1<f64>| if x[0] == 0.5 && x[1] == 0.5 { 0.0 } else { 1.0 };
        let minimizer = BoxMethodBuilder::default()
            .explicit(vec![explicit(-10.0, 10.0).unwrap(); 2])
            .divergence_limit(0)
            .seed(7)
            .build()
            .unwrap();
        assert_eq!(
            minimizer.search(&f, arr1(&[0.5, 0.5]).view()),
            Err(Error::DivergenceLimitReached {
                limit: 0,
                point: arr1(&[0.5, 0.5]),
            })
        );
    }

    #[test]
    fn unrepairable_samples_give_up() {
        // feasible only at the origin, halving towards it never gets there
        let origin_only: Vec<ImplicitConstraint> =
            vec![inequality(|x| -(x[0].powi(2) + x[1].powi(2))).into()];
        let minimizer = BoxMethodBuilder::default()
            .explicit(vec![explicit(-10.0, 10.0).unwrap(); 2])
            .implicit(origin_only)
            .divergence_limit(10)
            .seed(3)
            .build()
            .unwrap();
        let f = |x: ArrayView1<f64>| x.sum();
        match minimizer.search(&f, arr1(&[0.0, 0.0]).view()) {
            Err(Error::DivergenceLimitReached { limit, point }) => {
                assert_eq!(limit, 10);
                // eleven halvings towards the origin
                assert!(point.iter().all(|v| v.abs() <= 10.0 / 2048.0));
                assert!(point.iter().any(|&v| v != 0.0));
            }
            other => panic!("expected divergence, got {:?}", other),
        }
    }

    #[test]
    fn seeded_runs_repeat() {
        let f = |x: ArrayView1<f64>| (x[0] - 1.0).powi(2) + (x[1] - 3.0).powi(2);
        let x0 = arr1(&[0.1, 0.3]);
        let first = minimizer().search(&f, x0.view());
        let second = minimizer().search_with_rng(&f, x0.view(), &mut StdRng::seed_from_u64(42));
        assert_eq!(first, second);
    }

    #[test]
    fn infeasible_starts_are_rejected() {
        let f = |x: ArrayView1<f64>| x.sum();
        let minimizer = minimizer();
        assert_eq!(
            minimizer.search(&f, arr1(&[11.0, 12.0]).view()),
            Err(Error::ExplicitConstraintsNotMet)
        );
        assert_eq!(
            minimizer.search(&f, arr1(&[1.0, 0.0]).view()),
            Err(Error::ImplicitConstraintsNotMet)
        );
        assert_eq!(
            minimizer.search(&f, arr1(&[1.0]).view()),
            Err(Error::DimensionMismatch {
                expected: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn empty_start_is_rejected() {
        let minimizer = BoxMethod::new(vec![], vec![]);
        let f = |x: ArrayView1<f64>| x.sum();
        assert_eq!(
            minimizer.search(&f, Array1::<f64>::zeros(0).view()),
            Err(Error::DimensionMismatch {
                expected: 1,
                actual: 0
            })
        );
    }

    #[test]
    fn unbounded_coordinates_cannot_be_sampled() {
        let minimizer = BoxMethod::new(
            vec![explicit(-1.0, 1.0).unwrap(), ExplicitConstraint::non_negative()],
            vec![],
        );
        let f = |x: ArrayView1<f64>| x.sum();
        assert_eq!(
            minimizer.search_with_rng(&f, arr1(&[0.0, 0.0]).view(), &mut StdRng::seed_from_u64(1)),
            Err(Error::UnboundedConstraint { index: 1 })
        );
    }
}
