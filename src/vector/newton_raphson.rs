use ndarray::{Array1, ArrayView1};

use super::descent::{descend, DescentParameters};
use super::gradient_descent::validate_epsilons;
use crate::error::Result;
use crate::function::Differentiable;
use crate::linalg::lup::{LinearSolver, LupDecomposition};
use crate::linalg::vector::scale_to_copy;
use crate::minimizer::DifferentiableMinimizer;

/// Newton's method: every step solves `H(x) * d = -g(x)` for the direction `d`.
///
/// Each iteration decomposes the Hessian, so a Hessian that is singular at some visited
/// point ends the search with [`Error::SingularMatrix`](crate::Error::SingularMatrix).
#[derive(Builder, Debug, Clone, PartialEq)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct NewtonRaphson {
    /// The search stops once the Newton step is shorter than this value.
    #[builder(default = "1e-6")]
    pub epsilon: f64,

    /// Number of consecutive steps without improvement before giving up.
    #[builder(default = "100")]
    pub divergence_limit: usize,

    /// Choose step lengths with a line search. Without it every step has unit length.
    #[builder(default = "true")]
    pub line_search: bool,

    /// Precision of the step length chosen by the line search.
    #[builder(default = "1e-9")]
    pub line_search_epsilon: f64,
}

impl NewtonRaphsonBuilder {
    fn validate(&self) -> std::result::Result<(), String> {
        validate_epsilons(self.epsilon, self.line_search_epsilon)
    }
}

impl Default for NewtonRaphson {
    fn default() -> Self {
        NewtonRaphson {
            epsilon: 1e-6,
            divergence_limit: 100,
            line_search: true,
            line_search_epsilon: 1e-9,
        }
    }
}

impl DifferentiableMinimizer for NewtonRaphson {
    fn search<D: Differentiable + ?Sized>(
        &self,
        function: &D,
        x0: ArrayView1<f64>,
    ) -> Result<Array1<f64>> {
        let parameters = DescentParameters::new(
            self.epsilon,
            self.divergence_limit,
            self.line_search,
            self.line_search_epsilon,
        );
        descend(function, x0, &parameters, self.name(), |function, x, gradient| {
            let hessian = function.hessian(x);
            let lup = LupDecomposition::new(&hessian)?;
            lup.solver().solve(&scale_to_copy(&gradient, -1.0))
        })
    }

    fn name(&self) -> &'static str {
        "newton-raphson"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::function::DifferentiableCostFunction;
    use crate::vector::GradientDescent;
    use float_cmp::ApproxEq;
    use ndarray::{arr1, arr2, Array2};

    fn bowl() -> DifferentiableCostFunction<
        impl Fn(ArrayView1<f64>) -> f64,
        impl Fn(ArrayView1<f64>) -> Array1<f64>,
        impl Fn(ArrayView1<f64>) -> Array2<f64>,
    > {
        DifferentiableCostFunction::new(
            |x: ArrayView1<f64>| (x[0] - 4.0).powi(2) + 4.0 * (x[1] - 2.0).powi(2),
            |x: ArrayView1<f64>| arr1(&[2.0 * (x[0] - 4.0), 8.0 * (x[1] - 2.0)]),
            |_: ArrayView1<f64>| arr2(&[[2.0, 0.0], [0.0, 8.0]]),
        )
    }

    #[test]
    fn quadratic_bowl() {
        let f = bowl();
        let minimizer = NewtonRaphsonBuilder::default().build().unwrap();
        let res = minimizer.search(&f, arr1(&[0.0, 0.0]).view()).unwrap();

        assert!(res[0].approx_eq(4.0, (1e-6, 10)));
        assert!(res[1].approx_eq(2.0, (1e-6, 10)));
        assert_eq!(f.gradient_evaluations(), f.hessian_evaluations());
    }

    #[test]
    fn fewer_iterations_than_gradient_descent() {
        let newton = bowl();
        NewtonRaphson::default()
            .search(&newton, arr1(&[0.0, 0.0]).view())
            .unwrap();
        let steepest = bowl();
        GradientDescent::default()
            .search(&steepest, arr1(&[0.0, 0.0]).view())
            .unwrap();

        assert!(newton.gradient_evaluations() < steepest.gradient_evaluations());
    }

    #[test]
    fn singular_hessian() {
        let f = DifferentiableCostFunction::new(
            |x: ArrayView1<f64>| x[0].powi(4) + x[1].powi(4),
            |x: ArrayView1<f64>| arr1(&[4.0 * x[0].powi(3), 4.0 * x[1].powi(3)]),
            |x: ArrayView1<f64>| arr2(&[[12.0 * x[0].powi(2), 0.0], [0.0, 12.0 * x[1].powi(2)]]),
        );
        let res = NewtonRaphson::default().search(&f, arr1(&[1.0, 0.0]).view());
        assert_eq!(res.unwrap_err(), Error::SingularMatrix);
    }
}
