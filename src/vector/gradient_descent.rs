use ndarray::{Array1, ArrayView1};

use super::descent::{descend, DescentParameters};
use crate::error::Result;
use crate::function::Differentiable;
use crate::linalg::vector::scale_to_copy;
use crate::minimizer::DifferentiableMinimizer;

/// Steepest descent: every step goes along the negative gradient.
#[derive(Builder, Debug, Clone, PartialEq)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct GradientDescent {
    /// The search stops once the gradient norm drops below this value.
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

impl GradientDescentBuilder {
    fn validate(&self) -> std::result::Result<(), String> {
        validate_epsilons(self.epsilon, self.line_search_epsilon)
    }
}

pub(crate) fn validate_epsilons(
    epsilon: Option<f64>,
    line_search_epsilon: Option<f64>,
) -> std::result::Result<(), String> {
    let epsilons = [
        ("epsilon", epsilon),
        ("line_search_epsilon", line_search_epsilon),
    ];
    for (name, value) in epsilons.iter() {
        if let Some(value) = value {
            if !(*value > 0.0) {
                return Err(format!("{} must be positive, got {}", name, value));
            }
        }
    }
    Ok(())
}

impl Default for GradientDescent {
    fn default() -> Self {
        GradientDescent {
            epsilon: 1e-6,
            divergence_limit: 100,
            line_search: true,
            line_search_epsilon: 1e-9,
        }
    }
}

impl GradientDescent {
    fn parameters(&self) -> DescentParameters {
        DescentParameters::new(
            self.epsilon,
            self.divergence_limit,
            self.line_search,
            self.line_search_epsilon,
        )
    }
}

impl DifferentiableMinimizer for GradientDescent {
    fn search<D: Differentiable + ?Sized>(
        &self,
        function: &D,
        x0: ArrayView1<f64>,
    ) -> Result<Array1<f64>> {
        descend(function, x0, &self.parameters(), self.name(), |_, _, gradient| {
            Ok(scale_to_copy(&gradient, -1.0))
        })
    }

    fn name(&self) -> &'static str {
        "gradient descent"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::function::DifferentiableCostFunction;
    use float_cmp::ApproxEq;
    use ndarray::{arr1, arr2};

    #[test]
    fn quadratic_bowl() {
        let f = DifferentiableCostFunction::new(
            |x: ArrayView1<f64>| (x[0] - 4.0).powi(2) + 4.0 * (x[1] - 2.0).powi(2),
            |x: ArrayView1<f64>| arr1(&[2.0 * (x[0] - 4.0), 8.0 * (x[1] - 2.0)]),
            |_: ArrayView1<f64>| arr2(&[[2.0, 0.0], [0.0, 8.0]]),
        );
        let minimizer = GradientDescentBuilder::default().build().unwrap();
        let res = minimizer.search(&f, arr1(&[0.0, 0.0]).view()).unwrap();

        assert!(res[0].approx_eq(4.0, (1e-6, 10)));
        assert!(res[1].approx_eq(2.0, (1e-6, 10)));
        assert_eq!(f.hessian_evaluations(), 0);
    }

    #[test]
    fn fixed_steps_overshoot_and_diverge() {
        let f = DifferentiableCostFunction::new(
            |x: ArrayView1<f64>| x.dot(&x),
            |x: ArrayView1<f64>| 2.0 * &x,
            |_: ArrayView1<f64>| arr2(&[[2.0, 0.0], [0.0, 2.0]]),
        );
        let minimizer = GradientDescentBuilder::default()
            .line_search(false)
            .divergence_limit(0)
            .build()
            .unwrap();
        match minimizer.search(&f, arr1(&[0.1, 0.1]).view()) {
            Err(Error::DivergenceLimitReached { limit, point }) => {
                assert_eq!(limit, 0);
                assert_eq!(point.len(), 2);
                assert_eq!(point, arr1(&[0.1, 0.1]));
            }
            other => panic!("expected divergence, got {:?}", other),
        }
    }

    #[test]
    fn rejects_bad_configuration() {
        assert!(GradientDescentBuilder::default().epsilon(-1.0).build().is_err());
        assert!(GradientDescentBuilder::default()
            .line_search_epsilon(0.0)
            .build()
            .is_err());
        assert_eq!(
            GradientDescent::default(),
            GradientDescentBuilder::default().build().unwrap()
        );
    }
}
