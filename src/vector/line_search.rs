use ndarray::{Array1, ArrayView1};

use crate::error::Result;
use crate::function::Objective;
use crate::scalar::GoldenSection;

/// Chooses a step length along a search direction.
///
/// The step is the `lambda` minimizing `f(x + lambda * direction)`, found with a golden
/// section search that starts at `lambda = 0`.
#[derive(Debug, Clone, PartialEq)]
pub struct LineSearch {
    pub golden_section: GoldenSection,
}

impl LineSearch {
    pub fn new(epsilon: f64) -> Self {
        LineSearch {
            golden_section: GoldenSection {
                epsilon,
                ..GoldenSection::default()
            },
        }
    }

    /// The best step length along `direction` from `x`.
    pub fn step<O>(
        &self,
        function: &O,
        x: ArrayView1<f64>,
        direction: ArrayView1<f64>,
    ) -> Result<f64>
    where
        O: Objective + ?Sized,
    {
        let along = |lambda: f64| function.value_at((&x + &(lambda * &direction)).view());
        self.golden_section.search(&along, 0.0)
    }

    /// `x` moved by the best multiple of `direction`.
    pub fn minimize<O>(
        &self,
        function: &O,
        x: ArrayView1<f64>,
        direction: ArrayView1<f64>,
    ) -> Result<Array1<f64>>
    where
        O: Objective + ?Sized,
    {
        let lambda = self.step(function, x, direction)?;
        Ok(&x + &(lambda * &direction))
    }
}

impl Default for LineSearch {
    fn default() -> Self {
        LineSearch::new(1e-6)
    }
}
