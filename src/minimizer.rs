//! This module provides the base framework for the multivariate minimizers in this crate.
use ndarray::{Array1, ArrayView1};

use crate::error::Result;
use crate::function::{Differentiable, Objective};

/// A general minimizer trait.
pub trait Minimizer {
    /// Searches for a local minimum of `function`, starting from `x0`.
    ///
    /// Returns the point found. Searches that give up return
    /// [`Error::DivergenceLimitReached`](crate::Error::DivergenceLimitReached) carrying
    /// their best point so far.
    fn search<O: Objective + ?Sized>(
        &self,
        function: &O,
        x0: ArrayView1<f64>,
    ) -> Result<Array1<f64>>;

    /// Short algorithm name, used in log output.
    fn name(&self) -> &'static str;
}

/// A minimizer that needs the gradient (and possibly the Hessian) of its objective.
pub trait DifferentiableMinimizer {
    fn search<D: Differentiable + ?Sized>(
        &self,
        function: &D,
        x0: ArrayView1<f64>,
    ) -> Result<Array1<f64>>;

    fn name(&self) -> &'static str;
}
