//! Objectives and the wrappers that count how often they are evaluated.
//!
//! Any `Fn(ArrayView1<f64>) -> f64` is an [`Objective`] and any `Fn(f64) -> f64` is a
//! [`ScalarObjective`]. Wrap them in a [`CostFunction`] or [`ScalarCostFunction`] to track the
//! number of evaluations a search spends. Counters live in the wrapper and are reset by the
//! caller between runs.
use std::cell::Cell;

use ndarray::{Array1, Array2, ArrayView1};

use crate::constraints::{Constraint, EqualityConstraint, InequalityConstraint};

/// A scalar function of several variables.
pub trait Objective {
    fn value_at(&self, x: ArrayView1<f64>) -> f64;
}

impl<F> Objective for F
where
    F: Fn(ArrayView1<f64>) -> f64,
{
    #[inline]
    fn value_at(&self, x: ArrayView1<f64>) -> f64 {
        self(x)
    }
}

/// A scalar function of one variable.
pub trait ScalarObjective {
    fn value_at(&self, x: f64) -> f64;
}

impl<F> ScalarObjective for F
where
    F: Fn(f64) -> f64,
{
    #[inline]
    fn value_at(&self, x: f64) -> f64 {
        self(x)
    }
}

/// An objective that also supplies its first and second derivatives.
pub trait Differentiable: Objective {
    fn gradient(&self, x: ArrayView1<f64>) -> Array1<f64>;

    fn hessian(&self, x: ArrayView1<f64>) -> Array2<f64>;
}

fn bump(counter: &Cell<usize>) {
    counter.set(counter.get() + 1);
}

/// Counts evaluations of a multivariate function.
#[derive(Debug)]
pub struct CostFunction<F> {
    function: F,
    evaluations: Cell<usize>,
}

impl<F> CostFunction<F>
where
    F: Fn(ArrayView1<f64>) -> f64,
{
    pub fn new(function: F) -> Self {
        CostFunction {
            function,
            evaluations: Cell::new(0),
        }
    }

    pub fn evaluations(&self) -> usize {
        self.evaluations.get()
    }

    pub fn reset(&self) {
        self.evaluations.set(0);
    }
}

impl<F> Objective for CostFunction<F>
where
    F: Fn(ArrayView1<f64>) -> f64,
{
    fn value_at(&self, x: ArrayView1<f64>) -> f64 {
        bump(&self.evaluations);
        (self.function)(x)
    }
}

/// Counts evaluations of a univariate function.
#[derive(Debug)]
pub struct ScalarCostFunction<F> {
    function: F,
    evaluations: Cell<usize>,
}

impl<F> ScalarCostFunction<F>
where
    F: Fn(f64) -> f64,
{
    pub fn new(function: F) -> Self {
        ScalarCostFunction {
            function,
            evaluations: Cell::new(0),
        }
    }

    pub fn evaluations(&self) -> usize {
        self.evaluations.get()
    }

    pub fn reset(&self) {
        self.evaluations.set(0);
    }
}

impl<F> ScalarObjective for ScalarCostFunction<F>
where
    F: Fn(f64) -> f64,
{
    fn value_at(&self, x: f64) -> f64 {
        bump(&self.evaluations);
        (self.function)(x)
    }
}

/// Owns a function together with its gradient and Hessian and counts calls to each.
#[derive(Debug)]
pub struct DifferentiableCostFunction<F, G, H> {
    function: F,
    gradient: G,
    hessian: H,
    evaluations: Cell<usize>,
    gradient_evaluations: Cell<usize>,
    hessian_evaluations: Cell<usize>,
}

impl<F, G, H> DifferentiableCostFunction<F, G, H>
where
    F: Fn(ArrayView1<f64>) -> f64,
    G: Fn(ArrayView1<f64>) -> Array1<f64>,
    H: Fn(ArrayView1<f64>) -> Array2<f64>,
{
    pub fn new(function: F, gradient: G, hessian: H) -> Self {
        DifferentiableCostFunction {
            function,
            gradient,
            hessian,
            evaluations: Cell::new(0),
            gradient_evaluations: Cell::new(0),
            hessian_evaluations: Cell::new(0),
        }
    }

    pub fn evaluations(&self) -> usize {
        self.evaluations.get()
    }

    pub fn gradient_evaluations(&self) -> usize {
        self.gradient_evaluations.get()
    }

    pub fn hessian_evaluations(&self) -> usize {
        self.hessian_evaluations.get()
    }

    /// Zeroes all three counters.
    pub fn reset(&self) {
        self.evaluations.set(0);
        self.gradient_evaluations.set(0);
        self.hessian_evaluations.set(0);
    }
}

impl<F, G, H> Objective for DifferentiableCostFunction<F, G, H>
where
    F: Fn(ArrayView1<f64>) -> f64,
    G: Fn(ArrayView1<f64>) -> Array1<f64>,
    H: Fn(ArrayView1<f64>) -> Array2<f64>,
{
    fn value_at(&self, x: ArrayView1<f64>) -> f64 {
        bump(&self.evaluations);
        (self.function)(x)
    }
}

impl<F, G, H> Differentiable for DifferentiableCostFunction<F, G, H>
where
    F: Fn(ArrayView1<f64>) -> f64,
    G: Fn(ArrayView1<f64>) -> Array1<f64>,
    H: Fn(ArrayView1<f64>) -> Array2<f64>,
{
    fn gradient(&self, x: ArrayView1<f64>) -> Array1<f64> {
        bump(&self.gradient_evaluations);
        (self.gradient)(x)
    }

    fn hessian(&self, x: ArrayView1<f64>) -> Array2<f64> {
        bump(&self.hessian_evaluations);
        (self.hessian)(x)
    }
}

/// An objective turned into a barrier/penalty function of its constraints.
///
/// With coefficient `t` the value at `x` is
///
/// ```text
/// f(x) - (1/t) * sum(ln g_i(x)) + t * sum(h_j(x)^2)
/// ```
///
/// for inequality constraints `g_i(x) >= 0` and equality constraints `h_j(x) = 0`. Points on
/// or outside an inequality boundary evaluate to positive infinity, so a search that starts
/// inside never leaves.
#[derive(Debug)]
pub struct ConstrainedFunction<O> {
    inner: O,
    coefficient: f64,
    equality: Vec<EqualityConstraint>,
    inequality: Vec<InequalityConstraint>,
}

impl<O: Objective> ConstrainedFunction<O> {
    pub fn new(
        inner: O,
        coefficient: f64,
        equality: Vec<EqualityConstraint>,
        inequality: Vec<InequalityConstraint>,
    ) -> Self {
        ConstrainedFunction {
            inner,
            coefficient,
            equality,
            inequality,
        }
    }

    pub fn inner(&self) -> &O {
        &self.inner
    }

    pub fn coefficient(&self) -> f64 {
        self.coefficient
    }

    pub fn set_coefficient(&mut self, coefficient: f64) {
        self.coefficient = coefficient;
    }

    pub fn equality_constraints(&self) -> &[EqualityConstraint] {
        &self.equality
    }

    pub fn inequality_constraints(&self) -> &[InequalityConstraint] {
        &self.inequality
    }

    /// `true` if `x` satisfies every inequality and equality constraint.
    pub fn is_feasible(&self, x: ArrayView1<f64>) -> bool {
        self.inequality.iter().all(|c| c.test(x)) && self.equality.iter().all(|c| c.test(x))
    }
}

impl<O: Objective> Objective for ConstrainedFunction<O> {
    fn value_at(&self, x: ArrayView1<f64>) -> f64 {
        let mut barrier = 0.0;
        for constraint in &self.inequality {
            let g = constraint.value_at(x);
            if g <= 0.0 {
                return f64::INFINITY;
            }
            barrier += g.ln();
        }
        let penalty: f64 = self
            .equality
            .iter()
            .map(|c| c.value_at(x).powi(2))
            .sum();
        self.inner.value_at(x) - barrier / self.coefficient + self.coefficient * penalty
    }
}
