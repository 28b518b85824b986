//! Feasibility tests for the constrained searches.
//!
//! Explicit constraints bound a single coordinate. Implicit constraints wrap a scalar
//! function of the whole point and compare its value against zero: equality constraints
//! want `f(x) == 0`, inequality constraints want `f(x) >= 0`.
use std::fmt;
use std::rc::Rc;

use ndarray::ArrayView1;

use crate::error::{Error, Result};
use crate::utils::Interval;

/// A closed bound `[lower, upper]` on one coordinate. Either side may be infinite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExplicitConstraint {
    pub lower: f64,
    pub upper: f64,
}

impl ExplicitConstraint {
    /// Fails with [`Error::InvalidInterval`] when `lower > upper`.
    pub fn new(lower: f64, upper: f64) -> Result<Self> {
        let interval = Interval::new(lower, upper)?;
        Ok(ExplicitConstraint {
            lower: interval.start(),
            upper: interval.end(),
        })
    }

    /// The whole real line.
    pub fn any() -> Self {
        ExplicitConstraint {
            lower: f64::NEG_INFINITY,
            upper: f64::INFINITY,
        }
    }

    pub fn non_negative() -> Self {
        ExplicitConstraint {
            lower: 0.0,
            upper: f64::INFINITY,
        }
    }

    pub fn non_positive() -> Self {
        ExplicitConstraint {
            lower: f64::NEG_INFINITY,
            upper: 0.0,
        }
    }

    pub fn lowerbound(&self) -> f64 {
        self.lower
    }

    pub fn upperbound(&self) -> f64 {
        self.upper
    }

    pub fn is_bounded(&self) -> bool {
        self.lower.is_finite() && self.upper.is_finite()
    }

    /// Inclusive range membership.
    pub fn test(&self, x: f64) -> bool {
        self.lower <= x && x <= self.upper
    }

    /// The nearest value inside the bound.
    pub fn clamp(&self, x: f64) -> f64 {
        if x < self.lower {
            self.lower
        } else if x > self.upper {
            self.upper
        } else {
            x
        }
    }
}

impl Default for ExplicitConstraint {
    fn default() -> Self {
        ExplicitConstraint::any()
    }
}

/// A predicate over points, composable without being evaluated.
pub trait Constraint {
    fn test(&self, x: ArrayView1<f64>) -> bool;

    fn and<C: Constraint>(self, other: C) -> And<Self, C>
    where
        Self: Sized,
    {
        And(self, other)
    }

    fn or<C: Constraint>(self, other: C) -> Or<Self, C>
    where
        Self: Sized,
    {
        Or(self, other)
    }

    fn not(self) -> Not<Self>
    where
        Self: Sized,
    {
        Not(self)
    }
}

impl<F> Constraint for F
where
    F: Fn(ArrayView1<f64>) -> bool,
{
    fn test(&self, x: ArrayView1<f64>) -> bool {
        self(x)
    }
}

#[derive(Debug, Clone)]
pub struct And<A, B>(A, B);

impl<A: Constraint, B: Constraint> Constraint for And<A, B> {
    fn test(&self, x: ArrayView1<f64>) -> bool {
        self.0.test(x) && self.1.test(x)
    }
}

#[derive(Debug, Clone)]
pub struct Or<A, B>(A, B);

impl<A: Constraint, B: Constraint> Constraint for Or<A, B> {
    fn test(&self, x: ArrayView1<f64>) -> bool {
        self.0.test(x) || self.1.test(x)
    }
}

#[derive(Debug, Clone)]
pub struct Not<A>(A);

impl<A: Constraint> Constraint for Not<A> {
    fn test(&self, x: ArrayView1<f64>) -> bool {
        !self.0.test(x)
    }
}

type ConstraintFn = Rc<dyn Fn(ArrayView1<f64>) -> f64>;

/// Satisfied when `|f(x)| <= tolerance`. The tolerance starts at zero, which asks for exact
/// equality.
#[derive(Clone)]
pub struct EqualityConstraint {
    function: ConstraintFn,
    tolerance: f64,
}

impl EqualityConstraint {
    pub fn new<F>(function: F) -> Self
    where
        F: Fn(ArrayView1<f64>) -> f64 + 'static,
    {
        EqualityConstraint {
            function: Rc::new(function),
            tolerance: 0.0,
        }
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance.abs();
        self
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn value_at(&self, x: ArrayView1<f64>) -> f64 {
        (self.function)(x)
    }
}

impl Constraint for EqualityConstraint {
    fn test(&self, x: ArrayView1<f64>) -> bool {
        self.value_at(x).abs() <= self.tolerance
    }
}

impl fmt::Debug for EqualityConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EqualityConstraint")
            .field("tolerance", &self.tolerance)
            .finish_non_exhaustive()
    }
}

/// Satisfied when `f(x) >= 0`.
#[derive(Clone)]
pub struct InequalityConstraint {
    function: ConstraintFn,
}

impl InequalityConstraint {
    pub fn new<F>(function: F) -> Self
    where
        F: Fn(ArrayView1<f64>) -> f64 + 'static,
    {
        InequalityConstraint {
            function: Rc::new(function),
        }
    }

    pub fn value_at(&self, x: ArrayView1<f64>) -> f64 {
        (self.function)(x)
    }
}

impl Constraint for InequalityConstraint {
    fn test(&self, x: ArrayView1<f64>) -> bool {
        self.value_at(x) >= 0.0
    }
}

impl fmt::Debug for InequalityConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InequalityConstraint").finish_non_exhaustive()
    }
}

/// Either kind of implicit constraint, for searches that accept both.
#[derive(Debug, Clone)]
pub enum ImplicitConstraint {
    Equality(EqualityConstraint),
    Inequality(InequalityConstraint),
}

impl ImplicitConstraint {
    pub fn value_at(&self, x: ArrayView1<f64>) -> f64 {
        match self {
            ImplicitConstraint::Equality(c) => c.value_at(x),
            ImplicitConstraint::Inequality(c) => c.value_at(x),
        }
    }
}

impl Constraint for ImplicitConstraint {
    fn test(&self, x: ArrayView1<f64>) -> bool {
        match self {
            ImplicitConstraint::Equality(c) => c.test(x),
            ImplicitConstraint::Inequality(c) => c.test(x),
        }
    }
}

impl From<EqualityConstraint> for ImplicitConstraint {
    fn from(c: EqualityConstraint) -> Self {
        ImplicitConstraint::Equality(c)
    }
}

impl From<InequalityConstraint> for ImplicitConstraint {
    fn from(c: InequalityConstraint) -> Self {
        ImplicitConstraint::Inequality(c)
    }
}

pub fn equality<F>(function: F) -> EqualityConstraint
where
    F: Fn(ArrayView1<f64>) -> f64 + 'static,
{
    EqualityConstraint::new(function)
}

pub fn inequality<F>(function: F) -> InequalityConstraint
where
    F: Fn(ArrayView1<f64>) -> f64 + 'static,
{
    InequalityConstraint::new(function)
}

pub fn explicit(lower: f64, upper: f64) -> Result<ExplicitConstraint> {
    ExplicitConstraint::new(lower, upper)
}

/// `true` if `x` satisfies every constraint. Vacuously true for an empty slice.
pub fn test_all<C: Constraint>(x: ArrayView1<f64>, constraints: &[C]) -> bool {
    constraints.iter().all(|c| c.test(x))
}

/// Tests coordinate `i` of `x` against `constraints[i]`.
pub fn test_explicit(x: ArrayView1<f64>, constraints: &[ExplicitConstraint]) -> Result<bool> {
    if x.len() != constraints.len() {
        return Err(Error::DimensionMismatch {
            expected: constraints.len(),
            actual: x.len(),
        });
    }
    Ok(x.iter().zip(constraints).all(|(&xi, c)| c.test(xi)))
}

/// Total violation of `constraints` at a point: the sum of `-g(x)` over every `g(x) < 0`.
///
/// Zero exactly on the feasible set, so minimizing it pushes a point towards feasibility.
pub fn violation_sum(
    constraints: &[InequalityConstraint],
) -> impl Fn(ArrayView1<f64>) -> f64 + '_ {
    move |x: ArrayView1<f64>| {
        constraints
            .iter()
            .map(|c| c.value_at(x))
            .filter(|&g| g < 0.0)
            .map(|g| -g)
            .sum::<f64>()
    }
}
