//! Local numerical optimization.
//!
//! The crate is layered. [`linalg`] holds a small dense vector and matrix core with an LUP
//! based linear solver. [`constraints`] and [`function`] describe what is being minimized.
//! [`scalar`] and [`vector`] hold the search algorithms for one and for several variables.
//!
//! All searches are local: they follow the function downhill from a starting point and stop
//! in the first minimum they reach.
//!
//! ```
//! use localopt::vector::HookeJeevesBuilder;
//! use localopt::Minimizer;
//! use ndarray::{array, ArrayView1};
//!
//! let function = |x: ArrayView1<f64>| (x[0] - 4.0).powi(2) + 4.0 * (x[1] - 2.0).powi(2);
//! let minimizer = HookeJeevesBuilder::default().build().unwrap();
//! let minimum = minimizer.search(&function, array![0.0, 0.0].view()).unwrap();
//! assert!((minimum[0] - 4.0).abs() < 1e-5);
//! ```

#[macro_use]
extern crate derive_builder;
#[macro_use]
extern crate log;

extern crate float_cmp;
extern crate ndarray;
extern crate num_traits;
extern crate rand;
extern crate thiserror;

pub mod constraints;
pub mod error;
pub mod function;
pub mod linalg;
pub mod minimizer;
pub mod scalar;
pub mod utils;
pub mod vector;

pub use crate::error::{Error, Result};
pub use crate::function::{
    ConstrainedFunction, CostFunction, Differentiable, DifferentiableCostFunction, Objective,
    ScalarCostFunction, ScalarObjective,
};
pub use crate::minimizer::{DifferentiableMinimizer, Minimizer};
pub use crate::utils::Interval;
