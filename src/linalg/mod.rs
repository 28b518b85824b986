//! Small dense linear algebra core: vectors, matrices and the LUP solver.
pub mod lup;
pub mod matrix;
pub mod substitution;
pub mod vector;

pub use self::lup::{solve, Decomposition, LinearSolver, LupDecomposition, LupSolver};
pub use self::matrix::{Matrix, Transpose, TransposedView};
pub use self::vector::Vector;

/// Threshold below which pivots and triangular entries count as zero.
pub const EPSILON: f64 = 1e-6;
