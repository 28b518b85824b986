//! Errors shared by the linear algebra core, the constraint layer and the minimizers.
use ndarray::Array1;
use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Two vectors (or a vector and a matrix side) do not have matching lengths.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Two matrices do not have the same shape.
    #[error(
        "expected a {expected_rows}x{expected_columns} matrix, got {actual_rows}x{actual_columns}"
    )]
    MatrixDimensionMismatch {
        expected_rows: usize,
        expected_columns: usize,
        actual_rows: usize,
        actual_columns: usize,
    },

    /// The decomposition only applies to square matrices.
    #[error("matrix is not square: {rows}x{columns}")]
    NonSquareMatrix { rows: usize, columns: usize },

    /// A pivot or diagonal element fell below the singularity threshold.
    #[error("matrix is singular")]
    SingularMatrix,

    #[error("{substitution} substitution is not applicable: {reason}")]
    SubstitutionNotApplicable {
        substitution: &'static str,
        reason: &'static str,
    },

    #[error("invalid interval [{start}, {end}]: start is greater than end")]
    InvalidInterval { start: f64, end: f64 },

    #[error("starting point does not satisfy the explicit constraints")]
    ExplicitConstraintsNotMet,

    #[error("starting point does not satisfy the implicit constraints")]
    ImplicitConstraintsNotMet,

    /// Points cannot be sampled uniformly from an infinite bound.
    #[error("explicit constraint {index} is unbounded")]
    UnboundedConstraint { index: usize },

    /// An iterative search went `limit` steps without improving. `point` is the best
    /// point found before giving up.
    #[error("divergence limit of {limit} reached, best point found: {point}")]
    DivergenceLimitReached { limit: usize, point: Array1<f64> },
}
