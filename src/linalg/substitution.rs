//! Forward and backward substitution over triangular systems.
use ndarray::Array1;

use super::matrix::{is_lower_triangular, is_square, is_upper_triangular, Matrix};
use super::vector::Vector;
use super::EPSILON;
use crate::error::{Error, Result};

fn check_applicable<M, V>(substitution: &'static str, matrix: &M, vector: &V) -> Result<()>
where
    M: Matrix + ?Sized,
    V: Vector + ?Sized,
{
    if !is_square(matrix) {
        return Err(Error::SubstitutionNotApplicable {
            substitution,
            reason: "matrix is not square",
        });
    }
    if matrix.row_dimension() != vector.dimension() {
        return Err(Error::SubstitutionNotApplicable {
            substitution,
            reason: "vector length does not match the matrix",
        });
    }
    Ok(())
}

fn diagonal<M: Matrix + ?Sized>(matrix: &M, i: usize) -> Result<f64> {
    let value = matrix.entry(i, i);
    if value.abs() < EPSILON {
        return Err(Error::SingularMatrix);
    }
    Ok(value)
}

/// Solves `L * y = b` for lower triangular `L`, top row first.
pub fn forward<M, V>(lower: &M, b: &V) -> Result<Array1<f64>>
where
    M: Matrix + ?Sized,
    V: Vector + ?Sized,
{
    check_applicable("forward", lower, b)?;
    if !is_lower_triangular(lower) {
        return Err(Error::SubstitutionNotApplicable {
            substitution: "forward",
            reason: "matrix is not lower triangular",
        });
    }
    let n = b.dimension();
    let mut y = Array1::zeros(n);
    for i in 0..n {
        let sum: f64 = (0..i).map(|j| lower.entry(i, j) * y[j]).sum();
        y[i] = (b.entry(i) - sum) / diagonal(lower, i)?;
    }
    Ok(y)
}

/// Solves `U * x = y` for upper triangular `U`, bottom row first.
pub fn backward<M, V>(upper: &M, y: &V) -> Result<Array1<f64>>
where
    M: Matrix + ?Sized,
    V: Vector + ?Sized,
{
    check_applicable("backward", upper, y)?;
    if !is_upper_triangular(upper) {
        return Err(Error::SubstitutionNotApplicable {
            substitution: "backward",
            reason: "matrix is not upper triangular",
        });
    }
    let n = y.dimension();
    let mut x = Array1::zeros(n);
    for i in (0..n).rev() {
        let sum: f64 = (i + 1..n).map(|j| upper.entry(i, j) * x[j]).sum();
        x[i] = (y.entry(i) - sum) / diagonal(upper, i)?;
    }
    Ok(x)
}
