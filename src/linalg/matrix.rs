//! Matrix capability, the transposed view and matrix arithmetic.
//!
//! As in [`vector`](super::vector), operations that can reuse an operand are offered as
//! `*_in_place` (overwrites the first operand) and `*_to_copy` (allocates).
use float_cmp::{ApproxEq, F64Margin};
use ndarray::{Array1, Array2};
use num_traits::{One, Zero};

use super::vector::Vector;
use super::EPSILON;
use crate::error::{Error, Result};

/// A fixed `rows x columns` grid of reals with element access.
pub trait Matrix {
    fn row_dimension(&self) -> usize;

    fn column_dimension(&self) -> usize;

    fn entry(&self, i: usize, j: usize) -> f64;

    fn set_entry(&mut self, i: usize, j: usize, value: f64);

    /// A zero matrix in dense storage.
    fn new_instance(&self, rows: usize, columns: usize) -> Array2<f64> {
        Array2::zeros((rows, columns))
    }

    fn swap_rows(&mut self, i: usize, j: usize) {
        if i == j {
            return;
        }
        for k in 0..self.column_dimension() {
            let tmp = self.entry(i, k);
            self.set_entry(i, k, self.entry(j, k));
            self.set_entry(j, k, tmp);
        }
    }

    fn swap_columns(&mut self, i: usize, j: usize) {
        if i == j {
            return;
        }
        for k in 0..self.row_dimension() {
            let tmp = self.entry(k, i);
            self.set_entry(k, i, self.entry(k, j));
            self.set_entry(k, j, tmp);
        }
    }

    fn row_vector(&self, index: usize) -> Array1<f64> {
        (0..self.column_dimension())
            .map(|j| self.entry(index, j))
            .collect()
    }

    fn column_vector(&self, index: usize) -> Array1<f64> {
        (0..self.row_dimension())
            .map(|i| self.entry(i, index))
            .collect()
    }

    /// Materializes the matrix into dense storage.
    fn to_dense(&self) -> Array2<f64> {
        let mut result = self.new_instance(self.row_dimension(), self.column_dimension());
        for i in 0..self.row_dimension() {
            for j in 0..self.column_dimension() {
                result[[i, j]] = self.entry(i, j);
            }
        }
        result
    }
}

impl Matrix for Array2<f64> {
    #[inline]
    fn row_dimension(&self) -> usize {
        self.nrows()
    }

    #[inline]
    fn column_dimension(&self) -> usize {
        self.ncols()
    }

    #[inline]
    fn entry(&self, i: usize, j: usize) -> f64 {
        self[[i, j]]
    }

    #[inline]
    fn set_entry(&mut self, i: usize, j: usize, value: f64) {
        self[[i, j]] = value;
    }

    fn to_dense(&self) -> Array2<f64> {
        self.clone()
    }
}

/// A transposed window onto another matrix.
///
/// Nothing is copied: every read and write is forwarded to the underlying matrix with
/// the indices swapped, so writing through the view writes the original.
#[derive(Debug)]
pub struct TransposedView<'a, M: Matrix + ?Sized> {
    inner: &'a mut M,
}

impl<'a, M: Matrix + ?Sized> Matrix for TransposedView<'a, M> {
    #[inline]
    fn row_dimension(&self) -> usize {
        self.inner.column_dimension()
    }

    #[inline]
    fn column_dimension(&self) -> usize {
        self.inner.row_dimension()
    }

    #[inline]
    fn entry(&self, i: usize, j: usize) -> f64 {
        self.inner.entry(j, i)
    }

    #[inline]
    fn set_entry(&mut self, i: usize, j: usize, value: f64) {
        self.inner.set_entry(j, i, value)
    }

    fn swap_rows(&mut self, i: usize, j: usize) {
        self.inner.swap_columns(i, j)
    }

    fn swap_columns(&mut self, i: usize, j: usize) {
        self.inner.swap_rows(i, j)
    }

    fn row_vector(&self, index: usize) -> Array1<f64> {
        self.inner.column_vector(index)
    }

    fn column_vector(&self, index: usize) -> Array1<f64> {
        self.inner.row_vector(index)
    }
}

/// Transposition without copying.
///
/// Transposing a mutable reference yields a [`TransposedView`]; transposing that view
/// hands back the very reference it was built from.
pub trait Transpose {
    type Output;

    fn transpose(self) -> Self::Output;
}

impl<'a, M: Matrix> Transpose for &'a mut M {
    type Output = TransposedView<'a, M>;

    fn transpose(self) -> TransposedView<'a, M> {
        TransposedView { inner: self }
    }
}

impl<'a, M: Matrix> Transpose for TransposedView<'a, M> {
    type Output = &'a mut M;

    fn transpose(self) -> &'a mut M {
        self.inner
    }
}

fn check_same_shape<A, B>(m1: &A, m2: &B) -> Result<()>
where
    A: Matrix + ?Sized,
    B: Matrix + ?Sized,
{
    if m1.row_dimension() != m2.row_dimension() || m1.column_dimension() != m2.column_dimension()
    {
        return Err(Error::MatrixDimensionMismatch {
            expected_rows: m1.row_dimension(),
            expected_columns: m1.column_dimension(),
            actual_rows: m2.row_dimension(),
            actual_columns: m2.column_dimension(),
        });
    }
    Ok(())
}

pub fn apply_in_place<M, F>(matrix: &mut M, operator: F) -> &mut M
where
    M: Matrix + ?Sized,
    F: Fn(f64) -> f64,
{
    for i in 0..matrix.row_dimension() {
        for j in 0..matrix.column_dimension() {
            let value = operator(matrix.entry(i, j));
            matrix.set_entry(i, j, value);
        }
    }
    matrix
}

pub fn apply_to_copy<M, F>(matrix: &M, operator: F) -> Array2<f64>
where
    M: Matrix + ?Sized,
    F: Fn(f64) -> f64,
{
    let mut result = matrix.new_instance(matrix.row_dimension(), matrix.column_dimension());
    for i in 0..matrix.row_dimension() {
        for j in 0..matrix.column_dimension() {
            result[[i, j]] = operator(matrix.entry(i, j));
        }
    }
    result
}

pub fn zip_in_place<'a, A, B, F>(m1: &'a mut A, m2: &B, operator: F) -> Result<&'a mut A>
where
    A: Matrix + ?Sized,
    B: Matrix + ?Sized,
    F: Fn(f64, f64) -> f64,
{
    check_same_shape(&*m1, m2)?;
    for i in 0..m1.row_dimension() {
        for j in 0..m1.column_dimension() {
            let value = operator(m1.entry(i, j), m2.entry(i, j));
            m1.set_entry(i, j, value);
        }
    }
    Ok(m1)
}

pub fn zip_to_copy<A, B, F>(m1: &A, m2: &B, operator: F) -> Result<Array2<f64>>
where
    A: Matrix + ?Sized,
    B: Matrix + ?Sized,
    F: Fn(f64, f64) -> f64,
{
    check_same_shape(m1, m2)?;
    let mut result = m1.new_instance(m1.row_dimension(), m1.column_dimension());
    for i in 0..m1.row_dimension() {
        for j in 0..m1.column_dimension() {
            result[[i, j]] = operator(m1.entry(i, j), m2.entry(i, j));
        }
    }
    Ok(result)
}

pub fn add_in_place<'a, A, B>(m1: &'a mut A, m2: &B) -> Result<&'a mut A>
where
    A: Matrix + ?Sized,
    B: Matrix + ?Sized,
{
    zip_in_place(m1, m2, |a, b| a + b)
}

pub fn add_to_copy<A, B>(m1: &A, m2: &B) -> Result<Array2<f64>>
where
    A: Matrix + ?Sized,
    B: Matrix + ?Sized,
{
    zip_to_copy(m1, m2, |a, b| a + b)
}

pub fn subtract_in_place<'a, A, B>(m1: &'a mut A, m2: &B) -> Result<&'a mut A>
where
    A: Matrix + ?Sized,
    B: Matrix + ?Sized,
{
    zip_in_place(m1, m2, |a, b| a - b)
}

pub fn subtract_to_copy<A, B>(m1: &A, m2: &B) -> Result<Array2<f64>>
where
    A: Matrix + ?Sized,
    B: Matrix + ?Sized,
{
    zip_to_copy(m1, m2, |a, b| a - b)
}

pub fn add_scalar_in_place<M: Matrix + ?Sized>(matrix: &mut M, value: f64) -> &mut M {
    if value.is_zero() {
        return matrix;
    }
    apply_in_place(matrix, |x| x + value)
}

pub fn add_scalar_to_copy<M: Matrix + ?Sized>(matrix: &M, value: f64) -> Array2<f64> {
    if value.is_zero() {
        return matrix.to_dense();
    }
    apply_to_copy(matrix, |x| x + value)
}

pub fn subtract_scalar_in_place<M: Matrix + ?Sized>(matrix: &mut M, value: f64) -> &mut M {
    if value.is_zero() {
        return matrix;
    }
    apply_in_place(matrix, |x| x - value)
}

pub fn subtract_scalar_to_copy<M: Matrix + ?Sized>(matrix: &M, value: f64) -> Array2<f64> {
    if value.is_zero() {
        return matrix.to_dense();
    }
    apply_to_copy(matrix, |x| x - value)
}

pub fn scale_in_place<M: Matrix + ?Sized>(matrix: &mut M, scalar: f64) -> &mut M {
    if scalar.is_one() {
        return matrix;
    }
    apply_in_place(matrix, |x| x * scalar)
}

pub fn scale_to_copy<M: Matrix + ?Sized>(matrix: &M, scalar: f64) -> Array2<f64> {
    if scalar.is_one() {
        return matrix.to_dense();
    }
    apply_to_copy(matrix, |x| x * scalar)
}

/// Matrix product `m1 * m2`.
pub fn multiply<A, B>(m1: &A, m2: &B) -> Result<Array2<f64>>
where
    A: Matrix + ?Sized,
    B: Matrix + ?Sized,
{
    if m1.column_dimension() != m2.row_dimension() {
        return Err(Error::DimensionMismatch {
            expected: m1.column_dimension(),
            actual: m2.row_dimension(),
        });
    }
    let (rows, inner, columns) = (m1.row_dimension(), m1.column_dimension(), m2.column_dimension());
    let mut result = m1.new_instance(rows, columns);
    for i in 0..rows {
        for j in 0..columns {
            result[[i, j]] = (0..inner)
                .map(|k| m1.entry(i, k) * m2.entry(k, j))
                .sum::<f64>();
        }
    }
    Ok(result)
}

/// Matrix-vector product `M * v`.
pub fn multiply_vector<M, V>(matrix: &M, vector: &V) -> Result<Array1<f64>>
where
    M: Matrix + ?Sized,
    V: Vector + ?Sized,
{
    if matrix.column_dimension() != vector.dimension() {
        return Err(Error::DimensionMismatch {
            expected: matrix.column_dimension(),
            actual: vector.dimension(),
        });
    }
    Ok((0..matrix.row_dimension())
        .map(|i| {
            (0..matrix.column_dimension())
                .map(|j| matrix.entry(i, j) * vector.entry(j))
                .sum::<f64>()
        })
        .collect())
}

/// Reorders rows so that row `i` of the result is row `pivot[i]` of `matrix`.
pub fn permute_rows<M: Matrix + ?Sized>(matrix: &M, pivot: &[usize]) -> Result<Array2<f64>> {
    if matrix.row_dimension() != pivot.len() {
        return Err(Error::DimensionMismatch {
            expected: matrix.row_dimension(),
            actual: pivot.len(),
        });
    }
    let mut result = matrix.new_instance(matrix.row_dimension(), matrix.column_dimension());
    for (i, &p) in pivot.iter().enumerate() {
        for j in 0..matrix.column_dimension() {
            result[[i, j]] = matrix.entry(p, j);
        }
    }
    Ok(result)
}

pub fn is_square<M: Matrix + ?Sized>(matrix: &M) -> bool {
    matrix.row_dimension() == matrix.column_dimension()
}

/// Square, and everything above the diagonal is zero within [`EPSILON`].
pub fn is_lower_triangular<M: Matrix + ?Sized>(matrix: &M) -> bool {
    let n = matrix.row_dimension();
    is_square(matrix) && (0..n).all(|i| (i + 1..n).all(|j| matrix.entry(i, j).abs() <= EPSILON))
}

/// Square, and everything below the diagonal is zero within [`EPSILON`].
pub fn is_upper_triangular<M: Matrix + ?Sized>(matrix: &M) -> bool {
    let n = matrix.row_dimension();
    is_square(matrix) && (0..n).all(|i| (0..i).all(|j| matrix.entry(i, j).abs() <= EPSILON))
}

/// Exact element-wise equality, regardless of representation.
pub fn equals<A, B>(m1: &A, m2: &B) -> bool
where
    A: Matrix + ?Sized,
    B: Matrix + ?Sized,
{
    check_same_shape(m1, m2).is_ok()
        && (0..m1.row_dimension())
            .all(|i| (0..m1.column_dimension()).all(|j| m1.entry(i, j) == m2.entry(i, j)))
}

/// Element-wise equality within `margin`, regardless of representation.
pub fn approx_equals<A, B, M>(m1: &A, m2: &B, margin: M) -> bool
where
    A: Matrix + ?Sized,
    B: Matrix + ?Sized,
    M: Into<F64Margin>,
{
    let margin = margin.into();
    check_same_shape(m1, m2).is_ok()
        && (0..m1.row_dimension()).all(|i| {
            (0..m1.column_dimension()).all(|j| m1.entry(i, j).approx_eq(m2.entry(i, j), margin))
        })
}

pub fn any_match<M, P>(matrix: &M, predicate: P) -> bool
where
    M: Matrix + ?Sized,
    P: Fn(f64) -> bool,
{
    (0..matrix.row_dimension())
        .any(|i| (0..matrix.column_dimension()).any(|j| predicate(matrix.entry(i, j))))
}

pub fn all_match<M, P>(matrix: &M, predicate: P) -> bool
where
    M: Matrix + ?Sized,
    P: Fn(f64) -> bool,
{
    !any_match(matrix, |x| !predicate(x))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr2;

    #[test]
    fn transposed_view_reads_swapped() {
        let mut a = arr2(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
        let copy = a.clone();
        let view = a.transpose();
        assert_eq!(view.row_dimension(), 3);
        assert_eq!(view.column_dimension(), 2);
        for i in 0..3 {
            for j in 0..2 {
                assert_eq!(view.entry(i, j), copy[[j, i]]);
            }
        }
        assert_eq!(view.row_vector(2), copy.column(2));
    }

    #[test]
    fn writes_through_view_reach_original() {
        let mut a = arr2(&[[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]);
        {
            let mut view = a.transpose();
            view.set_entry(0, 2, -1.0);
            view.swap_rows(0, 1);
        }
        assert_eq!(a, arr2(&[[2.0, 1.0], [4.0, 3.0], [6.0, -1.0]]));
    }

    #[test]
    fn double_transpose_is_the_original() {
        let mut a = arr2(&[[1.0, 2.0], [3.0, 4.0]]);
        let original: *const Array2<f64> = &a;
        let back = a.transpose().transpose();
        assert!(std::ptr::eq(back, original));
    }

    #[test]
    fn arithmetic_checks_shape() {
        let mut a = arr2(&[[1.0, 2.0], [3.0, 4.0]]);
        let b = arr2(&[[1.0, 2.0, 3.0]]);
        assert_eq!(
            add_to_copy(&a, &b).unwrap_err(),
            Error::MatrixDimensionMismatch {
                expected_rows: 2,
                expected_columns: 2,
                actual_rows: 1,
                actual_columns: 3,
            }
        );
        assert!(subtract_in_place(&mut a, &b).is_err());

        let twice = add_to_copy(&a, &a).unwrap();
        assert!(equals(&twice, &scale_to_copy(&a, 2.0)));
        scale_in_place(&mut a, 1.0);
        assert_eq!(a, arr2(&[[1.0, 2.0], [3.0, 4.0]]));
    }

    #[test]
    fn products() {
        let a = arr2(&[[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]);
        let b = arr2(&[[1.0, 0.0, 1.0], [0.0, 1.0, 1.0]]);
        assert_eq!(
            multiply(&a, &b).unwrap(),
            arr2(&[[1.0, 2.0, 3.0], [3.0, 4.0, 7.0], [5.0, 6.0, 11.0]])
        );
        assert!(multiply(&a, &a).is_err());

        let v = vec![1.0, -1.0];
        assert_eq!(multiply_vector(&a, &v).unwrap().to_vec(), vec![-1.0, -1.0, -1.0]);
        assert!(multiply_vector(&b, &v).is_err());
    }

    #[test]
    fn triangularity() {
        let lower = arr2(&[[1.0, 0.0], [2.0, 1.0]]);
        let upper = arr2(&[[1.0, 5.0], [0.0, 1.0]]);
        assert!(is_lower_triangular(&lower));
        assert!(!is_upper_triangular(&lower));
        assert!(is_upper_triangular(&upper));
        assert!(!is_lower_triangular(&arr2(&[[1.0, 0.0, 0.0]])));
        assert!(!is_lower_triangular(&arr2(&[[1.0, -3.0], [0.0, 1.0]])));
    }

    #[test]
    fn permute_and_predicates() {
        let a = arr2(&[[1.0, 2.0], [3.0, 4.0]]);
        assert_eq!(permute_rows(&a, &[1, 0]).unwrap(), arr2(&[[3.0, 4.0], [1.0, 2.0]]));
        assert!(all_match(&a, |x| x > 0.0));
        assert!(!any_match(&a, |x| x > 4.0));
    }
}
