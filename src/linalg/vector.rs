//! Vector capability and the arithmetic built on top of it.
//!
//! Every binary operation comes in two flavours. `*_in_place` writes the result into
//! the first operand and hands the same reference back, `*_to_copy` leaves the
//! operands alone and allocates a fresh vector of the first operand's representation.
//! Which operand gets overwritten is therefore always visible at the call site.
use float_cmp::{ApproxEq, F64Margin};
use ndarray::Array1;
use num_traits::{One, Zero};

use super::matrix;
use crate::error::{Error, Result};

/// A fixed-length sequence of reals with element access.
///
/// Implemented for contiguous `ndarray` storage (`Array1<f64>`) and for plain
/// lists (`Vec<f64>`). Everything else in this module only relies on this trait.
pub trait Vector {
    fn dimension(&self) -> usize;

    fn entry(&self, i: usize) -> f64;

    fn set_entry(&mut self, i: usize, value: f64);

    /// A zero vector of the same representation.
    fn new_instance(&self, dimension: usize) -> Self
    where
        Self: Sized;

    fn swap_entries(&mut self, i: usize, j: usize) {
        let tmp = self.entry(i);
        self.set_entry(i, self.entry(j));
        self.set_entry(j, tmp);
    }

    fn entries(&self) -> Entries<'_, Self> {
        Entries {
            vector: self,
            index: 0,
            end: self.dimension(),
        }
    }
}

impl Vector for Array1<f64> {
    #[inline]
    fn dimension(&self) -> usize {
        self.len()
    }

    #[inline]
    fn entry(&self, i: usize) -> f64 {
        self[i]
    }

    #[inline]
    fn set_entry(&mut self, i: usize, value: f64) {
        self[i] = value;
    }

    fn new_instance(&self, dimension: usize) -> Self {
        Array1::zeros(dimension)
    }
}

impl Vector for Vec<f64> {
    #[inline]
    fn dimension(&self) -> usize {
        self.len()
    }

    #[inline]
    fn entry(&self, i: usize) -> f64 {
        self[i]
    }

    #[inline]
    fn set_entry(&mut self, i: usize, value: f64) {
        self[i] = value;
    }

    fn new_instance(&self, dimension: usize) -> Self {
        vec![0.0; dimension]
    }

    fn swap_entries(&mut self, i: usize, j: usize) {
        self.swap(i, j);
    }
}

/// Iterator over the entries of any [`Vector`].
pub struct Entries<'a, V: ?Sized> {
    vector: &'a V,
    index: usize,
    end: usize,
}

impl<'a, V: Vector + ?Sized> Iterator for Entries<'a, V> {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        if self.index < self.end {
            let value = self.vector.entry(self.index);
            self.index += 1;
            Some(value)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.index;
        (remaining, Some(remaining))
    }
}

impl<'a, V: Vector + ?Sized> ExactSizeIterator for Entries<'a, V> {}

pub(crate) fn check_same_dimension<V, W>(v1: &V, v2: &W) -> Result<()>
where
    V: Vector + ?Sized,
    W: Vector + ?Sized,
{
    if v1.dimension() != v2.dimension() {
        return Err(Error::DimensionMismatch {
            expected: v1.dimension(),
            actual: v2.dimension(),
        });
    }
    Ok(())
}

/// Copies any vector into contiguous storage.
pub fn to_array<V: Vector + ?Sized>(vector: &V) -> Array1<f64> {
    vector.entries().collect()
}

pub fn apply_in_place<V, F>(vector: &mut V, operator: F) -> &mut V
where
    V: Vector + ?Sized,
    F: Fn(f64) -> f64,
{
    for i in 0..vector.dimension() {
        let value = operator(vector.entry(i));
        vector.set_entry(i, value);
    }
    vector
}

pub fn apply_to_copy<V, F>(vector: &V, operator: F) -> V
where
    V: Vector,
    F: Fn(f64) -> f64,
{
    let n = vector.dimension();
    let mut result = vector.new_instance(n);
    for i in 0..n {
        result.set_entry(i, operator(vector.entry(i)));
    }
    result
}

pub fn zip_in_place<'a, V, W, F>(v1: &'a mut V, v2: &W, operator: F) -> Result<&'a mut V>
where
    V: Vector + ?Sized,
    W: Vector + ?Sized,
    F: Fn(f64, f64) -> f64,
{
    check_same_dimension(&*v1, v2)?;
    for i in 0..v1.dimension() {
        let value = operator(v1.entry(i), v2.entry(i));
        v1.set_entry(i, value);
    }
    Ok(v1)
}

pub fn zip_to_copy<V, W, F>(v1: &V, v2: &W, operator: F) -> Result<V>
where
    V: Vector,
    W: Vector + ?Sized,
    F: Fn(f64, f64) -> f64,
{
    check_same_dimension(v1, v2)?;
    let n = v1.dimension();
    let mut result = v1.new_instance(n);
    for i in 0..n {
        result.set_entry(i, operator(v1.entry(i), v2.entry(i)));
    }
    Ok(result)
}

pub fn add_in_place<'a, V, W>(v1: &'a mut V, v2: &W) -> Result<&'a mut V>
where
    V: Vector + ?Sized,
    W: Vector + ?Sized,
{
    zip_in_place(v1, v2, |a, b| a + b)
}

pub fn add_to_copy<V: Vector, W: Vector + ?Sized>(v1: &V, v2: &W) -> Result<V> {
    zip_to_copy(v1, v2, |a, b| a + b)
}

pub fn subtract_in_place<'a, V, W>(v1: &'a mut V, v2: &W) -> Result<&'a mut V>
where
    V: Vector + ?Sized,
    W: Vector + ?Sized,
{
    zip_in_place(v1, v2, |a, b| a - b)
}

pub fn subtract_to_copy<V: Vector, W: Vector + ?Sized>(v1: &V, v2: &W) -> Result<V> {
    zip_to_copy(v1, v2, |a, b| a - b)
}

pub fn add_scalar_in_place<V: Vector + ?Sized>(vector: &mut V, value: f64) -> &mut V {
    if value.is_zero() {
        return vector;
    }
    apply_in_place(vector, |x| x + value)
}

pub fn add_scalar_to_copy<V: Vector + Clone>(vector: &V, value: f64) -> V {
    if value.is_zero() {
        return vector.clone();
    }
    apply_to_copy(vector, |x| x + value)
}

pub fn subtract_scalar_in_place<V: Vector + ?Sized>(vector: &mut V, value: f64) -> &mut V {
    if value.is_zero() {
        return vector;
    }
    apply_in_place(vector, |x| x - value)
}

pub fn subtract_scalar_to_copy<V: Vector + Clone>(vector: &V, value: f64) -> V {
    if value.is_zero() {
        return vector.clone();
    }
    apply_to_copy(vector, |x| x - value)
}

pub fn scale_in_place<V: Vector + ?Sized>(vector: &mut V, scalar: f64) -> &mut V {
    if scalar.is_one() {
        return vector;
    }
    apply_in_place(vector, |x| x * scalar)
}

pub fn scale_to_copy<V: Vector + Clone>(vector: &V, scalar: f64) -> V {
    if scalar.is_one() {
        return vector.clone();
    }
    apply_to_copy(vector, |x| x * scalar)
}

pub fn inner<V, W>(v1: &V, v2: &W) -> Result<f64>
where
    V: Vector + ?Sized,
    W: Vector + ?Sized,
{
    check_same_dimension(v1, v2)?;
    Ok(v1.entries().zip(v2.entries()).map(|(a, b)| a * b).sum())
}

/// `v1 * v2^T`. The two vectors may have different lengths.
pub fn outer<V, W>(v1: &V, v2: &W) -> ndarray::Array2<f64>
where
    V: Vector + ?Sized,
    W: Vector + ?Sized,
{
    let mut result = ndarray::Array2::zeros((v1.dimension(), v2.dimension()));
    for i in 0..v1.dimension() {
        let xi = v1.entry(i);
        for j in 0..v2.dimension() {
            result[[i, j]] = xi * v2.entry(j);
        }
    }
    result
}

/// Euclidean norm.
pub fn norm<V: Vector + ?Sized>(vector: &V) -> f64 {
    vector.entries().map(|x| x * x).sum::<f64>().sqrt()
}

/// `v^T * M`, i.e. the vector on the left of the matrix.
pub fn multiply_matrix<V, M>(vector: &V, matrix: &M) -> Result<Array1<f64>>
where
    V: Vector + ?Sized,
    M: matrix::Matrix + ?Sized,
{
    if matrix.row_dimension() != vector.dimension() {
        return Err(Error::DimensionMismatch {
            expected: matrix.row_dimension(),
            actual: vector.dimension(),
        });
    }
    let mut result = Array1::zeros(matrix.column_dimension());
    for i in 0..matrix.column_dimension() {
        result[i] = (0..matrix.row_dimension())
            .map(|j| matrix.entry(j, i) * vector.entry(j))
            .sum();
    }
    Ok(result)
}

/// Reorders entries so that `result[i] == vector[pivot[i]]`.
pub fn permute<V: Vector>(vector: &V, pivot: &[usize]) -> Result<V> {
    if vector.dimension() != pivot.len() {
        return Err(Error::DimensionMismatch {
            expected: pivot.len(),
            actual: vector.dimension(),
        });
    }
    let mut result = vector.new_instance(pivot.len());
    for (i, &p) in pivot.iter().enumerate() {
        result.set_entry(i, vector.entry(p));
    }
    Ok(result)
}

/// Exact element-wise equality, regardless of representation.
pub fn equals<V, W>(v1: &V, v2: &W) -> bool
where
    V: Vector + ?Sized,
    W: Vector + ?Sized,
{
    v1.dimension() == v2.dimension() && v1.entries().zip(v2.entries()).all(|(a, b)| a == b)
}

/// Element-wise equality within `margin`, given as an `F64Margin` or an
/// `(epsilon, ulps)` pair.
pub fn approx_equals<V, W, M>(v1: &V, v2: &W, margin: M) -> bool
where
    V: Vector + ?Sized,
    W: Vector + ?Sized,
    M: Into<F64Margin>,
{
    let margin = margin.into();
    v1.dimension() == v2.dimension()
        && v1
            .entries()
            .zip(v2.entries())
            .all(|(a, b)| a.approx_eq(b, margin))
}

pub fn any_match<V, P>(vector: &V, predicate: P) -> bool
where
    V: Vector + ?Sized,
    P: Fn(f64) -> bool,
{
    vector.entries().any(predicate)
}

pub fn all_match<V, P>(vector: &V, predicate: P) -> bool
where
    V: Vector + ?Sized,
    P: Fn(f64) -> bool,
{
    vector.entries().all(predicate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::ApproxEq;
    use ndarray::arr1;

    #[test]
    fn unequal_dimensions_are_rejected() {
        let mut v1 = arr1(&[1.0, 2.0, 3.0]);
        let v2 = vec![1.0, 2.0];
        let mismatch = Error::DimensionMismatch {
            expected: 3,
            actual: 2,
        };

        assert_eq!(add_to_copy(&v1, &v2).unwrap_err(), mismatch);
        assert_eq!(subtract_to_copy(&v1, &v2).unwrap_err(), mismatch);
        assert_eq!(inner(&v1, &v2).unwrap_err(), mismatch);
        assert!(add_in_place(&mut v1, &v2).is_err());
        // nothing was written before the check failed
        assert_eq!(v1, arr1(&[1.0, 2.0, 3.0]));
    }

    #[test]
    fn in_place_returns_the_same_vector() {
        let mut v = arr1(&[1.0, -2.0, 3.0]);
        let before: *const Array1<f64> = &v;
        let after = apply_in_place(&mut v, |x| x * x) as *const Array1<f64>;
        assert_eq!(before, after);
        assert_eq!(v, arr1(&[1.0, 4.0, 9.0]));
    }

    #[test]
    fn to_copy_leaves_operand_untouched() {
        let v = vec![1.0, -2.0, 3.0];
        let squared = apply_to_copy(&v, |x| x * x);
        assert_eq!(v, vec![1.0, -2.0, 3.0]);
        for i in 0..v.len() {
            assert_eq!(squared[i], v[i] * v[i]);
        }
    }

    #[test]
    fn identity_scalars_short_circuit() {
        let mut v = arr1(&[1.5, 2.5]);
        assert_eq!(add_scalar_to_copy(&v, 0.0), v);
        assert_eq!(scale_to_copy(&v, 1.0), v);
        scale_in_place(&mut v, 2.0);
        subtract_scalar_in_place(&mut v, 1.0);
        assert_eq!(v, arr1(&[2.0, 4.0]));
    }

    #[test]
    fn representations_interoperate() {
        let array = arr1(&[3.0, 4.0]);
        let list = vec![1.0, 2.0];
        assert!(inner(&array, &list).unwrap().approx_eq(11.0, (1e-12, 2)));
        assert_eq!(add_to_copy(&list, &array).unwrap(), vec![4.0, 6.0]);
        assert!(equals(&to_array(&list), &vec![1.0, 2.0]));
        assert!(!equals(&array, &list));
    }

    #[test]
    fn norm_and_outer() {
        let v = arr1(&[3.0, 4.0]);
        assert!(norm(&v).approx_eq(5.0, (1e-12, 2)));

        let o = outer(&v, &vec![1.0, 0.0, -1.0]);
        assert_eq!(o.dim(), (2, 3));
        assert_eq!(o[[1, 2]], -4.0);

        let third = vec![1.0 / 3.0, 0.1 + 0.2];
        assert!(!equals(&third, &arr1(&[0.333_333_333_333_333_3, 0.3])));
        assert!(approx_equals(&third, &arr1(&[0.333_333_333_333_333_3, 0.3]), (0.0, 2)));
        assert!(!approx_equals(&third, &arr1(&[0.3]), (1.0, 2)));
    }

    #[test]
    fn permutation_and_swap() {
        let mut v = vec![10.0, 20.0, 30.0];
        assert_eq!(permute(&v, &[2, 0, 1]).unwrap(), vec![30.0, 10.0, 20.0]);
        assert!(permute(&v, &[0, 1]).is_err());

        v.swap_entries(0, 2);
        assert_eq!(v, vec![30.0, 20.0, 10.0]);
        assert!(all_match(&v, |x| x > 5.0));
        assert!(any_match(&v, |x| x == 20.0));
        assert_eq!(v.entries().len(), 3);
    }
}
