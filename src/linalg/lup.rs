//! LUP decomposition and the linear solver built on it.
//!
//! The decomposition works on a private copy of the input. Row exchanges are recorded in a
//! pivot vector, the unit lower triangle and the upper triangle share the same storage:
//!
//! ```text
//!  | u00 u01 u02 |        | 1   0   0 |        | u00 u01 u02 |
//!  | l10 u11 u12 |  ==>   | l10 1   0 |   *    | 0   u11 u12 |
//!  | l20 l21 u22 |        | l20 l21 1 |        | 0   0   u22 |
//! ```
//!
//! `L` and `U` are only split out of the packed storage when first asked for.
use std::cell::OnceCell;

use ndarray::{Array1, Array2};

use super::matrix::{is_square, Matrix};
use super::vector::{permute, to_array, Vector};
use super::{substitution, EPSILON};
use crate::error::{Error, Result};

/// A factorization of a square matrix.
pub trait Decomposition {
    fn determinant(&self) -> f64;

    fn lower(&self) -> &Array2<f64>;

    fn upper(&self) -> &Array2<f64>;
}

/// Solves `A * x = b` for the matrix `A` a solver was built from.
pub trait LinearSolver {
    fn solve<V: Vector + ?Sized>(&self, b: &V) -> Result<Array1<f64>>;

    /// `A^-1`, assembled column by column from solves against the identity.
    fn invert(&self) -> Result<Array2<f64>>;
}

#[derive(Debug, Clone)]
pub struct LupDecomposition {
    packed: Array2<f64>,
    pivot: Vec<usize>,
    even_swaps: bool,
    lower: OnceCell<Array2<f64>>,
    upper: OnceCell<Array2<f64>>,
}

impl LupDecomposition {
    /// Decomposes `matrix` with partial pivoting.
    ///
    /// Fails with [`Error::NonSquareMatrix`] for rectangular input and with
    /// [`Error::SingularMatrix`] once a pivot drops below [`EPSILON`].
    pub fn new<M: Matrix + ?Sized>(matrix: &M) -> Result<Self> {
        if !Self::is_applicable(matrix) {
            return Err(Error::NonSquareMatrix {
                rows: matrix.row_dimension(),
                columns: matrix.column_dimension(),
            });
        }
        let n = matrix.row_dimension();
        let mut packed = matrix.to_dense();
        let mut pivot: Vec<usize> = (0..n).collect();
        let mut even_swaps = true;

        for i in 0..n.saturating_sub(1) {
            let mut max_row = i;
            let mut max_value = packed[[i, i]].abs();
            for k in i + 1..n {
                let value = packed[[k, i]].abs();
                if value > max_value {
                    max_value = value;
                    max_row = k;
                }
            }
            if max_value < EPSILON {
                return Err(Error::SingularMatrix);
            }
            if max_row != i {
                Matrix::swap_rows(&mut packed, i, max_row);
                pivot.swap(i, max_row);
                even_swaps = !even_swaps;
            }
            for k in i + 1..n {
                let factor = packed[[k, i]] / packed[[i, i]];
                packed[[k, i]] = factor;
                for j in i + 1..n {
                    packed[[k, j]] -= factor * packed[[i, j]];
                }
            }
        }

        Ok(LupDecomposition {
            packed,
            pivot,
            even_swaps,
            lower: OnceCell::new(),
            upper: OnceCell::new(),
        })
    }

    pub fn is_applicable<M: Matrix + ?Sized>(matrix: &M) -> bool {
        is_square(matrix)
    }

    /// Row `i` of `P * A` is row `pivot()[i]` of `A`.
    pub fn pivot(&self) -> &[usize] {
        &self.pivot
    }

    pub fn solver(&self) -> LupSolver<'_> {
        LupSolver { decomposition: self }
    }

    fn dimension(&self) -> usize {
        self.packed.nrows()
    }
}

impl Decomposition for LupDecomposition {
    fn determinant(&self) -> f64 {
        let sign = if self.even_swaps { 1.0 } else { -1.0 };
        let upper = self.upper();
        (0..self.dimension()).fold(sign, |det, i| det * upper[[i, i]])
    }

    fn lower(&self) -> &Array2<f64> {
        self.lower.get_or_init(|| {
            let n = self.dimension();
            Array2::from_shape_fn((n, n), |(i, j)| match i.cmp(&j) {
                std::cmp::Ordering::Greater => self.packed[[i, j]],
                std::cmp::Ordering::Equal => 1.0,
                std::cmp::Ordering::Less => 0.0,
            })
        })
    }

    fn upper(&self) -> &Array2<f64> {
        self.upper.get_or_init(|| {
            let n = self.dimension();
            Array2::from_shape_fn(
                (n, n),
                |(i, j)| if i <= j { self.packed[[i, j]] } else { 0.0 },
            )
        })
    }
}

/// Solver borrowing a finished decomposition.
#[derive(Debug, Clone, Copy)]
pub struct LupSolver<'a> {
    decomposition: &'a LupDecomposition,
}

impl<'a> LinearSolver for LupSolver<'a> {
    fn solve<V: Vector + ?Sized>(&self, b: &V) -> Result<Array1<f64>> {
        let permuted = permute(&to_array(b), self.decomposition.pivot())?;
        let y = substitution::forward(self.decomposition.lower(), &permuted)?;
        substitution::backward(self.decomposition.upper(), &y)
    }

    fn invert(&self) -> Result<Array2<f64>> {
        let n = self.decomposition.dimension();
        let mut inverse = Array2::zeros((n, n));
        for j in 0..n {
            let mut unit = Array1::<f64>::zeros(n);
            unit[j] = 1.0;
            let column = self.solve(&unit)?;
            inverse.column_mut(j).assign(&column);
        }
        Ok(inverse)
    }
}

/// Solves `A * x = b` with a one-off decomposition of `A`.
pub fn solve<M, V>(matrix: &M, b: &V) -> Result<Array1<f64>>
where
    M: Matrix + ?Sized,
    V: Vector + ?Sized,
{
    LupDecomposition::new(matrix)?.solver().solve(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linalg::matrix::{approx_equals, multiply, multiply_vector, permute_rows};
    use float_cmp::ApproxEq;
    use ndarray::arr2;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_matrix(rng: &mut StdRng, n: usize) -> Array2<f64> {
        // Diagonal dominance keeps the samples well away from singular.
        let mut m = Array2::from_shape_fn((n, n), |_| rng.gen_range(-1.0..1.0));
        for i in 0..n {
            m[[i, i]] += n as f64 * if i % 2 == 0 { 1.0 } else { -1.0 };
        }
        m
    }

    fn cofactor_determinant(m: &Array2<f64>) -> f64 {
        let n = m.nrows();
        if n == 1 {
            return m[[0, 0]];
        }
        (0..n)
            .map(|j| {
                let minor = Array2::from_shape_fn((n - 1, n - 1), |(r, c)| {
                    m[[r + 1, if c < j { c } else { c + 1 }]]
                });
                let sign = if j % 2 == 0 { 1.0 } else { -1.0 };
                sign * m[[0, j]] * cofactor_determinant(&minor)
            })
            .sum()
    }

    fn assert_close(a: &Array2<f64>, b: &Array2<f64>) {
        assert!(approx_equals(a, b, (1e-9, 4)), "{} != {}", a, b);
    }

    #[test]
    fn lu_reassembles_permuted_input() {
        let mut rng = StdRng::seed_from_u64(7);
        for n in 1..6 {
            let a = random_matrix(&mut rng, n);
            let lup = LupDecomposition::new(&a).unwrap();
            let lu = multiply(lup.lower(), lup.upper()).unwrap();
            assert_close(&lu, &permute_rows(&a, lup.pivot()).unwrap());
        }
    }

    #[test]
    fn determinant_matches_cofactor_expansion() {
        let mut rng = StdRng::seed_from_u64(11);
        for n in 1..6 {
            let a = random_matrix(&mut rng, n);
            let lup = LupDecomposition::new(&a).unwrap();
            assert!(lup
                .determinant()
                .approx_eq(cofactor_determinant(&a), (1e-9, 4)));
        }
        let swapped = arr2(&[[0.0, 1.0], [1.0, 0.0]]);
        let lup = LupDecomposition::new(&swapped).unwrap();
        assert_eq!(lup.pivot(), &[1, 0]);
        assert!(lup.determinant().approx_eq(-1.0, (1e-12, 2)));
    }

    #[test]
    fn solve_and_invert_round_trip() {
        let mut rng = StdRng::seed_from_u64(3);
        let a = random_matrix(&mut rng, 4);
        let b: Array1<f64> = (0..4).map(|_| rng.gen_range(-5.0..5.0)).collect();

        let lup = LupDecomposition::new(&a).unwrap();
        let x = lup.solver().solve(&b).unwrap();
        let back = multiply_vector(&a, &x).unwrap();
        for (x, y) in back.iter().zip(b.iter()) {
            assert!(x.approx_eq(*y, (1e-9, 4)));
        }

        let inverse = lup.solver().invert().unwrap();
        assert_close(&multiply(&a, &inverse).unwrap(), &Array2::eye(4));
    }

    #[test]
    fn lazy_factors_are_cached() {
        let a = arr2(&[[4.0, 3.0], [6.0, 3.0]]);
        let lup = LupDecomposition::new(&a).unwrap();
        let first: *const Array2<f64> = lup.upper();
        let second: *const Array2<f64> = lup.upper();
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn rank_deficient_input_decomposes_but_does_not_solve() {
        let a = arr2(&[[1.0, 2.0], [2.0, 4.0]]);
        let lup = LupDecomposition::new(&a).unwrap();
        assert!(lup.determinant().approx_eq(0.0, (1e-12, 2)));
        assert_eq!(
            lup.solver().solve(&vec![1.0, 2.0]).unwrap_err(),
            Error::SingularMatrix
        );
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(
            LupDecomposition::new(&arr2(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]])).unwrap_err(),
            Error::NonSquareMatrix {
                rows: 2,
                columns: 3
            }
        );
        assert_eq!(
            LupDecomposition::new(&arr2(&[[0.0, 1.0], [0.0, 2.0]])).unwrap_err(),
            Error::SingularMatrix
        );
        assert!(solve(&arr2(&[[2.0]]), &vec![1.0, 1.0]).is_err());
    }
}
