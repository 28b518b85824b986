//! Pieces shared by the simplex methods: the vertex set and its geometric transformations.
use ndarray::{Array1, ArrayView1};

use crate::error::{Error, Result};
use crate::function::Objective;

/// The vertices of a simplex together with their function values.
#[derive(Debug, Clone)]
pub(crate) struct Simplex {
    pub points: Vec<Array1<f64>>,
    pub values: Vec<f64>,
}

impl Simplex {
    /// Evaluates `function` at every point.
    pub fn new<O: Objective + ?Sized>(function: &O, points: Vec<Array1<f64>>) -> Self {
        let values = points.iter().map(|p| function.value_at(p.view())).collect();
        Simplex { points, values }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn replace(&mut self, index: usize, point: Array1<f64>, value: f64) {
        self.points[index] = point;
        self.values[index] = value;
    }

    /// Index of the lowest value.
    pub fn best(&self) -> usize {
        arg_min(&self.values)
    }

    /// Indices of the highest and the lowest value.
    pub fn worst_and_best(&self) -> (usize, usize) {
        let mut worst = 0;
        let mut best = 0;
        for (i, &value) in self.values.iter().enumerate() {
            if value > self.values[worst] {
                worst = i;
            }
            if value < self.values[best] {
                best = i;
            }
        }
        (worst, best)
    }

    /// Indices of the highest and the second highest value.
    pub fn worst_two(&self) -> (usize, usize) {
        let (mut worst, mut second) = if self.values[1] > self.values[0] {
            (1, 0)
        } else {
            (0, 1)
        };
        for (i, &value) in self.values.iter().enumerate().skip(2) {
            if value > self.values[worst] {
                second = worst;
                worst = i;
            } else if value > self.values[second] {
                second = i;
            }
        }
        (worst, second)
    }

    /// Mean of every vertex except `excluded`.
    pub fn centroid(&self, excluded: usize) -> Array1<f64> {
        let mut centroid = Array1::<f64>::zeros(self.points[0].len());
        for (i, point) in self.points.iter().enumerate() {
            if i != excluded {
                centroid += point;
            }
        }
        centroid / (self.len() - 1) as f64
    }

    /// Standard deviation of the vertex values about the value at the centroid.
    pub fn spread(&self, centroid_value: f64) -> f64 {
        let sum: f64 = self
            .values
            .iter()
            .map(|v| (v - centroid_value).powi(2))
            .sum();
        (sum / (self.len() - 1) as f64).sqrt()
    }

    /// Moves every vertex towards `best` by the factor `sigma` and re-evaluates them.
    pub fn shrink<O: Objective + ?Sized>(&mut self, function: &O, best: usize, sigma: f64) {
        let anchor = self.points[best].clone();
        for (i, (point, value)) in self.points.iter_mut().zip(self.values.iter_mut()).enumerate() {
            if i != best {
                *point = shrink(anchor.view(), point.view(), sigma);
                *value = function.value_at(point.view());
            }
        }
    }
}

/// A simplex needs at least one coordinate to span.
pub(crate) fn check_not_empty(x0: ArrayView1<f64>) -> Result<()> {
    if x0.is_empty() {
        return Err(Error::DimensionMismatch {
            expected: 1,
            actual: 0,
        });
    }
    Ok(())
}

pub(crate) fn arg_min(values: &[f64]) -> usize {
    values
        .iter()
        .enumerate()
        .fold(0, |best, (i, &v)| if v < values[best] { i } else { best })
}

/// `(1 + alpha) * centroid - alpha * worst`
pub(crate) fn reflection(
    centroid: ArrayView1<f64>,
    worst: ArrayView1<f64>,
    alpha: f64,
) -> Array1<f64> {
    (1.0 + alpha) * &centroid - alpha * &worst
}

/// `(1 - gamma) * centroid + gamma * reflected`
pub(crate) fn expansion(
    centroid: ArrayView1<f64>,
    reflected: ArrayView1<f64>,
    gamma: f64,
) -> Array1<f64> {
    (1.0 - gamma) * &centroid + gamma * &reflected
}

/// `(1 - beta) * centroid + beta * worst`
pub(crate) fn contraction(
    centroid: ArrayView1<f64>,
    worst: ArrayView1<f64>,
    beta: f64,
) -> Array1<f64> {
    (1.0 - beta) * &centroid + beta * &worst
}

/// `best + sigma * (point - best)`
pub(crate) fn shrink(best: ArrayView1<f64>, point: ArrayView1<f64>, sigma: f64) -> Array1<f64> {
    &best + &(sigma * &(&point - &best))
}
