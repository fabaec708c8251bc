use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Serialize, Deserialize};

use crate::error::{NnError, Result};

/// N(0, std²), rejecting a negative or non-finite `std`.
///
/// `Normal::new` on its own accepts a negative deviation.
pub fn normal_distribution(std: f64) -> Result<Normal<f64>> {
    if !(std >= 0.0 && std.is_finite()) {
        return Err(NnError::InvalidParameter(format!(
            "standard deviation must be finite and non-negative, got {}",
            std
        )));
    }
    Normal::new(0.0, std).map_err(|e| NnError::InvalidParameter(format!("standard deviation {}: {}", std, e)))
}

/// Dense row-major matrix of `f64`.
///
/// Batches are laid out one example per row, so an activation batch has shape
/// `(batch_size, feature_dim)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix{
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<f64>>
}

impl Matrix{
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix{
            rows,
            cols,
            data: vec![vec![0.0; cols]; rows]
        }
    }

    pub fn identity(n: usize) -> Matrix {
        let mut res = Matrix::zeros(n, n);
        for i in 0..n {
            res.data[i][i] = 1.0;
        }
        res
    }

    /// Builds a matrix from nested rows. Every row must have the same length.
    pub fn from_data(data: Vec<Vec<f64>>) -> Result<Matrix> {
        let cols = data.first().map_or(0, |row| row.len());
        if let Some(bad) = data.iter().find(|row| row.len() != cols) {
            return Err(NnError::InvalidParameter(format!(
                "ragged matrix data: expected rows of length {}, found one of length {}",
                cols,
                bad.len()
            )));
        }
        Ok(Matrix {
            rows: data.len(),
            cols,
            data
        })
    }

    /// A single-row matrix of shape `(1, values.len())`.
    pub fn row_vector(values: Vec<f64>) -> Matrix {
        Matrix {
            rows: 1,
            cols: values.len(),
            data: vec![values]
        }
    }

    /// Samples every entry from N(0, std²).
    pub fn random_normal<R: Rng + ?Sized>(rows: usize, cols: usize, std: f64, rng: &mut R) -> Result<Matrix> {
        let normal = normal_distribution(std)?;
        let mut res = Matrix::zeros(rows, cols);

        for i in 0..rows {
            for j in 0..cols {
                res.data[i][j] = normal.sample(rng);
            }
        }

        Ok(res)
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row][col]
    }

    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row]
    }

    pub fn transpose(&self) -> Matrix {
        let mut res = Matrix::zeros(self.cols, self.rows);

        for i in 0..res.rows {
            for j in 0..res.cols {
                res.data[i][j] = self.data[j][i];
            }
        }

        res
    }

    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter()
                .map(|row| row.iter().map(|&x| functor(x)).collect())
                .collect()
        }
    }

    pub fn scale(&self, factor: f64) -> Matrix {
        self.map(|x| x * factor)
    }

    /// Matrix product `self · rhs`.
    pub fn matmul(&self, rhs: &Matrix) -> Result<Matrix> {
        if self.cols != rhs.rows {
            return Err(self.mismatch("matmul", rhs));
        }

        let mut res = Matrix::zeros(self.rows, rhs.cols);

        for i in 0..res.rows {
            for k in 0..self.cols {
                let a = self.data[i][k];
                for j in 0..res.cols {
                    res.data[i][j] += a * rhs.data[k][j];
                }
            }
        }

        Ok(res)
    }

    pub fn add(&self, rhs: &Matrix) -> Result<Matrix> {
        self.zip_with("add", rhs, |a, b| a + b)
    }

    pub fn sub(&self, rhs: &Matrix) -> Result<Matrix> {
        self.zip_with("sub", rhs, |a, b| a - b)
    }

    /// Element-wise (Hadamard) product of two same-shape matrices.
    pub fn hadamard(&self, rhs: &Matrix) -> Result<Matrix> {
        self.zip_with("hadamard", rhs, |a, b| a * b)
    }

    /// Adds the `(1, cols)` row `bias` to every row of `self`.
    pub fn add_row_broadcast(&self, bias: &Matrix) -> Result<Matrix> {
        if bias.rows != 1 || bias.cols != self.cols {
            return Err(self.mismatch("add_row_broadcast", bias));
        }
        let b = &bias.data[0];
        Ok(Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter()
                .map(|row| row.iter().zip(b.iter()).map(|(x, y)| x + y).collect())
                .collect()
        })
    }

    /// Sums over the batch axis, giving a `(1, cols)` row.
    pub fn sum_rows(&self) -> Matrix {
        let mut sums = vec![0.0; self.cols];
        for row in &self.data {
            for (s, x) in sums.iter_mut().zip(row.iter()) {
                *s += x;
            }
        }
        Matrix::row_vector(sums)
    }

    /// Column index of the largest entry in each row.
    pub fn argmax_rows(&self) -> Vec<usize> {
        self.data.iter().map(|row| crate::metrics::argmax(row)).collect()
    }

    fn zip_with<F>(&self, op: &'static str, rhs: &Matrix, f: F) -> Result<Matrix>
    where
        F: Fn(f64, f64) -> f64,
    {
        if self.rows != rhs.rows || self.cols != rhs.cols {
            return Err(self.mismatch(op, rhs));
        }
        Ok(Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().zip(rhs.data.iter())
                .map(|(row_a, row_b)| {
                    row_a.iter().zip(row_b.iter()).map(|(&a, &b)| f(a, b)).collect()
                })
                .collect()
        })
    }

    fn mismatch(&self, op: &'static str, rhs: &Matrix) -> NnError {
        NnError::ShapeMismatch { op, left: self.shape(), right: rhs.shape() }
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Matrix { rows: 0, cols: 0, data: vec![] }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn m(data: Vec<Vec<f64>>) -> Matrix {
        Matrix::from_data(data).unwrap()
    }

    #[test]
    fn matmul_matches_hand_computation() {
        let a = m(vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
        let b = m(vec![vec![5.0, 6.0], vec![7.0, 8.0]]);
        assert_eq!(a.matmul(&b).unwrap(), m(vec![vec![19.0, 22.0], vec![43.0, 50.0]]));
    }

    #[test]
    fn matmul_rejects_inner_dimension_mismatch() {
        let a = Matrix::zeros(2, 3);
        let b = Matrix::zeros(2, 3);
        match a.matmul(&b) {
            Err(NnError::ShapeMismatch { op, left, right }) => {
                assert_eq!(op, "matmul");
                assert_eq!(left, (2, 3));
                assert_eq!(right, (2, 3));
            }
            other => panic!("expected shape mismatch, got {:?}", other),
        }
    }

    #[test]
    fn ragged_rows_are_rejected() {
        assert!(Matrix::from_data(vec![vec![1.0, 2.0], vec![3.0]]).is_err());
    }

    #[test]
    fn broadcast_adds_bias_to_each_row() {
        let x = m(vec![vec![1.0, 1.0], vec![2.0, 2.0]]);
        let b = Matrix::row_vector(vec![0.5, -1.0]);
        assert_eq!(x.add_row_broadcast(&b).unwrap(), m(vec![vec![1.5, 0.0], vec![2.5, 1.0]]));
        assert!(x.add_row_broadcast(&Matrix::row_vector(vec![1.0])).is_err());
    }

    #[test]
    fn sum_rows_collapses_batch_axis() {
        let x = m(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]);
        assert_eq!(x.sum_rows(), Matrix::row_vector(vec![5.0, 7.0, 9.0]));
    }

    #[test]
    fn random_normal_rejects_negative_std() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(Matrix::random_normal(2, 2, -1.0, &mut rng).is_err());
        assert!(Matrix::random_normal(2, 2, f64::NAN, &mut rng).is_err());
        assert!(Matrix::random_normal(2, 2, f64::INFINITY, &mut rng).is_err());
        assert!(Matrix::random_normal(2, 2, 0.0, &mut rng).is_ok());
        let w = Matrix::random_normal(3, 2, 1.0, &mut rng).unwrap();
        assert_eq!(w.shape(), (3, 2));
    }
}
