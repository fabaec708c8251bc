use rand::Rng;
use rand_distr::Distribution;

use crate::error::{NnError, Result};
use crate::math::matrix::{normal_distribution, Matrix};

/// Weights and biases of a linear softmax classifier.
///
/// The flat encoding used by the minimiser is W in row-major order followed
/// by b:
///
/// ```text
/// [ W[0,0] .. W[0,d-1], W[1,0] .. W[c-1,d-1], b[0] .. b[c-1] ]
///   \______________ c·d entries ______________/  \_ c entries _/
/// ```
///
/// where `c = num_class` and `d = feat_dim`.
#[derive(Debug, Clone, PartialEq)]
pub struct SoftmaxParams {
    /// Shape `(num_class, feat_dim)`.
    pub weights: Matrix,
    /// Length `num_class`.
    pub biases: Vec<f64>,
}

/// Length of the flat parameter vector for the given dimensions.
pub fn param_count(num_class: usize, feat_dim: usize) -> usize {
    num_class * feat_dim + num_class
}

/// Draws a flat initial vector with every entry from N(0, std²).
pub fn initial_parameters<R: Rng + ?Sized>(
    num_class: usize,
    feat_dim: usize,
    std: f64,
    rng: &mut R,
) -> Result<Vec<f64>> {
    let normal = normal_distribution(std)?;
    Ok((0..param_count(num_class, feat_dim)).map(|_| normal.sample(rng)).collect())
}

impl SoftmaxParams {
    pub fn num_class(&self) -> usize {
        self.weights.rows
    }

    pub fn feat_dim(&self) -> usize {
        self.weights.cols
    }

    pub fn from_flat(wb: &[f64], num_class: usize, feat_dim: usize) -> Result<SoftmaxParams> {
        if num_class == 0 || feat_dim == 0 {
            return Err(NnError::InvalidParameter(format!(
                "num_class ({}) and feat_dim ({}) must both be positive",
                num_class, feat_dim
            )));
        }
        let expected = param_count(num_class, feat_dim);
        if wb.len() != expected {
            return Err(NnError::ShapeMismatch {
                op: "softmax_params_from_flat",
                left: (wb.len(), 1),
                right: (expected, 1),
            });
        }
        let (w, b) = wb.split_at(num_class * feat_dim);
        let weights = Matrix {
            rows: num_class,
            cols: feat_dim,
            data: w.chunks(feat_dim).map(|row| row.to_vec()).collect(),
        };
        Ok(SoftmaxParams { weights, biases: b.to_vec() })
    }

    pub fn to_flat(&self) -> Vec<f64> {
        self.weights.data.iter()
            .flat_map(|row| row.iter().copied())
            .chain(self.biases.iter().copied())
            .collect()
    }

    /// Linear scores `x·Wᵗ + b`, shape `(n, num_class)`.
    pub fn scores(&self, x: &Matrix) -> Result<Matrix> {
        x.matmul(&self.weights.transpose())?
            .add_row_broadcast(&Matrix::row_vector(self.biases.clone()))
    }

    /// Highest-scoring class per row of `x`.
    pub fn predict(&self, x: &Matrix) -> Result<Vec<usize>> {
        Ok(self.scores(x)?.argmax_rows())
    }
}
