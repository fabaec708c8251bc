use rand::Rng;

use crate::error::{NnError, Result};
use crate::math::matrix::Matrix;

/// Gradients of a scalar loss with respect to a linear layer's parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamGrads {
    /// Shape `(output_dim, input_dim)`.
    pub dldw: Matrix,
    /// Shape `(1, output_dim)`.
    pub dldb: Matrix,
}

/// Everything `Linear::backprop` produces for one batch.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearGrads {
    pub dldw: Matrix,
    pub dldb: Matrix,
    pub dldx: Matrix,
}

impl LinearGrads {
    pub fn into_parts(self) -> (ParamGrads, Matrix) {
        (ParamGrads { dldw: self.dldw, dldb: self.dldb }, self.dldx)
    }
}

/// Fully connected layer computing `y = x·Wᵗ + b`.
///
/// `weights` has shape `(output_dim, input_dim)`. The bias is stored as a
/// `(1, output_dim)` row so it broadcasts over the batch and lines up with the
/// shape of `dLdb`. Both are only mutated through `update_weights`.
#[derive(Debug, Clone)]
pub struct Linear {
    weights: Matrix,
    biases: Matrix,
}

impl Linear {
    /// Draws W and b from N(0, std²).
    pub fn new<R: Rng + ?Sized>(input_size: usize, output_size: usize, std: f64, rng: &mut R) -> Result<Linear> {
        let weights = Matrix::random_normal(output_size, input_size, std, rng)?;
        let biases = Matrix::random_normal(1, output_size, std, rng)?;
        Ok(Linear { weights, biases })
    }

    /// Builds a layer from explicit parameters. `biases` must be `(1, weights.rows)`.
    pub fn from_parameters(weights: Matrix, biases: Matrix) -> Result<Linear> {
        if biases.rows != 1 || biases.cols != weights.rows {
            return Err(NnError::ShapeMismatch {
                op: "linear_parameters",
                left: weights.shape(),
                right: biases.shape(),
            });
        }
        Ok(Linear { weights, biases })
    }

    pub fn input_size(&self) -> usize {
        self.weights.cols
    }

    pub fn output_size(&self) -> usize {
        self.weights.rows
    }

    pub fn weights(&self) -> &Matrix {
        &self.weights
    }

    pub fn biases(&self) -> &Matrix {
        &self.biases
    }

    /// `(B, input_dim) -> (B, output_dim)`.
    pub fn forward(&self, x: &Matrix) -> Result<Matrix> {
        x.matmul(&self.weights.transpose())?.add_row_broadcast(&self.biases)
    }

    /// `x` must be the batch that produced the forward output `dldy` refers to.
    ///
    /// - dLdW = dLdyᵗ · x
    /// - dLdb = column sum of dLdy
    /// - dLdx = dLdy · W
    pub fn backprop(&self, x: &Matrix, dldy: &Matrix) -> Result<LinearGrads> {
        if x.rows != dldy.rows {
            return Err(NnError::ShapeMismatch { op: "linear_backprop", left: x.shape(), right: dldy.shape() });
        }
        let dldw = dldy.transpose().matmul(x)?;
        let dldb = dldy.sum_rows();
        let dldx = dldy.matmul(&self.weights)?;
        Ok(LinearGrads { dldw, dldb, dldx })
    }

    /// Raw in-place addition `W += dldw`, `b += dldb`. The caller applies sign
    /// and learning rate.
    pub fn update_weights(&mut self, dldw: &Matrix, dldb: &Matrix) -> Result<()> {
        let weights = self.weights.add(dldw)?;
        let biases = self.biases.add(dldb)?;
        self.weights = weights;
        self.biases = biases;
        Ok(())
    }
}
