use crate::error::{NnError, Result};
use crate::math::matrix::Matrix;

/// Categorical cross-entropy over softmax probabilities and integer labels.
///
/// This is the root of the backward pass: it has no upstream gradient.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrossEntropy;

/// Added inside log() to prevent log(0) = -inf.
pub const EPS: f64 = 1e-15;

impl CrossEntropy {
    /// mean_i -log(x[i, y_i] + ε)
    ///
    /// # Panics
    /// Panics if a label is not a valid column index of `x`.
    pub fn forward(&self, x: &Matrix, labels: &[usize]) -> Result<f64> {
        check_batch(x, labels)?;
        if x.rows == 0 {
            return Ok(0.0);
        }
        let total: f64 = labels.iter()
            .enumerate()
            .map(|(i, &y)| -(x.data[i][y] + EPS).ln())
            .sum();
        Ok(total / x.rows as f64)
    }

    /// Gradient of the mean loss with respect to `x`: zero except
    /// dLdx[i, y_i] = -1 / (B · x[i, y_i]).
    ///
    /// # Panics
    /// Panics if a label is not a valid column index of `x`.
    pub fn backprop(&self, x: &Matrix, labels: &[usize]) -> Result<Matrix> {
        check_batch(x, labels)?;
        let batch = x.rows as f64;
        let mut dldx = Matrix::zeros(x.rows, x.cols);
        for (i, &y) in labels.iter().enumerate() {
            dldx.data[i][y] = -1.0 / x.data[i][y] / batch;
        }
        Ok(dldx)
    }
}

fn check_batch(x: &Matrix, labels: &[usize]) -> Result<()> {
    if x.rows != labels.len() {
        return Err(NnError::ShapeMismatch {
            op: "cross_entropy",
            left: x.shape(),
            right: (labels.len(), 1),
        });
    }
    Ok(())
}
