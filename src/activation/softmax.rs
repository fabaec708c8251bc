use crate::error::{NnError, Result};
use crate::math::matrix::Matrix;

/// Row-wise softmax over a `(B, num_class)` batch. Stateless.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Softmax;

/// Softmax of a single row. The row maximum is subtracted before `exp`, which
/// leaves the result unchanged.
pub fn softmax_row(row: &[f64]) -> Vec<f64> {
    let max = row.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = row.iter().map(|&v| (v - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

impl Softmax {
    pub fn forward(&self, x: &Matrix) -> Matrix {
        Matrix {
            rows: x.rows,
            cols: x.cols,
            data: x.data.iter().map(|row| softmax_row(row)).collect(),
        }
    }

    /// Per example i: J_i = diag(y_i) - y_i·y_iᵗ and dLdx_i = J_iᵗ · dLdy_i.
    pub fn backprop(&self, x: &Matrix, dldy: &Matrix) -> Result<Matrix> {
        if x.shape() != dldy.shape() {
            return Err(NnError::ShapeMismatch { op: "softmax_backprop", left: x.shape(), right: dldy.shape() });
        }
        let y = self.forward(x);
        let mut dldx = Matrix::zeros(x.rows, x.cols);

        for i in 0..x.rows {
            let jacobian = row_jacobian(y.row(i));
            let upstream = Matrix::row_vector(dldy.row(i).to_vec());
            // (J_iᵗ · g)ᵗ = gᵗ · J_i
            let grad = upstream.matmul(&jacobian)?;
            dldx.data[i] = grad.data[0].clone();
        }

        Ok(dldx)
    }
}

/// Jacobian of softmax at output `y`: ∂y_a/∂x_b = y_a(δ_ab - y_b).
fn row_jacobian(y: &[f64]) -> Matrix {
    let n = y.len();
    let mut j = Matrix::zeros(n, n);
    for a in 0..n {
        for b in 0..n {
            let delta = if a == b { y[a] } else { 0.0 };
            j.data[a][b] = delta - y[a] * y[b];
        }
    }
    j
}
