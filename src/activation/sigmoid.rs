use crate::error::Result;
use crate::math::matrix::Matrix;

/// Element-wise logistic activation. Stateless.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sigmoid;

/// Logistic function evaluated without overflowing `exp` for large |x|.
pub fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

impl Sigmoid {
    pub fn forward(&self, x: &Matrix) -> Matrix {
        x.map(sigmoid)
    }

    /// dLdx = dLdy ⊙ s ⊙ (1 - s), where s is recomputed from the
    /// pre-activation `x`.
    pub fn backprop(&self, x: &Matrix, dldy: &Matrix) -> Result<Matrix> {
        let local = x.map(|v| {
            let s = sigmoid(v);
            s * (1.0 - s)
        });
        dldy.hadamard(&local)
    }
}
