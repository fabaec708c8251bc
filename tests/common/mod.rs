#![allow(dead_code)]

use ferrite_backprop::Matrix;
use rand::rngs::StdRng;
use rand::SeedableRng;

pub const FD_EPS: f64 = 1e-6;
pub const GRAD_TOL: f64 = 1e-6;

pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

pub fn matrix(data: Vec<Vec<f64>>) -> Matrix {
    Matrix::from_data(data).unwrap()
}

pub fn random_matrix(rows: usize, cols: usize, rng: &mut StdRng) -> Matrix {
    Matrix::random_normal(rows, cols, 1.0, rng).unwrap()
}

/// Σ a ⊙ g, the scalar whose gradient with respect to `a` is `g`.
pub fn weighted_sum(a: &Matrix, g: &Matrix) -> f64 {
    a.hadamard(g).unwrap().data.iter().flatten().sum()
}

/// Central finite-difference gradient of `f` at `x`.
pub fn numerical_gradient<F: Fn(&Matrix) -> f64>(f: F, x: &Matrix) -> Matrix {
    let mut grad = Matrix::zeros(x.rows, x.cols);
    for i in 0..x.rows {
        for j in 0..x.cols {
            let mut plus = x.clone();
            plus.data[i][j] += FD_EPS;
            let mut minus = x.clone();
            minus.data[i][j] -= FD_EPS;
            grad.data[i][j] = (f(&plus) - f(&minus)) / (2.0 * FD_EPS);
        }
    }
    grad
}

pub fn assert_matrix_close(actual: &Matrix, expected: &Matrix, tol: f64) {
    assert_eq!(actual.shape(), expected.shape(), "shape differs");
    for i in 0..actual.rows {
        for j in 0..actual.cols {
            let (a, e) = (actual.data[i][j], expected.data[i][j]);
            assert!(
                (a - e).abs() <= tol,
                "entry ({}, {}) differs: actual {} expected {} (tol {})",
                i, j, a, e, tol
            );
        }
    }
}
