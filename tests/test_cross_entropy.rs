// Tests for the cross-entropy loss root.

mod common;

use approx::assert_relative_eq;
use common::*;
use ferrite_backprop::{CrossEntropy, Matrix, NnError};

#[test]
fn loss_matches_hand_computation() {
    let x = matrix(vec![vec![0.7, 0.3], vec![0.4, 0.6]]);
    let loss = CrossEntropy.forward(&x, &[0, 1]).unwrap();
    let expected = -(0.7f64.ln() + 0.6f64.ln()) / 2.0;
    assert_relative_eq!(loss, expected, max_relative = 1e-12);
    assert_relative_eq!(loss, 0.433750, epsilon = 1e-6);
}

#[test]
fn loss_is_finite_for_zero_probability() {
    let x = matrix(vec![vec![0.0, 1.0]]);
    let loss = CrossEntropy.forward(&x, &[0]).unwrap();
    assert!(loss.is_finite());
    assert_relative_eq!(loss, -(1e-15f64).ln(), max_relative = 1e-12);
}

#[test]
fn loss_is_never_negative() {
    let mut rng = rng(31);
    let probs = ferrite_backprop::Softmax.forward(&random_matrix(8, 3, &mut rng));
    let labels = [0, 1, 2, 0, 1, 2, 0, 1];
    assert!(CrossEntropy.forward(&probs, &labels).unwrap() >= 0.0);
}

#[test]
fn gradient_only_touches_true_class_and_is_batch_averaged() {
    let x = matrix(vec![vec![0.7, 0.3], vec![0.4, 0.6]]);
    let dldx = CrossEntropy.backprop(&x, &[0, 1]).unwrap();
    assert_relative_eq!(dldx.get(0, 0), -1.0 / 0.7 / 2.0);
    assert_eq!(dldx.get(0, 1), 0.0);
    assert_eq!(dldx.get(1, 0), 0.0);
    assert_relative_eq!(dldx.get(1, 1), -1.0 / 0.6 / 2.0);
}

#[test]
fn gradient_matches_finite_differences() {
    let mut rng = rng(32);
    let x = ferrite_backprop::Softmax.forward(&random_matrix(4, 3, &mut rng));
    let labels = [2, 0, 1, 1];
    let analytic = CrossEntropy.backprop(&x, &labels).unwrap();
    let numeric = numerical_gradient(|x| CrossEntropy.forward(x, &labels).unwrap(), &x);
    assert_matrix_close(&analytic, &numeric, 1e-5);
}

#[test]
fn label_count_must_match_batch() {
    let x = Matrix::zeros(3, 2);
    assert!(matches!(CrossEntropy.forward(&x, &[0, 1]), Err(NnError::ShapeMismatch { .. })));
    assert!(matches!(CrossEntropy.backprop(&x, &[0]), Err(NnError::ShapeMismatch { .. })));
}
