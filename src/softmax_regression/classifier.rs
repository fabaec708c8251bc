use crate::error::{NnError, Result};
use crate::math::matrix::Matrix;
use crate::metrics;
use crate::optim::minimizer::{Minimizer, Minimum};
use crate::softmax_regression::params::{param_count, SoftmaxParams};

/// Mean negative log-likelihood of the true class under softmax of the
/// linear scores encoded by the flat vector `wb`.
///
/// Each term is evaluated as `logsumexp(s_i) - s_i[y_i]`, which equals
/// `-log(exp(s_i[y_i]) / Σ_j exp(s_i[j]))` without overflowing.
///
/// # Panics
/// Panics if a label is not in `[0, num_class)`.
pub fn cross_entropy_softmax_loss(wb: &[f64], x: &Matrix, labels: &[usize], num_class: usize) -> Result<f64> {
    let params = SoftmaxParams::from_flat(wb, num_class, x.cols)?;
    check_labels(x, labels)?;
    if x.rows == 0 {
        return Ok(0.0);
    }
    let scores = params.scores(x)?;
    let total: f64 = scores.data.iter()
        .zip(labels.iter())
        .map(|(s, &y)| {
            let max = s.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            let lse = max + s.iter().map(|v| (v - max).exp()).sum::<f64>().ln();
            lse - s[y]
        })
        .sum();
    Ok(total / x.rows as f64)
}

/// Fraction of rows of `x` whose argmax score matches the label.
pub fn linear_classifier_accuracy(wb: &[f64], x: &Matrix, labels: &[usize], num_class: usize) -> Result<f64> {
    let params = SoftmaxParams::from_flat(wb, num_class, x.cols)?;
    metrics::accuracy(&params.predict(x)?, labels)
}

/// A trained classifier and the minimiser's report.
#[derive(Debug, Clone)]
pub struct SoftmaxFit {
    pub params: SoftmaxParams,
    pub minimum: Minimum,
}

/// Minimises `cross_entropy_softmax_loss` over the training set starting
/// from the flat vector `w0`.
pub fn train_softmax_classifier<M: Minimizer>(
    minimizer: &M,
    w0: &[f64],
    x: &Matrix,
    labels: &[usize],
    num_class: usize,
) -> Result<SoftmaxFit> {
    let expected = param_count(num_class, x.cols);
    if w0.len() != expected {
        return Err(NnError::ShapeMismatch {
            op: "train_softmax_classifier",
            left: (w0.len(), 1),
            right: (expected, 1),
        });
    }
    check_labels(x, labels)?;

    let minimum = minimizer.minimize(|wb| cross_entropy_softmax_loss(wb, x, labels, num_class), w0)?;
    let params = SoftmaxParams::from_flat(&minimum.x, num_class, x.cols)?;
    Ok(SoftmaxFit { params, minimum })
}

fn check_labels(x: &Matrix, labels: &[usize]) -> Result<()> {
    if x.rows != labels.len() {
        return Err(NnError::ShapeMismatch {
            op: "softmax_regression_labels",
            left: x.shape(),
            right: (labels.len(), 1),
        });
    }
    Ok(())
}
