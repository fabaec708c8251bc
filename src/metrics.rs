use crate::error::{NnError, Result};

/// Index of the maximum element in a slice. Ties resolve to the first index;
/// an empty slice yields 0.
pub fn argmax(v: &[f64]) -> usize {
    v.iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (i, &x)| match best {
            Some((_, b)) if b >= x => best,
            _ => Some((i, x)),
        })
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Fraction of predictions that exactly match the ground-truth labels.
pub fn accuracy(predicted: &[usize], labels: &[usize]) -> Result<f64> {
    if predicted.len() != labels.len() {
        return Err(NnError::ShapeMismatch {
            op: "accuracy",
            left: (predicted.len(), 1),
            right: (labels.len(), 1),
        });
    }
    if labels.is_empty() {
        return Ok(0.0);
    }
    let correct = predicted.iter().zip(labels.iter()).filter(|(p, y)| p == y).count();
    Ok(correct as f64 / labels.len() as f64)
}
