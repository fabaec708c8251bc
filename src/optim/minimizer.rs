use std::cell::Cell;

use serde::{Serialize, Deserialize};

use crate::error::Result;

/// Outcome of a minimisation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Minimum {
    /// Best parameter vector found. Same layout as the initial vector.
    pub x: Vec<f64>,
    /// Objective value at `x`.
    pub fun: f64,
    pub iterations: usize,
    /// Number of objective evaluations, finite-difference probes included.
    pub evaluations: usize,
    /// Whether the convergence tolerance was met before `max_iter`.
    pub converged: bool,
}

/// A general-purpose minimiser of a scalar function of one flat vector.
///
/// Extra arguments of the objective are captured by the closure.
pub trait Minimizer {
    fn minimize<F>(&self, f: F, x0: &[f64]) -> Result<Minimum>
    where
        F: Fn(&[f64]) -> Result<f64>;
}

/// Which minimiser a caller wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MinimizerKind {
    #[default]
    Bfgs,
    NelderMead,
}

/// Objective wrapper that counts evaluations.
pub(crate) struct Objective<F> {
    f: F,
    evaluations: Cell<usize>,
}

impl<F> Objective<F>
where
    F: Fn(&[f64]) -> Result<f64>,
{
    pub(crate) fn new(f: F) -> Self {
        Objective { f, evaluations: Cell::new(0) }
    }

    pub(crate) fn eval(&self, x: &[f64]) -> Result<f64> {
        self.evaluations.set(self.evaluations.get() + 1);
        (self.f)(x)
    }

    pub(crate) fn evaluations(&self) -> usize {
        self.evaluations.get()
    }
}

pub(crate) fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// `a + t·b`
pub(crate) fn axpy(a: &[f64], t: f64, b: &[f64]) -> Vec<f64> {
    a.iter().zip(b.iter()).map(|(x, y)| x + t * y).collect()
}
