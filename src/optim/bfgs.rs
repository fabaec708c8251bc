use serde::{Serialize, Deserialize};
use tracing::{debug, info};

use crate::error::{NnError, Result};
use crate::math::matrix::Matrix;
use crate::optim::minimizer::{axpy, dot, Minimizer, Minimum, Objective};

const ARMIJO: f64 = 1e-4;
const MIN_STEP: f64 = 1e-12;

/// Quasi-Newton minimiser with an inverse-Hessian BFGS update.
///
/// Gradients are central finite differences of the objective, so any
/// `Fn(&[f64]) -> Result<f64>` can be minimised. Each step uses a
/// backtracking line search on the Armijo condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bfgs {
    /// Stop once the largest gradient component is at most this.
    pub gtol: f64,
    /// Iteration cap; `None` means 200 per parameter.
    pub max_iter: Option<usize>,
    /// Relative finite-difference step.
    pub step: f64,
}

impl Default for Bfgs {
    fn default() -> Self {
        Bfgs { gtol: 1e-5, max_iter: None, step: 1e-6 }
    }
}

impl Bfgs {
    fn gradient<F>(&self, obj: &Objective<F>, x: &[f64]) -> Result<Vec<f64>>
    where
        F: Fn(&[f64]) -> Result<f64>,
    {
        let mut probe = x.to_vec();
        let mut grad = vec![0.0; x.len()];
        for i in 0..x.len() {
            let h = self.step * x[i].abs().max(1.0);
            probe[i] = x[i] + h;
            let plus = obj.eval(&probe)?;
            probe[i] = x[i] - h;
            let minus = obj.eval(&probe)?;
            probe[i] = x[i];
            grad[i] = (plus - minus) / (2.0 * h);
        }
        Ok(grad)
    }
}

impl Minimizer for Bfgs {
    fn minimize<F>(&self, f: F, x0: &[f64]) -> Result<Minimum>
    where
        F: Fn(&[f64]) -> Result<f64>,
    {
        let n = x0.len();
        if n == 0 {
            return Err(NnError::InvalidParameter("cannot minimise over an empty vector".into()));
        }
        let max_iter = self.max_iter.unwrap_or(200 * n);
        let obj = Objective::new(f);

        let mut x = x0.to_vec();
        let mut fx = obj.eval(&x)?;
        let mut g = self.gradient(&obj, &x)?;
        let mut h = Matrix::identity(n);
        let mut iterations = 0;
        let mut converged = false;

        while iterations < max_iter {
            if g.iter().fold(0.0_f64, |m, v| m.max(v.abs())) <= self.gtol {
                converged = true;
                break;
            }
            iterations += 1;

            let mut p: Vec<f64> = h.data.iter().map(|row| -dot(row, &g)).collect();
            let mut slope = dot(&g, &p);
            if !(slope < 0.0) {
                // Not a descent direction; restart from steepest descent.
                h = Matrix::identity(n);
                p = g.iter().map(|v| -v).collect();
                slope = dot(&g, &p);
            }

            let mut alpha = 1.0;
            let mut accepted = None;
            while alpha >= MIN_STEP {
                let candidate = axpy(&x, alpha, &p);
                let f_new = obj.eval(&candidate)?;
                if f_new <= fx + ARMIJO * alpha * slope {
                    accepted = Some((candidate, f_new));
                    break;
                }
                alpha *= 0.5;
            }
            let Some((x_new, f_new)) = accepted else {
                info!(iterations, fun = fx, "bfgs line search made no progress");
                break;
            };

            let g_new = self.gradient(&obj, &x_new)?;
            let s: Vec<f64> = x_new.iter().zip(x.iter()).map(|(a, b)| a - b).collect();
            let y: Vec<f64> = g_new.iter().zip(g.iter()).map(|(a, b)| a - b).collect();
            let sy = dot(&s, &y);
            if sy > 1e-12 {
                // H ← (I - ρsyᵗ) H (I - ρysᵗ) + ρssᵗ, expanded for symmetric H.
                let rho = 1.0 / sy;
                let hy: Vec<f64> = h.data.iter().map(|row| dot(row, &y)).collect();
                let yhy = dot(&y, &hy);
                let c = rho * rho * yhy + rho;
                for i in 0..n {
                    for j in 0..n {
                        h.data[i][j] += -rho * (hy[i] * s[j] + s[i] * hy[j]) + c * s[i] * s[j];
                    }
                }
            }

            debug!(iteration = iterations, fun = f_new, step = alpha, "bfgs");
            x = x_new;
            fx = f_new;
            g = g_new;
        }

        info!(iterations, fun = fx, converged, evaluations = obj.evaluations(), "bfgs finished");
        Ok(Minimum {
            x,
            fun: fx,
            iterations,
            evaluations: obj.evaluations(),
            converged,
        })
    }
}
