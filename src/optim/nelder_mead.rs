use serde::{Serialize, Deserialize};
use tracing::{debug, info};

use crate::error::{NnError, Result};
use crate::optim::minimizer::{Minimizer, Minimum, Objective};

const REFLECT: f64 = 1.0;
const EXPAND: f64 = 2.0;
const CONTRACT: f64 = 0.5;
const SHRINK: f64 = 0.5;

/// Gradient-free downhill simplex minimiser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NelderMead {
    /// Simplex vertices must agree with the best one to within this, per coordinate.
    pub xatol: f64,
    /// Vertex objective values must agree with the best one to within this.
    pub fatol: f64,
    /// Iteration cap; `None` means 200 per parameter.
    pub max_iter: Option<usize>,
}

impl Default for NelderMead {
    fn default() -> Self {
        NelderMead { xatol: 1e-4, fatol: 1e-4, max_iter: None }
    }
}

struct Vertex {
    x: Vec<f64>,
    f: f64,
}

/// `c + t·(p - c)`
fn toward(c: &[f64], p: &[f64], t: f64) -> Vec<f64> {
    c.iter().zip(p.iter()).map(|(ci, pi)| ci + t * (pi - ci)).collect()
}

impl NelderMead {
    fn initial_simplex<F>(&self, obj: &Objective<F>, x0: &[f64]) -> Result<Vec<Vertex>>
    where
        F: Fn(&[f64]) -> Result<f64>,
    {
        let mut simplex = Vec::with_capacity(x0.len() + 1);
        simplex.push(Vertex { x: x0.to_vec(), f: obj.eval(x0)? });
        for i in 0..x0.len() {
            let mut x = x0.to_vec();
            x[i] = if x[i] != 0.0 { x[i] * 1.05 } else { 0.00025 };
            let f = obj.eval(&x)?;
            simplex.push(Vertex { x, f });
        }
        Ok(simplex)
    }

    fn has_converged(&self, simplex: &[Vertex]) -> bool {
        let best = &simplex[0];
        simplex[1..].iter().all(|v| {
            (v.f - best.f).abs() <= self.fatol
                && v.x.iter().zip(best.x.iter()).all(|(a, b)| (a - b).abs() <= self.xatol)
        })
    }
}

impl Minimizer for NelderMead {
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
        let mut simplex = self.initial_simplex(&obj, x0)?;
        let mut iterations = 0;
        let mut converged = false;

        loop {
            simplex.sort_by(|a, b| a.f.total_cmp(&b.f));
            debug!(iteration = iterations, best = simplex[0].f, "nelder-mead");
            if self.has_converged(&simplex) {
                converged = true;
                break;
            }
            if iterations >= max_iter {
                break;
            }
            iterations += 1;

            let mut centroid = vec![0.0; n];
            for v in &simplex[..n] {
                for (c, xi) in centroid.iter_mut().zip(v.x.iter()) {
                    *c += xi / n as f64;
                }
            }

            let worst_f = simplex[n].f;
            let second_worst_f = simplex[n - 1].f;
            let xr = toward(&centroid, &simplex[n].x, -REFLECT);
            let fr = obj.eval(&xr)?;

            let replacement = if fr < simplex[0].f {
                let xe = toward(&centroid, &xr, EXPAND);
                let fe = obj.eval(&xe)?;
                if fe < fr { Some(Vertex { x: xe, f: fe }) } else { Some(Vertex { x: xr, f: fr }) }
            } else if fr < second_worst_f {
                Some(Vertex { x: xr, f: fr })
            } else if fr < worst_f {
                let xc = toward(&centroid, &xr, CONTRACT);
                let fc = obj.eval(&xc)?;
                if fc <= fr { Some(Vertex { x: xc, f: fc }) } else { None }
            } else {
                let xcc = toward(&centroid, &simplex[n].x, CONTRACT);
                let fcc = obj.eval(&xcc)?;
                if fcc < worst_f { Some(Vertex { x: xcc, f: fcc }) } else { None }
            };

            match replacement {
                Some(v) => simplex[n] = v,
                None => {
                    let best = simplex[0].x.clone();
                    for v in simplex.iter_mut().skip(1) {
                        v.x = toward(&best, &v.x, SHRINK);
                        v.f = obj.eval(&v.x)?;
                    }
                }
            }

        }

        let best = simplex.swap_remove(0);
        info!(iterations, fun = best.f, converged, evaluations = obj.evaluations(), "nelder-mead finished");
        Ok(Minimum {
            x: best.x,
            fun: best.f,
            iterations,
            evaluations: obj.evaluations(),
            converged,
        })
    }
}
