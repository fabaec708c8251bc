pub mod bfgs;
pub mod minimizer;
pub mod nelder_mead;
pub mod sgd;

pub use bfgs::Bfgs;
pub use minimizer::{Minimizer, MinimizerKind, Minimum};
pub use nelder_mead::NelderMead;
pub use sgd::Sgd;
