pub mod error;
pub mod math;
pub mod metrics;
pub mod activation;
pub mod layers;
pub mod loss;
pub mod network;
pub mod optim;
pub mod train;
pub mod softmax_regression;
pub mod data;
pub mod config;

// Convenience re-exports
pub use error::{NnError, Result};
pub use math::matrix::Matrix;
pub use activation::{Sigmoid, Softmax};
pub use layers::{Layer, Linear, ParamGrads};
pub use loss::CrossEntropy;
pub use network::{ForwardPass, Network, NetworkSpec};
pub use optim::{Bfgs, Minimizer, MinimizerKind, Minimum, NelderMead, Sgd};
pub use train::{train_loop, TrainConfig, TrainHistory};
pub use config::ExperimentConfig;
