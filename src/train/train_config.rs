use serde::{Serialize, Deserialize};

/// Configuration for a `train_loop` run.
///
/// # Fields
/// - `iterations`    — number of full-batch gradient-descent steps
/// - `learning_rate` — step size passed to `Sgd`
/// - `log_every`     — emit an `info` log line every this many iterations
///                     (`0` disables periodic logging)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    pub iterations: usize,
    pub learning_rate: f64,
    pub log_every: usize,
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig {
            iterations: 50_000,
            learning_rate: 0.01,
            log_every: 2_000,
        }
    }
}

impl TrainConfig {
    pub fn new(iterations: usize, learning_rate: f64) -> Self {
        TrainConfig {
            iterations,
            learning_rate,
            ..TrainConfig::default()
        }
    }
}
