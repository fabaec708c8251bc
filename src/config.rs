use std::io::Write;

use serde::{Serialize, Deserialize};

use crate::data::synthetic::{BlobConfig, ClusterConfig};
use crate::error::Result;
use crate::network::spec::NetworkSpec;
use crate::optim::bfgs::Bfgs;
use crate::optim::minimizer::MinimizerKind;
use crate::optim::nelder_mead::NelderMead;
use crate::train::train_config::TrainConfig;

/// Every tunable of both experiments. All fields default, so a JSON file only
/// needs the values it overrides, e.g.
///
/// ```json
/// { "train": { "learning_rate": 0.5, "iterations": 10000 }, "minimizer": "nelder_mead" }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    pub network: NetworkSpec,
    pub train: TrainConfig,
    pub clusters: ClusterConfig,
    pub blobs: BlobConfig,
    pub minimizer: MinimizerKind,
    pub bfgs: Bfgs,
    pub nelder_mead: NelderMead,
    /// Standard deviation of the softmax-regression initial vector.
    pub softmax_init_std: Option<f64>,
}

impl ExperimentConfig {
    pub fn softmax_init_std(&self) -> f64 {
        self.softmax_init_std.unwrap_or(1.0)
    }

    /// Serializes the config to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let mut writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    /// Deserializes a config from a JSON file; missing fields take defaults.
    pub fn load_json(path: &str) -> Result<ExperimentConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}
