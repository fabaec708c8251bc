use std::io::Write;

use serde::{Serialize, Deserialize};

use crate::error::Result;

/// Loss recorded at every iteration of a `train_loop` run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainHistory {
    pub losses: Vec<f64>,
}

impl TrainHistory {
    pub fn first(&self) -> Option<f64> {
        self.losses.first().copied()
    }

    pub fn last(&self) -> Option<f64> {
        self.losses.last().copied()
    }

    /// Writes the loss sequence as pretty-printed JSON, e.g. for plotting.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let mut writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }
}
