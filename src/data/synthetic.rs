use std::f64::consts::PI;

use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Serialize, Deserialize};

use crate::error::{NnError, Result};
use crate::math::matrix::{normal_distribution, Matrix};

/// Labelled points, one example per row of `points`.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub points: Matrix,
    pub labels: Vec<usize>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn num_features(&self) -> usize {
        self.points.cols
    }
}

/// Distance of each blob centre from the origin.
pub const BLOB_RADIUS: f64 = 5.0;

/// Four-corner (XOR-style) data used by the two-layer network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    /// Training samples drawn around each of the four corners.
    pub points_per_cluster: usize,
    /// Standard deviation of the training scatter.
    pub sigma: f64,
    /// Standard deviation of the test probes.
    pub test_sigma: f64,
    /// Number of four-sample test probes.
    pub test_rounds: usize,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        ClusterConfig {
            points_per_cluster: 5,
            sigma: 0.05,
            test_sigma: 0.01,
            test_rounds: 100,
        }
    }
}

/// Radially placed Gaussian blobs used by the softmax-regression trainer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlobConfig {
    pub num_class: usize,
    /// Standard deviation of the scatter around each centre.
    pub sigma: f64,
    /// Training set size; defaults to 100 per class for 4 classes, otherwise 300.
    pub n_train: Option<usize>,
    /// Test set size; defaults to 100 for 4 classes, otherwise 60.
    pub n_test: Option<usize>,
}

impl Default for BlobConfig {
    fn default() -> Self {
        BlobConfig {
            num_class: 4,
            sigma: 1.0,
            n_train: None,
            n_test: None,
        }
    }
}

impl BlobConfig {
    pub fn train_size(&self) -> usize {
        self.n_train.unwrap_or(if self.num_class == 4 { 400 } else { 300 })
    }

    pub fn test_size(&self) -> usize {
        self.n_test.unwrap_or(if self.num_class == 4 { 100 } else { 60 })
    }
}

fn sample_around<R: Rng + ?Sized>(center: (f64, f64), noise: &Normal<f64>, rng: &mut R) -> Vec<f64> {
    vec![center.0 + noise.sample(rng), center.1 + noise.sample(rng)]
}

fn from_samples(samples: Vec<(Vec<f64>, usize)>) -> Result<Dataset> {
    let (rows, labels): (Vec<_>, Vec<_>) = samples.into_iter().unzip();
    Ok(Dataset { points: Matrix::from_data(rows)?, labels })
}

/// `points_per_cluster` samples around each of (0,0) and (1,1) labelled 0,
/// then (0,1) and (1,0) labelled 1, stacked in that order.
pub fn four_corners<R: Rng + ?Sized>(points_per_cluster: usize, sigma: f64, rng: &mut R) -> Result<Dataset> {
    let noise = normal_distribution(sigma)?;
    let corners = [((0.0, 0.0), 0), ((1.0, 1.0), 0), ((0.0, 1.0), 1), ((1.0, 0.0), 1)];
    let samples = corners.iter()
        .flat_map(|&(center, label)| {
            (0..points_per_cluster).map(move |_| (center, label))
        })
        .map(|(center, label)| (sample_around(center, &noise, &mut *rng), label))
        .collect();
    from_samples(samples)
}

/// One sample near each of (1,1), (0,0), (1,0), (0,1), with labels
/// `[0, 0, 1, 1]`.
pub fn corner_probe<R: Rng + ?Sized>(sigma: f64, rng: &mut R) -> Result<Dataset> {
    let noise = normal_distribution(sigma)?;
    let corners = [((1.0, 1.0), 0), ((0.0, 0.0), 0), ((1.0, 0.0), 1), ((0.0, 1.0), 1)];
    let samples = corners.iter()
        .map(|&(center, label)| (sample_around(center, &noise, &mut *rng), label))
        .collect();
    from_samples(samples)
}

/// `number` 2-D points split as evenly as possible over `num_class` classes.
/// Class `k` is centred at angle `2πk / num_class` on a circle of radius
/// `BLOB_RADIUS`.
pub fn gaussian_blobs<R: Rng + ?Sized>(
    number: usize,
    num_class: usize,
    sigma: f64,
    rng: &mut R,
) -> Result<Dataset> {
    if num_class == 0 {
        return Err(NnError::InvalidParameter("num_class must be at least 1".into()));
    }
    let noise = normal_distribution(sigma)?;
    let mut samples = Vec::with_capacity(number);
    for k in 0..num_class {
        let count = number / num_class + usize::from(k < number % num_class);
        let angle = 2.0 * PI * k as f64 / num_class as f64;
        let center = (BLOB_RADIUS * angle.cos(), BLOB_RADIUS * angle.sin());
        for _ in 0..count {
            samples.push((sample_around(center, &noise, rng), k));
        }
    }
    from_samples(samples)
}
