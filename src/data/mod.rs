pub mod synthetic;

pub use synthetic::{corner_probe, four_corners, gaussian_blobs, BlobConfig, ClusterConfig, Dataset};
