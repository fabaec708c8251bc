use serde::{Serialize, Deserialize};

/// Sizes and initialisation of the two-linear-layer classifier.
///
/// Fields:
/// - `input_size`  — feature dimension of each example
/// - `hidden_size` — width of the sigmoid hidden layer
/// - `num_class`   — number of output classes (softmax width)
/// - `init_std`    — standard deviation of the N(0, std²) parameter init
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkSpec {
    pub input_size: usize,
    pub hidden_size: usize,
    pub num_class: usize,
    pub init_std: f64,
}

impl Default for NetworkSpec {
    fn default() -> Self {
        NetworkSpec {
            input_size: 2,
            hidden_size: 4,
            num_class: 2,
            init_std: 1.0,
        }
    }
}
