use thiserror::Error;

/// Errors produced by the matrix algebra, layers and trainers.
#[derive(Debug, Error)]
pub enum NnError {
    /// Two operands of `op` disagree on shape. Shapes are `(rows, cols)`.
    #[error("shape mismatch in {op}: left is {left:?}, right is {right:?}")]
    ShapeMismatch {
        op: &'static str,
        left: (usize, usize),
        right: (usize, usize),
    },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, NnError>;
