use thiserror::Error;

#[derive(Error, Debug)]
pub enum FocalError {
    #[error("Invalid array rank: expected {expected}, got {actual}")]
    Shape { expected: &'static str, actual: usize },

    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),

    #[error("Empty layer stack")]
    EmptyStack,

    #[error("Cannot split an image of height {height} into {layers} layers")]
    InvalidLayerCount { layers: usize, height: usize },
}

pub type Result<T> = std::result::Result<T, FocalError>;
