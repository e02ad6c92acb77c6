use crate::model::ProductId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StockError {
    #[error("Product not found: {0}")]
    NotFound(ProductId),

    #[error("Invalid file format: {0}")]
    InvalidFormat(String),

    #[error("Stored inventory is corrupt: {0}")]
    CorruptState(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Store error: {0}")]
    Store(String),
}

pub type Result<T> = std::result::Result<T, StockError>;
