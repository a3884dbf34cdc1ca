//! Engine error types.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, UnwrappedError>;

#[derive(Debug, Error)]
pub enum UnwrappedError {
    #[error("no records to aggregate")]
    EmptyInput,

    #[error("population snapshot has no usable score entries")]
    EmptyPopulation,

    #[error("malformed activation date: {0:?}")]
    MalformedDate(String),

    #[error("average is undefined: no record carries a contact count")]
    DivisionUndefined,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
