use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("External error: {0}")]
    External(#[from] anyhow::Error),
}

/// Rejections raised while reading the inbound page parameter, before any
/// storage access happens.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing required parameter `{0}`")]
    MissingParameter(&'static str),

    #[error("invalid value {value:?} for parameter `{name}`: expected a positive integer")]
    InvalidParameter { name: &'static str, value: String },
}
