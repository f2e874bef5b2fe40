//! Error types for the shelf core

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ShelfError>;

#[derive(Error, Debug)]
pub enum ShelfError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Dataset unavailable: {0}")]
    DataUnavailable(String),

    #[error("Dataset error: {0}")]
    Data(#[from] DataError),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}

impl ShelfError {
    /// Returns the appropriate exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            ShelfError::InvalidQuery(_) => 3,
            ShelfError::DataUnavailable(_) => 2,
            ShelfError::Config(_) => 1,
            ShelfError::Data(_) => 1,
        }
    }

    /// Shorthand used by the filter predicates
    pub(crate) fn invalid_query(message: impl Into<String>) -> Self {
        ShelfError::InvalidQuery(message.into())
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value: {0}")]
    Invalid(String),
}

#[derive(Error, Debug)]
pub enum DataError {
    #[error("Failed to read dataset: {0}")]
    Csv(#[from] csv::Error),

    #[error("Dataset is missing required column '{0}'")]
    MissingColumn(String),
}
