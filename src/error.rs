//! Error types for the ascension pipeline

use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, AscensionError>;

/// Main error type for the ascension pipeline
#[derive(Error, Debug)]
pub enum AscensionError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Data error: {0}")]
    Data(String),

    #[error("Unsupported model type: {0}")]
    UnsupportedModel(String),

    #[error("Training error: {0}")]
    Training(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Not implemented: {0}")]
    NotImplemented(&'static str),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid shape: expected {expected}, got {actual}")]
    Shape { expected: String, actual: String },

    #[error("GUI error: {0}")]
    Gui(String),
}

impl From<polars::error::PolarsError> for AscensionError {
    fn from(err: polars::error::PolarsError) -> Self {
        AscensionError::Data(err.to_string())
    }
}

impl From<serde_json::Error> for AscensionError {
    fn from(err: serde_json::Error) -> Self {
        AscensionError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AscensionError {
    fn from(err: serde_yaml::Error) -> Self {
        AscensionError::Config(err.to_string())
    }
}

impl AscensionError {
    /// Exit code reported at the CLI boundary: 2 for configuration and
    /// argument problems, 1 for everything that fails a started run.
    pub fn exit_code(&self) -> u8 {
        match self {
            AscensionError::Config(_) => 2,
            _ => 1,
        }
    }
}
