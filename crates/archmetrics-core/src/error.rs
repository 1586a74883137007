use crate::ConfigError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetricsError {
    /// Reserved: the fabricated generators accept any input string.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Only reachable if the random source itself fails.
    #[error("Internal generation failure: {0}")]
    InternalGenerationFailure(String),

    #[error("Operation cancelled: {0}")]
    Cancelled(String),

    #[error("Operation '{operation}' timed out after {limit_ms} ms")]
    Timeout { operation: String, limit_ms: u64 },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MetricsError>;
