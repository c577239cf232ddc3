use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration from file: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation error: {0}")]
    ValidationError(String),

    #[error("Unknown lookback period '{0}' (expected one of 1mo, 3mo, 6mo, 1y, 2y, 5y, max)")]
    UnknownLookback(String),
}
