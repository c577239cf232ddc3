use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Failed to read price history: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse price history: {0}")]
    Csv(#[from] csv::Error),

    #[error("Price history for {symbol} violates the series contract: {source}")]
    InvalidSeries {
        symbol: String,
        #[source]
        source: CoreError,
    },
}
