use crate::error::FeedError;
use crate::records::parse_bars;
use async_trait::async_trait;
use configuration::{FeedConfig, Lookback};
use core_types::PriceSeries;
use std::path::{Path, PathBuf};

pub mod error;
pub mod records;

/// The result of resolving a symbol against a price source.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// History was found under `symbol`, the fully resolved name (suffix included).
    Found { symbol: String, series: PriceSeries },
    /// None of the `attempted` symbol variants produced any data.
    NotFound {
        symbol: String,
        attempted: Vec<String>,
    },
}

/// The generic, abstract interface for a source of daily price history.
///
/// The analytics engines are only ever invoked with the series of a `Found` outcome.
#[async_trait]
pub trait PriceFeed: Send + Sync {
    /// Fetches the history of `symbol` covering `lookback`, counted back from its
    /// most recent bar.
    async fn fetch(&self, symbol: &str, lookback: Lookback) -> Result<FetchOutcome, FeedError>;
}

/// A `PriceFeed` reading one CSV file per instrument from a directory.
///
/// A ticker is tried with every configured market suffix in turn (for example
/// `RELIANCE.NS`, then `RELIANCE.BO`, then `RELIANCE`), and the first file holding at
/// least one bar wins. Missing or unreadable files are logged and skipped.
#[derive(Debug, Clone)]
pub struct CsvPriceFeed {
    data_dir: PathBuf,
    suffixes: Vec<String>,
}

impl CsvPriceFeed {
    pub fn new(data_dir: impl Into<PathBuf>, suffixes: Vec<String>) -> Self {
        Self {
            data_dir: data_dir.into(),
            suffixes,
        }
    }

    pub fn from_config(config: &FeedConfig) -> Self {
        Self::new(config.data_dir.clone(), config.suffixes.clone())
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn path_for(&self, symbol: &str) -> PathBuf {
        self.data_dir.join(format!("{}.csv", symbol))
    }

    /// Loads the full history of one resolved symbol. `Ok(None)` means no file.
    async fn load(&self, symbol: &str) -> Result<Option<PriceSeries>, FeedError> {
        let path = self.path_for(symbol);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let bars = parse_bars(&bytes)?;
        let series = PriceSeries::new(bars).map_err(|source| FeedError::InvalidSeries {
            symbol: symbol.to_string(),
            source,
        })?;
        Ok(Some(series))
    }
}

#[async_trait]
impl PriceFeed for CsvPriceFeed {
    async fn fetch(&self, symbol: &str, lookback: Lookback) -> Result<FetchOutcome, FeedError> {
        let base = symbol.trim().to_uppercase();
        let mut attempted = Vec::with_capacity(self.suffixes.len());

        for suffix in &self.suffixes {
            let candidate = format!("{}{}", base, suffix);
            attempted.push(candidate.clone());

            match self.load(&candidate).await {
                Ok(Some(series)) if !series.is_empty() => {
                    let series = match series.last_date().and_then(|d| lookback.start_date(d)) {
                        Some(start) => series.since(start),
                        None => series,
                    };
                    tracing::info!(
                        symbol = %candidate,
                        bars = series.len(),
                        %lookback,
                        "Loaded price history"
                    );
                    return Ok(FetchOutcome::Found {
                        symbol: candidate,
                        series,
                    });
                }
                Ok(_) => {
                    tracing::warn!(symbol = %candidate, "No price history");
                }
                Err(e @ FeedError::InvalidSeries { .. }) => return Err(e),
                Err(e) => {
                    tracing::warn!(symbol = %candidate, error = %e, "Error fetching price history");
                }
            }
        }

        tracing::warn!(symbol = %base, ?attempted, "Could not retrieve data for ticker");
        Ok(FetchOutcome::NotFound {
            symbol: base,
            attempted,
        })
    }
}
