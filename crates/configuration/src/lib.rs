use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{AnalysisConfig, FeedConfig, IndicatorParams, Lookback, PerformanceParams};

/// Loads the analysis configuration.
///
/// Reads `path` when given (it must exist), otherwise an optional `stockscope.toml` in
/// the working directory. Environment variables prefixed with `STOCKSCOPE__` override
/// file values, e.g. `STOCKSCOPE__FEED__DATA_DIR=/srv/prices`. The result is validated
/// before it is returned.
pub fn load_config(path: Option<&Path>) -> Result<AnalysisConfig, ConfigError> {
    let file = match path {
        Some(path) => config::File::from(path).required(true),
        None => config::File::with_name("stockscope").required(false),
    };

    let builder = config::Config::builder()
        .add_source(file)
        .add_source(
            config::Environment::with_prefix("STOCKSCOPE")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `AnalysisConfig` struct
    let config = builder.try_deserialize::<AnalysisConfig>()?;
    config.validate()?;

    tracing::debug!(?config, "Loaded configuration");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_from_file_with_partial_sections() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[indicators]\nrsi_period = 10\n\n[feed]\ndata_dir = \"prices\"\nlookback = \"6mo\""
        )
        .unwrap();

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.indicators.rsi_period, 10);
        assert_eq!(config.indicators.sma_long, 50);
        assert_eq!(config.feed.data_dir, Path::new("prices"));
        assert_eq!(config.feed.lookback, Lookback::SixMonths);
        assert_eq!(config.performance, PerformanceParams::default());
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[performance]\ntrading_days_per_year = 0").unwrap();

        let err = load_config(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_example_file_matches_defaults() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../stockscope.example.toml");
        let config = load_config(Some(&path)).unwrap();

        assert_eq!(config.indicators, IndicatorParams::default());
        assert_eq!(config.performance, PerformanceParams::default());
        assert_eq!(config.feed, FeedConfig::default());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let err = load_config(Some(Path::new("/nonexistent/stockscope.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::LoadError(_)));
    }
}
