use crate::error::ConfigError;
use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// The root configuration structure for an analysis run.
///
/// Every section falls back to its defaults, so an empty (or missing) file is a
/// valid configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub indicators: IndicatorParams,
    pub performance: PerformanceParams,
    pub feed: FeedConfig,
}

impl AnalysisConfig {
    /// Rejects parameter combinations the engines cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.indicators.validate()?;
        self.performance.validate()?;
        if self.feed.suffixes.is_empty() {
            return Err(ConfigError::ValidationError(
                "feed.suffixes must list at least one suffix (use \"\" for the bare symbol)"
                    .to_string(),
            ));
        }
        Ok(())
    }
}

/// Longest accepted indicator window, roughly forty years of daily bars.
pub const MAX_WINDOW: usize = 10_000;

/// Window lengths for the technical indicators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorParams {
    pub sma_short: usize,
    pub sma_long: usize,
    pub ema_short: usize,
    pub ema_long: usize,
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            sma_short: 20,
            sma_long: 50,
            ema_short: 20,
            ema_long: 50,
            rsi_period: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
        }
    }
}

impl IndicatorParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let periods = [
            ("sma_short", self.sma_short),
            ("sma_long", self.sma_long),
            ("ema_short", self.ema_short),
            ("ema_long", self.ema_long),
            ("rsi_period", self.rsi_period),
            ("macd_fast", self.macd_fast),
            ("macd_slow", self.macd_slow),
            ("macd_signal", self.macd_signal),
        ];
        if let Some((name, _)) = periods.iter().find(|(_, period)| *period == 0) {
            return Err(ConfigError::ValidationError(format!(
                "indicators.{} cannot be zero",
                name
            )));
        }
        if let Some((name, period)) = periods.iter().find(|(_, period)| *period > MAX_WINDOW) {
            return Err(ConfigError::ValidationError(format!(
                "indicators.{} ({}) exceeds the maximum window of {}",
                name, period, MAX_WINDOW
            )));
        }
        if self.sma_short > self.sma_long {
            return Err(ConfigError::ValidationError(format!(
                "indicators.sma_short ({}) must not exceed sma_long ({})",
                self.sma_short, self.sma_long
            )));
        }
        if self.macd_fast >= self.macd_slow {
            return Err(ConfigError::ValidationError(format!(
                "indicators.macd_fast ({}) must be shorter than macd_slow ({})",
                self.macd_fast, self.macd_slow
            )));
        }
        Ok(())
    }
}

/// Parameters for the risk/return metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceParams {
    /// Annualization factor for volatility and the Sharpe ratio.
    pub trading_days_per_year: u32,
    /// Annual risk-free rate as a fraction (0.05 is 5%).
    pub risk_free_rate: f64,
}

impl Default for PerformanceParams {
    fn default() -> Self {
        Self {
            trading_days_per_year: 252,
            risk_free_rate: 0.0,
        }
    }
}

impl PerformanceParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.trading_days_per_year == 0 {
            return Err(ConfigError::ValidationError(
                "performance.trading_days_per_year cannot be zero".to_string(),
            ));
        }
        if !self.risk_free_rate.is_finite() {
            return Err(ConfigError::ValidationError(
                "performance.risk_free_rate must be a finite number".to_string(),
            ));
        }
        Ok(())
    }
}

/// Where price history is read from and how symbols are resolved.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Directory holding one `<SYMBOL><suffix>.csv` file per instrument.
    pub data_dir: PathBuf,
    /// Market suffixes tried in order, e.g. `.NS` then `.BO` then the bare symbol.
    pub suffixes: Vec<String>,
    pub lookback: Lookback,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            suffixes: vec![".NS".to_string(), ".BO".to_string(), String::new()],
            lookback: Lookback::default(),
        }
    }
}

/// How much history to analyse, counted back from the most recent bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum Lookback {
    #[serde(rename = "1mo")]
    #[cfg_attr(feature = "clap", value(name = "1mo"))]
    OneMonth,
    #[serde(rename = "3mo")]
    #[cfg_attr(feature = "clap", value(name = "3mo"))]
    ThreeMonths,
    #[serde(rename = "6mo")]
    #[cfg_attr(feature = "clap", value(name = "6mo"))]
    SixMonths,
    #[default]
    #[serde(rename = "1y")]
    #[cfg_attr(feature = "clap", value(name = "1y"))]
    OneYear,
    #[serde(rename = "2y")]
    #[cfg_attr(feature = "clap", value(name = "2y"))]
    TwoYears,
    #[serde(rename = "5y")]
    #[cfg_attr(feature = "clap", value(name = "5y"))]
    FiveYears,
    #[serde(rename = "max")]
    #[cfg_attr(feature = "clap", value(name = "max"))]
    Max,
}

impl Lookback {
    fn months(&self) -> Option<u32> {
        match self {
            Lookback::OneMonth => Some(1),
            Lookback::ThreeMonths => Some(3),
            Lookback::SixMonths => Some(6),
            Lookback::OneYear => Some(12),
            Lookback::TwoYears => Some(24),
            Lookback::FiveYears => Some(60),
            Lookback::Max => None,
        }
    }

    /// The first date inside the window that ends at `last`, or `None` for the full history.
    pub fn start_date(&self, last: NaiveDate) -> Option<NaiveDate> {
        let months = self.months()?;
        last.checked_sub_months(Months::new(months))
            .and_then(|d| d.checked_add_days(Days::new(1)))
    }
}

impl FromStr for Lookback {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1mo" => Ok(Lookback::OneMonth),
            "3mo" => Ok(Lookback::ThreeMonths),
            "6mo" => Ok(Lookback::SixMonths),
            "1y" => Ok(Lookback::OneYear),
            "2y" => Ok(Lookback::TwoYears),
            "5y" => Ok(Lookback::FiveYears),
            "max" => Ok(Lookback::Max),
            other => Err(ConfigError::UnknownLookback(other.to_string())),
        }
    }
}

impl fmt::Display for Lookback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Lookback::OneMonth => "1mo",
            Lookback::ThreeMonths => "3mo",
            Lookback::SixMonths => "6mo",
            Lookback::OneYear => "1y",
            Lookback::TwoYears => "2y",
            Lookback::FiveYears => "5y",
            Lookback::Max => "max",
        };
        f.write_str(label)
    }
}
