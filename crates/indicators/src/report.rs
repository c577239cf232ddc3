use configuration::IndicatorParams;
use core_types::Metric;
use serde::Serialize;

/// The latest value of every indicator, "as of" the final bar of the series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorResult {
    /// The window lengths the values were computed with.
    pub params: IndicatorParams,
    pub last_close: Metric,
    pub sma_short: Metric,
    pub sma_long: Metric,
    pub ema_short: Metric,
    pub ema_long: Metric,
    pub rsi: Metric,
    pub macd: Metric,
    pub macd_signal: Metric,
    pub macd_histogram: Metric,
}

impl IndicatorResult {
    /// Display labels paired with their values, in presentation order.
    pub fn entries(&self) -> Vec<(String, Metric)> {
        let p = &self.params;
        vec![
            ("Last Close Price".to_string(), self.last_close),
            (format!("{}-day SMA", p.sma_short), self.sma_short),
            (format!("{}-day SMA", p.sma_long), self.sma_long),
            (format!("{}-day EMA", p.ema_short), self.ema_short),
            (format!("{}-day EMA", p.ema_long), self.ema_long),
            ("RSI".to_string(), self.rsi),
            ("MACD".to_string(), self.macd),
            ("MACD Signal".to_string(), self.macd_signal),
            ("MACD Histogram".to_string(), self.macd_histogram),
        ]
    }
}

/// Full SMA series for drawing moving-average overlays on a price chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovingAverageOverlay {
    pub short_window: usize,
    pub long_window: usize,
    /// `None` until the window is filled.
    pub short: Vec<Option<f64>>,
    pub long: Vec<Option<f64>>,
}
