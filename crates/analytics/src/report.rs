use core_types::Metric;
use serde::Serialize;

/// Risk and return over the whole observed history.
///
/// Percentages are already scaled by 100 (a 12.5% return is `12.5`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceReport {
    pub total_return_pct: Metric,
    pub volatility_pct: Metric,
    pub sharpe_ratio: Metric,
    /// Zero or negative.
    pub max_drawdown_pct: Metric,
}

impl PerformanceReport {
    /// Display labels paired with their values, in presentation order.
    pub fn entries(&self) -> Vec<(&'static str, Metric)> {
        vec![
            ("Total Return (%)", self.total_return_pct),
            ("Volatility (%)", self.volatility_pct),
            ("Sharpe Ratio", self.sharpe_ratio),
            ("Max Drawdown (%)", self.max_drawdown_pct),
        ]
    }
}
