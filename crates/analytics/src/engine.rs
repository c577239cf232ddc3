use crate::error::AnalyticsError;
use crate::report::PerformanceReport;
use crate::returns::ReturnsSeries;
use configuration::PerformanceParams;
use core_types::{Metric, PriceSeries, UndefinedReason};

/// A stateless calculator for deriving risk/return metrics from a price series.
#[derive(Debug, Clone, Default)]
pub struct PerformanceEngine {
    params: PerformanceParams,
}

impl PerformanceEngine {
    pub fn new(params: PerformanceParams) -> Result<Self, AnalyticsError> {
        params
            .validate()
            .map_err(|e| AnalyticsError::InvalidParameters(e.to_string()))?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &PerformanceParams {
        &self.params
    }

    /// The main entry point for calculating performance metrics.
    ///
    /// # Returns
    ///
    /// The `PerformanceReport` together with the `ReturnsSeries` it was computed from,
    /// so the caller can render the return distribution. Empty and single-bar series
    /// produce a report whose fields are all undefined.
    pub fn calculate(&self, series: &PriceSeries) -> (PerformanceReport, ReturnsSeries) {
        let returns = ReturnsSeries::from_closes(&series.closes());
        let bars = series.len();

        let report = PerformanceReport {
            total_return_pct: self.total_return(&returns, bars),
            volatility_pct: self.volatility(&returns, bars),
            sharpe_ratio: self.sharpe_ratio(&returns, bars),
            max_drawdown_pct: self.max_drawdown(&returns, bars),
        };

        tracing::debug!(
            bars,
            total_return_pct = %report.total_return_pct,
            volatility_pct = %report.volatility_pct,
            sharpe_ratio = %report.sharpe_ratio,
            max_drawdown_pct = %report.max_drawdown_pct,
            "Calculated performance"
        );

        (report, returns)
    }

    fn annualization(&self) -> f64 {
        f64::from(self.params.trading_days_per_year).sqrt()
    }

    /// `prod(1 + r) - 1`, needs one return (two bars).
    fn total_return(&self, returns: &ReturnsSeries, bars: usize) -> Metric {
        let growth: f64 = returns.values().iter().map(|r| 1.0 + r).product();
        Metric::from_window((growth - 1.0) * 100.0, 2, bars)
    }

    /// Annualized sample standard deviation, needs two returns (three bars).
    /// Identical returns report exactly zero.
    fn volatility(&self, returns: &ReturnsSeries, bars: usize) -> Metric {
        match (returns.mean(), returns.sample_std()) {
            (Some(mean), Some(std)) if is_zero_variance(mean, std) => Metric::Value(0.0),
            (_, Some(std)) => Metric::Value(std * self.annualization() * 100.0),
            _ => Metric::from_window(f64::NAN, 3, bars),
        }
    }

    /// Annualized `(mean - rf) / std`. Zero volatility leaves the ratio undefined.
    fn sharpe_ratio(&self, returns: &ReturnsSeries, bars: usize) -> Metric {
        let (Some(mean), Some(std)) = (returns.mean(), returns.sample_std()) else {
            return Metric::from_window(f64::NAN, 3, bars);
        };
        if is_zero_variance(mean, std) {
            return Metric::Undefined(UndefinedReason::ZeroVariance);
        }
        let daily_rf = self.params.risk_free_rate / f64::from(self.params.trading_days_per_year);
        Metric::finite_or(
            (mean - daily_rf) / std * self.annualization(),
            UndefinedReason::ZeroVariance,
        )
    }

    /// Deepest fall of the compounded index below its running peak, as a negative
    /// percentage. The peak is tracked over the compounded index only.
    fn max_drawdown(&self, returns: &ReturnsSeries, bars: usize) -> Metric {
        if returns.is_empty() {
            return Metric::from_window(f64::NAN, 2, bars);
        }

        let mut peak = f64::NEG_INFINITY;
        let mut max_drawdown = 0.0_f64;
        for value in returns.compounded() {
            peak = peak.max(value);
            let drawdown = (value - peak) / peak;
            max_drawdown = max_drawdown.min(drawdown);
        }
        Metric::Value(max_drawdown * 100.0)
    }
}

/// Rounding noise left in the standard deviation of identical returns.
const VARIANCE_TOLERANCE: f64 = 16.0 * f64::EPSILON;

/// True when `std` is indistinguishable from zero at the scale of `mean`.
fn is_zero_variance(mean: f64, std: f64) -> bool {
    std <= VARIANCE_TOLERANCE * mean.abs().max(1.0)
}

/// Computes the performance metrics of `series` with 252 trading days per year and a
/// zero risk-free rate.
pub fn compute_performance(series: &PriceSeries) -> (PerformanceReport, ReturnsSeries) {
    PerformanceEngine::default().calculate(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const EPS: f64 = 1e-9;

    fn series(closes: &[f64]) -> PriceSeries {
        PriceSeries::from_closes(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), closes).unwrap()
    }

    fn value(metric: Metric) -> f64 {
        metric.value().expect("metric should be defined")
    }

    #[test]
    fn test_known_path() {
        let (report, returns) = compute_performance(&series(&[100.0, 110.0, 99.0, 108.9]));

        // Returns: +10%, -10%, +10%.
        assert_eq!(returns.len(), 3);
        assert!((value(report.total_return_pct) - 8.9).abs() < EPS);

        let mean: f64 = 0.1 / 3.0;
        let std = ((2.0 * (0.1 - mean).powi(2) + (-0.1 - mean).powi(2)) / 2.0).sqrt();
        assert!((value(report.volatility_pct) - std * 252f64.sqrt() * 100.0).abs() < EPS);
        assert!((value(report.sharpe_ratio) - mean / std * 252f64.sqrt()).abs() < EPS);

        // Peak 1.10, trough 0.99.
        assert!((value(report.max_drawdown_pct) - (-10.0)).abs() < EPS);
    }

    #[test]
    fn test_flat_series() {
        let (report, returns) = compute_performance(&series(&[100.0; 60]));

        assert_eq!(returns.len(), 59);
        assert_eq!(value(report.total_return_pct), 0.0);
        assert_eq!(value(report.volatility_pct), 0.0);
        assert_eq!(
            report.sharpe_ratio,
            Metric::Undefined(UndefinedReason::ZeroVariance)
        );
        assert_eq!(value(report.max_drawdown_pct), 0.0);
    }

    #[test]
    fn test_constant_growth_has_zero_variance() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 * 1.01f64.powi(i)).collect();
        let (report, returns) = compute_performance(&series(&closes));

        assert!(returns.values().iter().all(|r| (r - 0.01).abs() < 1e-12));
        assert_eq!(
            report.sharpe_ratio,
            Metric::Undefined(UndefinedReason::ZeroVariance)
        );
        assert_eq!(value(report.volatility_pct), 0.0);
        assert!(value(report.total_return_pct) > 0.0);
        assert_eq!(value(report.max_drawdown_pct), 0.0);
    }

    #[test]
    fn test_single_bar_is_all_undefined() {
        let (report, returns) = compute_performance(&series(&[100.0]));

        assert!(returns.is_empty());
        for (label, metric) in report.entries() {
            assert!(!metric.is_defined(), "{} should be undefined", label);
        }
        assert_eq!(
            report.total_return_pct,
            Metric::Undefined(UndefinedReason::InsufficientData {
                required: 2,
                available: 1
            })
        );
    }

    #[test]
    fn test_empty_series_is_all_undefined() {
        let (report, returns) = compute_performance(&PriceSeries::default());
        assert!(returns.is_empty());
        assert!(report.entries().iter().all(|(_, m)| !m.is_defined()));
    }

    #[test]
    fn test_two_bars_has_return_but_no_volatility() {
        let (report, _) = compute_performance(&series(&[100.0, 105.0]));

        assert!((value(report.total_return_pct) - 5.0).abs() < EPS);
        assert_eq!(value(report.max_drawdown_pct), 0.0);
        assert!(!report.volatility_pct.is_defined());
        assert!(!report.sharpe_ratio.is_defined());
    }

    #[test]
    fn test_total_return_compounds_across_halves() {
        let closes: Vec<f64> = (0..61)
            .map(|i| 100.0 * (1.0 + 0.05 * (i as f64 * 0.7).sin()) + i as f64 * 0.3)
            .collect();
        let engine = PerformanceEngine::default();
        let growth =
            |s: &[f64]| 1.0 + value(engine.calculate(&series(s)).0.total_return_pct) / 100.0;

        let whole = growth(&closes);
        let halves = growth(&closes[..=30]) * growth(&closes[30..]);
        assert!((whole - halves).abs() < 1e-12);
    }

    #[test]
    fn test_drawdown_is_never_positive() {
        let closes: Vec<f64> = (0..120)
            .map(|i| 50.0 + 8.0 * (i as f64 * 0.21).cos() + (i % 7) as f64)
            .collect();
        let (report, _) = compute_performance(&series(&closes));
        assert!(value(report.max_drawdown_pct) <= 0.0);

        let rising: Vec<f64> = (0..30).map(|i| 10.0 + i as f64).collect();
        let (report, _) = compute_performance(&series(&rising));
        assert_eq!(value(report.max_drawdown_pct), 0.0);
    }

    #[test]
    fn test_drawdown_peak_starts_after_first_return() {
        // The compounded index starts at 0.9, so the peak is 0.9, not the initial 1.0.
        let (report, _) = compute_performance(&series(&[100.0, 90.0, 80.0]));
        let expected = (0.8 - 0.9) / 0.9 * 100.0;
        assert!((value(report.max_drawdown_pct) - expected).abs() < EPS);
    }

    #[test]
    fn test_risk_free_rate_lowers_sharpe() {
        let closes = [100.0, 101.0, 100.5, 102.0, 103.0, 102.5];
        let base = PerformanceEngine::default();
        let with_rf = PerformanceEngine::new(PerformanceParams {
            risk_free_rate: 0.05,
            ..PerformanceParams::default()
        })
        .unwrap();

        let input = series(&closes);
        let sharpe = value(base.calculate(&input).0.sharpe_ratio);
        let excess = value(with_rf.calculate(&input).0.sharpe_ratio);
        assert!(excess < sharpe);
    }

    #[test]
    fn test_rejects_zero_trading_days() {
        let params = PerformanceParams {
            trading_days_per_year: 0,
            ..PerformanceParams::default()
        };
        assert!(matches!(
            PerformanceEngine::new(params),
            Err(AnalyticsError::InvalidParameters(_))
        ));
    }
}
