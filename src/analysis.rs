use analytics::{DistributionSummary, HistogramBin, PerformanceEngine, PerformanceReport};
use chrono::NaiveDate;
use core_types::PriceSeries;
use indicators::{IndicatorEngine, IndicatorResult, MovingAverageOverlay};
use serde::Serialize;

/// Everything computed for one resolved ticker, ready for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct TickerReport {
    pub symbol: String,
    pub bars: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub indicators: IndicatorResult,
    pub performance: PerformanceReport,
    pub distribution: DistributionSummary,
    pub histogram: Vec<HistogramBin>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlays: Option<MovingAverageOverlay>,
}

/// The engines and presentation options for one analysis request.
#[derive(Debug, Clone)]
pub struct Analyzer {
    indicators: IndicatorEngine,
    performance: PerformanceEngine,
    bins: usize,
    overlays: bool,
}

impl Analyzer {
    pub fn new(
        indicators: IndicatorEngine,
        performance: PerformanceEngine,
        bins: usize,
        overlays: bool,
    ) -> Self {
        Self {
            indicators,
            performance,
            bins,
            overlays,
        }
    }

    /// Runs both engines over `series`. They are independent of each other.
    pub fn analyze(&self, symbol: &str, series: &PriceSeries) -> TickerReport {
        let indicators = self.indicators.compute(series);
        let (performance, returns) = self.performance.calculate(series);

        TickerReport {
            symbol: symbol.to_string(),
            bars: series.len(),
            first_date: series.first_date(),
            last_date: series.last_date(),
            indicators,
            performance,
            distribution: returns.summary(),
            histogram: returns.histogram(self.bins),
            overlays: self.overlays.then(|| self.indicators.overlays(series)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use configuration::{IndicatorParams, PerformanceParams};

    fn analyzer(overlays: bool) -> Analyzer {
        Analyzer::new(
            IndicatorEngine::new(IndicatorParams::default()).unwrap(),
            PerformanceEngine::new(PerformanceParams::default()).unwrap(),
            10,
            overlays,
        )
    }

    fn series(n: usize) -> PriceSeries {
        let closes: Vec<f64> = (0..n).map(|i| 100.0 + (i as f64 * 0.4).sin() * 5.0).collect();
        PriceSeries::from_closes(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(), &closes).unwrap()
    }

    #[test]
    fn test_report_covers_whole_series() {
        let report = analyzer(false).analyze("ACME", &series(80));

        assert_eq!(report.symbol, "ACME");
        assert_eq!(report.bars, 80);
        assert_eq!(report.distribution.count, 79);
        assert_eq!(report.histogram.iter().map(|b| b.count).sum::<usize>(), 79);
        assert!(report.indicators.sma_long.is_defined());
        assert!(report.performance.volatility_pct.is_defined());
        assert!(report.overlays.is_none());
    }

    #[test]
    fn test_overlays_are_optional() {
        let report = analyzer(true).analyze("ACME", &series(30));
        let overlay = report.overlays.expect("overlays requested");
        assert_eq!(overlay.short.len(), 30);
        assert!(overlay.long.iter().all(Option::is_none));
    }
}
