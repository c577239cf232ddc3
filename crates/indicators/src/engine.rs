use crate::error::IndicatorError;
use crate::report::{IndicatorResult, MovingAverageOverlay};
use crate::series::{rolling_mean, Ema, Macd, Rsi};
use configuration::IndicatorParams;
use core_types::{Metric, PriceSeries, UndefinedReason};
use std::sync::LazyLock;

/// A stateless calculator for the trend and momentum indicators of a price series.
///
/// The EMA, RSI and MACD calculators are built once from the parameters, so
/// `compute` itself cannot fail. The engine holds no mutable state and can be shared
/// across threads.
#[derive(Debug, Clone)]
pub struct IndicatorEngine {
    params: IndicatorParams,
    ema_short: Ema,
    ema_long: Ema,
    rsi: Rsi,
    macd: Macd,
}

impl IndicatorEngine {
    /// Creates a new `IndicatorEngine`, rejecting zero or inverted windows.
    pub fn new(params: IndicatorParams) -> Result<Self, IndicatorError> {
        params
            .validate()
            .map_err(|e| IndicatorError::InvalidParameters(e.to_string()))?;

        Ok(Self {
            ema_short: Ema::new(params.ema_short)?,
            ema_long: Ema::new(params.ema_long)?,
            rsi: Rsi::new(params.rsi_period)?,
            macd: Macd::new(params.macd_fast, params.macd_slow, params.macd_signal)?,
            params,
        })
    }

    pub fn params(&self) -> &IndicatorParams {
        &self.params
    }

    /// Computes every indicator as of the last bar of `series`.
    ///
    /// Indicators whose minimum window is not met are reported as
    /// `UndefinedReason::InsufficientData`; the rest are still computed.
    pub fn compute(&self, series: &PriceSeries) -> IndicatorResult {
        let closes = series.closes();
        let n = closes.len();
        let p = &self.params;

        let last_close = Metric::from_window(last(&closes), 1, n);

        let sma_short = Metric::from_window(
            last(&rolling_mean(&closes, p.sma_short)),
            p.sma_short,
            n,
        );
        let sma_long = Metric::from_window(
            last(&rolling_mean(&closes, p.sma_long)),
            p.sma_long,
            n,
        );

        let ema_short = Metric::from_window(
            last(&self.ema_short.series(&closes)),
            p.ema_short,
            n,
        );
        let ema_long = Metric::from_window(
            last(&self.ema_long.series(&closes)),
            p.ema_long,
            n,
        );

        let rsi = self.latest_rsi(&closes);

        let macd = self.macd.series(&closes);
        let signal_window = p.macd_slow + p.macd_signal - 1;
        let macd_line = Metric::from_window(last(&macd.line), p.macd_slow, n);
        let macd_signal = Metric::from_window(last(&macd.signal), signal_window, n);
        let macd_histogram = Metric::from_window(last(&macd.histogram), signal_window, n);

        let result = IndicatorResult {
            params: p.clone(),
            last_close,
            sma_short,
            sma_long,
            ema_short,
            ema_long,
            rsi,
            macd: macd_line,
            macd_signal,
            macd_histogram,
        };

        for (label, metric) in result.entries() {
            if let Some(reason) = metric.reason() {
                tracing::debug!(bars = n, indicator = %label, %reason, "Indicator undefined");
            }
        }

        result
    }

    /// Full SMA series for the short and long windows, for chart overlays.
    pub fn overlays(&self, series: &PriceSeries) -> MovingAverageOverlay {
        let closes = series.closes();
        let to_options = |values: Vec<f64>| -> Vec<Option<f64>> {
            values
                .into_iter()
                .map(|v| if v.is_nan() { None } else { Some(v) })
                .collect()
        };

        MovingAverageOverlay {
            short_window: self.params.sma_short,
            long_window: self.params.sma_long,
            short: to_options(rolling_mean(&closes, self.params.sma_short)),
            long: to_options(rolling_mean(&closes, self.params.sma_long)),
        }
    }

    fn latest_rsi(&self, closes: &[f64]) -> Metric {
        let required = self.rsi.period() + 1;
        if closes.len() < required {
            return Metric::from_window(f64::NAN, required, closes.len());
        }
        match self.rsi.averages(closes).last().and_then(|gl| gl.rsi()) {
            Some(value) => Metric::Value(value),
            None => Metric::Undefined(UndefinedReason::ZeroAverageLoss),
        }
    }
}

fn last(values: &[f64]) -> f64 {
    values.last().copied().unwrap_or(f64::NAN)
}

/// Computes the indicators of `series` with the default windows
/// (SMA/EMA 20 and 50, RSI 14, MACD 12/26/9).
pub fn compute_indicators(series: &PriceSeries) -> IndicatorResult {
    default_engine().compute(series)
}

fn default_engine() -> &'static IndicatorEngine {
    static ENGINE: LazyLock<IndicatorEngine> = LazyLock::new(|| {
        IndicatorEngine::new(IndicatorParams::default())
            .expect("default indicator windows are non-zero and ordered")
    });
    &ENGINE
}
