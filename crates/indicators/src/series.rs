//! Per-bar indicator series.
//!
//! Every function returns a vector aligned 1:1 with its input. Positions where the
//! indicator has no value yet hold `NaN`; minimum-window policy for the reported
//! scalars lives in the engine, not here.

use crate::error::IndicatorError;
use serde::Serialize;
use ta::Next as _;
use ta::indicators::ExponentialMovingAverage;

/// Simple moving average over `window` values.
///
/// Each defined entry is the arithmetic mean of the window slice ending at that bar.
/// The first `window - 1` entries are `NaN`.
pub fn sma_series(values: &[f64], window: usize) -> Result<Vec<f64>, IndicatorError> {
    if window == 0 {
        return Err(IndicatorError::InvalidParameters(
            "SMA window cannot be zero".to_string(),
        ));
    }
    Ok(rolling_mean(values, window))
}

pub(crate) fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];
    if window == 0 {
        return out;
    }
    for (end, slot) in out.iter_mut().enumerate().skip(window - 1) {
        let slice = &values[end + 1 - window..=end];
        *slot = slice.iter().sum::<f64>() / window as f64;
    }
    out
}

/// Recursive exponential moving average with `k = 2 / (span + 1)`, seeded with the
/// first value and defined from the first bar onward.
pub fn ema_series(values: &[f64], span: usize) -> Result<Vec<f64>, IndicatorError> {
    Ok(Ema::new(span)?.series(values))
}

/// Relative strength index per bar. The first entry, and any bar whose average loss
/// is zero, is `NaN`.
pub fn rsi_series(closes: &[f64], period: usize) -> Result<Vec<f64>, IndicatorError> {
    Ok(Rsi::new(period)?.series(closes))
}

/// MACD line (`EMA(fast) - EMA(slow)`), its `EMA(signal)` and the histogram between them.
pub fn macd_series(
    closes: &[f64],
    fast: usize,
    slow: usize,
    signal: usize,
) -> Result<MacdSeries, IndicatorError> {
    Ok(Macd::new(fast, slow, signal)?.series(closes))
}

/// A configured EMA. Each call to `series` starts a fresh recursion.
#[derive(Debug, Clone)]
pub struct Ema {
    span: usize,
    prototype: ExponentialMovingAverage,
}

impl Ema {
    pub fn new(span: usize) -> Result<Self, IndicatorError> {
        let prototype = ExponentialMovingAverage::new(span).map_err(|e| {
            IndicatorError::InvalidParameters(format!(
                "Failed to initialize EMA({}): {:?}",
                span, e
            ))
        })?;
        Ok(Self { span, prototype })
    }

    pub fn span(&self) -> usize {
        self.span
    }

    pub fn series(&self, values: &[f64]) -> Vec<f64> {
        let mut ema = self.prototype.clone();
        values.iter().map(|&v| ema.next(v)).collect()
    }
}

/// Smoothed average gain and loss for one bar of an RSI calculation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GainLoss {
    pub avg_gain: f64,
    pub avg_loss: f64,
}

impl GainLoss {
    /// `100 - 100 / (1 + gain/loss)`, or `None` when the average loss is zero.
    pub fn rsi(&self) -> Option<f64> {
        if self.avg_loss == 0.0 {
            return None;
        }
        let rs = self.avg_gain / self.avg_loss;
        Some(100.0 - 100.0 / (1.0 + rs))
    }
}

/// Relative strength index with Wilder-style smoothing.
///
/// Gains and losses are smoothed with `alpha = 1 / period` (center of mass
/// `period - 1`), each seeded with the first price change.
#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    smoother: Ema,
}

impl Rsi {
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        if period == 0 {
            return Err(IndicatorError::InvalidParameters(
                "RSI period cannot be zero".to_string(),
            ));
        }
        // ta's EMA of span n has k = 2/(n+1); span 2p-1 gives k = 1/p.
        let span = period.checked_mul(2).ok_or_else(|| {
            IndicatorError::InvalidParameters(format!("RSI period {} is too large", period))
        })? - 1;
        Ok(Self {
            period,
            smoother: Ema::new(span)?,
        })
    }

    pub fn period(&self) -> usize {
        self.period
    }

    /// One entry per price change, so one shorter than `closes`.
    pub fn averages(&self, closes: &[f64]) -> Vec<GainLoss> {
        let changes: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();
        let gains: Vec<f64> = changes.iter().map(|c| c.max(0.0)).collect();
        let losses: Vec<f64> = changes.iter().map(|c| (-c).max(0.0)).collect();

        self.smoother
            .series(&gains)
            .into_iter()
            .zip(self.smoother.series(&losses))
            .map(|(avg_gain, avg_loss)| GainLoss { avg_gain, avg_loss })
            .collect()
    }

    pub fn series(&self, closes: &[f64]) -> Vec<f64> {
        let mut out = Vec::with_capacity(closes.len());
        if !closes.is_empty() {
            out.push(f64::NAN);
        }
        out.extend(
            self.averages(closes)
                .iter()
                .map(|gl| gl.rsi().unwrap_or(f64::NAN)),
        );
        out
    }
}

/// The three MACD series, aligned with the input closes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MacdSeries {
    pub line: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

/// Moving-average convergence/divergence built from three EMAs.
#[derive(Debug, Clone)]
pub struct Macd {
    fast: Ema,
    slow: Ema,
    signal: Ema,
}

impl Macd {
    pub fn new(fast: usize, slow: usize, signal: usize) -> Result<Self, IndicatorError> {
        if fast >= slow {
            return Err(IndicatorError::InvalidParameters(format!(
                "MACD fast span ({}) must be shorter than slow span ({})",
                fast, slow
            )));
        }
        Ok(Self {
            fast: Ema::new(fast)?,
            slow: Ema::new(slow)?,
            signal: Ema::new(signal)?,
        })
    }

    pub fn series(&self, closes: &[f64]) -> MacdSeries {
        let line: Vec<f64> = self
            .fast
            .series(closes)
            .iter()
            .zip(self.slow.series(closes))
            .map(|(f, s)| f - s)
            .collect();
        let signal = self.signal.series(&line);
        let histogram = line.iter().zip(&signal).map(|(m, s)| m - s).collect();

        MacdSeries {
            line,
            signal,
            histogram,
        }
    }
}
