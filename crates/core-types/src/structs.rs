use crate::error::CoreError;
use chrono::NaiveDate;
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};

/// One trading day's open/high/low/close/volume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: Decimal,
}

impl Bar {
    /// The closing price as an `f64`, the unit the engines calculate in.
    pub fn close_f64(&self) -> f64 {
        self.close.to_f64().unwrap_or(f64::NAN)
    }

    fn validate(&self) -> Result<(), CoreError> {
        let prices = [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
        ];
        for (field, value) in prices {
            if value <= Decimal::ZERO {
                return Err(CoreError::NonPositivePrice {
                    date: self.date,
                    field,
                    value,
                });
            }
        }
        if self.volume < Decimal::ZERO {
            return Err(CoreError::NegativeVolume {
                date: self.date,
                value: self.volume,
            });
        }
        Ok(())
    }
}

/// An ordered, validated daily price history for a single instrument.
///
/// Once constructed the series is immutable. Every bar has strictly positive prices
/// and a non-negative volume, and dates are strictly increasing. An empty series is
/// accepted; the engines report every metric of it as undefined.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PriceSeries {
    bars: Vec<Bar>,
}

impl PriceSeries {
    /// Validates `bars` and wraps them in a series.
    pub fn new(bars: Vec<Bar>) -> Result<Self, CoreError> {
        for bar in &bars {
            bar.validate()?;
        }
        for pair in bars.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(CoreError::NonMonotonicDates {
                    previous: pair[0].date,
                    current: pair[1].date,
                });
            }
        }
        Ok(Self { bars })
    }

    /// Builds a series of flat bars (open = high = low = close, zero volume) on
    /// consecutive calendar days starting at `start`.
    pub fn from_closes(start: NaiveDate, closes: &[f64]) -> Result<Self, CoreError> {
        let mut bars = Vec::with_capacity(closes.len());
        let mut date = start;
        for (index, &close) in closes.iter().enumerate() {
            let price = Decimal::from_f64(close).ok_or(CoreError::NonFinitePrice { index })?;
            bars.push(Bar {
                date,
                open: price,
                high: price,
                low: price,
                close: price,
                volume: Decimal::ZERO,
            });
            date = date.succ_opt().ok_or(CoreError::DateOutOfRange(date))?;
        }
        Self::new(bars)
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// The closing prices in date order.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(Bar::close_f64).collect()
    }

    pub fn last_close(&self) -> Option<f64> {
        self.bars.last().map(Bar::close_f64)
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.bars.first().map(|b| b.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.bars.last().map(|b| b.date)
    }

    /// The tail of the series starting at `start` (inclusive).
    pub fn since(&self, start: NaiveDate) -> PriceSeries {
        let first = self.bars.partition_point(|b| b.date < start);
        PriceSeries {
            bars: self.bars[first..].to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn bar(day: u32, close: Decimal) -> Bar {
        Bar {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            volume: dec!(1000),
        }
    }

    #[test]
    fn test_accepts_valid_and_empty_series() {
        let series = PriceSeries::new(vec![bar(1, dec!(100)), bar(2, dec!(101.5))]).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.closes(), vec![100.0, 101.5]);
        assert_eq!(series.last_close(), Some(101.5));

        let empty = PriceSeries::new(Vec::new()).unwrap();
        assert!(empty.is_empty());
        assert_eq!(empty.last_close(), None);
    }

    #[test]
    fn test_rejects_non_positive_close() {
        let err = PriceSeries::new(vec![bar(1, dec!(100)), bar(2, dec!(0))]).unwrap_err();
        assert!(matches!(
            err,
            CoreError::NonPositivePrice { field: "open", .. }
        ));
    }

    #[test]
    fn test_rejects_negative_volume() {
        let mut bad = bar(1, dec!(100));
        bad.volume = dec!(-5);
        let err = PriceSeries::new(vec![bad]).unwrap_err();
        assert!(matches!(err, CoreError::NegativeVolume { .. }));
    }

    #[test]
    fn test_rejects_unordered_dates() {
        let err = PriceSeries::new(vec![bar(3, dec!(100)), bar(2, dec!(101))]).unwrap_err();
        assert!(matches!(err, CoreError::NonMonotonicDates { .. }));

        let err = PriceSeries::new(vec![bar(2, dec!(100)), bar(2, dec!(101))]).unwrap_err();
        assert!(matches!(err, CoreError::NonMonotonicDates { .. }));
    }

    #[test]
    fn test_from_closes() {
        let start = NaiveDate::from_ymd_opt(2024, 2, 28).unwrap();
        let series = PriceSeries::from_closes(start, &[10.0, 10.5, 11.25]).unwrap();
        assert_eq!(series.closes(), vec![10.0, 10.5, 11.25]);
        assert_eq!(series.last_date(), NaiveDate::from_ymd_opt(2024, 3, 1));

        let err = PriceSeries::from_closes(start, &[10.0, f64::NAN]).unwrap_err();
        assert_eq!(err, CoreError::NonFinitePrice { index: 1 });
        assert!(PriceSeries::from_closes(start, &[10.0, -1.0]).is_err());
    }

    #[test]
    fn test_since_keeps_tail() {
        let series = PriceSeries::new((1..=10).map(|d| bar(d, dec!(100))).collect()).unwrap();
        let tail = series.since(NaiveDate::from_ymd_opt(2024, 1, 8).unwrap());
        assert_eq!(tail.len(), 3);
        assert_eq!(tail.first_date(), NaiveDate::from_ymd_opt(2024, 1, 8));
    }
}
