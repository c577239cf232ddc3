use core_types::{Metric, UndefinedReason};
use serde::Serialize;

/// Daily simple returns of a price series.
///
/// `r[i] = close[i+1] / close[i] - 1`. The undefined return of the first bar is
/// dropped, so the series is one shorter than the prices it came from.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ReturnsSeries {
    values: Vec<f64>,
}

/// Descriptive statistics of a `ReturnsSeries`, as fractions (not percentages).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionSummary {
    pub count: usize,
    pub mean: Metric,
    /// Sample standard deviation.
    pub std_dev: Metric,
    pub min: Metric,
    pub max: Metric,
}

/// One equal-width histogram bin. The last bin includes its upper edge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

impl ReturnsSeries {
    pub fn from_closes(closes: &[f64]) -> Self {
        Self {
            values: closes.windows(2).map(|w| w[1] / w[0] - 1.0).collect(),
        }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The compounded growth index `C[i] = prod(1 + r[j])` for `j <= i`.
    pub fn compounded(&self) -> Vec<f64> {
        self.values
            .iter()
            .scan(1.0, |acc, r| {
                *acc *= 1.0 + r;
                Some(*acc)
            })
            .collect()
    }

    pub fn mean(&self) -> Option<f64> {
        if self.values.is_empty() {
            return None;
        }
        Some(self.values.iter().sum::<f64>() / self.values.len() as f64)
    }

    /// Sample standard deviation (n - 1 denominator); needs at least two returns.
    pub fn sample_std(&self) -> Option<f64> {
        if self.values.len() < 2 {
            return None;
        }
        let mean = self.mean()?;
        let sum_sq: f64 = self.values.iter().map(|r| (r - mean) * (r - mean)).sum();
        Some((sum_sq / (self.values.len() - 1) as f64).sqrt())
    }

    pub fn summary(&self) -> DistributionSummary {
        let n = self.values.len();
        let insufficient = |required| {
            Metric::Undefined(UndefinedReason::InsufficientData {
                required,
                available: n,
            })
        };
        let min = self.values.iter().copied().reduce(f64::min);
        let max = self.values.iter().copied().reduce(f64::max);

        DistributionSummary {
            count: n,
            mean: self.mean().map_or(insufficient(1), Metric::Value),
            std_dev: self.sample_std().map_or(insufficient(2), Metric::Value),
            min: min.map_or(insufficient(1), Metric::Value),
            max: max.map_or(insufficient(1), Metric::Value),
        }
    }

    /// Buckets the returns into `bins` equal-width bins spanning `[min, max]`.
    ///
    /// Returns no bins for an empty series or `bins == 0`. When every return is the
    /// same the single value lands in one zero-width bin.
    pub fn histogram(&self, bins: usize) -> Vec<HistogramBin> {
        let (Some(lo), Some(hi)) = (
            self.values.iter().copied().reduce(f64::min),
            self.values.iter().copied().reduce(f64::max),
        ) else {
            return Vec::new();
        };
        if bins == 0 {
            return Vec::new();
        }
        if lo == hi {
            return vec![HistogramBin {
                lower: lo,
                upper: hi,
                count: self.values.len(),
            }];
        }

        let width = (hi - lo) / bins as f64;
        let mut out: Vec<HistogramBin> = (0..bins)
            .map(|i| HistogramBin {
                lower: lo + width * i as f64,
                upper: if i + 1 == bins {
                    hi
                } else {
                    lo + width * (i + 1) as f64
                },
                count: 0,
            })
            .collect();

        for r in &self.values {
            let index = (((r - lo) / width) as usize).min(bins - 1);
            out[index].count += 1;
        }
        out
    }
}
