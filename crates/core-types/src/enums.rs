use serde::{Deserialize, Serialize};
use std::fmt;

/// The reason a metric could not be computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UndefinedReason {
    /// The series is shorter than the metric's minimum window.
    InsufficientData { required: usize, available: usize },
    /// The smoothed average loss is exactly zero, so the relative strength is unbounded.
    ZeroAverageLoss,
    /// The return series has zero standard deviation.
    ZeroVariance,
}

impl fmt::Display for UndefinedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UndefinedReason::InsufficientData {
                required,
                available,
            } => write!(
                f,
                "insufficient data ({} bars required, {} available)",
                required, available
            ),
            UndefinedReason::ZeroAverageLoss => write!(f, "average loss is zero"),
            UndefinedReason::ZeroVariance => write!(f, "returns have zero variance"),
        }
    }
}

/// A single scalar produced by one of the engines.
///
/// Engines never hand out a bare `NaN`: a value that cannot be computed is reported as
/// `Undefined` together with the reason, and the display policy is left to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Value(f64),
    Undefined(UndefinedReason),
}

impl Metric {
    /// Builds a metric that needs `required` observations out of `available`.
    /// The value is only inspected when the window is satisfied.
    pub fn from_window(value: f64, required: usize, available: usize) -> Self {
        if available < required {
            Metric::Undefined(UndefinedReason::InsufficientData {
                required,
                available,
            })
        } else {
            Metric::Value(value)
        }
    }

    /// Wraps `value`, substituting `reason` when it is not finite.
    pub fn finite_or(value: f64, reason: UndefinedReason) -> Self {
        if value.is_finite() {
            Metric::Value(value)
        } else {
            Metric::Undefined(reason)
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Metric::Value(v) => Some(*v),
            Metric::Undefined(_) => None,
        }
    }

    pub fn is_defined(&self) -> bool {
        matches!(self, Metric::Value(_))
    }

    pub fn reason(&self) -> Option<UndefinedReason> {
        match self {
            Metric::Value(_) => None,
            Metric::Undefined(reason) => Some(*reason),
        }
    }

    /// Applies `f` to a defined value; undefined metrics pass through untouched.
    pub fn map(self, f: impl FnOnce(f64) -> f64) -> Self {
        match self {
            Metric::Value(v) => Metric::Value(f(v)),
            undefined => undefined,
        }
    }
}

/// Renders with two decimals unless a precision is given, and `N/A` when undefined.
impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Value(v) => {
                let precision = f.precision().unwrap_or(2);
                write!(f, "{:.*}", precision, v)
            }
            Metric::Undefined(_) => write!(f, "N/A"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_window() {
        assert_eq!(Metric::from_window(1.5, 20, 20), Metric::Value(1.5));
        assert_eq!(
            Metric::from_window(f64::NAN, 20, 19),
            Metric::Undefined(UndefinedReason::InsufficientData {
                required: 20,
                available: 19
            })
        );
    }

    #[test]
    fn test_finite_or() {
        assert_eq!(
            Metric::finite_or(f64::INFINITY, UndefinedReason::ZeroVariance),
            Metric::Undefined(UndefinedReason::ZeroVariance)
        );
        assert_eq!(
            Metric::finite_or(-0.25, UndefinedReason::ZeroVariance),
            Metric::Value(-0.25)
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Metric::Value(101.256).to_string(), "101.26");
        assert_eq!(format!("{:.4}", Metric::Value(0.5)), "0.5000");
        assert_eq!(
            Metric::Undefined(UndefinedReason::ZeroAverageLoss).to_string(),
            "N/A"
        );
    }

    #[test]
    fn test_map_keeps_undefined() {
        let undefined = Metric::Undefined(UndefinedReason::ZeroVariance);
        assert_eq!(undefined.map(|v| v * 100.0), undefined);
        assert_eq!(Metric::Value(0.1).map(|v| v * 100.0).value(), Some(0.1 * 100.0));
    }
}
