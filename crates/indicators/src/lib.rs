//! # Stockscope Indicator Engine
//!
//! Point-in-time technical indicators (moving averages, RSI, MACD) derived from the
//! closing prices of a `PriceSeries`.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It depends only on `core-types` and
//!   `configuration`, performs no I/O and never mutates its input.
//! - **Explicit undefined values:** An indicator whose minimum window is not met, or
//!   whose ratio has a zero denominator, is reported as `Metric::Undefined` with the
//!   reason, never as a silent `NaN`.
//!
//! ## Public API
//!
//! - `IndicatorEngine` / `compute_indicators`: latest-bar indicator values.
//! - `IndicatorResult`: the named scalars, with display labels.
//! - The per-bar series functions in `series`, used for chart overlays.

pub mod engine;
pub mod error;
pub mod report;
pub mod series;

pub use engine::{compute_indicators, IndicatorEngine};
pub use error::IndicatorError;
pub use report::{IndicatorResult, MovingAverageOverlay};
pub use series::{ema_series, macd_series, rsi_series, sma_series, MacdSeries};
