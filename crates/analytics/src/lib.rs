//! # Stockscope Analytics Engine
//!
//! This crate quantifies the realized risk and return of a price series: total
//! return, annualized volatility, Sharpe ratio, maximum drawdown and the daily
//! return distribution.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of external systems.
//!   It depends only on `core-types` and `configuration` (Layer 0).
//! - **Stateless Calculation:** The `PerformanceEngine` is a stateless calculator. It takes
//!   a `PriceSeries` as input and produces a `PerformanceReport` plus the `ReturnsSeries`
//!   as output. Degenerate input yields undefined metrics, never an error.
//!
//! ## Public API
//!
//! - `PerformanceEngine` / `compute_performance`: the calculation entry points.
//! - `PerformanceReport`: the four headline metrics.
//! - `ReturnsSeries`: daily returns, with summary statistics and histogram bins.
//! - `AnalyticsError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod error;
pub mod report;
pub mod returns;

// Re-export the key components to create a clean, public-facing API.
pub use engine::{compute_performance, PerformanceEngine};
pub use error::AnalyticsError;
pub use report::PerformanceReport;
pub use returns::{DistributionSummary, HistogramBin, ReturnsSeries};
