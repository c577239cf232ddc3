//! # Stockscope Core Types
//!
//! Layer 0 of the workspace: the plain data structures shared by every other crate.
//! A `PriceSeries` is the only input the analytics engines accept, and a `Metric` is
//! the only shape in which they report a scalar.

pub mod enums;
pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{Metric, UndefinedReason};
pub use error::CoreError;
pub use structs::{Bar, PriceSeries};
