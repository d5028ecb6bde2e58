//! Shared data structures for fleet asset analytics
//!
//! - `telemetry`: raw samples, regime and band signals, explanation payload
//! - `trend`: per-metric trend descriptors
//! - `risk`: five-point levels, risk analysis, fleet matrix summaries
//! - `asset`: the assembled asset record and its parts

mod asset;
mod risk;
mod telemetry;
mod trend;

pub use asset::*;
pub use risk::*;
pub use telemetry::*;
pub use trend::*;
