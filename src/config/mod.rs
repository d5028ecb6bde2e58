//! Engine Configuration Module
//!
//! Provides the engine configuration loaded from TOML files, replacing every
//! inline tuning constant with an operator-tunable value.
//!
//! ## Loading Order
//!
//! 1. `FLEETSIGHT_CONFIG` environment variable (path to TOML file)
//! 2. `fleetsight.toml` in the current working directory
//! 3. Built-in defaults (see [`defaults`])
//!
//! ## Usage
//!
//! There is no global instance. Load once and pass a reference to every
//! engine call, so tests can override thresholds deterministically:
//!
//! ```ignore
//! let config = EngineConfig::load();
//! let asset = assemble_asset(&input, &config);
//! ```

mod engine_config;
pub mod defaults;
pub mod validation;

pub use engine_config::*;
