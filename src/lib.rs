//! Fleetsight: Fleet Asset Condition Analytics
//!
//! Turns raw per-asset telemetry (differential-pressure excess, breach
//! probability, risk band, operating regime) into a fully derived asset
//! record: trends against baseline, risk classification, failure projection,
//! root-cause narrative and a fleet-wide risk matrix.
//!
//! ## Architecture
//!
//! - **Ingest**: JSON batch parsing and shape checks
//! - **Assembler**: Composition root, one batch in, one [`Asset`] out
//! - **Trends / Risk / Projection / Narrative**: Pure derivations, each a
//!   function of its inputs and the [`EngineConfig`]
//! - **Fleet**: Impact × probability matrix and peer comparison across assets
//! - **Signal**: Live breach probability against the tuned alert threshold
//!
//! Nothing here performs I/O apart from `ingest::load_batch` and
//! `EngineConfig::load`; every derivation is deterministic for a given batch.

pub mod assembler;
pub mod config;
pub mod fleet;
pub mod ingest;
pub mod narrative;
pub mod projection;
pub mod risk;
pub mod signal;
pub mod trends;
pub mod types;
pub mod units;

// Re-export engine configuration
pub use config::{ConfigError, EngineConfig};

// Re-export commonly used types
pub use types::{
    ActionTier, Asset, AssetKind, AssetMeta, AssetStatus, Explanation, FleetRiskSummary,
    MatrixCell, PeerComparison, Regime, RiskAnalysis, RiskBand, RiskHeat, RiskLevel,
    TelemetrySample,
};

// Re-export entry points
pub use assembler::{assemble_asset, assemble_fleet, AssemblyInput};
pub use fleet::{
    peer_comparison, peer_comparison_at, summarize_assets, summarize_fleet, ClassifiedAsset,
    RiskMatrix,
};
pub use ingest::{load_batch, parse_batch, IngestError, TelemetryBatch};
pub use narrative::vocabulary::AssetVocabulary;
