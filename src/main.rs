//! Fleetsight - Fleet Asset Condition Analytics
//!
//! Command-line front end over the derivation engine.
//!
//! # Usage
//!
//! ```bash
//! # Assemble one asset from a telemetry batch and print it as JSON
//! fleetsight assemble data/str-101.json
//!
//! # Fleet risk matrix and peer comparison around one asset
//! fleetsight fleet data/*.json --selected STR-101
//!
//! # Validate a config file, or print the built-in defaults
//! fleetsight check-config fleetsight.toml
//! fleetsight check-config --dump-defaults
//! ```
//!
//! # Environment Variables
//!
//! - `FLEETSIGHT_CONFIG`: Path to the engine config (default: ./fleetsight.toml)
//! - `RUST_LOG`: Logging level (default: info)

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, warn};

use fleetsight::fleet::{peer_comparison, summarize_assets, ClassifiedAsset, RiskMatrix};
use fleetsight::{
    assemble_asset, assemble_fleet, load_batch, AssemblyInput, AssetKind, EngineConfig,
    TelemetryBatch,
};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "fleetsight")]
#[command(about = "Fleet asset condition analytics")]
#[command(version)]
struct CliArgs {
    /// Engine config file. Overrides FLEETSIGHT_CONFIG and ./fleetsight.toml
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: SubCommand,
}

#[derive(Subcommand, Debug)]
enum SubCommand {
    /// Assemble one asset from a telemetry batch and print it as JSON
    Assemble {
        /// Telemetry batch (JSON array or `kpis` envelope)
        batch: PathBuf,
        #[arg(long, value_enum, default_value_t = KindArg::Strainer)]
        kind: KindArg,
    },

    /// Summarise a fleet of batches around one selected asset
    Fleet {
        /// One telemetry batch per asset
        #[arg(required = true)]
        batches: Vec<PathBuf>,
        /// Asset id to summarise around
        #[arg(long)]
        selected: String,
        #[arg(long, value_enum, default_value_t = KindArg::Strainer)]
        kind: KindArg,
        /// Print the summary as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Validate a config file
    CheckConfig {
        /// Config file to validate
        #[arg(required_unless_present = "dump_defaults")]
        path: Option<PathBuf>,
        /// Print the built-in defaults as TOML
        #[arg(long)]
        dump_defaults: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum KindArg {
    Strainer,
    Compressor,
    Pipeline,
}

impl From<KindArg> for AssetKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Strainer => AssetKind::Strainer,
            KindArg::Compressor => AssetKind::Compressor,
            KindArg::Pipeline => AssetKind::PipelineSegment,
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_config(explicit: Option<&Path>) -> Result<EngineConfig> {
    match explicit {
        Some(path) => EngineConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(EngineConfig::load()),
    }
}

/// Expand directories into their `*.json` files, sorted by name.
fn batch_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if !path.is_dir() {
            files.push(path.clone());
            continue;
        }
        let mut found: Vec<PathBuf> = std::fs::read_dir(path)
            .with_context(|| format!("Failed to list {}", path.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            .collect();
        found.sort();
        if found.is_empty() {
            warn!(dir = %path.display(), "No .json batches in directory");
        }
        files.extend(found);
    }
    Ok(files)
}

/// Load every batch. A batch without an id takes its file stem, so id-less
/// files stay distinguishable in the fleet.
fn load_batches(paths: &[PathBuf]) -> Result<Vec<TelemetryBatch>> {
    let mut batches = Vec::new();
    let mut seen = HashSet::new();
    for path in batch_files(paths)? {
        let mut batch = load_batch(&path)
            .with_context(|| format!("Failed to read batch {}", path.display()))?;
        if batch.meta.id.is_none() {
            batch.meta.id = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned());
        }
        if let Some(id) = &batch.meta.id {
            if !seen.insert(id.clone()) {
                warn!(asset = %id, file = %path.display(), "Duplicate asset id in fleet");
            }
        }
        batches.push(batch);
    }
    Ok(batches)
}

// ============================================================================
// Subcommands
// ============================================================================

fn run_assemble(batch: &Path, kind: AssetKind, config: &EngineConfig) -> Result<()> {
    let batch = load_batch(batch).with_context(|| format!("Failed to read batch {}", batch.display()))?;
    let Some(asset) = assemble_asset(&AssemblyInput::from_batch(&batch, kind), config) else {
        bail!("Batch contains no samples");
    };
    info!(asset = %asset.id, status = %asset.status, "Asset assembled");
    println!("{}", serde_json::to_string_pretty(&asset)?);
    Ok(())
}

fn run_fleet(
    paths: &[PathBuf],
    selected: &str,
    kind: AssetKind,
    json: bool,
    config: &EngineConfig,
) -> Result<()> {
    let batches = load_batches(paths)?;
    let inputs: Vec<AssemblyInput<'_>> = batches
        .iter()
        .map(|b| AssemblyInput::from_batch(b, kind))
        .collect();
    let fleet = assemble_fleet(&inputs, config);
    if fleet.len() < inputs.len() {
        warn!(
            skipped = inputs.len() - fleet.len(),
            "Empty batches left out of the fleet"
        );
    }

    let Some(summary) = summarize_assets(&fleet, selected) else {
        bail!("Asset '{selected}' is not in the fleet");
    };
    let peers = peer_comparison(&fleet, selected);

    if json {
        let out = serde_json::json!({ "summary": summary, "peers": peers });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("{}", summary.describe(selected));
    println!();
    println!("Impact \\ Probability   VL   L    M    H    VH");
    let classified: Vec<ClassifiedAsset> = fleet.iter().map(ClassifiedAsset::from).collect();
    for (impact, row) in RiskMatrix::build(&classified).rows_top_down() {
        let cells: Vec<String> = row.iter().map(|n| format!("{n:<4}")).collect();
        println!("{:<22} {}", impact.label(), cells.join(" "));
    }
    if let Some(p) = peers {
        println!();
        println!(
            "Against {} peers: pressure {:+.2}, rate {:+.3}/{}, efficiency {:+.1}%",
            p.pool_size,
            p.pressure_delta,
            p.rate_delta,
            config.projection.period_unit(),
            p.efficiency_delta
        );
    }
    Ok(())
}

fn run_check_config(path: Option<&Path>, dump_defaults: bool) -> Result<()> {
    if dump_defaults {
        print!("{}", EngineConfig::default().to_toml()?);
        return Ok(());
    }
    let Some(path) = path else {
        bail!("No config file given");
    };
    EngineConfig::load_from_file(path)
        .with_context(|| format!("Config {} is invalid", path.display()))?;
    println!("{}: OK", path.display());
    Ok(())
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_tracing(args.log_json);

    match &args.command {
        SubCommand::CheckConfig {
            path,
            dump_defaults,
        } => run_check_config(path.as_deref(), *dump_defaults),
        SubCommand::Assemble { batch, kind } => {
            let config = load_config(args.config.as_deref())?;
            run_assemble(batch, (*kind).into(), &config)
        }
        SubCommand::Fleet {
            batches,
            selected,
            kind,
            json,
        } => {
            let config = load_config(args.config.as_deref())?;
            run_fleet(batches, selected, (*kind).into(), *json, &config)
        }
    }
}
