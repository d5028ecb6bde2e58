//! Config Loading Tests
//!
//! Exercise `EngineConfig::load_from_file` against real files on disk:
//! partial overrides, range validation, typo tolerance and the defaults dump.

use std::io::Write;

use fleetsight::config::{ConfigError, EngineConfig};
use fleetsight::{assemble_asset, AssemblyInput, AssetKind, TelemetrySample};

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write config");
    file
}

#[test]
fn partial_file_overrides_only_named_values() {
    let file = write_config(
        r#"
[projection]
critical_pressure = 35.0

[tuning]
persistence_k = 5
"#,
    );
    let config = EngineConfig::load_from_file(file.path()).expect("valid config");
    let defaults = EngineConfig::default();

    assert_eq!(config.projection.critical_pressure, 35.0);
    assert_eq!(config.tuning.persistence_k, 5);
    assert_eq!(config.risk, defaults.risk, "untouched sections keep defaults");
    assert_eq!(config.assembly, defaults.assembly);
}

#[test]
fn empty_file_is_the_default_config() {
    let file = write_config("");
    let config = EngineConfig::load_from_file(file.path()).expect("empty config is valid");
    assert_eq!(config, EngineConfig::default());
}

#[test]
fn inverted_probability_breakpoints_are_rejected() {
    let file = write_config(
        r#"
[risk]
probability_high = 0.95
"#,
    );
    match EngineConfig::load_from_file(file.path()) {
        Err(ConfigError::Validation(errors)) => {
            assert!(
                errors.iter().any(|e| e.contains("risk.probability")),
                "unexpected errors: {errors:?}"
            );
        }
        other => panic!("expected a validation error, got {other:?}"),
    }
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let file = write_config("[projection\ncritical_pressure = ");
    assert!(matches!(
        EngineConfig::load_from_file(file.path()),
        Err(ConfigError::Parse(..))
    ));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("absent.toml");
    assert!(matches!(
        EngineConfig::load_from_file(&path),
        Err(ConfigError::Io(..))
    ));
}

#[test]
fn unknown_keys_warn_but_load() {
    let file = write_config(
        r#"
[projection]
critcal_pressure = 40.0
"#,
    );
    let config = EngineConfig::load_from_file(file.path()).expect("typos only warn");
    assert_eq!(
        config.projection.critical_pressure,
        EngineConfig::default().projection.critical_pressure,
        "misspelled key is ignored"
    );
}

#[test]
fn dumped_defaults_load_back_unchanged() {
    let dumped = EngineConfig::default().to_toml().expect("serializable");
    let file = write_config(&dumped);
    let config = EngineConfig::load_from_file(file.path()).expect("dumped defaults are valid");
    assert_eq!(config, EngineConfig::default());
}

#[test]
fn loaded_thresholds_reach_the_assembler() {
    let file = write_config(
        r#"
[projection]
critical_pressure = 60.0
"#,
    );
    let config = EngineConfig::load_from_file(file.path()).expect("valid config");
    let ts = chrono::Utc::now();
    let samples = vec![TelemetrySample::new(ts, 400.0)];

    let stock = assemble_asset(
        &AssemblyInput::new(AssetKind::Strainer, &samples),
        &EngineConfig::default(),
    )
    .expect("non-empty batch");
    let raised = assemble_asset(&AssemblyInput::new(AssetKind::Strainer, &samples), &config)
        .expect("non-empty batch");

    assert!(
        raised.predictions.periods_until_critical > stock.predictions.periods_until_critical,
        "a higher critical pressure buys more time"
    );
}
