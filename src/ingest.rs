//! Telemetry batch ingestion
//!
//! Accepts either a bare JSON array of samples or an envelope:
//!
//! ```json
//! { "kpis": [ ... ], "explanation": { "reasons": [], "actions": [] }, "meta": { ... } }
//! ```
//!
//! This is the shape check in front of the pure engine. Numbers may arrive as
//! JSON numbers or numeric strings; `null` means absent. Unknown band and
//! regime strings fall back to their neutral defaults. Anything else that
//! does not fit is an [`IngestError`].

use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::types::{AssetMeta, Explanation, Location, Regime, RiskBand, TelemetrySample};

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Batch I/O error ({}): {}", .0.display(), .1)]
    Io(PathBuf, std::io::Error),

    #[error("Telemetry JSON decode error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Telemetry payload must be an array of samples or an object with a `kpis` array")]
    Shape,

    #[error("Sample {index}: {message}")]
    Sample { index: usize, message: String },
}

/// A parsed batch: samples sorted oldest first, plus side inputs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TelemetryBatch {
    pub samples: Vec<TelemetrySample>,
    pub explanation: Option<Explanation>,
    pub meta: AssetMeta,
}

/// Parse an ISO-8601 timestamp. Offsets are honoured; naive values and bare
/// dates are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn lenient_number(value: Option<&Value>) -> Result<Option<f64>, String> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Ok(n.as_f64()),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| format!("'{s}' is not a number")),
        Some(other) => Err(format!("expected a number, found {other}")),
    }
}

fn string_field<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    obj.get(key).and_then(Value::as_str)
}

fn parse_sample(index: usize, value: &Value) -> Result<(TelemetrySample, Option<String>), IngestError> {
    let err = |message: String| IngestError::Sample { index, message };
    let obj = value
        .as_object()
        .ok_or_else(|| err("sample is not an object".to_string()))?;

    let ts = match obj.get("ts") {
        Some(Value::String(raw)) => {
            parse_timestamp(raw).ok_or_else(|| err(format!("unparseable timestamp '{raw}'")))?
        }
        Some(_) => return Err(err("timestamp must be a string".to_string())),
        None => return Err(err("missing timestamp".to_string())),
    };

    let number = |key: &str| lenient_number(obj.get(key)).map_err(|m| err(format!("{key}: {m}")));

    let sample = TelemetrySample {
        ts,
        dp_excess_mbar: number("dp_excess_mbar")?,
        prob_breach7d: number("prob_breach7d")?,
        prob_breach7d_raw: number("prob_breach7d_raw")?,
        risk_band: string_field(obj, "risk_band")
            .map(RiskBand::parse_lenient)
            .unwrap_or_default(),
        regime: string_field(obj, "regime")
            .map(Regime::parse_lenient)
            .unwrap_or_default(),
        threshold_eff: number("threshold_eff")?,
    };
    let id = string_field(obj, "id").map(str::to_string);
    Ok((sample, id))
}

fn parse_meta(value: Option<&Value>) -> AssetMeta {
    let Some(obj) = value.and_then(Value::as_object) else {
        return AssetMeta::default();
    };

    let last_clean_date = string_field(obj, "last_clean_date").and_then(|raw| {
        let parsed = parse_timestamp(raw);
        if parsed.is_none() {
            warn!(value = %raw, "Ignoring unparseable meta.last_clean_date");
        }
        parsed
    });

    let location = obj
        .get("location")
        .and_then(|v| serde_json::from_value::<Location>(v.clone()).ok());

    AssetMeta {
        id: string_field(obj, "id").map(str::to_string),
        last_clean_date,
        location,
    }
}

/// Parse a telemetry payload.
pub fn parse_batch(json: &str) -> Result<TelemetryBatch, IngestError> {
    let root: Value = serde_json::from_str(json)?;

    let (kpis, explanation, meta) = match &root {
        Value::Array(items) => (items, None, AssetMeta::default()),
        Value::Object(obj) => {
            let Some(Value::Array(items)) = obj.get("kpis") else {
                return Err(IngestError::Shape);
            };
            let explanation = match obj.get("explanation") {
                None | Some(Value::Null) => None,
                Some(v) => Some(serde_json::from_value::<Explanation>(v.clone())?),
            };
            (items, explanation, parse_meta(obj.get("meta")))
        }
        _ => return Err(IngestError::Shape),
    };

    let mut parsed = kpis
        .iter()
        .enumerate()
        .map(|(index, value)| parse_sample(index, value))
        .collect::<Result<Vec<_>, _>>()
        .inspect_err(|e| warn!(error = %e, "Rejected telemetry batch"))?;
    parsed.sort_by_key(|(sample, _)| sample.ts);
    let (samples, ids): (Vec<TelemetrySample>, Vec<Option<String>>) = parsed.into_iter().unzip();

    let mut meta = meta;
    if meta.id.is_none() {
        meta.id = ids.into_iter().rev().flatten().next();
    }

    debug!(
        samples = samples.len(),
        explained = explanation.is_some(),
        "Parsed telemetry batch"
    );

    Ok(TelemetryBatch {
        samples,
        explanation,
        meta,
    })
}

/// Read and parse a telemetry payload from disk.
pub fn load_batch(path: &Path) -> Result<TelemetryBatch, IngestError> {
    let contents =
        std::fs::read_to_string(path).map_err(|e| IngestError::Io(path.to_path_buf(), e))?;
    parse_batch(&contents)
}
