//! Config typo detection.
//!
//! The raw TOML is parsed into a `toml::Value` first and every dotted key path
//! is checked against the paths of the serialized default config. Unknown keys
//! become warnings with a "did you mean" suggestion; serde then deserializes as
//! usual, so a typo never stops a config from loading.

use std::collections::HashSet;

use super::EngineConfig;

/// Suggestions further than this many edits away are not offered.
const MAX_SUGGESTION_DISTANCE: usize = 3;

/// A non-fatal config warning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// Dotted key path, e.g. `projection.critcal_pressure`.
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.suggestion {
            Some(s) => write!(f, "{} (did you mean '{s}'?)", self.message),
            None => f.write_str(&self.message),
        }
    }
}

// ============================================================================
// Key paths
// ============================================================================

/// Every dotted key path accepted by [`EngineConfig`], sections included.
///
/// Taken from the serialized defaults, so new fields are picked up without
/// editing a list.
pub fn known_config_keys() -> HashSet<String> {
    toml::Value::try_from(EngineConfig::default())
        .map(|v| walk_toml_keys(&v, "").into_iter().collect())
        .unwrap_or_default()
}

/// Dotted paths of every key under `value`, parents before children.
///
/// `{ a = { b = 1, c = 2 } }` yields `["a", "a.b", "a.c"]`.
pub fn walk_toml_keys(value: &toml::Value, prefix: &str) -> Vec<String> {
    let Some(table) = value.as_table() else {
        return Vec::new();
    };
    table
        .iter()
        .flat_map(|(key, child)| {
            let path = join(prefix, key);
            let nested = walk_toml_keys(child, &path);
            std::iter::once(path).chain(nested)
        })
        .collect()
}

fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

/// Unknown paths under `value`. Children of an unknown table are not
/// reported separately.
fn unknown_keys(value: &toml::Value, prefix: &str, known: &HashSet<String>, out: &mut Vec<String>) {
    let Some(table) = value.as_table() else {
        return;
    };
    for (key, child) in table {
        let path = join(prefix, key);
        if known.contains(&path) {
            unknown_keys(child, &path, known, out);
        } else {
            out.push(path);
        }
    }
}

// ============================================================================
// Suggestions
// ============================================================================

/// Edit distance between two strings (insert, delete, substitute).
fn levenshtein(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut row: Vec<usize> = (0..=b.len()).collect();

    for (i, ca) in a.chars().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if ca == cb {
                diagonal
            } else {
                1 + diagonal.min(above).min(row[j])
            };
            diagonal = above;
        }
    }
    row[b.len()]
}

/// Closest known key within [`MAX_SUGGESTION_DISTANCE`] edits.
///
/// Ties go to the lexicographically smallest key.
pub fn suggest_correction(unknown: &str, known: &HashSet<String>) -> Option<String> {
    known
        .iter()
        .map(|candidate| (levenshtein(unknown, candidate), candidate))
        .filter(|&(distance, _)| distance <= MAX_SUGGESTION_DISTANCE)
        .min()
        .map(|(_, candidate)| candidate.clone())
}

// ============================================================================
// Entry point
// ============================================================================

/// Warnings for every unknown key in `raw_toml`.
///
/// Unparseable input yields no warnings; the deserializer reports it.
pub fn validate_unknown_keys(raw_toml: &str) -> Vec<ValidationWarning> {
    let Ok(value) = raw_toml.parse::<toml::Value>() else {
        return Vec::new();
    };

    let known = known_config_keys();
    let mut unknown = Vec::new();
    unknown_keys(&value, "", &known, &mut unknown);

    unknown
        .into_iter()
        .map(|field| ValidationWarning {
            message: format!("Unknown config key '{field}'"),
            suggestion: suggest_correction(&field, &known),
            field,
        })
        .collect()
}
