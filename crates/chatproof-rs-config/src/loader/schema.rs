//! Schema validation helpers for JSON5 proof configuration.

use super::SchemaMode;
use crate::ConfigError;
use serde_json::{Map, Value};

const STRING_KEYS: [&str; 6] = [
    "$schema",
    "input_dir",
    "output_dir",
    "salt",
    "dlp_id",
    "validator_base_url",
];

const NUMBER_KEYS: [&str; 4] = [
    "cooldown_hours",
    "duplicate_window_hours",
    "reward_scaling_factor",
    "minimum_score",
];

const INTEGER_KEYS: [&str; 1] = ["request_timeout_secs"];

/// Keys the effective config must carry; single layers may omit them.
const REQUIRED_KEYS: [&str; 3] = ["salt", "dlp_id", "validator_base_url"];

/// Validate a config layer (or the merged config) against the schema.
pub(super) fn validate_layer_schema(
    value: &Value,
    mode: SchemaMode,
    layer: &str,
) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, "")?;
    let allowed: Vec<&str> = STRING_KEYS
        .iter()
        .chain(NUMBER_KEYS.iter())
        .chain(INTEGER_KEYS.iter())
        .copied()
        .collect();
    ensure_allowed_keys(map, &allowed, layer, "")?;

    for key in STRING_KEYS {
        if let Some(value) = map.get(key) {
            expect_string(value, layer, key)?;
        }
    }
    for key in NUMBER_KEYS {
        if let Some(value) = map.get(key) {
            expect_f64(value, layer, key)?;
        }
    }
    for key in INTEGER_KEYS {
        if let Some(value) = map.get(key) {
            expect_u64(value, layer, key)?;
        }
    }

    if mode == SchemaMode::Full {
        for key in REQUIRED_KEYS {
            if !map.contains_key(key) {
                return Err(invalid_field(layer, key, "missing required key"));
            }
        }
    }
    Ok(())
}

/// Expect a JSON object or return a typed error.
fn expect_object<'a>(
    value: &'a Value,
    layer: &str,
    path: &str,
) -> Result<&'a Map<String, Value>, ConfigError> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(invalid_field(layer, path, "expected object")),
    }
}

fn expect_string(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if value.as_str().is_some() {
        Ok(())
    } else {
        Err(invalid_field(layer, path, "expected string"))
    }
}

/// Expect a non-negative JSON integer.
fn expect_u64(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if value.is_u64() {
        Ok(())
    } else {
        Err(invalid_field(layer, path, "expected non-negative integer"))
    }
}

fn expect_f64(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if value.is_number() {
        Ok(())
    } else {
        Err(invalid_field(layer, path, "expected number"))
    }
}

/// Ensure an object contains only allowed keys.
fn ensure_allowed_keys(
    map: &Map<String, Value>,
    allowed: &[&str],
    layer: &str,
    path: &str,
) -> Result<(), ConfigError> {
    for key in map.keys() {
        if !allowed.contains(&key.as_str()) {
            return Err(invalid_field(layer, &join_path(path, key), "unknown key"));
        }
    }
    Ok(())
}

fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

/// Build a structured invalid-field error.
fn invalid_field(layer: &str, path: &str, message: &str) -> ConfigError {
    let normalized_path = if path.is_empty() { "root" } else { path };
    ConfigError::InvalidField {
        path: format!("{layer}:{normalized_path}"),
        message: message.to_string(),
    }
}
