//! `CHATPROOF_*` environment overrides.

use serde_json::{Map, Value};
use std::collections::BTreeMap;

const ENV_PREFIX: &str = "CHATPROOF_";

/// Environment variable to config key mapping. All overridable keys are strings.
const ENV_KEYS: [(&str, &str); 5] = [
    ("CHATPROOF_SALT", "salt"),
    ("CHATPROOF_DLP_ID", "dlp_id"),
    ("CHATPROOF_VALIDATOR_BASE_URL", "validator_base_url"),
    ("CHATPROOF_INPUT_DIR", "input_dir"),
    ("CHATPROOF_OUTPUT_DIR", "output_dir"),
];

/// Snapshot the process environment, keeping only `CHATPROOF_*` entries.
pub(super) fn capture_process_env() -> BTreeMap<String, String> {
    std::env::vars()
        .filter(|(key, _)| key.starts_with(ENV_PREFIX))
        .collect()
}

/// Write env values over the merged config. Empty values are ignored.
/// Returns true when at least one override was applied.
pub(super) fn apply_env_overrides(merged: &mut Value, env: &BTreeMap<String, String>) -> bool {
    if !merged.is_object() {
        *merged = Value::Object(Map::new());
    }
    let Some(map) = merged.as_object_mut() else {
        return false;
    };
    let mut applied = false;
    for (var, key) in ENV_KEYS {
        if let Some(value) = env.get(var).filter(|value| !value.trim().is_empty()) {
            map.insert(key.to_string(), Value::String(value.clone()));
            applied = true;
        }
    }
    applied
}
