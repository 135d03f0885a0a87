//! Layered configuration loader.
//!
//! Discovers configuration layers (user, cwd, runtime overrides), validates
//! each against the schema, merges them, applies environment overrides and
//! produces a final validated `ProofConfig`.

mod env;
mod layer_io;
mod merge;
mod schema;


use crate::{ConfigError, ProofConfig};
use log::{debug, info};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

/// Default config filename in local layers.
const DEFAULT_CONFIG_FILE: &str = "chatproof.json5";
/// Default config directory under the user's home.
const DEFAULT_CONFIG_DIR: &str = ".chatproof";

/// Effective config plus metadata about which layers were loaded.
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    /// The merged, validated config.
    pub config: ProofConfig,
    /// Metadata for each layer that contributed.
    pub layers: Vec<ConfigLayer>,
}

/// Origin for a single config layer in the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigLayerSource {
    /// User-specific configuration.
    User,
    /// Current working directory configuration.
    Cwd,
    /// Explicit runtime config files.
    Runtime,
    /// `CHATPROOF_*` environment variables (highest precedence).
    Environment,
}

/// Metadata about a config layer.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigLayer {
    pub source: ConfigLayerSource,
    /// Location on disk if the layer is file backed.
    pub path: Option<PathBuf>,
}

/// Schema validation mode for layered configs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SchemaMode {
    /// Type checks only, for individual layers.
    Partial,
    /// Type checks for the effective config.
    Full,
}

/// Options controlling layered config discovery and overrides.
#[derive(Debug, Clone)]
pub struct LayeredConfigOptions {
    /// Working directory used to find the cwd layer.
    pub cwd: PathBuf,
    /// Optional user config path (defaults to `~/.chatproof/chatproof.json5`).
    pub user_config_path: Option<PathBuf>,
    /// Runtime override config paths applied after file discovery.
    pub runtime_paths: Vec<PathBuf>,
    /// Environment snapshot used for `CHATPROOF_*` overrides.
    pub env: BTreeMap<String, String>,
}

impl LayeredConfigOptions {
    /// Create options with default layer locations for the provided cwd.
    pub fn new(cwd: impl AsRef<Path>) -> Self {
        Self {
            cwd: cwd.as_ref().to_path_buf(),
            user_config_path: layer_io::default_user_config_path(),
            runtime_paths: Vec::new(),
            env: env::capture_process_env(),
        }
    }

    /// Add a runtime override config path that is applied after discovery.
    pub fn with_runtime_path(mut self, path: impl AsRef<Path>) -> Self {
        self.runtime_paths.push(path.as_ref().to_path_buf());
        self
    }

    /// Replace the environment snapshot.
    pub fn with_env(mut self, env: BTreeMap<String, String>) -> Self {
        self.env = env;
        self
    }
}

impl ProofConfig {
    /// Load a single config from a path (no layering, no env overrides).
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        info!("loading config from path: {}", path.as_ref().display());
        let contents = fs::read_to_string(path)?;
        let value: Value = json5::from_str(&contents)?;
        config_from_value(value, "config")
    }

    /// Load a single config from JSON5 contents (no layering, no env overrides).
    pub fn load_from_str(contents: &str) -> Result<Self, ConfigError> {
        debug!("loading config from raw contents (len={})", contents.len());
        let value: Value = json5::from_str(contents)?;
        config_from_value(value, "config")
    }

    /// Load a layered config stack using the default layer locations.
    pub fn load_layered(cwd: impl AsRef<Path>) -> Result<LayeredConfig, ConfigError> {
        Self::load_layered_with_options(LayeredConfigOptions::new(cwd))
    }

    /// Load a layered config stack using explicit layer locations.
    ///
    /// Layer precedence (low -> high): user, cwd, runtime paths, environment.
    pub fn load_layered_with_options(
        options: LayeredConfigOptions,
    ) -> Result<LayeredConfig, ConfigError> {
        let mut layers = Vec::new();
        let mut merged = Value::Object(serde_json::Map::new());
        let mut seen_paths = HashSet::new();

        let mut candidates = Vec::new();
        if let Some(path) = options.user_config_path.clone() {
            candidates.push((ConfigLayerSource::User, path, false));
        }
        candidates.push((
            ConfigLayerSource::Cwd,
            options.cwd.join(DEFAULT_CONFIG_FILE),
            false,
        ));
        for path in &options.runtime_paths {
            candidates.push((ConfigLayerSource::Runtime, path.clone(), true));
        }

        for (source, path, required) in candidates {
            let unique = path.canonicalize().unwrap_or_else(|_| path.clone());
            if !seen_paths.insert(unique) {
                debug!(
                    "skipping duplicate layer (source={:?}, path={})",
                    source,
                    path.display()
                );
                continue;
            }
            let loaded = if required {
                Some(layer_io::load_required_layer(source, &path)?)
            } else {
                layer_io::load_optional_layer(source, &path)?
            };
            if let Some(layer) = loaded {
                debug!("loaded {:?} layer (path={})", source, path.display());
                merge::merge_json_values(&mut merged, &layer.value);
                layers.push(layer.meta);
            }
        }

        if env::apply_env_overrides(&mut merged, &options.env) {
            debug!("applied environment overrides");
            layers.push(ConfigLayer {
                source: ConfigLayerSource::Environment,
                path: None,
            });
        }

        let config = config_from_value(merged, "effective")?;
        info!("layered config loaded (layers={})", layers.len());
        Ok(LayeredConfig { config, layers })
    }

    /// Validate configuration invariants that cannot be expressed in serde.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.salt.trim().is_empty() {
            return Err(required("salt"));
        }
        if self.dlp_id.trim().is_empty() {
            return Err(required("dlp_id"));
        }
        let url = self.validator_base_url.trim();
        if url.is_empty() {
            return Err(required("validator_base_url"));
        }
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ConfigError::InvalidField {
                path: "validator_base_url".to_string(),
                message: "must start with http:// or https://".to_string(),
            });
        }
        for (name, value) in [
            ("cooldown_hours", self.cooldown_hours),
            ("duplicate_window_hours", self.duplicate_window_hours),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidField {
                    path: name.to_string(),
                    message: "must be a non-negative number".to_string(),
                });
            }
        }
        if !self.reward_scaling_factor.is_finite() || self.reward_scaling_factor <= 0.0 {
            return Err(ConfigError::InvalidField {
                path: "reward_scaling_factor".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        if !(self.minimum_score > 0.0 && self.minimum_score <= 1.0) {
            return Err(ConfigError::InvalidField {
                path: "minimum_score".to_string(),
                message: "must be in (0, 1]".to_string(),
            });
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Internal representation of a loaded config layer.
#[derive(Debug, Clone)]
struct LoadedLayer {
    meta: ConfigLayer,
    value: Value,
}

fn config_from_value(value: Value, label: &str) -> Result<ProofConfig, ConfigError> {
    schema::validate_layer_schema(&value, SchemaMode::Full, label)?;
    let config: ProofConfig = serde_json::from_value(value)?;
    config.validate()?;
    Ok(config)
}

fn required(field: &str) -> ConfigError {
    ConfigError::InvalidField {
        path: field.to_string(),
        message: "is required".to_string(),
    }
}
