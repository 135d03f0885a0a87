//! Configuration schema for the proof pipeline.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root config for a proof evaluation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProofConfig {
    #[serde(default, rename = "$schema")]
    pub schema: Option<String>,
    /// Directory holding `chats.json` and the optional proof token file.
    #[serde(default = "default_input_dir")]
    pub input_dir: String,
    /// Directory `results.json` is written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    /// Secret salt for identity hashing.
    #[serde(default)]
    pub salt: String,
    /// Data liquidity pool identifier stamped on every report.
    #[serde(default)]
    pub dlp_id: String,
    /// Base URL of the validation authority.
    #[serde(default)]
    pub validator_base_url: String,
    /// Minimum hours between two accepted submissions of one user.
    #[serde(default = "default_cooldown_hours")]
    pub cooldown_hours: f64,
    /// Window in which a re-sent conversation counts as a duplicate.
    #[serde(default = "default_duplicate_window_hours")]
    pub duplicate_window_hours: f64,
    /// Divisor normalizing summed scores against the maximum reward.
    #[serde(default = "default_reward_scaling_factor")]
    pub reward_scaling_factor: f64,
    /// Floor applied to the final score of a scored submission.
    #[serde(default = "default_minimum_score")]
    pub minimum_score: f64,
    /// Per-request timeout for authority calls.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for ProofConfig {
    fn default() -> Self {
        Self {
            schema: None,
            input_dir: default_input_dir(),
            output_dir: default_output_dir(),
            salt: String::new(),
            dlp_id: String::new(),
            validator_base_url: String::new(),
            cooldown_hours: default_cooldown_hours(),
            duplicate_window_hours: default_duplicate_window_hours(),
            reward_scaling_factor: default_reward_scaling_factor(),
            minimum_score: default_minimum_score(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl ProofConfig {
    /// Start building a config programmatically with defaults applied.
    pub fn builder() -> ProofConfigBuilder {
        ProofConfigBuilder::new()
    }

    /// Authority request timeout as a `Duration`.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Builder for assembling a `ProofConfig` in code.
#[derive(Debug, Default, Clone)]
pub struct ProofConfigBuilder {
    config: ProofConfig,
}

impl ProofConfigBuilder {
    /// Create a new builder seeded with default config values.
    pub fn new() -> Self {
        Self {
            config: ProofConfig::default(),
        }
    }

    pub fn input_dir(mut self, input_dir: impl Into<String>) -> Self {
        self.config.input_dir = input_dir.into();
        self
    }

    pub fn output_dir(mut self, output_dir: impl Into<String>) -> Self {
        self.config.output_dir = output_dir.into();
        self
    }

    pub fn salt(mut self, salt: impl Into<String>) -> Self {
        self.config.salt = salt.into();
        self
    }

    pub fn dlp_id(mut self, dlp_id: impl Into<String>) -> Self {
        self.config.dlp_id = dlp_id.into();
        self
    }

    pub fn validator_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.validator_base_url = url.into();
        self
    }

    pub fn cooldown_hours(mut self, hours: f64) -> Self {
        self.config.cooldown_hours = hours;
        self
    }

    pub fn duplicate_window_hours(mut self, hours: f64) -> Self {
        self.config.duplicate_window_hours = hours;
        self
    }

    pub fn reward_scaling_factor(mut self, factor: f64) -> Self {
        self.config.reward_scaling_factor = factor;
        self
    }

    pub fn minimum_score(mut self, minimum: f64) -> Self {
        self.config.minimum_score = minimum;
        self
    }

    /// Finalize and return the built `ProofConfig`.
    pub fn build(self) -> ProofConfig {
        self.config
    }
}

fn default_input_dir() -> String {
    "input".to_string()
}

fn default_output_dir() -> String {
    "output".to_string()
}

fn default_cooldown_hours() -> f64 {
    4.0
}

fn default_duplicate_window_hours() -> f64 {
    12.0
}

fn default_reward_scaling_factor() -> f64 {
    100.0
}

/// Small positive floor so a valid but low-value submission never earns zero.
fn default_minimum_score() -> f64 {
    0.01
}

fn default_request_timeout_secs() -> u64 {
    30
}
