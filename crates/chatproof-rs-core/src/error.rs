//! Error types for the proof pipeline.

use chatproof_rs_config::ConfigError;
use chatproof_rs_protocol::AuthorityError;
use std::path::PathBuf;
use thiserror::Error;

/// Problems with the submitted export itself. Always fatal.
#[derive(Debug, Error)]
pub enum InputError {
    /// The export declares a format revision this build does not read.
    #[error("unsupported export revision: {0}")]
    UnsupportedRevision(String),
    /// The export source does not map to a known data source.
    #[error("unmapped export source: {0}")]
    UnmappedSource(String),
    /// A required field is absent or empty.
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    /// The input directory holds no export document.
    #[error("no chat export found in {}", .0.display())]
    MissingExport(PathBuf),
    /// The export could not be decoded.
    #[error("malformed export: {0}")]
    Malformed(String),
}

/// Errors returned by proof evaluation.
#[derive(Debug, Error)]
pub enum ProofError {
    /// Input error.
    #[error("input error: {0}")]
    Input(#[from] InputError),
    /// Call to the validation authority failed.
    #[error("authority error: {0}")]
    Authority(#[from] AuthorityError),
    /// History lookup answered but flagged the request invalid.
    #[error("history lookup rejected: {0}")]
    HistoryRejected(String),
    /// Config error.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    /// Identity hashing could not be keyed.
    #[error("identity error: {0}")]
    Identity(String),
    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization error.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
