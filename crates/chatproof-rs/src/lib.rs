//! Public surface for chatproof.
//!
//! This crate re-exports the pipeline crates and provides the helpers the
//! `chatproof` binary is built from.

/// Re-export for convenience.
pub use chatproof_rs_config as config;
pub use chatproof_rs_core as core;
/// Re-export for convenience.
pub use chatproof_rs_protocol as protocol;
pub use chatproof_rs_validator as validator;

use chatproof_rs_core::{Proof, ProofError, load_input_dir};
use chatproof_rs_protocol::ScoreReport;
use chrono::{DateTime, Utc};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

/// Report file written into the output directory.
pub const RESULTS_FILE: &str = "results.json";

#[inline]
/// Initialize logging using env_logger if the "logging" feature is enabled.
///
/// Honours `RUST_LOG`. Safe to call more than once.
pub fn init_logging() {
    #[cfg(feature = "logging")]
    {
        let _ = env_logger::builder()
            .format_timestamp_millis()
            .parse_default_env()
            .try_init();
    }
}

/// Write `report` as pretty JSON to `<output_dir>/results.json`.
pub fn write_report(report: &ScoreReport, output_dir: &Path) -> Result<PathBuf, ProofError> {
    fs::create_dir_all(output_dir)?;
    let path = output_dir.join(RESULTS_FILE);
    fs::write(&path, serde_json::to_string_pretty(report)?)?;
    info!("report written (path={})", path.display());
    Ok(path)
}

/// Load the submission from the configured input directory, evaluate it as of
/// `now` and write the report to the configured output directory.
pub async fn evaluate_input_dir(
    proof: &Proof,
    now: DateTime<Utc>,
) -> Result<(ScoreReport, PathBuf), ProofError> {
    let config = proof.config();
    let submission = load_input_dir(Path::new(&config.input_dir), now)?;
    let report = proof.generate_at(&submission, now).await?;
    let path = write_report(&report, Path::new(&config.output_dir))?;
    Ok((report, path))
}
