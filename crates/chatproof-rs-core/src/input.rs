//! Loading a submission from an input directory.

use crate::error::{InputError, ProofError};
use crate::export::{Submission, parse_export};
use chrono::{DateTime, Utc};
use log::{debug, info};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Chat export document name.
pub const EXPORT_FILE: &str = "chats.json";
/// Optional document carrying the verification token.
pub const PROOF_TOKEN_FILE: &str = "zktls_proof.json";

const PROOF_TOKEN_KEY: &str = "zktls_proof";

/// Read the export (and optional proof token) from `dir`.
///
/// Other JSON files are ignored.
pub fn load_input_dir(dir: &Path, now: DateTime<Utc>) -> Result<Submission, ProofError> {
    let mut export = None;
    let mut proof_token = None;

    let mut entries = fs::read_dir(dir)?
        .map(|entry| entry.map(|entry| entry.path()))
        .collect::<Result<Vec<_>, _>>()?;
    entries.sort();

    for path in entries {
        if !path.is_file() || path.extension().and_then(|ext| ext.to_str()) != Some("json") {
            continue;
        }
        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default();
        match name {
            EXPORT_FILE => export = Some(fs::read_to_string(&path)?),
            PROOF_TOKEN_FILE => proof_token = read_proof_token(&path)?,
            _ => debug!("ignoring input file (path={})", path.display()),
        }
    }

    let contents = export.ok_or_else(|| InputError::MissingExport(dir.to_path_buf()))?;
    let submission = parse_export(&contents, proof_token.as_deref(), now)?;
    info!(
        "loaded submission (dir={}, conversations={})",
        dir.display(),
        submission.conversations.len()
    );
    Ok(submission)
}

fn read_proof_token(path: &Path) -> Result<Option<String>, ProofError> {
    let value: Value = serde_json::from_str(&fs::read_to_string(path)?)
        .map_err(|err| InputError::Malformed(format!("{}: {err}", path.display())))?;
    Ok(value
        .get(PROOF_TOKEN_KEY)
        .and_then(Value::as_str)
        .map(str::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn now() -> DateTime<Utc> {
        Utc.timestamp_opt(1_730_000_000, 0).single().expect("now")
    }

    #[test]
    fn loads_export_with_proof_token_fallback() {
        let temp = tempdir().expect("tempdir");
        fs::write(
            temp.path().join(EXPORT_FILE),
            r#"{"revision":"01.01","source":"telegram","user":"u","chats":[]}"#,
        )
        .expect("write export");
        fs::write(
            temp.path().join(PROOF_TOKEN_FILE),
            r#"{"zktls_proof":"zk-token"}"#,
        )
        .expect("write proof");
        fs::write(temp.path().join("notes.json"), "not even json").expect("write other");

        let submission = load_input_dir(temp.path(), now()).expect("submission");
        assert_eq!(submission.submission_token, "zk-token");
        assert!(submission.conversations.is_empty());
    }

    #[test]
    fn missing_export_is_reported() {
        let temp = tempdir().expect("tempdir");
        let err = load_input_dir(temp.path(), now()).unwrap_err();
        assert!(matches!(err, ProofError::Input(InputError::MissingExport(_))));
    }

    #[test]
    fn missing_dir_is_io_error() {
        let temp = tempdir().expect("tempdir");
        let err = load_input_dir(&temp.path().join("absent"), now()).unwrap_err();
        assert!(matches!(err, ProofError::Io(_)));
    }
}
