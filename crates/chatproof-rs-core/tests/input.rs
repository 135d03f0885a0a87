//! Loading and parsing exports from an input directory.

use chatproof_rs_core::{EXPORT_FILE, InputError, PROOF_TOKEN_FILE, ProofError, load_input_dir};
use chatproof_rs_test_utils::{ChatBuilder, ExportBuilder, submitted_at};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::tempdir;

#[test]
fn input_dir_round_trip_builds_conversations() {
    let temp = tempdir().expect("tempdir");
    let export = ExportBuilder::new()
        .chat(
            ChatBuilder::new("group-1")
                .text(1, "hello", 120)
                .text(2, "hey", 60)
                .photo(3),
        )
        .chat(ChatBuilder::new(99));
    fs::write(temp.path().join(EXPORT_FILE), export.to_json()).expect("write");

    let submission = load_input_dir(temp.path(), submitted_at()).expect("submission");

    assert_eq!(submission.submitted_on, submitted_at());
    assert_eq!(submission.conversations.len(), 1);
    let conversation = &submission.conversations[0];
    assert_eq!(conversation.chat_id(), "group-1");
    assert_eq!(conversation.participant_count(), 2);
    assert_eq!(conversation.total_content_length(), 8);
    // 2 minutes * 5 + 1 minute * 3
    assert_eq!(conversation.total_content_value(), 13);
}

#[test]
fn proof_token_file_supplies_missing_token() {
    let temp = tempdir().expect("tempdir");
    let export = ExportBuilder::new().token(None);
    fs::write(temp.path().join(EXPORT_FILE), export.to_json()).expect("write");
    fs::write(temp.path().join(PROOF_TOKEN_FILE), r#"{"zktls_proof":"zk"}"#).expect("write");

    let submission = load_input_dir(temp.path(), submitted_at()).expect("submission");
    assert_eq!(submission.submission_token, "zk");
}

#[test]
fn token_is_required_somewhere() {
    let temp = tempdir().expect("tempdir");
    let export = ExportBuilder::new().token(None);
    fs::write(temp.path().join(EXPORT_FILE), export.to_json()).expect("write");

    let err = load_input_dir(temp.path(), submitted_at()).unwrap_err();
    assert!(matches!(
        err,
        ProofError::Input(InputError::MissingField("submission_token"))
    ));
}

#[test]
fn unsupported_revision_is_fatal() {
    let temp = tempdir().expect("tempdir");
    let export = ExportBuilder::new().revision("00.09");
    fs::write(temp.path().join(EXPORT_FILE), export.to_json()).expect("write");

    let err = load_input_dir(temp.path(), submitted_at()).unwrap_err();
    assert!(matches!(
        err,
        ProofError::Input(InputError::UnsupportedRevision(_))
    ));
}

#[test]
fn unmapped_source_is_fatal() {
    let temp = tempdir().expect("tempdir");
    let export = ExportBuilder::new()
        .source("whatsapp")
        .chat(ChatBuilder::new(1).text(1, "hi", 0));
    fs::write(temp.path().join(EXPORT_FILE), export.to_json()).expect("write");

    let err = load_input_dir(temp.path(), submitted_at()).unwrap_err();
    assert!(matches!(
        err,
        ProofError::Input(InputError::UnmappedSource(ref source)) if source == "WHATSAPP"
    ));
}
