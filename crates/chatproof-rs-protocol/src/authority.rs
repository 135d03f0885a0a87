//! Validation authority interface and its request/response payloads.

use crate::timestamp::naive_timestamp;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Errors returned by validation authority implementations.
#[derive(Debug, thiserror::Error)]
pub enum AuthorityError {
    /// The request never produced a response (connect, timeout, TLS).
    #[error("transport failed: {0}")]
    Transport(String),
    /// The authority answered with a non-success status.
    #[error("authority returned status {status}: {body}")]
    Status { status: u16, body: String },
    /// The response body could not be decoded.
    #[error("failed to decode response: {0}")]
    Decode(String),
    /// The authority is not configured correctly.
    #[error("invalid authority configuration: {0}")]
    InvalidConfig(String),
}

/// Payload for the authenticity check of a submission token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VerificationRequest {
    /// Verification kind; `0` is a plain submission token.
    pub verification_type: u8,
    /// Source platform code.
    pub data_source: u8,
    /// Token issued to the submitter.
    pub token: String,
    /// Submission reference id.
    pub reference: String,
    /// Pseudonymous submitter identifier.
    pub submitted_by: String,
    /// Submission timestamp.
    pub submitted_on: DateTime<Utc>,
}

/// Result of an authenticity check.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyTokenResult {
    #[serde(default)]
    pub is_valid: bool,
    #[serde(default)]
    pub error_text: String,
    #[serde(default)]
    pub proof_token: String,
}

/// Per-conversation aggregate as sent to (and recorded by) the authority.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SubmissionChat {
    pub source_chat_id: String,
    pub participant_count: usize,
    pub chat_count: usize,
    pub chat_length: usize,
    pub chat_start_on: DateTime<Utc>,
    pub chat_ended_on: DateTime<Utc>,
}

/// Normalized submission sent for history lookup and persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SubmissionPayload {
    pub data_source: u8,
    pub source_id: String,
    pub submission_token: String,
    pub submitted_by: String,
    pub submitted_on: DateTime<Utc>,
    pub chats: Vec<SubmissionChat>,
}

/// One historical snapshot of a conversation as recorded by the authority.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalChat {
    #[serde(default)]
    pub participant_count: usize,
    #[serde(default)]
    pub chat_count: usize,
    #[serde(default)]
    pub chat_length: usize,
    #[serde(with = "naive_timestamp")]
    pub chat_start_on: NaiveDateTime,
    #[serde(with = "naive_timestamp")]
    pub chat_ended_on: NaiveDateTime,
}

/// Historical snapshots for one conversation key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatHistory {
    #[serde(default)]
    pub source_chat_id: String,
    #[serde(default)]
    pub chats: Vec<HistoricalChat>,
}

/// The user's previously recorded submissions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionHistory {
    #[serde(default)]
    pub is_valid: bool,
    #[serde(default)]
    pub error_text: String,
    #[serde(default, with = "naive_timestamp::option")]
    pub last_submission: Option<NaiveDateTime>,
    #[serde(default)]
    pub chat_histories: Vec<ChatHistory>,
}

/// Result of persisting a submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitDataResult {
    #[serde(default)]
    pub is_valid: bool,
    #[serde(default)]
    pub error_text: String,
}

/// Remote authority that verifies tokens, serves submission history and
/// persists accepted submissions.
#[async_trait]
pub trait ValidationAuthority: Send + Sync {
    /// Check that a submission token is authentic.
    async fn verify_token(
        &self,
        request: &VerificationRequest,
    ) -> Result<VerifyTokenResult, AuthorityError>;

    /// Fetch previously recorded aggregates for the submitting user.
    async fn historical_chats(
        &self,
        submission: &SubmissionPayload,
    ) -> Result<SubmissionHistory, AuthorityError>;

    /// Persist a scored submission.
    async fn submit_data(
        &self,
        submission: &SubmissionPayload,
    ) -> Result<SubmitDataResult, AuthorityError>;
}

#[cfg(test)]
mod tests {
    use super::{SubmissionHistory, VerificationRequest};
    use chrono::{NaiveDate, TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn decodes_history_with_mixed_timestamps() {
        let body = json!({
            "isValid": true,
            "errorText": "",
            "lastSubmission": "2024-10-01T08:00:00Z",
            "chatHistories": [{
                "sourceChatId": "42",
                "chats": [{
                    "participantCount": 3,
                    "chatCount": 10,
                    "chatLength": 250,
                    "chatStartOn": "2024-09-30T10:00:00",
                    "chatEndedOn": "2024-09-30T11:00:00+03:00"
                }]
            }]
        });
        let history: SubmissionHistory = serde_json::from_value(body).expect("decode");
        assert!(history.is_valid);
        assert_eq!(
            history.last_submission,
            NaiveDate::from_ymd_opt(2024, 10, 1).and_then(|d| d.and_hms_opt(8, 0, 0))
        );
        let chat = &history.chat_histories[0].chats[0];
        assert_eq!(chat.participant_count, 3);
        assert_eq!(
            chat.chat_ended_on,
            NaiveDate::from_ymd_opt(2024, 9, 30)
                .and_then(|d| d.and_hms_opt(11, 0, 0))
                .expect("date")
        );
    }

    #[test]
    fn history_defaults_when_fields_are_missing() {
        let history: SubmissionHistory =
            serde_json::from_value(json!({ "isValid": true, "lastSubmission": null }))
                .expect("decode");
        assert_eq!(history.last_submission, None);
        assert!(history.chat_histories.is_empty());
    }

    #[test]
    fn verification_request_uses_pascal_case() {
        let request = VerificationRequest {
            verification_type: 0,
            data_source: 0,
            token: "tok".to_string(),
            reference: "REF".to_string(),
            submitted_by: "hash".to_string(),
            submitted_on: Utc.with_ymd_and_hms(2024, 10, 1, 0, 0, 0).unwrap(),
        };
        let value = serde_json::to_value(&request).expect("encode");
        assert_eq!(value["VerificationType"], json!(0));
        assert_eq!(value["Token"], json!("tok"));
        assert_eq!(value["SubmittedBy"], json!("hash"));
    }
}
