//! Chat export parsing.
//!
//! Turns one raw `chats.json` document into a [`Submission`] whose
//! conversations already carry their folded statistics.

use crate::conversation::Conversation;
use crate::error::InputError;
use chatproof_rs_protocol::{DataSource, SubmissionPayload, VerificationRequest};
use chrono::{DateTime, Utc};
use log::debug;
use serde::Deserialize;
use serde_json::Value;

/// Export revision this parser understands.
pub const SUPPORTED_REVISION: &str = "01.01";

/// Verification kind for a plain submission token.
const TOKEN_VERIFICATION: u8 = 0;

/// One user's export event with its parsed conversations.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub revision: String,
    pub source: DataSource,
    /// Source user id, in clear. Never sent or logged as is.
    pub user: String,
    /// Upper-cased opaque submission id.
    pub submission_id: String,
    pub submission_token: String,
    pub submitted_on: DateTime<Utc>,
    pub conversations: Vec<Conversation>,
}

impl Submission {
    /// Payload for the authenticity check.
    pub fn to_verification_request(&self, submitted_by: &str) -> VerificationRequest {
        VerificationRequest {
            verification_type: TOKEN_VERIFICATION,
            data_source: self.source.code(),
            token: self.submission_token.clone(),
            reference: self.submission_id.clone(),
            submitted_by: submitted_by.to_string(),
            submitted_on: self.submitted_on,
        }
    }

    /// Normalized submission used for history lookup and persistence.
    pub fn to_payload(&self, submitted_by: &str) -> SubmissionPayload {
        SubmissionPayload {
            data_source: self.source.code(),
            source_id: self.submission_id.clone(),
            submission_token: self.submission_token.clone(),
            submitted_by: submitted_by.to_string(),
            submitted_on: self.submitted_on,
            chats: self
                .conversations
                .iter()
                .map(|conversation| conversation.to_submission_chat(self.submitted_on))
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawExport {
    #[serde(default)]
    revision: Option<String>,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    user: Option<Value>,
    #[serde(default)]
    submission_id: Option<Value>,
    #[serde(default)]
    submission_token: Option<String>,
    #[serde(default)]
    submission_date: Option<i64>,
    #[serde(default)]
    chats: Vec<RawChat>,
}

#[derive(Debug, Deserialize)]
struct RawChat {
    #[serde(default)]
    chat_id: Option<Value>,
    #[serde(default)]
    contents: Vec<Value>,
}

/// Parse an export document.
///
/// `fallback_token` is used when the document carries no submission token.
/// `now` stands in for an absent submission date.
pub fn parse_export(
    contents: &str,
    fallback_token: Option<&str>,
    now: DateTime<Utc>,
) -> Result<Submission, InputError> {
    let raw: RawExport =
        serde_json::from_str(contents).map_err(|err| InputError::Malformed(err.to_string()))?;

    let revision = raw.revision.unwrap_or_default();
    if !revision.is_empty() && !revision.eq_ignore_ascii_case(SUPPORTED_REVISION) {
        return Err(InputError::UnsupportedRevision(revision));
    }
    let source = match raw.source.as_deref().map(str::trim) {
        None | Some("") => return Err(InputError::MissingField("source")),
        Some(source) => source
            .parse::<DataSource>()
            .map_err(InputError::UnmappedSource)?,
    };
    let user = raw
        .user
        .as_ref()
        .and_then(id_string)
        .ok_or(InputError::MissingField("user"))?;
    let submission_id = raw
        .submission_id
        .as_ref()
        .and_then(id_string)
        .map(|id| id.to_uppercase())
        .unwrap_or_default();
    let submission_token = raw
        .submission_token
        .filter(|token| !token.trim().is_empty())
        .or_else(|| fallback_token.map(str::to_string))
        .filter(|token| !token.trim().is_empty())
        .ok_or(InputError::MissingField("submission_token"))?;
    let submitted_on = match raw.submission_date {
        Some(secs) => unix_seconds(secs)
            .ok_or_else(|| InputError::Malformed(format!("submission_date out of range: {secs}")))?,
        None => now,
    };

    let mut conversations = Vec::new();
    for chat in raw.chats {
        let Some(chat_id) = chat.chat_id.as_ref().and_then(id_string) else {
            debug!("skipping chat without id");
            continue;
        };
        if chat.contents.is_empty() {
            debug!("skipping empty chat (chat_id={chat_id})");
            continue;
        }
        let mut conversation = Conversation::new(chat_id);
        for entry in &chat.contents {
            fold_entry(&mut conversation, entry, submitted_on);
        }
        conversations.push(conversation);
    }

    debug!(
        "parsed export (source={}, revision={}, conversations={})",
        source,
        revision,
        conversations.len()
    );
    Ok(Submission {
        revision,
        source,
        user,
        submission_id,
        submission_token,
        submitted_on,
        conversations,
    })
}

/// Fold one raw content entry; non-message entries and non-text content are ignored.
fn fold_entry(conversation: &mut Conversation, entry: &Value, submitted_on: DateTime<Utc>) {
    if entry.get("@type").and_then(Value::as_str) != Some("message") {
        return;
    }
    let content = entry.get("content");
    if content.and_then(|c| c.get("@type")).and_then(Value::as_str) != Some("messageText") {
        return;
    }
    let text = content
        .and_then(|c| c.get("text"))
        .and_then(|t| t.get("text"))
        .and_then(Value::as_str)
        .unwrap_or_default();
    let sender = entry
        .get("sender_id")
        .and_then(|s| s.get("user_id"))
        .and_then(id_string)
        .unwrap_or_default();
    let sent_at = entry
        .get("date")
        .and_then(Value::as_i64)
        .and_then(unix_seconds)
        .unwrap_or(submitted_on);
    conversation.add_message(&sender, text, sent_at, submitted_on);
}

/// Render a string or integer id; empty strings count as absent.
fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn unix_seconds(secs: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
}
