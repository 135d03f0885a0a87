use chatproof_rs_config::ProofConfig;
use chatproof_rs_core::{Submission, parse_export};
use chrono::{DateTime, Utc};
use serde_json::{Value, json};

/// Fixed submission time used by fixtures, as unix seconds.
pub const SUBMITTED_AT_SECS: i64 = 1_730_000_000;

pub fn submitted_at() -> DateTime<Utc> {
    DateTime::from_timestamp(SUBMITTED_AT_SECS, 0).unwrap_or_default()
}

/// Valid config pointing at an unroutable authority.
pub fn test_config() -> ProofConfig {
    ProofConfig::builder()
        .salt("test-salt")
        .dlp_id("dlp-test")
        .validator_base_url("http://127.0.0.1:9")
        .build()
}

/// One chat inside an export fixture.
#[derive(Debug, Clone)]
pub struct ChatBuilder {
    chat_id: Value,
    contents: Vec<Value>,
}

impl ChatBuilder {
    pub fn new(chat_id: impl Into<Value>) -> Self {
        Self {
            chat_id: chat_id.into(),
            contents: Vec::new(),
        }
    }

    /// Text message sent `age_secs` before the fixture submission time.
    pub fn text(mut self, sender: i64, text: &str, age_secs: i64) -> Self {
        self.contents.push(json!({
            "@type": "message",
            "sender_id": { "user_id": sender },
            "date": SUBMITTED_AT_SECS - age_secs,
            "content": { "@type": "messageText", "text": { "text": text } },
        }));
        self
    }

    /// Non-text message; contributes nothing to the conversation.
    pub fn photo(mut self, sender: i64) -> Self {
        self.contents.push(json!({
            "@type": "message",
            "sender_id": { "user_id": sender },
            "date": SUBMITTED_AT_SECS,
            "content": { "@type": "messagePhoto" },
        }));
        self
    }

    fn to_value(&self) -> Value {
        json!({ "chat_id": self.chat_id, "contents": self.contents })
    }
}

/// Builder for `chats.json` documents.
#[derive(Debug, Clone)]
pub struct ExportBuilder {
    revision: String,
    source: String,
    user: String,
    submission_id: String,
    token: Option<String>,
    chats: Vec<ChatBuilder>,
}

impl Default for ExportBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ExportBuilder {
    pub fn new() -> Self {
        Self {
            revision: "01.01".to_string(),
            source: "Telegram".to_string(),
            user: "100200".to_string(),
            submission_id: "sub-1".to_string(),
            token: Some("token-1".to_string()),
            chats: Vec::new(),
        }
    }

    pub fn revision(mut self, revision: &str) -> Self {
        self.revision = revision.to_string();
        self
    }

    pub fn source(mut self, source: &str) -> Self {
        self.source = source.to_string();
        self
    }

    pub fn user(mut self, user: &str) -> Self {
        self.user = user.to_string();
        self
    }

    pub fn token(mut self, token: Option<&str>) -> Self {
        self.token = token.map(str::to_string);
        self
    }

    pub fn chat(mut self, chat: ChatBuilder) -> Self {
        self.chats.push(chat);
        self
    }

    pub fn to_json(&self) -> String {
        let mut doc = json!({
            "revision": self.revision,
            "source": self.source,
            "user": self.user,
            "submission_id": self.submission_id,
            "submission_date": SUBMITTED_AT_SECS,
            "chats": self.chats.iter().map(ChatBuilder::to_value).collect::<Vec<_>>(),
        });
        if let (Some(token), Some(map)) = (&self.token, doc.as_object_mut()) {
            map.insert("submission_token".to_string(), json!(token));
        }
        doc.to_string()
    }

    /// Parse the fixture. Panics on invalid fixtures.
    pub fn build(&self) -> Submission {
        parse_export(&self.to_json(), None, submitted_at()).expect("fixture export")
    }
}
