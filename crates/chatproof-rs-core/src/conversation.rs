//! Per-chat statistics folded from individual messages.

use chatproof_rs_protocol::SubmissionChat;
use chrono::{DateTime, Utc};

/// Separator used when rendering a conversation as one text blob.
const MESSAGE_SEPARATOR: char = '\r';

/// Aggregated statistics for one chat thread within a submission.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Conversation {
    chat_id: String,
    messages: Vec<String>,
    participants: Vec<String>,
    total_content_length: usize,
    total_content_value: i64,
    started_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
}

impl Conversation {
    pub fn new(chat_id: impl Into<String>) -> Self {
        Self {
            chat_id: chat_id.into(),
            ..Self::default()
        }
    }

    /// Fold one message into the conversation.
    ///
    /// Empty text is ignored. The message age is measured in whole minutes
    /// before `submitted_on` and is not clamped, so messages dated after the
    /// submission contribute a negative value. The content value saturates at
    /// the `i64` bounds. Returns whether the message was folded.
    pub fn add_message(
        &mut self,
        sender: &str,
        text: &str,
        sent_at: DateTime<Utc>,
        submitted_on: DateTime<Utc>,
    ) -> bool {
        if text.is_empty() {
            return false;
        }
        let length = text.chars().count();
        let age_minutes = (submitted_on - sent_at).num_seconds().div_euclid(60);

        let value = age_minutes.saturating_mul(i64::try_from(length).unwrap_or(i64::MAX));

        self.total_content_length += length;
        self.total_content_value = self.total_content_value.saturating_add(value);
        self.started_at = Some(match self.started_at {
            Some(current) => current.min(sent_at),
            None => sent_at,
        });
        self.ended_at = Some(match self.ended_at {
            Some(current) => current.max(sent_at),
            None => sent_at,
        });
        self.add_participant(sender);
        self.messages.push(text.to_string());
        true
    }

    /// Record a participant if it is non-empty and not seen yet.
    pub fn add_participant(&mut self, participant: &str) {
        if participant.is_empty() || self.participants.iter().any(|p| p == participant) {
            return;
        }
        self.participants.push(participant.to_string());
    }

    pub fn chat_id(&self) -> &str {
        &self.chat_id
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Participants in first-seen order.
    pub fn participants(&self) -> &[String] {
        &self.participants
    }

    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Sum of message lengths in characters.
    pub fn total_content_length(&self) -> usize {
        self.total_content_length
    }

    /// Sum over messages of `age_in_minutes * length`.
    pub fn total_content_value(&self) -> i64 {
        self.total_content_value
    }

    /// Length-weighted average message age in minutes, 0 for empty chats.
    pub fn average_age_minutes(&self) -> f64 {
        if self.total_content_length == 0 {
            return 0.0;
        }
        self.total_content_value as f64 / self.total_content_length as f64
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    /// Whether any scoring signal can be computed.
    pub fn has_content(&self) -> bool {
        self.total_content_length > 0
    }

    /// All message texts joined with carriage returns.
    pub fn content_as_text(&self) -> String {
        let mut text = String::new();
        for (idx, message) in self.messages.iter().enumerate() {
            if idx > 0 {
                text.push(MESSAGE_SEPARATOR);
            }
            text.push_str(message);
        }
        text
    }

    /// Wire summary sent to the validation authority.
    pub fn to_submission_chat(&self, submitted_on: DateTime<Utc>) -> SubmissionChat {
        SubmissionChat {
            source_chat_id: self.chat_id.clone(),
            participant_count: self.participant_count(),
            chat_count: self.message_count(),
            chat_length: self.total_content_length,
            chat_start_on: self.started_at.unwrap_or(submitted_on),
            chat_ended_on: self.ended_at.unwrap_or(submitted_on),
        }
    }
}

/// Splits text produced by [`Conversation::content_as_text`] back into messages.
pub fn split_messages(text: &str) -> Vec<String> {
    text.split(MESSAGE_SEPARATOR)
        .filter(|message| !message.is_empty())
        .map(str::to_string)
        .collect()
}
