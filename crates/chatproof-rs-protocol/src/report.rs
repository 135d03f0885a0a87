//! Score report returned for every proof evaluation.

use crate::DataSource;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Final outcome of one submission evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    /// Data liquidity pool the proof is produced for.
    pub dlp_id: String,
    /// Whether the submission was accepted.
    pub valid: bool,
    /// Final weighted score.
    pub score: f64,
    pub authenticity: f64,
    pub ownership: f64,
    /// Normalized submission quality.
    pub quality: f64,
    /// Normalized submission uniqueness.
    pub uniqueness: f64,
    /// Audit attributes.
    pub attributes: ScoreAttributes,
    pub metadata: ProofMetadata,
}

impl ScoreReport {
    /// Create an all-zero, invalid report.
    pub fn new(
        dlp_id: impl Into<String>,
        attributes: ScoreAttributes,
        metadata: ProofMetadata,
    ) -> Self {
        Self {
            dlp_id: dlp_id.into(),
            valid: false,
            score: 0.0,
            authenticity: 0.0,
            ownership: 0.0,
            quality: 0.0,
            uniqueness: 0.0,
            attributes,
            metadata,
        }
    }

    /// Reason the report is invalid, if any.
    pub fn reason(&self) -> Option<&str> {
        self.attributes.reason.as_deref()
    }
}

/// Structured attribute bag attached to a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreAttributes {
    pub source: DataSource,
    /// Export format revision.
    pub revision: String,
    pub submitted_on: DateTime<Utc>,
    /// Whether identity/authenticity checks passed.
    pub proof_valid: bool,
    /// Whether conversation content was scored.
    pub did_score_content: bool,
    /// Terminal stage reached by the evaluation.
    pub stage: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_quality: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_uniqueness: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scored_conversations: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duplicate_conversations: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_data: Option<Vec<ChatDataEntry>>,
}

/// Per-conversation audit entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatDataEntry {
    pub chat_id: String,
    pub chat_length: usize,
    pub participant_count: usize,
    pub message_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_start_on: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_ended_on: Option<DateTime<Utc>>,
    pub quality: f64,
    pub uniqueness: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<SentimentDistribution>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<Keyword>,
}

/// Average sentiment confidence per label over a conversation's messages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentDistribution {
    pub positive: f64,
    pub neutral: f64,
    pub negative: f64,
}

/// Ranked keyword with its relevance score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyword {
    pub term: String,
    pub score: f64,
}

/// Identity metadata attached to a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofMetadata {
    /// Salted pseudonymous identifier of the submitter.
    pub source_id: String,
    pub dlp_id: String,
}
