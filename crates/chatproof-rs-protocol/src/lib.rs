//! Wire protocol types shared between the proof pipeline and the validation
//! authority, plus the score report produced for every evaluation.

mod authority;
mod report;
mod timestamp;

pub use authority::{
    AuthorityError, ChatHistory, HistoricalChat, SubmissionChat, SubmissionHistory,
    SubmissionPayload, SubmitDataResult, ValidationAuthority, VerificationRequest,
    VerifyTokenResult,
};
pub use report::{
    ChatDataEntry, Keyword, ProofMetadata, ScoreAttributes, ScoreReport, SentimentDistribution,
};
pub use timestamp::{naive_timestamp, parse_naive_timestamp};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Platform a chat export originates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    /// Telegram (TDLib-shaped message export).
    Telegram,
}

impl DataSource {
    /// Numeric code the validation authority uses for this source.
    pub fn code(&self) -> u8 {
        match self {
            DataSource::Telegram => 0,
        }
    }

    /// Lowercase name used in report attributes.
    pub fn as_str(&self) -> &'static str {
        match self {
            DataSource::Telegram => "telegram",
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataSource {
    type Err = String;

    /// Parse a source name case-insensitively.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "TELEGRAM" => Ok(DataSource::Telegram),
            other => Err(other.to_string()),
        }
    }
}
