//! Conversation scoring and submission aggregation.

mod aggregate;
mod quality;
mod uniqueness;

pub use aggregate::{ConversationScore, MAXIMUM_SCORE, ScoreAggregator, ScoreTotals};
pub use quality::{QualityParams, QualityScorer, round_to};
pub use uniqueness::{UniquenessResolver, duration_from_hours};

use crate::conversation::Conversation;
use chatproof_rs_config::{ConfigError, ProofConfig};
use chatproof_rs_protocol::ChatHistory;

/// Per-conversation scoring used by the proof orchestrator.
pub trait ConversationScorer: Send + Sync {
    /// Quality, rounded to 2 decimals. Stays within [0, 1] unless messages
    /// are dated after the submission, which lifts timeliness above 1.
    fn quality(&self, conversation: &Conversation) -> f64;
    /// Uniqueness, 0.0 or 1.0.
    fn uniqueness(&self, conversation: &Conversation, history: &[ChatHistory]) -> f64;
}

/// Default scorer composing [`QualityScorer`] and [`UniquenessResolver`].
#[derive(Debug, Clone, Default)]
pub struct StandardScorer {
    quality: QualityScorer,
    uniqueness: UniquenessResolver,
}

impl StandardScorer {
    pub fn new(quality: QualityScorer, uniqueness: UniquenessResolver) -> Self {
        Self {
            quality,
            uniqueness,
        }
    }

    /// Fails when the duplicate window does not fit a duration.
    pub fn from_config(config: &ProofConfig) -> Result<Self, ConfigError> {
        let uniqueness = UniquenessResolver::from_hours(config.duplicate_window_hours)
            .ok_or_else(|| out_of_range("duplicate_window_hours"))?;
        Ok(Self::new(QualityScorer::default(), uniqueness))
    }
}

pub(crate) fn out_of_range(field: &str) -> ConfigError {
    ConfigError::InvalidField {
        path: field.to_string(),
        message: "is not a representable number of hours".to_string(),
    }
}

impl ConversationScorer for StandardScorer {
    fn quality(&self, conversation: &Conversation) -> f64 {
        self.quality.score(conversation)
    }

    fn uniqueness(&self, conversation: &Conversation, history: &[ChatHistory]) -> f64 {
        self.uniqueness.score(conversation, history)
    }
}
