//! Submission-level totals and the final bounded score.

use chatproof_rs_config::ProofConfig;

/// Upper bound of every normalized value and of the final score.
pub const MAXIMUM_SCORE: f64 = 1.0;

/// Scores of one conversation, as fed to the aggregator.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationScore {
    pub chat_id: String,
    pub content_length: usize,
    pub quality: f64,
    pub uniqueness: f64,
}

/// Aggregated totals for a submission.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScoreTotals {
    /// Quality summed over unique conversations only.
    pub total_quality: f64,
    pub total_uniqueness: f64,
    /// Conversations with content.
    pub scored_conversations: usize,
    /// Scored conversations with zero uniqueness.
    pub duplicate_conversations: usize,
    pub normalized_quality: f64,
    pub normalized_uniqueness: f64,
    pub score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreAggregator {
    reward_scaling_factor: f64,
    minimum_score: f64,
}

impl Default for ScoreAggregator {
    fn default() -> Self {
        Self::new(100.0, 0.01)
    }
}

impl ScoreAggregator {
    pub fn new(reward_scaling_factor: f64, minimum_score: f64) -> Self {
        Self {
            reward_scaling_factor,
            minimum_score,
        }
    }

    pub fn from_config(config: &ProofConfig) -> Self {
        Self::new(config.reward_scaling_factor, config.minimum_score)
    }

    /// Sum conversation scores. Conversations without content are skipped,
    /// and duplicates add nothing to quality.
    pub fn aggregate(&self, scores: &[ConversationScore]) -> ScoreTotals {
        let mut totals = ScoreTotals::default();
        for entry in scores.iter().filter(|entry| entry.content_length > 0) {
            totals.scored_conversations += 1;
            totals.total_uniqueness += entry.uniqueness;
            if entry.uniqueness > 0.0 {
                totals.total_quality += entry.quality;
            } else {
                totals.duplicate_conversations += 1;
            }
        }
        totals.normalized_quality = self.normalize(totals.total_quality);
        totals.normalized_uniqueness = self.normalize(totals.total_uniqueness);
        totals.score = self.final_score(totals.normalized_quality, totals.normalized_uniqueness);
        totals
    }

    /// Divide by the reward scaling factor, capped at the maximum.
    pub fn normalize(&self, total: f64) -> f64 {
        (total / self.reward_scaling_factor).min(MAXIMUM_SCORE)
    }

    /// Equal blend of quality and uniqueness, clamped to
    /// `[minimum_score, MAXIMUM_SCORE]` for any input.
    pub fn final_score(&self, normalized_quality: f64, normalized_uniqueness: f64) -> f64 {
        let blended = 0.5 * normalized_quality + 0.5 * normalized_uniqueness;
        blended.max(self.minimum_score).min(MAXIMUM_SCORE)
    }
}
