//! Conversation quality from timeliness, thoughtfulness and contextualness.

use crate::conversation::Conversation;

/// Curve parameters for the quality sub-signals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityParams {
    /// Age at which timeliness halves.
    pub half_life_minutes: f64,
    /// Participant count with the highest thoughtfulness.
    pub optimal_participants: f64,
    pub participant_spread: f64,
    /// Content length at which contextualness is 0.5.
    pub context_midpoint: f64,
    pub context_steepness: f64,
}

impl Default for QualityParams {
    fn default() -> Self {
        Self {
            half_life_minutes: 600.0,
            optimal_participants: 3.0,
            participant_spread: 5.0,
            context_midpoint: 2.0,
            context_steepness: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct QualityScorer {
    params: QualityParams,
}

impl QualityScorer {
    pub fn new(params: QualityParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &QualityParams {
        &self.params
    }

    /// Exponential decay over the length-weighted average message age.
    /// A negative average age (messages dated after the submission) gives a
    /// value above 1.
    pub fn timeliness(&self, conversation: &Conversation) -> f64 {
        let decay = std::f64::consts::LN_2 / self.params.half_life_minutes;
        (-decay * conversation.average_age_minutes()).exp()
    }

    /// Participant-count curve. A single participant scores 0.
    pub fn thoughtfulness(&self, conversation: &Conversation) -> f64 {
        let participants = conversation.participant_count();
        if participants == 1 {
            return 0.0;
        }
        let spread = self.params.participant_spread;
        (-(participants as f64 - self.params.optimal_participants) / (2.0 * spread * spread)).exp()
    }

    /// Logistic curve over total content length.
    pub fn contextualness(&self, conversation: &Conversation) -> f64 {
        let length = conversation.total_content_length() as f64;
        let exponent = -self.params.context_steepness * (length - self.params.context_midpoint);
        1.0 / (1.0 + exponent.exp())
    }

    /// Quality rounded to 2 decimals. Conversations without content score 0.
    /// The value stays within [0, 1] unless timeliness exceeds 1; it is not
    /// clamped here, only the normalized submission totals are capped.
    ///
    /// The blend counts timeliness twice and leaves thoughtfulness out.
    /// Changing it shifts reward distribution, so keep it as is.
    pub fn score(&self, conversation: &Conversation) -> f64 {
        if !conversation.has_content() {
            return 0.0;
        }
        let timeliness = self.timeliness(conversation);
        let contextualness = self.contextualness(conversation);
        round_to((timeliness + timeliness + contextualness) / 3.0, 2)
    }
}

/// Round to `places` decimals, correctly rounded from the exact binary value
/// of `value`: a true tie goes to the even digit, anything stored just off a
/// tie goes to the nearer side (`2.675` is stored below the tie, so 2.67).
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    let scaled = value * factor;
    // Exact product is `scaled + error`.
    let error = value.mul_add(factor, -scaled);
    let mut rounded = scaled.round_ties_even();
    if (scaled - rounded).abs() == 0.5 && error != 0.0 {
        rounded = if error > 0.0 {
            scaled.ceil()
        } else {
            scaled.floor()
        };
    }
    rounded / factor
}
