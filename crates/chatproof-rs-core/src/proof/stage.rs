//! Stages of one proof evaluation.

use std::fmt;

/// Position of an evaluation in the proof state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProofStage {
    Start,
    IdentityHashed,
    TokenVerified,
    HistoryFetched,
    CooldownChecked,
    Scored,
    Submitted,
    Done,
    /// Early exit from any gate.
    Rejected,
}

impl ProofStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProofStage::Start => "start",
            ProofStage::IdentityHashed => "identity_hashed",
            ProofStage::TokenVerified => "token_verified",
            ProofStage::HistoryFetched => "history_fetched",
            ProofStage::CooldownChecked => "cooldown_checked",
            ProofStage::Scored => "scored",
            ProofStage::Submitted => "submitted",
            ProofStage::Done => "done",
            ProofStage::Rejected => "rejected",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ProofStage::Done | ProofStage::Rejected)
    }
}

impl fmt::Display for ProofStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
