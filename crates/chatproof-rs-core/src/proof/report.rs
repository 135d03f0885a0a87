//! Report construction and the outcome transitions applied to it.

use crate::conversation::Conversation;
use crate::export::Submission;
use crate::features::ConversationFeatures;
use crate::proof::ProofStage;
use crate::scoring::ScoreTotals;
use chatproof_rs_protocol::{ChatDataEntry, ProofMetadata, ScoreAttributes, ScoreReport};

/// Fresh, invalid, all-zero report for a submission.
pub(super) fn initial_report(
    submission: &Submission,
    source_id: &str,
    dlp_id: &str,
) -> ScoreReport {
    let attributes = ScoreAttributes {
        source: submission.source,
        revision: submission.revision.clone(),
        submitted_on: submission.submitted_on,
        proof_valid: false,
        did_score_content: false,
        stage: ProofStage::Start.to_string(),
        reason: None,
        total_quality: None,
        total_uniqueness: None,
        scored_conversations: None,
        duplicate_conversations: None,
        chat_data: None,
    };
    let metadata = ProofMetadata {
        source_id: source_id.to_string(),
        dlp_id: dlp_id.to_string(),
    };
    ScoreReport::new(dlp_id, attributes, metadata)
}

/// Inauthentic submission: every signal zeroed.
pub(super) fn reject_unverified(report: &mut ScoreReport, reason: String) {
    report.valid = false;
    report.ownership = 0.0;
    report.authenticity = 0.0;
    report.quality = 0.0;
    report.uniqueness = 0.0;
    report.score = 0.0;
    report.attributes.proof_valid = false;
    report.attributes.reason = Some(reason);
    report.attributes.stage = ProofStage::Rejected.to_string();
}

/// Too-frequent submission: identity stands, nothing is awarded.
pub(super) fn reject_cooldown(report: &mut ScoreReport, cooldown_hours: f64) {
    report.valid = false;
    report.ownership = 1.0;
    report.authenticity = 1.0;
    report.quality = 0.0;
    report.uniqueness = 0.0;
    report.score = 0.0;
    report.attributes.proof_valid = true;
    report.attributes.reason = Some(format!(
        "cooldown active: a submission was already accepted within the past {cooldown_hours} hours"
    ));
    report.attributes.stage = ProofStage::Rejected.to_string();
}

/// Record scored totals as a provisionally valid report.
pub(super) fn apply_totals(
    report: &mut ScoreReport,
    totals: &ScoreTotals,
    chat_data: Vec<ChatDataEntry>,
) {
    report.valid = true;
    report.ownership = 1.0;
    report.authenticity = 1.0;
    report.quality = totals.normalized_quality;
    report.uniqueness = totals.normalized_uniqueness;
    report.score = totals.score;
    report.attributes.proof_valid = true;
    report.attributes.did_score_content = true;
    report.attributes.total_quality = Some(totals.total_quality);
    report.attributes.total_uniqueness = Some(totals.total_uniqueness);
    report.attributes.scored_conversations = Some(totals.scored_conversations);
    report.attributes.duplicate_conversations = Some(totals.duplicate_conversations);
    report.attributes.chat_data = Some(chat_data);
}

/// Persistence refused the submission; the scores stay but are not accepted.
pub(super) fn retract(report: &mut ScoreReport, error_text: &str) {
    report.valid = false;
    report.attributes.reason = Some(format!("submission rejected: {error_text}"));
    report.attributes.stage = ProofStage::Rejected.to_string();
}

pub(super) fn chat_data_entry(
    conversation: &Conversation,
    quality: f64,
    uniqueness: f64,
    features: ConversationFeatures,
) -> ChatDataEntry {
    ChatDataEntry {
        chat_id: conversation.chat_id().to_string(),
        chat_length: conversation.total_content_length(),
        participant_count: conversation.participant_count(),
        message_count: conversation.message_count(),
        chat_start_on: conversation.started_at(),
        chat_ended_on: conversation.ended_at(),
        quality,
        uniqueness,
        sentiment: features.sentiment,
        keywords: features.keywords,
    }
}
