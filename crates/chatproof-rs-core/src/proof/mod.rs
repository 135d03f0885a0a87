//! Proof orchestration.
//!
//! One evaluation runs `start -> identity_hashed -> token_verified ->
//! history_fetched -> cooldown_checked -> scored -> submitted -> done`, leaving
//! early through `rejected` at the verification and cooldown gates. Transport
//! failures on history lookup and submission abort the evaluation with an
//! error instead of producing a report.

mod report;
mod stage;

pub use stage::ProofStage;

use crate::error::ProofError;
use crate::export::Submission;
use crate::features::{ConversationFeatures, FeatureExtraction};
use crate::identity::salted_identity;
use crate::scoring::{
    ConversationScore, ConversationScorer, ScoreAggregator, StandardScorer, duration_from_hours,
    out_of_range,
};
use chatproof_rs_config::ProofConfig;
use chatproof_rs_protocol::{ScoreReport, SubmissionHistory, ValidationAuthority};
use chrono::{DateTime, Duration, Utc};
use log::{debug, info, warn};
use std::sync::Arc;

/// Evaluates submissions against a validation authority.
pub struct Proof {
    config: ProofConfig,
    authority: Arc<dyn ValidationAuthority>,
    scorer: Arc<dyn ConversationScorer>,
    aggregator: ScoreAggregator,
    features: FeatureExtraction,
    cooldown: Duration,
}

impl Proof {
    /// Create a proof with the standard scorer and no feature extraction.
    ///
    /// The config is validated first, so hand-built configs fail here rather
    /// than mid-evaluation.
    pub fn new(
        config: ProofConfig,
        authority: Arc<dyn ValidationAuthority>,
    ) -> Result<Self, ProofError> {
        config.validate()?;
        let scorer = Arc::new(StandardScorer::from_config(&config)?);
        let cooldown = duration_from_hours(config.cooldown_hours)
            .ok_or_else(|| out_of_range("cooldown_hours"))?;
        let aggregator = ScoreAggregator::from_config(&config);
        Ok(Self {
            config,
            authority,
            scorer,
            aggregator,
            features: FeatureExtraction::default(),
            cooldown,
        })
    }

    /// Replace the conversation scorer.
    pub fn with_scorer(mut self, scorer: Arc<dyn ConversationScorer>) -> Self {
        self.scorer = scorer;
        self
    }

    /// Attach feature extraction collaborators.
    pub fn with_features(mut self, features: FeatureExtraction) -> Self {
        self.features = features;
        self
    }

    pub fn config(&self) -> &ProofConfig {
        &self.config
    }

    /// Evaluate a submission using the current time.
    pub async fn generate(&self, submission: &Submission) -> Result<ScoreReport, ProofError> {
        self.generate_at(submission, Utc::now()).await
    }

    /// Evaluate a submission as of `now`.
    pub async fn generate_at(
        &self,
        submission: &Submission,
        now: DateTime<Utc>,
    ) -> Result<ScoreReport, ProofError> {
        let mut stage = ProofStage::Start;
        info!(
            "generating proof (source={}, conversations={})",
            submission.source,
            submission.conversations.len()
        );

        let source_id = salted_identity(submission.source, &submission.user, &self.config.salt)?;
        let mut report = report::initial_report(submission, &source_id, &self.config.dlp_id);
        advance(&mut stage, ProofStage::IdentityHashed);

        let request = submission.to_verification_request(&source_id);
        let rejection = match self.authority.verify_token(&request).await {
            Ok(result) if result.is_valid => None,
            Ok(result) => Some(format!(
                "token verification failed: {}",
                non_empty(&result.error_text, "token rejected")
            )),
            Err(err) => {
                warn!("token verification unavailable (error={err})");
                Some(format!("token verification failed: {err}"))
            }
        };
        if let Some(reason) = rejection {
            info!("proof rejected (stage={stage}, reason={reason})");
            advance(&mut stage, ProofStage::Rejected);
            report::reject_unverified(&mut report, reason);
            return Ok(report);
        }
        advance(&mut stage, ProofStage::TokenVerified);

        let payload = submission.to_payload(&source_id);
        let history = self.authority.historical_chats(&payload).await?;
        if !history.is_valid {
            return Err(ProofError::HistoryRejected(
                non_empty(&history.error_text, "history lookup failed").to_string(),
            ));
        }
        advance(&mut stage, ProofStage::HistoryFetched);

        if self.cooldown_active(&history, now) {
            info!(
                "proof rejected (stage={stage}, reason=cooldown, cooldown_hours={})",
                self.config.cooldown_hours
            );
            advance(&mut stage, ProofStage::Rejected);
            report::reject_cooldown(&mut report, self.config.cooldown_hours);
            return Ok(report);
        }
        advance(&mut stage, ProofStage::CooldownChecked);

        self.score(submission, &history, &mut report);
        advance(&mut stage, ProofStage::Scored);

        let outcome = self.authority.submit_data(&payload).await?;
        advance(&mut stage, ProofStage::Submitted);
        if !outcome.is_valid {
            let error_text = non_empty(&outcome.error_text, "rejected by authority");
            warn!("submission not accepted (error={error_text})");
            advance(&mut stage, ProofStage::Rejected);
            report::retract(&mut report, error_text);
            return Ok(report);
        }

        advance(&mut stage, ProofStage::Done);
        report.attributes.stage = stage.to_string();
        info!(
            "proof generated (score={}, quality={}, uniqueness={})",
            report.score, report.quality, report.uniqueness
        );
        Ok(report)
    }

    /// Whether the last accepted submission falls inside the cooldown window.
    fn cooldown_active(&self, history: &SubmissionHistory, now: DateTime<Utc>) -> bool {
        let Some(last) = history.last_submission else {
            return false;
        };
        let elapsed = now.naive_utc() - last;
        debug!(
            "checking cooldown (elapsed_minutes={}, cooldown_hours={})",
            elapsed.num_minutes(),
            self.config.cooldown_hours
        );
        elapsed < self.cooldown
    }

    fn score(
        &self,
        submission: &Submission,
        history: &SubmissionHistory,
        report: &mut ScoreReport,
    ) {
        let mut scores = Vec::with_capacity(submission.conversations.len());
        let mut chat_data = Vec::with_capacity(submission.conversations.len());

        for conversation in &submission.conversations {
            let (quality, uniqueness) = if conversation.has_content() {
                let quality = self.scorer.quality(conversation);
                let uniqueness = self.scorer.uniqueness(conversation, &history.chat_histories);
                debug!(
                    "scored conversation (chat_id={}, quality={quality}, uniqueness={uniqueness})",
                    conversation.chat_id()
                );
                scores.push(ConversationScore {
                    chat_id: conversation.chat_id().to_string(),
                    content_length: conversation.total_content_length(),
                    quality,
                    uniqueness,
                });
                (quality, uniqueness)
            } else {
                debug!(
                    "skipping conversation without content (chat_id={})",
                    conversation.chat_id()
                );
                (0.0, 0.0)
            };
            let features = if self.features.is_enabled() && conversation.has_content() {
                self.features.extract(&conversation.content_as_text())
            } else {
                ConversationFeatures::default()
            };
            chat_data.push(report::chat_data_entry(
                conversation,
                quality,
                uniqueness,
                features,
            ));
        }

        let totals = self.aggregator.aggregate(&scores);
        debug!(
            "aggregated scores (total_quality={}, total_uniqueness={}, duplicates={})",
            totals.total_quality, totals.total_uniqueness, totals.duplicate_conversations
        );
        report::apply_totals(report, &totals, chat_data);
    }
}

fn advance(stage: &mut ProofStage, next: ProofStage) {
    debug!("proof stage transition (from={stage}, to={next})");
    *stage = next;
}

fn non_empty<'a>(text: &'a str, fallback: &'a str) -> &'a str {
    if text.trim().is_empty() { fallback } else { text }
}
