//! End-to-end proof evaluation against a stub authority.

use chatproof_rs_core::{
    FeatureExtraction, Proof, ProofError, SentimentLabel, Submission, salted_identity,
};
use chatproof_rs_protocol::{
    ChatHistory, DataSource, HistoricalChat, ScoreReport, SubmissionHistory,
};
use chatproof_rs_test_utils::{
    AuthorityCall, ChatBuilder, CountingScorer, ExportBuilder, FixedKeywords, FixedSentiment,
    StubAuthority, submitted_at, test_config,
};
use chrono::Duration;
use pretty_assertions::assert_eq;
use std::sync::Arc;

/// Three participants, 50 characters, all sent at submission time.
fn fresh_chat(id: i64) -> ChatBuilder {
    ChatBuilder::new(id)
        .text(1, &"a".repeat(20), 0)
        .text(2, &"b".repeat(20), 0)
        .text(3, &"c".repeat(10), 0)
}

fn fresh_submission() -> Submission {
    ExportBuilder::new().chat(fresh_chat(42)).build()
}

async fn run(
    authority: Arc<StubAuthority>,
    scorer: Arc<CountingScorer>,
    submission: &Submission,
) -> Result<ScoreReport, ProofError> {
    Proof::new(test_config(), authority)
        .expect("proof")
        .with_scorer(scorer)
        .generate_at(submission, submitted_at())
        .await
}

/// A conversation without text is excluded and yields zero quality.
#[tokio::test]
async fn empty_conversation_is_excluded() {
    let authority = Arc::new(StubAuthority::new());
    let scorer = Arc::new(CountingScorer::default());
    let submission = ExportBuilder::new()
        .chat(ChatBuilder::new(7).photo(1))
        .build();
    assert_eq!(submission.conversations.len(), 1);

    let report = run(authority, scorer.clone(), &submission).await.expect("report");

    assert!(report.valid);
    assert_eq!(report.quality, 0.0);
    assert_eq!(report.attributes.total_quality, Some(0.0));
    assert_eq!(report.attributes.scored_conversations, Some(0));
    assert_eq!(scorer.quality_calls(), 0);
    let chat_data = report.attributes.chat_data.expect("chat data");
    assert_eq!(chat_data.len(), 1);
    assert_eq!(chat_data[0].quality, 0.0);
}

/// A fresh three-party conversation with no history scores full quality and uniqueness.
#[tokio::test]
async fn fresh_conversation_scores_fully() {
    let authority = Arc::new(StubAuthority::new());
    let scorer = Arc::new(CountingScorer::default());
    let submission = fresh_submission();

    let report = run(authority.clone(), scorer.clone(), &submission)
        .await
        .expect("report");

    assert!(report.valid);
    assert_eq!(report.ownership, 1.0);
    assert_eq!(report.authenticity, 1.0);
    assert_eq!(report.attributes.total_quality, Some(1.0));
    assert_eq!(report.attributes.total_uniqueness, Some(1.0));
    assert_eq!(report.quality, 0.01);
    assert_eq!(report.uniqueness, 0.01);
    assert_eq!(report.score, 0.01);
    assert_eq!(report.attributes.stage, "done");
    assert_eq!(report.reason(), None);
    assert_eq!(scorer.quality_calls(), 1);
    assert_eq!(scorer.uniqueness_calls(), 1);
    assert_eq!(authority.calls(AuthorityCall::Submit), 1);
}

/// A conversation ending one hour after its recorded copy is a duplicate.
#[tokio::test]
async fn resubmitted_conversation_earns_no_quality() {
    let recorded_end = (submitted_at() - Duration::hours(1)).naive_utc();
    let authority = Arc::new(StubAuthority::new().with_chat_history(ChatHistory {
        source_chat_id: "42".to_string(),
        chats: vec![HistoricalChat {
            participant_count: 3,
            chat_count: 3,
            chat_length: 50,
            chat_start_on: recorded_end,
            chat_ended_on: recorded_end,
        }],
    }));
    let scorer = Arc::new(CountingScorer::default());
    let submission = ExportBuilder::new()
        .chat(fresh_chat(42))
        .chat(fresh_chat(43))
        .build();

    let report = run(authority, scorer, &submission).await.expect("report");

    assert!(report.valid);
    assert_eq!(report.attributes.total_quality, Some(1.0));
    assert_eq!(report.attributes.total_uniqueness, Some(1.0));
    assert_eq!(report.attributes.duplicate_conversations, Some(1));
    let chat_data = report.attributes.chat_data.expect("chat data");
    assert_eq!(chat_data[0].chat_id, "42");
    assert_eq!(chat_data[0].uniqueness, 0.0);
    assert_eq!(chat_data[1].uniqueness, 1.0);
}

/// A history naming only other chats, or stale copies, leaves conversations unique.
#[tokio::test]
async fn stale_or_unrelated_history_keeps_uniqueness() {
    let stale_end = (submitted_at() - Duration::hours(30)).naive_utc();
    let recorded = |chat_id: &str| ChatHistory {
        source_chat_id: chat_id.to_string(),
        chats: vec![HistoricalChat {
            participant_count: 3,
            chat_count: 3,
            chat_length: 50,
            chat_start_on: stale_end,
            chat_ended_on: stale_end,
        }],
    };
    let authority = Arc::new(StubAuthority::new().with_history(SubmissionHistory {
        is_valid: true,
        error_text: String::new(),
        last_submission: Some((submitted_at() - Duration::hours(30)).naive_utc()),
        chat_histories: vec![recorded("42"), recorded("7")],
    }));
    let submission = ExportBuilder::new()
        .chat(fresh_chat(42))
        .chat(fresh_chat(43))
        .build();

    let report = run(authority, Arc::new(CountingScorer::default()), &submission)
        .await
        .expect("report");

    assert!(report.valid);
    assert_eq!(report.attributes.duplicate_conversations, Some(0));
    assert_eq!(report.attributes.total_uniqueness, Some(2.0));
}

/// Messages dated after the submission lift per-chat quality above 1, while
/// the normalized report values stay capped.
#[tokio::test]
async fn future_dated_chat_is_capped_only_in_totals() {
    let mut config = test_config();
    config.reward_scaling_factor = 1.0;
    let day_ahead = -86_400;
    let submission = ExportBuilder::new()
        .chat(
            ChatBuilder::new(9)
                .text(1, &"a".repeat(25), day_ahead)
                .text(2, &"b".repeat(25), day_ahead),
        )
        .build();

    let report = Proof::new(config, Arc::new(StubAuthority::new()))
        .expect("proof")
        .generate_at(&submission, submitted_at())
        .await
        .expect("report");

    assert!(report.valid);
    let chat_data = report.attributes.chat_data.expect("chat data");
    assert!((chat_data[0].quality - 3.85).abs() < 1e-9);
    assert!(report.attributes.total_quality.is_some_and(|total| total > 1.0));
    assert_eq!(report.quality, 1.0);
    assert_eq!(report.uniqueness, 1.0);
    assert_eq!(report.score, 1.0);
}

/// Configs that were never validated are refused before evaluation.
#[test]
fn unvalidated_config_is_refused() {
    let mut config = test_config();
    config.duplicate_window_hours = -1e16;
    let result = Proof::new(config, Arc::new(StubAuthority::new()));
    assert!(matches!(result, Err(ProofError::Config(_))));

    let mut config = test_config();
    config.cooldown_hours = f64::NEG_INFINITY;
    let result = Proof::new(config, Arc::new(StubAuthority::new()));
    assert!(matches!(result, Err(ProofError::Config(_))));

    let mut config = test_config();
    config.cooldown_hours = 1e16;
    let result = Proof::new(config, Arc::new(StubAuthority::new()));
    assert!(matches!(result, Err(ProofError::Config(_))));
}

/// An invalid token stops the evaluation before any scoring.
#[tokio::test]
async fn rejected_token_skips_scoring() {
    let authority = Arc::new(StubAuthority::new().rejecting_token("bad token"));
    let scorer = Arc::new(CountingScorer::default());

    let report = run(authority.clone(), scorer.clone(), &fresh_submission())
        .await
        .expect("report");

    assert!(!report.valid);
    assert_eq!(report.score, 0.0);
    assert_eq!(report.ownership, 0.0);
    assert_eq!(report.authenticity, 0.0);
    assert_eq!(report.quality, 0.0);
    assert_eq!(report.uniqueness, 0.0);
    assert_eq!(report.reason(), Some("token verification failed: bad token"));
    assert_eq!(report.attributes.stage, "rejected");
    assert!(!report.attributes.proof_valid);
    assert_eq!(scorer.quality_calls(), 0);
    assert_eq!(scorer.uniqueness_calls(), 0);
    assert_eq!(authority.calls(AuthorityCall::History), 0);
    assert_eq!(authority.calls(AuthorityCall::Submit), 0);
}

/// A verification transport failure is a soft reject as well.
#[tokio::test]
async fn unreachable_verification_is_a_soft_reject() {
    let authority = Arc::new(StubAuthority::new().failing(AuthorityCall::Verify));
    let scorer = Arc::new(CountingScorer::default());

    let report = run(authority.clone(), scorer.clone(), &fresh_submission())
        .await
        .expect("report");

    assert!(!report.valid);
    assert!(report.reason().is_some_and(|r| r.contains("transport failed")));
    assert_eq!(scorer.quality_calls(), 0);
    assert_eq!(authority.calls(AuthorityCall::History), 0);
}

/// A submission two hours after the last accepted one hits the 4 hour cooldown.
#[tokio::test]
async fn cooldown_rejects_recent_submitter() {
    let last = (submitted_at() - Duration::hours(2)).naive_utc();
    let authority = Arc::new(StubAuthority::new().with_last_submission(last));
    let scorer = Arc::new(CountingScorer::default());

    let report = run(authority.clone(), scorer.clone(), &fresh_submission())
        .await
        .expect("report");

    assert!(!report.valid);
    assert_eq!(report.score, 0.0);
    assert_eq!(report.ownership, 1.0);
    assert_eq!(report.authenticity, 1.0);
    assert!(report.reason().is_some_and(|r| r.contains("past 4 hours")));
    assert_eq!(scorer.quality_calls(), 0);
    assert_eq!(authority.calls(AuthorityCall::Submit), 0);
}

#[tokio::test]
async fn elapsed_cooldown_allows_scoring() {
    let last = (submitted_at() - Duration::hours(5)).naive_utc();
    let authority = Arc::new(StubAuthority::new().with_last_submission(last));
    let scorer = Arc::new(CountingScorer::default());

    let report = run(authority, scorer, &fresh_submission())
        .await
        .expect("report");
    assert!(report.valid);
}

/// History transport failures abort the evaluation.
#[tokio::test]
async fn history_failure_is_fatal() {
    let authority = Arc::new(StubAuthority::new().failing(AuthorityCall::History));
    let scorer = Arc::new(CountingScorer::default());

    let err = run(authority.clone(), scorer.clone(), &fresh_submission())
        .await
        .unwrap_err();

    assert!(matches!(err, ProofError::Authority(_)));
    assert_eq!(scorer.quality_calls(), 0);
    assert_eq!(authority.calls(AuthorityCall::Submit), 0);
}

#[tokio::test]
async fn invalid_history_response_is_fatal() {
    let authority = Arc::new(StubAuthority::new().rejecting_history("unknown user"));
    let scorer = Arc::new(CountingScorer::default());

    let err = run(authority, scorer, &fresh_submission())
        .await
        .unwrap_err();
    assert!(matches!(err, ProofError::HistoryRejected(ref text) if text == "unknown user"));
}

#[tokio::test]
async fn submit_failure_is_fatal() {
    let authority = Arc::new(StubAuthority::new().failing(AuthorityCall::Submit));
    let scorer = Arc::new(CountingScorer::default());

    let err = run(authority, scorer.clone(), &fresh_submission())
        .await
        .unwrap_err();
    assert!(matches!(err, ProofError::Authority(_)));
    assert_eq!(scorer.quality_calls(), 1);
}

/// A refused submission keeps its provisional scores but is not valid.
#[tokio::test]
async fn refused_submission_retracts_validity() {
    let authority = Arc::new(StubAuthority::new().rejecting_submission("quota exceeded"));
    let scorer = Arc::new(CountingScorer::default());

    let report = run(authority, scorer, &fresh_submission())
        .await
        .expect("report");

    assert!(!report.valid);
    assert_eq!(report.score, 0.01);
    assert_eq!(report.attributes.total_quality, Some(1.0));
    assert_eq!(report.reason(), Some("submission rejected: quota exceeded"));
    assert_eq!(report.attributes.stage, "rejected");
}

/// The authority only ever sees the salted identity.
#[tokio::test]
async fn authority_receives_hashed_identity() {
    let authority = Arc::new(StubAuthority::new());
    let scorer = Arc::new(CountingScorer::default());
    let submission = fresh_submission();

    let report = run(authority.clone(), scorer, &submission)
        .await
        .expect("report");

    let expected = salted_identity(submission.source, &submission.user, "test-salt")
        .expect("identity");
    assert_eq!(report.metadata.source_id, expected);
    assert_eq!(report.metadata.dlp_id, "dlp-test");
    assert_eq!(report.dlp_id, "dlp-test");

    let verifications = authority.verifications();
    assert_eq!(verifications.len(), 1);
    assert_eq!(verifications[0].submitted_by, expected);
    assert_eq!(verifications[0].token, "token-1");

    let payloads = authority.payloads();
    assert_eq!(payloads.len(), 2);
    for payload in payloads {
        assert_eq!(payload.submitted_by, expected);
        assert_eq!(payload.source_id, "SUB-1");
        assert_eq!(payload.chats.len(), 1);
        assert_eq!(payload.chats[0].chat_length, 50);
        assert_eq!(payload.chats[0].participant_count, 3);
    }
}

/// The hashed identity follows the exported user.
#[tokio::test]
async fn identity_follows_exported_user() {
    let submission = ExportBuilder::new().user("555").chat(fresh_chat(42)).build();

    let report = run(
        Arc::new(StubAuthority::new()),
        Arc::new(CountingScorer::default()),
        &submission,
    )
    .await
    .expect("report");

    let expected = salted_identity(DataSource::Telegram, "555", "test-salt").expect("identity");
    let default_user =
        salted_identity(DataSource::Telegram, "100200", "test-salt").expect("identity");
    assert_eq!(report.metadata.source_id, expected);
    assert_ne!(report.metadata.source_id, default_user);
}

/// Repeated evaluation of the same input yields the same report.
#[tokio::test]
async fn evaluation_is_deterministic() {
    let submission = fresh_submission();
    let first = run(
        Arc::new(StubAuthority::new()),
        Arc::new(CountingScorer::default()),
        &submission,
    )
    .await
    .expect("first");
    let second = run(
        Arc::new(StubAuthority::new()),
        Arc::new(CountingScorer::default()),
        &submission,
    )
    .await
    .expect("second");
    assert_eq!(first, second);
}

/// Feature collaborators decorate chat data without touching the score.
#[tokio::test]
async fn features_are_attached_to_chat_data() {
    let features = FeatureExtraction::new()
        .with_sentiment(Arc::new(FixedSentiment::new(SentimentLabel::Positive, 0.5)))
        .with_keywords(Arc::new(FixedKeywords::new(&[("rust", 0.9)])));
    let proof = Proof::new(test_config(), Arc::new(StubAuthority::new()))
        .expect("proof")
        .with_features(features);

    let report = proof
        .generate_at(&fresh_submission(), submitted_at())
        .await
        .expect("report");

    assert_eq!(report.score, 0.01);
    let chat_data = report.attributes.chat_data.expect("chat data");
    let sentiment = chat_data[0].sentiment.expect("sentiment");
    assert_eq!(sentiment.positive, 0.5);
    assert_eq!(sentiment.negative, 0.0);
    assert_eq!(chat_data[0].keywords[0].term, "rust");
}

#[tokio::test]
async fn failing_keywords_do_not_affect_validity() {
    let features = FeatureExtraction::new().with_keywords(Arc::new(FixedKeywords::failing()));
    let proof = Proof::new(test_config(), Arc::new(StubAuthority::new()))
        .expect("proof")
        .with_features(features);

    let report = proof
        .generate_at(&fresh_submission(), submitted_at())
        .await
        .expect("report");

    assert!(report.valid);
    let chat_data = report.attributes.chat_data.expect("chat data");
    assert!(chat_data[0].keywords.is_empty());
}
