//! Proof-of-contribution scoring for chat exports.
//!
//! This crate owns the export parser, the per-conversation aggregator and
//! scorers, identity hashing, optional feature extraction and the proof
//! orchestrator that sequences them against a validation authority.

pub mod conversation;
pub mod error;
pub mod export;
pub mod features;
pub mod identity;
pub mod input;
pub mod proof;
pub mod scoring;

pub use conversation::Conversation;
pub use error::{InputError, ProofError};
pub use export::{SUPPORTED_REVISION, Submission, parse_export};
/// Optional NLP collaborators injected into the orchestrator.
pub use features::{
    ConversationFeatures, FeatureError, FeatureExtraction, KeywordExtractor,
    SentimentClassification, SentimentClassifier, SentimentLabel,
};
pub use identity::salted_identity;
pub use input::{EXPORT_FILE, PROOF_TOKEN_FILE, load_input_dir};
pub use proof::{Proof, ProofStage};
pub use scoring::{
    ConversationScore, ConversationScorer, QualityParams, QualityScorer, ScoreAggregator,
    ScoreTotals, StandardScorer, UniquenessResolver,
};
