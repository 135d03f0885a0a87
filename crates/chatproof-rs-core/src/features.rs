//! Optional NLP feature extraction collaborators.
//!
//! Models are supplied by the caller; nothing here loads or caches one.
//! Features are informational and never influence score or validity.

use crate::conversation::split_messages;
use chatproof_rs_protocol::{Keyword, SentimentDistribution};
use log::warn;
use std::sync::Arc;
use thiserror::Error;

/// Errors reported by feature collaborators.
#[derive(Debug, Error)]
pub enum FeatureError {
    #[error("sentiment classification failed: {0}")]
    Sentiment(String),
    #[error("keyword extraction failed: {0}")]
    Keywords(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

/// Classification of a single message.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentimentClassification {
    pub label: SentimentLabel,
    pub confidence: f64,
}

/// Classifies messages into sentiment labels.
pub trait SentimentClassifier: Send + Sync {
    fn classify(&self, messages: &[String]) -> Result<Vec<SentimentClassification>, FeatureError>;
}

/// Extracts ranked keywords from conversation text.
pub trait KeywordExtractor: Send + Sync {
    fn extract(&self, text: &str) -> Result<Vec<Keyword>, FeatureError>;
}

/// Per-conversation features.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversationFeatures {
    pub sentiment: Option<SentimentDistribution>,
    pub keywords: Vec<Keyword>,
}

/// Composition of the optional feature collaborators.
#[derive(Clone, Default)]
pub struct FeatureExtraction {
    sentiment: Option<Arc<dyn SentimentClassifier>>,
    keywords: Option<Arc<dyn KeywordExtractor>>,
}

impl FeatureExtraction {
    /// No collaborators; extraction is disabled.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sentiment(mut self, classifier: Arc<dyn SentimentClassifier>) -> Self {
        self.sentiment = Some(classifier);
        self
    }

    pub fn with_keywords(mut self, extractor: Arc<dyn KeywordExtractor>) -> Self {
        self.keywords = Some(extractor);
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.sentiment.is_some() || self.keywords.is_some()
    }

    /// Extract features from `\r`-joined conversation text. Failures are
    /// logged and leave the affected feature empty.
    pub fn extract(&self, text: &str) -> ConversationFeatures {
        let mut features = ConversationFeatures::default();
        if let Some(classifier) = &self.sentiment {
            let messages = split_messages(text);
            if !messages.is_empty() {
                match classifier.classify(&messages) {
                    Ok(classes) => {
                        features.sentiment = Some(sentiment_distribution(&classes, messages.len()))
                    }
                    Err(err) => warn!("skipping sentiment (error={err})"),
                }
            }
        }
        if let Some(extractor) = &self.keywords {
            match extractor.extract(text) {
                Ok(keywords) => features.keywords = keywords,
                Err(err) => warn!("skipping keywords (error={err})"),
            }
        }
        features
    }
}

impl std::fmt::Debug for FeatureExtraction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeatureExtraction")
            .field("sentiment", &self.sentiment.is_some())
            .field("keywords", &self.keywords.is_some())
            .finish()
    }
}

/// Per-label confidence sums divided by the number of messages.
pub fn sentiment_distribution(
    classes: &[SentimentClassification],
    message_count: usize,
) -> SentimentDistribution {
    let mut distribution = SentimentDistribution::default();
    if message_count == 0 {
        return distribution;
    }
    for class in classes {
        match class.label {
            SentimentLabel::Positive => distribution.positive += class.confidence,
            SentimentLabel::Neutral => distribution.neutral += class.confidence,
            SentimentLabel::Negative => distribution.negative += class.confidence,
        }
    }
    let count = message_count as f64;
    distribution.positive /= count;
    distribution.neutral /= count;
    distribution.negative /= count;
    distribution
}
