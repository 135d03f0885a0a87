use chatproof_rs_core::{
    FeatureError, KeywordExtractor, SentimentClassification, SentimentClassifier, SentimentLabel,
};
use chatproof_rs_protocol::Keyword;

/// Classifies every message with the same label and confidence.
#[derive(Debug, Clone, Copy)]
pub struct FixedSentiment {
    label: SentimentLabel,
    confidence: f64,
}

impl FixedSentiment {
    pub fn new(label: SentimentLabel, confidence: f64) -> Self {
        Self { label, confidence }
    }
}

impl SentimentClassifier for FixedSentiment {
    fn classify(&self, messages: &[String]) -> Result<Vec<SentimentClassification>, FeatureError> {
        Ok(messages
            .iter()
            .map(|_| SentimentClassification {
                label: self.label,
                confidence: self.confidence,
            })
            .collect())
    }
}

/// Returns a fixed keyword list, or an error when built with `failing`.
#[derive(Debug, Clone, Default)]
pub struct FixedKeywords {
    keywords: Vec<Keyword>,
    fail: bool,
}

impl FixedKeywords {
    pub fn new(terms: &[(&str, f64)]) -> Self {
        Self {
            keywords: terms
                .iter()
                .map(|(term, score)| Keyword {
                    term: term.to_string(),
                    score: *score,
                })
                .collect(),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            keywords: Vec::new(),
            fail: true,
        }
    }
}

impl KeywordExtractor for FixedKeywords {
    fn extract(&self, _text: &str) -> Result<Vec<Keyword>, FeatureError> {
        if self.fail {
            return Err(FeatureError::Keywords("stub failure".to_string()));
        }
        Ok(self.keywords.clone())
    }
}
