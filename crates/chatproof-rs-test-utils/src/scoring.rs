use chatproof_rs_core::{Conversation, ConversationScorer, StandardScorer};
use chatproof_rs_protocol::ChatHistory;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Scorer that counts invocations and delegates to an inner scorer.
pub struct CountingScorer {
    inner: Arc<dyn ConversationScorer>,
    quality_calls: AtomicUsize,
    uniqueness_calls: AtomicUsize,
}

impl Default for CountingScorer {
    fn default() -> Self {
        Self::new(Arc::new(StandardScorer::default()))
    }
}

impl CountingScorer {
    pub fn new(inner: Arc<dyn ConversationScorer>) -> Self {
        Self {
            inner,
            quality_calls: AtomicUsize::new(0),
            uniqueness_calls: AtomicUsize::new(0),
        }
    }

    pub fn quality_calls(&self) -> usize {
        self.quality_calls.load(Ordering::SeqCst)
    }

    pub fn uniqueness_calls(&self) -> usize {
        self.uniqueness_calls.load(Ordering::SeqCst)
    }
}

impl ConversationScorer for CountingScorer {
    fn quality(&self, conversation: &Conversation) -> f64 {
        self.quality_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.quality(conversation)
    }

    fn uniqueness(&self, conversation: &Conversation, history: &[ChatHistory]) -> f64 {
        self.uniqueness_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.uniqueness(conversation, history)
    }
}
