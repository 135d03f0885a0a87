//! Duplicate detection against previously recorded submissions.

use crate::conversation::Conversation;
use chatproof_rs_protocol::ChatHistory;
use chrono::Duration;

/// Binary uniqueness: 1.0 for a fresh conversation, 0.0 for a resubmission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniquenessResolver {
    window: Duration,
}

impl Default for UniquenessResolver {
    fn default() -> Self {
        Self::new(Duration::hours(12))
    }
}

impl UniquenessResolver {
    pub fn new(window: Duration) -> Self {
        Self { window }
    }

    /// Build from a window in (possibly fractional) hours. `None` when the
    /// hours do not fit a [`Duration`].
    pub fn from_hours(hours: f64) -> Option<Self> {
        duration_from_hours(hours).map(Self::new)
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Score one conversation against the user's history.
    ///
    /// A matching history entry whose end lies less than the window before
    /// the conversation's end (or after it) marks a duplicate. Both ends are
    /// compared as naive wall-clock times.
    pub fn score(&self, conversation: &Conversation, history: &[ChatHistory]) -> f64 {
        if history.is_empty() {
            return 1.0;
        }
        let Some(ended_at) = conversation.ended_at() else {
            return 1.0;
        };
        let ended_at = ended_at.naive_utc();
        let duplicate = history
            .iter()
            .filter(|entry| entry.source_chat_id == conversation.chat_id())
            .flat_map(|entry| entry.chats.iter())
            .any(|chat| ended_at - chat.chat_ended_on < self.window);
        if duplicate { 0.0 } else { 1.0 }
    }
}

/// Millisecond-precision duration for (possibly fractional) hours.
///
/// Returns `None` for non-finite values and for anything outside the range
/// chrono can represent.
pub fn duration_from_hours(hours: f64) -> Option<Duration> {
    if !hours.is_finite() {
        return None;
    }
    let millis = (hours * 3_600_000.0).round();
    if millis.abs() >= i64::MAX as f64 {
        return None;
    }
    Duration::try_milliseconds(millis as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatproof_rs_protocol::HistoricalChat;
    use chrono::{DateTime, TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn submitted() -> DateTime<Utc> {
        Utc.timestamp_opt(1_730_000_000, 0).single().expect("ts")
    }

    fn conversation(id: &str, ended_at: DateTime<Utc>) -> Conversation {
        let mut conversation = Conversation::new(id);
        conversation.add_message("7", "hello", ended_at, submitted());
        conversation
    }

    fn history(id: &str, ended_at: DateTime<Utc>) -> ChatHistory {
        ChatHistory {
            source_chat_id: id.to_string(),
            chats: vec![HistoricalChat {
                participant_count: 1,
                chat_count: 1,
                chat_length: 5,
                chat_start_on: ended_at.naive_utc(),
                chat_ended_on: ended_at.naive_utc(),
            }],
        }
    }

    #[test]
    fn empty_history_is_unique() {
        let resolver = UniquenessResolver::default();
        assert_eq!(resolver.score(&conversation("1", submitted()), &[]), 1.0);
    }

    #[test]
    fn same_end_time_is_duplicate() {
        let resolver = UniquenessResolver::default();
        let end = submitted();
        assert_eq!(resolver.score(&conversation("1", end), &[history("1", end)]), 0.0);
    }

    #[test]
    fn inside_window_is_duplicate_and_window_edge_is_unique() {
        let resolver = UniquenessResolver::default();
        let end = submitted();
        let recent = history("1", end - Duration::hours(1));
        let edge = history("1", end - Duration::hours(12));
        let old = history("1", end - Duration::hours(30));
        assert_eq!(resolver.score(&conversation("1", end), &[recent]), 0.0);
        assert_eq!(resolver.score(&conversation("1", end), &[edge]), 1.0);
        assert_eq!(resolver.score(&conversation("1", end), &[old]), 1.0);
    }

    #[test]
    fn history_after_conversation_end_is_duplicate() {
        let resolver = UniquenessResolver::default();
        let end = submitted();
        let later = history("1", end + Duration::hours(48));
        assert_eq!(resolver.score(&conversation("1", end), &[later]), 0.0);
    }

    #[test]
    fn other_keys_do_not_match() {
        let resolver = UniquenessResolver::default();
        let end = submitted();
        assert_eq!(resolver.score(&conversation("1", end), &[history("2", end)]), 1.0);
    }

    #[test]
    fn any_entry_within_window_short_circuits() {
        let resolver = UniquenessResolver::from_hours(2.0).expect("window");
        let end = submitted();
        let mut entry = history("1", end - Duration::hours(10));
        entry.chats.extend(history("1", end - Duration::minutes(30)).chats);
        assert_eq!(resolver.score(&conversation("1", end), &[entry]), 0.0);
    }

    #[test]
    fn conversation_without_messages_is_unique() {
        let resolver = UniquenessResolver::default();
        assert_eq!(
            resolver.score(&Conversation::new("1"), &[history("1", submitted())]),
            1.0
        );
    }

    #[test]
    fn fractional_hours_window() {
        let resolver = UniquenessResolver::from_hours(0.5).expect("window");
        assert_eq!(resolver.window(), Duration::minutes(30));
    }

    #[test]
    fn unrepresentable_hours_have_no_window() {
        assert_eq!(UniquenessResolver::from_hours(-1e16), None);
        assert_eq!(UniquenessResolver::from_hours(1e16), None);
        assert_eq!(UniquenessResolver::from_hours(f64::NEG_INFINITY), None);
        assert_eq!(UniquenessResolver::from_hours(f64::NAN), None);
        assert_eq!(duration_from_hours(-2.0), Some(Duration::hours(-2)));
    }
}
