// Moderation domain models - data structures for the auto-moderation pipeline.
//
// These are pure domain types with no transport or UI dependencies.
// The chat layer turns a verdict into "publish" or "tell the user why not".

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// How many past messages we remember per sender for duplicate detection.
pub const HISTORY_LIMIT: usize = 10;

/// Why a message was blocked or transformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReasonCode {
    /// Nothing to report
    None,
    /// Same text as the sender's last message, sent again too quickly
    DuplicateExact,
    /// Nearly the same text as the sender's last message
    DuplicateSimilar,
    /// Too many messages inside the rate window
    RateLimited,
    /// A blocked term was masked (never blocks on its own)
    Profanity,
}

impl ReasonCode {
    /// Does this reason stop the message from being published?
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            ReasonCode::DuplicateExact | ReasonCode::DuplicateSimilar | ReasonCode::RateLimited
        )
    }

    /// Human-readable explanation shown to the sender.
    pub fn describe(&self) -> &'static str {
        match self {
            ReasonCode::None => "Message accepted",
            ReasonCode::DuplicateExact => "Please don't send the same message twice",
            ReasonCode::DuplicateSimilar => "That looks like a repeat of your last message",
            ReasonCode::RateLimited => "You're sending messages too fast, slow down a little",
            ReasonCode::Profanity => "Some words were filtered",
        }
    }
}

impl std::fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReasonCode::None => write!(f, "None"),
            ReasonCode::DuplicateExact => write!(f, "Duplicate (exact)"),
            ReasonCode::DuplicateSimilar => write!(f, "Duplicate (similar)"),
            ReasonCode::RateLimited => write!(f, "Rate Limited"),
            ReasonCode::Profanity => write!(f, "Profanity"),
        }
    }
}

/// Result of running one message through the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModerationVerdict {
    /// Whether the message may be published
    pub accepted: bool,
    /// Why it was rejected, or what transformed it
    pub reason_code: ReasonCode,
    /// Text to publish (the input itself when rejected)
    pub output_text: String,
    /// `output_text` differs from what the sender typed
    pub was_transformed: bool,
}

impl ModerationVerdict {
    /// Create an "accepted" verdict, comparing against the original input.
    pub fn accept(original: &str, output_text: String, reason_code: ReasonCode) -> Self {
        let was_transformed = output_text != original;
        Self {
            accepted: true,
            reason_code,
            output_text,
            was_transformed,
        }
    }

    /// Create a rejection. The text is passed through untouched.
    pub fn reject(original: &str, reason_code: ReasonCode) -> Self {
        debug_assert!(reason_code.is_rejection());
        Self {
            accepted: false,
            reason_code,
            output_text: original.to_string(),
            was_transformed: false,
        }
    }
}

/// A message we've seen from a sender (for duplicate detection).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentMessage {
    /// Exactly what the sender typed, before any filtering
    pub text: String,
    /// When it was accepted (ms since epoch)
    pub sent_at_ms: i64,
}

/// Everything the pipeline remembers about one sender.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SenderModerationState {
    /// Most recent accepted messages, oldest first, at most `HISTORY_LIMIT`
    pub recent_messages: VecDeque<RecentMessage>,
    /// Send times inside the current rate window, oldest first
    pub recent_timestamps: VecDeque<i64>,
}

impl SenderModerationState {
    /// The message duplicate detection compares against.
    pub fn last_message(&self) -> Option<&RecentMessage> {
        self.recent_messages.back()
    }

    /// Drop timestamps that fell out of `[now - window, now]`.
    ///
    /// Only looks at the front: timestamps are appended in arrival order.
    pub fn prune_timestamps(&mut self, now_ms: i64, window_ms: i64) {
        let cutoff = now_ms.saturating_sub(window_ms);
        while let Some(&oldest) = self.recent_timestamps.front() {
            if oldest >= cutoff {
                break;
            }
            self.recent_timestamps.pop_front();
        }
    }

    /// Remember an accepted message.
    pub fn record(&mut self, text: &str, sent_at_ms: i64) {
        self.recent_messages.push_back(RecentMessage {
            text: text.to_string(),
            sent_at_ms,
        });
        while self.recent_messages.len() > HISTORY_LIMIT {
            self.recent_messages.pop_front();
        }
        self.recent_timestamps.push_back(sent_at_ms);
    }
}
