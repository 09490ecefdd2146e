// Chat domain models - the envelope handed to whatever transport publishes it.

use crate::core::moderation::ReasonCode;
use serde::{Deserialize, Serialize};

/// A message that passed moderation and is ready to publish.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub channel: String,
    pub sender_id: String,
    /// Text after moderation (possibly masked / normalized)
    pub text: String,
    pub sent_at_ms: i64,
    /// Auto-moderation changed the text
    #[serde(default)]
    pub moderated: bool,
}

/// What happened to a send attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum SendOutcome {
    /// Published, possibly with modified text
    Published {
        message: ChatMessage,
        was_transformed: bool,
        /// `Profanity` when terms were masked, otherwise `None`
        reason: ReasonCode,
    },
    /// Blocked by moderation; nothing was published
    Rejected { reason: ReasonCode },
}

impl SendOutcome {
    #[allow(dead_code)]
    pub fn is_published(&self) -> bool {
        matches!(self, SendOutcome::Published { .. })
    }
}

/// Whose history a moderation key covers.
///
/// `Global` matches the classic chat client: one rate window per user no matter
/// which channel they talk in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModerationScope {
    #[default]
    Global,
    PerChannel,
}

impl ModerationScope {
    /// Parse `global` / `channel` (as used by `AUTOMOD_SCOPE`).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "global" | "user" => Some(ModerationScope::Global),
            "channel" | "per_channel" | "perchannel" => Some(ModerationScope::PerChannel),
            _ => None,
        }
    }

    /// Key the moderation pipeline should use for this sender.
    pub fn moderation_key(&self, channel: &str, sender_id: &str) -> String {
        match self {
            ModerationScope::Global => sender_id.to_string(),
            ModerationScope::PerChannel => format!("{}:{}", channel, sender_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moderation_keys() {
        assert_eq!(ModerationScope::Global.moderation_key("general", "alice"), "alice");
        assert_eq!(
            ModerationScope::PerChannel.moderation_key("general", "alice"),
            "general:alice"
        );
    }

    #[test]
    fn test_scope_parsing() {
        assert_eq!(ModerationScope::parse("Channel"), Some(ModerationScope::PerChannel));
        assert_eq!(ModerationScope::parse("global"), Some(ModerationScope::Global));
        assert_eq!(ModerationScope::parse("galaxy"), None);
    }

    #[test]
    fn test_message_json_shape() {
        let message = ChatMessage {
            channel: "general".to_string(),
            sender_id: "alice".to_string(),
            text: "hi".to_string(),
            sent_at_ms: 42,
            moderated: false,
        };
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["sender_id"], "alice");
        assert_eq!(json["sent_at_ms"], 42);

        // Older payloads without the flag still parse
        let parsed: ChatMessage = serde_json::from_str(
            r#"{"channel":"general","sender_id":"bob","text":"yo","sent_at_ms":1}"#,
        )
        .unwrap();
        assert!(!parsed.moderated);
    }
}
