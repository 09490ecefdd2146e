// How chat messages and moderation feedback look in the terminal.

use crate::core::chat::ChatMessage;
use crate::core::moderation::ReasonCode;
use chrono::{TimeZone, Utc};

/// `[12:34:56] #general <alice> hello` (plus a marker if moderation edited it)
pub fn format_message(message: &ChatMessage) -> String {
    let time = Utc
        .timestamp_millis_opt(message.sent_at_ms)
        .single()
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "--:--:--".to_string());

    format!(
        "[{}] #{} <{}> {}{}",
        time,
        message.channel,
        message.sender_id,
        message.text,
        if message.moderated { " (moderated)" } else { "" }
    )
}

/// Feedback for a message that auto-moderation blocked.
pub fn format_rejection(reason: ReasonCode) -> String {
    format!("⛔ Message blocked: {}", reason.describe())
}

/// Feedback for a message that went out with modified text.
pub fn format_transformed(reason: ReasonCode) -> String {
    match reason {
        ReasonCode::Profanity => {
            format!("✏️ Your message was modified by auto-moderation ({})", reason.describe())
        }
        _ => "✏️ Your message was modified by auto-moderation".to_string(),
    }
}
