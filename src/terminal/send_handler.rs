// Terminal-side send handling - translates core send outcomes into feedback.

use super::formatter::{format_rejection, format_transformed};
use super::{Data, Error, Session};
use crate::core::chat::{ChatError, SendOutcome};
use crate::core::moderation::ModerationError;

/// Send `text` as the session's sender and describe what happened.
///
/// The published message itself is shown by the subscriber loop, so a clean
/// send produces no extra feedback.
pub async fn handle_send(
    data: &Data,
    session: &Session,
    text: &str,
    sent_at_ms: Option<i64>,
) -> Result<Vec<String>, Error> {
    let outcome = match data
        .chat
        .send_message(&session.channel, &session.sender_id, text, sent_at_ms)
        .await
    {
        Ok(outcome) => outcome,
        Err(ChatError::Moderation(ModerationError::EmptyMessage)) => {
            return Ok(vec!["Nothing to send".to_string()]);
        }
        Err(e) => return Err(e.into()),
    };

    let feedback = match outcome {
        SendOutcome::Rejected { reason } => vec![format_rejection(reason)],
        SendOutcome::Published {
            was_transformed: true,
            reason,
            ..
        } => vec![format_transformed(reason)],
        SendOutcome::Published { .. } => Vec::new(),
    };

    Ok(feedback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::moderation::ReasonCode;
    use crate::terminal::tests::test_data;

    fn session() -> Session {
        Session {
            sender_id: "alice".to_string(),
            channel: "general".to_string(),
        }
    }

    #[tokio::test]
    async fn test_clean_send_has_no_feedback() {
        let data = test_data();
        let feedback = handle_send(&data, &session(), "hello", Some(0)).await.unwrap();
        assert!(feedback.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_send_is_explained() {
        let data = test_data();
        handle_send(&data, &session(), "Hello World", Some(0)).await.unwrap();

        let feedback = handle_send(&data, &session(), "Hello World", Some(1_000))
            .await
            .unwrap();
        assert_eq!(feedback, vec![format_rejection(ReasonCode::DuplicateExact)]);
    }

    #[tokio::test]
    async fn test_modified_send_is_flagged() {
        let data = test_data();
        let feedback = handle_send(&data, &session(), "WHY IS EVERYONE SHOUTING", Some(0))
            .await
            .unwrap();
        assert_eq!(feedback, vec![format_transformed(ReasonCode::None)]);

        let history = data.publisher.history("general", 1);
        assert_eq!(history[0].text, "Why is everyone shouting");
    }

    #[tokio::test]
    async fn test_empty_send() {
        let data = test_data();
        let feedback = handle_send(&data, &session(), "  ", Some(0)).await.unwrap();
        assert_eq!(feedback, vec!["Nothing to send".to_string()]);
    }
}
