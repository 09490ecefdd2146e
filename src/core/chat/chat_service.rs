// Chat send service - the collaborator that sits between "user pressed send"
// and the transport.
//
// Runs the moderation pipeline, then either publishes the (possibly
// transformed) text or reports why it was blocked. No transport code here:
// publishing goes through the MessagePublisher port.

use super::chat_models::{ChatMessage, ModerationScope, SendOutcome};
use crate::core::moderation::{
    FilterToggle, ModerationError, ModerationPipeline, ModerationToggles,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("Transport error: {0}")]
    Backend(String),
}

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Moderation error: {0}")]
    Moderation(#[from] ModerationError),

    #[error("Publish failed: {0}")]
    Publish(#[from] PublishError),
}

// ============================================================================
// PUBLISHER TRAIT (PORT)
// ============================================================================

/// Anything that can deliver a message to a channel.
///
/// Accepts a value for publication and reports success or failure. Delivery
/// guarantees are the implementation's business.
#[async_trait]
pub trait MessagePublisher: Send + Sync {
    async fn publish(&self, message: ChatMessage) -> Result<(), PublishError>;
}

#[async_trait]
impl<P: MessagePublisher + ?Sized> MessagePublisher for Arc<P> {
    async fn publish(&self, message: ChatMessage) -> Result<(), PublishError> {
        (**self).publish(message).await
    }
}

// ============================================================================
// CORE SERVICE
// ============================================================================

pub struct ChatService<P: MessagePublisher> {
    moderation: Arc<ModerationPipeline>,
    publisher: P,
    scope: ModerationScope,
}

impl<P: MessagePublisher> ChatService<P> {
    pub fn new(moderation: Arc<ModerationPipeline>, publisher: P, scope: ModerationScope) -> Self {
        Self {
            moderation,
            publisher,
            scope,
        }
    }

    pub fn scope(&self) -> ModerationScope {
        self.scope
    }

    #[allow(dead_code)]
    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    pub fn moderation(&self) -> &ModerationPipeline {
        &self.moderation
    }

    /// Moderate and, if allowed, publish a message.
    ///
    /// # Arguments
    /// * `channel` - Where the message goes
    /// * `sender_id` - Who sent it
    /// * `text` - Raw text as typed
    /// * `sent_at_ms` - Explicit timestamp, or `None` for "now"
    pub async fn send_message(
        &self,
        channel: &str,
        sender_id: &str,
        text: &str,
        sent_at_ms: Option<i64>,
    ) -> Result<SendOutcome, ChatError> {
        let sent_at_ms = sent_at_ms.unwrap_or_else(|| chrono::Utc::now().timestamp_millis());
        let key = self.scope.moderation_key(channel, sender_id);

        let verdict = self.moderation.evaluate(&key, text, sent_at_ms)?;

        if !verdict.accepted {
            tracing::info!(
                channel,
                sender_id,
                reason = %verdict.reason_code,
                "Message blocked by auto-moderation"
            );
            return Ok(SendOutcome::Rejected {
                reason: verdict.reason_code,
            });
        }

        let message = ChatMessage {
            channel: channel.to_string(),
            sender_id: sender_id.to_string(),
            text: verdict.output_text,
            sent_at_ms,
            moderated: verdict.was_transformed,
        };

        self.publisher.publish(message.clone()).await?;

        tracing::debug!(channel, sender_id, moderated = message.moderated, "Message published");

        Ok(SendOutcome::Published {
            message,
            was_transformed: verdict.was_transformed,
            reason: verdict.reason_code,
        })
    }

    /// Enable or disable one auto-moderation filter.
    pub fn set_filter(&self, toggle: FilterToggle, enabled: bool) {
        self.moderation.set_filter(toggle, enabled);
    }

    pub fn toggles(&self) -> ModerationToggles {
        self.moderation.toggles()
    }
}

// ============================================================================
// TESTS
// ============================================================================
