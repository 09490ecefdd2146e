// In-process implementation of MessagePublisher.
//
// Good enough for the terminal demo and for tests: every published message is
// broadcast to live subscribers and kept in a small per-channel backlog so a
// newcomer can see recent history. It is not a delivery protocol.

use crate::core::chat::{ChatMessage, MessagePublisher, PublishError};
use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::VecDeque;
use tokio::sync::broadcast;

/// Messages kept per channel.
pub const BACKLOG_PER_CHANNEL: usize = 100;

// Slow subscribers that fall further behind than this start missing messages.
const SUBSCRIBER_CAPACITY: usize = 256;

pub struct LocalPublisher {
    /// Channel name -> recent messages, oldest first
    backlog: DashMap<String, VecDeque<ChatMessage>>,
    sender: broadcast::Sender<ChatMessage>,
}

impl LocalPublisher {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(SUBSCRIBER_CAPACITY);
        Self {
            backlog: DashMap::new(),
            sender,
        }
    }

    /// Receive every message published from now on, across all channels.
    pub fn subscribe(&self) -> broadcast::Receiver<ChatMessage> {
        self.sender.subscribe()
    }

    /// Up to `limit` most recent messages of a channel, oldest first.
    pub fn history(&self, channel: &str, limit: usize) -> Vec<ChatMessage> {
        self.backlog
            .get(channel)
            .map(|messages| {
                let skip = messages.len().saturating_sub(limit);
                messages.iter().skip(skip).cloned().collect()
            })
            .unwrap_or_default()
    }

    /// Channels that have seen at least one message, sorted by name.
    pub fn channels(&self) -> Vec<String> {
        let mut channels: Vec<String> = self.backlog.iter().map(|e| e.key().clone()).collect();
        channels.sort();
        channels
    }
}

impl Default for LocalPublisher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessagePublisher for LocalPublisher {
    async fn publish(&self, message: ChatMessage) -> Result<(), PublishError> {
        {
            let mut messages = self.backlog.entry(message.channel.clone()).or_default();
            messages.push_back(message.clone());
            while messages.len() > BACKLOG_PER_CHANNEL {
                messages.pop_front();
            }
        }

        // send() only fails when nobody is listening, which is fine here
        if self.sender.send(message).is_err() {
            tracing::trace!("Published with no active subscribers");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(channel: &str, text: &str, sent_at_ms: i64) -> ChatMessage {
        ChatMessage {
            channel: channel.to_string(),
            sender_id: "alice".to_string(),
            text: text.to_string(),
            sent_at_ms,
            moderated: false,
        }
    }

    #[tokio::test]
    async fn test_publish_without_subscribers() {
        let publisher = LocalPublisher::new();
        publisher.publish(message("general", "hi", 0)).await.unwrap();

        assert_eq!(publisher.history("general", 10).len(), 1);
        assert_eq!(publisher.channels(), vec!["general".to_string()]);
    }

    #[tokio::test]
    async fn test_subscribers_receive_messages() {
        let publisher = LocalPublisher::new();
        let mut rx = publisher.subscribe();

        publisher.publish(message("general", "hi", 0)).await.unwrap();

        let received = rx.recv().await.unwrap();
        assert_eq!(received.text, "hi");
    }

    #[tokio::test]
    async fn test_history_is_per_channel_and_ordered() {
        let publisher = LocalPublisher::new();
        publisher.publish(message("general", "one", 0)).await.unwrap();
        publisher.publish(message("random", "other", 1)).await.unwrap();
        publisher.publish(message("general", "two", 2)).await.unwrap();
        publisher.publish(message("general", "three", 3)).await.unwrap();

        let texts: Vec<String> = publisher
            .history("general", 2)
            .into_iter()
            .map(|m| m.text)
            .collect();
        assert_eq!(texts, vec!["two", "three"]);
        assert!(publisher.history("missing", 5).is_empty());
    }

    #[tokio::test]
    async fn test_backlog_is_bounded() {
        let publisher = LocalPublisher::new();
        for i in 0..(BACKLOG_PER_CHANNEL as i64 + 20) {
            publisher
                .publish(message("general", &format!("msg {}", i), i))
                .await
                .unwrap();
        }

        let history = publisher.history("general", usize::MAX);
        assert_eq!(history.len(), BACKLOG_PER_CHANNEL);
        assert_eq!(history[0].text, "msg 20");
    }
}
