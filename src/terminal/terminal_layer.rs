// Terminal layer - the demo's chat UI: slash commands and send feedback.

pub mod commands;
pub mod formatter;
pub mod send_handler;

use crate::core::chat::ChatService;
use crate::infra::chat::LocalPublisher;
use std::sync::Arc;

pub type Error = Box<dyn std::error::Error + Send + Sync>;

/// Data that's shared by every command handler.
pub struct Data {
    pub chat: Arc<ChatService<Arc<LocalPublisher>>>,
    pub publisher: Arc<LocalPublisher>,
}

/// Who we're typing as, and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub sender_id: String,
    pub channel: String,
}

/// What the input loop should do after a line was handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineResult {
    /// Print these lines to the local user
    Output(Vec<String>),
    Quit,
}

/// Handle one line of user input.
pub async fn handle_line(data: &Data, session: &mut Session, line: &str) -> Result<LineResult, Error> {
    match commands::parse_line(line) {
        None => Ok(LineResult::Output(Vec::new())),
        Some(commands::Command::Say(text)) => {
            let feedback = send_handler::handle_send(data, session, &text, None).await?;
            Ok(LineResult::Output(feedback))
        }
        Some(command) => Ok(commands::run(data, session, command)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::chat::ModerationScope;
    use crate::core::moderation::{ModerationConfig, ModerationPipeline};

    pub(crate) fn test_data() -> Data {
        let publisher = Arc::new(LocalPublisher::new());
        let moderation = Arc::new(ModerationPipeline::new(ModerationConfig::default()));
        let chat = Arc::new(ChatService::new(
            moderation,
            Arc::clone(&publisher),
            ModerationScope::Global,
        ));
        Data { chat, publisher }
    }

    fn session() -> Session {
        Session {
            sender_id: "alice".to_string(),
            channel: "general".to_string(),
        }
    }

    #[tokio::test]
    async fn test_blank_line_does_nothing() {
        let data = test_data();
        let mut session = session();

        let result = handle_line(&data, &mut session, "   ").await.unwrap();
        assert_eq!(result, LineResult::Output(Vec::new()));
        assert!(data.publisher.channels().is_empty());
    }

    #[tokio::test]
    async fn test_plain_text_is_sent() {
        let data = test_data();
        let mut session = session();

        handle_line(&data, &mut session, "hello there").await.unwrap();
        let history = data.publisher.history("general", 10);
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].sender_id, "alice");
    }

    #[tokio::test]
    async fn test_history_keeps_text_as_typed() {
        let data = test_data();
        let mut session = session();

        handle_line(&data, &mut session, "  hello there ").await.unwrap();
        let state = data.chat.moderation().sender_state("alice").unwrap();
        assert_eq!(state.last_message().unwrap().text, "  hello there ");
        assert_eq!(data.publisher.history("general", 1)[0].text, "  hello there ");
    }

    #[tokio::test]
    async fn test_quit() {
        let data = test_data();
        let mut session = session();

        let result = handle_line(&data, &mut session, "/quit").await.unwrap();
        assert_eq!(result, LineResult::Quit);
    }

    #[tokio::test]
    async fn test_switching_identity_resets_duplicate_tracking() {
        let data = test_data();
        let mut session = session();

        handle_line(&data, &mut session, "Hello World").await.unwrap();
        handle_line(&data, &mut session, "/as bob").await.unwrap();
        handle_line(&data, &mut session, "Hello World").await.unwrap();

        assert_eq!(data.publisher.history("general", 10).len(), 2);
    }
}
