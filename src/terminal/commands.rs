// Slash commands for the terminal chat client.
//
// Anything that doesn't start with '/' is a chat message.

use super::formatter::format_message;
use super::{Data, LineResult, Session};
use crate::config::app_config::parse_switch;
use crate::core::moderation::FilterToggle;

const DEFAULT_HISTORY: usize = 10;

const USAGE: &str = "Commands: /as <name>, /join <channel>, /history [n], \
                     /filter <profanity|ratelimit|caps> <on|off>, /status, /help, /quit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Say(String),
    Help,
    Status,
    Quit,
    As(String),
    Join(String),
    History(usize),
    Filter(FilterToggle, bool),
    /// Couldn't parse; carries the message to show
    Invalid(String),
}

/// Parse one input line. Blank lines yield `None`.
pub fn parse_line(line: &str) -> Option<Command> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }

    // Messages go out exactly as typed; only the line ending is dropped
    let Some(rest) = trimmed.strip_prefix('/') else {
        return Some(Command::Say(line.trim_end_matches(['\r', '\n']).to_string()));
    };

    let mut parts = rest.split_whitespace();
    let name = parts.next().unwrap_or_default().to_lowercase();
    let args: Vec<&str> = parts.collect();

    let command = match (name.as_str(), args.as_slice()) {
        ("help", _) => Command::Help,
        ("status", _) => Command::Status,
        ("quit" | "exit", _) => Command::Quit,
        ("as", [sender]) => Command::As(sender.to_string()),
        ("join", [channel]) => Command::Join(channel.trim_start_matches('#').to_string()),
        ("history", []) => Command::History(DEFAULT_HISTORY),
        ("history", [n]) => match n.parse::<usize>() {
            Ok(n) if n > 0 => Command::History(n),
            _ => Command::Invalid(format!("Not a valid message count: {}", n)),
        },
        ("filter", [filter, state]) => match (FilterToggle::parse(filter), parse_switch(state)) {
            (Some(toggle), Some(enabled)) => Command::Filter(toggle, enabled),
            (None, _) => Command::Invalid(format!("Unknown filter: {}", filter)),
            (_, None) => Command::Invalid(format!("Expected on/off, got: {}", state)),
        },
        _ => Command::Invalid(USAGE.to_string()),
    };

    Some(command)
}

/// Run a non-send command and describe the result.
pub fn run(data: &Data, session: &mut Session, command: Command) -> LineResult {
    let lines = match command {
        Command::Quit => return LineResult::Quit,
        Command::Help => vec![USAGE.to_string()],
        Command::Status => status_lines(data, session),
        Command::As(sender) => {
            session.sender_id = sender;
            vec![format!("👤 Now chatting as {}", session.sender_id)]
        }
        Command::Join(channel) if channel.is_empty() => vec![USAGE.to_string()],
        Command::Join(channel) => {
            session.channel = channel;
            vec![format!("📢 Joined #{}", session.channel)]
        }
        Command::History(limit) => {
            let history = data.publisher.history(&session.channel, limit);
            if history.is_empty() {
                vec![format!("No messages in #{} yet", session.channel)]
            } else {
                history.iter().map(format_message).collect()
            }
        }
        Command::Filter(toggle, enabled) => {
            data.chat.set_filter(toggle, enabled);
            vec![format!(
                "🛡️ {} filter {}",
                toggle,
                if enabled { "enabled" } else { "disabled" }
            )]
        }
        Command::Invalid(message) => vec![message],
        Command::Say(_) => Vec::new(),
    };

    LineResult::Output(lines)
}

fn status_lines(data: &Data, session: &Session) -> Vec<String> {
    let toggles = data.chat.toggles();
    let mut lines = vec![format!(
        "👤 {} in #{} (moderation scope: {:?})",
        session.sender_id,
        session.channel,
        data.chat.scope()
    )];
    let key = data
        .chat
        .scope()
        .moderation_key(&session.channel, &session.sender_id);
    let window = data.chat.moderation().config().rate_window_ms;
    let sent = data
        .chat
        .moderation()
        .sender_state(&key)
        .map(|state| state.recent_timestamps.len())
        .unwrap_or(0);
    lines.push(format!(
        "📈 {} recent message(s) counted in the last {}s, {} sender(s) tracked",
        sent,
        window / 1000,
        data.chat.moderation().tracked_senders()
    ));
    let channels = data.publisher.channels();
    if !channels.is_empty() {
        lines.push(format!("📢 Active channels: #{}", channels.join(", #")));
    }
    lines.push("🛡️ duplicates: on (always)".to_string());
    for toggle in FilterToggle::ALL {
        lines.push(format!(
            "🛡️ {}: {}",
            toggle,
            if toggles.is_enabled(toggle) { "on" } else { "off" }
        ));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terminal::tests::test_data;

    #[test]
    fn test_parse_plain_text() {
        assert_eq!(
            parse_line("  hi all "),
            Some(Command::Say("  hi all ".to_string()))
        );
        assert_eq!(parse_line("ok\r\n"), Some(Command::Say("ok".to_string())));
        assert_eq!(parse_line(""), None);
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_line("/as bob"), Some(Command::As("bob".to_string())));
        assert_eq!(
            parse_line("/join #random"),
            Some(Command::Join("random".to_string()))
        );
        assert_eq!(parse_line("/history"), Some(Command::History(10)));
        assert_eq!(parse_line("/history 3"), Some(Command::History(3)));
        assert_eq!(
            parse_line("/filter caps off"),
            Some(Command::Filter(FilterToggle::CapsNormalization, false))
        );
        assert_eq!(parse_line("/EXIT"), Some(Command::Quit));
    }

    #[test]
    fn test_parse_bad_arguments() {
        assert!(matches!(parse_line("/history zero"), Some(Command::Invalid(_))));
        assert!(matches!(parse_line("/history 0"), Some(Command::Invalid(_))));
        assert!(matches!(parse_line("/filter dupes off"), Some(Command::Invalid(_))));
        assert!(matches!(parse_line("/filter caps maybe"), Some(Command::Invalid(_))));
        assert!(matches!(parse_line("/as"), Some(Command::Invalid(_))));
        assert!(matches!(parse_line("/dance"), Some(Command::Invalid(_))));
    }

    #[test]
    fn test_filter_command_updates_pipeline() {
        let data = test_data();
        let mut session = Session {
            sender_id: "alice".to_string(),
            channel: "general".to_string(),
        };

        run(&data, &mut session, Command::Filter(FilterToggle::RateLimit, false));
        assert!(!data.chat.toggles().rate_limit_enabled);

        let LineResult::Output(lines) = run(&data, &mut session, Command::Status) else {
            panic!("status should produce output");
        };
        assert!(lines.iter().any(|l| l.contains("ratelimit: off")));
    }

    #[test]
    fn test_join_and_history() {
        let data = test_data();
        let mut session = Session {
            sender_id: "alice".to_string(),
            channel: "general".to_string(),
        };

        run(&data, &mut session, Command::Join("random".to_string()));
        assert_eq!(session.channel, "random");

        let result = run(&data, &mut session, Command::History(5));
        assert_eq!(
            result,
            LineResult::Output(vec!["No messages in #random yet".to_string()])
        );
    }
}
